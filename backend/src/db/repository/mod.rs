//! Repository trait definitions for the scheduling store.
//!
//! Operations are split into two focused traits:
//!
//! - [`entity`]: create/read/update/delete for the four entity collections
//! - [`link`]: association management between entities
//!
//! # Convenience Trait Bound
//!
//! For code that needs both, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn attach<R: FullRepository + ?Sized>(repo: &R, meeting: EntityRef) -> RepositoryResult<()> {
//!     let attachment = repo.create(NewEntity::Attachment(draft)).await?;
//!     repo.link(&meeting, &EntityRef::new(EntityKind::Attachment, attachment.id().clone())).await?;
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;
pub mod link;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use entity::{EntityRepository, ListWindow};
pub use link::LinkRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both
/// [`EntityRepository`] and [`LinkRepository`].
pub trait FullRepository: EntityRepository + LinkRepository {}

impl<T> FullRepository for T where T: EntityRepository + LinkRepository {}
