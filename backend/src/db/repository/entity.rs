//! Entity repository trait for CRUD operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{EntityId, EntityKind, EntityPatch, EntityView, NewEntity};

/// Pagination window over an ordered listing.
///
/// The default window covers the whole listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListWindow {
    /// Number of leading entries to skip.
    pub skip: usize,
    /// Maximum entries to return; `None` means no upper bound.
    pub limit: Option<usize>,
}

impl ListWindow {
    pub fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }

    /// Restrict an ordered sequence to this window.
    pub fn apply<I: Iterator>(self, items: I) -> impl Iterator<Item = I::Item> {
        items.skip(self.skip).take(self.limit.unwrap_or(usize::MAX))
    }
}

/// Repository trait for entity CRUD.
///
/// Every read resolves associations into embedded peer objects from the
/// current store state.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Create an entity.
    ///
    /// A missing or blank id is replaced by a generated one.
    ///
    /// # Returns
    /// * `Ok(EntityView)` - The stored entity with (empty) associations
    /// * `Err(RepositoryError::Conflict)` - If the supplied id is already in use
    /// * `Err(RepositoryError::InvalidArgument)` - If a field constraint fails
    async fn create(&self, entity: NewEntity) -> RepositoryResult<EntityView>;

    /// Retrieve one entity with its associations embedded.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the id is absent
    async fn get(&self, kind: EntityKind, id: &EntityId) -> RepositoryResult<EntityView>;

    /// Retrieve the entities among `ids` that exist, in request order.
    ///
    /// Unknown ids and repeated ids are skipped.
    async fn get_many(&self, kind: EntityKind, ids: &[EntityId])
        -> RepositoryResult<Vec<EntityView>>;

    /// List the entities of a kind in insertion order, restricted to `window`.
    ///
    /// A window past the end yields an empty list.
    async fn list(&self, kind: EntityKind, window: ListWindow)
        -> RepositoryResult<Vec<EntityView>>;

    /// Replace the named scalar fields of an entity.
    ///
    /// Associations are untouched.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the id is absent
    /// * `Err(RepositoryError::InvalidArgument)` - If the result violates a constraint
    async fn update(&self, id: &EntityId, patch: EntityPatch) -> RepositoryResult<EntityView>;

    /// Delete an entity and unlink it from every peer.
    ///
    /// Peers themselves are never deleted.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the id is absent
    async fn delete(&self, kind: EntityKind, id: &EntityId) -> RepositoryResult<()>;
}
