//! Storage module for the scheduling entities.
//!
//! This module provides abstractions for store operations via the Repository
//! pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, tests)                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - typed entity operations  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │  Local Repository (in-memory)                │
//!     │  entity tables + edge sets (edges.rs)        │
//!     │  field constraints (validation.rs)           │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use rockets_backend::db::{services, ListWindow, LocalRepository};
//! use rockets_backend::models::{Meeting, MeetingDraft};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let meeting = services::create::<Meeting, _>(&repo, MeetingDraft::default()).await?;
//!     let all = services::list::<Meeting, _>(&repo, ListWindow::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod edges;
pub mod repositories;
pub mod repository;
pub mod services;
pub mod validation;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

pub use edges::{Associations, EdgeSet};
pub use repositories::LocalRepository;
pub use repository::{
    EntityRepository, ErrorContext, FullRepository, LinkRepository, ListWindow,
    RepositoryError, RepositoryResult,
};
