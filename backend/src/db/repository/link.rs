//! Association repository trait.
//!
//! Links are requested from an "owner" entity towards one or more peers; the
//! returned view is always the owner's.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{EntityId, EntityKind, EntityRef, EntityView};

#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Link two entities. Re-linking an existing pair is a successful no-op.
    ///
    /// # Returns
    /// * `Ok(EntityView)` - The owner with associations embedded
    /// * `Err(RepositoryError::InvalidArgument)` - If the kinds cannot be related
    /// * `Err(RepositoryError::NotFound)` - If either endpoint is missing
    async fn link(&self, owner: &EntityRef, peer: &EntityRef) -> RepositoryResult<EntityView>;

    /// Unlink two entities. Unlinking a pair that is not linked succeeds.
    ///
    /// # Returns
    /// * `Err(RepositoryError::InvalidArgument)` - If the kinds cannot be related
    /// * `Err(RepositoryError::NotFound)` - If either endpoint is missing
    async fn unlink(&self, owner: &EntityRef, peer: &EntityRef) -> RepositoryResult<EntityView>;

    /// Link the owner to every id in `peer_ids`, all or nothing.
    ///
    /// # Returns
    /// * `Err(RepositoryError::InvalidArgument)` - If `peer_ids` is empty or the kinds cannot be related
    /// * `Err(RepositoryError::NotFound)` - If any endpoint is missing; no edge is changed
    async fn link_many(
        &self,
        owner: &EntityRef,
        peer_kind: EntityKind,
        peer_ids: &[EntityId],
    ) -> RepositoryResult<EntityView>;

    /// Unlink the owner from every id in `peer_ids`, all or nothing.
    async fn unlink_many(
        &self,
        owner: &EntityRef,
        peer_kind: EntityKind,
        peer_ids: &[EntityId],
    ) -> RepositoryResult<EntityView>;
}
