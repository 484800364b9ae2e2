//! High-level store operations.
//!
//! Every function is generic over the entity record type, so handlers call
//! `services::create::<Meeting, _>(repo, draft)` and get a typed view back
//! instead of matching on [`EntityView`]. They work with any
//! [`FullRepository`] implementation.

use log::{debug, info, warn};

use super::repository::{
    ErrorContext, FullRepository, ListWindow, RepositoryError, RepositoryResult,
};
use crate::models::{EntityId, EntityKind, EntityRef, EntityType, EntityView};

/// Narrow a store view to the typed view of `E`.
fn typed<E: EntityType>(operation: &str, view: EntityView) -> RepositoryResult<E::View> {
    let kind = view.kind();
    let id = view.id().clone();
    E::view(view).ok_or_else(|| {
        RepositoryError::internal_with_context(
            format!("Store returned a {} where a {} was expected", kind, E::KIND),
            ErrorContext::new(operation)
                .with_entity(E::KIND.label())
                .with_entity_id(id),
        )
    })
}

fn log_failure(operation: &str, kind: EntityKind, err: &RepositoryError) {
    warn!("{} {} rejected: {}", operation, kind.label(), err);
}

/// Check store health.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Create an entity from its draft.
pub async fn create<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    draft: E::Draft,
) -> RepositoryResult<E::View> {
    match repo.create(E::new_entity(draft)).await {
        Ok(view) => {
            info!("Created {} {}", E::KIND.label(), view.id());
            typed::<E>("create", view)
        }
        Err(e) => {
            log_failure("create", E::KIND, &e);
            Err(e)
        }
    }
}

/// Fetch a single entity with its embedded associations.
pub async fn get<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    id: &EntityId,
) -> RepositoryResult<E::View> {
    debug!("Fetching {} {}", E::KIND.label(), id);
    let view = repo.get(E::KIND, id).await?;
    typed::<E>("get", view)
}

/// Fetch the entities whose ids are listed. Unknown ids are skipped.
pub async fn get_many<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    ids: &[EntityId],
) -> RepositoryResult<Vec<E::View>> {
    let views = repo.get_many(E::KIND, ids).await?;
    debug!(
        "Resolved {} of {} requested {}",
        views.len(),
        ids.len(),
        E::KIND.collection()
    );
    views.into_iter().map(|v| typed::<E>("get", v)).collect()
}

/// List the entities of a kind in creation order, restricted to `window`.
pub async fn list<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    window: ListWindow,
) -> RepositoryResult<Vec<E::View>> {
    let views = repo.list(E::KIND, window).await?;
    debug!("Listed {} {}", views.len(), E::KIND.collection());
    views.into_iter().map(|v| typed::<E>("list", v)).collect()
}

/// Apply a partial update.
pub async fn update<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    id: &EntityId,
    patch: E::Patch,
) -> RepositoryResult<E::View> {
    match repo.update(id, E::patch(patch)).await {
        Ok(view) => {
            info!("Updated {} {}", E::KIND.label(), id);
            typed::<E>("update", view)
        }
        Err(e) => {
            log_failure("update", E::KIND, &e);
            Err(e)
        }
    }
}

/// Delete an entity. Its associations are removed with it.
pub async fn delete<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    id: &EntityId,
) -> RepositoryResult<()> {
    match repo.delete(E::KIND, id).await {
        Ok(()) => {
            info!("Deleted {} {}", E::KIND.label(), id);
            Ok(())
        }
        Err(e) => {
            log_failure("delete", E::KIND, &e);
            Err(e)
        }
    }
}

/// Link an entity of type `E` to one peer. Linking an existing pair is a no-op.
pub async fn link<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    id: &EntityId,
    peer: &EntityRef,
) -> RepositoryResult<E::View> {
    let owner = EntityRef::new(E::KIND, id.clone());
    match repo.link(&owner, peer).await {
        Ok(view) => {
            info!("Linked {} to {}", owner, peer);
            typed::<E>("link", view)
        }
        Err(e) => {
            log_failure("link", E::KIND, &e);
            Err(e)
        }
    }
}

/// Unlink an entity of type `E` from one peer. Unlinking an absent pair is a no-op.
pub async fn unlink<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    id: &EntityId,
    peer: &EntityRef,
) -> RepositoryResult<E::View> {
    let owner = EntityRef::new(E::KIND, id.clone());
    match repo.unlink(&owner, peer).await {
        Ok(view) => {
            info!("Unlinked {} from {}", owner, peer);
            typed::<E>("unlink", view)
        }
        Err(e) => {
            log_failure("unlink", E::KIND, &e);
            Err(e)
        }
    }
}

/// Link several peers of one kind at once. Either every pair is linked or none.
pub async fn link_many<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    id: &EntityId,
    peer_kind: EntityKind,
    peer_ids: &[EntityId],
) -> RepositoryResult<E::View> {
    let owner = EntityRef::new(E::KIND, id.clone());
    match repo.link_many(&owner, peer_kind, peer_ids).await {
        Ok(view) => {
            info!(
                "Linked {} to {} {}",
                owner,
                peer_ids.len(),
                peer_kind.collection()
            );
            typed::<E>("link", view)
        }
        Err(e) => {
            log_failure("link", E::KIND, &e);
            Err(e)
        }
    }
}

/// Unlink several peers of one kind at once. Either every pair is unlinked or none.
pub async fn unlink_many<E: EntityType, R: FullRepository + ?Sized>(
    repo: &R,
    id: &EntityId,
    peer_kind: EntityKind,
    peer_ids: &[EntityId],
) -> RepositoryResult<E::View> {
    let owner = EntityRef::new(E::KIND, id.clone());
    match repo.unlink_many(&owner, peer_kind, peer_ids).await {
        Ok(view) => {
            info!(
                "Unlinked {} from {} {}",
                owner,
                peer_ids.len(),
                peer_kind.collection()
            );
            typed::<E>("unlink", view)
        }
        Err(e) => {
            log_failure("unlink", E::KIND, &e);
            Err(e)
        }
    }
}
