//! HTTP handlers for the REST API.
//!
//! Entity handlers are generic over the record type and are instantiated
//! once per collection by the router. They delegate to the service layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{HealthResponse, IdList, ListQuery};
use super::error::AppError;
use super::state::AppState;
use crate::db::services;
use crate::models::{EntityId, EntityKind, EntityRef, EntityType};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Parse the `{relation}` path segment into the peer kind.
fn peer_kind(relation: &str) -> Result<EntityKind, AppError> {
    relation
        .parse::<EntityKind>()
        .map_err(|_| AppError::BadRequest(format!("Unknown relation '{}'", relation)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store_status = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_status,
    }))
}

/// Fallback for unmatched `/api` paths.
pub async fn api_not_found() -> AppError {
    AppError::NotFound("No such API endpoint".to_string())
}

// =============================================================================
// Entity CRUD
// =============================================================================

/// GET /api/{collection}
///
/// List the collection, or only the entities named by `?ids=a,b,c`.
/// `?skip=` and `?limit=` page through either result.
pub async fn list_entities<E: EntityType>(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> HandlerResult<Vec<E::View>> {
    let repo = state.repository.as_ref();
    let window = query.window();
    let views: Vec<E::View> = match query.requested_ids() {
        Some(ids) => {
            let views = services::get_many::<E, _>(repo, &ids).await?;
            window.apply(views.into_iter()).collect()
        }
        None => services::list::<E, _>(repo, window).await?,
    };
    Ok(Json(views))
}

/// POST /api/{collection}
pub async fn create_entity<E: EntityType>(
    State(state): State<AppState>,
    Json(draft): Json<E::Draft>,
) -> Result<(StatusCode, Json<E::View>), AppError> {
    let view = services::create::<E, _>(state.repository.as_ref(), draft).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/{collection}/{id}
pub async fn get_entity<E: EntityType>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<E::View> {
    let view = services::get::<E, _>(state.repository.as_ref(), &EntityId::from(id)).await?;
    Ok(Json(view))
}

/// PUT /api/{collection}/{id}
///
/// Partial update: omitted fields keep their current value.
pub async fn update_entity<E: EntityType>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<E::Patch>,
) -> HandlerResult<E::View> {
    let view =
        services::update::<E, _>(state.repository.as_ref(), &EntityId::from(id), patch).await?;
    Ok(Json(view))
}

/// DELETE /api/{collection}/{id}
pub async fn delete_entity<E: EntityType>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    services::delete::<E, _>(state.repository.as_ref(), &EntityId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Associations
// =============================================================================

/// POST /api/{collection}/{id}/{relation}
///
/// Link every id in the body. Nothing is linked if any id is unknown.
pub async fn link_many<E: EntityType>(
    State(state): State<AppState>,
    Path((id, relation)): Path<(String, String)>,
    Json(body): Json<IdList>,
) -> HandlerResult<E::View> {
    let kind = peer_kind(&relation)?;
    let view = services::link_many::<E, _>(
        state.repository.as_ref(),
        &EntityId::from(id),
        kind,
        &body.into_ids(),
    )
    .await?;
    Ok(Json(view))
}

/// DELETE /api/{collection}/{id}/{relation}
pub async fn unlink_many<E: EntityType>(
    State(state): State<AppState>,
    Path((id, relation)): Path<(String, String)>,
    Json(body): Json<IdList>,
) -> HandlerResult<E::View> {
    let kind = peer_kind(&relation)?;
    let view = services::unlink_many::<E, _>(
        state.repository.as_ref(),
        &EntityId::from(id),
        kind,
        &body.into_ids(),
    )
    .await?;
    Ok(Json(view))
}

/// PUT /api/{collection}/{id}/{relation}/{peer_id}
pub async fn link_one<E: EntityType>(
    State(state): State<AppState>,
    Path((id, relation, peer_id)): Path<(String, String, String)>,
) -> HandlerResult<E::View> {
    let peer = EntityRef::new(peer_kind(&relation)?, peer_id);
    let view = services::link::<E, _>(state.repository.as_ref(), &EntityId::from(id), &peer).await?;
    Ok(Json(view))
}

/// DELETE /api/{collection}/{id}/{relation}/{peer_id}
pub async fn unlink_one<E: EntityType>(
    State(state): State<AppState>,
    Path((id, relation, peer_id)): Path<(String, String, String)>,
) -> HandlerResult<E::View> {
    let peer = EntityRef::new(peer_kind(&relation)?, peer_id);
    let view =
        services::unlink::<E, _>(state.repository.as_ref(), &EntityId::from(id), &peer).await?;
    Ok(Json(view))
}
