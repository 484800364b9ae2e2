//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;
use crate::models::{Attachment, Calendar, EntityType, Meeting, Participant};

/// CRUD and association routes for one collection.
fn entity_routes<E: EntityType>() -> Router<AppState> {
    let base = format!("/{}", E::KIND.collection());

    Router::new()
        .route(
            &base,
            get(handlers::list_entities::<E>).post(handlers::create_entity::<E>),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(handlers::get_entity::<E>)
                .put(handlers::update_entity::<E>)
                .delete(handlers::delete_entity::<E>),
        )
        .route(
            &format!("{}/{{id}}/{{relation}}", base),
            post(handlers::link_many::<E>).delete(handlers::unlink_many::<E>),
        )
        .route(
            &format!("{}/{{id}}/{{relation}}/{{peer_id}}", base),
            put(handlers::link_one::<E>).delete(handlers::unlink_one::<E>),
        )
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    // CORS configuration - permissive, the console may be served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .merge(entity_routes::<Meeting>())
        .merge(entity_routes::<Calendar>())
        .merge(entity_routes::<Participant>())
        .merge(entity_routes::<Attachment>())
        .fallback(handlers::api_not_found);

    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api);

    // Single-page console: unknown paths fall back to index.html
    if let Some(dir) = &config.static_files.dir {
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).fallback(index));
    }

    router
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state, &ServerConfig::default());
    }

    #[test]
    fn test_router_creation_with_static_dir() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let mut config = ServerConfig::default();
        config.static_files.dir = Some(std::env::temp_dir());
        let _router = create_router(AppState::new(repo), &config);
    }
}
