use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post, put},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers;
use crate::{health_with_pool, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(controllers::root))
        .route("/health", get(|Extension(state): Extension<Arc<AppState>>| async move {
            health_with_pool(&state.pool).await
        }))
        .route("/api/login", post(controllers::login))
        .route(
            "/api/users",
            get(controllers::list_users).post(controllers::create_user),
        )
        .route("/api/users/:username", put(controllers::update_user))
        .route(
            "/api/data",
            get(controllers::list_records).post(controllers::create_record),
        )
        // stesso pattern di percorso: GET filtra per username, DELETE elimina per id
        .route(
            "/api/data/:key",
            get(controllers::list_records_for).delete(controllers::delete_record),
        )
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
