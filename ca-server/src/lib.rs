//! ca-server library - visitor lookup backend
//!
//! Serves the endpoints used by the DNI lookup form: person search, person
//! photo, exit registration and visitor card availability.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use ca_common::api::{CHECK_TARJETA, PERSON_PHOTO_ROUTE, REGISTER_EXIT_ROUTE, SEARCH_PERSON};

    Router::new()
        .route(SEARCH_PERSON, get(api::search_person))
        .route(PERSON_PHOTO_ROUTE, get(api::get_person_photo))
        .route(
            REGISTER_EXIT_ROUTE,
            get(api::show_visit).post(api::register_exit),
        )
        .route(CHECK_TARJETA, get(api::check_tarjeta_disponible))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
