pub mod audio;
pub mod config;
pub mod error;
pub mod language;
pub mod routes;
pub mod service;
pub mod state;
pub mod translate;
pub mod tts;
pub mod ui;
pub mod utils;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// The full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
