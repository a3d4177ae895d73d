//! Route definitions for the lab.

use axum::{
    Router,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::assets;
use crate::handlers;
use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/greet", get(handlers::greet))
        .route("/users", get(handlers::users_index))
        .route("/user/{user_id}", get(handlers::user_detail))
        .route(
            "/upload",
            get(handlers::upload_form).post(handlers::upload_submit),
        )
        .route("/session/save", get(handlers::session_save))
        .route("/session/load", get(handlers::session_load))
        .route(
            "/command",
            get(handlers::command_form).post(handlers::command_submit),
        )
        .route("/vulnerabilities", get(handlers::vulnerabilities))
        .route("/static/{*path}", get(assets::serve_static))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
