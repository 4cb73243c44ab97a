use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all todo endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/todos", post(handler::create_todo))
        .route(
            "/todo/:todo_id",
            get(handler::get_todo)
                .put(handler::update_todo)
                .delete(handler::delete_todo),
        )
        .fallback(handler::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
