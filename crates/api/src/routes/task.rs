//! Route definitions for the `/task` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/task`.
///
/// ```text
/// GET   /       -> list
/// POST  /       -> create
/// PUT   /{id}   -> update
/// PATCH /{id}   -> soft_delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::list).post(task::create))
        .route("/{id}", put(task::update).patch(task::soft_delete))
}
