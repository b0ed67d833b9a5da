//! Route definitions for the `/listItem` resource.

use axum::routing::patch;
use axum::Router;

use crate::handlers::list_item;
use crate::state::AppState;

/// Routes mounted at `/listItem`.
///
/// ```text
/// PATCH /{id}   -> mark_absent
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", patch(list_item::mark_absent))
}
