//! Route definitions for the `/checklist` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::checklist;
use crate::state::AppState;

/// Routes mounted at `/checklist`.
///
/// ```text
/// GET    /                             -> list
/// POST   /                             -> create
/// GET    /{id}                         -> get_by_id
/// PUT    /{id}                         -> update
/// DELETE /{id}                         -> delete
/// PATCH  /start/{id}                   -> start
/// PATCH  /close/{id}                   -> close
/// GET    /active/{member_id}           -> active
/// GET    /closed/{member_id}/{order}   -> closed_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(checklist::list).post(checklist::create))
        .route(
            "/{id}",
            get(checklist::get_by_id)
                .put(checklist::update)
                .delete(checklist::delete),
        )
        .route("/start/{id}", patch(checklist::start))
        .route("/close/{id}", patch(checklist::close))
        .route("/active/{member_id}", get(checklist::active))
        .route("/closed/{member_id}/{order}", get(checklist::closed_history))
}
