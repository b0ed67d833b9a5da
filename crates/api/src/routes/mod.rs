pub mod auth;
pub mod checklist;
pub mod health;
pub mod list_item;
pub mod member;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Private routes take an [`AuthUser`](crate::middleware::auth::AuthUser)
/// extractor; `POST /auth` and `POST /user` are public.
///
/// ```text
/// /auth                                   login (public)
///
/// /user                                   list, register (public)
/// /user/{id}                              get, update, delete
///
/// /member                                 list, create
/// /member/{id}                            get, update, soft delete
/// /member/{id}/avatar                     upload avatar (multipart)
///
/// /task                                   list, create
/// /task/{id}                              update, soft delete (PATCH)
///
/// /checklist                              list, create
/// /checklist/{id}                         get, update, delete
/// /checklist/start/{id}                   onHold -> active (PATCH)
/// /checklist/close/{id}                   active -> closed (PATCH)
/// /checklist/active/{member_id}           active checklist + allowance
/// /checklist/closed/{member_id}/{order}   closed history
///
/// /listItem/{id}                          mark absent (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
        .nest("/member", member::router())
        .nest("/task", task::router())
        .nest("/checklist", checklist::router())
        .nest("/listItem", list_item::router())
}
