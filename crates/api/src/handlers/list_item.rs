//! Handler for the `/listItem` resource.

use allowance_core::checklist::ensure_accepts_absences;
use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_db::repositories::ListItemRepo;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::extract::AppPath;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::validators::checklist::require_checklist;

/// PATCH /v1/listItem/{id}
///
/// Mark the item absent. Its checklist must be active. Repeating the call
/// leaves the item absent.
pub async fn mark_absent(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ListItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ListItem",
            id,
        }))?;

    let checklist = require_checklist(&state.pool, item.list_id).await?;
    ensure_accepts_absences(checklist.status)?;

    let item = ListItemRepo::mark_absent(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ListItem",
            id,
        }))?;

    tracing::info!(
        list_item_id = id,
        checklist_id = checklist.id,
        by = auth.user_id,
        "List item marked absent"
    );
    Ok(Json(DataResponse { data: item }))
}
