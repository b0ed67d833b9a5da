//! Handlers for the `/task` resource (the chore catalog).

use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_db::repositories::TaskRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, Payload};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;
use crate::validators::task::{require_task, validate_create, validate_update, TaskRequest};

/// GET /v1/task?limit=&offset=
///
/// Deleted tasks are not listed.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let rows = TaskRepo::list(&state.pool, params.limit, params.offset).await?;
    let count = TaskRepo::count(&state.pool).await?;
    Ok(Json(DataResponse {
        data: Page { rows, count },
    }))
}

/// POST /v1/task
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    input: Payload<TaskRequest>,
) -> AppResult<impl IntoResponse> {
    let input = validate_create(&state.pool, input).await?;
    let task = TaskRepo::create(&state.pool, &input).await?;

    tracing::info!(task_id = task.id, by = auth.user_id, "Task created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// PUT /v1/task/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    input: Payload<TaskRequest>,
) -> AppResult<impl IntoResponse> {
    let (_current, update) = validate_update(&state.pool, id, input).await?;
    let task = TaskRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    tracing::info!(task_id = id, by = auth.user_id, "Task updated");
    Ok(Json(DataResponse { data: task }))
}

/// PATCH /v1/task/{id}
///
/// Soft delete. Checklists that already use the task keep their items.
pub async fn soft_delete(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    require_task(&state.pool, id).await?;
    TaskRepo::soft_delete(&state.pool, id).await?;

    tracing::info!(task_id = id, by = auth.user_id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}
