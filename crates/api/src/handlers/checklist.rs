//! Handlers for the `/checklist` resource.
//!
//! Lifecycle: `onHold -> active -> closed`. Edits and deletes are only
//! allowed on hold; absences are only recorded while active. A member has
//! at most one checklist that is not closed.

use allowance_core::allowance::{summarize, AllowanceSummary};
use allowance_core::checklist::{
    ensure_can_close, ensure_can_start, ensure_deletable, ChecklistStatus,
};
use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_db::models::checklist::Checklist;
use allowance_db::models::list_item::ListItemDetail;
use allowance_db::repositories::{ChecklistRepo, ListItemRepo};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, Payload};
use crate::middleware::auth::AuthUser;
use crate::query::ChecklistListParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;
use crate::validators::checklist::{
    parse_order, require_checklist, validate_create, validate_update, CreateChecklistRequest,
    UpdateChecklistRequest,
};
use crate::validators::require_member;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A checklist with its items.
#[derive(Debug, Serialize)]
pub struct ChecklistDetail {
    #[serde(flatten)]
    pub checklist: Checklist,
    pub items: Vec<ListItemDetail>,
}

/// A member's active checklist with the allowance after deductions.
#[derive(Debug, Serialize)]
pub struct ActiveChecklist {
    pub checklist: Checklist,
    pub items: Vec<ListItemDetail>,
    #[serde(flatten)]
    pub summary: AllowanceSummary,
}

async fn with_items(pool: &PgPool, checklist: Checklist) -> AppResult<ChecklistDetail> {
    let items = ListItemRepo::list_by_checklist(pool, checklist.id).await?;
    Ok(ChecklistDetail { checklist, items })
}

/// A conditional write found the checklist in a different status than the
/// guard saw a moment earlier.
fn status_changed(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Checklist {id} changed status, reload and retry"
    )))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /v1/checklist?limit=&offset=&member_id=
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ChecklistListParams>,
) -> AppResult<impl IntoResponse> {
    let rows =
        ChecklistRepo::list(&state.pool, params.member_id, params.limit, params.offset).await?;
    let count = ChecklistRepo::count(&state.pool, params.member_id).await?;
    Ok(Json(DataResponse {
        data: Page { rows, count },
    }))
}

/// GET /v1/checklist/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let checklist = require_checklist(&state.pool, id).await?;
    let detail = with_items(&state.pool, checklist).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /v1/checklist
///
/// Create an on-hold checklist with its items. Rejected with 409 while the
/// member still has a checklist that is not closed.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    input: Payload<CreateChecklistRequest>,
) -> AppResult<impl IntoResponse> {
    let (input, items) = validate_create(&state.pool, input).await?;

    if let Some(open) = ChecklistRepo::find_open_by_member(&state.pool, input.member_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Member already has an open checklist (id {}, status: {})",
            open.id, open.status
        ))));
    }

    let checklist = ChecklistRepo::create_with_items(&state.pool, &input, &items).await?;

    tracing::info!(
        checklist_id = checklist.id,
        member_id = checklist.member_id,
        items = items.len(),
        by = auth.user_id,
        "Checklist created"
    );
    let detail = with_items(&state.pool, checklist).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /v1/checklist/{id}
///
/// Rename and replace all items. On hold only.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    input: Payload<UpdateChecklistRequest>,
) -> AppResult<impl IntoResponse> {
    let (_current, update, items) = validate_update(&state.pool, id, input).await?;

    let checklist = ChecklistRepo::update_with_items(&state.pool, id, &update, &items)
        .await?
        .ok_or_else(|| status_changed(id))?;

    tracing::info!(checklist_id = id, items = items.len(), by = auth.user_id, "Checklist updated");
    let detail = with_items(&state.pool, checklist).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /v1/checklist/{id}
///
/// Delete the checklist and its items. On hold only.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let checklist = require_checklist(&state.pool, id).await?;
    ensure_deletable(checklist.status)?;

    if !ChecklistRepo::delete_with_items(&state.pool, id).await? {
        return Err(status_changed(id));
    }

    tracing::info!(checklist_id = id, by = auth.user_id, "Checklist deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// PATCH /v1/checklist/start/{id}
pub async fn start(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let checklist = require_checklist(&state.pool, id).await?;
    ensure_can_start(checklist.status)?;

    let started = ChecklistRepo::start(&state.pool, id)
        .await?
        .ok_or_else(|| status_changed(id))?;

    tracing::info!(checklist_id = id, by = auth.user_id, "Checklist started");
    Ok(Json(DataResponse { data: started }))
}

/// PATCH /v1/checklist/close/{id}
pub async fn close(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let checklist = require_checklist(&state.pool, id).await?;
    ensure_can_close(checklist.status)?;

    let closed = ChecklistRepo::close(&state.pool, id)
        .await?
        .ok_or_else(|| status_changed(id))?;

    tracing::info!(checklist_id = id, by = auth.user_id, "Checklist closed");
    Ok(Json(DataResponse { data: closed }))
}

// ---------------------------------------------------------------------------
// Member views
// ---------------------------------------------------------------------------

/// GET /v1/checklist/active/{member_id}
///
/// The member's active checklist with absences deducted from the allowance.
/// The absence count is written back onto the checklist.
pub async fn active(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(member_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = require_member(&state.pool, member_id).await?;

    let mut checklist = ChecklistRepo::find_by_member_and_status(
        &state.pool,
        member_id,
        ChecklistStatus::Active,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Active checklist for member",
        id: member_id,
    }))?;

    let items = ListItemRepo::list_by_checklist(&state.pool, checklist.id).await?;
    let summary = summarize(member.allowance, items.iter().map(|i| (i.value, i.absence)));

    if summary.absence_count != checklist.absence_count {
        ChecklistRepo::set_absence_count(&state.pool, checklist.id, summary.absence_count)
            .await?;
        checklist.absence_count = summary.absence_count;
    }

    Ok(Json(DataResponse {
        data: ActiveChecklist {
            checklist,
            items,
            summary,
        },
    }))
}

/// GET /v1/checklist/closed/{member_id}/{order}
///
/// Closed checklists sorted by close date; `order` is `ascending` or `descending`.
pub async fn closed_history(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath((member_id, order)): AppPath<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let order = parse_order(&order)?;
    require_member(&state.pool, member_id).await?;

    let checklists = ChecklistRepo::list_closed_by_member(&state.pool, member_id, order).await?;
    Ok(Json(DataResponse { data: checklists }))
}
