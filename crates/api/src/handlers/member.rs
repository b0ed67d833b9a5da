//! Handlers for the `/member` resource.
//!
//! Members are never hard-deleted: `DELETE` clears the `status` flag and
//! list queries hide inactive members unless `include_inactive=true`.

use std::path::Path;

use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_db::repositories::MemberRepo;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, Payload};
use crate::middleware::auth::AuthUser;
use crate::query::MemberListParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;
use crate::validators::member::{validate_create, validate_update, MemberRequest};
use crate::validators::require_member;

/// Largest accepted avatar, in bytes (2 MiB).
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Accepted avatar content types and the extension each is stored with.
const AVATAR_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpeg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
];

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /v1/member?limit=&offset=&include_inactive=false
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<MemberListParams>,
) -> AppResult<impl IntoResponse> {
    let rows = MemberRepo::list(
        &state.pool,
        params.include_inactive,
        params.limit,
        params.offset,
    )
    .await?;
    let count = MemberRepo::count(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse {
        data: Page { rows, count },
    }))
}

/// GET /v1/member/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = require_member(&state.pool, id).await?;
    Ok(Json(DataResponse { data: member }))
}

/// POST /v1/member
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    input: Payload<MemberRequest>,
) -> AppResult<impl IntoResponse> {
    let input = validate_create(&state.pool, input).await?;
    let member = MemberRepo::create(&state.pool, &input).await?;

    tracing::info!(member_id = member.id, by = auth.user_id, "Member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PUT /v1/member/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    input: Payload<MemberRequest>,
) -> AppResult<impl IntoResponse> {
    let (_current, update) = validate_update(&state.pool, id, input).await?;
    let member = MemberRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Member",
            id,
        }))?;

    tracing::info!(member_id = id, by = auth.user_id, "Member updated");
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /v1/member/{id}
///
/// Soft delete. Deleting an already inactive member is a no-op.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    require_member(&state.pool, id).await?;
    if MemberRepo::deactivate(&state.pool, id).await? {
        tracing::info!(member_id = id, by = auth.user_id, "Member deactivated");
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Avatar
// ---------------------------------------------------------------------------

/// POST /v1/member/{id}/avatar
///
/// Accepts a multipart form with a required `file` field (jpeg/jpg/png, at
/// most [`MAX_AVATAR_BYTES`]). The file is stored under the upload directory
/// with a random name and the member row records that name. A previous
/// avatar file is removed.
pub async fn upload_avatar(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let member = require_member(&state.pool, id).await?;

    let mut upload: Option<(&'static str, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or("").to_ascii_lowercase();
        let ext = avatar_extension(&content_type).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported file type '{content_type}'. Supported: jpeg, jpg, png"
            ))
        })?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.len() > MAX_AVATAR_BYTES {
            return Err(AppError::BadRequest(format!(
                "File exceeds the {MAX_AVATAR_BYTES} byte limit"
            )));
        }
        upload = Some((ext, data.to_vec()));
    }

    let (ext, data) =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let stored_filename = format!("{}.{ext}", Uuid::new_v4().simple());
    let file_path = state.config.upload_dir.join(&stored_filename);
    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    // The new file is removed again unless the row update lands.
    let updated = match MemberRepo::set_avatar(&state.pool, id, &stored_filename).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            remove_avatar_file(&file_path, id).await;
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Member",
                id,
            }));
        }
        Err(e) => {
            remove_avatar_file(&file_path, id).await;
            return Err(e.into());
        }
    };

    if let Some(previous) = member.avatar {
        remove_avatar_file(&state.config.upload_dir.join(previous), id).await;
    }

    tracing::info!(
        member_id = id,
        by = auth.user_id,
        file = %stored_filename,
        bytes = data.len(),
        "Avatar uploaded"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// Best-effort delete; a failure is logged and otherwise ignored.
async fn remove_avatar_file(path: &Path, member_id: DbId) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(member_id, file = %path.display(), error = %e, "Failed to remove avatar file");
    }
}

fn avatar_extension(content_type: &str) -> Option<&'static str> {
    AVATAR_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}
