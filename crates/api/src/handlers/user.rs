//! Handlers for the `/user` resource.
//!
//! Registration is public; every other operation requires a token.

use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_db::models::user::{CreateUser, UpdateUser, UserResponse};
use allowance_db::repositories::UserRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, Payload};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;
use crate::validators::user::{require_user, validate_create, validate_update, UserRequest};

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// GET /v1/user?limit=&offset=
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool, params.limit, params.offset).await?;
    let count = UserRepo::count(&state.pool).await?;
    let rows: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse {
        data: Page { rows, count },
    }))
}

/// GET /v1/user/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = require_user(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// POST /v1/user
///
/// Register a new user. Public.
pub async fn create(
    State(state): State<AppState>,
    input: Payload<UserRequest>,
) -> AppResult<impl IntoResponse> {
    let valid = validate_create(&state.pool, input).await?;

    let input = CreateUser {
        name: valid.name,
        email: valid.email,
        password_hash: hash(&valid.password)?,
    };
    let user = UserRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// PUT /v1/user/{id}
///
/// Replace name, email and password. The password is re-hashed.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    input: Payload<UserRequest>,
) -> AppResult<impl IntoResponse> {
    let (_current, valid) = validate_update(&state.pool, id, input).await?;

    let input = UpdateUser {
        name: Some(valid.name),
        email: Some(valid.email),
        password_hash: Some(hash(&valid.password)?),
    };
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, by = auth.user_id, "User updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// DELETE /v1/user/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    tracing::info!(user_id = id, by = auth.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
