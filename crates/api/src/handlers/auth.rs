//! Handler for the `/auth` resource (login).

use allowance_core::error::CoreError;
use allowance_db::models::user::UserResponse;
use allowance_db::repositories::UserRepo;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::Payload;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::validators::auth::{validate_login, LoginRequest};

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /v1/auth
///
/// Authenticate with email + password and return a bearer token.
pub async fn login(
    State(state): State<AppState>,
    input: Payload<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let input = validate_login(input)?;

    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        ))
    };

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(invalid());
    }

    let token = generate_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(DataResponse {
        data: AuthResponse {
            token,
            expires_in: state.config.jwt.expiry_secs(),
            user: user.into(),
        },
    }))
}
