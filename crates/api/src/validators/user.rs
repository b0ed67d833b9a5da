//! User request validation.

use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_core::validation::normalize_name;
use allowance_db::models::user::User;
use allowance_db::repositories::UserRepo;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::Violations;
use crate::error::{AppError, AppResult};
use crate::extract::{FieldKind, JsonShape, Payload};

/// Body of `POST /user` and `PUT /user/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UserRequest {
    #[serde(default)]
    #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: String,
}

/// A user request that passed validation. The password is still plaintext.
#[derive(Debug)]
pub struct ValidUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl JsonShape for UserRequest {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::String),
        ("email", FieldKind::String),
        ("password", FieldKind::String),
    ];
}

impl UserRequest {
    /// Every field is trimmed; the password is checked and hashed trimmed.
    fn normalized(mut self) -> Self {
        self.name = normalize_name(&self.name);
        self.email = self.email.trim().to_string();
        self.password = self.password.trim().to_string();
        self
    }
}

/// Validate a registration. Name and email must both be unused.
pub async fn validate_create(pool: &PgPool, payload: Payload<UserRequest>) -> AppResult<ValidUser> {
    let (input, shape) = payload.into_parts();
    let input = input.normalized();
    let mut violations = Violations::from_rules(&input).with_shape(shape);
    check_unique(pool, &input, None, &mut violations).await?;
    violations.into_result()?;

    Ok(ValidUser {
        name: input.name,
        email: input.email,
        password: input.password,
    })
}

/// Validate a full replacement of user `id`, returning the current row.
pub async fn validate_update(
    pool: &PgPool,
    id: DbId,
    payload: Payload<UserRequest>,
) -> AppResult<(User, ValidUser)> {
    let user = require_user(pool, id).await?;

    let (input, shape) = payload.into_parts();
    let input = input.normalized();
    let mut violations = Violations::from_rules(&input).with_shape(shape);
    check_unique(pool, &input, Some(id), &mut violations).await?;
    violations.into_result()?;

    let valid = ValidUser {
        name: input.name,
        email: input.email,
        password: input.password,
    };
    Ok((user, valid))
}

/// Load a user referenced by a path id, or 404.
pub async fn require_user(pool: &PgPool, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

async fn check_unique(
    pool: &PgPool,
    input: &UserRequest,
    ignore_id: Option<DbId>,
    violations: &mut Violations,
) -> AppResult<()> {
    if !violations.has("name") {
        if let Some(existing) = UserRepo::find_by_name(pool, &input.name).await? {
            if Some(existing.id) != ignore_id {
                violations.push("name", "A user with this name already exists");
            }
        }
    }
    if !violations.has("email") {
        if let Some(existing) = UserRepo::find_by_email(pool, &input.email).await? {
            if Some(existing.id) != ignore_id {
                violations.push("email", "A user with this email already exists");
            }
        }
    }
    Ok(())
}
