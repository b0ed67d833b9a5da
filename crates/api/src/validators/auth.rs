use serde::Deserialize;
use validator::Validate;

use super::Violations;
use crate::error::AppResult;
use crate::extract::{FieldKind, JsonShape, Payload};

/// Body of `POST /auth`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl JsonShape for LoginRequest {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("email", FieldKind::String),
        ("password", FieldKind::String),
    ];
}

/// Field rules only; credentials are checked by the handler.
pub fn validate_login(payload: Payload<LoginRequest>) -> AppResult<LoginRequest> {
    let (mut input, shape) = payload.into_parts();
    input.email = input.email.trim().to_string();
    Violations::from_rules(&input).with_shape(shape).into_result()?;
    Ok(input)
}
