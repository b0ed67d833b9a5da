//! Member request validation.

use allowance_core::types::DbId;
use allowance_core::validation::{normalize_name, parse_birthdate, validate_birthdate};
use allowance_db::models::member::{CreateMember, Member, UpdateMember};
use allowance_db::repositories::MemberRepo;
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::{require_member, Violations};
use crate::error::AppResult;
use crate::extract::{FieldKind, JsonShape, Payload};

/// Body of `POST /member` and `PUT /member/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct MemberRequest {
    #[serde(default)]
    #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
    pub name: String,
    /// `dd/mm/yyyy`.
    #[serde(default)]
    #[validate(custom(function = "validate_birthdate"))]
    pub birthdate: String,
    #[validate(
        required(message = "Allowance is required"),
        range(min = 0.0, message = "Allowance must be zero or greater")
    )]
    pub allowance: Option<f64>,
}

impl JsonShape for MemberRequest {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::String),
        ("birthdate", FieldKind::String),
        ("allowance", FieldKind::Number),
    ];
}

impl MemberRequest {
    fn normalized(mut self) -> Self {
        self.name = normalize_name(&self.name);
        self.birthdate = self.birthdate.trim().to_string();
        self
    }
}

/// Validate a new member. The name must not be taken by any member,
/// active or not.
pub async fn validate_create(
    pool: &PgPool,
    payload: Payload<MemberRequest>,
) -> AppResult<CreateMember> {
    let (input, shape) = payload.into_parts();
    let input = input.normalized();
    let mut violations = Violations::from_rules(&input).with_shape(shape);
    check_name_free(pool, &input.name, None, &mut violations).await?;
    violations.into_result()?;

    let (birthdate, allowance) = parsed(&input);
    Ok(CreateMember {
        name: input.name,
        birthdate,
        allowance,
    })
}

/// Validate a full replacement of member `id`, returning the current row
/// as the reference.
pub async fn validate_update(
    pool: &PgPool,
    id: DbId,
    payload: Payload<MemberRequest>,
) -> AppResult<(Member, UpdateMember)> {
    let member = require_member(pool, id).await?;

    let (input, shape) = payload.into_parts();
    let input = input.normalized();
    let mut violations = Violations::from_rules(&input).with_shape(shape);
    check_name_free(pool, &input.name, Some(id), &mut violations).await?;
    violations.into_result()?;

    let (birthdate, allowance) = parsed(&input);
    let update = UpdateMember {
        name: Some(input.name),
        birthdate: Some(birthdate),
        allowance: Some(allowance),
    };
    Ok((member, update))
}

async fn check_name_free(
    pool: &PgPool,
    name: &str,
    ignore_id: Option<DbId>,
    violations: &mut Violations,
) -> AppResult<()> {
    if violations.has("name") {
        return Ok(());
    }
    if let Some(existing) = MemberRepo::find_by_name(pool, name).await? {
        if Some(existing.id) != ignore_id {
            violations.push("name", "A member with this name already exists");
        }
    }
    Ok(())
}

/// Typed fields of an input that already passed its rules.
fn parsed(input: &MemberRequest) -> (NaiveDate, f64) {
    let birthdate = parse_birthdate(&input.birthdate).unwrap_or(NaiveDate::MIN);
    (birthdate, input.allowance.unwrap_or_default())
}
