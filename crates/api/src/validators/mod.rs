//! Request validators, one module per resource.
//!
//! A validator runs the request DTO's declarative rules, then the
//! database-backed checks (referenced rows exist, unique fields are free).
//! Every failing field is collected into a single
//! [`CoreError::Validation`]; nothing is written unless all checks pass.
//! On success it returns the write DTO plus any rows it loaded.

pub mod auth;
pub mod checklist;
pub mod member;
pub mod task;
pub mod user;

use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_core::validation::{collect_violations, FieldViolation};
use allowance_db::models::member::Member;
use allowance_db::repositories::MemberRepo;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Accumulates field violations across rule and database checks.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Start from the declarative `#[validate(...)]` rules of `input`.
    pub fn from_rules<T: Validate>(input: &T) -> Self {
        match input.validate() {
            Ok(()) => Self::default(),
            Err(errors) => Self(collect_violations(&errors)),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    /// Merge JSON type violations found while extracting the body. Rule
    /// violations at or below a wrong-typed path are dropped: the field was
    /// removed before deserializing, so they only repeat the type error.
    pub fn with_shape(mut self, shape: Vec<FieldViolation>) -> Self {
        self.0
            .retain(|rule| !shape.iter().any(|typed| is_within(&rule.field, &typed.field)));
        self.0.extend(shape);
        self
    }

    /// Whether `field` already failed, so dependent checks can be skipped.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    pub fn into_result(mut self) -> Result<(), CoreError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            self.0.sort_by(|a, b| a.field.cmp(&b.field));
            Err(CoreError::Validation(self.0))
        }
    }
}

/// `field` is `path` itself or nested under it (`path.x`, `path[0]`).
fn is_within(field: &str, path: &str) -> bool {
    match field.strip_prefix(path) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}

/// Load a member referenced by a path id, or 404.
pub async fn require_member(pool: &PgPool, id: DbId) -> AppResult<Member> {
    MemberRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Member",
            id,
        }))
}
