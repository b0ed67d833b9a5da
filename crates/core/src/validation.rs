//! Field-level validation rules and the violation type reported to clients.
//!
//! Request DTOs declare their rules with `#[derive(validator::Validate)]`;
//! the helpers here cover the rules that need custom code (birthdates,
//! name normalisation) and flatten `validator` output into a flat list of
//! [`FieldViolation`]s.

use std::borrow::Cow;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Wire format for birthdates (`dd/mm/yyyy`).
pub const BIRTHDATE_FORMAT: &str = "%d/%m/%Y";

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten `validator` errors into field violations, sorted by field path.
///
/// Nested structs produce `parent.child` paths and lists produce
/// `items[2].value` paths.
pub fn collect_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    flatten_into(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn flatten_into(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            format!("{field}")
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    out.push(FieldViolation::new(path.clone(), error_message(err)));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_into(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_into(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

fn error_message(err: &ValidationError) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value ({})", err.code),
    }
}

/// Build a `validator` error with a human-readable message.
pub fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Trim a name and upper-case its first character.
///
/// Applied to member, user and checklist names before they are stored.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a `dd/mm/yyyy` birthdate.
pub fn parse_birthdate(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), BIRTHDATE_FORMAT).ok()
}

/// `validator` custom rule: a real `dd/mm/yyyy` calendar date, not in the future.
pub fn validate_birthdate(value: &str) -> Result<(), ValidationError> {
    let date = parse_birthdate(value)
        .ok_or_else(|| rule_error("birthdate", "Birthdate must be a valid dd/mm/yyyy date"))?;
    if date > Utc::now().date_naive() {
        return Err(rule_error("birthdate", "Birthdate cannot be in the future"));
    }
    Ok(())
}
