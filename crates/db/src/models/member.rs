//! Member entity model and DTOs.

use allowance_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub name: String,
    pub birthdate: NaiveDate,
    /// Base allowance before absence deductions.
    pub allowance: f64,
    /// Stored avatar filename, served from the upload directory.
    pub avatar: Option<String>,
    /// `false` once the member has been soft-deleted.
    pub status: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new member. The name is already normalized.
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub name: String,
    pub birthdate: NaiveDate,
    pub allowance: f64,
}

/// DTO for updating a member. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub allowance: Option<f64>,
}
