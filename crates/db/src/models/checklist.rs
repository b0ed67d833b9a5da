//! Checklist entity model and DTOs.

use allowance_core::checklist::ChecklistStatus;
use allowance_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `checklists` table.
///
/// `status_id` is decoded into [`ChecklistStatus`] and serialized by name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Checklist {
    pub id: DbId,
    pub member_id: DbId,
    pub name: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: ChecklistStatus,
    pub start_date: Option<Timestamp>,
    pub close_date: Option<Timestamp>,
    /// Number of absent items as of the last allowance computation.
    pub absence_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a checklist together with its items.
#[derive(Debug, Clone)]
pub struct CreateChecklist {
    pub member_id: DbId,
    pub name: String,
}

/// DTO for editing an on-hold checklist.
#[derive(Debug, Clone)]
pub struct UpdateChecklist {
    pub name: String,
}
