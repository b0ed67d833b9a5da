//! Task (chore catalog) model and DTOs.

use allowance_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub description: String,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub description: String,
}
