//! List item (one chore assignment within a checklist) model and DTOs.

use allowance_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `list_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListItem {
    pub id: DbId,
    pub list_id: DbId,
    pub task_id: DbId,
    /// Amount deducted from the allowance when the item is marked absent.
    pub value: f64,
    pub absence: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A list item joined with its task description, for checklist views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListItemDetail {
    pub id: DbId,
    pub list_id: DbId,
    pub task_id: DbId,
    pub task_description: String,
    pub value: f64,
    pub absence: bool,
}

/// DTO for one item of a checklist create/update request.
#[derive(Debug, Clone)]
pub struct CreateListItem {
    pub task_id: DbId,
    pub value: f64,
}
