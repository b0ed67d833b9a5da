//! Checklist lifecycle: `onHold -> active -> closed`.
//!
//! Status ids match the `checklist_statuses` seed data (1-based SMALLINT).
//! Transitions only move forward; `closed` is terminal.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::FieldViolation;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChecklistStatus {
    /// Created, not yet started. The only state that allows edits and deletes.
    OnHold = 1,
    /// Started; list items can be marked absent.
    Active = 2,
    /// Terminal, read-only.
    Closed = 3,
}

impl ChecklistStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Wire name, as serialized.
    pub fn name(self) -> &'static str {
        match self {
            ChecklistStatus::OnHold => "onHold",
            ChecklistStatus::Active => "active",
            ChecklistStatus::Closed => "closed",
        }
    }

    /// Whether the checklist still counts as the member's open checklist.
    pub fn is_open(self) -> bool {
        !matches!(self, ChecklistStatus::Closed)
    }
}

impl From<ChecklistStatus> for StatusId {
    fn from(value: ChecklistStatus) -> Self {
        value as StatusId
    }
}

impl TryFrom<StatusId> for ChecklistStatus {
    type Error = CoreError;

    fn try_from(value: StatusId) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ChecklistStatus::OnHold),
            2 => Ok(ChecklistStatus::Active),
            3 => Ok(ChecklistStatus::Closed),
            other => Err(CoreError::Internal(format!(
                "Unknown checklist status id {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Transition guards
// ---------------------------------------------------------------------------

/// Edits (name or items) are only allowed before the checklist starts.
pub fn ensure_editable(status: ChecklistStatus) -> Result<(), CoreError> {
    require(
        status,
        ChecklistStatus::OnHold,
        "Only checklists on hold can be edited",
    )
}

/// Deletes are only allowed before the checklist starts.
pub fn ensure_deletable(status: ChecklistStatus) -> Result<(), CoreError> {
    require(
        status,
        ChecklistStatus::OnHold,
        "Only checklists on hold can be deleted",
    )
}

/// `onHold -> active`.
pub fn ensure_can_start(status: ChecklistStatus) -> Result<(), CoreError> {
    require(
        status,
        ChecklistStatus::OnHold,
        "Only checklists on hold can be started",
    )
}

/// `active -> closed`.
pub fn ensure_can_close(status: ChecklistStatus) -> Result<(), CoreError> {
    require(
        status,
        ChecklistStatus::Active,
        "Only active checklists can be closed",
    )
}

/// Absences are recorded only while the checklist is running.
pub fn ensure_accepts_absences(status: ChecklistStatus) -> Result<(), CoreError> {
    require(
        status,
        ChecklistStatus::Active,
        "Absences can only be marked on active checklists",
    )
}

fn require(
    actual: ChecklistStatus,
    expected: ChecklistStatus,
    message: &str,
) -> Result<(), CoreError> {
    if actual == expected {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "{message} (current status: {actual})"
        )))
    }
}

// ---------------------------------------------------------------------------
// History ordering
// ---------------------------------------------------------------------------

/// Sort direction for the closed-checklist history, by close date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryOrder {
    Ascending,
    Descending,
}

impl HistoryOrder {
    /// SQL keyword for `ORDER BY`.
    pub fn sql(self) -> &'static str {
        match self {
            HistoryOrder::Ascending => "ASC",
            HistoryOrder::Descending => "DESC",
        }
    }
}

impl std::str::FromStr for HistoryOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(HistoryOrder::Ascending),
            "descending" => Ok(HistoryOrder::Descending),
            _ => Err(CoreError::Validation(vec![FieldViolation::new(
                "order",
                "Order must be 'ascending' or 'descending'",
            )])),
        }
    }
}
