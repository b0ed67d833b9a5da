//! Shared query parameter types for API handlers.

use allowance_core::types::DbId;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Pagination plus the `include_inactive` flag for soft-deleted members.
#[derive(Debug, Default, Deserialize)]
pub struct MemberListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// Pagination plus an optional member filter for checklists.
#[derive(Debug, Default, Deserialize)]
pub struct ChecklistListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub member_id: Option<DbId>,
}
