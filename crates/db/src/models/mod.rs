//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) applied with `COALESCE`

pub mod checklist;
pub mod list_item;
pub mod member;
pub mod task;
pub mod user;
