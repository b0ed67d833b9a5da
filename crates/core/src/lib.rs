//! Domain logic for the allowance tracker.
//!
//! Everything here is pure: no database or HTTP types, so both the
//! repository layer and the API handlers can share it.

pub mod allowance;
pub mod checklist;
pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;
