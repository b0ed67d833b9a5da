//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers run the matching validator, apply lifecycle guards, delegate to
//! the repositories in `allowance_db` and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod checklist;
pub mod list_item;
pub mod member;
pub mod task;
pub mod user;
