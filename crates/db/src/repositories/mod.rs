//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod checklist_repo;
pub mod list_item_repo;
pub mod member_repo;
pub mod task_repo;
pub mod user_repo;

pub use checklist_repo::ChecklistRepo;
pub use list_item_repo::ListItemRepo;
pub use member_repo::MemberRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
