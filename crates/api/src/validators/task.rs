//! Task (chore catalog) request validation.

use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_db::models::task::{CreateTask, Task, UpdateTask};
use allowance_db::repositories::TaskRepo;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::Violations;
use crate::error::{AppError, AppResult};
use crate::extract::{FieldKind, JsonShape, Payload};

/// Body of `POST /task` and `PUT /task/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[serde(default)]
    #[validate(length(min = 10, message = "Description must have at least 10 characters"))]
    pub description: String,
}

impl JsonShape for TaskRequest {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[("description", FieldKind::String)];
}

pub async fn validate_create(
    pool: &PgPool,
    payload: Payload<TaskRequest>,
) -> AppResult<CreateTask> {
    let (mut input, shape) = payload.into_parts();
    input.description = input.description.trim().to_string();
    let mut violations = Violations::from_rules(&input).with_shape(shape);
    check_description_free(pool, &input.description, None, &mut violations).await?;
    violations.into_result()?;

    Ok(CreateTask {
        description: input.description,
    })
}

pub async fn validate_update(
    pool: &PgPool,
    id: DbId,
    payload: Payload<TaskRequest>,
) -> AppResult<(Task, UpdateTask)> {
    let task = require_task(pool, id).await?;

    let (mut input, shape) = payload.into_parts();
    input.description = input.description.trim().to_string();
    let mut violations = Violations::from_rules(&input).with_shape(shape);
    check_description_free(pool, &input.description, Some(id), &mut violations).await?;
    violations.into_result()?;

    Ok((
        task,
        UpdateTask {
            description: input.description,
        },
    ))
}

/// Load a task referenced by a path id, or 404. Deleted tasks count as missing.
pub async fn require_task(pool: &PgPool, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(pool, id)
        .await?
        .filter(|task| !task.is_deleted)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}

/// Descriptions are unique across the whole catalog, deleted tasks included.
async fn check_description_free(
    pool: &PgPool,
    description: &str,
    ignore_id: Option<DbId>,
    violations: &mut Violations,
) -> AppResult<()> {
    if violations.has("description") {
        return Ok(());
    }
    if let Some(existing) = TaskRepo::find_by_description(pool, description).await? {
        if Some(existing.id) != ignore_id {
            violations.push("description", "A task with this description already exists");
        }
    }
    Ok(())
}
