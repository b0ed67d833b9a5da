//! Checklist request validation.
//!
//! Items are validated individually; violations are reported with
//! `items[<index>].<field>` paths.

use std::collections::HashSet;

use allowance_core::checklist::{ensure_editable, HistoryOrder};
use allowance_core::error::CoreError;
use allowance_core::types::DbId;
use allowance_core::validation::normalize_name;
use allowance_db::models::checklist::{Checklist, CreateChecklist, UpdateChecklist};
use allowance_db::models::list_item::CreateListItem;
use allowance_db::repositories::{ChecklistRepo, MemberRepo, TaskRepo};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use super::Violations;
use crate::error::{AppError, AppResult};
use crate::extract::{FieldKind, JsonShape, Payload};

/// One chore line of a checklist request.
#[derive(Debug, Deserialize, Validate)]
pub struct ItemRequest {
    #[validate(required(message = "Task is required"))]
    pub task_id: Option<DbId>,
    #[validate(
        required(message = "Value is required"),
        range(min = 0.0, message = "Value must be zero or greater")
    )]
    pub value: Option<f64>,
}

/// Body of `POST /checklist`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChecklistRequest {
    #[validate(required(message = "Member is required"))]
    pub member_id: Option<DbId>,
    #[serde(default)]
    #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<ItemRequest>,
}

/// Body of `PUT /checklist/{id}`. The owning member cannot change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChecklistRequest {
    #[serde(default)]
    #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<ItemRequest>,
}

const ITEM_FIELDS: &[(&str, FieldKind)] = &[
    ("task_id", FieldKind::Integer),
    ("value", FieldKind::Number),
];

impl JsonShape for CreateChecklistRequest {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("member_id", FieldKind::Integer),
        ("name", FieldKind::String),
        ("items", FieldKind::List(ITEM_FIELDS)),
    ];
}

impl JsonShape for UpdateChecklistRequest {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::String),
        ("items", FieldKind::List(ITEM_FIELDS)),
    ];
}

/// Validate a new checklist: the member must exist and be active, and every
/// item must reference a task that is still in the catalog.
pub async fn validate_create(
    pool: &PgPool,
    payload: Payload<CreateChecklistRequest>,
) -> AppResult<(CreateChecklist, Vec<CreateListItem>)> {
    let (mut input, shape) = payload.into_parts();
    input.name = normalize_name(&input.name);
    let mut violations = Violations::from_rules(&input).with_shape(shape);

    if !violations.has("member_id") {
        if let Some(member_id) = input.member_id {
            match MemberRepo::find_by_id(pool, member_id).await? {
                None => violations.push("member_id", "Member not found"),
                Some(member) if !member.status => {
                    violations.push("member_id", "Member is inactive")
                }
                Some(_) => {}
            }
        }
    }
    check_items(pool, &input.items, &mut violations).await?;
    violations.into_result()?;

    let checklist = CreateChecklist {
        member_id: input.member_id.unwrap_or_default(),
        name: input.name,
    };
    Ok((checklist, to_list_items(&input.items)))
}

/// Validate an edit of checklist `id`, which must still be on hold.
pub async fn validate_update(
    pool: &PgPool,
    id: DbId,
    payload: Payload<UpdateChecklistRequest>,
) -> AppResult<(Checklist, UpdateChecklist, Vec<CreateListItem>)> {
    let checklist = require_checklist(pool, id).await?;
    ensure_editable(checklist.status)?;

    let (mut input, shape) = payload.into_parts();
    input.name = normalize_name(&input.name);
    let mut violations = Violations::from_rules(&input).with_shape(shape);
    check_items(pool, &input.items, &mut violations).await?;
    violations.into_result()?;

    let items = to_list_items(&input.items);
    Ok((checklist, UpdateChecklist { name: input.name }, items))
}

/// Load a checklist referenced by a path id, or 404.
pub async fn require_checklist(pool: &PgPool, id: DbId) -> AppResult<Checklist> {
    ChecklistRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Checklist",
            id,
        }))
}

/// Parse the `{order}` path segment of the history route.
pub fn parse_order(order: &str) -> Result<HistoryOrder, CoreError> {
    order.parse()
}

async fn check_items(
    pool: &PgPool,
    items: &[ItemRequest],
    violations: &mut Violations,
) -> AppResult<()> {
    if violations.has("items") {
        return Ok(());
    }
    if items.is_empty() {
        violations.push("items", "A checklist needs at least one item");
        return Ok(());
    }

    let requested: Vec<DbId> = items.iter().filter_map(|i| i.task_id).collect();
    let available: HashSet<DbId> = TaskRepo::find_available_ids(pool, &requested)
        .await?
        .into_iter()
        .collect();

    for (index, item) in items.iter().enumerate() {
        if let Some(task_id) = item.task_id {
            if !available.contains(&task_id) {
                violations.push(format!("items[{index}].task_id"), "Task not found");
            }
        }
    }
    Ok(())
}

fn to_list_items(items: &[ItemRequest]) -> Vec<CreateListItem> {
    items
        .iter()
        .map(|i| CreateListItem {
            task_id: i.task_id.unwrap_or_default(),
            value: i.value.unwrap_or_default(),
        })
        .collect()
}
