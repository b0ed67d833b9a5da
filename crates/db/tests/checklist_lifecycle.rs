//! Checklist repository against a real database:
//! - Transactional create / update / delete with items
//! - Conditional status transitions
//! - Closed history ordering

use allowance_core::checklist::{ChecklistStatus, HistoryOrder};
use allowance_db::models::checklist::{CreateChecklist, UpdateChecklist};
use allowance_db::models::list_item::CreateListItem;
use allowance_db::models::member::CreateMember;
use allowance_db::models::task::CreateTask;
use allowance_db::repositories::{ChecklistRepo, ListItemRepo, MemberRepo, TaskRepo};
use chrono::NaiveDate;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    member_id: i64,
    task_ids: Vec<i64>,
}

async fn seed(pool: &PgPool) -> Fixture {
    let member = MemberRepo::create(
        pool,
        &CreateMember {
            name: "Alice".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2015, 1, 2).unwrap(),
            allowance: 100.0,
        },
    )
    .await
    .unwrap();

    let mut task_ids = Vec::new();
    for description in ["Wash the dishes", "Clean the bedroom"] {
        let task = TaskRepo::create(
            pool,
            &CreateTask {
                description: description.to_string(),
            },
        )
        .await
        .unwrap();
        task_ids.push(task.id);
    }

    Fixture {
        member_id: member.id,
        task_ids,
    }
}

fn items(fx: &Fixture, values: &[f64]) -> Vec<CreateListItem> {
    fx.task_ids
        .iter()
        .zip(values)
        .map(|(&task_id, &value)| CreateListItem { task_id, value })
        .collect()
}

fn new_checklist(fx: &Fixture, name: &str) -> CreateChecklist {
    CreateChecklist {
        member_id: fx.member_id,
        name: name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_items(pool: PgPool) {
    let fx = seed(&pool).await;
    let checklist =
        ChecklistRepo::create_with_items(&pool, &new_checklist(&fx, "Week 1"), &items(&fx, &[20.0, 10.0]))
            .await
            .unwrap();

    assert_eq!(checklist.status, ChecklistStatus::OnHold);
    assert!(checklist.start_date.is_none());
    assert!(checklist.close_date.is_none());
    assert_eq!(checklist.absence_count, 0);

    let listed = ListItemRepo::list_by_checklist(&pool, checklist.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].task_description, "Wash the dishes");
    assert_eq!(listed[0].value, 20.0);
    assert!(listed.iter().all(|i| !i.absence));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rolls_back_on_bad_item(pool: PgPool) {
    let fx = seed(&pool).await;
    let bad = vec![
        CreateListItem {
            task_id: fx.task_ids[0],
            value: 5.0,
        },
        CreateListItem {
            task_id: 999_999,
            value: 5.0,
        },
    ];
    let result = ChecklistRepo::create_with_items(&pool, &new_checklist(&fx, "Broken"), &bad).await;
    assert!(result.is_err());

    assert_eq!(ChecklistRepo::count(&pool, Some(fx.member_id)).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_items(pool: PgPool) {
    let fx = seed(&pool).await;
    let checklist =
        ChecklistRepo::create_with_items(&pool, &new_checklist(&fx, "Week 1"), &items(&fx, &[20.0, 10.0]))
            .await
            .unwrap();

    let replacement = vec![CreateListItem {
        task_id: fx.task_ids[1],
        value: 7.5,
    }];
    let updated = ChecklistRepo::update_with_items(
        &pool,
        checklist.id,
        &UpdateChecklist {
            name: "Week 1 revised".to_string(),
        },
        &replacement,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Week 1 revised");

    let listed = ListItemRepo::list_by_checklist(&pool, checklist.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].task_id, fx.task_ids[1]);
    assert_eq!(listed[0].value, 7.5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transitions_are_conditional(pool: PgPool) {
    let fx = seed(&pool).await;
    let checklist =
        ChecklistRepo::create_with_items(&pool, &new_checklist(&fx, "Week 1"), &items(&fx, &[1.0]))
            .await
            .unwrap();

    // Cannot close before starting.
    assert!(ChecklistRepo::close(&pool, checklist.id).await.unwrap().is_none());

    let started = ChecklistRepo::start(&pool, checklist.id).await.unwrap().unwrap();
    assert_eq!(started.status, ChecklistStatus::Active);
    assert!(started.start_date.is_some());

    // Second start is rejected; edits and deletes no longer apply.
    assert!(ChecklistRepo::start(&pool, checklist.id).await.unwrap().is_none());
    assert!(ChecklistRepo::update_with_items(
        &pool,
        checklist.id,
        &UpdateChecklist {
            name: "Too late".to_string(),
        },
        &[],
    )
    .await
    .unwrap()
    .is_none());
    assert!(!ChecklistRepo::delete_with_items(&pool, checklist.id).await.unwrap());

    let open = ChecklistRepo::find_by_member_and_status(&pool, fx.member_id, ChecklistStatus::Active)
        .await
        .unwrap();
    assert_eq!(open.map(|c| c.id), Some(checklist.id));

    let closed = ChecklistRepo::close(&pool, checklist.id).await.unwrap().unwrap();
    assert_eq!(closed.status, ChecklistStatus::Closed);
    assert!(closed.close_date.is_some());
    assert!(ChecklistRepo::find_open_by_member(&pool, fx.member_id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_removes_items(pool: PgPool) {
    let fx = seed(&pool).await;
    let checklist =
        ChecklistRepo::create_with_items(&pool, &new_checklist(&fx, "Week 1"), &items(&fx, &[1.0, 2.0]))
            .await
            .unwrap();
    let item_id = ListItemRepo::list_by_checklist(&pool, checklist.id)
        .await
        .unwrap()[0]
        .id;

    assert!(ChecklistRepo::delete_with_items(&pool, checklist.id).await.unwrap());
    assert!(ChecklistRepo::find_by_id(&pool, checklist.id).await.unwrap().is_none());
    assert!(ListItemRepo::find_by_id(&pool, item_id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_absent_and_absence_count(pool: PgPool) {
    let fx = seed(&pool).await;
    let checklist =
        ChecklistRepo::create_with_items(&pool, &new_checklist(&fx, "Week 1"), &items(&fx, &[3.0]))
            .await
            .unwrap();
    let item = &ListItemRepo::list_by_checklist(&pool, checklist.id)
        .await
        .unwrap()[0];

    let marked = ListItemRepo::mark_absent(&pool, item.id).await.unwrap().unwrap();
    assert!(marked.absence);
    // Idempotent.
    let again = ListItemRepo::mark_absent(&pool, item.id).await.unwrap().unwrap();
    assert!(again.absence);

    ChecklistRepo::set_absence_count(&pool, checklist.id, 1).await.unwrap();
    let reloaded = ChecklistRepo::find_by_id(&pool, checklist.id).await.unwrap().unwrap();
    assert_eq!(reloaded.absence_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_closed_history_order(pool: PgPool) {
    let fx = seed(&pool).await;
    let mut ids = Vec::new();
    for name in ["First", "Second", "Third"] {
        let c = ChecklistRepo::create_with_items(&pool, &new_checklist(&fx, name), &items(&fx, &[1.0]))
            .await
            .unwrap();
        ChecklistRepo::start(&pool, c.id).await.unwrap().unwrap();
        ChecklistRepo::close(&pool, c.id).await.unwrap().unwrap();
        ids.push(c.id);
    }
    // An open checklist never shows up in the history.
    ChecklistRepo::create_with_items(&pool, &new_checklist(&fx, "Open"), &items(&fx, &[1.0]))
        .await
        .unwrap();

    let asc = ChecklistRepo::list_closed_by_member(&pool, fx.member_id, HistoryOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(asc.iter().map(|c| c.id).collect::<Vec<_>>(), ids);

    let desc = ChecklistRepo::list_closed_by_member(&pool, fx.member_id, HistoryOrder::Descending)
        .await
        .unwrap();
    let mut reversed = ids.clone();
    reversed.reverse();
    assert_eq!(desc.iter().map(|c| c.id).collect::<Vec<_>>(), reversed);
}
