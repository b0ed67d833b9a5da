//! Repository for the `checklists` table.
//!
//! Writes that touch both a checklist and its items run in a single
//! transaction so a checklist is never left with a partial item set.

use allowance_core::checklist::{ChecklistStatus, HistoryOrder};
use allowance_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use allowance_core::types::DbId;
use sqlx::PgPool;

use crate::models::checklist::{Checklist, CreateChecklist, UpdateChecklist};
use crate::models::list_item::CreateListItem;
use crate::repositories::ListItemRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, member_id, name, status_id, start_date, close_date, \
    absence_count, created_at, updated_at";

/// Provides CRUD and lifecycle operations for checklists.
pub struct ChecklistRepo;

impl ChecklistRepo {
    /// Insert a checklist (status `onHold`) and all of its items atomically.
    pub async fn create_with_items(
        pool: &PgPool,
        input: &CreateChecklist,
        items: &[CreateListItem],
    ) -> Result<Checklist, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO checklists (member_id, name, status_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let checklist = sqlx::query_as::<_, Checklist>(&query)
            .bind(input.member_id)
            .bind(&input.name)
            .bind(ChecklistStatus::OnHold.id())
            .fetch_one(&mut *tx)
            .await?;

        ListItemRepo::insert_batch(&mut tx, checklist.id, items).await?;

        tx.commit().await?;
        Ok(checklist)
    }

    /// Find a checklist by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Checklist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM checklists WHERE id = $1");
        sqlx::query_as::<_, Checklist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List checklists, newest first, optionally filtered by member.
    pub async fn list(
        pool: &PgPool,
        member_id: Option<DbId>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Checklist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checklists \
             WHERE ($1::BIGINT IS NULL OR member_id = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(member_id)
            .bind(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Count checklists matching the same filter as [`ChecklistRepo::list`].
    pub async fn count(pool: &PgPool, member_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)::BIGINT FROM checklists \
             WHERE ($1::BIGINT IS NULL OR member_id = $1)",
        )
        .bind(member_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Find a member's checklist in the given status, most recent first.
    pub async fn find_by_member_and_status(
        pool: &PgPool,
        member_id: DbId,
        status: ChecklistStatus,
    ) -> Result<Option<Checklist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checklists \
             WHERE member_id = $1 AND status_id = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(member_id)
            .bind(status.id())
            .fetch_optional(pool)
            .await
    }

    /// Find a member's checklist that is not yet closed, if any.
    pub async fn find_open_by_member(
        pool: &PgPool,
        member_id: DbId,
    ) -> Result<Option<Checklist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checklists \
             WHERE member_id = $1 AND status_id <> $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(member_id)
            .bind(ChecklistStatus::Closed.id())
            .fetch_optional(pool)
            .await
    }

    /// A member's closed checklists ordered by close date.
    pub async fn list_closed_by_member(
        pool: &PgPool,
        member_id: DbId,
        order: HistoryOrder,
    ) -> Result<Vec<Checklist>, sqlx::Error> {
        let direction = order.sql();
        let query = format!(
            "SELECT {COLUMNS} FROM checklists \
             WHERE member_id = $1 AND status_id = $2 \
             ORDER BY close_date {direction}, id {direction}"
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(member_id)
            .bind(ChecklistStatus::Closed.id())
            .fetch_all(pool)
            .await
    }

    /// Rename a checklist and replace its whole item set atomically.
    ///
    /// Only applies while the checklist is on hold. Returns `None` if the
    /// checklist does not exist or has left `onHold`.
    pub async fn update_with_items(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChecklist,
        items: &[CreateListItem],
    ) -> Result<Option<Checklist>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE checklists SET name = $2, updated_at = NOW() \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        let Some(checklist) = sqlx::query_as::<_, Checklist>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(ChecklistStatus::OnHold.id())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        ListItemRepo::delete_by_checklist(&mut tx, id).await?;
        ListItemRepo::insert_batch(&mut tx, id, items).await?;

        tx.commit().await?;
        Ok(Some(checklist))
    }

    /// Delete an on-hold checklist together with its items.
    ///
    /// Returns `true` if the checklist was removed.
    pub async fn delete_with_items(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM checklists WHERE id = $1 AND status_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(ChecklistStatus::OnHold.id())
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Ok(false);
        }

        ListItemRepo::delete_by_checklist(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM checklists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move `onHold -> active` and stamp `start_date`.
    ///
    /// Returns `None` if the checklist is not currently on hold.
    pub async fn start(pool: &PgPool, id: DbId) -> Result<Option<Checklist>, sqlx::Error> {
        let query = format!(
            "UPDATE checklists SET status_id = $2, start_date = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(id)
            .bind(ChecklistStatus::Active.id())
            .bind(ChecklistStatus::OnHold.id())
            .fetch_optional(pool)
            .await
    }

    /// Move `active -> closed` and stamp `close_date`.
    ///
    /// Returns `None` if the checklist is not currently active.
    pub async fn close(pool: &PgPool, id: DbId) -> Result<Option<Checklist>, sqlx::Error> {
        let query = format!(
            "UPDATE checklists SET status_id = $2, close_date = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(id)
            .bind(ChecklistStatus::Closed.id())
            .bind(ChecklistStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// Persist the absence count computed for the allowance summary.
    pub async fn set_absence_count(
        pool: &PgPool,
        id: DbId,
        absence_count: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE checklists SET absence_count = $2 \
             WHERE id = $1 AND absence_count <> $2",
        )
        .bind(id)
        .bind(absence_count)
        .execute(pool)
        .await?;
        Ok(())
    }
}
