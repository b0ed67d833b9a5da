//! Repository for the `list_items` table.

use allowance_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::list_item::{CreateListItem, ListItem, ListItemDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, list_id, task_id, value, absence, created_at, updated_at";

/// Provides access to checklist items.
///
/// Bulk writes take a `&mut PgConnection` so they can run inside the
/// checklist repository's transactions.
pub struct ListItemRepo;

impl ListItemRepo {
    /// Find a list item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ListItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM list_items WHERE id = $1");
        sqlx::query_as::<_, ListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a checklist's items joined with their task descriptions.
    pub async fn list_by_checklist(
        pool: &PgPool,
        list_id: DbId,
    ) -> Result<Vec<ListItemDetail>, sqlx::Error> {
        sqlx::query_as::<_, ListItemDetail>(
            "SELECT li.id, li.list_id, li.task_id, t.description AS task_description, \
                    li.value, li.absence \
             FROM list_items li \
             JOIN tasks t ON t.id = li.task_id \
             WHERE li.list_id = $1 \
             ORDER BY li.id",
        )
        .bind(list_id)
        .fetch_all(pool)
        .await
    }

    /// Flag an item as absent (the chore was missed).
    ///
    /// Returns `None` if the item does not exist.
    pub async fn mark_absent(pool: &PgPool, id: DbId) -> Result<Option<ListItem>, sqlx::Error> {
        let query = format!(
            "UPDATE list_items SET absence = true, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert all `items` for a checklist in a single statement.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        list_id: DbId,
        items: &[CreateListItem],
    ) -> Result<u64, sqlx::Error> {
        if items.is_empty() {
            return Ok(0);
        }
        let task_ids: Vec<DbId> = items.iter().map(|i| i.task_id).collect();
        let values: Vec<f64> = items.iter().map(|i| i.value).collect();

        let result = sqlx::query(
            "INSERT INTO list_items (list_id, task_id, value) \
             SELECT $1, t.task_id, t.value \
             FROM UNNEST($2::BIGINT[], $3::DOUBLE PRECISION[]) AS t(task_id, value)",
        )
        .bind(list_id)
        .bind(&task_ids)
        .bind(&values)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete every item of a checklist.
    pub async fn delete_by_checklist(
        conn: &mut PgConnection,
        list_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM list_items WHERE list_id = $1")
            .bind(list_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
