//! Repository for the `members` table.

use allowance_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use allowance_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member, UpdateMember};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, birthdate, allowance, avatar, status, created_at, updated_at";

/// Provides CRUD operations for members.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a new member, returning the created row. New members are active.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (name, birthdate, allowance) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&input.name)
            .bind(input.birthdate)
            .bind(input.allowance)
            .fetch_one(pool)
            .await
    }

    /// Find a member by internal ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a member by exact name (names are unique, including inactive members).
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE name = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List members ordered by name, optionally including soft-deleted ones.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM members \
             WHERE ($1 OR status = true) \
             ORDER BY name \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(include_inactive)
            .bind(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Count members matching the same filter as [`MemberRepo::list`].
    pub async fn count(pool: &PgPool, include_inactive: bool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*)::BIGINT FROM members WHERE ($1 OR status = true)")
                .bind(include_inactive)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Update a member. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET \
                name = COALESCE($2, name), \
                birthdate = COALESCE($3, birthdate), \
                allowance = COALESCE($4, allowance), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.birthdate)
            .bind(input.allowance)
            .fetch_optional(pool)
            .await
    }

    /// Record the stored avatar filename for a member.
    pub async fn set_avatar(
        pool: &PgPool,
        id: DbId,
        filename: &str,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET avatar = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(filename)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a member by setting `status = false`.
    ///
    /// Returns `true` if an active row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE members SET status = false, updated_at = NOW() \
             WHERE id = $1 AND status = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
