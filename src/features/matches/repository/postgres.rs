use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::core::database::PostgresDb;
use crate::core::error::{AppError, Result};
use crate::features::matches::models::{ItemMatch, MatchMessage, MatchStatus, MatchStatusChange};

use super::AbstractMatches;

const MATCH_COLUMNS: &str = "id, item_a_id, item_b_id, created_by, status, notes, admin_notes, \
     resolved_by, resolved_at, messages, created_at, updated_at";

#[async_trait]
impl AbstractMatches for PostgresDb {
    async fn insert_match_if_absent(&self, candidate: &ItemMatch) -> Result<(ItemMatch, bool)> {
        let insert = format!(
            r#"
            INSERT INTO matches (
                id, item_a_id, item_b_id, created_by, status, notes, admin_notes,
                resolved_by, resolved_at, messages, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (item_a_id, item_b_id) DO NOTHING
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );

        let inserted = sqlx::query_as::<_, ItemMatch>(&insert)
            .bind(candidate.id)
            .bind(candidate.item_a_id)
            .bind(candidate.item_b_id)
            .bind(candidate.created_by)
            .bind(candidate.status)
            .bind(&candidate.notes)
            .bind(&candidate.admin_notes)
            .bind(candidate.resolved_by)
            .bind(candidate.resolved_at)
            .bind(&candidate.messages)
            .bind(candidate.created_at)
            .bind(candidate.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert match: {:?}", e);
                AppError::Database(e)
            })?;

        if let Some(created) = inserted {
            return Ok((created, true));
        }

        let existing = format!(
            "SELECT {} FROM matches WHERE item_a_id = $1 AND item_b_id = $2",
            MATCH_COLUMNS
        );
        let found = sqlx::query_as::<_, ItemMatch>(&existing)
            .bind(candidate.item_a_id)
            .bind(candidate.item_b_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load existing match: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((found, false))
    }

    async fn fetch_match(&self, id: Uuid) -> Result<Option<ItemMatch>> {
        let query = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch match: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_matches_for_items(&self, item_ids: &[Uuid], limit: i64) -> Result<Vec<ItemMatch>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            r#"
            SELECT {}
            FROM matches
            WHERE item_a_id = ANY($1) OR item_b_id = ANY($1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(item_ids)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find matches for items: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_matches(
        &self,
        status: Option<MatchStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ItemMatch>, i64)> {
        let total = self.count_matches(status).await?;

        let query = format!(
            r#"
            SELECT {}
            FROM matches
            WHERE ($1::match_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            MATCH_COLUMNS
        );
        let matches = sqlx::query_as::<_, ItemMatch>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list matches: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((matches, total))
    }

    async fn update_match_status(
        &self,
        id: Uuid,
        expected: MatchStatus,
        change: &MatchStatusChange,
    ) -> Result<Option<ItemMatch>> {
        let query = format!(
            r#"
            UPDATE matches SET
                status = $3,
                admin_notes = COALESCE($4, admin_notes),
                resolved_by = COALESCE($5, resolved_by),
                resolved_at = COALESCE($6, resolved_at),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(id)
            .bind(expected)
            .bind(change.status)
            .bind(&change.admin_notes)
            .bind(change.resolved_by)
            .bind(change.resolved_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update match status: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn append_match_message(
        &self,
        id: Uuid,
        message: &MatchMessage,
    ) -> Result<Option<ItemMatch>> {
        let query = format!(
            r#"
            UPDATE matches
            SET messages = messages || jsonb_build_array($2::jsonb), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );
        sqlx::query_as::<_, ItemMatch>(&query)
            .bind(id)
            .bind(Json(message))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to append match message: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn delete_matches_for_items(&self, item_ids: &[Uuid]) -> Result<u64> {
        if item_ids.is_empty() {
            return Ok(0);
        }

        let result =
            sqlx::query("DELETE FROM matches WHERE item_a_id = ANY($1) OR item_b_id = ANY($1)")
                .bind(item_ids)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete matches for items: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(result.rows_affected())
    }

    async fn count_matches(&self, status: Option<MatchStatus>) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM matches WHERE ($1::match_status IS NULL OR status = $1)")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
