use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::database::{contains_pattern, PostgresDb};
use crate::core::error::{AppError, Result};
use crate::features::items::models::{
    CategoryCount, Item, ItemFilter, ItemKind, ItemPatch, ItemTrends, KindBucketCount,
    ModerationStatus, ResolutionBucket, TrendPeriod,
};

use super::AbstractItems;

const ITEM_COLUMNS: &str = "id, user_id, kind, name, category, description, location, date, \
     image_base64, is_resolved, moderation_status, moderation_notes, created_at, updated_at";

/// Append the WHERE clause for a filter
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ItemFilter) {
    builder.push(" WHERE TRUE");

    if let Some(owner) = filter.owner {
        builder.push(" AND user_id = ").push_bind(owner);
    }
    if let Some(kind) = filter.kind {
        builder.push(" AND kind = ").push_bind(kind);
    }
    if let Some(status) = filter.moderation_status {
        builder.push(" AND moderation_status = ").push_bind(status);
    }
    if let Some(is_resolved) = filter.is_resolved {
        builder.push(" AND is_resolved = ").push_bind(is_resolved);
    }
    if let Some(ref location) = filter.location {
        builder
            .push(" AND location ILIKE ")
            .push_bind(contains_pattern(location))
            .push(r" ESCAPE '\'");
    }
    if let Some(ref search) = filter.search {
        let pattern = contains_pattern(search);
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR location ILIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
}

/// Bucket label expression for a period
fn bucket_expr(period: TrendPeriod) -> &'static str {
    match period {
        TrendPeriod::Month => "to_char(date_trunc('month', created_at), 'YYYY-MM')",
        TrendPeriod::Week => "to_char(date_trunc('week', created_at), 'IYYY-\"W\"IW')",
    }
}

#[async_trait]
impl AbstractItems for PostgresDb {
    async fn insert_item(&self, item: &Item) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items (
                id, user_id, kind, name, category, description, location, date,
                image_base64, is_resolved, moderation_status, moderation_notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(item.id)
        .bind(item.user_id)
        .bind(item.kind)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.description)
        .bind(&item.location)
        .bind(item.date)
        .bind(&item.image_base64)
        .bind(item.is_resolved)
        .bind(item.moderation_status)
        .bind(&item.moderation_notes)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert item: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn fetch_item(&self, id: Uuid) -> Result<Option<Item>> {
        let query = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch item: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn fetch_items(&self, ids: &[Uuid]) -> Result<Vec<Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {} FROM items WHERE id = ANY($1)", ITEM_COLUMNS);
        sqlx::query_as::<_, Item>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch items: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_items(&self, filter: &ItemFilter) -> Result<(Vec<Item>, i64)> {
        let total = self.count_items(filter).await?;

        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM items", ITEM_COLUMNS));
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let items = builder
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find items: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    async fn item_ids_by_owner(&self, owner: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar("SELECT id FROM items WHERE user_id = $1")
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_item(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        patch: &ItemPatch,
    ) -> Result<Option<Item>> {
        let query = format!(
            r#"
            UPDATE items SET
                kind = COALESCE($3, kind),
                name = COALESCE($4, name),
                category = COALESCE($5, category),
                description = COALESCE($6, description),
                location = COALESCE($7, location),
                date = COALESCE($8, date),
                image_base64 = COALESCE($9, image_base64),
                is_resolved = COALESCE($10, is_resolved),
                updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(owner)
            .bind(patch.kind)
            .bind(&patch.name)
            .bind(&patch.category)
            .bind(&patch.description)
            .bind(&patch.location)
            .bind(patch.date)
            .bind(&patch.image_base64)
            .bind(patch.is_resolved)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update item: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn moderate_item(
        &self,
        id: Uuid,
        status: ModerationStatus,
        notes: Option<&str>,
    ) -> Result<Option<Item>> {
        let query = format!(
            r#"
            UPDATE items
            SET moderation_status = $2, moderation_notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(status)
            .bind(notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_item(&self, id: Uuid) -> Result<Option<Item>> {
        let query = format!("DELETE FROM items WHERE id = $1 RETURNING {}", ITEM_COLUMNS);
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_items_by_owner(&self, owner: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar("DELETE FROM items WHERE user_id = $1 RETURNING id")
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_items(&self, filter: &ItemFilter) -> Result<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM items");
        push_filter(&mut builder, filter);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count items: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn item_trends(&self, period: TrendPeriod, buckets: i64) -> Result<ItemTrends> {
        let bucket = bucket_expr(period);
        let since = format!(
            "date_trunc('{0}', NOW()) - ($1::int - 1) * INTERVAL '1 {0}'",
            period.as_sql()
        );

        let by_kind_sql = format!(
            r#"
            SELECT {bucket} AS bucket, kind, COUNT(*) AS count
            FROM items
            WHERE created_at >= {since}
            GROUP BY 1, 2
            ORDER BY 1 DESC, 2
            "#
        );
        let by_kind = sqlx::query_as::<_, (String, ItemKind, i64)>(&by_kind_sql)
            .bind(buckets as i32)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to aggregate item kinds: {:?}", e);
                AppError::Database(e)
            })?
            .into_iter()
            .map(|(bucket, kind, count)| KindBucketCount { bucket, kind, count })
            .collect();

        let resolved_sql = format!(
            r#"
            SELECT {bucket} AS bucket,
                   COUNT(*) FILTER (WHERE is_resolved) AS resolved,
                   COUNT(*) AS total
            FROM items
            WHERE created_at >= {since}
            GROUP BY 1
            ORDER BY 1 DESC
            "#
        );
        let resolved = sqlx::query_as::<_, (String, i64, i64)>(&resolved_sql)
            .bind(buckets as i32)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to aggregate item resolution: {:?}", e);
                AppError::Database(e)
            })?
            .into_iter()
            .map(|(bucket, resolved, total)| ResolutionBucket {
                bucket,
                resolved,
                total,
            })
            .collect();

        let categories_sql = format!(
            r#"
            SELECT category, COUNT(*) AS count
            FROM items
            WHERE created_at >= {since} AND category IS NOT NULL AND category <> ''
            GROUP BY category
            ORDER BY count DESC, category
            LIMIT 10
            "#
        );
        let categories = sqlx::query_as::<_, (String, i64)>(&categories_sql)
            .bind(buckets as i32)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to aggregate item categories: {:?}", e);
                AppError::Database(e)
            })?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();

        Ok(ItemTrends {
            by_kind,
            resolved,
            categories,
        })
    }
}
