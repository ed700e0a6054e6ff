use async_trait::async_trait;
use serde_json::Value;

use crate::core::database::PostgresDb;
use crate::core::error::{AppError, Result};
use crate::features::settings::models::Setting;

use super::AbstractSettings;

#[async_trait]
impl AbstractSettings for PostgresDb {
    async fn list_settings(&self) -> Result<Vec<Setting>> {
        sqlx::query_as::<_, Setting>(
            "SELECT key, value, created_at, updated_at FROM settings ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list settings: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn upsert_settings(&self, entries: &[(String, Value)]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO settings (key, value)
                VALUES ($1, $2)
                ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert setting {}: {:?}", key, e);
                AppError::Database(e)
            })?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
