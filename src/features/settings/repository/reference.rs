use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::core::database::ReferenceDb;
use crate::core::error::Result;
use crate::features::settings::models::Setting;

use super::AbstractSettings;

#[async_trait]
impl AbstractSettings for ReferenceDb {
    async fn list_settings(&self) -> Result<Vec<Setting>> {
        let settings = self.settings.lock().await;
        Ok(settings.values().cloned().collect())
    }

    async fn upsert_settings(&self, entries: &[(String, Value)]) -> Result<()> {
        let mut settings = self.settings.lock().await;
        let now = Utc::now();

        for (key, value) in entries {
            settings
                .entry(key.clone())
                .and_modify(|s| {
                    s.value = value.clone();
                    s.updated_at = now;
                })
                .or_insert_with(|| Setting {
                    key: key.clone(),
                    value: value.clone(),
                    created_at: now,
                    updated_at: now,
                });
        }

        Ok(())
    }
}
