use std::sync::Arc;

use serde_json::json;

use crate::core::database::Database;
use crate::core::error::Result;
use crate::features::audit::models::AuditEntityType;
use crate::features::audit::AuditRecorder;
use crate::features::auth::model::{AuthenticatedUser, Capability};
use crate::features::settings::dtos::UpdateSettingsDto;
use crate::features::settings::models::Setting;

/// Service for admin-managed key/value settings
pub struct SettingService {
    db: Database,
    audit: Arc<AuditRecorder>,
}

impl SettingService {
    pub fn new(db: Database, audit: Arc<AuditRecorder>) -> Self {
        Self { db, audit }
    }

    pub async fn list(&self) -> Result<Vec<Setting>> {
        self.db.list_settings().await
    }

    /// Upsert every entry and return the full, key-sorted list
    pub async fn upsert(
        &self,
        actor: &AuthenticatedUser,
        dto: UpdateSettingsDto,
    ) -> Result<Vec<Setting>> {
        actor.authorize(Capability::Admin)?;

        let keys: Vec<String> = dto.settings.iter().map(|s| s.key.clone()).collect();
        let entries: Vec<_> = dto
            .settings
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect();

        self.db.upsert_settings(&entries).await?;

        tracing::info!("Settings updated: keys={:?}, by={}", keys, actor.id);
        self.audit.record(
            actor.id,
            "update_settings",
            AuditEntityType::Setting,
            None,
            json!({ "keys": keys }),
        );

        self.db.list_settings().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::settings::dtos::SettingEntryDto;
    use crate::shared::test_helpers::{admin_user, regular_user};

    fn entry(key: &str, value: serde_json::Value) -> SettingEntryDto {
        SettingEntryDto {
            key: key.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_sorts() {
        let db = Database::reference();
        let service = SettingService::new(db.clone(), Arc::new(AuditRecorder::new(db)));
        let admin = admin_user();

        service
            .upsert(
                &admin,
                UpdateSettingsDto {
                    settings: vec![entry("site_name", json!("Campus L&F")), entry("auto_approve", json!(true))],
                },
            )
            .await
            .unwrap();

        let settings = service
            .upsert(
                &admin,
                UpdateSettingsDto {
                    settings: vec![entry("auto_approve", json!(false))],
                },
            )
            .await
            .unwrap();

        let keys: Vec<&str> = settings.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["auto_approve", "site_name"]);
        assert_eq!(settings[0].value, json!(false));
    }

    #[tokio::test]
    async fn test_upsert_requires_admin() {
        let db = Database::reference();
        let service = SettingService::new(db.clone(), Arc::new(AuditRecorder::new(db)));

        let result = service
            .upsert(
                &regular_user(),
                UpdateSettingsDto {
                    settings: vec![entry("site_name", json!("x"))],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(service.list().await.unwrap().is_empty());
    }
}
