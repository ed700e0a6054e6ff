use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::core::database::Database;
use crate::core::error::{AppError, Result};
use crate::features::audit::models::AuditEntityType;
use crate::features::audit::AuditRecorder;
use crate::features::auth::model::{AuthenticatedUser, Capability};
use crate::features::users::dtos::{AdminUserQueryParams, UpdateProfileDto, UserProfileDto};
use crate::features::users::models::{UserQuery, UserRole};
use crate::shared::types::Paginate;
use crate::shared::validation::{is_valid_mobile, normalize_mobile};

/// User directory: profiles for their owners, roles and suspension for admins
pub struct UserService {
    db: Database,
    audit: Arc<AuditRecorder>,
}

impl UserService {
    pub fn new(db: Database, audit: Arc<AuditRecorder>) -> Self {
        Self { db, audit }
    }

    pub async fn profile(&self, actor: &AuthenticatedUser) -> Result<UserProfileDto> {
        self.db
            .fetch_user(actor.id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Replace the caller's name, email and mobile number
    pub async fn update_profile(
        &self,
        actor: &AuthenticatedUser,
        dto: UpdateProfileDto,
    ) -> Result<UserProfileDto> {
        let name = dto.name.trim();
        let email = dto.email.trim().to_lowercase();
        let mobile = normalize_mobile(dto.mobile_number.trim());

        if name.is_empty() || email.is_empty() || mobile.is_empty() {
            return Err(AppError::Validation(
                "Missing required fields: name, email, and mobile number are required".to_string(),
            ));
        }
        if !is_valid_mobile(&mobile) {
            return Err(AppError::Validation("Invalid mobile number format".to_string()));
        }

        let user = self
            .db
            .update_user_contact(actor.id, Some(name), &email, &mobile)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!("Profile updated: user_id={}", user.id);
        Ok(user.into())
    }

    // =========================================================================
    // ADMIN
    // =========================================================================

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        params: &AdminUserQueryParams,
    ) -> Result<(Vec<UserProfileDto>, i64)> {
        actor.authorize(Capability::Admin)?;

        let query = UserQuery {
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            offset: params.offset(),
            limit: params.limit(),
        };

        let (users, total) = self.db.list_users(&query).await?;
        Ok((users.into_iter().map(Into::into).collect(), total))
    }

    pub async fn set_role(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        role: UserRole,
    ) -> Result<UserProfileDto> {
        actor.authorize(Capability::Admin)?;

        let user = self
            .db
            .set_user_role(id, role)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!("User role changed: id={}, role={}, by={}", user.id, role, actor.id);
        self.audit.record(
            actor.id,
            "update_user_role",
            AuditEntityType::User,
            Some(user.id),
            json!({ "role": role }),
        );

        Ok(user.into())
    }

    /// Flag or unflag a user as suspended. The flag is informational only.
    pub async fn set_suspended(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        is_suspended: bool,
    ) -> Result<UserProfileDto> {
        actor.authorize(Capability::Admin)?;

        let user = self
            .db
            .set_user_suspended(id, is_suspended)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(
            "User suspension changed: id={}, is_suspended={}, by={}",
            user.id,
            is_suspended,
            actor.id
        );
        self.audit.record(
            actor.id,
            "suspend_user",
            AuditEntityType::User,
            Some(user.id),
            json!({ "isSuspended": is_suspended }),
        );

        Ok(user.into())
    }

    /// Delete a user along with their items, the matches on those items and
    /// their notifications.
    ///
    /// The user row goes first; the remaining cleanup is best-effort and
    /// only logged when it fails.
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        actor.authorize(Capability::Admin)?;

        let item_ids = self.db.item_ids_by_owner(id).await?;

        if !self.db.delete_user(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if let Err(e) = self.db.delete_matches_for_items(&item_ids).await {
            tracing::warn!("User deleted but match cleanup failed: id={}, error={}", id, e);
        }
        if let Err(e) = self.db.delete_items_by_owner(id).await {
            tracing::warn!("User deleted but item cleanup failed: id={}, error={}", id, e);
        }
        if let Err(e) = self.db.delete_notifications_for(id).await {
            tracing::warn!(
                "User deleted but notification cleanup failed: id={}, error={}",
                id,
                e
            );
        }

        tracing::info!(
            "User deleted: id={}, items={}, by={}",
            id,
            item_ids.len(),
            actor.id
        );
        self.audit.record(
            actor.id,
            "delete_user",
            AuditEntityType::User,
            Some(id),
            json!({}),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::items::models::ItemKind;
    use crate::features::matches::models::ItemMatch;
    use crate::features::notifications::models::Notification;
    use crate::shared::constants::NOTIFICATION_TYPE_GENERAL;
    use crate::shared::test_helpers::{as_actor, seed_item, seed_user, settle};

    fn service(db: &Database) -> UserService {
        UserService::new(db.clone(), Arc::new(AuditRecorder::new(db.clone())))
    }

    fn profile(name: &str, email: &str, mobile: &str) -> UpdateProfileDto {
        UpdateProfileDto {
            name: name.to_string(),
            email: email.to_string(),
            mobile_number: mobile.to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_profile_normalizes_contact() {
        let db = Database::reference();
        let user = seed_user(&db, UserRole::User).await;

        let updated = service(&db)
            .update_profile(
                &as_actor(&user),
                profile(" Ari Lane ", "Ari@Example.COM", "+1 555-010-2030"),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ari Lane");
        assert_eq!(updated.email, "ari@example.com");
        assert_eq!(updated.mobile_number, "+15550102030");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email_and_bad_mobile() {
        let db = Database::reference();
        let user = seed_user(&db, UserRole::User).await;
        let other = seed_user(&db, UserRole::User).await;
        let service = service(&db);

        let taken = service
            .update_profile(&as_actor(&user), profile("Ari", &other.email, "+15550100"))
            .await;
        assert!(matches!(taken, Err(AppError::Conflict(_))));

        let bad_mobile = service
            .update_profile(&as_actor(&user), profile("Ari", "ari@example.com", "call me"))
            .await;
        assert!(matches!(bad_mobile, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_role_and_suspension_are_audited() {
        let db = Database::reference();
        let admin = seed_user(&db, UserRole::Admin).await;
        let user = seed_user(&db, UserRole::User).await;
        let service = service(&db);

        let promoted = service
            .set_role(&as_actor(&admin), user.id, UserRole::Business)
            .await
            .unwrap();
        assert_eq!(promoted.role, UserRole::Business);

        let suspended = service
            .set_suspended(&as_actor(&admin), user.id, true)
            .await
            .unwrap();
        assert!(suspended.is_suspended);
        settle().await;

        let (logs, total) = db.list_audit_logs(0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert!(logs.iter().any(|l| l.action == "update_user_role"));
        assert!(logs.iter().any(|l| l.action == "suspend_user"));
    }

    #[tokio::test]
    async fn test_admin_operations_require_admin() {
        let db = Database::reference();
        let user = seed_user(&db, UserRole::User).await;
        let service = service(&db);

        let result = service.set_role(&as_actor(&user), user.id, UserRole::Admin).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(db.fetch_user(user.id).await.unwrap().unwrap().role, UserRole::User);

        let result = service.delete(&as_actor(&user), user.id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items_matches_and_notifications() {
        let db = Database::reference();
        let admin = seed_user(&db, UserRole::Admin).await;
        let leaving = seed_user(&db, UserRole::User).await;
        let staying = seed_user(&db, UserRole::User).await;
        let theirs = seed_item(&db, &leaving, ItemKind::Lost, "Camera").await;
        let kept = seed_item(&db, &staying, ItemKind::Found, "Camera").await;
        let (m, _) = db
            .insert_match_if_absent(&ItemMatch::new(theirs.id, kept.id, admin.id, None))
            .await
            .unwrap();
        db.insert_notifications(&[
            Notification::new(leaving.id, NOTIFICATION_TYPE_GENERAL, "Bye", None),
            Notification::new(staying.id, NOTIFICATION_TYPE_GENERAL, "Hi", None),
        ])
        .await
        .unwrap();

        service(&db).delete(&as_actor(&admin), leaving.id).await.unwrap();
        settle().await;

        assert!(db.fetch_user(leaving.id).await.unwrap().is_none());
        assert!(db.fetch_item(theirs.id).await.unwrap().is_none());
        assert!(db.fetch_item(kept.id).await.unwrap().is_some());
        assert!(db.fetch_match(m.id).await.unwrap().is_none());
        assert_eq!(db.list_notifications(None, 0, 10).await.unwrap().1, 1);

        let again = service(&db).delete(&as_actor(&admin), leaving.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_searches_name_and_email() {
        let db = Database::reference();
        let admin = seed_user(&db, UserRole::Admin).await;
        let target = seed_user(&db, UserRole::User).await;
        db.update_user_contact(target.id, Some("Quinn Zephyr"), &target.email, "+15550100")
            .await
            .unwrap();

        let params = AdminUserQueryParams {
            page: 1,
            page_size: 10,
            search: Some("zephyr".to_string()),
        };
        let (users, total) = service(&db).list(&as_actor(&admin), &params).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(users[0].id, target.id);
    }
}
