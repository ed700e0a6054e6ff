use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::core::database::Database;
use crate::core::error::{AppError, Result};
use crate::features::audit::models::AuditEntityType;
use crate::features::audit::AuditRecorder;
use crate::features::auth::model::{AuthenticatedUser, Capability};
use crate::features::items::dtos::{
    AdminItemQueryParams, AdminItemResponseDto, BrowseItemsQuery, CreateItemDto,
    ItemResponseDto, ItemStatusFilter, ModerateItemDto, UpdateItemDto,
};
use crate::features::items::models::{Item, ItemFilter, ItemPatch, ModerationStatus};
use crate::features::users::models::UserSummary;
use crate::shared::constants::BROWSE_LIMIT;
use crate::shared::types::Paginate;
use crate::shared::validation::{is_valid_mobile, normalize_mobile};

/// Trim a string and drop it when nothing is left
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Item Store: lost and found reports, their moderation and resolution
pub struct ItemService {
    db: Database,
    audit: Arc<AuditRecorder>,
}

impl ItemService {
    pub fn new(db: Database, audit: Arc<AuditRecorder>) -> Self {
        Self { db, audit }
    }

    /// Report a lost or found item.
    ///
    /// Contact details given with the report replace those on the reporter's
    /// profile. A reporter with no email or mobile number on either is rejected.
    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        dto: CreateItemDto,
    ) -> Result<ItemResponseDto> {
        let name = non_blank(dto.name.as_deref());
        let location = non_blank(dto.location.as_deref());
        let (Some(kind), Some(name), Some(location), Some(date)) =
            (dto.kind, name, location, dto.date)
        else {
            return Err(AppError::Validation(
                "Missing required fields: type, name, location and date are required".to_string(),
            ));
        };

        let owner = self
            .db
            .fetch_user(actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let submitted_email = non_blank(dto.email.as_deref()).map(|e| e.to_lowercase());
        let submitted_mobile = non_blank(dto.mobile_number.as_deref()).map(|m| normalize_mobile(&m));

        if let Some(ref mobile) = submitted_mobile {
            if !is_valid_mobile(mobile) {
                return Err(AppError::Validation("Invalid mobile number format".to_string()));
            }
        }

        let email = submitted_email
            .clone()
            .or_else(|| owner.contact_email().map(str::to_string));
        let mobile = submitted_mobile
            .clone()
            .or_else(|| non_blank(Some(owner.mobile_number.as_str())));

        let (Some(email), Some(mobile)) = (email, mobile) else {
            return Err(AppError::Validation(
                "Email and mobile number are required for reporting items.".to_string(),
            ));
        };

        if submitted_email.is_some() || submitted_mobile.is_some() {
            self.db
                .update_user_contact(owner.id, None, &email, &mobile)
                .await?;
            tracing::info!("Contact details updated from item report: user_id={}", owner.id);
        }

        let now = Utc::now();
        let item = Item {
            id: Uuid::now_v7(),
            user_id: owner.id,
            kind,
            name,
            category: non_blank(dto.category.as_deref()),
            description: non_blank(dto.description.as_deref()),
            location,
            date,
            image_base64: non_blank(dto.image_base64.as_deref()),
            is_resolved: false,
            moderation_status: ModerationStatus::default(),
            moderation_notes: None,
            created_at: now,
            updated_at: now,
        };

        self.db.insert_item(&item).await?;

        tracing::info!(
            "Item created: id={}, kind={}, owner={}",
            item.id,
            item.kind,
            item.user_id
        );

        Ok(item.into())
    }

    /// Edit an item the caller owns
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateItemDto,
    ) -> Result<ItemResponseDto> {
        let patch = ItemPatch {
            kind: dto.kind,
            name: non_blank(dto.name.as_deref()),
            category: dto.category.map(|c| c.trim().to_string()),
            description: dto.description.map(|d| d.trim().to_string()),
            location: non_blank(dto.location.as_deref()),
            date: dto.date,
            image_base64: dto.image_base64,
            is_resolved: dto.is_resolved,
        };

        let item = self
            .db
            .update_item(id, Some(actor.id), &patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        tracing::info!("Item updated: id={}, owner={}", item.id, actor.id);
        Ok(item.into())
    }

    /// Mark an item the caller owns as resolved. Repeating this is harmless.
    pub async fn resolve(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<ItemResponseDto> {
        let item = self
            .db
            .update_item(id, Some(actor.id), &ItemPatch::resolved(true))
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        tracing::info!("Item resolved: id={}, owner={}", item.id, actor.id);
        Ok(item.into())
    }

    /// The caller's own items, newest first, whatever their moderation status
    pub async fn list_mine(&self, actor: &AuthenticatedUser) -> Result<Vec<ItemResponseDto>> {
        let filter = ItemFilter {
            owner: Some(actor.id),
            limit: i64::MAX,
            ..Default::default()
        };
        let (items, _) = self.db.find_items(&filter).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Public browse over approved items, newest first
    pub async fn browse(&self, query: BrowseItemsQuery) -> Result<Vec<ItemResponseDto>> {
        let filter = ItemFilter {
            kind: query.kind,
            location: non_blank(query.location.as_deref()),
            search: non_blank(query.q.as_deref()),
            moderation_status: Some(ModerationStatus::Approved),
            limit: BROWSE_LIMIT,
            ..Default::default()
        };
        let (items, _) = self.db.find_items(&filter).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Public read of a single approved item
    pub async fn get(&self, id: Uuid) -> Result<ItemResponseDto> {
        self.db
            .fetch_item(id)
            .await?
            .filter(Item::is_public)
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    // =========================================================================
    // ADMIN
    // =========================================================================

    /// Attach owner summaries to a batch of items
    async fn with_owners(&self, items: Vec<Item>) -> Result<Vec<AdminItemResponseDto>> {
        let mut owner_ids: Vec<Uuid> = items.iter().map(|i| i.user_id).collect();
        owner_ids.sort();
        owner_ids.dedup();

        let owners: HashMap<Uuid, UserSummary> = self
            .db
            .fetch_users(&owner_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| AdminItemResponseDto {
                owner: owners.get(&item.user_id).cloned(),
                item: item.into(),
            })
            .collect())
    }

    /// Paginated admin listing over every item
    pub async fn admin_list(
        &self,
        actor: &AuthenticatedUser,
        params: &AdminItemQueryParams,
    ) -> Result<(Vec<AdminItemResponseDto>, i64)> {
        actor.authorize(Capability::Admin)?;

        let filter = ItemFilter {
            kind: params.kind,
            is_resolved: params.status.map(|s| s == ItemStatusFilter::Resolved),
            moderation_status: params.moderation_status,
            search: non_blank(params.search.as_deref()),
            offset: params.offset(),
            limit: params.limit(),
            ..Default::default()
        };

        let (items, total) = self.db.find_items(&filter).await?;
        Ok((self.with_owners(items).await?, total))
    }

    pub async fn admin_get(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<AdminItemResponseDto> {
        actor.authorize(Capability::Admin)?;

        let item = self
            .db
            .fetch_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        self.admin_view(item).await
    }

    /// Open or close any item
    pub async fn set_resolved(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        is_resolved: bool,
    ) -> Result<AdminItemResponseDto> {
        actor.authorize(Capability::Admin)?;

        let item = self
            .db
            .update_item(id, None, &ItemPatch::resolved(is_resolved))
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        tracing::info!(
            "Item status set: id={}, is_resolved={}, by={}",
            item.id,
            is_resolved,
            actor.id
        );
        self.audit.record(
            actor.id,
            "update_item_status",
            AuditEntityType::Item,
            Some(item.id),
            json!({ "isResolved": is_resolved }),
        );

        self.admin_view(item).await
    }

    /// Set an item's moderation status and notes
    pub async fn moderate(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: ModerateItemDto,
    ) -> Result<AdminItemResponseDto> {
        actor.authorize(Capability::Admin)?;

        let status: ModerationStatus = dto
            .moderation_status
            .parse()
            .map_err(|_| AppError::Validation("Invalid moderation status".to_string()))?;

        let item = self
            .db
            .moderate_item(id, status, dto.moderation_notes.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        tracing::info!("Item moderated: id={}, status={}, by={}", item.id, status, actor.id);
        self.audit.record(
            actor.id,
            "moderate_item",
            AuditEntityType::Item,
            Some(item.id),
            json!({ "moderationStatus": status }),
        );

        self.admin_view(item).await
    }

    /// Delete an item and every match that references it.
    ///
    /// The match cleanup runs after the item is gone; if it fails the deletion
    /// still stands and the failure is logged.
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        actor.authorize(Capability::Admin)?;

        let item = self
            .db
            .delete_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        match self.db.delete_matches_for_items(&[item.id]).await {
            Ok(removed) => tracing::info!(
                "Item deleted: id={}, matches_removed={}, by={}",
                item.id,
                removed,
                actor.id
            ),
            Err(e) => tracing::warn!(
                "Item deleted but match cleanup failed: id={}, error={}",
                item.id,
                e
            ),
        }

        self.audit.record(
            actor.id,
            "delete_item",
            AuditEntityType::Item,
            Some(item.id),
            json!({}),
        );

        Ok(())
    }

    async fn admin_view(&self, item: Item) -> Result<AdminItemResponseDto> {
        self.with_owners(vec![item])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Item lost while attaching owner".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::items::models::ItemKind;
    use crate::features::matches::models::ItemMatch;
    use crate::features::users::models::UserRole;
    use crate::shared::test_helpers::{as_actor, seed_item, seed_user, settle};
    use chrono::NaiveDate;

    fn service(db: &Database) -> ItemService {
        ItemService::new(db.clone(), Arc::new(AuditRecorder::new(db.clone())))
    }

    fn wallet_report() -> CreateItemDto {
        CreateItemDto {
            kind: Some(ItemKind::Lost),
            name: Some("Brown wallet".to_string()),
            location: Some("Central Library".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 3, 14),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_approved_and_open() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;

        let item = service(&db)
            .create(&as_actor(&owner), wallet_report())
            .await
            .unwrap();

        assert_eq!(item.moderation_status, ModerationStatus::Approved);
        assert!(!item.is_resolved);
        assert_eq!(item.user_id, owner.id);
    }

    #[tokio::test]
    async fn test_create_requires_core_fields() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let service = service(&db);

        for dto in [
            CreateItemDto { kind: None, ..wallet_report() },
            CreateItemDto { name: Some("   ".into()), ..wallet_report() },
            CreateItemDto { location: None, ..wallet_report() },
            CreateItemDto { date: None, ..wallet_report() },
        ] {
            let result = service.create(&as_actor(&owner), dto).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_create_requires_contact_from_profile_or_submission() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        db.update_user_contact(owner.id, None, &owner.email, "").await.unwrap();
        let service = service(&db);

        let missing = service.create(&as_actor(&owner), wallet_report()).await;
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let supplied = CreateItemDto {
            mobile_number: Some("+1 (555) 010-2030".to_string()),
            ..wallet_report()
        };
        service.create(&as_actor(&owner), supplied).await.unwrap();

        let refreshed = db.fetch_user(owner.id).await.unwrap().unwrap();
        assert_eq!(refreshed.mobile_number, "+15550102030");
    }

    #[tokio::test]
    async fn test_update_and_resolve_are_owner_only() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let stranger = seed_user(&db, UserRole::User).await;
        let item = seed_item(&db, &owner, ItemKind::Lost, "Umbrella").await;
        let service = service(&db);

        let dto = UpdateItemDto {
            location: Some("Bus stop 12".to_string()),
            ..Default::default()
        };
        let denied = service.update(&as_actor(&stranger), item.id, dto.clone()).await;
        assert!(matches!(denied, Err(AppError::NotFound(_))));

        let updated = service.update(&as_actor(&owner), item.id, dto).await.unwrap();
        assert_eq!(updated.location, "Bus stop 12");
        assert_eq!(updated.name, "Umbrella");

        assert!(service.resolve(&as_actor(&stranger), item.id).await.is_err());
        assert!(service.resolve(&as_actor(&owner), item.id).await.unwrap().is_resolved);
        assert!(service.resolve(&as_actor(&owner), item.id).await.unwrap().is_resolved);
    }

    #[tokio::test]
    async fn test_browse_hides_unapproved_and_filters() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let admin = seed_user(&db, UserRole::Admin).await;
        let keys = seed_item(&db, &owner, ItemKind::Found, "Car keys").await;
        let phone = seed_item(&db, &owner, ItemKind::Lost, "Phone").await;
        let service = service(&db);

        service
            .moderate(
                &as_actor(&admin),
                phone.id,
                ModerateItemDto {
                    moderation_status: "rejected".to_string(),
                    moderation_notes: Some("Duplicate".to_string()),
                },
            )
            .await
            .unwrap();

        let all = service.browse(BrowseItemsQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, keys.id);

        let by_kind = service
            .browse(BrowseItemsQuery {
                kind: Some(ItemKind::Lost),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(by_kind.is_empty());

        assert!(matches!(service.get(phone.id).await, Err(AppError::NotFound(_))));
        assert_eq!(service.get(keys.id).await.unwrap().name, "Car keys");
    }

    #[tokio::test]
    async fn test_moderate_rejects_unknown_status() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let admin = seed_user(&db, UserRole::Admin).await;
        let item = seed_item(&db, &owner, ItemKind::Lost, "Scarf").await;

        let result = service(&db)
            .moderate(
                &as_actor(&admin),
                item.id,
                ModerateItemDto {
                    moderation_status: "archived".to_string(),
                    moderation_notes: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_matches() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let admin = seed_user(&db, UserRole::Admin).await;
        let lost = seed_item(&db, &owner, ItemKind::Lost, "Watch").await;
        let found = seed_item(&db, &owner, ItemKind::Found, "Watch").await;
        let other = seed_item(&db, &owner, ItemKind::Found, "Strap").await;

        let (doomed, _) = db
            .insert_match_if_absent(&ItemMatch::new(lost.id, found.id, admin.id, None))
            .await
            .unwrap();
        let (survivor, _) = db
            .insert_match_if_absent(&ItemMatch::new(found.id, other.id, admin.id, None))
            .await
            .unwrap();

        service(&db).delete(&as_actor(&admin), lost.id).await.unwrap();
        settle().await;

        assert!(db.fetch_item(lost.id).await.unwrap().is_none());
        assert!(db.fetch_match(doomed.id).await.unwrap().is_none());
        assert!(db.fetch_match(survivor.id).await.unwrap().is_some());

        let (logs, _) = db.list_audit_logs(0, 10).await.unwrap();
        assert_eq!(logs[0].action, "delete_item");
    }

    #[tokio::test]
    async fn test_admin_operations_forbidden_for_users() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let item = seed_item(&db, &owner, ItemKind::Lost, "Bag").await;
        let service = service(&db);

        let result = service.delete(&as_actor(&owner), item.id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(db.fetch_item(item.id).await.unwrap().is_some());

        let result = service.set_resolved(&as_actor(&owner), item.id, true).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_list_attaches_owner() {
        let db = Database::reference();
        let owner = seed_user(&db, UserRole::User).await;
        let admin = seed_user(&db, UserRole::Admin).await;
        seed_item(&db, &owner, ItemKind::Lost, "Laptop").await;
        let closed = seed_item(&db, &owner, ItemKind::Found, "Charger").await;
        let service = service(&db);

        service.set_resolved(&as_actor(&admin), closed.id, true).await.unwrap();

        let params = AdminItemQueryParams {
            page: 1,
            page_size: 10,
            kind: None,
            status: Some(ItemStatusFilter::Open),
            moderation_status: None,
            search: None,
        };
        let (items, total) = service.admin_list(&as_actor(&admin), &params).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(items[0].item.name, "Laptop");
        assert_eq!(items[0].owner.as_ref().unwrap().id, owner.id);
    }
}
