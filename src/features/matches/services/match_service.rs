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
use crate::features::items::models::Item;
use crate::features::matches::dtos::{
    AdminMatchQueryParams, AppendMessageDto, CreateMatchDto, MatchItemDto, MatchResponseDto,
    SendMatchEmailDto, UpdateMatchStatusDto,
};
use crate::features::matches::models::{ItemMatch, MatchMessage, MatchStatus, MatchStatusChange};
use crate::features::notifications::dtos::DispatchReport;
use crate::features::notifications::services::{EmailTemplate, Notice, NotificationDispatcher};
use crate::features::users::models::UserSummary;
use crate::shared::constants::{
    MATCH_CREATED_MESSAGE, MATCH_MESSAGE_MAX_LEN, MY_MATCHES_LIMIT, NOTIFICATION_TYPE_MATCH,
};
use crate::shared::types::Paginate;

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Match Engine: candidate pairings of a lost and a found item and their lifecycle
pub struct MatchService {
    db: Database,
    dispatcher: Arc<NotificationDispatcher>,
    audit: Arc<AuditRecorder>,
}

impl MatchService {
    pub fn new(
        db: Database,
        dispatcher: Arc<NotificationDispatcher>,
        audit: Arc<AuditRecorder>,
    ) -> Self {
        Self {
            db,
            dispatcher,
            audit,
        }
    }

    /// Propose a match between two items.
    ///
    /// Idempotent on the unordered pair: when a match already exists it is
    /// returned unchanged with `false` and nobody is notified. A new match
    /// notifies both owners; a notification failure is logged, not returned.
    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        dto: CreateMatchDto,
    ) -> Result<(MatchResponseDto, bool)> {
        if dto.item_a_id == dto.item_b_id {
            return Err(AppError::Validation("Items must be different".to_string()));
        }

        let items = self.db.fetch_items(&[dto.item_a_id, dto.item_b_id]).await?;
        if items.len() < 2 {
            return Err(AppError::NotFound(
                "One or both items not found".to_string(),
            ));
        }

        let candidate = ItemMatch::new(
            dto.item_a_id,
            dto.item_b_id,
            actor.id,
            non_blank(dto.notes.as_deref()),
        );
        let (stored, created) = self.db.insert_match_if_absent(&candidate).await?;

        if !created {
            tracing::info!(
                "Match already exists: id={}, requested_by={}",
                stored.id,
                actor.id
            );
            return Ok((self.describe_one(stored).await?, false));
        }

        tracing::info!(
            "Match created: id={}, items=({}, {}), by={}",
            stored.id,
            stored.item_a_id,
            stored.item_b_id,
            actor.id
        );

        let owners: Vec<Uuid> = items.iter().map(|i| i.user_id).collect();
        let notice = Notice {
            kind: NOTIFICATION_TYPE_MATCH.to_string(),
            message: MATCH_CREATED_MESSAGE.to_string(),
            meta: Some(json!({ "matchId": stored.id })),
            email: Some(EmailTemplate::Match {
                status: stored.status,
                created_at: stored.created_at,
                notes: stored.notes.clone(),
                custom_message: None,
            }),
        };
        match self.dispatcher.notify(&owners, &notice).await {
            Ok(report) => tracing::info!(
                "Match owners notified: id={}, notifications={}, emails_sent={}",
                stored.id,
                report.notifications_created,
                report.emails_sent
            ),
            Err(e) => tracing::warn!(
                "Match created but owners were not notified: id={}, error={}",
                stored.id,
                e
            ),
        }

        Ok((self.describe_one(stored).await?, true))
    }

    /// Admin entry point for [`MatchService::create`]; new matches are audited
    pub async fn admin_create(
        &self,
        actor: &AuthenticatedUser,
        dto: CreateMatchDto,
    ) -> Result<(MatchResponseDto, bool)> {
        actor.authorize(Capability::Admin)?;

        let (view, created) = self.create(actor, dto).await?;
        if created {
            self.audit.record(
                actor.id,
                "create_match",
                AuditEntityType::Match,
                Some(view.id),
                json!({ "itemAId": view.item_a_id, "itemBId": view.item_b_id }),
            );
        }

        Ok((view, created))
    }

    /// Move a match along its lifecycle.
    ///
    /// Only `pending -> confirmed | rejected` and `confirmed -> resolved` are
    /// accepted. Repeating the current status only updates the admin notes.
    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateMatchStatusDto,
    ) -> Result<MatchResponseDto> {
        actor.authorize(Capability::Admin)?;

        let current = self.fetch(id).await?;
        let (from, to) = (current.status, dto.status);

        if from != to && from.is_terminal() {
            return Err(AppError::Validation(format!(
                "Match is already {} and its status can no longer change",
                from
            )));
        }
        if from != to && !from.can_transition_to(to) {
            return Err(AppError::Validation(format!(
                "Cannot change match status from {} to {}",
                from, to
            )));
        }

        let entering_resolved = from != to && to == MatchStatus::Resolved;
        let change = MatchStatusChange {
            status: to,
            admin_notes: non_blank(dto.admin_notes.as_deref()),
            resolved_by: entering_resolved.then_some(actor.id),
            resolved_at: entering_resolved.then(Utc::now),
        };

        let Some(updated) = self.db.update_match_status(id, from, &change).await? else {
            // Either deleted or moved on since it was read
            return match self.db.fetch_match(id).await? {
                None => Err(AppError::NotFound("Match not found".to_string())),
                Some(_) => Err(AppError::Conflict(
                    "Match status was changed by someone else, reload and try again".to_string(),
                )),
            };
        };

        tracing::info!(
            "Match status updated: id={}, {} -> {}, by={}",
            updated.id,
            from,
            to,
            actor.id
        );
        self.audit.record(
            actor.id,
            "update_match_status",
            AuditEntityType::Match,
            Some(updated.id),
            json!({ "status": to, "previousStatus": from }),
        );

        self.describe_one(updated).await
    }

    /// Matches involving any item the caller owns, newest first
    pub async fn list_for_user(&self, actor: &AuthenticatedUser) -> Result<Vec<MatchResponseDto>> {
        let item_ids = self.db.item_ids_by_owner(actor.id).await?;
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self
            .db
            .find_matches_for_items(&item_ids, MY_MATCHES_LIMIT)
            .await?;
        self.describe(matches).await
    }

    pub async fn list_all(
        &self,
        actor: &AuthenticatedUser,
        params: &AdminMatchQueryParams,
    ) -> Result<(Vec<MatchResponseDto>, i64)> {
        actor.authorize(Capability::Admin)?;

        let (matches, total) = self
            .db
            .list_matches(params.status, params.offset(), params.limit())
            .await?;
        Ok((self.describe(matches).await?, total))
    }

    /// A single match, visible to admins and to the owners of either item
    pub async fn get(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<MatchResponseDto> {
        let found = self.fetch(id).await?;
        self.ensure_party(actor, &found).await?;
        self.describe_one(found).await
    }

    /// Append to the match's conversation thread
    pub async fn append_message(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: AppendMessageDto,
    ) -> Result<MatchResponseDto> {
        let body = dto.body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("Message body is required".to_string()));
        }
        if body.chars().count() > MATCH_MESSAGE_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Message must not exceed {} characters",
                MATCH_MESSAGE_MAX_LEN
            )));
        }

        let found = self.fetch(id).await?;
        self.ensure_party(actor, &found).await?;

        let message = MatchMessage {
            sent_by: actor.id,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let updated = self
            .db
            .append_match_message(id, &message)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

        tracing::info!("Match message added: id={}, by={}", updated.id, actor.id);
        self.describe_one(updated).await
    }

    /// Email and notify both owners about a match
    pub async fn send_email(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: SendMatchEmailDto,
    ) -> Result<DispatchReport> {
        actor.authorize(Capability::Admin)?;

        let found = self.fetch(id).await?;
        let owners: Vec<Uuid> = self
            .db
            .fetch_items(&found.item_ids())
            .await?
            .iter()
            .map(|i| i.user_id)
            .collect();

        let custom_message = non_blank(dto.custom_message.as_deref());
        let notice = Notice {
            kind: NOTIFICATION_TYPE_MATCH.to_string(),
            message: custom_message
                .clone()
                .unwrap_or_else(|| format!("A {} match was found for your item.", found.status)),
            meta: Some(json!({ "matchId": found.id })),
            email: Some(EmailTemplate::Match {
                status: found.status,
                created_at: found.created_at,
                notes: found.notes.clone(),
                custom_message,
            }),
        };

        let report = self.dispatcher.notify(&owners, &notice).await?;

        self.audit.record(
            actor.id,
            "send_match_email",
            AuditEntityType::Match,
            Some(found.id),
            json!({
                "emailsSent": report.emails_sent,
                "totalEmails": report.total_emails,
            }),
        );

        Ok(report)
    }

    async fn fetch(&self, id: Uuid) -> Result<ItemMatch> {
        self.db
            .fetch_match(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".to_string()))
    }

    /// Admins see every match; users only those touching one of their items
    async fn ensure_party(&self, actor: &AuthenticatedUser, found: &ItemMatch) -> Result<()> {
        if actor.is_admin() {
            return Ok(());
        }

        let items = self.db.fetch_items(&found.item_ids()).await?;
        if items.iter().any(|i| i.user_id == actor.id) {
            Ok(())
        } else {
            Err(AppError::NotFound("Match not found".to_string()))
        }
    }

    async fn describe_one(&self, found: ItemMatch) -> Result<MatchResponseDto> {
        self.describe(vec![found])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Match lost while resolving references".to_string()))
    }

    /// Resolve items, owners, creator and resolver for a batch of matches
    async fn describe(&self, matches: Vec<ItemMatch>) -> Result<Vec<MatchResponseDto>> {
        let mut item_ids: Vec<Uuid> = matches.iter().flat_map(|m| m.item_ids()).collect();
        item_ids.sort();
        item_ids.dedup();

        let items: HashMap<Uuid, Item> = self
            .db
            .fetch_items(&item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();

        let mut user_ids: Vec<Uuid> = items
            .values()
            .map(|i| i.user_id)
            .chain(matches.iter().map(|m| m.created_by))
            .chain(matches.iter().filter_map(|m| m.resolved_by))
            .collect();
        user_ids.sort();
        user_ids.dedup();

        let users: HashMap<Uuid, UserSummary> = self
            .db
            .fetch_users(&user_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let item_view = |id: Uuid| {
            items.get(&id).map(|item| MatchItemDto {
                owner: users.get(&item.user_id).cloned(),
                item: item.clone().into(),
            })
        };

        Ok(matches
            .into_iter()
            .map(|m| MatchResponseDto {
                item_a: item_view(m.item_a_id),
                item_b: item_view(m.item_b_id),
                creator: users.get(&m.created_by).cloned(),
                resolver: m.resolved_by.and_then(|id| users.get(&id).cloned()),
                id: m.id,
                item_a_id: m.item_a_id,
                item_b_id: m.item_b_id,
                status: m.status,
                notes: m.notes,
                admin_notes: m.admin_notes,
                created_by: m.created_by,
                resolved_by: m.resolved_by,
                resolved_at: m.resolved_at,
                messages: m.messages.0,
                created_at: m.created_at,
                updated_at: m.updated_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::items::models::ItemKind;
    use crate::features::users::models::{User, UserRole};
    use crate::modules::email::EmailTransport;
    use crate::shared::test_helpers::{as_actor, seed_item, seed_user, settle, RecordingMailer};
    use std::time::Duration;

    fn service_with(db: &Database, mailer: Option<Arc<RecordingMailer>>) -> MatchService {
        let dispatcher = NotificationDispatcher::new(
            db.clone(),
            mailer.map(|m| m as Arc<dyn EmailTransport>),
            Duration::from_secs(1),
            "http://localhost:5173".to_string(),
        );
        MatchService::new(
            db.clone(),
            Arc::new(dispatcher),
            Arc::new(AuditRecorder::new(db.clone())),
        )
    }

    fn service(db: &Database) -> MatchService {
        service_with(db, None)
    }

    struct Fixture {
        admin: User,
        loser: User,
        finder: User,
        lost: Item,
        found: Item,
    }

    async fn fixture(db: &Database) -> Fixture {
        let admin = seed_user(db, UserRole::Admin).await;
        let loser = seed_user(db, UserRole::User).await;
        let finder = seed_user(db, UserRole::User).await;
        let lost = seed_item(db, &loser, ItemKind::Lost, "Blue backpack").await;
        let found = seed_item(db, &finder, ItemKind::Found, "Backpack").await;
        Fixture {
            admin,
            loser,
            finder,
            lost,
            found,
        }
    }

    fn pair(a: &Item, b: &Item, notes: &str) -> CreateMatchDto {
        CreateMatchDto {
            item_a_id: a.id,
            item_b_id: b.id,
            notes: Some(notes.to_string()),
        }
    }

    fn to_status(status: MatchStatus) -> UpdateMatchStatusDto {
        UpdateMatchStatusDto {
            status,
            admin_notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_notifies_both_owners_once() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let service = service(&db);

        let (created, is_new) = service
            .admin_create(&as_actor(&f.admin), pair(&f.lost, &f.found, "possible match"))
            .await
            .unwrap();
        assert!(is_new);
        assert_eq!(created.status, MatchStatus::Pending);
        assert_eq!(created.created_by, f.admin.id);

        let (again, is_new) = service
            .admin_create(&as_actor(&f.admin), pair(&f.found, &f.lost, "dup"))
            .await
            .unwrap();
        assert!(!is_new);
        assert_eq!(again.id, created.id);
        assert_eq!(again.notes.as_deref(), Some("possible match"));
        settle().await;

        let (all, total) = db.list_matches(None, 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(all[0].id, created.id);

        let (notifications, total) = db.list_notifications(None, 0, 10).await.unwrap();
        assert_eq!(total, 2);
        let mut recipients: Vec<Uuid> = notifications.iter().map(|n| n.recipient_id).collect();
        recipients.sort();
        let mut owners = vec![f.loser.id, f.finder.id];
        owners.sort();
        assert_eq!(recipients, owners);
        assert!(notifications.iter().all(|n| n.kind == NOTIFICATION_TYPE_MATCH
            && n.message == MATCH_CREATED_MESSAGE
            && n.meta.as_ref().unwrap()["matchId"] == json!(created.id)));

        let (logs, _) = db.list_audit_logs(0, 10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "create_match");
    }

    #[tokio::test]
    async fn test_create_rejects_same_item_for_every_role() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let service = service(&db);

        for actor in [&f.admin, &f.loser] {
            let result = service
                .create(&as_actor(actor), pair(&f.lost, &f.lost, "self"))
                .await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_create_requires_both_items() {
        let db = Database::reference();
        let f = fixture(&db).await;

        let dto = CreateMatchDto {
            item_a_id: f.lost.id,
            item_b_id: Uuid::now_v7(),
            notes: None,
        };
        let result = service(&db).create(&as_actor(&f.loser), dto).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(db.count_matches(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reject_leaves_resolver_unset() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let service = service(&db);
        let (m, _) = service
            .create(&as_actor(&f.loser), pair(&f.lost, &f.found, "mine?"))
            .await
            .unwrap();

        let rejected = service
            .update_status(&as_actor(&f.admin), m.id, to_status(MatchStatus::Rejected))
            .await
            .unwrap();

        assert_eq!(rejected.status, MatchStatus::Rejected);
        assert!(rejected.resolved_by.is_none());
        assert!(rejected.resolved_at.is_none());
    }

    #[tokio::test]
    async fn test_terminal_match_cannot_move_again() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let service = service(&db);
        let admin = as_actor(&f.admin);
        let (m, _) = service
            .create(&admin, pair(&f.lost, &f.found, ""))
            .await
            .unwrap();
        service
            .update_status(&admin, m.id, to_status(MatchStatus::Rejected))
            .await
            .unwrap();

        let revived = service
            .update_status(&admin, m.id, to_status(MatchStatus::Confirmed))
            .await;
        assert!(
            matches!(revived, Err(AppError::Validation(ref msg)) if msg.contains("already rejected"))
        );
        assert_eq!(
            db.fetch_match(m.id).await.unwrap().unwrap().status,
            MatchStatus::Rejected
        );
    }

    #[tokio::test]
    async fn test_resolve_requires_confirmation_first() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let service = service(&db);
        let admin = as_actor(&f.admin);
        let (m, _) = service
            .create(&admin, pair(&f.lost, &f.found, ""))
            .await
            .unwrap();

        let skipped = service
            .update_status(&admin, m.id, to_status(MatchStatus::Resolved))
            .await;
        assert!(matches!(skipped, Err(AppError::Validation(ref msg)) if msg.contains("pending")));

        service
            .update_status(&admin, m.id, to_status(MatchStatus::Confirmed))
            .await
            .unwrap();
        let before = Utc::now();
        let resolved = service
            .update_status(&admin, m.id, to_status(MatchStatus::Resolved))
            .await
            .unwrap();

        assert_eq!(resolved.status, MatchStatus::Resolved);
        assert_eq!(resolved.resolved_by, Some(f.admin.id));
        assert_eq!(resolved.resolver.as_ref().unwrap().id, f.admin.id);
        assert!(resolved.resolved_at.unwrap() >= before);

        let reopened = service
            .update_status(&admin, m.id, to_status(MatchStatus::Pending))
            .await;
        assert!(matches!(reopened, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_repeating_status_only_updates_notes() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let other_admin = seed_user(&db, UserRole::Admin).await;
        let service = service(&db);
        let admin = as_actor(&f.admin);
        let (m, _) = service
            .create(&admin, pair(&f.lost, &f.found, ""))
            .await
            .unwrap();
        service
            .update_status(&admin, m.id, to_status(MatchStatus::Confirmed))
            .await
            .unwrap();
        let resolved = service
            .update_status(&admin, m.id, to_status(MatchStatus::Resolved))
            .await
            .unwrap();

        let repeated = service
            .update_status(
                &as_actor(&other_admin),
                m.id,
                UpdateMatchStatusDto {
                    status: MatchStatus::Resolved,
                    admin_notes: Some("Handed over at the front desk".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(repeated.resolved_by, Some(f.admin.id));
        assert_eq!(repeated.resolved_at, resolved.resolved_at);
        assert_eq!(
            repeated.admin_notes.as_deref(),
            Some("Handed over at the front desk")
        );
    }

    #[tokio::test]
    async fn test_status_update_is_admin_only() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let service = service(&db);
        let (m, _) = service
            .create(&as_actor(&f.loser), pair(&f.lost, &f.found, ""))
            .await
            .unwrap();

        let result = service
            .update_status(&as_actor(&f.loser), m.id, to_status(MatchStatus::Confirmed))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        let stored = db.fetch_match(m.id).await.unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_match_is_not_found() {
        let db = Database::reference();
        let f = fixture(&db).await;

        let result = service(&db)
            .update_status(&as_actor(&f.admin), Uuid::now_v7(), to_status(MatchStatus::Confirmed))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_for_user_and_visibility() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let stranger = seed_user(&db, UserRole::User).await;
        let unrelated = seed_item(&db, &stranger, ItemKind::Found, "Keys").await;
        let other = seed_item(&db, &f.admin, ItemKind::Lost, "Keyring").await;
        let service = service(&db);

        let (m, _) = service
            .create(&as_actor(&f.finder), pair(&f.lost, &f.found, ""))
            .await
            .unwrap();
        service
            .create(&as_actor(&f.admin), pair(&unrelated, &other, ""))
            .await
            .unwrap();

        let mine = service.list_for_user(&as_actor(&f.loser)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, m.id);
        let lost_side = [&mine[0].item_a, &mine[0].item_b]
            .into_iter()
            .flatten()
            .find(|i| i.item.id == f.lost.id)
            .unwrap();
        assert_eq!(lost_side.owner.as_ref().unwrap().id, f.loser.id);

        assert!(service.get(&as_actor(&f.finder), m.id).await.is_ok());
        assert!(service.get(&as_actor(&f.admin), m.id).await.is_ok());
        let hidden = service.get(&as_actor(&stranger), m.id).await;
        assert!(matches!(hidden, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_append_message_keeps_order_and_rules() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let stranger = seed_user(&db, UserRole::User).await;
        let service = service(&db);
        let (m, _) = service
            .create(&as_actor(&f.loser), pair(&f.lost, &f.found, ""))
            .await
            .unwrap();

        let say = |body: &str| AppendMessageDto {
            body: body.to_string(),
        };

        service
            .append_message(&as_actor(&f.loser), m.id, say("  Is it still there?  "))
            .await
            .unwrap();
        let thread = service
            .append_message(&as_actor(&f.finder), m.id, say("Yes, at reception"))
            .await
            .unwrap();

        assert_eq!(thread.messages.len(), 2);
        assert_eq!(thread.messages[0].body, "Is it still there?");
        assert_eq!(thread.messages[0].sent_by, f.loser.id);
        assert_eq!(thread.messages[1].sent_by, f.finder.id);

        let blank = service.append_message(&as_actor(&f.loser), m.id, say("   ")).await;
        assert!(matches!(blank, Err(AppError::Validation(_))));

        let long = "x".repeat(MATCH_MESSAGE_MAX_LEN + 1);
        let too_long = service.append_message(&as_actor(&f.loser), m.id, say(&long)).await;
        assert!(matches!(too_long, Err(AppError::Validation(_))));

        let outsider = service.append_message(&as_actor(&stranger), m.id, say("hi")).await;
        assert!(matches!(outsider, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_send_email_reaches_both_owners() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let mailer = Arc::new(RecordingMailer::default());
        let service = service_with(&db, Some(mailer.clone()));
        let (m, _) = service
            .create(&as_actor(&f.admin), pair(&f.lost, &f.found, "Same colour"))
            .await
            .unwrap();
        let sent_on_create = mailer.sent().len();

        let report = service
            .send_email(
                &as_actor(&f.admin),
                m.id,
                SendMatchEmailDto {
                    custom_message: Some("Please bring ID".to_string()),
                },
            )
            .await
            .unwrap();
        settle().await;

        assert_eq!(sent_on_create, 2);
        assert_eq!(report.notifications_created, 2);
        assert_eq!(report.emails_sent, 2);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 4);
        assert!(sent[2..].iter().all(|e| e.text.contains("Please bring ID")));

        let (inbox, _) = db.list_notifications(Some(f.loser.id), 0, 10).await.unwrap();
        assert_eq!(inbox[0].message, "Please bring ID");

        let (logs, _) = db.list_audit_logs(0, 10).await.unwrap();
        assert_eq!(logs[0].action, "send_match_email");
        assert_eq!(logs[0].meta["emailsSent"], 2);
    }

    #[tokio::test]
    async fn test_send_email_default_message_names_status() {
        let db = Database::reference();
        let f = fixture(&db).await;
        let service = service(&db);
        let (m, _) = service
            .create(&as_actor(&f.admin), pair(&f.lost, &f.found, ""))
            .await
            .unwrap();

        let report = service
            .send_email(&as_actor(&f.admin), m.id, SendMatchEmailDto::default())
            .await
            .unwrap();

        assert_eq!(report.emails_sent, 0);
        let (inbox, _) = db.list_notifications(Some(f.finder.id), 0, 10).await.unwrap();
        assert_eq!(inbox[0].message, "A pending match was found for your item.");
    }
}
