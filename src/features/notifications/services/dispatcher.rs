use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::Value;
use uuid::Uuid;

use crate::core::database::Database;
use crate::core::error::Result;
use crate::features::matches::models::MatchStatus;
use crate::features::notifications::dtos::{DispatchReport, EmailDeliveryResult};
use crate::features::notifications::models::Notification;
use crate::features::users::models::User;
use crate::modules::email::{
    render_general_email, render_match_email, EmailError, EmailTransport, GeneralEmailContext,
    MatchEmailContext, OutgoingEmail, RenderedEmail,
};
use crate::shared::constants::EMAIL_NOT_CONFIGURED;

/// Which email, if any, accompanies an in-app notification
#[derive(Debug, Clone)]
pub enum EmailTemplate {
    /// The notification message wrapped in the general template
    General,
    /// Match details, optionally with a note from an administrator
    Match {
        status: MatchStatus,
        created_at: DateTime<Utc>,
        notes: Option<String>,
        custom_message: Option<String>,
    },
}

/// One message to deliver to a set of users
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: String,
    pub message: String,
    pub meta: Option<Value>,
    /// `None` delivers in-app only
    pub email: Option<EmailTemplate>,
}

/// Notification Dispatcher.
///
/// In-app notifications are the delivery of record and are written first, in
/// one batch. Email is opportunistic: each recipient with an address gets one
/// bounded attempt, and the outcome is reported rather than raised.
pub struct NotificationDispatcher {
    db: Database,
    mailer: Option<Arc<dyn EmailTransport>>,
    send_timeout: Duration,
    app_url: String,
}

impl NotificationDispatcher {
    pub fn new(
        db: Database,
        mailer: Option<Arc<dyn EmailTransport>>,
        send_timeout: Duration,
        app_url: String,
    ) -> Self {
        Self {
            db,
            mailer,
            send_timeout,
            app_url: app_url.trim_end_matches('/').to_string(),
        }
    }

    /// Notify every recipient once; duplicate ids are collapsed, order is kept.
    ///
    /// Fails only when the in-app notifications cannot be stored.
    pub async fn notify(&self, recipients: &[Uuid], notice: &Notice) -> Result<DispatchReport> {
        let mut seen = HashSet::new();
        let recipients: Vec<Uuid> = recipients
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        if recipients.is_empty() {
            return Ok(DispatchReport::default());
        }

        let notifications: Vec<Notification> = recipients
            .iter()
            .map(|id| Notification::new(*id, &notice.kind, &notice.message, notice.meta.clone()))
            .collect();
        self.db.insert_notifications(&notifications).await?;

        tracing::info!(
            "Notifications created: kind={}, count={}",
            notice.kind,
            notifications.len()
        );

        let results = match notice.email {
            Some(ref template) => self.deliver_emails(&recipients, &notice.message, template).await,
            None => Vec::new(),
        };

        let report = DispatchReport::new(notifications.len(), results);
        if report.total_emails > 0 {
            tracing::info!(
                "Email dispatch finished: sent={}, attempted={}",
                report.emails_sent,
                report.total_emails
            );
        }

        Ok(report)
    }

    async fn deliver_emails(
        &self,
        recipients: &[Uuid],
        message: &str,
        template: &EmailTemplate,
    ) -> Vec<EmailDeliveryResult> {
        let users: HashMap<Uuid, User> = match self.db.fetch_users(recipients).await {
            Ok(users) => users.into_iter().map(|u| (u.id, u)).collect(),
            Err(e) => {
                tracing::warn!("Skipping email, recipients could not be loaded: {}", e);
                return Vec::new();
            }
        };

        let attempts = recipients
            .iter()
            .filter_map(|id| users.get(id))
            .filter_map(|user| user.contact_email().map(|address| (user, address.to_string())))
            .map(|(user, address)| self.deliver_one(user, address, message, template));

        join_all(attempts).await
    }

    async fn deliver_one(
        &self,
        user: &User,
        address: String,
        message: &str,
        template: &EmailTemplate,
    ) -> EmailDeliveryResult {
        let Some(ref mailer) = self.mailer else {
            return EmailDeliveryResult::failed(address, EMAIL_NOT_CONFIGURED);
        };

        let rendered = match self.render(user, message, template) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!("Email not rendered: user_id={}, error={}", user.id, e);
                return EmailDeliveryResult::failed(address, e.to_string());
            }
        };

        let email = OutgoingEmail {
            to: address.clone(),
            subject: rendered.subject,
            html: rendered.html,
            text: rendered.text,
        };

        match tokio::time::timeout(self.send_timeout, mailer.send(&email)).await {
            Ok(Ok(message_id)) => {
                tracing::info!("Email sent: user_id={}, message_id={}", user.id, message_id);
                EmailDeliveryResult::delivered(address, message_id)
            }
            Ok(Err(e)) => {
                tracing::warn!("Email failed: user_id={}, error={}", user.id, e);
                EmailDeliveryResult::failed(address, e.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    "Email timed out: user_id={}, after={:?}",
                    user.id,
                    self.send_timeout
                );
                EmailDeliveryResult::failed(
                    address,
                    format!(
                        "Email delivery timed out after {} seconds",
                        self.send_timeout.as_secs_f32()
                    ),
                )
            }
        }
    }

    fn render(
        &self,
        user: &User,
        message: &str,
        template: &EmailTemplate,
    ) -> std::result::Result<RenderedEmail, EmailError> {
        let recipient_name = match user.name.trim() {
            "" => "there".to_string(),
            name => name.to_string(),
        };

        match template {
            EmailTemplate::General => render_general_email(&GeneralEmailContext {
                recipient_name,
                message: message.to_string(),
                app_url: self.app_url.clone(),
            }),
            EmailTemplate::Match {
                status,
                created_at,
                notes,
                custom_message,
            } => render_match_email(&MatchEmailContext {
                recipient_name,
                match_status: status.to_string(),
                created_on: created_at.format("%B %-d, %Y").to_string(),
                notes: notes.clone(),
                custom_message: custom_message.clone(),
                matches_url: format!("{}/matches", self.app_url),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::shared::constants::NOTIFICATION_TYPE_GENERAL;
    use crate::shared::test_helpers::{seed_user, RecordingMailer};

    fn dispatcher(db: &Database, mailer: Option<Arc<RecordingMailer>>) -> NotificationDispatcher {
        NotificationDispatcher::new(
            db.clone(),
            mailer.map(|m| m as Arc<dyn EmailTransport>),
            Duration::from_millis(200),
            "http://localhost:5173/".to_string(),
        )
    }

    fn notice(email: Option<EmailTemplate>) -> Notice {
        Notice {
            kind: NOTIFICATION_TYPE_GENERAL.to_string(),
            message: "Your item was approved".to_string(),
            meta: None,
            email,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_still_creates_in_app() {
        let db = Database::reference();
        let a = seed_user(&db, UserRole::User).await;
        let b = seed_user(&db, UserRole::User).await;

        let report = dispatcher(&db, None)
            .notify(&[a.id, b.id], &notice(Some(EmailTemplate::General)))
            .await
            .unwrap();

        assert_eq!(report.notifications_created, 2);
        assert_eq!(report.total_emails, 2);
        assert_eq!(report.emails_sent, 0);
        assert!(report
            .results
            .iter()
            .all(|r| !r.success && r.error.as_deref() == Some(EMAIL_NOT_CONFIGURED)));

        let (stored, total) = db.list_notifications(None, 0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert!(stored.iter().all(|n| !n.read));
    }

    #[tokio::test]
    async fn test_duplicate_recipients_are_collapsed() {
        let db = Database::reference();
        let a = seed_user(&db, UserRole::User).await;
        let b = seed_user(&db, UserRole::User).await;
        let mailer = Arc::new(RecordingMailer::default());

        let report = dispatcher(&db, Some(mailer.clone()))
            .notify(&[a.id, b.id, a.id], &notice(Some(EmailTemplate::General)))
            .await
            .unwrap();

        assert_eq!(report.notifications_created, 2);
        assert_eq!(report.emails_sent, 2);
        assert_eq!(report.results[0].email, a.email);
        assert_eq!(report.results[1].email, b.email);
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let db = Database::reference();
        let a = seed_user(&db, UserRole::User).await;
        let b = seed_user(&db, UserRole::User).await;
        let mailer = Arc::new(RecordingMailer::failing_for(&b.email));

        let report = dispatcher(&db, Some(mailer.clone()))
            .notify(&[a.id, b.id], &notice(Some(EmailTemplate::General)))
            .await
            .unwrap();

        assert_eq!(report.notifications_created, 2);
        assert_eq!(report.emails_sent, 1);
        assert_eq!(report.total_emails, 2);
        assert!(report.results[0].success);
        assert!(report.results[0].message_id.is_some());
        assert!(!report.results[1].success);
    }

    #[tokio::test]
    async fn test_slow_transport_times_out() {
        let db = Database::reference();
        let a = seed_user(&db, UserRole::User).await;
        let mailer = Arc::new(RecordingMailer::with_delay(Duration::from_secs(5)));

        let report = dispatcher(&db, Some(mailer))
            .notify(&[a.id], &notice(Some(EmailTemplate::General)))
            .await
            .unwrap();

        assert_eq!(report.notifications_created, 1);
        assert_eq!(report.emails_sent, 0);
        assert!(report.results[0].error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_recipients_without_email_are_skipped() {
        let db = Database::reference();
        let a = seed_user(&db, UserRole::User).await;
        db.update_user_contact(a.id, None, "", "+15550100").await.unwrap();
        let mailer = Arc::new(RecordingMailer::default());

        let report = dispatcher(&db, Some(mailer.clone()))
            .notify(&[a.id], &notice(Some(EmailTemplate::General)))
            .await
            .unwrap();

        assert_eq!(report.notifications_created, 1);
        assert_eq!(report.total_emails, 0);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_in_app_only_notice_sends_no_email() {
        let db = Database::reference();
        let a = seed_user(&db, UserRole::User).await;
        let mailer = Arc::new(RecordingMailer::default());

        let report = dispatcher(&db, Some(mailer.clone()))
            .notify(&[a.id], &notice(None))
            .await
            .unwrap();

        assert_eq!(report.notifications_created, 1);
        assert!(report.results.is_empty());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_match_email_links_to_matches_page() {
        let db = Database::reference();
        let a = seed_user(&db, UserRole::User).await;
        let mailer = Arc::new(RecordingMailer::default());

        let template = EmailTemplate::Match {
            status: MatchStatus::Pending,
            created_at: Utc::now(),
            notes: Some("Same serial number".to_string()),
            custom_message: None,
        };
        dispatcher(&db, Some(mailer.clone()))
            .notify(&[a.id], &notice(Some(template)))
            .await
            .unwrap();

        let sent = mailer.sent();
        assert!(sent[0].text.contains("http://localhost:5173/matches"));
        assert!(sent[0].text.contains("Same serial number"));
    }

    #[tokio::test]
    async fn test_empty_recipient_list_is_a_no_op() {
        let db = Database::reference();

        let report = dispatcher(&db, None).notify(&[], &notice(None)).await.unwrap();

        assert_eq!(report.notifications_created, 0);
        assert_eq!(db.list_notifications(None, 0, 10).await.unwrap().1, 0);
    }
}
