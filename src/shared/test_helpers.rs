use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use chrono::Utc;
use fake::faker::name::en::Name;
use fake::Fake;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use crate::core::context::AppContext;
use crate::core::database::Database;
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::features::auth::JwtValidator;
use crate::features::items::models::{Item, ItemKind, ModerationStatus};
use crate::features::users::models::{User, UserRole};
use crate::modules::email::{EmailError, EmailTransport, OutgoingEmail};

pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use-in-production";

/// Sign a one-hour access token for `user_id`
pub fn issue_token(user_id: Uuid) -> String {
    let now = Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

fn caller(role: UserRole) -> AuthenticatedUser {
    let name: String = Name().fake();
    AuthenticatedUser {
        id: Uuid::now_v7(),
        email: format!("{}@example.com", Uuid::now_v7().simple()),
        name,
        role,
        is_suspended: false,
    }
}

/// Admin caller that does not exist in any store
pub fn admin_user() -> AuthenticatedUser {
    caller(UserRole::Admin)
}

/// Regular caller that does not exist in any store
pub fn regular_user() -> AuthenticatedUser {
    caller(UserRole::User)
}

pub fn as_actor(user: &User) -> AuthenticatedUser {
    AuthenticatedUser::from(user)
}

/// Insert a user with a fake name, a unique email and a valid mobile number
pub async fn seed_user(db: &Database, role: UserRole) -> User {
    let name: String = Name().fake();
    let email = format!("user-{}@example.com", Uuid::now_v7().simple());
    let mobile = format!("+1555{:07}", (1_000_000..9_999_999).fake::<u32>());

    let user = User::new(&email, &name, &mobile, role);
    db.insert_user(&user).await.unwrap();
    user
}

/// Insert an approved, open item owned by `owner`, dated today
pub async fn seed_item(db: &Database, owner: &User, kind: ItemKind, name: &str) -> Item {
    let now = Utc::now();
    let item = Item {
        id: Uuid::now_v7(),
        user_id: owner.id,
        kind,
        name: name.to_string(),
        category: Some("Accessories".to_string()),
        description: None,
        location: "Main Street Station".to_string(),
        date: now.date_naive(),
        image_base64: None,
        is_resolved: false,
        moderation_status: ModerationStatus::Approved,
        moderation_notes: None,
        created_at: now,
        updated_at: now,
    };
    db.insert_item(&item).await.unwrap();
    item
}

/// Let spawned fire-and-forget tasks (audit writes) run to completion
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Put `user` in every request's extensions, as the auth middleware would
pub fn with_user_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

/// Context over a fresh reference database, signed with [`TEST_JWT_SECRET`]
/// and without a mailer
pub fn test_context() -> AppContext {
    AppContext::new(
        Database::reference(),
        JwtValidator::new(TEST_JWT_SECRET, Duration::from_secs(0)),
        None,
        Duration::from_millis(200),
        "http://localhost:5173",
    )
}

/// Email transport that keeps what it was asked to send
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    reject: Option<String>,
    delay: Option<Duration>,
}

impl RecordingMailer {
    /// Fails every send addressed to `email`
    pub fn failing_for(email: &str) -> Self {
        Self {
            reject: Some(email.to_string()),
            ..Default::default()
        }
    }

    /// Waits `delay` before every send
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailTransport for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, EmailError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.reject.as_deref() == Some(email.to.as_str()) {
            return Err(EmailError::Build(format!("recipient rejected: {}", email.to)));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(format!("<{}@test.local>", Uuid::now_v7()))
    }
}
