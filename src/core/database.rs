//! Storage drivers.
//!
//! Every entity exposes an `AbstractXxx` repository trait implemented twice: once
//! for PostgreSQL and once for an in-memory reference driver used by tests and
//! local runs. Services only ever see [`Database`], which dereferences to the
//! combined [`AbstractDatabase`] trait object.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::lock::Mutex;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::core::config::{DatabaseConfig, DatabaseDriver};
use crate::features::audit::models::AuditLog;
use crate::features::audit::repository::AbstractAuditLogs;
use crate::features::items::models::Item;
use crate::features::items::repository::AbstractItems;
use crate::features::matches::models::ItemMatch;
use crate::features::matches::repository::AbstractMatches;
use crate::features::notifications::models::Notification;
use crate::features::notifications::repository::AbstractNotifications;
use crate::features::settings::models::Setting;
use crate::features::settings::repository::AbstractSettings;
use crate::features::users::models::User;
use crate::features::users::repository::AbstractUsers;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// `ILIKE` pattern matching `text` literally anywhere in a column.
///
/// `%`, `_` and `\` in `text` are escaped, so the pattern must be used with
/// `ESCAPE '\'`.
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// PostgreSQL driver
#[derive(Clone)]
pub struct PostgresDb {
    pub pool: PgPool,
}

/// In-memory reference driver
#[derive(Clone, Default)]
pub struct ReferenceDb {
    pub users: Arc<Mutex<HashMap<Uuid, User>>>,
    pub items: Arc<Mutex<HashMap<Uuid, Item>>>,
    pub matches: Arc<Mutex<HashMap<Uuid, ItemMatch>>>,
    pub notifications: Arc<Mutex<HashMap<Uuid, Notification>>>,
    pub audit_logs: Arc<Mutex<Vec<AuditLog>>>,
    pub settings: Arc<Mutex<BTreeMap<String, Setting>>>,
}

pub trait AbstractDatabase:
    Sync
    + Send
    + AbstractUsers
    + AbstractItems
    + AbstractMatches
    + AbstractNotifications
    + AbstractAuditLogs
    + AbstractSettings
{
}

impl AbstractDatabase for ReferenceDb {}
impl AbstractDatabase for PostgresDb {}

/// Database handle shared by all services
#[derive(Clone)]
pub enum Database {
    /// In-memory reference driver
    Reference(ReferenceDb),
    /// PostgreSQL
    Postgres(PostgresDb),
}

impl std::ops::Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match &self {
            Database::Reference(reference) => reference,
            Database::Postgres(postgres) => postgres,
        }
    }
}

impl Database {
    /// Connect the configured driver, running migrations for PostgreSQL
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        match config.driver {
            DatabaseDriver::Reference => {
                tracing::warn!("Using in-memory reference database, data will not persist");
                Ok(Database::reference())
            }
            DatabaseDriver::Postgres => {
                let pool = create_pool(config).await?;
                tracing::info!("Database connection pool created");

                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
                tracing::info!("Database migrations completed successfully");

                Ok(Database::Postgres(PostgresDb { pool }))
            }
        }
    }

    /// Fresh, empty in-memory database
    pub fn reference() -> Self {
        Database::Reference(ReferenceDb::default())
    }

    /// Close the underlying connection pool
    pub async fn close(&self) {
        if let Database::Postgres(postgres) = self {
            postgres.pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_plain_text() {
        assert_eq!(contains_pattern("station"), "%station%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%"), r"%100\%%");
        assert_eq!(contains_pattern("a_b"), r"%a\_b%");
        assert_eq!(contains_pattern(r"C:\dir"), r"%C:\\dir%");
    }
}
