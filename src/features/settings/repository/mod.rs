mod postgres;
mod reference;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::Result;
use crate::features::settings::models::Setting;

#[async_trait]
pub trait AbstractSettings: Sync + Send {
    /// Every setting, sorted by key
    async fn list_settings(&self) -> Result<Vec<Setting>>;

    /// Insert or replace the value stored under each key
    async fn upsert_settings(&self, entries: &[(String, Value)]) -> Result<()>;
}
