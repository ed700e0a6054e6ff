use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::features::settings::models::Setting;

/// One key/value pair to store
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SettingEntryDto {
    #[validate(length(min = 1, max = 128, message = "Setting key must be 1-128 characters"))]
    pub key: String,
    #[schema(value_type = Object)]
    pub value: Value,
}

/// Request body for `PUT /api/admin/settings`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsDto {
    #[serde(default)]
    #[validate(nested)]
    pub settings: Vec<SettingEntryDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingsDto {
    pub settings: Vec<Setting>,
}
