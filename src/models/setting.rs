use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub id: String,
    pub key: String,
    pub value: Json<serde_json::Value>,
    pub category: String,
    pub description: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: String,
}

/// The value plus metadata, keyed by setting key in [`SettingsMap`].
#[derive(Debug, Clone, Serialize)]
pub struct SettingEntry {
    pub value: serde_json::Value,
    pub category: String,
    pub description: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: String,
}

pub type SettingsMap = BTreeMap<String, SettingEntry>;

impl From<Setting> for SettingEntry {
    fn from(s: Setting) -> Self {
        Self {
            value: s.value.0,
            category: s.category,
            description: s.description,
            updated_by: s.updated_by,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertSettingRequest {
    pub value: serde_json::Value,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Business hours per lower-case weekday name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayHours {
    pub open: Option<String>,
    pub close: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub working_hours: Vec<String>,
}
