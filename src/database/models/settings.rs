use serde::{Deserialize, Serialize};

/// Event-wide settings. Exactly one row exists, pinned to id = 1.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: i64,
    pub publish_results: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsInput {
    #[serde(default)]
    pub publish_results: bool,
}
