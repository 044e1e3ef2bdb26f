use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Archived system prompt, written whenever a workspace's prompt is
/// replaced with a different non-default value.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PromptHistoryEntry {
    pub id: i64,
    pub workspace_id: i64,
    pub prompt: String,
    pub modified_by: Option<i64>,
    pub modified_at: DateTime<Utc>,
}

/// Structured audit entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventLogEntry {
    pub id: i64,
    pub event: String,
    pub metadata: Option<String>,
    pub user_id: Option<i64>,
    pub occurred_at: DateTime<Utc>,
}
