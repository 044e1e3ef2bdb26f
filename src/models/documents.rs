use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document reference attached to a workspace. The ingestion pipeline owns
/// these rows; this layer only reads them to hydrate workspace responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub doc_id: String,
    pub filename: String,
    pub docpath: String,
    pub workspace_id: i64,
    pub metadata: Option<String>,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub doc_id: String,
    pub filename: String,
    pub docpath: String,
    pub workspace_id: i64,
    pub metadata: Option<String>,
}
