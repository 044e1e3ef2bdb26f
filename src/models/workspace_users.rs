use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::users::Role;

/// Membership relation row: one per (workspace, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUser {
    pub id: i64,
    pub workspace_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

/// Member listing entry: membership joined with the user record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMemberProfile {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub last_updated_at: DateTime<Utc>,
}
