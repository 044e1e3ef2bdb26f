use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::workspaces::WorkspaceOrder;

/// Body of `POST /workspaces`. Anything beyond `name` is treated as an
/// additional-settings map and run through the field validation table.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: Option<String>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

/// Query string of `GET /workspaces`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkspacesQuery {
    pub limit: Option<i64>,
    pub order_by: Option<WorkspaceOrder>,
}

/// Body of `PUT /workspaces/{slug}/members`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceMembersRequest {
    pub user_ids: Vec<i64>,
}
