//! Workspace membership handlers.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    handlers::acquire_db_connection,
    middleware::auth::AuthenticatedUser,
    models::{requests::ReplaceMembersRequest, workspaces::WorkspaceFilter},
    services::workspaces,
    state::AppState,
};

/// GET /api/v1/workspaces/{slug}/members
///
/// Lists workspace members with username, role and membership timestamp.
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let mut conn = acquire_db_connection(&state).await?;

    let workspace = workspaces::get_for_user(
        conn.as_mut(),
        &auth_user.user,
        &WorkspaceFilter::Slug(slug),
    )
    .await?
    .ok_or_else(|| Error::NotFound("Workspace not found".to_string()))?
    .workspace;

    let members = workspaces::list_members(conn.as_mut(), workspace.id).await?;

    tracing::info!(
        workspace_id = workspace.id,
        requester_id = auth_user.user.id,
        count = members.len(),
        "Members listed"
    );

    Ok(Json(serde_json::json!({
        "members": members,
        "count": members.len(),
    })))
}

/// PUT /api/v1/workspaces/{slug}/members
///
/// Replaces the workspace's entire membership set with the given user ids.
pub async fn replace_members(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(slug): Path<String>,
    Json(request): Json<ReplaceMembersRequest>,
) -> Result<Json<Value>> {
    let mut conn = acquire_db_connection(&state).await?;

    let workspace = workspaces::get_for_user(
        conn.as_mut(),
        &auth_user.user,
        &WorkspaceFilter::Slug(slug),
    )
    .await?
    .ok_or_else(|| Error::NotFound("Workspace not found".to_string()))?
    .workspace;

    workspaces::replace_members(conn.as_mut(), workspace.id, &request.user_ids).await?;

    tracing::info!(
        workspace_id = workspace.id,
        requester_id = auth_user.user.id,
        count = request.user_ids.len(),
        "Membership replaced"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "error": null,
    })))
}
