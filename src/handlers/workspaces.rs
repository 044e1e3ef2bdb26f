//! Workspace CRUD handlers
//!
//! Thin layer over the workspace directory service: handlers resolve the
//! target workspace through the caller's membership, delegate, and
//! serialize `{workspace, message}`-shaped responses. All business logic
//! is in the service layer.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    handlers::acquire_db_connection,
    middleware::auth::AuthenticatedUser,
    models::{
        requests::{CreateWorkspaceRequest, ListWorkspacesQuery},
        workspaces::WorkspaceFilter,
    },
    services::workspaces,
    state::AppState,
};

/// POST /api/v1/workspaces
///
/// Creates a workspace with the caller auto-joined as its first member.
/// Body: `{name, ...settings}`; settings run through the validation table.
pub async fn create_workspace(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateWorkspaceRequest>,
) -> Result<Json<Value>> {
    let mut conn = acquire_db_connection(&state).await?;

    let workspace = workspaces::create_workspace(
        conn.as_mut(),
        request.name.as_deref(),
        Some(auth_user.user.id),
        &request.settings,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "workspace": workspace,
        "message": null,
    })))
}

/// GET /api/v1/workspaces
///
/// Lists workspaces visible to the caller: their memberships, minus the
/// admin-isolation exclusions for non-admin viewers.
pub async fn list_workspaces(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<ListWorkspacesQuery>,
) -> Result<Json<Value>> {
    let mut conn = acquire_db_connection(&state).await?;

    let workspaces = workspaces::list_for_user(
        conn.as_mut(),
        &auth_user.user,
        query.limit,
        query.order_by,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "workspaces": workspaces,
        "count": workspaces.len(),
    })))
}

/// GET /api/v1/workspaces/{slug}
///
/// Gets a single workspace, hydrated with its documents. 404 covers both
/// "does not exist" and "not a member".
pub async fn get_workspace(
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
    .ok_or_else(|| Error::NotFound("Workspace not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "workspace": workspace,
    })))
}

/// PATCH /api/v1/workspaces/{slug}
///
/// Validated settings update. Non-whitelisted keys are dropped silently;
/// an update with nothing usable returns the unchanged workspace with an
/// informational message. Qualifying prompt edits are archived and logged.
pub async fn update_workspace(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(slug): Path<String>,
    Json(updates): Json<Map<String, Value>>,
) -> Result<Json<Value>> {
    let mut conn = acquire_db_connection(&state).await?;

    let previous = workspaces::get_for_user(
        conn.as_mut(),
        &auth_user.user,
        &WorkspaceFilter::Slug(slug),
    )
    .await?
    .ok_or_else(|| Error::NotFound("Workspace not found".to_string()))?
    .workspace;

    let outcome = workspaces::update_workspace(conn.as_mut(), previous.id, &updates).await?;

    workspaces::record_prompt_change(
        conn.as_mut(),
        &state.telemetry,
        &previous,
        &updates,
        Some(&auth_user.user),
    )
    .await;

    tracing::info!(
        workspace_id = previous.id,
        user_id = auth_user.user.id,
        "Workspace updated"
    );

    Ok(Json(serde_json::json!({
        "workspace": outcome.workspace,
        "message": outcome.message,
    })))
}

/// DELETE /api/v1/workspaces/{slug}
///
/// Deletes a workspace the caller is a member of; membership rows,
/// documents and the prompt archive cascade.
pub async fn delete_workspace(
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

    workspaces::delete_workspace(conn.as_mut(), workspace.id).await?;

    tracing::info!(
        workspace_id = workspace.id,
        user_id = auth_user.user.id,
        "Workspace deleted"
    );

    Ok(Json(serde_json::json!({
        "message": "Workspace deleted successfully",
    })))
}

/// GET /api/v1/workspaces/{slug}/prompt-history
pub async fn get_prompt_history(
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

    let history = workspaces::list_prompt_history(conn.as_mut(), workspace.id).await?;

    Ok(Json(serde_json::json!({
        "history": history,
        "count": history.len(),
    })))
}

/// DELETE /api/v1/workspaces/{slug}/prompt-history
pub async fn clear_prompt_history(
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

    workspaces::clear_prompt_history(conn.as_mut(), workspace.id).await?;

    Ok(Json(serde_json::json!({
        "message": "Prompt history cleared",
    })))
}
