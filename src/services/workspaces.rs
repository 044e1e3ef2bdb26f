//! The workspace directory: validates and persists workspace
//! configuration, generates unique slugs, and answers membership-aware
//! queries. All functions are stateless over an injected connection.

use std::collections::HashSet;

use rand::Rng;
use serde_json::{Map, Value, json};
use sqlx::Connection;
use uuid::Uuid;

use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::{
        events::PromptHistoryEntry,
        users::{Role, User},
        workspace_users::{WorkspaceMemberProfile, WorkspaceUser},
        workspaces::{
            DEFAULT_SYSTEM_PROMPT, NewWorkspace, Workspace, WorkspaceFilter, WorkspaceOrder,
            WorkspaceUpdateOutcome, WorkspaceWithDocuments,
        },
    },
    queries::{documents, event_logs, prompt_history, users, workspace_users, workspaces},
    services::telemetry::TelemetrySink,
    utils::slug,
    validation,
};

/// Creates a workspace, deriving a unique slug from the name and
/// validating any additional settings. When a creator is supplied, the
/// workspace insert and the creator's membership commit together.
pub async fn create_workspace(
    conn: &mut DbConn,
    name: Option<&str>,
    creator_id: Option<i64>,
    additional: &Map<String, Value>,
) -> Result<Workspace> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Err(Error::Validation("name cannot be null".to_string()));
    };

    let mut workspace_slug = slug::slugify(name);
    if workspace_slug.is_empty() {
        workspace_slug = Uuid::new_v4().to_string();
    }
    if workspaces::get_workspace_by_slug_optional(conn, &workspace_slug)
        .await?
        .is_some()
    {
        // Collision: disambiguate with an 8-digit nonce and re-slug. A
        // concurrent create can still slip between this check and the
        // insert; the UNIQUE constraint surfaces that as a storage error.
        let nonce: u64 = rand::rng().random_range(10_000_000..100_000_000);
        workspace_slug = slug::slugify(&format!("{name}-{nonce}"));
    }

    let mut fields = validation::validate_fields(additional);
    if fields.name.is_none() {
        fields.name = Some(validation::validate_name(&Value::String(name.to_string())));
    }
    let new_workspace = NewWorkspace::from_update(name.to_string(), workspace_slug, fields);

    let mut tx = conn.begin().await?;
    let workspace = workspaces::create_workspace(tx.as_mut(), new_workspace).await?;
    if let Some(creator_id) = creator_id {
        workspace_users::create_workspace_user(tx.as_mut(), workspace.id, creator_id).await?;
    }
    tx.commit().await?;

    tracing::info!(
        workspace_id = workspace.id,
        slug = %workspace.slug,
        "Workspace created"
    );

    Ok(workspace)
}

/// Applies a raw update payload through the field whitelist and the
/// validation table. An update with no usable fields is a read, not a
/// write, and reports itself as such.
pub async fn update_workspace(
    conn: &mut DbConn,
    id: i64,
    raw: &Map<String, Value>,
) -> Result<WorkspaceUpdateOutcome> {
    let mut update = validation::validate_fields(raw);

    if update.is_empty() {
        let workspace = workspaces::get_workspace_by_id(conn, id).await?;
        return Ok(WorkspaceUpdateOutcome {
            workspace,
            message: Some("No valid fields to update!"),
        });
    }

    // Resetting the provider to "default" clears the paired model too,
    // even when the same payload tries to set one.
    if matches!(update.chat_provider.as_ref(), Some(Some(p)) if p == "default") {
        update.chat_provider = Some(None);
        update.chat_model = Some(None);
    }

    let workspace = workspaces::update_workspace(conn, id, &update).await?;

    Ok(WorkspaceUpdateOutcome {
        workspace,
        message: None,
    })
}

/// Fetches a single workspace the user is a member of, hydrated with its
/// documents.
pub async fn get_for_user(
    conn: &mut DbConn,
    user: &User,
    filter: &WorkspaceFilter,
) -> Result<Option<WorkspaceWithDocuments>> {
    let Some(workspace) = workspaces::get_workspace_for_user(conn, user.id, filter).await? else {
        return Ok(None);
    };

    let docs = documents::documents_for_workspace(conn, workspace.id).await?;

    Ok(Some(WorkspaceWithDocuments {
        workspace,
        documents: docs,
    }))
}

/// Lists the workspaces a user may see.
///
/// Beyond plain membership there is an isolation rule: a non-admin viewer
/// never sees a workspace that has an admin member, even one they belong
/// to. The filter runs here, after the membership join, so the policy
/// stays in one visible place.
pub async fn list_for_user(
    conn: &mut DbConn,
    user: &User,
    limit: Option<i64>,
    order_by: Option<WorkspaceOrder>,
) -> Result<Vec<Workspace>> {
    let all = workspaces::list_workspaces_for_user(conn, user.id, limit, order_by).await?;

    if user.role == Role::Admin || all.is_empty() {
        return Ok(all);
    }

    let ids: Vec<i64> = all.iter().map(|w| w.id).collect();
    let relations = workspace_users::list_users_for_workspaces(conn, &ids).await?;

    let mut member_ids: Vec<i64> = relations.iter().map(|r| r.user_id).collect();
    member_ids.sort_unstable();
    member_ids.dedup();
    let members = users::list_users_by_ids(conn, &member_ids).await?;

    let admin_ids: HashSet<i64> = members
        .iter()
        .filter(|u| u.role == Role::Admin)
        .map(|u| u.id)
        .collect();
    let shielded: HashSet<i64> = relations
        .iter()
        .filter(|r| admin_ids.contains(&r.user_id))
        .map(|r| r.workspace_id)
        .collect();

    Ok(all
        .into_iter()
        .filter(|w| !shielded.contains(&w.id))
        .collect())
}

/// Lists the members of a workspace with their user details.
pub async fn list_members(
    conn: &mut DbConn,
    workspace_id: i64,
) -> Result<Vec<WorkspaceMemberProfile>> {
    workspace_users::list_member_profiles(conn, workspace_id).await
}

/// Replaces a workspace's entire membership set in one transaction:
/// existing relations go, one row per distinct incoming id comes back.
/// Duplicate ids in the input collapse before the insert, so the
/// uniqueness constraint never fires on caller-supplied repeats.
pub async fn replace_members(
    conn: &mut DbConn,
    workspace_id: i64,
    user_ids: &[i64],
) -> Result<Vec<WorkspaceUser>> {
    let mut tx = conn.begin().await?;

    workspace_users::delete_workspace_users(tx.as_mut(), workspace_id).await?;

    let mut seen = HashSet::new();
    let mut created = Vec::with_capacity(user_ids.len());
    for &user_id in user_ids {
        if !seen.insert(user_id) {
            continue;
        }
        created.push(
            workspace_users::create_workspace_user(tx.as_mut(), workspace_id, user_id).await?,
        );
    }

    tx.commit().await?;

    Ok(created)
}

/// Records a qualifying system-prompt edit: archives the outgoing prompt
/// and emits a telemetry ping plus an audit entry. Never fails the caller;
/// tracking problems are logged and swallowed.
pub async fn record_prompt_change(
    conn: &mut DbConn,
    telemetry: &TelemetrySink,
    previous: &Workspace,
    updates: &Map<String, Value>,
    acting_user: Option<&User>,
) {
    if let Err(e) = track_prompt_change(conn, telemetry, previous, updates, acting_user).await {
        tracing::warn!(
            workspace = %previous.slug,
            error = %e,
            "Failed to record prompt change"
        );
    }
}

async fn track_prompt_change(
    conn: &mut DbConn,
    telemetry: &TelemetrySink,
    previous: &Workspace,
    updates: &Map<String, Value>,
    acting_user: Option<&User>,
) -> Result<()> {
    let Some(new_prompt) = updates
        .get("systemPrompt")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
    else {
        return Ok(());
    };

    // Archive the outgoing prompt when it was a real value being replaced.
    if let Some(prev_prompt) = previous.system_prompt.as_deref() {
        if prev_prompt != DEFAULT_SYSTEM_PROMPT && new_prompt != prev_prompt {
            prompt_history::archive_prompt(
                conn,
                previous.id,
                prev_prompt,
                acting_user.map(|u| u.id),
            )
            .await?;
        }
    }

    if new_prompt == DEFAULT_SYSTEM_PROMPT || Some(new_prompt) == previous.system_prompt.as_deref()
    {
        return Ok(());
    }

    telemetry.send("workspace_prompt_changed");
    event_logs::log_event(
        conn,
        "workspace_prompt_changed",
        &json!({
            "workspaceName": previous.name,
            "prevSystemPrompt": previous.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT),
            "newSystemPrompt": new_prompt,
        }),
        acting_user.map(|u| u.id),
    )
    .await?;

    Ok(())
}

/// Lists the prompt archive for a workspace.
pub async fn list_prompt_history(
    conn: &mut DbConn,
    workspace_id: i64,
) -> Result<Vec<PromptHistoryEntry>> {
    prompt_history::list_for_workspace(conn, workspace_id).await
}

/// Clears the prompt archive for a workspace.
pub async fn clear_prompt_history(conn: &mut DbConn, workspace_id: i64) -> Result<u64> {
    prompt_history::delete_for_workspace(conn, workspace_id).await
}

/// Deletes a workspace by ID. Membership rows, documents and the prompt
/// archive cascade in the schema.
pub async fn delete_workspace(conn: &mut DbConn, id: i64) -> Result<()> {
    let workspace = workspaces::get_workspace_by_id_optional(conn, id).await?;
    if workspace.is_none() {
        return Err(Error::NotFound("Workspace not found".to_string()));
    }

    let rows_affected = workspaces::delete_workspace(conn, id).await?;
    if rows_affected == 0 {
        return Err(Error::NotFound("Workspace not found".to_string()));
    }

    Ok(())
}
