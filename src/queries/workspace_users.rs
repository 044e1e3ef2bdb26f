use chrono::Utc;

use crate::{
    error::{Error, Result},
    models::workspace_users::{WorkspaceMemberProfile, WorkspaceUser},
};

use crate::DbConn;

/// Creates a membership row linking a user to a workspace.
pub async fn create_workspace_user(
    conn: &mut DbConn,
    workspace_id: i64,
    user_id: i64,
) -> Result<WorkspaceUser> {
    let now = Utc::now();
    let relation = sqlx::query_as::<_, WorkspaceUser>(
        r#"
        INSERT INTO workspace_users (workspace_id, user_id, created_at, last_updated_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(workspace_id)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(relation)
}

/// Lists all membership rows for a workspace.
pub async fn list_workspace_users(
    conn: &mut DbConn,
    workspace_id: i64,
) -> Result<Vec<WorkspaceUser>> {
    let relations = sqlx::query_as::<_, WorkspaceUser>(
        r#"
        SELECT * FROM workspace_users WHERE workspace_id = ? ORDER BY user_id ASC
        "#,
    )
    .bind(workspace_id)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(relations)
}

/// Lists membership rows across a set of workspaces in one round-trip.
pub async fn list_users_for_workspaces(
    conn: &mut DbConn,
    workspace_ids: &[i64],
) -> Result<Vec<WorkspaceUser>> {
    if workspace_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; workspace_ids.len()].join(", ");
    let sql = format!(
        "SELECT * FROM workspace_users WHERE workspace_id IN ({placeholders})"
    );

    let mut query = sqlx::query_as::<_, WorkspaceUser>(&sql);
    for workspace_id in workspace_ids {
        query = query.bind(*workspace_id);
    }

    let relations = query.fetch_all(conn).await.map_err(Error::Sqlx)?;

    Ok(relations)
}

/// Member listing: membership rows joined with user records, relation
/// timestamp attached.
pub async fn list_member_profiles(
    conn: &mut DbConn,
    workspace_id: i64,
) -> Result<Vec<WorkspaceMemberProfile>> {
    let members = sqlx::query_as::<_, WorkspaceMemberProfile>(
        r#"
        SELECT u.id AS user_id, u.username, u.role, wu.last_updated_at
        FROM workspace_users wu
        JOIN users u ON u.id = wu.user_id
        WHERE wu.workspace_id = ?
        ORDER BY u.id ASC
        "#,
    )
    .bind(workspace_id)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(members)
}

/// Deletes all membership rows for a workspace.
pub async fn delete_workspace_users(conn: &mut DbConn, workspace_id: i64) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM workspace_users WHERE workspace_id = ?
        "#,
    )
    .bind(workspace_id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}
