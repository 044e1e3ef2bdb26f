use chrono::Utc;

use crate::{
    error::{Error, Result},
    models::events::PromptHistoryEntry,
};

use crate::DbConn;

/// Archives a replaced system prompt.
pub async fn archive_prompt(
    conn: &mut DbConn,
    workspace_id: i64,
    prompt: &str,
    modified_by: Option<i64>,
) -> Result<PromptHistoryEntry> {
    let entry = sqlx::query_as::<_, PromptHistoryEntry>(
        r#"
        INSERT INTO prompt_history (workspace_id, prompt, modified_by, modified_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(workspace_id)
    .bind(prompt)
    .bind(modified_by)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(entry)
}

/// Lists archived prompts for a workspace, newest first.
pub async fn list_for_workspace(
    conn: &mut DbConn,
    workspace_id: i64,
) -> Result<Vec<PromptHistoryEntry>> {
    let entries = sqlx::query_as::<_, PromptHistoryEntry>(
        r#"
        SELECT * FROM prompt_history WHERE workspace_id = ? ORDER BY id DESC
        "#,
    )
    .bind(workspace_id)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(entries)
}

/// Clears the prompt archive for a workspace.
pub async fn delete_for_workspace(conn: &mut DbConn, workspace_id: i64) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM prompt_history WHERE workspace_id = ?
        "#,
    )
    .bind(workspace_id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}
