use chrono::Utc;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    models::events::EventLogEntry,
};

use crate::DbConn;

/// Writes a structured audit entry.
pub async fn log_event(
    conn: &mut DbConn,
    event: &str,
    metadata: &Value,
    user_id: Option<i64>,
) -> Result<EventLogEntry> {
    let entry = sqlx::query_as::<_, EventLogEntry>(
        r#"
        INSERT INTO event_logs (event, metadata, user_id, occurred_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(event)
    .bind(metadata.to_string())
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(entry)
}

/// Lists audit entries for one event name, newest first.
pub async fn list_by_event(conn: &mut DbConn, event: &str) -> Result<Vec<EventLogEntry>> {
    let entries = sqlx::query_as::<_, EventLogEntry>(
        r#"
        SELECT * FROM event_logs WHERE event = ? ORDER BY id DESC
        "#,
    )
    .bind(event)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(entries)
}
