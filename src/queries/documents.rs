use chrono::Utc;

use crate::{
    error::{Error, Result},
    models::documents::{Document, NewDocument},
};

use crate::DbConn;

/// Lists all documents attached to a workspace.
pub async fn documents_for_workspace(
    conn: &mut DbConn,
    workspace_id: i64,
) -> Result<Vec<Document>> {
    let documents = sqlx::query_as::<_, Document>(
        r#"
        SELECT * FROM documents WHERE workspace_id = ? ORDER BY id ASC
        "#,
    )
    .bind(workspace_id)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(documents)
}

/// Attaches a document to a workspace.
pub async fn create_document(conn: &mut DbConn, new_document: NewDocument) -> Result<Document> {
    let now = Utc::now();
    let document = sqlx::query_as::<_, Document>(
        r#"
        INSERT INTO documents (doc_id, filename, docpath, workspace_id, metadata, pinned, created_at, last_updated_at)
        VALUES (?, ?, ?, ?, ?, 0, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new_document.doc_id)
    .bind(&new_document.filename)
    .bind(&new_document.docpath)
    .bind(new_document.workspace_id)
    .bind(&new_document.metadata)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(document)
}
