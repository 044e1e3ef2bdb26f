use chrono::Utc;

use crate::{
    error::{Error, Result},
    models::workspaces::{
        NewWorkspace, Workspace, WorkspaceFilter, WorkspaceOrder, WorkspaceUpdate,
    },
};

use crate::DbConn;

/// Creates a new workspace in the database.
pub async fn create_workspace(conn: &mut DbConn, new_workspace: NewWorkspace) -> Result<Workspace> {
    let now = Utc::now();
    let workspace = sqlx::query_as::<_, Workspace>(
        r#"
        INSERT INTO workspaces (
            name, slug, chat_provider, chat_model, chat_temperature, chat_history,
            system_prompt, similarity_threshold, top_n, chat_mode,
            agent_provider, agent_model, query_refusal_response, vector_search_mode,
            created_at, last_updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new_workspace.name)
    .bind(&new_workspace.slug)
    .bind(&new_workspace.chat_provider)
    .bind(&new_workspace.chat_model)
    .bind(new_workspace.chat_temperature)
    .bind(new_workspace.chat_history)
    .bind(&new_workspace.system_prompt)
    .bind(new_workspace.similarity_threshold)
    .bind(new_workspace.top_n)
    .bind(new_workspace.chat_mode)
    .bind(&new_workspace.agent_provider)
    .bind(&new_workspace.agent_model)
    .bind(&new_workspace.query_refusal_response)
    .bind(new_workspace.vector_search_mode)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(workspace)
}

/// Gets a single workspace by its ID. Expects the workspace to exist.
pub async fn get_workspace_by_id(conn: &mut DbConn, id: i64) -> Result<Workspace> {
    let workspace = sqlx::query_as::<_, Workspace>(
        r#"
        SELECT * FROM workspaces WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(workspace)
}

/// Gets a single workspace by its ID. The workspace may not exist.
pub async fn get_workspace_by_id_optional(conn: &mut DbConn, id: i64) -> Result<Option<Workspace>> {
    let workspace = sqlx::query_as::<_, Workspace>(
        r#"
        SELECT * FROM workspaces WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(workspace)
}

/// Gets a single workspace by its slug. The workspace may not exist.
pub async fn get_workspace_by_slug_optional(
    conn: &mut DbConn,
    slug: &str,
) -> Result<Option<Workspace>> {
    let workspace = sqlx::query_as::<_, Workspace>(
        r#"
        SELECT * FROM workspaces WHERE slug = ?
        "#,
    )
    .bind(slug)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(workspace)
}

/// Updates exactly the columns present in the validated change-set, plus
/// `last_updated_at`. Callers guarantee the change-set is non-empty.
pub async fn update_workspace(
    conn: &mut DbConn,
    id: i64,
    update: &WorkspaceUpdate,
) -> Result<Workspace> {
    let mut columns: Vec<&'static str> = Vec::new();
    if update.name.is_some() {
        columns.push("name = ?");
    }
    if update.chat_temperature.is_some() {
        columns.push("chat_temperature = ?");
    }
    if update.chat_history.is_some() {
        columns.push("chat_history = ?");
    }
    if update.system_prompt.is_some() {
        columns.push("system_prompt = ?");
    }
    if update.similarity_threshold.is_some() {
        columns.push("similarity_threshold = ?");
    }
    if update.chat_provider.is_some() {
        columns.push("chat_provider = ?");
    }
    if update.chat_model.is_some() {
        columns.push("chat_model = ?");
    }
    if update.top_n.is_some() {
        columns.push("top_n = ?");
    }
    if update.chat_mode.is_some() {
        columns.push("chat_mode = ?");
    }
    if update.agent_provider.is_some() {
        columns.push("agent_provider = ?");
    }
    if update.agent_model.is_some() {
        columns.push("agent_model = ?");
    }
    if update.query_refusal_response.is_some() {
        columns.push("query_refusal_response = ?");
    }
    if update.vector_search_mode.is_some() {
        columns.push("vector_search_mode = ?");
    }
    columns.push("last_updated_at = ?");

    let sql = format!(
        "UPDATE workspaces SET {} WHERE id = ? RETURNING *",
        columns.join(", ")
    );

    // Binds mirror the column order above exactly.
    let mut query = sqlx::query_as::<_, Workspace>(&sql);
    if let Some(name) = &update.name {
        query = query.bind(name);
    }
    if let Some(chat_temperature) = &update.chat_temperature {
        query = query.bind(*chat_temperature);
    }
    if let Some(chat_history) = update.chat_history {
        query = query.bind(chat_history);
    }
    if let Some(system_prompt) = &update.system_prompt {
        query = query.bind(system_prompt.clone());
    }
    if let Some(similarity_threshold) = update.similarity_threshold {
        query = query.bind(similarity_threshold);
    }
    if let Some(chat_provider) = &update.chat_provider {
        query = query.bind(chat_provider.clone());
    }
    if let Some(chat_model) = &update.chat_model {
        query = query.bind(chat_model.clone());
    }
    if let Some(top_n) = update.top_n {
        query = query.bind(top_n);
    }
    if let Some(chat_mode) = update.chat_mode {
        query = query.bind(chat_mode);
    }
    if let Some(agent_provider) = &update.agent_provider {
        query = query.bind(agent_provider.clone());
    }
    if let Some(agent_model) = &update.agent_model {
        query = query.bind(agent_model.clone());
    }
    if let Some(query_refusal_response) = &update.query_refusal_response {
        query = query.bind(query_refusal_response.clone());
    }
    if let Some(vector_search_mode) = update.vector_search_mode {
        query = query.bind(vector_search_mode);
    }
    query = query.bind(Utc::now()).bind(id);

    let workspace = query.fetch_one(conn).await.map_err(Error::Sqlx)?;

    Ok(workspace)
}

/// Deletes a workspace by its ID. Related rows cascade in the schema.
pub async fn delete_workspace(conn: &mut DbConn, id: i64) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM workspaces WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}

/// Gets a single workspace matching the filter that the user is a member of.
pub async fn get_workspace_for_user(
    conn: &mut DbConn,
    user_id: i64,
    filter: &WorkspaceFilter,
) -> Result<Option<Workspace>> {
    let sql_base = r#"
        SELECT w.* FROM workspaces w
        JOIN workspace_users wu ON wu.workspace_id = w.id
        WHERE wu.user_id = ?
    "#;

    let sql = match filter {
        WorkspaceFilter::Id(_) => format!("{sql_base} AND w.id = ?"),
        WorkspaceFilter::Slug(_) => format!("{sql_base} AND w.slug = ?"),
    };

    let query = sqlx::query_as::<_, Workspace>(&sql).bind(user_id);
    let query = match filter {
        WorkspaceFilter::Id(id) => query.bind(*id),
        WorkspaceFilter::Slug(slug) => query.bind(slug.clone()),
    };

    let workspace = query.fetch_optional(conn).await.map_err(Error::Sqlx)?;

    Ok(workspace)
}

/// Lists all workspaces the user is a member of.
///
/// With no explicit order, rows come back in storage (insertion) order.
pub async fn list_workspaces_for_user(
    conn: &mut DbConn,
    user_id: i64,
    limit: Option<i64>,
    order_by: Option<WorkspaceOrder>,
) -> Result<Vec<Workspace>> {
    let mut sql = String::from(
        r#"
        SELECT w.* FROM workspaces w
        JOIN workspace_users wu ON wu.workspace_id = w.id
        WHERE wu.user_id = ?
    "#,
    );
    if let Some(order) = order_by {
        sql.push_str(" ORDER BY w.");
        sql.push_str(order.as_sql());
    }
    if limit.is_some() {
        sql.push_str(" LIMIT ?");
    }

    let mut query = sqlx::query_as::<_, Workspace>(&sql).bind(user_id);
    if let Some(limit) = limit {
        query = query.bind(limit);
    }

    let workspaces = query.fetch_all(conn).await.map_err(Error::Sqlx)?;

    Ok(workspaces)
}
