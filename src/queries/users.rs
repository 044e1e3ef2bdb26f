use chrono::Utc;

use crate::{
    error::{Error, Result},
    models::users::{NewUser, User},
};

use crate::DbConn;

/// Creates a new user in the database.
pub async fn create_user(conn: &mut DbConn, new_user: NewUser) -> Result<User> {
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, role, created_at, last_updated_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new_user.username)
    .bind(new_user.role)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Gets a single user by their ID. The user may not exist.
pub async fn get_user_by_id_optional(conn: &mut DbConn, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Resolves a set of user ids to their records in one round-trip.
pub async fn list_users_by_ids(conn: &mut DbConn, ids: &[i64]) -> Result<Vec<User>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT * FROM users WHERE id IN ({placeholders})");

    let mut query = sqlx::query_as::<_, User>(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let users = query.fetch_all(conn).await.map_err(Error::Sqlx)?;

    Ok(users)
}
