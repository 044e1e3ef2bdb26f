pub mod health;
pub mod members;
pub mod workspaces;

use sqlx::pool::PoolConnection;

use crate::{
    error::{Error, Result},
    state::AppState,
};

/// Checks out a pool connection, normalizing acquisition failures.
pub(crate) async fn acquire_db_connection(
    state: &AppState,
) -> Result<PoolConnection<sqlx::Sqlite>> {
    state
        .pool
        .acquire()
        .await
        .map_err(|e| Error::Internal(format!("Failed to acquire database connection: {}", e)))
}
