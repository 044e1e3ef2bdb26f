//! Acting-user resolution middleware.
//!
//! Authentication itself lives in the fronting proxy; by the time a
//! request reaches this service the proxy has verified the session and
//! forwards the subject in the `x-user-id` header. This middleware
//! resolves that id against the user directory and injects the full
//! record into request extensions for handler access. Requests with a
//! missing, malformed, or unknown id are rejected with 401.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{
    error::{Error, Result},
    models::users::User,
    queries,
    state::AppState,
};

/// Header the fronting proxy uses to forward the authenticated subject.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Acting user for the current request, as resolved by [`identity_middleware`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self { user }
    }
}

pub async fn identity_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| {
            Error::Authentication(format!("Missing or malformed {USER_ID_HEADER} header"))
        })?;

    let mut conn = state
        .pool
        .acquire()
        .await
        .map_err(|e| Error::Internal(format!("Failed to acquire database connection: {}", e)))?;

    let user = queries::users::get_user_by_id_optional(conn.as_mut(), user_id)
        .await?
        .ok_or_else(|| Error::Authentication("Unknown user".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser::from(user));

    // Release the pooled connection before invoking the downstream handler,
    // which checks out its own connection from the same pool.
    drop(conn);

    Ok(next.run(request).await)
}
