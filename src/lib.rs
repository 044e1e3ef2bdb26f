pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod queries;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use database::{DbConn, DbPool};
pub use error::{Error, Result};
pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Load configuration from environment variables
pub fn load_config() -> std::result::Result<Config, Box<dyn std::error::Error>> {
    Ok(Config::load()?)
}

/// Builds the application router.
///
/// Everything except the health probe sits behind the acting-user
/// middleware; routes address workspaces by slug.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/workspaces",
            post(handlers::workspaces::create_workspace).get(handlers::workspaces::list_workspaces),
        )
        .route(
            "/workspaces/{slug}",
            get(handlers::workspaces::get_workspace)
                .patch(handlers::workspaces::update_workspace)
                .delete(handlers::workspaces::delete_workspace),
        )
        .route(
            "/workspaces/{slug}/members",
            get(handlers::members::list_members).put(handlers::members::replace_members),
        )
        .route(
            "/workspaces/{slug}/prompt-history",
            get(handlers::workspaces::get_prompt_history)
                .delete(handlers::workspaces::clear_prompt_history),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::identity_middleware,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
