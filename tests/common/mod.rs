//! Shared test harness.
//!
//! Every test gets its own in-memory SQLite database with the real
//! migrations applied, so tests run in parallel without interfering.
//! The pool is capped at one connection: an in-memory database exists
//! per connection, and a second one would see no tables.

use std::str::FromStr;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

use paperhub::{
    AppState, DbPool,
    models::users::{NewUser, Role, User},
    models::workspaces::Workspace,
    queries,
    services::telemetry::TelemetrySink,
    services::workspaces,
};

pub struct TestApp {
    pub pool: DbPool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("Failed to parse connection string")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Self { pool }
    }

    pub async fn conn(&self) -> PoolConnection<sqlx::Sqlite> {
        self.pool
            .acquire()
            .await
            .expect("Failed to get database connection")
    }

    pub async fn create_user(&self, username: &str, role: Role) -> User {
        let mut conn = self.conn().await;
        queries::users::create_user(
            conn.as_mut(),
            NewUser {
                username: username.to_string(),
                role,
            },
        )
        .await
        .expect("Failed to create user")
    }

    #[allow(dead_code)]
    pub async fn create_workspace(&self, name: &str, creator_id: Option<i64>) -> Workspace {
        let mut conn = self.conn().await;
        workspaces::create_workspace(
            conn.as_mut(),
            Some(name),
            creator_id,
            &serde_json::Map::new(),
        )
        .await
        .expect("Failed to create workspace")
    }
}

/// HTTP test harness: the full router served on a random port, with a
/// reqwest client for driving it.
#[allow(dead_code)]
pub struct HttpTestApp {
    pub app: TestApp,
    pub address: String,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl HttpTestApp {
    pub async fn spawn() -> Self {
        let app = TestApp::new().await;

        let state = AppState::new(app.pool.clone(), TelemetrySink::disabled());
        let router = paperhub::app(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            app,
            address,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Builds a raw settings/update map from inline JSON.
#[allow(dead_code)]
pub fn raw_fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().expect("Expected a JSON object").clone()
}
