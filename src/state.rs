use crate::{database::DbPool, services::telemetry::TelemetrySink};

/// Application state shared across all HTTP handlers
///
/// Holds the resources handlers need on every request: the database
/// connection pool and the telemetry sink.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing the database
    pub pool: DbPool,
    /// Fire-and-forget usage ping sink
    pub telemetry: TelemetrySink,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(pool: DbPool, telemetry: TelemetrySink) -> Self {
        Self { pool, telemetry }
    }
}
