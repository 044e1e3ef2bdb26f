//! Fire-and-forget usage pings.
//!
//! Events are always logged locally; when a collector endpoint is
//! configured they are POSTed in a background task. A failed or slow
//! collector must never stall a request, so delivery is spawn-and-forget
//! and failures are logged at debug level only.

use serde_json::json;

use crate::config::TelemetryConfig;

#[derive(Clone)]
pub struct TelemetrySink {
    enabled: bool,
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl TelemetrySink {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            enabled: config.enabled,
            endpoint: config.endpoint.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// A sink that drops everything. Used in tests.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            client: reqwest::Client::new(),
        }
    }

    /// Records a usage event. Returns immediately; delivery happens in the
    /// background.
    pub fn send(&self, event: &'static str) {
        if !self.enabled {
            return;
        }

        tracing::info!(event, "telemetry event");

        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };
        let client = self.client.clone();

        tokio::spawn(async move {
            let payload = json!({ "event": event });
            if let Err(e) = client.post(&endpoint).json(&payload).send().await {
                tracing::debug!(event, error = %e, "telemetry delivery failed");
            }
        });
    }
}
