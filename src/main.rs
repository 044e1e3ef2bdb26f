use tracing_subscriber::EnvFilter;

use paperhub::{AppState, database, load_config, services::telemetry::TelemetrySink};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("paperhub=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    tracing::info!("Loaded configuration:\n{}", config);

    let pool = database::connect(&config.database).await?;
    database::migrate(&pool).await?;

    let telemetry = TelemetrySink::new(&config.telemetry);
    let state = AppState::new(pool, telemetry);

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, paperhub::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
    }
}
