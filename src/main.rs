//! Mimic server entry point.
//!
//! Starts the Axum HTTP server with every mocked API mounted.

use tracing_subscriber::EnvFilter;

use mimic::api;
use mimic::app_state::AppState;
use mimic::config::MimicConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = MimicConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        addr = %config.listen_addr,
        regions = ?config.regions,
        realtime = config.realtime,
        "starting mimic"
    );

    // Build application state and router
    let app_state = AppState::from_config(&config);
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
