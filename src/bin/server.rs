//! Meeting Room Server
//!
//! Serves the landing and session pages and drives local media capture for
//! connected views over per-session websockets.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_meet::config::AppConfig;
use mini_meet::ui::WebServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mini Meet server");

    let config = AppConfig::load()?;
    tracing::info!(
        "Configured bind address {}:{}",
        config.ui.bind_address,
        config.ui.http_port
    );

    WebServer::new(config).run().await?;
    Ok(())
}
