use anyhow::Result;
use colored::Colorize;
use tracing::info;

use agent_cost::{config::Config, server};

/// Execute the serve command
///
/// CLI overrides take precedence over the configured address.
pub async fn execute(mut cfg: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        cfg.server.host = host;
    }
    if let Some(port) = port {
        cfg.server.port = port;
    }
    agent_cost::config::validate_config(&cfg)?;

    println!(
        "{} http://{}:{}",
        "Starting cost calculator API on".green(),
        cfg.server.host,
        cfg.server.port
    );
    info!("Starting agent cost calculator in foreground mode");

    // Blocks until shutdown
    server::start_server(cfg).await?;

    Ok(())
}
