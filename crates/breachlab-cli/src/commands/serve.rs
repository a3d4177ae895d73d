//! Serve command for starting the lab application.
//!
//! `breachlab serve` - Start the vulnerable web server.

use breachlab_server::{LabConfig, LabServer};

/// Start the lab server with configuration from `breachlab.toml`,
/// falling back to the shipped insecure defaults.
pub async fn serve() -> anyhow::Result<()> {
    let config = LabConfig::load()?;
    tracing::info!(bind = %config.bind, debug = config.debug, "Configuration loaded");

    LabServer::new(config).run().await?;
    Ok(())
}
