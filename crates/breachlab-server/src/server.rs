//! Lab server implementation.

use tokio::net::TcpListener;

use crate::config::LabConfig;
use crate::error::ServerError;
use crate::routes;
use crate::state::AppState;

/// The lab's HTTP server.
pub struct LabServer {
    config: LabConfig,
}

impl LabServer {
    /// Create a new server with the given configuration.
    pub fn new(config: LabConfig) -> Self {
        Self { config }
    }

    /// Start the server and run until shutdown. Makes sure the upload
    /// directory exists before accepting requests.
    pub async fn run(self) -> Result<(), ServerError> {
        tokio::fs::create_dir_all(&self.config.upload_dir)
            .await
            .map_err(|e| ServerError::StartupFailed(e.to_string()))?;

        let addr = self.config.bind.clone();
        tracing::info!(
            address = %addr,
            database = %self.config.database_path,
            uploads = %self.config.upload_dir,
            "Starting Breachlab"
        );
        tracing::warn!("this application is deliberately vulnerable; keep it on a loopback interface");

        let app = routes::create_router(AppState::new(self.config));

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::StartupFailed(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::StartupFailed(e.to_string()))?;

        Ok(())
    }

    /// The configured bind address.
    pub fn bind_addr(&self) -> &str {
        &self.config.bind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = LabServer::new(LabConfig::default());
        assert_eq!(server.bind_addr(), "127.0.0.1:5000");
    }
}
