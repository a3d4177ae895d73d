//! Shared application state.

use std::sync::Arc;

use crate::config::LabConfig;
use crate::error::{ErrorPage, ServerError};

/// State handed to every handler. The configuration is fixed at startup;
/// nothing in here mutates while the server runs.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<LabConfig>,
}

impl AppState {
    pub fn new(config: LabConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Wrap a fault with this state's debug flag, ready to render as the
    /// 500 page.
    pub fn error_page(&self, error: impl Into<ServerError>) -> ErrorPage {
        ErrorPage::new(error, self.config.debug)
    }
}
