//! Shared application state.

use crate::config::Config;
use crate::gateway::Gateway;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub config: Config,
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(config: Config, gateway: Gateway) -> Self {
        Self { config, gateway }
    }
}
