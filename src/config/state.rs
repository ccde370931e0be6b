// Application state module
// Immutable per-process state shared by every request

use super::root::RootContext;
use super::types::{Config, LoggingConfig, PerformanceConfig};

/// Application state
pub struct AppState {
    pub root: RootContext,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

impl AppState {
    pub fn new(root: RootContext, config: &Config) -> Self {
        Self {
            root,
            logging: config.logging.clone(),
            performance: config.performance.clone(),
        }
    }
}
