//! Shared state of the workload API.

use std::path::Path;
use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// State handed to every request handler.
///
/// Wraps the configuration loaded at startup behind an [`Arc`]. A request may
/// override parts of it for its own run; the shared copy never changes.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Wraps an already loaded configuration.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Loads the configuration directory and wraps it.
    ///
    /// Fails only when the directory itself is missing; see
    /// [`ConfigLoader::load`].
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> EngineResult<Self> {
        ConfigLoader::load(dir).map(Self::new)
    }

    /// The startup configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
