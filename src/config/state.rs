// Application state module
// Immutable per-process state shared by every connection

use crate::http::{ExtensionCachePolicy, HeaderDecorator};

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Appends caching headers to every response before it is sent
    pub decorator: Box<dyn HeaderDecorator>,
}

impl AppState {
    /// Create `AppState` with the extension-based cache policy
    pub fn new(config: Config) -> Self {
        Self::with_decorator(config, Box::new(ExtensionCachePolicy))
    }

    pub fn with_decorator(config: Config, decorator: Box<dyn HeaderDecorator>) -> Self {
        Self { config, decorator }
    }
}
