// Configuration types module
// Defines the startup configuration passed into the server

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Document root, resolved from the working directory at startup
    #[serde(skip)]
    pub root: PathBuf,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}
