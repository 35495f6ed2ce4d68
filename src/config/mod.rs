// Configuration module entry point
// Builds the startup configuration from defaults and the command line

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

pub use state::AppState;
pub use types::Config;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

impl Config {
    /// Build configuration from the optional positional port argument.
    ///
    /// Defaults bind every interface on port 8000; an explicit port overrides
    /// the default. There are no file or environment sources.
    pub fn load_from(port_arg: Option<&str>, root: PathBuf) -> Result<Self, config::ConfigError> {
        let port = parse_port(port_arg)?;

        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_override_option("server.port", port.map(i64::from))?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.root = root;
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Parse the positional port argument, if one was given
fn parse_port(arg: Option<&str>) -> Result<Option<u16>, config::ConfigError> {
    arg.map(|raw| {
        raw.trim()
            .parse::<u16>()
            .map_err(|e| config::ConfigError::Message(format!("Invalid port '{raw}': {e}")))
    })
    .transpose()
}
