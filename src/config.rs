use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::http::resolver::ServeRoot;

/// Ports at or below this value are reserved and refused.
pub const RESERVED_PORT_LIMIT: u16 = 1024;

const DEFAULT_CONFIG_FILE: &str = "serverium.yaml";
const DEFAULT_SECRET: &str = "shravan";

/// Top-level configuration for the console host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logs: LogConfig,
}

/// Settings for one server start.
///
/// A running server keeps the [`ServeRoot`] produced by [`ServerConfig::validate`],
/// so editing a config afterwards never affects an instance already started.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Marker embedded in every saved `.srep` file.
    pub secret: String,
    /// Where the console host saves the session log on shutdown.
    pub save_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            root_directory: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            save_path: None,
        }
    }
}

impl ServerConfig {
    pub fn new(port: u16, root_directory: impl Into<PathBuf>) -> Self {
        Self {
            port,
            root_directory: Some(root_directory.into()),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Checks the port policy and the selected directory, returning the
    /// canonical root the server will be bounded by.
    pub async fn validate(&self) -> Result<ServeRoot, ConfigError> {
        check_port(self.port)?;
        let root = self
            .root_directory
            .as_deref()
            .ok_or(ConfigError::NoDirectory)?;
        ServeRoot::new(root).await
    }
}

/// Parses the text of a port field.
pub fn parse_port(text: &str) -> Result<u16, ConfigError> {
    let port = text.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort)?;
    check_port(port)?;
    Ok(port)
}

fn check_port(port: u16) -> Result<(), ConfigError> {
    if port <= RESERVED_PORT_LIMIT {
        return Err(ConfigError::ReservedPort(port));
    }
    Ok(())
}

impl AppConfig {
    /// Loads `SERVERIUM_CONFIG` (or `serverium.yaml` when present), then
    /// applies `SERVERIUM_HOST`, `SERVERIUM_PORT` and `SERVERIUM_ROOT`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var("SERVERIUM_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(host) = std::env::var("SERVERIUM_HOST") {
            cfg.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVERIUM_PORT") {
            cfg.server.port = parse_port(&port)?;
        }
        if let Ok(root) = std::env::var("SERVERIUM_ROOT") {
            cfg.server.root_directory = Some(PathBuf::from(root));
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&raw).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }
}
