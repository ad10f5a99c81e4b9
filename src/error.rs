//! Error types
//!
//! Each error's `Display` is the single line shown to the user in the log
//! sink. Underlying causes stay reachable through `source()` for tracing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems with the server configuration, detected before any bind.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error: Invalid port number.")]
    InvalidPort,

    #[error("Error: Reserved ports are not allowed. Please use a port above 1024.")]
    ReservedPort(u16),

    #[error("Error: You must select a directory to serve.")]
    NoDirectory,

    #[error("Error: {} is not a directory.", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Error: Unable to load configuration from {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },
}

/// Listener lifecycle failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Error: Server is already running.")]
    AlreadyRunning,

    #[error("Error: Unable to start server.")]
    Bind(#[source] io::Error),

    #[error("Error: Unable to stop server.")]
    Stop,
}

/// Saving or loading a `.srep` log file.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Error: Unable to save logs.")]
    Save(#[source] io::Error),

    #[error("Error: Please select a .srep file.")]
    WrongExtension(PathBuf),

    #[error("Error: Unable to open logs.")]
    Open(#[source] io::Error),

    #[error("Error: Unable to open logs.")]
    Malformed(String),
}
