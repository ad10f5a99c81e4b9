//! Serverium - Directory-to-HTTP file server
//!
//! Core library for serving a local directory over HTTP and for the
//! obscured `.srep` session-log format.

pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod http;
pub mod logbook;
pub mod server;
