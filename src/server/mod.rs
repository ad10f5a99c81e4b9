//! Listening socket ownership and the accept loop.

pub mod lifecycle;
pub mod listener;

pub use lifecycle::{ServerLifecycle, ServerState};
