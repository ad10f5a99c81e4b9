//! Session log persistence in the `.srep` format.

pub mod codec;
pub mod document;

pub use document::{LOG_EXTENSION, LogDocument};
