//! Command implementations.

pub mod config;
pub mod handshake;

pub use config::run_config;
pub use handshake::{run_handshake, run_session};
