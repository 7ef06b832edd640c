//! # osp-cli
//!
//! Command-line runner for the OGC security SSO handshake.
//!
//! This crate provides:
//! - `osp handshake <SERVICE_TYPE> <ENDPOINT>` - steps 1 to 5 with checks on
//!   the service provider's response to the authentication post
//! - `osp session <ENDPOINT>` - a WMS run that fetches capabilities again
//!   inside the established session
//! - `osp config` - configuration file management

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
