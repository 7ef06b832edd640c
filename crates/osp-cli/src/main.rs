//! # OWS SSO Probe
//!
//! Command-line entry point.

#![forbid(unsafe_code)]
#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use osp_cli::{
    cli::{Cli, Command},
    commands::{run_config, run_handshake, run_session},
    config::CliConfig,
    output::error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the exchanges and the final body.
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();
    let mut config = match CliConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {}", e));
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout();
    let result = match cli.command {
        Command::Handshake {
            service_type,
            endpoint,
            options,
        } => {
            run_handshake(&service_type, &endpoint, &options, &config, cli.quiet, &mut stdout).await
        }
        Command::Session { endpoint, options } => {
            run_session(&endpoint, &options, &config, cli.quiet, &mut stdout).await
        }
        Command::Config(cmd) => run_config(cmd, &mut config, config_path),
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
