//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// OWS SSO probe - drives the SAML single sign-on handshake of a secured
/// OGC web service and reports the first step that misbehaves.
#[derive(Debug, Parser)]
#[command(name = "osp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.osp/osp.toml).
    #[arg(long, global = true, env = "OSP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not echo each exchange; print only the final body or the error.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the handshake and check the service provider's response to the
    /// posted authentication response.
    Handshake {
        /// Service type: WMS, or WPS for OWS Common services.
        service_type: String,

        /// Service provider endpoint URL.
        endpoint: String,

        /// Transport and credential options.
        #[command(flatten)]
        options: RunArgs,
    },

    /// Run the handshake against a WMS and fetch capabilities again inside
    /// the session it establishes.
    Session {
        /// Service provider endpoint URL.
        endpoint: String,

        /// Transport and credential options.
        #[command(flatten)]
        options: RunArgs,
    },

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Options shared by the handshake commands.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Verify TLS certificates (off by default; test servers are self-signed).
    #[arg(long, conflicts_with = "no_verify_tls")]
    pub verify_tls: bool,

    /// Skip TLS certificate verification even if the configuration enables it.
    #[arg(long)]
    pub no_verify_tls: bool,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Username presented to the identity provider.
    #[arg(long, env = "OSP_USERNAME")]
    pub username: Option<String>,

    /// Password presented to the identity provider.
    #[arg(long, env = "OSP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl RunArgs {
    /// TLS verification requested on the command line, if any.
    #[must_use]
    pub const fn tls_verification(&self) -> Option<bool> {
        if self.verify_tls {
            Some(true)
        } else if self.no_verify_tls {
            Some(false)
        } else {
            None
        }
    }
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Print the configuration file path.
    Path,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },
}
