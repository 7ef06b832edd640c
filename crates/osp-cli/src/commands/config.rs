//! Configuration management commands.

use std::path::Path;

use crate::cli::ConfigCommand;
use crate::output::{info, success};
use crate::CliConfig;

/// Runs a config command.
pub fn run_config(
    cmd: ConfigCommand,
    config: &mut CliConfig,
    path: Option<&Path>,
) -> crate::CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config, path),
        ConfigCommand::Path => {
            println!("{}", resolve_path(path)?.display());
            Ok(())
        }
        ConfigCommand::Set { key, value } => set_config(config, path, &key, &value),
    }
}

fn resolve_path(path: Option<&Path>) -> crate::CliResult<std::path::PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => CliConfig::config_path(),
    }
}

/// Shows the current configuration.
fn show_config(config: &CliConfig, path: Option<&Path>) -> crate::CliResult<()> {
    info(&format!("Configuration file: {}", resolve_path(path)?.display()));
    println!();
    println!("verify_tls: {}", config.verify_tls);

    match config.timeout_secs {
        Some(secs) => println!("timeout_secs: {}", secs),
        None => println!("timeout_secs: (none)"),
    }

    println!(
        "username: {}",
        config.username.as_deref().unwrap_or("(default)")
    );

    if config.password.is_some() {
        println!("password: ****");
    }

    Ok(())
}

/// Sets a configuration value.
fn set_config(
    config: &mut CliConfig,
    path: Option<&Path>,
    key: &str,
    value: &str,
) -> crate::CliResult<()> {
    apply(config, key, value)?;
    config.save(path)?;

    let shown = if key == "password" { "****" } else { value };
    success(&format!("Set {} = {}", key, shown));
    Ok(())
}

/// Applies `key = value` to `config`. Empty or `none` clears optional keys.
fn apply(config: &mut CliConfig, key: &str, value: &str) -> crate::CliResult<()> {
    let cleared = value.is_empty() || value == "none";
    match key {
        "verify_tls" | "verify" => {
            config.verify_tls = value.parse().map_err(|_| {
                crate::CliError::InvalidArgument(format!(
                    "verify_tls must be true or false, got {}",
                    value
                ))
            })?;
        }
        "timeout_secs" | "timeout" => {
            config.timeout_secs = if cleared {
                None
            } else {
                Some(value.parse().map_err(|_| {
                    crate::CliError::InvalidArgument(format!(
                        "timeout_secs must be a whole number of seconds, got {}",
                        value
                    ))
                })?)
            };
        }
        "username" | "user" => {
            config.username = (!cleared).then(|| value.to_string());
        }
        "password" => {
            config.password = (!cleared).then(|| value.to_string());
        }
        _ => {
            return Err(crate::CliError::InvalidArgument(format!(
                "Unknown configuration key: {}. Known keys: verify_tls, timeout_secs, username, password",
                key
            )));
        }
    }
    Ok(())
}
