//! Handshake commands.
//!
//! Exchanges, progress and the final body go to `out`; warnings and errors go
//! to stderr.

use std::io::Write;

use osp_handshake::{HandshakeConfig, HandshakeProfile, HandshakeRunner, ServiceType};

use crate::cli::RunArgs;
use crate::output::{format_exchange, format_info, format_success, warning};
use crate::CliConfig;

/// Runs the strict handshake against `endpoint`.
pub async fn run_handshake(
    service_type: &str,
    endpoint: &str,
    options: &RunArgs,
    config: &CliConfig,
    quiet: bool,
    out: &mut impl Write,
) -> crate::CliResult<()> {
    let service: ServiceType = service_type.parse()?;
    execute(
        service,
        endpoint,
        HandshakeProfile::Strict,
        options,
        config,
        quiet,
        out,
    )
    .await
}

/// Runs the session handshake against a WMS `endpoint`.
pub async fn run_session(
    endpoint: &str,
    options: &RunArgs,
    config: &CliConfig,
    quiet: bool,
    out: &mut impl Write,
) -> crate::CliResult<()> {
    execute(
        ServiceType::Wms,
        endpoint,
        HandshakeProfile::Session,
        options,
        config,
        quiet,
        out,
    )
    .await
}

async fn execute(
    service: ServiceType,
    endpoint: &str,
    profile: HandshakeProfile,
    options: &RunArgs,
    config: &CliConfig,
    quiet: bool,
    out: &mut impl Write,
) -> crate::CliResult<()> {
    let client = config
        .client_config(options.tls_verification(), options.timeout)
        .build()?;
    let credentials = config.credentials(options.username.as_deref(), options.password.as_deref());
    let handshake = HandshakeConfig::new(service, endpoint)
        .with_credentials(credentials)
        .with_profile(profile);
    tracing::debug!(%service, %endpoint, ?profile, "starting handshake");

    if !quiet {
        writeln!(out, "{}", format_info(&format!("Running {service} handshake against {endpoint}")))?;
        writeln!(out)?;
    }

    let mut runner = HandshakeRunner::new(client, handshake);
    let result = runner.run().await;

    if !quiet {
        for record in runner.transcript() {
            writeln!(out, "{}", format_exchange(record))?;
        }
    }

    let outcome = result?;

    if !quiet {
        match &outcome.relay_state {
            Some(token) => writeln!(out, "{}", format_info(&format!("RelayState: {token}")))?,
            None => warning("SSO redirect carried no RelayState"),
        }
        writeln!(
            out,
            "{}",
            format_info(&format!("Assertion consumer: {}", outcome.callback_url))
        )?;
        writeln!(
            out,
            "{}",
            format_success(&format!(
                "Handshake completed in {} exchanges",
                outcome.transcript.len()
            ))
        )?;
        writeln!(out)?;
    }

    writeln!(out, "{}", outcome.body)?;
    Ok(())
}
