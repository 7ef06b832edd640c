//! HTTP client shared by every step of a run.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::error::{HandshakeError, HandshakeResult};
use crate::state::Step;
use crate::transcript::ExchangeRecord;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("osp/", env!("CARGO_PKG_VERSION"));

/// Transport settings for a handshake run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Verify TLS certificates. Off by default: test deployments of the
    /// security suite serve self-signed certificates.
    pub verify_tls: bool,
    /// Per-request timeout. `None` waits until a response or a transport error.
    pub timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            verify_tls: false,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Enables or disables certificate verification.
    #[must_use]
    pub const fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client.
    ///
    /// Redirects are never followed, so the handshake sees the 302 that
    /// hands it to the identity provider. Cookies are kept for the life of
    /// the client, so a session opened in step 5 is presented in step 6.
    pub fn build(&self) -> HandshakeResult<Client> {
        let mut builder = Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .user_agent(self.user_agent.clone())
            .danger_accept_invalid_certs(!self.verify_tls);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| HandshakeError::Client(e.to_string()))
    }
}

/// A response, fully read.
#[derive(Debug, Clone)]
pub struct StepResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Body text.
    pub body: String,
}

impl StepResponse {
    /// Returns a header as text, if present and valid visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Sends a request for `step` and reads the whole response.
///
/// Returns the response together with its transcript entry.
pub async fn exchange(
    client: &Client,
    step: Step,
    request: RequestBuilder,
) -> HandshakeResult<(StepResponse, ExchangeRecord)> {
    let request = request
        .build()
        .map_err(|source| HandshakeError::Transport { step, source })?;

    let method = request.method().clone();
    let url = request.url().clone();
    tracing::info!(step = step.number(), %method, %url, "request");
    tracing::debug!(step = step.number(), headers = ?request.headers(), "request headers");

    let response = client
        .execute(request)
        .await
        .map_err(|source| HandshakeError::Transport { step, source })?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .text()
        .await
        .map_err(|source| HandshakeError::Transport { step, source })?;

    tracing::info!(step = step.number(), status = status.as_u16(), "response");
    tracing::debug!(step = step.number(), headers = ?headers, "response headers");
    tracing::debug!(step = step.number(), %body, "response body");

    let record = ExchangeRecord::new(step, method, url, status);
    Ok((
        StepResponse {
            status,
            headers,
            body,
        },
        record,
    ))
}
