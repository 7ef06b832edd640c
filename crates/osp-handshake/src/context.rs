//! Values threaded from one handshake step to the next.

use crate::error::{HandshakeError, HandshakeResult};

/// State carried between steps.
///
/// Every field is written once, by the step that derives it, and only read
/// by the steps that follow. A second write fails with
/// [`HandshakeError::ContextOverwrite`]; reading a field that has not been
/// written yet fails with [`HandshakeError::MissingField`].
#[derive(Debug, Clone, Default)]
pub struct HandshakeContext {
    endpoint_url: Option<String>,
    capabilities_url: Option<String>,
    sso_url: Option<String>,
    relay_state: Option<String>,
    encoded_auth_response: Option<String>,
    callback_url: Option<String>,
    session_cookie: Option<String>,
}

/// Writes `value` into an empty slot.
fn write_once(
    slot: &mut Option<String>,
    field: &'static str,
    value: String,
) -> HandshakeResult<()> {
    if slot.is_some() {
        return Err(HandshakeError::ContextOverwrite { field });
    }
    *slot = Some(value);
    Ok(())
}

/// Reads a populated slot.
fn read<'a>(slot: &'a Option<String>, name: &'static str) -> HandshakeResult<&'a str> {
    slot.as_deref().ok_or(HandshakeError::MissingField { name })
}

impl HandshakeContext {
    /// Creates a context for a run against `endpoint_url`.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: Some(endpoint_url.into()),
            ..Self::default()
        }
    }

    /// Service provider endpoint given on input.
    pub fn endpoint_url(&self) -> HandshakeResult<&str> {
        read(&self.endpoint_url, "endpoint-url")
    }

    /// Complete capabilities URL, from step 1.
    pub fn capabilities_url(&self) -> HandshakeResult<&str> {
        read(&self.capabilities_url, "complete-capabilities-url")
    }

    /// Records the complete capabilities URL.
    pub fn set_capabilities_url(&mut self, url: impl Into<String>) -> HandshakeResult<()> {
        write_once(&mut self.capabilities_url, "complete-capabilities-url", url.into())
    }

    /// IdP single sign-on URL, from step 2.
    pub fn sso_url(&self) -> HandshakeResult<&str> {
        read(&self.sso_url, "sso-url")
    }

    /// Records the SSO URL.
    pub fn set_sso_url(&mut self, url: impl Into<String>) -> HandshakeResult<()> {
        write_once(&mut self.sso_url, "sso-url", url.into())
    }

    /// Relay state token from the SSO redirect, if the redirect carried one.
    #[must_use]
    pub fn relay_state(&self) -> Option<&str> {
        self.relay_state.as_deref()
    }

    /// Records the relay state token.
    pub fn set_relay_state(&mut self, token: impl Into<String>) -> HandshakeResult<()> {
        write_once(&mut self.relay_state, "relay-state", token.into())
    }

    /// Base64 authentication response body, from step 4.
    pub fn encoded_auth_response(&self) -> HandshakeResult<&str> {
        read(&self.encoded_auth_response, "encoded-auth-response")
    }

    /// Records the encoded authentication response.
    pub fn set_encoded_auth_response(&mut self, body: impl Into<String>) -> HandshakeResult<()> {
        write_once(
            &mut self.encoded_auth_response,
            "encoded-auth-response",
            body.into(),
        )
    }

    /// Assertion consumer URL, from step 4.
    pub fn callback_url(&self) -> HandshakeResult<&str> {
        read(&self.callback_url, "callback-url")
    }

    /// Records the callback URL.
    pub fn set_callback_url(&mut self, url: impl Into<String>) -> HandshakeResult<()> {
        write_once(&mut self.callback_url, "callback-url", url.into())
    }

    /// `Set-Cookie` value issued by the service provider in step 5, if any.
    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    /// Records the session cookie.
    pub fn set_session_cookie(&mut self, cookie: impl Into<String>) -> HandshakeResult<()> {
        write_once(&mut self.session_cookie, "session-cookie", cookie.into())
    }
}
