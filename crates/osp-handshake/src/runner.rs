//! The SSO handshake state machine.
//!
//! A run walks the service provider and identity provider through, in order:
//!
//! 1. `GET` partial capabilities, expect 200, extract the complete capabilities URL
//! 2. `GET` complete capabilities, expect 302, take `Location` and `RelayState`
//! 3. `GET` the SSO URL without credentials, expect a Basic challenge
//! 4. `GET` the SSO URL with credentials, expect 200 and a SAML response
//! 5. `POST` the SAML response to the audience URL
//! 6. `GET` capabilities again inside the session (session profile only)
//!
//! The first failed check moves the runner to [`HandshakeState::Failed`] and
//! is returned; nothing after it is requested.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION, SET_COOKIE, WWW_AUTHENTICATE};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::binding::{assertion_post_body, ASSERTION_CONTENT_TYPE};
use crate::client::{exchange, StepResponse};
use crate::context::HandshakeContext;
use crate::credentials::Credentials;
use crate::error::{HandshakeError, HandshakeResult};
use crate::extract;
use crate::namespaces::NamespaceMap;
use crate::service::{ServiceType, ACCEPT_XML};
use crate::state::{HandshakeState, Step};
use crate::transcript::ExchangeRecord;

/// Which checks and stages a run includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandshakeProfile {
    /// Steps 1 to 5; step 5 must return 200 with a `Set-Cookie` header.
    #[default]
    Strict,
    /// Steps 1 to 5 without checks on step 5, then step 6.
    Session,
}

impl HandshakeProfile {
    /// Returns `true` if the step 5 response is checked.
    #[must_use]
    pub const fn checks_assertion_response(&self) -> bool {
        matches!(self, Self::Strict)
    }

    /// Returns `true` if step 6 runs.
    #[must_use]
    pub const fn confirms_session(&self) -> bool {
        matches!(self, Self::Session)
    }
}

/// Inputs of a run.
#[derive(Debug, Clone)]
pub struct HandshakeConfig {
    /// Service type under test.
    pub service: ServiceType,
    /// Service provider endpoint.
    pub endpoint: String,
    /// Credentials presented to the identity provider.
    pub credentials: Credentials,
    /// Checks and stages to perform.
    pub profile: HandshakeProfile,
}

impl HandshakeConfig {
    /// Creates a strict-profile configuration with the default test credentials.
    pub fn new(service: ServiceType, endpoint: impl Into<String>) -> Self {
        Self {
            service,
            endpoint: endpoint.into(),
            credentials: Credentials::default(),
            profile: HandshakeProfile::Strict,
        }
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Sets the profile.
    #[must_use]
    pub fn with_profile(mut self, profile: HandshakeProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct HandshakeOutcome {
    /// Body of the last response: step 5, or step 6 under the session profile.
    pub body: String,
    /// Relay state carried through the SSO redirect.
    pub relay_state: Option<String>,
    /// Assertion consumer URL taken from the SAML audience.
    pub callback_url: String,
    /// Every exchange performed, in order.
    pub transcript: Vec<ExchangeRecord>,
}

/// Drives one handshake.
#[derive(Debug)]
pub struct HandshakeRunner {
    client: Client,
    service: ServiceType,
    credentials: Credentials,
    profile: HandshakeProfile,
    namespaces: NamespaceMap,
    context: HandshakeContext,
    state: HandshakeState,
    transcript: Vec<ExchangeRecord>,
    partial_body: Option<String>,
    last_body: Option<String>,
}

impl HandshakeRunner {
    /// Creates a runner that issues every request through `client`.
    #[must_use]
    pub fn new(client: Client, config: HandshakeConfig) -> Self {
        Self {
            client,
            service: config.service,
            credentials: config.credentials,
            profile: config.profile,
            namespaces: NamespaceMap::for_service(config.service),
            context: HandshakeContext::new(config.endpoint),
            state: HandshakeState::Start,
            transcript: Vec::new(),
            partial_body: None,
            last_body: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> HandshakeState {
        self.state
    }

    /// Values derived so far.
    #[must_use]
    pub const fn context(&self) -> &HandshakeContext {
        &self.context
    }

    /// Exchanges performed so far.
    #[must_use]
    pub fn transcript(&self) -> &[ExchangeRecord] {
        &self.transcript
    }

    /// Runs every step of the configured profile.
    pub async fn run(&mut self) -> HandshakeResult<HandshakeOutcome> {
        self.partial_capabilities().await?;
        self.full_capabilities().await?;
        self.sso_probe().await?;
        self.sso_authenticate().await?;
        let mut body = self.post_assertion().await?;
        if self.profile.confirms_session() {
            body = self.session_reauth().await?;
        }

        self.state = HandshakeState::Done;
        tracing::info!(service = %self.service, "handshake completed");

        Ok(HandshakeOutcome {
            body,
            relay_state: self.context.relay_state().map(str::to_string),
            callback_url: self.context.callback_url()?.to_string(),
            transcript: self.transcript.clone(),
        })
    }

    /// Step 1: fetch the partial capabilities document.
    pub async fn partial_capabilities(&mut self) -> HandshakeResult<()> {
        let step = Step::PartialCapabilities;
        self.begin(step)?;
        let result = self.fetch_partial_capabilities().await;
        self.settle(step, result)
    }

    /// Step 2: fetch the complete capabilities document.
    pub async fn full_capabilities(&mut self) -> HandshakeResult<()> {
        let step = Step::FullCapabilities;
        self.begin(step)?;
        let result = self.fetch_full_capabilities().await;
        self.settle(step, result)
    }

    /// Step 3: request the SSO URL without credentials.
    pub async fn sso_probe(&mut self) -> HandshakeResult<()> {
        let step = Step::SsoProbe;
        self.begin(step)?;
        let result = self.probe_sso().await;
        self.settle(step, result)
    }

    /// Step 4: request the SSO URL with credentials.
    pub async fn sso_authenticate(&mut self) -> HandshakeResult<()> {
        let step = Step::SsoAuthentication;
        self.begin(step)?;
        let result = self.authenticate_sso().await;
        self.settle(step, result)
    }

    /// Step 5: post the authentication response. Returns the response body.
    pub async fn post_assertion(&mut self) -> HandshakeResult<String> {
        let step = Step::PostAssertion;
        self.begin(step)?;
        let result = self.send_assertion().await;
        self.settle(step, result)?;
        Ok(self.last_body.clone().unwrap_or_default())
    }

    /// Step 6: fetch capabilities again inside the session opened by step 5.
    /// Returns the response body.
    pub async fn session_reauth(&mut self) -> HandshakeResult<String> {
        let step = Step::SessionReauth;
        self.begin(step)?;
        let result = self.refetch_in_session().await;
        self.settle(step, result)?;
        Ok(self.last_body.clone().unwrap_or_default())
    }

    async fn fetch_partial_capabilities(&mut self) -> HandshakeResult<()> {
        let step = Step::PartialCapabilities;
        let endpoint = self.context.endpoint_url()?.to_string();
        let response = self.get_capabilities(step, &endpoint).await?;
        expect_status(step, &response, StatusCode::OK)?;

        let url = extract::complete_capabilities_url(&response.body, self.service)?;
        tracing::debug!(%url, "complete capabilities URL");
        self.context.set_capabilities_url(url)?;
        self.partial_body = Some(response.body);
        Ok(())
    }

    async fn fetch_full_capabilities(&mut self) -> HandshakeResult<()> {
        let step = Step::FullCapabilities;
        let capabilities_url = self.context.capabilities_url()?.to_string();
        let response = self.get_capabilities(step, &capabilities_url).await?;
        expect_status(step, &response, StatusCode::FOUND)?;

        let location = response
            .header(LOCATION.as_str())
            .ok_or(HandshakeError::MissingHeader {
                step,
                name: "Location",
            })?;
        let base = parse_url(step, &capabilities_url)?;
        let sso_url = base
            .join(location)
            .map_err(|e| HandshakeError::InvalidUrl {
                step,
                url: location.to_string(),
                reason: e.to_string(),
            })?
            .to_string();

        match extract::relay_state(location) {
            Some(token) => self.context.set_relay_state(token)?,
            None => tracing::warn!(%sso_url, "SSO redirect carries no RelayState"),
        }
        tracing::debug!(%sso_url, "SSO URL");
        self.context.set_sso_url(sso_url)
    }

    async fn probe_sso(&mut self) -> HandshakeResult<()> {
        let step = Step::SsoProbe;
        let url = parse_url(step, self.context.sso_url()?)?;
        let request = self.client.get(url).header(ACCEPT, ACCEPT_XML);
        let response = self.send(step, request).await?;

        let challenge =
            response
                .header(WWW_AUTHENTICATE.as_str())
                .ok_or(HandshakeError::MissingHeader {
                    step,
                    name: "WWW-Authenticate",
                })?;
        if !extract::is_basic_challenge(challenge) {
            return Err(HandshakeError::UnsupportedAuthScheme {
                actual: challenge.to_string(),
            });
        }
        Ok(())
    }

    async fn authenticate_sso(&mut self) -> HandshakeResult<()> {
        let step = Step::SsoAuthentication;
        let url = parse_url(step, self.context.sso_url()?)?;
        let request = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_XML)
            .header(AUTHORIZATION, self.credentials.basic_authorization());
        let response = self.send(step, request).await?;
        expect_status(step, &response, StatusCode::OK)?;

        let decoded = extract::decode_auth_response(&response.body)?;
        let callback_url = extract::callback_url(&decoded, &self.namespaces)?;
        tracing::debug!(%callback_url, "assertion consumer URL");

        self.context.set_encoded_auth_response(response.body)?;
        self.context.set_callback_url(callback_url)
    }

    async fn send_assertion(&mut self) -> HandshakeResult<()> {
        let step = Step::PostAssertion;
        let url = parse_url(step, self.context.callback_url()?)?;
        let body = assertion_post_body(
            self.context.relay_state(),
            self.context.encoded_auth_response()?,
        );
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, ASSERTION_CONTENT_TYPE)
            .body(body);
        let response = self.send(step, request).await?;

        if self.profile.checks_assertion_response() {
            expect_status(step, &response, StatusCode::OK)?;
        }
        match response.header(SET_COOKIE.as_str()) {
            Some(cookie) => self.context.set_session_cookie(cookie)?,
            None if self.profile.checks_assertion_response() => {
                return Err(HandshakeError::MissingHeader {
                    step,
                    name: "Set-Cookie",
                });
            }
            None => {}
        }

        self.last_body = Some(response.body);
        Ok(())
    }

    async fn refetch_in_session(&mut self) -> HandshakeResult<()> {
        let step = Step::SessionReauth;
        if self.context.session_cookie().is_none() {
            tracing::warn!("no session cookie was issued; refetching without one");
        }
        let endpoint = self.context.endpoint_url()?.to_string();
        let response = self.get_capabilities(step, &endpoint).await?;
        expect_status(step, &response, StatusCode::OK)?;
        extract::ensure_well_formed(&response.body, step)?;

        // The pre-login document still points at the complete capabilities.
        let unchanged = self.partial_body.as_deref() == Some(response.body.as_str());
        if unchanged || extract::complete_capabilities_url(&response.body, self.service).is_ok() {
            return Err(HandshakeError::SessionNotRecognised { step });
        }

        self.last_body = Some(response.body);
        Ok(())
    }

    /// Issues the GetCapabilities request shared by steps 1, 2 and 6.
    async fn get_capabilities(&mut self, step: Step, url: &str) -> HandshakeResult<StepResponse> {
        let url = capabilities_request_url(&parse_url(step, url)?, self.service);
        let request = self.client.get(url).header(ACCEPT, ACCEPT_XML);
        self.send(step, request).await
    }

    async fn send(
        &mut self,
        step: Step,
        request: reqwest::RequestBuilder,
    ) -> HandshakeResult<StepResponse> {
        let (response, record) = exchange(&self.client, step, request).await?;
        self.transcript.push(record);
        Ok(response)
    }

    fn begin(&mut self, step: Step) -> HandshakeResult<()> {
        let ready = match step {
            Step::SessionReauth => {
                self.profile.confirms_session() && self.state.next_step() == Some(step)
            }
            _ => self.state.next_step() == Some(step),
        };
        if ready {
            tracing::debug!(%step, "starting");
            Ok(())
        } else {
            Err(HandshakeError::OutOfOrder {
                step,
                state: format!("{:?}", self.state),
            })
        }
    }

    fn settle(&mut self, step: Step, result: HandshakeResult<()>) -> HandshakeResult<()> {
        match result {
            Ok(()) => {
                tracing::info!(%step, "passed");
                self.state = step.completed_state();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%step, error = %err, "failed");
                self.state = HandshakeState::Failed(Some(step));
                Err(err)
            }
        }
    }
}

fn expect_status(step: Step, response: &StepResponse, expected: StatusCode) -> HandshakeResult<()> {
    if response.status == expected {
        Ok(())
    } else {
        Err(HandshakeError::UnexpectedStatus {
            step,
            expected: expected.as_u16(),
            actual: response.status.as_u16(),
        })
    }
}

/// Sets the `request` and `service` parameters on `url`, replacing any values
/// already present and keeping every other parameter.
fn capabilities_request_url(url: &Url, service: ServiceType) -> Url {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "request" && key != "service")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("request", "GetCapabilities")
        .append_pair("service", service.as_str());
    url
}

fn parse_url(step: Step, url: &str) -> HandshakeResult<Url> {
    Url::parse(url).map_err(|e| HandshakeError::InvalidUrl {
        step,
        url: url.to_string(),
        reason: e.to_string(),
    })
}
