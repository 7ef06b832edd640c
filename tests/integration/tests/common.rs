//! Mock service and identity providers.
//!
//! The service provider serves capabilities under `/wms` or `/wps`, the
//! complete capabilities under `<path>/full` and the assertion consumer at
//! `/acs`. The identity provider serves `/sso`.

use std::time::Duration;

use osp_handshake::{
    ClientConfig, HandshakeConfig, HandshakeProfile, HandshakeRunner, ServiceType,
};
use osp_integration_tests::{
    encode, saml_response, wms_partial_capabilities, wps_partial_capabilities,
};
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Relay state handed out by the service provider.
pub const RELAY_STATE: &str = "abc123";

/// Body returned by the assertion consumer.
pub const ACS_BODY: &str = "<html><body>Signed in</body></html>";

/// Session cookie issued by the assertion consumer.
pub const SESSION_COOKIE: &str = "sid=1";

/// A service provider and an identity provider.
pub struct Providers {
    /// Service provider.
    pub sp: MockServer,
    /// Identity provider.
    pub idp: MockServer,
}

impl Providers {
    /// Starts both servers with nothing mounted.
    pub async fn start() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("osp_handshake=debug")
            .with_test_writer()
            .try_init();

        Self {
            sp: MockServer::start().await,
            idp: MockServer::start().await,
        }
    }

    /// Starts both servers with every step answering as expected.
    pub async fn happy(service: ServiceType) -> Self {
        let providers = Self::start().await;
        providers.mount_partial(service, providers.partial_ok(service)).await;
        providers.mount_full(service, providers.redirect_to_idp()).await;
        mount_sso_probe(&providers.idp, basic_challenge()).await;
        mount_sso_auth(&providers.idp, providers.auth_response()).await;
        providers.mount_acs(session_opened()).await;
        providers
    }

    /// Service endpoint passed to the runner.
    pub fn endpoint(&self, service: ServiceType) -> String {
        format!("{}{}", self.sp.uri(), service_path(service))
    }

    /// Complete capabilities URL advertised by the partial capabilities.
    pub fn full_url(&self, service: ServiceType) -> String {
        format!("{}/full", self.endpoint(service))
    }

    /// SSO URL on the identity provider carrying [`RELAY_STATE`].
    pub fn sso_url(&self) -> String {
        format!("{}/sso?RelayState={RELAY_STATE}", self.idp.uri())
    }

    /// Assertion consumer URL named in the SAML audience.
    pub fn acs_url(&self) -> String {
        format!("{}/acs", self.sp.uri())
    }

    /// Partial capabilities advertising [`Self::full_url`].
    pub fn partial_ok(&self, service: ServiceType) -> ResponseTemplate {
        let body = match service {
            ServiceType::Wms => wms_partial_capabilities(&self.full_url(service)),
            ServiceType::Wps => wps_partial_capabilities(&self.full_url(service)),
        };
        xml(200, &body)
    }

    /// 302 to [`Self::sso_url`].
    pub fn redirect_to_idp(&self) -> ResponseTemplate {
        ResponseTemplate::new(302).insert_header("Location", self.sso_url().as_str())
    }

    /// 200 carrying the Base64 SAML response for [`Self::acs_url`].
    pub fn auth_response(&self) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(encode(&saml_response(&self.acs_url())))
    }

    /// Answers step 1 and, without a session cookie, step 6.
    pub async fn mount_partial(&self, service: ServiceType, response: ResponseTemplate) {
        capabilities(service, service_path(service))
            .respond_with(response)
            .mount(&self.sp)
            .await;
    }

    /// Answers step 2.
    pub async fn mount_full(&self, service: ServiceType, response: ResponseTemplate) {
        capabilities(service, &format!("{}/full", service_path(service)))
            .respond_with(response)
            .mount(&self.sp)
            .await;
    }

    /// Answers step 5.
    pub async fn mount_acs(&self, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/acs"))
            .respond_with(response)
            .mount(&self.sp)
            .await;
    }

    /// The expected step 5 body.
    pub fn assertion_body(&self, relay_state: &str) -> String {
        format!(
            "RelayState={relay_state}SAMLResponse={}",
            encode(&saml_response(&self.acs_url()))
        )
    }
}

/// Answers step 3 on `server`.
pub async fn mount_sso_probe(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/sso"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Answers step 4 on `server`. Takes precedence over the probe for
/// requests carrying the default test credentials.
pub async fn mount_sso_auth(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/sso"))
        .and(basic_auth("test-user", "test-pass"))
        .respond_with(response)
        .with_priority(1)
        .mount(server)
        .await;
}

/// 401 with a Basic challenge.
pub fn basic_challenge() -> ResponseTemplate {
    ResponseTemplate::new(401).insert_header("WWW-Authenticate", "Basic realm=\"x\"")
}

/// 200 opening a session.
pub fn session_opened() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Set-Cookie", SESSION_COOKIE)
        .set_body_string(ACS_BODY)
}

/// An XML response.
pub fn xml(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("Content-Type", "text/xml")
        .set_body_string(body)
}

/// A runner with the default credentials and a short timeout.
pub fn runner(
    service: ServiceType,
    endpoint: &str,
    profile: HandshakeProfile,
) -> anyhow::Result<HandshakeRunner> {
    let client = ClientConfig::default()
        .with_timeout(Some(Duration::from_secs(10)))
        .build()?;
    let config = HandshakeConfig::new(service, endpoint).with_profile(profile);
    Ok(HandshakeRunner::new(client, config))
}

/// Requests received by `server`, in arrival order.
pub async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

/// Value of header `name` on `request`.
pub fn header<'r>(request: &'r Request, name: &str) -> Option<&'r str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

fn capabilities(service: ServiceType, at: &str) -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path(at))
        .and(query_param("request", "GetCapabilities"))
        .and(query_param("service", service.as_str()))
}

fn service_path(service: ServiceType) -> &'static str {
    match service {
        ServiceType::Wms => "/wms",
        ServiceType::Wps => "/wps",
    }
}
