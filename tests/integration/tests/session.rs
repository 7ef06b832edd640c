//! Session-profile runs, which fetch capabilities again after the
//! assertion post.

use osp_handshake::{HandshakeError, HandshakeProfile, HandshakeState, ServiceType, Step};
use osp_integration_tests::PLAIN_CAPABILITIES;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    basic_challenge, mount_sso_auth, mount_sso_probe, received, runner, xml, Providers,
    ACS_BODY, SESSION_COOKIE,
};

/// Mounts the capabilities served to a client presenting the session cookie.
async fn mount_session_capabilities(providers: &Providers, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/wms"))
        .and(query_param("request", "GetCapabilities"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(response)
        .with_priority(1)
        .mount(&providers.sp)
        .await;
}

/// Tests that step 6 presents the session cookie and returns its body.
#[tokio::test]
async fn test_session_capabilities_use_cookie() -> anyhow::Result<()> {
    let providers = Providers::happy(ServiceType::Wms).await;
    mount_session_capabilities(&providers, xml(200, PLAIN_CAPABILITIES)).await;

    let mut runner = runner(
        ServiceType::Wms,
        &providers.endpoint(ServiceType::Wms),
        HandshakeProfile::Session,
    )?;
    let outcome = runner.run().await?;

    assert_eq!(outcome.body, PLAIN_CAPABILITIES);
    assert_ne!(outcome.body, ACS_BODY);
    assert_eq!(outcome.transcript.len(), 6);
    assert_eq!(outcome.transcript[5].step, Step::SessionReauth);
    assert_eq!(runner.state(), HandshakeState::Done);
    assert_eq!(runner.context().session_cookie(), Some(SESSION_COOKIE));

    let requests = received(&providers.sp).await;
    assert_eq!(requests.len(), 4);
    assert!(
        requests[0].headers.get("cookie").is_none(),
        "no cookie before the assertion post"
    );
    assert_eq!(
        requests[3].headers.get("cookie").and_then(|v| v.to_str().ok()),
        Some(SESSION_COOKIE)
    );
    assert_eq!(
        requests[3].url.query(),
        Some("request=GetCapabilities&service=WMS")
    );

    Ok(())
}

/// Tests that the assertion response is not checked under the session profile.
#[tokio::test]
async fn test_assertion_response_unchecked() -> anyhow::Result<()> {
    let providers = Providers::start().await;
    providers
        .mount_partial(ServiceType::Wms, providers.partial_ok(ServiceType::Wms))
        .await;
    providers
        .mount_full(ServiceType::Wms, providers.redirect_to_idp())
        .await;
    mount_sso_probe(&providers.idp, basic_challenge()).await;
    mount_sso_auth(&providers.idp, providers.auth_response()).await;
    providers
        .mount_acs(ResponseTemplate::new(403).insert_header("Set-Cookie", SESSION_COOKIE))
        .await;
    mount_session_capabilities(&providers, xml(200, PLAIN_CAPABILITIES)).await;

    let mut runner = runner(
        ServiceType::Wms,
        &providers.endpoint(ServiceType::Wms),
        HandshakeProfile::Session,
    )?;
    let outcome = runner.run().await?;

    assert_eq!(outcome.transcript[4].status.as_u16(), 403);
    assert_eq!(outcome.transcript[5].status.as_u16(), 200);
    assert_eq!(outcome.body, PLAIN_CAPABILITIES);
    assert_eq!(runner.context().session_cookie(), Some(SESSION_COOKIE));

    Ok(())
}

/// Tests that a session the service provider does not recognise fails step 6.
#[tokio::test]
async fn test_session_not_recognised() -> anyhow::Result<()> {
    let providers = Providers::happy(ServiceType::Wms).await;
    mount_session_capabilities(&providers, providers.redirect_to_idp()).await;

    let mut runner = runner(
        ServiceType::Wms,
        &providers.endpoint(ServiceType::Wms),
        HandshakeProfile::Session,
    )?;
    let err = runner
        .run()
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("handshake unexpectedly succeeded"))?;

    assert!(matches!(
        err,
        HandshakeError::UnexpectedStatus {
            step: Step::SessionReauth,
            expected: 200,
            actual: 302,
        }
    ));
    assert_eq!(runner.state(), HandshakeState::Failed(Some(Step::SessionReauth)));

    Ok(())
}

/// Tests that step 6 must return an XML document.
#[tokio::test]
async fn test_session_capabilities_not_xml() -> anyhow::Result<()> {
    let providers = Providers::happy(ServiceType::Wms).await;
    mount_session_capabilities(
        &providers,
        ResponseTemplate::new(200).set_body_string("<html><body>Sign in</body>"),
    )
    .await;

    let mut runner = runner(
        ServiceType::Wms,
        &providers.endpoint(ServiceType::Wms),
        HandshakeProfile::Session,
    )?;
    let err = runner
        .run()
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("handshake unexpectedly succeeded"))?;

    assert!(matches!(
        err,
        HandshakeError::Xml {
            step: Step::SessionReauth,
            ..
        }
    ));

    Ok(())
}

/// Tests that getting the partial capabilities back in step 6 fails the run.
#[tokio::test]
async fn test_partial_capabilities_after_login() -> anyhow::Result<()> {
    let providers = Providers::happy(ServiceType::Wms).await;

    let mut runner = runner(
        ServiceType::Wms,
        &providers.endpoint(ServiceType::Wms),
        HandshakeProfile::Session,
    )?;
    let err = runner
        .run()
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("handshake unexpectedly succeeded"))?;

    assert!(matches!(
        err,
        HandshakeError::SessionNotRecognised {
            step: Step::SessionReauth
        }
    ));
    assert_eq!(runner.state(), HandshakeState::Failed(Some(Step::SessionReauth)));
    assert_eq!(runner.transcript().len(), 6);

    Ok(())
}

/// Tests that a session never opened by the assertion consumer fails step 6.
#[tokio::test]
async fn test_no_cookie_issued() -> anyhow::Result<()> {
    let providers = Providers::start().await;
    providers
        .mount_partial(ServiceType::Wms, providers.partial_ok(ServiceType::Wms))
        .await;
    providers
        .mount_full(ServiceType::Wms, providers.redirect_to_idp())
        .await;
    mount_sso_probe(&providers.idp, basic_challenge()).await;
    mount_sso_auth(&providers.idp, providers.auth_response()).await;
    providers
        .mount_acs(ResponseTemplate::new(200).set_body_string(ACS_BODY))
        .await;
    mount_session_capabilities(&providers, xml(200, PLAIN_CAPABILITIES)).await;

    let mut runner = runner(
        ServiceType::Wms,
        &providers.endpoint(ServiceType::Wms),
        HandshakeProfile::Session,
    )?;
    let err = runner
        .run()
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("handshake unexpectedly succeeded"))?;

    assert_eq!(err.step(), Some(Step::SessionReauth));
    assert_eq!(runner.context().session_cookie(), None);

    Ok(())
}
