//! Wire format of the authentication response posted to the service provider.

/// Form parameter carrying the relay state token.
pub const RELAY_STATE_PARAM: &str = "RelayState";

/// Form parameter carrying the encoded SAML response.
pub const SAML_RESPONSE_PARAM: &str = "SAMLResponse";

/// Content type sent with the post. Not `application/x-www-form-urlencoded`.
pub const ASSERTION_CONTENT_TYPE: &str = "www-form-urlencoded";

/// Builds the body posted to the assertion consumer URL.
///
/// The two parameters are concatenated without an `&` separator and without
/// percent-encoding. A missing relay state contributes an empty value.
#[must_use]
pub fn assertion_post_body(relay_state: Option<&str>, encoded_response: &str) -> String {
    format!(
        "{RELAY_STATE_PARAM}={}{SAML_RESPONSE_PARAM}={encoded_response}",
        relay_state.unwrap_or_default()
    )
}
