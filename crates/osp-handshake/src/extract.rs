//! Value extraction from handshake responses.
//!
//! Each function takes the raw material of one response (body text or a
//! header value) and returns the value the next request needs.

use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use sxd_document::{parser, Package};
use sxd_xpath::{Context, Factory, Value};

use crate::error::{HandshakeError, HandshakeResult};
use crate::namespaces::NamespaceMap;
use crate::service::ServiceType;
use crate::state::Step;

/// XPath selecting the audience of the SAML response, which names the
/// service provider's assertion consumer URL.
pub const AUDIENCE_XPATH: &str = "/samlp:Response//saml:Audience";

/// Challenge scheme the identity provider must offer.
pub const BASIC_SCHEME: &str = "Basic";

/// Evaluates `expression` against `xml` and returns the string value of the
/// first selected node, in document order.
///
/// Returns `Ok(None)` when nothing is selected.
pub fn select_first(
    xml: &str,
    expression: &str,
    namespaces: &NamespaceMap,
    step: Step,
) -> HandshakeResult<Option<String>> {
    let package = parse_with_bindings(xml, namespaces, step)?;
    let document = package.as_document();

    let xpath = Factory::new()
        .build(expression)
        .map_err(|e| HandshakeError::Xml {
            step,
            reason: format!("invalid XPath {expression:?}: {e}"),
        })?
        .ok_or_else(|| HandshakeError::Xml {
            step,
            reason: format!("no XPath compiled from {expression:?}"),
        })?;

    let mut context = Context::new();
    for (prefix, uri) in namespaces.iter() {
        context.set_namespace(prefix, uri);
    }

    let value = xpath
        .evaluate(&context, document.root())
        .map_err(|e| HandshakeError::Xml {
            step,
            reason: format!("XPath evaluation failed: {e}"),
        })?;

    Ok(match value {
        Value::Nodeset(nodes) => nodes.document_order_first().map(|node| node.string_value()),
        Value::String(s) => Some(s),
        Value::Number(_) | Value::Boolean(_) => None,
    })
}

/// Parses `xml`. A document that uses known prefixes without declaring
/// them is parsed again with those prefixes declared on its root element.
fn parse_with_bindings(
    xml: &str,
    namespaces: &NamespaceMap,
    step: Step,
) -> HandshakeResult<Package> {
    match parser::parse(xml) {
        Ok(package) => Ok(package),
        Err(err) => declare_prefixes(xml, namespaces)
            .and_then(|patched| {
                let package = parser::parse(&patched).ok()?;
                tracing::debug!(%step, "parsed after declaring namespace prefixes");
                Some(package)
            })
            .ok_or_else(|| HandshakeError::Xml {
                step,
                reason: format!("{err:?}"),
            }),
    }
}

/// Adds an `xmlns:<prefix>` attribute to the root element for every bound
/// prefix the document never declares. Returns `None` when there is no root
/// element or nothing to add.
fn declare_prefixes(xml: &str, namespaces: &NamespaceMap) -> Option<String> {
    let mut offset = 0;
    let start = loop {
        let at = offset + xml[offset..].find('<')?;
        let rest = &xml[at + 1..];
        if rest.starts_with("!--") {
            offset = at + 1 + rest.find("-->")?;
        } else if rest.starts_with('?') || rest.starts_with('!') {
            offset = at + 1;
        } else {
            break at;
        }
    };
    let name_len = xml[start + 1..].find(|c: char| c.is_whitespace() || c == '/' || c == '>')?;
    let insert_at = start + 1 + name_len;

    let declarations: String = namespaces
        .iter()
        .filter(|(prefix, _)| !xml.contains(&format!("xmlns:{prefix}=")))
        .map(|(prefix, uri)| format!(" xmlns:{prefix}=\"{uri}\""))
        .collect();
    if declarations.is_empty() {
        return None;
    }

    let mut patched = String::with_capacity(xml.len() + declarations.len());
    patched.push_str(&xml[..insert_at]);
    patched.push_str(&declarations);
    patched.push_str(&xml[insert_at..]);
    Some(patched)
}

/// Checks that `xml` is a well-formed document.
pub fn ensure_well_formed(xml: &str, step: Step) -> HandshakeResult<()> {
    parser::parse(xml)
        .map(drop)
        .map_err(|e| HandshakeError::Xml {
            step,
            reason: format!("{e:?}"),
        })
}

/// Extracts the complete capabilities URL from a partial capabilities document.
pub fn complete_capabilities_url(xml: &str, service: ServiceType) -> HandshakeResult<String> {
    let namespaces = NamespaceMap::for_service(service);
    select_first(
        xml,
        service.capabilities_xpath(),
        &namespaces,
        Step::PartialCapabilities,
    )?
    .map(|href| href.trim().to_string())
    .filter(|href| !href.is_empty())
    .ok_or(HandshakeError::MissingField {
        name: "complete-capabilities-url",
    })
}

/// Extracts the `RelayState` token from an SSO redirect URL.
///
/// The token is taken verbatim, without percent-decoding.
#[must_use]
pub fn relay_state(sso_url: &str) -> Option<String> {
    static RELAY_STATE: OnceLock<Regex> = OnceLock::new();
    let pattern =
        RELAY_STATE.get_or_init(|| Regex::new("RelayState=([^&]+)").expect("valid pattern"));

    pattern
        .captures(sso_url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Returns `true` if a `WWW-Authenticate` value offers the Basic scheme.
#[must_use]
pub fn is_basic_challenge(www_authenticate: &str) -> bool {
    www_authenticate.starts_with(BASIC_SCHEME)
}

/// Decodes the Base64 authentication response returned by the IdP.
///
/// ASCII whitespace (line wrapping) is ignored.
pub fn decode_auth_response(encoded: &str) -> HandshakeResult<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact)?;
    String::from_utf8(bytes)
        .map_err(|e| HandshakeError::Base64Decode(format!("invalid UTF-8 in decoded response: {e}")))
}

/// Extracts the callback (assertion consumer) URL from a decoded SAML response.
pub fn callback_url(xml: &str, namespaces: &NamespaceMap) -> HandshakeResult<String> {
    select_first(xml, AUDIENCE_XPATH, namespaces, Step::SsoAuthentication)?
        .map(|audience| audience.trim().to_string())
        .filter(|audience| !audience.is_empty())
        .ok_or(HandshakeError::MissingField {
            name: "callback-url",
        })
}
