//! XML namespaces used by capabilities documents and SAML responses.

use std::collections::BTreeMap;

use crate::service::ServiceType;

/// OWS Common 1.1 namespace URI.
pub const OWS_NS: &str = "http://www.opengis.net/ows/1.1";

/// OWS Common 2.0 namespace URI.
pub const OWS2_NS: &str = "http://www.opengis.net/ows/2.0";

/// OGC Web Services Security 1.0 namespace URI.
pub const OWS_SECURITY_NS: &str = "http://www.opengis.net/security/1.0";

/// SAML 2.0 assertion namespace URI.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace URI.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// W3C XLink namespace URI.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Prefix-to-URI bindings handed to the XPath evaluator.
///
/// Fixed for the lifetime of a run. The only variation is the `ows` prefix,
/// which resolves to OWS 2.0 for every service type except WMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMap {
    bindings: BTreeMap<&'static str, &'static str>,
}

impl NamespaceMap {
    /// Builds the bindings for a service type.
    #[must_use]
    pub fn for_service(service: ServiceType) -> Self {
        let mut bindings = BTreeMap::from([
            ("ows", OWS_NS),
            ("ows2", OWS2_NS),
            ("ows_security", OWS_SECURITY_NS),
            ("saml", SAML_NS),
            ("samlp", SAMLP_NS),
            ("xlink", XLINK_NS),
        ]);

        if service.uses_ows2() {
            bindings.insert("ows", OWS2_NS);
        }

        Self { bindings }
    }

    /// Looks up the URI bound to `prefix`.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&'static str> {
        self.bindings.get(prefix).copied()
    }

    /// Iterates over `(prefix, uri)` pairs in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.bindings.iter().map(|(prefix, uri)| (*prefix, *uri))
    }
}
