//! OGC service types under test.

use std::fmt;
use std::str::FromStr;

/// Accept header sent with every GET in the handshake.
pub const ACCEPT_XML: &str = "text/xml, application/xml, */*";

/// Kind of OGC service fronted by the service provider.
///
/// Selects the `ows` namespace binding and where the complete capabilities
/// URL is advertised in the partial capabilities document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    /// Web Map Service. Security annotations sit in
    /// `ows_security:ExtendedSecurityCapabilities` and use OWS 1.1.
    Wms,
    /// Web Processing Service, and any other OWS Common 2.0 service.
    Wps,
}

impl ServiceType {
    /// Returns the value sent as the `service` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wms => "WMS",
            Self::Wps => "WPS",
        }
    }

    /// Returns `true` if the `ows` prefix should resolve to OWS 2.0.
    #[must_use]
    pub const fn uses_ows2(&self) -> bool {
        !matches!(self, Self::Wms)
    }

    /// XPath selecting the `xlink:href` of the GetCapabilities GET binding.
    #[must_use]
    pub const fn capabilities_xpath(&self) -> &'static str {
        match self {
            Self::Wms => {
                "//ows_security:ExtendedSecurityCapabilities//ows:Operation[@name='GetCapabilities']//ows:Get/@xlink:href"
            }
            Self::Wps => {
                "//ows:OperationsMetadata//ows:Operation[@name='GetCapabilities']//ows:Get/@xlink:href"
            }
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a service type name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service type: {0} (expected WMS, WPS or OWS)")]
pub struct UnknownServiceType(pub String);

impl FromStr for ServiceType {
    type Err = UnknownServiceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WMS" => Ok(Self::Wms),
            "WPS" | "OWS" => Ok(Self::Wps),
            _ => Err(UnknownServiceType(s.to_string())),
        }
    }
}
