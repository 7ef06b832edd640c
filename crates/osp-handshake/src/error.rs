//! Handshake error types.
//!
//! Every check in the handshake is local and immediate: the first failed
//! expectation becomes one of these variants and aborts the run. Transport
//! failures carry the same weight as protocol violations.

use thiserror::Error;

use crate::state::Step;

/// Result type for handshake operations.
pub type HandshakeResult<T> = Result<T, HandshakeError>;

/// Handshake failures.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// A response carried a status code other than the one required.
    #[error("{step}: unexpected response status: expected {expected}, got {actual}")]
    UnexpectedStatus {
        /// Step that issued the request.
        step: Step,
        /// Required status code.
        expected: u16,
        /// Status code received.
        actual: u16,
    },

    /// An XML or context value that a later step depends on was empty.
    #[error("missing {name}")]
    MissingField {
        /// Name of the missing value.
        name: &'static str,
    },

    /// A required response header was absent.
    #[error("{step}: missing {name} header")]
    MissingHeader {
        /// Step that issued the request.
        step: Step,
        /// Header name.
        name: &'static str,
    },

    /// The identity provider challenged with something other than Basic.
    #[error("unsupported authentication challenge: {actual}")]
    UnsupportedAuthScheme {
        /// The `WWW-Authenticate` value received.
        actual: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("{step}: transport error: {source}")]
    Transport {
        /// Step that issued the request.
        step: Step,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// A response body was not well-formed XML, or an XPath failed to evaluate.
    #[error("{step}: XML error: {reason}")]
    Xml {
        /// Step whose response was being parsed.
        step: Step,
        /// Parser or evaluator message.
        reason: String,
    },

    /// The authentication response was not valid Base64.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// A URL taken from a response could not be used for the next request.
    #[error("{step}: invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// Step that needed the URL.
        step: Step,
        /// The offending value.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Capabilities fetched inside the session were still the partial,
    /// pre-login document.
    #[error("{step}: session not recognised: capabilities still advertise the complete capabilities redirect")]
    SessionNotRecognised {
        /// Step that issued the request.
        step: Step,
    },

    /// A step was invoked before the step preceding it had passed.
    #[error("{step} cannot run from state {state}")]
    OutOfOrder {
        /// Step that was invoked.
        step: Step,
        /// Runner state at the time, rendered for display.
        state: String,
    },

    /// A context field was written twice.
    #[error("handshake context field already set: {field}")]
    ContextOverwrite {
        /// Field name.
        field: &'static str,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl HandshakeError {
    /// Returns the step this error is attributed to, if any.
    #[must_use]
    pub const fn step(&self) -> Option<Step> {
        match self {
            Self::UnexpectedStatus { step, .. }
            | Self::MissingHeader { step, .. }
            | Self::Transport { step, .. }
            | Self::Xml { step, .. }
            | Self::InvalidUrl { step, .. }
            | Self::SessionNotRecognised { step }
            | Self::OutOfOrder { step, .. } => Some(*step),
            Self::UnsupportedAuthScheme { .. } => Some(Step::SsoProbe),
            Self::MissingField { .. }
            | Self::Base64Decode(_)
            | Self::ContextOverwrite { .. }
            | Self::Client(_) => None,
        }
    }

    /// Returns `true` if the failure came from the network rather than the peer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<base64::DecodeError> for HandshakeError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}
