//! SAML single sign-on handshake runner for secured OGC web services.
//!
//! This crate drives the SSO flow a security-annotated WMS or WPS service
//! provider is expected to support, and fails on the first response that
//! does not match:
//!
//! - **Capabilities** - partial capabilities advertise the complete
//!   capabilities URL, which redirects to the identity provider
//! - **Identity provider** - challenges with HTTP Basic, then returns a
//!   Base64 SAML response once credentials are presented
//! - **Assertion consumer** - the SAML response is posted back to the
//!   service provider, which opens a session
//!
//! # Architecture
//!
//! - [`runner`] - the step sequence and its state machine
//! - [`extract`] - XPath, header and token extraction
//! - [`context`] - write-once values threaded between steps
//! - [`client`] - the shared HTTP client and response capture
//! - [`error`] - error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use osp_handshake::{ClientConfig, HandshakeConfig, HandshakeRunner, ServiceType};
//!
//! let client = ClientConfig::default().build()?;
//! let config = HandshakeConfig::new(ServiceType::Wms, "https://sp.example.com/wms");
//! let outcome = HandshakeRunner::new(client, config).run().await?;
//! println!("{}", outcome.body);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod binding;
pub mod client;
pub mod context;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod namespaces;
pub mod runner;
pub mod service;
pub mod state;
pub mod transcript;

pub use client::{ClientConfig, StepResponse};
pub use context::HandshakeContext;
pub use credentials::Credentials;
pub use error::{HandshakeError, HandshakeResult};
pub use namespaces::NamespaceMap;
pub use runner::{HandshakeConfig, HandshakeOutcome, HandshakeProfile, HandshakeRunner};
pub use service::{ServiceType, UnknownServiceType};
pub use state::{HandshakeState, Step};
pub use transcript::ExchangeRecord;
