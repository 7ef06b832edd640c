//! End-to-End Integration Tests
//!
//! These tests run the handshake against wiremock servers standing in for
//! the service provider and the identity provider.

mod common;
mod session;
