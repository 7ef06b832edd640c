//! Credentials presented to the identity provider.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};

/// Username used when none is configured.
pub const DEFAULT_USERNAME: &str = "test-user";

/// Password used when none is configured.
pub const DEFAULT_PASSWORD: &str = "test-pass";

/// Username and password for HTTP Basic authentication at the IdP.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the `Authorization` header value: `Basic base64(user:pass)`.
    #[must_use]
    pub fn basic_authorization(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}
