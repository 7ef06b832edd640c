//! Record of the exchanges performed during a run.

use std::fmt;

use reqwest::{Method, StatusCode, Url};

use crate::state::Step;

/// One request/response pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRecord {
    /// Step that issued the request.
    pub step: Step,
    /// Request method.
    pub method: Method,
    /// Request URL, including the query string.
    pub url: Url,
    /// Response status.
    pub status: StatusCode,
}

impl ExchangeRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(step: Step, method: Method, url: Url, status: StatusCode) -> Self {
        Self {
            step,
            method,
            url,
            status,
        }
    }

    /// Returns the request line, e.g. `GET http://sp/wms?request=GetCapabilities`.
    #[must_use]
    pub fn request_line(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Returns the status line, e.g. `302 Found`.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_u16(), reason),
            None => self.status.as_u16().to_string(),
        }
    }
}

impl fmt::Display for ExchangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.step,
            self.request_line(),
            self.status_line()
        )
    }
}
