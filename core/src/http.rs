//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! request model produces `FinalizedRequest` values and the classifier
//! consumes `HttpResponse` values; whoever implements `Transport` does the
//! actual I/O in between.
//!
//! All fields use owned types (`String`, `Vec`) so a finalized request can be
//! handed to a transport and outlive the call that built it.

use serde::{Deserialize, Serialize};

/// Ordered header list. Order is preserved on the wire.
pub type Headers = Vec<(String, String)>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// The method token as it appears on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Cross-origin request mode.
///
/// Only meaningful to browser-like transports; carried through so a
/// transport that understands it can honor it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Cors,
    NoCors,
    SameOrigin,
    Navigate,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Cors => "cors",
            Mode::NoCors => "no-cors",
            Mode::SameOrigin => "same-origin",
            Mode::Navigate => "navigate",
        }
    }
}

/// A fully resolved request, ready for a transport.
///
/// GET requests never carry a body; their data lives in the query suffix of
/// `route`. Every other method leaves `route` untouched and carries the
/// encoded data in `body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedRequest {
    pub method: HttpMethod,
    pub mode: Mode,
    pub headers: Headers,
    pub body: Option<String>,
    pub route: String,
}

impl FinalizedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data, with the body fully buffered
/// as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
