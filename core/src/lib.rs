//! Uniform GET/POST/PUT/DELETE facade over an async HTTP transport.
//!
//! # Overview
//! Turns a `(route, data, overrides, expected format)` call into a
//! `FinalizedRequest`, sends it through a `Transport`, and classifies the raw
//! status + text body into a `{status, data}` envelope.
//!
//! # Design
//! - `request` builds wire requests and `response` classifies replies. Both
//!   are pure and usable without any I/O (host-does-IO).
//! - `Fetch` is stateless apart from its transport and immutable defaults.
//! - `ReqwestTransport` (feature `reqwest`, on by default) is the stock
//!   transport; anything implementing `Transport` can replace it.
//! - The only side channel is `tracing`: a debug event per request and an
//!   error event when JSON was expected and not received.

pub mod client;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
#[cfg(feature = "reqwest")]
pub mod transport;

pub use client::{Fetch, Transport, Verb};
pub use error::FetchError;
pub use http::{FinalizedRequest, Headers, HttpMethod, HttpResponse, Mode};
pub use request::{build, Data, Overrides, RequestDefaults, RequestSpec};
pub use response::{classify, is_json, ExpectedFormat, ResponseEnvelope, Status};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
