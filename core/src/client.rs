//! Dispatcher facade: `get`, `store`, `update` and `destroy` over a
//! pluggable transport.
//!
//! # Design
//! `Fetch` holds only its transport and an immutable set of request
//! defaults, and carries no mutable state between calls. Each operation
//! builds a `RequestSpec`, finalizes it, hands the result to the transport
//! exactly once, and classifies whatever comes back. Concurrent calls share
//! nothing but `&self`.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::FetchError;
use crate::http::{FinalizedRequest, HttpMethod, HttpResponse};
use crate::request::{to_data, Overrides, RequestDefaults, RequestSpec};
use crate::response::{classify, ExpectedFormat, ResponseEnvelope};

/// The I/O primitive: send one finalized request, return the status and the
/// fully buffered text body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &FinalizedRequest) -> Result<HttpResponse, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &FinalizedRequest) -> Result<HttpResponse, FetchError> {
        (**self).send(request).await
    }
}

/// Named operation selecting a request variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Store,
    Update,
    Destroy,
}

impl Verb {
    /// Case-insensitive. `put` and `delete` are accepted as aliases; any
    /// unrecognized verb is treated as `get`.
    pub fn parse_lossy(verb: &str) -> Self {
        match verb.to_ascii_lowercase().as_str() {
            "store" => Verb::Store,
            "update" | "put" => Verb::Update,
            "destroy" | "delete" => Verb::Destroy,
            _ => Verb::Get,
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Verb::Get => HttpMethod::Get,
            Verb::Store => HttpMethod::Post,
            Verb::Update => HttpMethod::Put,
            Verb::Destroy => HttpMethod::Delete,
        }
    }
}

impl FromStr for Verb {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lossy(s))
    }
}

/// Single entry point for issuing requests.
///
/// `data` is anything that serializes to a key/value map; pass `&()` when a
/// call has no data.
#[derive(Debug, Clone)]
pub struct Fetch<T> {
    transport: T,
    defaults: RequestDefaults,
}

impl<T: Transport> Fetch<T> {
    pub fn new(transport: T) -> Self {
        Self::with_defaults(transport, RequestDefaults::default())
    }

    pub fn with_defaults(transport: T, defaults: RequestDefaults) -> Self {
        Self {
            transport,
            defaults,
        }
    }

    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET with `data` appended to `route` as a query string.
    pub async fn get<D: Serialize + ?Sized>(
        &self,
        route: &str,
        data: &D,
        format: ExpectedFormat,
    ) -> Result<Option<ResponseEnvelope>, FetchError> {
        self.run(Verb::Get, route, data, None, format).await
    }

    /// POST with `data` encoded into the body.
    pub async fn store<D: Serialize + ?Sized>(
        &self,
        route: &str,
        data: &D,
        overrides: Option<Overrides>,
        format: ExpectedFormat,
    ) -> Result<Option<ResponseEnvelope>, FetchError> {
        self.run(Verb::Store, route, data, overrides, format).await
    }

    /// PUT with `data` encoded into the body.
    pub async fn update<D: Serialize + ?Sized>(
        &self,
        route: &str,
        data: &D,
        overrides: Option<Overrides>,
        format: ExpectedFormat,
    ) -> Result<Option<ResponseEnvelope>, FetchError> {
        self.run(Verb::Update, route, data, overrides, format).await
    }

    /// DELETE with `data` encoded into the body. Identifiers are not moved
    /// into the route; embed them in `route` yourself.
    pub async fn destroy<D: Serialize + ?Sized>(
        &self,
        route: &str,
        data: &D,
        overrides: Option<Overrides>,
        format: ExpectedFormat,
    ) -> Result<Option<ResponseEnvelope>, FetchError> {
        self.run(Verb::Destroy, route, data, overrides, format).await
    }

    /// Dispatch by verb. GET ignores `overrides`.
    pub async fn run<D: Serialize + ?Sized>(
        &self,
        verb: Verb,
        route: &str,
        data: &D,
        overrides: Option<Overrides>,
        format: ExpectedFormat,
    ) -> Result<Option<ResponseEnvelope>, FetchError> {
        let spec = RequestSpec::new(verb.method(), route, to_data(data)?)
            .with_overrides(overrides)
            .expecting(format);
        self.execute(&spec).await
    }

    /// Finalize, send once, classify.
    pub async fn execute(
        &self,
        spec: &RequestSpec,
    ) -> Result<Option<ResponseEnvelope>, FetchError> {
        let request = spec.finalize(&self.defaults);
        tracing::debug!(
            method = request.method.as_str(),
            route = %request.route,
            mode = request.mode.as_str(),
            "processing fetch request"
        );

        let response = self.transport.send(&request).await?;
        tracing::debug!(
            status = response.status,
            route = %request.route,
            "fetch response received"
        );

        Ok(classify(response.status, &response.body, spec.expected_format))
    }
}
