//! `Transport` backed by `reqwest`.
//!
//! `mode` is a browser concept with no reqwest counterpart, so it is not
//! sent. Status codes are never turned into errors here; that is the
//! classifier's job.

use async_trait::async_trait;

use crate::client::Transport;
use crate::error::FetchError;
use crate::http::{FinalizedRequest, HttpMethod, HttpResponse};

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (connection pool, proxy and TLS settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &FinalizedRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.route.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let res = builder.send().await.map_err(FetchError::transport)?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(FetchError::transport)?;

        Ok(HttpResponse::new(status, body))
    }
}
