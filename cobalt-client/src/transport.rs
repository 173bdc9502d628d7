//! HTTP transport
//!
//! The client talks to the network only through [`Transport`], so the
//! request pipeline can run against a stub in tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use thiserror::Error;

/// Maximum accepted response body (16 MB).
pub const MAX_RESPONSE_SIZE: u64 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    /// No response was received (connect failure, timeout, TLS, ...).
    #[error("request failed: {0}")]
    Send(String),

    /// A response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("response too large ({size} bytes, max {} bytes)", MAX_RESPONSE_SIZE)]
    TooLarge { size: u64 },

    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Fully read response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Final URL after redirects
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    /// Header value as text, `None` when absent or not visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

/// Generic "send a request, get status + headers + body" capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] over a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (shares its connection pool).
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        // HEAD answers advertise the size of a body they never send
        let check_size = request.method != Method::HEAD;
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        if let Some(size) = response.content_length().filter(|_| check_size) {
            if size > MAX_RESPONSE_SIZE {
                return Err(TransportError::TooLarge { size });
            }
        }

        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        if body.len() as u64 > MAX_RESPONSE_SIZE {
            return Err(TransportError::TooLarge {
                size: body.len() as u64,
            });
        }

        Ok(HttpResponse {
            status,
            url,
            headers,
            body,
        })
    }
}
