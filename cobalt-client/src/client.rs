//! Cobalt HTTP Client
//!
//! Runs the request pipeline against one backend:
//! liveness probe, request serialization, `POST /`, response classification.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::CobaltError;
use crate::options::DownloadOptions;
use crate::response::{self, DownloadResponse, Media};
use crate::server::ServerInfo;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Cobalt API client
///
/// Cheap to clone; clones share the same transport (and connection pool).
#[derive(Clone)]
pub struct CobaltClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl CobaltClient {
    /// Create a client with the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self, CobaltError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Create a client configured from `COBALT_*` environment variables.
    pub fn from_env() -> Result<Self, CobaltError> {
        let config = ClientConfig::from_env().map_err(|e| CobaltError::InvalidConfig(e.to_string()))?;
        Self::new(config)
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Point the client at another backend instance.
    pub fn set_api_url(&mut self, api_url: impl Into<String>) {
        self.config.api_url = api_url.into();
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = api_key.into();
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Build a GET/HEAD request carrying the client identity.
    pub(crate) fn request(&self, method: Method, url: impl Into<String>) -> Result<HttpRequest, CobaltError> {
        let mut request = HttpRequest::new(method, url);
        request
            .headers
            .insert(USER_AGENT, HeaderValue::from_str(&self.config.user_agent)?);
        Ok(request)
    }

    /// Send a request and insist on `200 OK`.
    pub(crate) async fn fetch_ok(&self, request: HttpRequest) -> Result<HttpResponse, CobaltError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        if response.status != StatusCode::OK {
            return Err(CobaltError::Http {
                status: response.status,
                url: response.url,
            });
        }
        Ok(response)
    }

    /// Headers for the download request
    fn build_headers(&self) -> Result<HeaderMap, CobaltError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Api-Key {}", self.config.api_key))?,
        );
        Ok(headers)
    }

    /// Get server information from the configured backend.
    pub async fn server_info(&self) -> Result<ServerInfo, CobaltError> {
        self.server_info_at(&self.config.api_url).await
    }

    /// Get server information from any backend, e.g. a directory entry.
    pub async fn server_info_at(&self, api: &str) -> Result<ServerInfo, CobaltError> {
        let api = normalize_api_url(api)?;
        let response = self.fetch_ok(self.request(Method::GET, api)?).await?;
        let info: ServerInfo = serde_json::from_slice(&response.body)
            .map_err(|e| CobaltError::invalid_response(e.to_string()))?;
        debug!(version = %info.cobalt.version, url = %info.cobalt.url, "backend is alive");
        Ok(info)
    }

    /// Ask the backend to process `options.url`.
    ///
    /// The options are only borrowed; nothing in the caller's value changes.
    /// A backend-reported error comes back as [`CobaltError::Api`] with the
    /// backend's code untouched. There are no retries.
    pub async fn run(&self, options: &DownloadOptions) -> Result<DownloadResponse, CobaltError> {
        options.validate()?;

        let api = normalize_api_url(&self.config.api_url)?;

        let server = self.server_info_at(&api).await.map_err(|e| {
            warn!(api = %api, error = ?e, "cobalt server is not reachable");
            CobaltError::unreachable(&e)
        })?;

        let body = serde_json::to_vec(options).map_err(|e| CobaltError::invalid_response(e.to_string()))?;

        let mut request = HttpRequest::new(Method::POST, api);
        request.headers = self.build_headers()?;
        request.body = Some(body);

        debug!(url = %request.url, media = %options.url, "requesting media");
        let response = self.transport.send(request).await?;

        let decoded = response::decode(&response.body).map_err(|e| {
            debug!(status = %response.status, error = %e, "undecodable response");
            CobaltError::invalid_response(e.to_string())
        })?;
        debug!(status = decoded.status(), "decoded response");

        let media = decoded.into_result()?;
        if let Media::Picker(picker) = &media {
            if picker.is_empty() {
                warn!(media = %options.url, "backend returned an empty picker");
            }
        }

        Ok(DownloadResponse { media, server })
    }
}

/// Normalize a backend base URL.
///
/// Bare hosts get `http://` prepended, matching how the backend's own
/// tooling treats them.
pub fn normalize_api_url(api: &str) -> Result<String, CobaltError> {
    let api = api.trim();
    if api.is_empty() {
        return Err(CobaltError::InvalidConfig("empty api url".to_string()));
    }
    let candidate = if api.starts_with("http://") || api.starts_with("https://") {
        api.to_string()
    } else {
        format!("http://{api}")
    };
    let parsed = Url::parse(&candidate)
        .map_err(|e| CobaltError::InvalidConfig(format!("invalid api url {api:?}: {e}")))?;
    Ok(parsed.to_string())
}
