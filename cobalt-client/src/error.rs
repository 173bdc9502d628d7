//! Cobalt client error types

use thiserror::Error;

use crate::options::OptionError;
use crate::response::ApiError;
use crate::taxonomy::{self, NET_FAILED, NET_GENERIC, NET_INVALID_RESPONSE};
use crate::transport::TransportError;

/// Error returned by every client operation.
///
/// Coded variants display as their bare code so that the taxonomy can
/// render them; local variants display a plain message.
#[derive(Debug, Error)]
pub enum CobaltError {
    #[error("no url was provided to download")]
    EmptyUrl,

    #[error("invalid option: {0}")]
    InvalidOption(#[from] OptionError),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{code}")]
    Network { code: &'static str, detail: String },

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("error.net.invalid_response")]
    InvalidResponse { detail: String },

    #[error("{}", .0.code)]
    Api(ApiError),
}

impl CobaltError {
    /// Transport failure while sending a request.
    pub(crate) fn send_failed(detail: impl Into<String>) -> Self {
        Self::Network {
            code: NET_FAILED,
            detail: detail.into(),
        }
    }

    /// Liveness probe failure, wrapping whatever went wrong underneath.
    pub(crate) fn unreachable(cause: &Self) -> Self {
        let detail = match cause {
            Self::Network { detail, .. } | Self::InvalidResponse { detail } => detail.clone(),
            other => other.to_string(),
        };
        Self::Network {
            code: NET_GENERIC,
            detail,
        }
    }

    pub(crate) fn invalid_response(detail: impl Into<String>) -> Self {
        Self::InvalidResponse {
            detail: detail.into(),
        }
    }

    /// Machine-readable code, `None` for local errors that never reached the backend.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Network { code, .. } => Some(*code),
            Self::InvalidResponse { .. } => Some(NET_INVALID_RESPONSE),
            Self::Api(error) => Some(&error.code),
            Self::EmptyUrl
            | Self::InvalidOption(_)
            | Self::InvalidUrl(_)
            | Self::InvalidConfig(_)
            | Self::Http { .. } => None,
        }
    }

    /// Backend-reported error, if this is one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// Human-readable rendering for end users.
    #[must_use]
    pub fn describe(&self) -> String {
        self.code()
            .map_or_else(|| self.to_string(), taxonomy::resolve)
    }
}

impl From<ApiError> for CobaltError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}

impl From<TransportError> for CobaltError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Send(detail) => Self::send_failed(detail),
            TransportError::Build(detail) => Self::InvalidConfig(detail),
            other => Self::invalid_response(other.to_string()),
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for CobaltError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidConfig(format!("invalid header value: {err}"))
    }
}

impl From<url::ParseError> for CobaltError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
