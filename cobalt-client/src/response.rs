//! Backend response model
//!
//! The backend replies with a single JSON object whose shape depends on its
//! `status` field. Each status decodes into its own variant, so a picker list
//! on a tunnel response (or a download URL on an error) cannot be represented.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::server::ServerInfo;

/// Response decoding failure
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Malformed JSON, or a missing/unknown `status`, or a variant missing its fields.
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("error response without an error code")]
    MissingErrorCode,
}

/// A response as sent by the backend, one variant per `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    /// File is proxied through the backend.
    Tunnel(Download),
    /// Direct link to the file on the origin service.
    Redirect(Download),
    /// Several media items to choose from.
    Picker(Picker),
    Error { error: ApiError },
}

impl ApiResponse {
    /// Wire value of the `status` field
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Tunnel(_) => "tunnel",
            Self::Redirect(_) => "redirect",
            Self::Picker(_) => "picker",
            Self::Error { .. } => "error",
        }
    }

    /// Split into the successful media or the backend's error.
    pub fn into_result(self) -> Result<Media, ApiError> {
        match self {
            Self::Tunnel(download) => Ok(Media::Tunnel(download)),
            Self::Redirect(download) => Ok(Media::Redirect(download)),
            Self::Picker(picker) => Ok(Media::Picker(picker)),
            Self::Error { error } => Err(error),
        }
    }
}

/// Decode a raw response body.
pub fn decode(body: &[u8]) -> Result<ApiResponse, DecodeError> {
    let response: ApiResponse = serde_json::from_slice(body)?;
    if let ApiResponse::Error { error } = &response {
        if error.code.trim().is_empty() {
            return Err(DecodeError::MissingErrorCode);
        }
    }
    Ok(response)
}

/// Single ready-to-fetch file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    pub url: String,
    #[serde(default)]
    pub filename: String,
}

/// Multi-item result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picker {
    pub picker: Vec<PickerItem>,
    /// Background audio for slideshows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(
        rename = "audioFilename",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_filename: Option<String>,
}

impl Picker {
    /// An empty picker is well-formed JSON but gives the caller nothing to choose.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picker.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerItem {
    #[serde(rename = "type")]
    pub kind: PickerItemType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerItemType {
    Photo,
    Video,
    Gif,
    #[serde(other)]
    Other,
}

/// Error reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Dot-namespaced machine code, e.g. `error.api.auth.key.invalid`
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

impl ApiError {
    /// Service that failed, when the backend says so.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.context.as_ref()?.service.as_deref()
    }

    /// Rate limit or maximum duration, depending on the code.
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.context.as_ref()?.limit
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// Successful backend result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Media {
    Tunnel(Download),
    Redirect(Download),
    Picker(Picker),
}

impl Media {
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Tunnel(_) => "tunnel",
            Self::Redirect(_) => "redirect",
            Self::Picker(_) => "picker",
        }
    }

    /// Download link for tunnel/redirect results
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Tunnel(download) | Self::Redirect(download) => Some(&download.url),
            Self::Picker(_) => None,
        }
    }

    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Tunnel(download) | Self::Redirect(download) => Some(&download.filename),
            Self::Picker(_) => None,
        }
    }

    /// Picker items, in backend order
    #[must_use]
    pub fn picker(&self) -> Option<&[PickerItem]> {
        match self {
            Self::Picker(picker) => Some(&picker.picker),
            Self::Tunnel(_) | Self::Redirect(_) => None,
        }
    }
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResponse {
    #[serde(flatten)]
    pub media: Media,
    /// Backend metadata captured by the liveness probe of the same run.
    pub server: ServerInfo,
}

impl DownloadResponse {
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.media.url()
    }

    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.media.filename()
    }

    #[must_use]
    pub fn picker(&self) -> Option<&[PickerItem]> {
        self.media.picker()
    }
}
