//! Backend server information (`GET /`)

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server information returned by the backend root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub cobalt: BackendInfo,
    #[serde(default)]
    pub git: GitInfo,
}

/// The cobalt backend running on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    pub version: String,
    /// Public URL the backend believes it is served from
    pub url: String,
    /// Unix milliseconds; the backend sends it as a string
    #[serde(rename = "startTime", deserialize_with = "millis_from_string_or_number")]
    pub start_time: u64,
    /// Maximum media length in seconds
    #[serde(rename = "durationLimit", default)]
    pub duration_limit: u64,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub remote: String,
}

impl ServerInfo {
    #[must_use]
    pub fn version(&self) -> &str {
        &self.cobalt.version
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.cobalt.start_time).ok()?;
        DateTime::from_timestamp_millis(millis)
    }

    #[must_use]
    pub const fn max_duration(&self) -> Duration {
        Duration::from_secs(self.cobalt.duration_limit)
    }

    #[must_use]
    pub fn supports_service(&self, service: &str) -> bool {
        self.cobalt
            .services
            .iter()
            .any(|enabled| enabled.eq_ignore_ascii_case(service))
    }
}

fn millis_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Number(u64),
        Text(String),
    }

    match Millis::deserialize(deserializer)? {
        Millis::Number(value) => Ok(value),
        Millis::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
