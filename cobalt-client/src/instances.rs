//! Instance directory
//!
//! Community-run backends are listed by a directory service. Only entries
//! running a release that speaks the current API are handed to callers.

use std::collections::HashMap;

use reqwest::Method;
use semver::Version;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::CobaltClient;
use crate::error::CobaltError;

/// One directory entry
///
/// Missing, `null` or mistyped fields decode to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// API host, usually without a scheme (see [`InstanceRecord::api_url`])
    #[serde(default, deserialize_with = "lenient_string")]
    pub api: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub frontend: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub branch: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commit: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub cors: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub nodomain: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub online: OnlineStatus,
    #[serde(default, deserialize_with = "lenient_string")]
    pub protocol: String,
    #[serde(default, deserialize_with = "lenient")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub trust: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    /// Service name to status as reported by the directory
    #[serde(default, deserialize_with = "lenient")]
    pub services: HashMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineStatus {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub api: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub frontend: bool,
}

impl InstanceRecord {
    /// API base URL, using the advertised protocol (https when absent).
    #[must_use]
    pub fn api_url(&self) -> String {
        if self.api.starts_with("http://") || self.api.starts_with("https://") {
            return self.api.clone();
        }
        let protocol = if self.protocol.is_empty() {
            "https"
        } else {
            self.protocol.as_str()
        };
        format!("{protocol}://{}", self.api)
    }

    #[must_use]
    pub const fn is_api_online(&self) -> bool {
        self.online.api
    }

    #[must_use]
    pub const fn is_frontend_online(&self) -> bool {
        self.online.frontend
    }

    #[must_use]
    pub const fn trust_score(&self) -> i64 {
        self.trust
    }

    /// Whether the directory reports `service` as working on this instance.
    #[must_use]
    pub fn supports(&self, service: &str) -> bool {
        matches!(self.services.get(service), Some(Value::Bool(true)))
    }

    /// Parsed `version`, `None` when it is not a recognizable release.
    #[must_use]
    pub fn parsed_version(&self) -> Option<Version> {
        parse_version(&self.version)
    }
}

/// Lenient semantic version parsing.
///
/// Accepts a `v` prefix and pads missing minor/patch components
/// (`10` and `10.2` become `10.0.0` and `10.2.0`).
#[must_use]
pub fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    let raw = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
    if let Ok(version) = Version::parse(raw) {
        return Some(version);
    }

    let (core, rest) = match raw.find(['-', '+']) {
        Some(pos) => raw.split_at(pos),
        None => (raw, ""),
    };
    let padded = match core.split('.').count() {
        1 => format!("{core}.0.0{rest}"),
        2 => format!("{core}.0{rest}"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

/// Keep the records whose version is at least `floor`, in source order.
///
/// Records with an unparseable version are dropped.
#[must_use]
pub fn filter_compatible(records: Vec<InstanceRecord>, floor: &Version) -> Vec<InstanceRecord> {
    records
        .into_iter()
        .filter(|record| match record.parsed_version() {
            Some(version) => version >= *floor,
            None => {
                warn!(api = %record.api, version = %record.version, "skipping instance with malformed version");
                false
            }
        })
        .collect()
}

impl CobaltClient {
    /// Fetch the instance directory, keeping only compatible instances.
    pub async fn list_instances(&self) -> Result<Vec<InstanceRecord>, CobaltError> {
        let floor = parse_version(&self.config().min_instance_version).ok_or_else(|| {
            CobaltError::InvalidConfig(format!(
                "invalid minimum instance version: {:?}",
                self.config().min_instance_version
            ))
        })?;

        let request = self.request(Method::GET, &self.config().instances_url)?;
        let response = self.fetch_ok(request).await?;
        let records: Vec<InstanceRecord> = serde_json::from_slice(&response.body)
            .map_err(|e| CobaltError::invalid_response(e.to_string()))?;

        let total = records.len();
        let compatible = filter_compatible(records, &floor);
        debug!(total, compatible = compatible.len(), floor = %floor, "fetched instance directory");
        Ok(compatible)
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(value) => value,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(text.trim(), "true" | "1"),
        _ => false,
    })
}

/// Numbers are kept as their text (`10` reads as version `"10"`).
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}
