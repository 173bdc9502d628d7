use std::fmt;
use std::path::Path;
use std::time::Duration;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Public instance used when nothing else is configured.
/// See <https://instances.cobalt.best> for alternatives.
pub const DEFAULT_API_URL: &str = "https://cobalt-api.kwiatekmiki.com";

/// Community directory of cobalt instances.
pub const DEFAULT_INSTANCES_URL: &str = "https://instances.cobalt.best/api/instances.json";

pub const DEFAULT_PLAYLIST_API_URL: &str = "https://playlist.kwiatekmiki.pl/api/getvideos";

/// Oldest backend release speaking the current API.
pub const DEFAULT_MIN_INSTANCE_VERSION: &str = "10.0.0";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Identity sent as `User-Agent` on every request
#[must_use]
pub fn default_user_agent() -> String {
    format!(
        "cobalt-client/{} (+{}; rust; {}/{})",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY"),
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: String,
    /// Sent as `Authorization: Api-Key <key>`; may be empty.
    pub api_key: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub instances_url: String,
    pub min_instance_version: String,
    pub playlist_api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            user_agent: default_user_agent(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            instances_url: DEFAULT_INSTANCES_URL.to_string(),
            min_instance_version: DEFAULT_MIN_INSTANCE_VERSION.to_string(),
            playlist_api_url: DEFAULT_PLAYLIST_API_URL.to_string(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &api_key)
            .field("user_agent", &self.user_agent)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("instances_url", &self.instances_url)
            .field("min_instance_version", &self.min_instance_version)
            .field("playlist_api_url", &self.playlist_api_url)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // COBALT_API_KEY, COBALT_API_URL, COBALT_TIMEOUT_SECONDS, ...
        builder = builder.add_source(
            Environment::with_prefix("COBALT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
