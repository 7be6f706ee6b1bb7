use std::{path::Path, time::Duration};

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "employee-service.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid employee API base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("invalid server port {0:?}")]
    Port(String),
}

/// Per-IP rate limiting applied to incoming requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub per_second: u64,
    pub burst_size: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Collection endpoint of the remote employee API.
    pub base_url: String,
    pub server_port: u16,
    pub request_timeout_secs: u64,
    pub rate_limit: RateLimitSettings,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8112/api/v1/employee".to_string(),
            server_port: 8111,
            request_timeout_secs: 10,
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl ServiceConfig {
    /// Loads the config file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        if !Path::new(path).exists() {
            tracing::info!("Config file not found at {path}, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        tracing::info!(?config, "Loaded employee service config from {path}");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies `EMPLOYEE_API_BASE_URL` and `SERVER_PORT` style overrides.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        server_port: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(port) = server_port {
            self.server_port = port.trim().parse().map_err(|_| ConfigError::Port(port))?;
        }
        Ok(self)
    }

    /// Parses and checks the remote base URL.
    pub fn employee_api_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            reason,
        };

        let url = Url::parse(self.base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
