//! Environment configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file in the working directory. Loaders take a lookup function so
//! tests can supply variables without touching the real environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::llms::providers::azure::DEFAULT_API_VERSION;

/// Default deployment name on the Azure resource.
pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o";
/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;
/// Default SQLite database file.
pub const DEFAULT_DATABASE: &str = "translations.db";
/// Default translation server base URL for the client.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Load a `.env` file if one exists. Missing files are not an error.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env"),
    }
}

/// Connection settings for the Azure OpenAI model.
#[derive(Clone)]
pub struct AzureConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"****")
            .field("api_version", &self.api_version)
            .field("deployment", &self.deployment)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AzureConfig {
    /// Read `AZURE_OPENAI_*` variables and `TRANSDESK_LLM_TIMEOUT_SECS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = required(&lookup, "AZURE_OPENAI_ENDPOINT")?;
        let api_key = required(&lookup, "AZURE_OPENAI_API_KEY")?;
        let api_version = non_empty(&lookup, "AZURE_OPENAI_API_VERSION")
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let deployment = non_empty(&lookup, "AZURE_OPENAI_DEPLOYMENT")
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string());

        let timeout = match non_empty(&lookup, "TRANSDESK_LLM_TIMEOUT_SECS") {
            None => None,
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "TRANSDESK_LLM_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: "expected a whole number of seconds".to_string(),
                })?;
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self {
            endpoint,
            api_key,
            api_version,
            deployment,
            timeout,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Settings for the translation server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file backing the project routes; `None` disables them.
    pub database: Option<PathBuf>,
    pub azure: AzureConfig,
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `TRANSDESK_DATABASE` and the Azure settings.
    ///
    /// `TRANSDESK_DATABASE=off` runs the server without a store.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = non_empty(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match non_empty(&lookup, "PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: "expected a port number".to_string(),
            })?,
        };
        let database = match non_empty(&lookup, "TRANSDESK_DATABASE") {
            Some(v) if v.eq_ignore_ascii_case("off") => None,
            Some(v) => Some(PathBuf::from(v)),
            None => Some(PathBuf::from(DEFAULT_DATABASE)),
        };

        Ok(Self {
            host,
            port,
            database,
            azure: AzureConfig::from_lookup(&lookup)?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            var: "HOST",
            value: self.host.clone(),
            reason: "expected an IP address".to_string(),
        })
    }
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, var).ok_or(ConfigError::Missing { var })
}
