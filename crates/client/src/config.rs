//! Client configuration via `tenantdb.toml`
//!
//! One small file describes how to reach the server. Build a router from it
//! with [`ServerClient::from_config`](crate::ServerClient::from_config).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::{Error, Result};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "tenantdb.toml";

/// Base address used by [`ClientConfig::default`]
pub const DEFAULT_URL: &str = "http://localhost:8080";

fn default_timeout_ms() -> u64 {
    30_000
}

/// Client configuration loaded from `tenantdb.toml`.
///
/// # Example
///
/// ```toml
/// url = "http://localhost:8080"
/// timeout_ms = 30000
/// # user_agent = "billing-service/1.4"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server base address.
    pub url: String,
    /// Per-request timeout in milliseconds (default: 30000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Sent as `User-Agent` on every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout_ms: default_timeout_ms(),
            user_agent: None,
        }
    }
}

/// Parse and check a server base address.
///
/// Only absolute `http` and `https` URLs are accepted.
pub fn parse_base_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        "http" | "https" => Err(Error::Config {
            reason: format!("url '{}' has no host", url),
        }),
        other => Err(Error::Config {
            reason: format!("unsupported url scheme '{}' in '{}'", other, url),
        }),
    }
}

impl ClientConfig {
    /// Config for `url` with default settings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check the config and return the parsed base address.
    ///
    /// # Errors
    ///
    /// `Error::Config` if `url` is not an absolute http(s) URL or the timeout
    /// is zero.
    pub fn validate(&self) -> Result<Url> {
        if self.timeout_ms == 0 {
            return Err(Error::Config {
                reason: "timeout_ms must be greater than zero".into(),
            });
        }
        parse_base_url(&self.url)
    }

    /// Parse config from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content).map_err(|e| Error::Config {
            reason: format!("Failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config { reason } => Error::Config {
                reason: format!("{} ({})", reason, path.display()),
            },
            other => other,
        })
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# tenantdb client configuration
#
# Server base address. Logical databases are reached below it at
# /databases/{name}; the system database lives at the root.
url = "http://localhost:8080"

# Per-request timeout in milliseconds (default: 30000).
# A request that takes longer fails with a timeout transport failure.
# The client never retries on its own.
timeout_ms = 30000

# Optional User-Agent header sent with every request.
# user_agent = "my-service/1.0"
"#
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| Error::Config {
                reason: format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            reason: format!("Failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| Error::Config {
            reason: format!("Failed to write config file '{}': {}", path.display(), e),
        })
    }
}
