//! Client configuration.
//!
//! Loaded from TOML, with the bearer token optionally taken from the
//! `PODGATE_TOKEN` environment variable:
//!
//! ```toml
//! timeout_secs = 10
//! user_agent = "my-app/1.0"
//!
//! [headers]
//! "X-Request-Source" = "batch"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use podgate_core::{Error, Result};

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "PODGATE_TOKEN";

/// Settings for the HTTP transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header.
    pub user_agent: String,
    /// Token sent as `Authorization: Bearer`.
    pub bearer_token: Option<String>,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("podgate/{}", env!("CARGO_PKG_VERSION")),
            bearer_token: None,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if given, else defaults, then apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    /// Take the bearer token from `PODGATE_TOKEN` when set.
    pub fn with_env(self) -> Self {
        self.with_token_from(std::env::var(TOKEN_ENV).ok())
    }

    fn with_token_from(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.bearer_token = Some(token);
        }
        self
    }

    /// Serialize to TOML, with the bearer token masked.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.bearer_token.is_some() {
            shown.bearer_token = Some("***".to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| Error::config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }
}
