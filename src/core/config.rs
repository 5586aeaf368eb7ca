//! Application configuration
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables. The oracle credential is normally supplied only
//! through `LLM_API_KEY`; when it is absent the natural language features are
//! disabled while manual parameter editing keeps working.

use crate::core::error::{Result, VrmError};
use crate::pipeline::stage::PipelineMode;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_API_KEY: &str = "LLM_API_KEY";
pub const ENV_API_URL: &str = "LLM_API_URL";
pub const ENV_MODEL: &str = "LLM_MODEL";

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub oracle: OracleConfig,
    pub pipeline: PipelineConfig,
    pub server: ServerConfig,
    pub schema: SchemaConfig,
}

/// Connection settings for the external language model
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Credential; `None` disables natural language commands
    pub api_key: Option<String>,
    /// Endpoint. The wire format is detected from the host name.
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.into(),
            model: DEFAULT_MODEL.into(),
            max_tokens: 2048,
            temperature: 0.2,
        }
    }
}

impl fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Pipeline behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: PipelineMode,
    /// Upper bound for a single oracle round-trip
    pub stage_timeout_secs: u64,
    /// Upper bound for a whole command, across all stages
    pub deadline_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: PipelineMode::MultiStage,
            stage_timeout_secs: 30,
            deadline_secs: 75,
        }
    }
}

impl PipelineConfig {
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".into(),
        }
    }
}

/// Where to find an alternative parameter table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from an optional file, then apply environment
    /// overrides and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate().map_err(VrmError::Config)?;
        Ok(config)
    }

    /// Override settings from environment-style lookups
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.oracle.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.oracle.api_url = url;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.oracle.model = model;
        }
    }

    /// Whether a credential for the oracle is configured
    pub fn has_credential(&self) -> bool {
        self.oracle
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.pipeline.stage_timeout_secs == 0 || self.pipeline.deadline_secs == 0 {
            return Err("Timeouts must be positive".into());
        }

        if self.pipeline.stage_timeout_secs > self.pipeline.deadline_secs {
            return Err(format!(
                "stage_timeout_secs ({}) should be <= deadline_secs ({})",
                self.pipeline.stage_timeout_secs, self.pipeline.deadline_secs
            ));
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(format!("server.bind is not a socket address: {}", self.server.bind));
        }

        if self.oracle.api_url.trim().is_empty() || self.oracle.model.trim().is_empty() {
            return Err("oracle.api_url and oracle.model must be set".into());
        }

        Ok(())
    }
}
