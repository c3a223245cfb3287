use crate::error::{Error, Result};
use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_URL_ENV: &str = "PERSONA_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// How a dispatch request is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Empty body, no parameters.
    Bare,
    /// JSON `{goal, seed}` body; a goal is required.
    #[default]
    Parameterized,
}

/// How a dispatch response body is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchResponse {
    #[default]
    Text,
    Json,
}

/// Optional operations and shapes a given service revision supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub update_agent: bool,
    pub agent_status: bool,
    pub agent_log: bool,
    pub dispatch: DispatchMode,
    pub dispatch_response: DispatchResponse,
}

impl Capabilities {
    /// The first service revision: status endpoint, bare dispatch answered with JSON.
    pub fn initial() -> Self {
        Self {
            update_agent: false,
            agent_status: true,
            agent_log: false,
            dispatch: DispatchMode::Bare,
            dispatch_response: DispatchResponse::Json,
        }
    }

    pub fn current() -> Self {
        Self {
            update_agent: false,
            agent_status: false,
            agent_log: false,
            dispatch: DispatchMode::Parameterized,
            dispatch_response: DispatchResponse::Text,
        }
    }

    pub fn all() -> Self {
        Self {
            update_agent: true,
            agent_status: true,
            agent_log: true,
            ..Self::current()
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::current()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub capabilities: Capabilities,
    pub store: StoreConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            capabilities: Capabilities::default(),
            store: StoreConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL taken from `PERSONA_API_URL` when set.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
