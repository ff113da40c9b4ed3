mod auth;
mod env;
mod http;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ProbeError, Result};

pub use auth::{DEFAULT_API_KEY_ENVS, ProviderAuth, resolve_credential};
pub(crate) use auth::BearerAuth;
pub use env::{Env, parse_dotenv};
pub(crate) use http::build_http_client;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/v1";
pub const DEFAULT_MODEL: &str = "qwen-embedding";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const BASE_URL_ENV: &str = "EMBEDDING_BASE_URL";
pub const MODEL_ENV: &str = "EMBEDDING_MODEL";
pub const TIMEOUT_ENV: &str = "EMBEDDING_TIMEOUT_SECS";

/// Endpoint settings. Unset fields fall back to the local gateway defaults.
///
/// Layers are merged by the caller in order file, then [`ProbeConfig::apply_env`],
/// then command-line overrides, each replacing what came before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProbeConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub http_headers: BTreeMap<String, String>,
    #[serde(default)]
    pub auth: Option<ProviderAuth>,
}

impl ProbeConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str::<Self>(contents)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|err| {
            ProbeError::Config(format!("read config {} failed: {err}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn apply_env(mut self, env: &Env) -> Result<Self> {
        if let Some(base_url) = env.get(BASE_URL_ENV) {
            self.base_url = Some(base_url);
        }
        if let Some(model) = env.get(MODEL_ENV) {
            self.model = Some(model);
        }
        if let Some(raw) = env.get(TIMEOUT_ENV) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ProbeError::Config(format!(
                    "{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
            self.timeout_secs = Some(secs);
        }
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        non_blank(self.base_url.as_deref()).unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn model(&self) -> &str {
        non_blank(self.model.as_deref()).unwrap_or(DEFAULT_MODEL)
    }

    /// Request timeout; zero is rejected rather than meaning "no timeout".
    pub fn timeout(&self) -> Result<Duration> {
        match self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => Err(ProbeError::Config(
                "timeout_secs must be at least 1 second".to_string(),
            )),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
