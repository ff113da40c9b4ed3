use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{ProbeError, Result};

use super::env::Env;

pub const DEFAULT_API_KEY_ENVS: &[&str] =
    &["EMBEDDING_API_KEY", "OPENAI_COMPAT_API_KEY", "OPENAI_API_KEY"];

/// Where the bearer credential comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderAuth {
    #[serde(rename = "api_key_env", alias = "env", alias = "api_key")]
    ApiKeyEnv {
        #[serde(default)]
        keys: Vec<String>,
    },
    #[serde(alias = "auth_command")]
    Command { command: Vec<String> },
}

/// Resolves the credential to present to the endpoint.
///
/// Without an explicit `auth` the default variables are consulted and a
/// missing key simply means the request goes out unauthenticated. An
/// explicit `auth` that yields nothing is an error.
pub async fn resolve_credential(auth: Option<&ProviderAuth>, env: &Env) -> Result<Option<String>> {
    match auth {
        None => Ok(env.first_of(DEFAULT_API_KEY_ENVS)),
        Some(ProviderAuth::ApiKeyEnv { keys }) => {
            let keys: Vec<&str> = if keys.is_empty() {
                DEFAULT_API_KEY_ENVS.to_vec()
            } else {
                keys.iter().map(String::as_str).collect()
            };
            env.first_of(&keys).map(Some).ok_or_else(|| {
                ProbeError::Config(format!("missing api key env (tried: {})", keys.join(", ")))
            })
        }
        Some(ProviderAuth::Command { command }) => run_auth_command(command).await.map(Some),
    }
}

async fn run_auth_command(command: &[String]) -> Result<String> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ProbeError::AuthCommand("command is empty".to_string()))?;
    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|err| ProbeError::AuthCommand(format!("spawn {program}: {err}")))?;
    if !output.status.success() {
        return Err(ProbeError::AuthCommand(format!(
            "command failed with status {}",
            output.status
        )));
    }

    #[derive(Deserialize)]
    struct AuthCommandOutput {
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        token: Option<String>,
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed = serde_json::from_str::<AuthCommandOutput>(stdout.trim())?;
    parsed
        .api_key
        .or(parsed.token)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ProbeError::AuthCommand("json missing api_key/token".to_string()))
}

#[derive(Clone)]
pub(crate) struct BearerAuth {
    value: HeaderValue,
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth")
            .field("value", &"<redacted>")
            .finish()
    }
}

impl BearerAuth {
    /// `None` for a blank token.
    pub(crate) fn new(token: &str) -> Result<Option<Self>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
            ProbeError::Config(format!("invalid credential for authorization header: {err}"))
        })?;
        value.set_sensitive(true);
        Ok(Some(Self { value }))
    }

    pub(crate) fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header(AUTHORIZATION, self.value.clone())
    }
}
