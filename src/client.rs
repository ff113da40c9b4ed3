use async_trait::async_trait;

use crate::config::{BearerAuth, Env, ProbeConfig, build_http_client, resolve_credential};
use crate::embedding::EmbeddingModel;
use crate::types::{EmbeddingRequest, EmbeddingResponse};
use crate::{ProbeError, Result};

/// Client for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Clone, Debug)]
pub struct EmbeddingsClient {
    http: reqwest::Client,
    base_url: String,
    auth: Option<BearerAuth>,
    model: String,
}

impl EmbeddingsClient {
    /// Client against the default local endpoint. A blank `api_key` sends no
    /// `Authorization` header.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self> {
        let config = ProbeConfig::default();
        Ok(Self {
            http: build_http_client(config.timeout()?, &config.http_headers)?,
            base_url: config.base_url().to_string(),
            auth: BearerAuth::new(api_key.as_ref())?,
            model: config.model().to_string(),
        })
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub async fn from_config(config: &ProbeConfig, env: &Env) -> Result<Self> {
        let credential = resolve_credential(config.auth.as_ref(), env).await?;
        let auth = match credential {
            Some(token) => BearerAuth::new(&token)?,
            None => None,
        };
        let http = build_http_client(config.timeout()?, &config.http_headers)?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            auth,
            model: config.model().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth.as_ref() {
            Some(auth) => auth.apply(req),
            None => req,
        }
    }

    fn embeddings_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/embeddings") {
            base.to_string()
        } else {
            format!("{base}/embeddings")
        }
    }

    fn resolve_model(&self) -> Result<&str> {
        if !self.model.trim().is_empty() {
            return Ok(self.model.as_str());
        }
        Err(ProbeError::InvalidRequest(
            "embedding model is not set (set EmbeddingsClient::with_model)".to_string(),
        ))
    }
}

fn validate_input(texts: &[String]) -> Result<()> {
    if texts.is_empty() {
        return Err(ProbeError::InvalidRequest(
            "at least one input text is required".to_string(),
        ));
    }
    if let Some(position) = texts.iter().position(|text| text.is_empty()) {
        return Err(ProbeError::InvalidRequest(format!(
            "input text {} is empty",
            position + 1
        )));
    }
    Ok(())
}

#[async_trait]
impl EmbeddingModel for EmbeddingsClient {
    fn provider(&self) -> &str {
        "openai-compatible"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    #[tracing::instrument(skip_all, fields(model = %self.model, inputs = texts.len()))]
    async fn create_embeddings(&self, texts: Vec<String>) -> Result<EmbeddingResponse> {
        validate_input(&texts)?;
        let model = self.resolve_model()?;
        let url = self.embeddings_url();
        let expected = texts.len();
        tracing::debug!(%url, authenticated = self.auth.is_some(), "requesting embeddings");

        let request = EmbeddingRequest::new(model, texts);
        let mut parsed = crate::utils::http::send_checked_json::<EmbeddingResponse>(
            self.apply_auth(self.http.post(url)).json(&request),
        )
        .await?;
        parsed.sort_by_index();

        if parsed.data.len() != expected {
            tracing::warn!(
                expected,
                received = parsed.data.len(),
                "embedding count does not match input count"
            );
        }
        if !parsed.has_uniform_dimension() {
            tracing::warn!("embedding vectors have differing lengths");
        }
        Ok(parsed)
    }
}
