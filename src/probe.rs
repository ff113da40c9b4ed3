use std::io::Write;

use crate::client::EmbeddingsClient;
use crate::config::{Env, ProbeConfig};
use crate::embedding::EmbeddingModel;
use crate::report::{write_failure, write_report};
use crate::types::EmbeddingResponse;
use crate::Result;

/// Inputs used when none are given on the command line.
pub const SAMPLE_TEXTS: [&str; 4] = [
    "Hello, how are you?",
    "The weather is nice today.",
    "Machine learning is fascinating.",
    "Rust is a great programming language.",
];

pub fn sample_texts() -> Vec<String> {
    SAMPLE_TEXTS.iter().map(|text| text.to_string()).collect()
}

/// Embeds `texts` with one request and writes the summary to `out`.
pub async fn run_probe<W: Write + ?Sized>(
    config: &ProbeConfig,
    env: &Env,
    texts: Vec<String>,
    out: &mut W,
) -> Result<EmbeddingResponse> {
    let client = EmbeddingsClient::from_config(config, env).await?;
    tracing::info!(
        base_url = client.base_url(),
        model = client.model_id(),
        inputs = texts.len(),
        "probing embeddings endpoint"
    );
    let response = client.create_embeddings(texts.clone()).await?;
    write_report(out, &texts, &response)?;
    Ok(response)
}

/// Like [`run_probe`], but a failure is written to `out` as an `Error:` line
/// instead of being returned. Only a failure to write the report itself
/// escapes.
pub async fn run_probe_reporting<W: Write + ?Sized>(
    config: &ProbeConfig,
    env: &Env,
    texts: Vec<String>,
    out: &mut W,
) -> std::io::Result<Option<EmbeddingResponse>> {
    match run_probe(config, env, texts, out).await {
        Ok(response) => Ok(Some(response)),
        Err(err) => {
            tracing::debug!(error = ?err, "embedding probe failed");
            write_failure(out, &err)?;
            Ok(None)
        }
    }
}
