pub mod client;
pub mod config;
mod error;
pub mod embedding;
pub mod probe;
pub mod report;
pub mod types;
mod utils;

pub use client::EmbeddingsClient;
pub use config::{
    DEFAULT_API_KEY_ENVS, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, Env, ProbeConfig,
    ProviderAuth, parse_dotenv, resolve_credential,
};
pub use embedding::EmbeddingModel;
pub use error::{ProbeError, Result};
pub use probe::{SAMPLE_TEXTS, run_probe, run_probe_reporting, sample_texts};
pub use report::{write_failure, write_report};
pub use types::{EmbeddingData, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage};
