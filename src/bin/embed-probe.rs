use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use embed_probe::{
    Env, ProbeConfig, ProviderAuth, run_probe_reporting, sample_texts, write_failure,
};

/// Send a batch of texts to an OpenAI-compatible embeddings endpoint and
/// print what comes back.
#[derive(Debug, Parser)]
#[command(name = "embed-probe", version)]
struct Cli {
    /// TOML file with base_url, model, timeout_secs, http_headers and auth
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Dotenv file whose entries take precedence over the process environment
    #[arg(long, value_name = "PATH")]
    dotenv: Option<PathBuf>,

    /// Endpoint base URL (default http://localhost:4000/v1)
    #[arg(long)]
    base_url: Option<String>,

    /// Embedding model identifier (default qwen-embedding)
    #[arg(long)]
    model: Option<String>,

    /// Read the credential from this environment variable
    #[arg(long, value_name = "VAR")]
    api_key_env: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit diagnostics on stderr as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Texts to embed; the built-in sample sentences are used when omitted
    texts: Vec<String>,
}

impl Cli {
    fn apply_overrides(&self, mut config: ProbeConfig) -> ProbeConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(key) = &self.api_key_env {
            config.auth = Some(ProviderAuth::ApiKeyEnv {
                keys: vec![key.clone()],
            });
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = Some(secs);
        }
        config
    }
}

fn init_tracing(json_logs: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

async fn resolve_config(cli: &Cli) -> embed_probe::Result<(ProbeConfig, Env)> {
    let env = match &cli.dotenv {
        Some(path) => Env::load_dotenv(path).await?,
        None => Env::default(),
    };
    let file = match &cli.config {
        Some(path) => ProbeConfig::load(path).await?,
        None => ProbeConfig::default(),
    };
    let config = cli.apply_overrides(file.apply_env(&env)?);
    Ok((config, env))
}

impl Cli {
    fn texts(&self) -> Vec<String> {
        if self.texts.is_empty() {
            sample_texts()
        } else {
            self.texts.clone()
        }
    }
}

/// One pass: resolve configuration, request, report. Failures end up as an
/// `Error:` line in `out`; only a failed write is returned.
async fn run<W: Write + ?Sized>(cli: &Cli, out: &mut W) -> std::io::Result<()> {
    let (config, env) = match resolve_config(cli).await {
        Ok(resolved) => resolved,
        Err(err) => return write_failure(out, &err),
    };

    let texts = cli.texts();
    writeln!(out, "Getting embeddings for {} texts...", texts.len())?;
    run_probe_reporting(&config, &env, texts, out).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;

    let mut stdout = std::io::stdout().lock();
    run(&cli, &mut stdout).await?;
    Ok(())
}
