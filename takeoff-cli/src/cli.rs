//! CLI parser and config loading.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use embedding::{EmbeddingProvider, EnvEmbeddingConfig};
use llm_client::{ClientConfig, ProOptions};
use takeoff_client::ReaderConfig;

#[derive(Parser, Debug)]
#[command(name = "takeoff")]
#[command(about = "Titan Takeoff CLI: generate, stream, embed", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Log file (default: TAKEOFF_LOG_FILE or logs/takeoff.log).
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Server connection overrides; unset flags fall back to TAKEOFF_* env vars.
#[derive(Args, Debug, Default, Clone)]
pub struct ServerArgs {
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Inference port.
    #[arg(long, global = true)]
    pub port: Option<u16>,
    /// Management port.
    #[arg(long, global = true)]
    pub mgmt_port: Option<u16>,
    /// Readers to provision first, as a JSON array (overrides TAKEOFF_MODELS).
    #[arg(long, global = true)]
    pub models: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate text for a prompt.
    Generate {
        prompt: String,
        /// Use the pro client (consumer group and sampling options).
        #[arg(long)]
        pro: bool,
        #[arg(long)]
        consumer_group: Option<String>,
        #[arg(long)]
        max_length: Option<u32>,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        top_k: Option<u32>,
        #[arg(long)]
        top_p: Option<f32>,
    },
    /// Stream generated text to stdout as it arrives.
    Stream { prompt: String },
    /// Print the embedding of each text as a JSON array.
    Embed {
        #[arg(required = true)]
        texts: Vec<String>,
        /// Provider name or alias (overrides EMBEDDING_PROVIDER).
        #[arg(long)]
        provider: Option<EmbeddingProvider>,
        #[arg(long)]
        consumer_group: Option<String>,
    },
}

/// Env config with CLI overrides applied, validated.
pub fn load_client_config(args: &ServerArgs) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(mgmt_port) = args.mgmt_port {
        config.mgmt_port = mgmt_port;
    }
    if let Some(models) = &args.models {
        config.readers = parse_models(models)?;
    }
    config.validate()?;
    Ok(config)
}

pub fn parse_models(raw: &str) -> Result<Vec<ReaderConfig>> {
    serde_json::from_str(raw).context("--models must be a JSON array of reader configs")
}

/// Pro options from env, overridden by the `generate` flags that are set.
pub fn load_pro_options(
    consumer_group: Option<String>,
    max_length: Option<u32>,
    temperature: Option<f32>,
    top_k: Option<u32>,
    top_p: Option<f32>,
) -> Result<ProOptions> {
    let mut options = ProOptions::from_env()?;
    if consumer_group.is_some() {
        options.consumer_group = consumer_group;
    }
    if max_length.is_some() {
        options.sampling.generate_max_length = max_length;
    }
    if temperature.is_some() {
        options.sampling.sampling_temperature = temperature;
    }
    if top_k.is_some() {
        options.sampling.sampling_topk = top_k;
    }
    if top_p.is_some() {
        options.sampling.sampling_topp = top_p;
    }
    Ok(options)
}

/// Embedding config from env, overridden by `embed` flags.
pub fn load_embedding_config(
    provider: Option<EmbeddingProvider>,
    consumer_group: Option<String>,
) -> Result<EnvEmbeddingConfig> {
    let mut config = EnvEmbeddingConfig::from_env()?;
    if let Some(provider) = provider {
        config.embedding_provider = provider;
    }
    if consumer_group.is_some() {
        config.consumer_group = consumer_group;
    }
    config.validate()?;
    Ok(config)
}

pub fn log_file(cli: &Cli) -> String {
    cli.log_file
        .clone()
        .or_else(|| std::env::var("TAKEOFF_LOG_FILE").ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "logs/takeoff.log".to_string())
}
