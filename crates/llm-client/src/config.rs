//! Takeoff client configuration: defaults, builder and env loading.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use takeoff_client::{
    ReaderConfig, SamplingParams, DEFAULT_BASE_URL, DEFAULT_MGMT_PORT, DEFAULT_PORT,
};

/// Configuration shared by [`crate::TitanTakeoff`] and [`crate::TitanTakeoffPro`].
///
/// `readers` are provisioned in order when the client is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub port: u16,
    pub mgmt_port: u16,
    pub streaming: bool,
    pub readers: Vec<ReaderConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            mgmt_port: DEFAULT_MGMT_PORT,
            streaming: false,
            readers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_mgmt_port(mut self, mgmt_port: u16) -> Self {
        self.mgmt_port = mgmt_port;
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_models(mut self, readers: Vec<ReaderConfig>) -> Self {
        self.readers = readers;
        self
    }

    /// Load from environment variables:
    /// TAKEOFF_BASE_URL, TAKEOFF_PORT, TAKEOFF_MGMT_PORT, TAKEOFF_STREAMING and
    /// TAKEOFF_MODELS (JSON array of reader configs).
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let base_url = env::var("TAKEOFF_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.base_url);
        let port = parse_env("TAKEOFF_PORT")?.unwrap_or(defaults.port);
        let mgmt_port = parse_env("TAKEOFF_MGMT_PORT")?.unwrap_or(defaults.mgmt_port);
        let streaming = parse_env("TAKEOFF_STREAMING")?.unwrap_or(defaults.streaming);
        let readers = match env::var("TAKEOFF_MODELS") {
            Ok(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .context("TAKEOFF_MODELS must be a JSON array of reader configs")?,
            _ => Vec::new(),
        };
        Ok(Self {
            base_url,
            port,
            mgmt_port,
            streaming,
            readers,
        })
    }

    /// Validate config (URL scheme, reader fields).
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!(
                "TAKEOFF_BASE_URL must start with http:// or https://, got {}",
                self.base_url
            );
        }
        for reader in &self.readers {
            reader.validate()?;
        }
        Ok(())
    }
}

/// Extra request options of the pro variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProOptions {
    pub consumer_group: Option<String>,
    pub sampling: SamplingParams,
}

impl ProOptions {
    /// Load from TAKEOFF_CONSUMER_GROUP, TAKEOFF_GENERATE_MAX_LENGTH, TAKEOFF_SAMPLING_TOPK,
    /// TAKEOFF_SAMPLING_TOPP, TAKEOFF_SAMPLING_TEMPERATURE, TAKEOFF_REPETITION_PENALTY and
    /// TAKEOFF_NO_REPEAT_NGRAM_SIZE. Unset variables stay unset.
    pub fn from_env() -> Result<Self> {
        let consumer_group = env::var("TAKEOFF_CONSUMER_GROUP")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let sampling = SamplingParams {
            generate_max_length: parse_env("TAKEOFF_GENERATE_MAX_LENGTH")?,
            sampling_topk: parse_env("TAKEOFF_SAMPLING_TOPK")?,
            sampling_topp: parse_env("TAKEOFF_SAMPLING_TOPP")?,
            sampling_temperature: parse_env("TAKEOFF_SAMPLING_TEMPERATURE")?,
            repetition_penalty: parse_env("TAKEOFF_REPETITION_PENALTY")?,
            no_repeat_ngram_size: parse_env("TAKEOFF_NO_REPEAT_NGRAM_SIZE")?,
        };
        Ok(Self {
            consumer_group,
            sampling,
        })
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        _ => Ok(None),
    }
}
