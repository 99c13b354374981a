//! Titan Takeoff Pro: same protocol as [`TitanTakeoff`], plus per-request consumer group
//! and sampling options.

use async_trait::async_trait;
use takeoff_client::{GenerationRequest, Result, SamplingParams, TakeoffClient, TextStream};
use tracing::instrument;

use crate::config::{ClientConfig, ProOptions};
use crate::{LlmClient, TitanTakeoff};

#[derive(Debug, Clone)]
pub struct TitanTakeoffPro {
    inner: TitanTakeoff,
    options: ProOptions,
}

impl TitanTakeoffPro {
    /// Provisions `config.readers` exactly like [`TitanTakeoff::new`]; no options set.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: TitanTakeoff::new(config).await?,
            options: ProOptions::default(),
        })
    }

    pub async fn with_client(client: TakeoffClient, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: TitanTakeoff::with_client(client, config).await?,
            options: ProOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ProOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_consumer_group(mut self, consumer_group: impl Into<String>) -> Self {
        self.options.consumer_group = Some(consumer_group.into());
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.options.sampling = sampling;
        self
    }

    pub fn options(&self) -> &ProOptions {
        &self.options
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    fn request(&self, prompt: &str) -> GenerationRequest {
        GenerationRequest {
            text: prompt.to_string(),
            consumer_group: self.options.consumer_group.clone(),
            sampling: self.options.sampling.clone(),
        }
    }
}

#[async_trait]
impl LlmClient for TitanTakeoffPro {
    #[instrument(skip(self, prompt))]
    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.inner.complete(&self.request(prompt)).await
    }

    #[instrument(skip(self, prompt))]
    async fn stream(&self, prompt: &str) -> Result<TextStream> {
        self.inner.open_stream(&self.request(prompt)).await
    }
}
