//! Basic Titan Takeoff client.

use async_trait::async_trait;
use futures::TryStreamExt;
use takeoff_client::{GenerationRequest, Result, TakeoffClient, TextStream};
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::LlmClient;

/// Titan Takeoff text generation.
///
/// Built with [`TitanTakeoff::new`], which provisions every configured reader before
/// returning. `streaming` decides whether [`LlmClient::invoke`] uses `/generate` or
/// `/generate_stream`.
#[derive(Debug, Clone)]
pub struct TitanTakeoff {
    client: TakeoffClient,
    config: ClientConfig,
}

impl TitanTakeoff {
    /// Connects and provisions `config.readers` in order. The first rejected reader aborts
    /// construction with [`takeoff_client::TakeoffError::Provisioning`].
    #[instrument(skip(config), fields(readers = config.readers.len()))]
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let client = TakeoffClient::new(&config.base_url, config.port, config.mgmt_port)?;
        Self::with_client(client, config).await
    }

    /// Same as [`TitanTakeoff::new`] with a prebuilt wire client.
    pub async fn with_client(client: TakeoffClient, config: ClientConfig) -> Result<Self> {
        if config.readers.is_empty() {
            debug!("no readers configured, using pre-provisioned models");
        } else {
            client.provision_readers(&config.readers).await?;
            info!(count = config.readers.len(), "Takeoff readers provisioned");
        }
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &TakeoffClient {
        &self.client
    }

    pub(crate) async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        if !self.config.streaming {
            return self.client.generate(request).await;
        }
        let stream = self.client.generate_stream(request).await?;
        let text: String = stream.try_collect::<Vec<String>>().await?.concat();
        Ok(text)
    }

    pub(crate) async fn open_stream(&self, request: &GenerationRequest) -> Result<TextStream> {
        self.client.generate_stream(request).await
    }
}

#[async_trait]
impl LlmClient for TitanTakeoff {
    #[instrument(skip(self, prompt), fields(streaming = self.config.streaming))]
    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.complete(&GenerationRequest::new(prompt)).await
    }

    #[instrument(skip(self, prompt))]
    async fn stream(&self, prompt: &str) -> Result<TextStream> {
        self.open_stream(&GenerationRequest::new(prompt)).await
    }
}
