//! # Titan Takeoff Embedding Service
//!
//! This crate provides an implementation of the `EmbeddingService` trait backed by a Takeoff
//! inference server's `/embed` endpoint.
//!
//! ## TitanTakeoffEmbed
//!
//! Provisions its embedding readers on construction (same management protocol as the
//! generation client) and remembers their consumer groups. A request that does not name a
//! consumer group is routed as follows:
//!
//! - exactly one group was provisioned: that group;
//! - none was provisioned: `primary` (models started outside this client);
//! - several were provisioned: error, the caller must choose.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedding::EmbeddingService;
//! use takeoff_client::{Device, ReaderConfig};
//! use takeoff_embedding::TitanTakeoffEmbed;
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     let reader = ReaderConfig::new("BAAI/bge-small-en")
//!         .with_device(Device::Gpu)
//!         .with_consumer_group("embed");
//!     let service = TitanTakeoffEmbed::connect("http://localhost", 3000, 3001, vec![reader]).await?;
//!     let embedding = service.embed("Hello world").await?;
//!     println!("Embedding dimension: {}", embedding.len());
//!     Ok(())
//! }
//! ```

use std::collections::BTreeSet;

use async_trait::async_trait;
use embedding::EmbeddingService;
use takeoff_client::{
    ReaderConfig, Result as TakeoffResult, TakeoffClient, TakeoffError, DEFAULT_CONSUMER_GROUP,
};
use tracing::{info, warn};

/// Takeoff embedding service implementation.
#[derive(Debug, Clone)]
pub struct TitanTakeoffEmbed {
    client: TakeoffClient,
    embed_consumer_groups: BTreeSet<String>,
    consumer_group: Option<String>,
}

impl TitanTakeoffEmbed {
    /// Builds the wire client and provisions `models` in order.
    pub async fn connect(
        base_url: &str,
        port: u16,
        mgmt_port: u16,
        models: Vec<ReaderConfig>,
    ) -> TakeoffResult<Self> {
        let client = TakeoffClient::new(base_url, port, mgmt_port)?;
        Self::new(client, models).await
    }

    /// Provisions `models` in order on `client`. The first rejected reader aborts.
    pub async fn new(client: TakeoffClient, models: Vec<ReaderConfig>) -> TakeoffResult<Self> {
        let mut embed_consumer_groups = BTreeSet::new();
        for model in &models {
            client.create_reader(model).await?;
            if embed_consumer_groups.insert(model.consumer_group.clone()) {
                info!(consumer_group = %model.consumer_group, "step: Takeoff embed group registered");
            }
        }
        Ok(Self {
            client,
            embed_consumer_groups,
            consumer_group: None,
        })
    }

    /// Consumer group used by the [`EmbeddingService`] methods.
    pub fn with_consumer_group(mut self, consumer_group: impl Into<String>) -> Self {
        self.consumer_group = Some(consumer_group.into());
        self
    }

    /// Consumer groups of the readers provisioned by this client.
    pub fn consumer_groups(&self) -> impl Iterator<Item = &str> {
        self.embed_consumer_groups.iter().map(String::as_str)
    }

    /// Picks the group for a request; see the crate docs for the rules.
    pub fn resolve_consumer_group(&self, requested: Option<&str>) -> TakeoffResult<String> {
        if let Some(group) = requested.filter(|g| !g.is_empty()) {
            return Ok(group.to_string());
        }
        let mut groups = self.embed_consumer_groups.iter();
        match (groups.next(), groups.next()) {
            (None, _) => Ok(DEFAULT_CONSUMER_GROUP.to_string()),
            (Some(only), None) => Ok(only.clone()),
            (Some(_), Some(_)) => {
                warn!(groups = self.embed_consumer_groups.len(), "step: Takeoff embed group is ambiguous");
                Err(TakeoffError::MissingConsumerGroup(format!(
                    "initialized with multiple embedding reader groups ({}), specify which one to use",
                    self.consumer_groups().collect::<Vec<_>>().join(", ")
                )))
            }
        }
    }

    /// Embeds one text through `consumer_group`, or the resolved default.
    pub async fn embed_query(&self, text: &str, consumer_group: Option<&str>) -> TakeoffResult<Vec<f32>> {
        let group = self.resolve_consumer_group(consumer_group)?;
        let embedding = self.client.embed(text, &group).await?;
        info!(dimension = embedding.len(), consumer_group = %group, "step: Takeoff embed done");
        Ok(embedding)
    }

    /// Embeds several texts in one request, preserving order.
    pub async fn embed_documents(
        &self,
        texts: &[String],
        consumer_group: Option<&str>,
    ) -> TakeoffResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let group = self.resolve_consumer_group(consumer_group)?;
        let embeddings = self.client.embed_batch(texts, &group).await?;
        info!(count = embeddings.len(), consumer_group = %group, "step: Takeoff embed_batch done");
        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingService for TitanTakeoffEmbed {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(self.embed_query(text, self.consumer_group.as_deref()).await?)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(self
            .embed_documents(texts, self.consumer_group.as_deref())
            .await?)
    }
}

#[cfg(test)]
mod takeoff_embedding_test;
