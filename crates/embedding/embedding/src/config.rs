//! Embedding configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

use crate::registry::EmbeddingProvider;

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    fn provider(&self) -> EmbeddingProvider;
    /// Consumer group for Takeoff embeddings. None lets the service pick one from its readers.
    fn consumer_group(&self) -> Option<&str>;
    /// Vector size of the deterministic fake provider.
    fn fake_dimension(&self) -> usize;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvEmbeddingConfig {
    pub embedding_provider: EmbeddingProvider,
    pub consumer_group: Option<String>,
    pub fake_dimension: usize,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn provider(&self) -> EmbeddingProvider {
        self.embedding_provider
    }
    fn consumer_group(&self) -> Option<&str> {
        self.consumer_group.as_deref().filter(|s| !s.is_empty())
    }
    fn fake_dimension(&self) -> usize {
        self.fake_dimension
    }
}

impl EnvEmbeddingConfig {
    pub const DEFAULT_FAKE_DIMENSION: usize = 768;

    /// Load from EMBEDDING_PROVIDER (default `takeoff`), TAKEOFF_CONSUMER_GROUP and
    /// FAKE_EMBEDDING_SIZE (default 768).
    pub fn from_env() -> Result<Self> {
        let embedding_provider = match env::var("EMBEDDING_PROVIDER") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => EmbeddingProvider::TitanTakeoff,
        };
        let consumer_group = env::var("TAKEOFF_CONSUMER_GROUP")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let fake_dimension = match env::var("FAKE_EMBEDDING_SIZE") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .with_context(|| format!("FAKE_EMBEDDING_SIZE has an invalid value: {}", raw))?,
            _ => Self::DEFAULT_FAKE_DIMENSION,
        };
        Ok(Self {
            embedding_provider,
            consumer_group,
            fake_dimension,
        })
    }

    /// Validate config (e.g. the fake provider needs a non-zero size).
    pub fn validate(&self) -> Result<()> {
        if self.embedding_provider == EmbeddingProvider::DeterministicFake && self.fake_dimension == 0
        {
            anyhow::bail!("EMBEDDING_PROVIDER=fake requires FAKE_EMBEDDING_SIZE > 0");
        }
        Ok(())
    }
}
