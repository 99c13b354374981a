//! # Text Embeddings
//!
//! This crate defines the embedding service interface for generating text embeddings,
//! the registry of exported embedding providers, and their env-based configuration.

use async_trait::async_trait;

mod config;
mod registry;

pub use config::{EmbeddingConfig, EnvEmbeddingConfig};
pub use registry::{EmbeddingProvider, EXPORTED_EMBEDDINGS};

/// Service for generating text embeddings.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generates an embedding vector for a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error>;

    /// Generates embedding vectors for multiple texts, in input order.
    /// An empty slice returns an empty result without any I/O.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error>;
}

#[cfg(test)]
mod config_test;
