//! # Deterministic Fake Embedding
//!
//! An `EmbeddingService` that needs no model and no network: each text maps to a fixed
//! pseudo-random vector derived from its SHA-256 digest. The same text always gets the same
//! vector, so it can stand in for a real provider in tests and offline runs.
//!
//! ## Example
//!
//! ```rust
//! use embedding::EmbeddingService;
//! use fake_embedding::DeterministicFakeEmbedding;
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     let service = DeterministicFakeEmbedding::new(8);
//!     let a = service.embed("Hello world").await?;
//!     let b = service.embed("Hello world").await?;
//!     assert_eq!(a, b);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use embedding::EmbeddingService;
use sha2::{Digest, Sha256};

/// Hash-seeded embedding with components in `[-1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicFakeEmbedding {
    size: usize,
}

impl DeterministicFakeEmbedding {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Vector length produced for every text.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Digest blocks are `sha256(text || block_index)`; each 4 bytes become one component.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = Vec::with_capacity(self.size);
        let mut block: u32 = 0;
        while vector.len() < self.size {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            hasher.update(block.to_le_bytes());
            let digest = hasher.finalize();
            for word in digest.chunks_exact(4) {
                if vector.len() == self.size {
                    break;
                }
                let bits = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
                // 24 bits are exact in f32, keeping the result strictly below 1.0.
                let unit = (bits >> 8) as f32 / (1u32 << 24) as f32;
                vector.push(unit * 2.0 - 1.0);
            }
            block += 1;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingService for DeterministicFakeEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
