//! Registry of exported embedding providers.

use std::fmt;
use std::str::FromStr;

/// Embedding providers exported by this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingProvider {
    /// `takeoff-embedding`: vectors from a Takeoff server's `/embed` endpoint.
    TitanTakeoff,
    /// `fake-embedding`: hash-seeded vectors, no I/O.
    DeterministicFake,
}

/// Public names of every exported provider, in declaration order.
pub const EXPORTED_EMBEDDINGS: &[&str] = &["TitanTakeoffEmbed", "DeterministicFakeEmbedding"];

impl EmbeddingProvider {
    pub const ALL: [EmbeddingProvider; 2] =
        [EmbeddingProvider::TitanTakeoff, EmbeddingProvider::DeterministicFake];

    /// Public type name of the provider.
    pub fn name(&self) -> &'static str {
        match self {
            EmbeddingProvider::TitanTakeoff => "TitanTakeoffEmbed",
            EmbeddingProvider::DeterministicFake => "DeterministicFakeEmbedding",
        }
    }

    /// Short alias accepted in EMBEDDING_PROVIDER.
    pub fn alias(&self) -> &'static str {
        match self {
            EmbeddingProvider::TitanTakeoff => "takeoff",
            EmbeddingProvider::DeterministicFake => "fake",
        }
    }
}

impl fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EmbeddingProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted) || p.alias().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown embedding provider {:?}; expected one of {}",
                    wanted,
                    EXPORTED_EMBEDDINGS.join(", ")
                )
            })
    }
}
