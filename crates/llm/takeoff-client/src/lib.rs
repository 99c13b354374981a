//! # Takeoff client
//!
//! HTTP client for the Takeoff inference server. Readers (named model instances) are
//! provisioned on the management port; generation, streaming and embeddings go to the
//! inference port.
//!
//! ```rust,no_run
//! use takeoff_client::{GenerationRequest, ReaderConfig, TakeoffClient};
//!
//! async fn example() -> takeoff_client::Result<()> {
//!     let client = TakeoffClient::new("http://localhost", 3000, 3001)?;
//!     client.create_reader(&ReaderConfig::new("llama-2-7b")).await?;
//!     let text = client.generate(&GenerationRequest::new("What is 2 + 2?")).await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod stream;
mod types;

pub use client::{TakeoffClient, DEFAULT_BASE_URL, DEFAULT_MGMT_PORT, DEFAULT_PORT};
pub use error::{Result, TakeoffError};
pub use stream::{FragmentDecoder, TextStream};
pub use types::{
    Device, EmbeddingInput, EmbeddingRequest, EmbeddingResponse, EmbeddingResult,
    GenerationRequest, GenerationResponse, ReaderConfig, SamplingParams,
    DEFAULT_CONSUMER_GROUP,
};
