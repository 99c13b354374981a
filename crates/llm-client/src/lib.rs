//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and its Titan Takeoff implementations:
//! [`TitanTakeoff`] (basic) and [`TitanTakeoffPro`] (adds consumer group and sampling
//! options). Both provision their configured readers when built, then send generation
//! requests to the inference port.
//!
//! ```rust,no_run
//! use llm_client::{ClientConfig, LlmClient, TitanTakeoff};
//! use takeoff_client::ReaderConfig;
//!
//! async fn example() -> takeoff_client::Result<()> {
//!     let config = ClientConfig::default().with_models(vec![ReaderConfig::new("llama-2-7b")]);
//!     let llm = TitanTakeoff::new(config).await?;
//!     let answer = llm.invoke("What is 2 + 2?").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use takeoff_client::{Result, TextStream};

mod config;
mod pro;
mod takeoff_llm;

pub use config::{ClientConfig, ProOptions};
pub use pro::TitanTakeoffPro;
pub use takeoff_llm::TitanTakeoff;

/// LLM client interface: one prompt in, generated text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the generated text for `prompt`. In streaming mode the streamed fragments
    /// are concatenated.
    async fn invoke(&self, prompt: &str) -> Result<String>;

    /// Streams the generated text for `prompt` as fragments.
    async fn stream(&self, prompt: &str) -> Result<TextStream>;

    /// Alias of [`LlmClient::invoke`].
    async fn call(&self, prompt: &str) -> Result<String> {
        self.invoke(prompt).await
    }
}
