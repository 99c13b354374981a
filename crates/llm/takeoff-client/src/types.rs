//! Wire types for the Takeoff management and inference APIs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TakeoffError};

/// Consumer group used when none is configured.
pub const DEFAULT_CONSUMER_GROUP: &str = "primary";

/// Device a reader runs on. The server calls the GPU device `cuda`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Device {
    #[default]
    #[serde(rename = "cpu")]
    Cpu,
    #[serde(rename = "cuda", alias = "gpu")]
    Gpu,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Gpu => "cuda",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = TakeoffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" | "cuda" => Ok(Device::Gpu),
            other => Err(TakeoffError::Config(format!("unknown device: {}", other))),
        }
    }
}

/// A named model instance to provision through `POST /reader`.
///
/// Serialized flat: every field is a top-level key of the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub model_name: String,
    pub device: Device,
    pub consumer_group: String,
    pub max_sequence_length: u32,
    pub max_batch_size: u32,
    pub tensor_parallel: u32,
}

impl ReaderConfig {
    /// Reader on CPU in the `primary` group, 512 tokens, batch 4, no tensor parallelism.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            device: Device::Cpu,
            consumer_group: DEFAULT_CONSUMER_GROUP.to_string(),
            max_sequence_length: 512,
            max_batch_size: 4,
            tensor_parallel: 1,
        }
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn with_consumer_group(mut self, consumer_group: impl Into<String>) -> Self {
        self.consumer_group = consumer_group.into();
        self
    }

    pub fn with_max_sequence_length(mut self, max_sequence_length: u32) -> Self {
        self.max_sequence_length = max_sequence_length;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: u32) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn with_tensor_parallel(mut self, tensor_parallel: u32) -> Self {
        self.tensor_parallel = tensor_parallel;
        self
    }

    /// Rejects empty names and zero sizes before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(TakeoffError::Config("reader model_name is empty".to_string()));
        }
        if self.consumer_group.trim().is_empty() {
            return Err(TakeoffError::Config(format!(
                "reader {} has an empty consumer_group",
                self.model_name
            )));
        }
        for (field, value) in [
            ("max_sequence_length", self.max_sequence_length),
            ("max_batch_size", self.max_batch_size),
            ("tensor_parallel", self.tensor_parallel),
        ] {
            if value == 0 {
                return Err(TakeoffError::Config(format!(
                    "reader {}: {} must be > 0",
                    self.model_name, field
                )));
            }
        }
        Ok(())
    }
}

/// Optional generation parameters. Unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_topk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_topp: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_repeat_ngram_size: Option<u32>,
}

impl SamplingParams {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /generate` and `POST /generate_stream`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_group: Option<String>,
    #[serde(flatten)]
    pub sampling: SamplingParams,
}

impl GenerationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
}

/// Embedding input: one text or a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EmbeddingInput<'a> {
    Single(&'a str),
    Batch(&'a [String]),
}

/// Body of `POST /embed`.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingRequest<'a> {
    pub text: EmbeddingInput<'a>,
    pub consumer_group: &'a str,
}

/// `result` is one vector for a single text and one per text for a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingResult {
    Batch(Vec<Vec<f32>>),
    Single(Vec<f32>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    pub result: EmbeddingResult,
}
