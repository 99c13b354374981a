//! Takeoff error types.
//!
//! Every failure surfaced by the client is one of these variants; nothing is retried.

use thiserror::Error;

/// Errors returned by the Takeoff client and the adapters built on it.
#[derive(Error, Debug)]
pub enum TakeoffError {
    /// Management endpoint rejected a reader while provisioning.
    #[error("Reader provisioning failed for {model_name} ({status}): {body}")]
    Provisioning {
        model_name: String,
        status: u16,
        body: String,
    },

    /// Generation, streaming or embedding endpoint returned a non-2xx status.
    #[error("Inference server error ({status}): {body}")]
    InferenceServer { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing consumer group: {0}")]
    MissingConsumerGroup(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl TakeoffError {
    /// HTTP status carried by server-side errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provisioning { status, .. } | Self::InferenceServer { status, .. } => {
                Some(*status)
            }
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response payload carried by server-side errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Provisioning { body, .. } | Self::InferenceServer { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TakeoffError>;
