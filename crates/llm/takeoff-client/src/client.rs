//! Thin async client over the Takeoff REST endpoints.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{Result, TakeoffError};
use crate::stream::{text_stream, TextStream};
use crate::types::{
    EmbeddingInput, EmbeddingRequest, EmbeddingResponse, EmbeddingResult, GenerationRequest,
    GenerationResponse, ReaderConfig,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MGMT_PORT: u16 = 3001;

const LOG_PREVIEW_LEN: usize = 200;

/// Client for one Takeoff server: inference on `port`, reader management on `mgmt_port`.
#[derive(Debug, Clone)]
pub struct TakeoffClient {
    http: Client,
    generation_url: String,
    management_url: String,
}

impl TakeoffClient {
    /// `base_url` is scheme and host (e.g. `http://localhost`); ports are appended.
    pub fn new(base_url: &str, port: u16, mgmt_port: u16) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self::with_client(http, base_url, port, mgmt_port))
    }

    /// Builds a client around an existing reqwest client (shared pool, custom timeouts).
    pub fn with_client(http: Client, base_url: &str, port: u16, mgmt_port: u16) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            http,
            generation_url: format!("{}:{}", base, port),
            management_url: format!("{}:{}", base, mgmt_port),
        }
    }

    pub fn generation_url(&self) -> &str {
        &self.generation_url
    }

    pub fn management_url(&self) -> &str {
        &self.management_url
    }

    /// `POST {management_url}/reader`. Returns the server's reply body.
    pub async fn create_reader(&self, reader: &ReaderConfig) -> Result<serde_json::Value> {
        reader.validate()?;
        info!(
            model_name = %reader.model_name,
            device = %reader.device,
            consumer_group = %reader.consumer_group,
            "Takeoff create_reader request"
        );

        let response = self
            .http
            .post(format!("{}/reader", self.management_url))
            .json(reader)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response, "reader").await;
            warn!(model_name = %reader.model_name, status = status.as_u16(), "Takeoff create_reader failed");
            return Err(TakeoffError::Provisioning {
                model_name: reader.model_name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        info!(model_name = %reader.model_name, status = status.as_u16(), "Takeoff reader created");
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    /// Provisions `readers` one after another, in order. Stops at the first failure.
    pub async fn provision_readers(&self, readers: &[ReaderConfig]) -> Result<()> {
        for reader in readers {
            self.create_reader(reader).await?;
        }
        Ok(())
    }

    /// `POST {generation_url}/generate`. Returns the generated text.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        info!(
            text_preview = %preview(&request.text),
            text_len = request.text.len(),
            "Takeoff generate request"
        );
        let response = self.post_checked("generate", request).await?;
        let reply: GenerationResponse = decode(response).await?;
        info!(reply_len = reply.text.len(), "Takeoff generate done");
        Ok(reply.text)
    }

    /// `POST {generation_url}/generate_stream`. The status is checked before the stream is
    /// returned, so a rejected request never yields a fragment.
    pub async fn generate_stream(&self, request: &GenerationRequest) -> Result<TextStream> {
        info!(
            text_preview = %preview(&request.text),
            text_len = request.text.len(),
            "Takeoff generate_stream request"
        );
        let response = self.post_checked("generate_stream", request).await?;
        debug!(status = response.status().as_u16(), "Takeoff generate_stream opened");
        Ok(text_stream(response))
    }

    /// `POST {generation_url}/embed` for a single text.
    pub async fn embed(&self, text: &str, consumer_group: &str) -> Result<Vec<f32>> {
        info!(consumer_group, text_len = text.len(), "Takeoff embed request");
        let request = EmbeddingRequest {
            text: EmbeddingInput::Single(text),
            consumer_group,
        };
        let response = self.post_checked("embed", &request).await?;
        let reply: EmbeddingResponse = decode(response).await?;
        match reply.result {
            EmbeddingResult::Single(vector) => Ok(vector),
            EmbeddingResult::Batch(mut vectors) if vectors.len() == 1 => Ok(vectors.remove(0)),
            EmbeddingResult::Batch(vectors) => Err(TakeoffError::InvalidResponse(format!(
                "expected one embedding, got {}",
                vectors.len()
            ))),
        }
    }

    /// `POST {generation_url}/embed` for a batch. An empty batch makes no request.
    pub async fn embed_batch(&self, texts: &[String], consumer_group: &str) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        info!(consumer_group, batch_size = texts.len(), "Takeoff embed_batch request");
        let request = EmbeddingRequest {
            text: EmbeddingInput::Batch(texts),
            consumer_group,
        };
        let response = self.post_checked("embed", &request).await?;
        let reply: EmbeddingResponse = decode(response).await?;
        let vectors = match reply.result {
            EmbeddingResult::Batch(vectors) => vectors,
            EmbeddingResult::Single(vector) if texts.len() == 1 => vec![vector],
            EmbeddingResult::Single(_) => {
                return Err(TakeoffError::InvalidResponse(format!(
                    "expected {} embeddings, got a single vector",
                    texts.len()
                )))
            }
        };
        if vectors.len() != texts.len() {
            return Err(TakeoffError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    async fn post_checked<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response> {
        let response = self
            .http
            .post(format!("{}/{}", self.generation_url, endpoint))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response, endpoint).await;
            warn!(endpoint, status = status.as_u16(), "Takeoff inference request failed");
            return Err(TakeoffError::InferenceServer {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Body of a rejected request. A failed read is logged and yields an empty body.
async fn error_body(response: Response, endpoint: &str) -> String {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(endpoint, status, error = %e, "Takeoff error body could not be read");
            String::new()
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| TakeoffError::InvalidResponse(format!("{}: {}", e, body)))
}

fn preview(text: &str) -> String {
    if text.len() <= LOG_PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = LOG_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
