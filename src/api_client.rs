// src/api_client.rs - HTTP client for the video Q&A backend
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::BackendApi;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Structured error message supplied by the backend.
    #[error("{0}")]
    Backend(String),
    /// Non-2xx response without a usable error field.
    #[error("request failed with status {0}")]
    Status(StatusCode),
    /// Network or body-decoding failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// What the user should see: the backend's message when there is one,
    /// otherwise the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Backend(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

// ============================================================================
// API REQUEST/RESPONSE STRUCTURES
// ============================================================================

#[derive(Serialize, Debug)]
pub struct ProcessVideoRequest {
    pub url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProcessVideoResponse {
    pub video_id: String,
    pub chunks_created: u32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub video_id: String,
    pub question: String,
}

/// Transcript location backing part of an answer, in seconds from the
/// start of the video.
#[derive(Deserialize, Debug, Clone)]
pub struct SourceRef {
    pub timestamp: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

#[derive(Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

// ============================================================================
// IMPLEMENTATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a video URL for server-side processing (transcript fetch and
    /// embedding). Returns the session identifier and chunk count.
    pub async fn process_video(&self, url: &str) -> Result<ProcessVideoResponse, ApiError> {
        let endpoint = format!("{}/process-video", self.base_url);
        tracing::debug!("POST {} for url {}", endpoint, url);

        let response = self
            .client
            .post(&endpoint)
            .json(&ProcessVideoRequest {
                url: url.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let data: ProcessVideoResponse = response.json().await?;
        tracing::info!(
            "Video {} processed into {} knowledge chunks",
            data.video_id,
            data.chunks_created
        );
        Ok(data)
    }

    /// Ask a question about an already-processed video.
    pub async fn chat(&self, video_id: &str, question: &str) -> Result<ChatResponse, ApiError> {
        let endpoint = format!("{}/chat", self.base_url);
        tracing::debug!("POST {} for video {}", endpoint, video_id);

        let response = self
            .client
            .post(&endpoint)
            .json(&ChatRequest {
                video_id: video_id.to_string(),
                question: question.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Startup probe against the backend's health endpoint.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let endpoint = format!("{}/health", self.base_url);
        let response = self.client.get(&endpoint).send().await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Prefer the structured `error` field from the response body; fall
    /// back to the bare status when the body is missing or not JSON.
    async fn read_error(response: reqwest::Response) -> ApiError {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                error: Some(message),
            }) => {
                tracing::warn!("Backend error ({}): {}", status, message);
                ApiError::Backend(message)
            }
            _ => {
                tracing::warn!("Backend returned {} with no error body", status);
                ApiError::Status(status)
            }
        }
    }
}

#[async_trait]
impl BackendApi for ApiClient {
    async fn process_video(&self, url: &str) -> Result<ProcessVideoResponse, ApiError> {
        ApiClient::process_video(self, url).await
    }

    async fn chat(&self, video_id: &str, question: &str) -> Result<ChatResponse, ApiError> {
        ApiClient::chat(self, video_id, question).await
    }
}
