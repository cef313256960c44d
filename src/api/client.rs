//! HTTP client for the local backend.
//!
//! Every call is a plain request/response against one endpoint; the backend
//! owns all business logic. Failures surface the server's structured error
//! message when one is present, otherwise the transport error text.

use std::error::Error;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api::{
    ChatRequest, ChatResponse, ImageRequest, ImageResponse, ModelsResponse, ProvidersResponse,
    SearchResponse, SpeechRequest, SpeechResponse, TokenRequest, WeatherResponse,
};
use crate::utils::url::join_url;

/// Client-wide default timeout for backend calls. External NewAPI probes use
/// their own, shorter bound (see `core::query`).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client against the backend's absolute base URL
    /// (e.g. `http://127.0.0.1:8000`). The `/api/...` endpoint paths are
    /// resolved against it.
    pub fn new(base_url: &str) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(BackendClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The underlying HTTP client, shared with the external server probes so
    /// the whole process keeps one connection pool.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Box<dyn Error>> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).query(query).send().await?;
        decode_response(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Box<dyn Error>> {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        decode_response(response).await
    }

    pub async fn health(&self) -> Result<Value, Box<dyn Error>> {
        self.get_json("/api/health", &[]).await
    }

    pub async fn get_providers(&self) -> Result<ProvidersResponse, Box<dyn Error>> {
        self.get_json("/api/providers", &[]).await
    }

    pub async fn get_models(&self) -> Result<ModelsResponse, Box<dyn Error>> {
        self.get_json("/api/models", &[]).await
    }

    pub async fn chat_completions(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, Box<dyn Error>> {
        self.post_json("/api/chat/completions", request).await
    }

    pub async fn search(
        &self,
        query: &str,
        engine: &str,
        max_results: u32,
    ) -> Result<SearchResponse, Box<dyn Error>> {
        self.get_json(
            "/api/search",
            &[
                ("q", query.to_string()),
                ("engine", engine.to_string()),
                ("max_results", max_results.to_string()),
            ],
        )
        .await
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<ImageResponse, Box<dyn Error>> {
        self.post_json(
            "/api/images/generations",
            &ImageRequest {
                prompt: prompt.to_string(),
            },
        )
        .await
    }

    pub async fn text_to_speech(
        &self,
        input: &str,
        voice: &str,
    ) -> Result<SpeechResponse, Box<dyn Error>> {
        self.post_json(
            "/api/audio/speech",
            &SpeechRequest {
                input: input.to_string(),
                voice: voice.to_string(),
            },
        )
        .await
    }

    pub async fn get_weather(&self, location: &str) -> Result<WeatherResponse, Box<dyn Error>> {
        self.get_json("/api/weather", &[("location", location.to_string())])
            .await
    }

    /// Validate a token against the local backend. The body is returned
    /// undecoded; the aggregator interprets it as a per-server result.
    pub async fn validate_token(&self, token: &str) -> Result<Value, Box<dyn Error>> {
        self.post_json("/api/auth/validate", &TokenRequest { token })
            .await
    }

    pub async fn get_token_usage(&self, token: &str) -> Result<Value, Box<dyn Error>> {
        self.post_json("/api/auth/usage", &TokenRequest { token })
            .await
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, Box<dyn Error>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(extract_api_error(status, &body).into());
    }
    Ok(response.json::<T>().await?)
}

/// Pull a human-readable message out of an error response body.
///
/// Understands OpenAI-style `{"error": {"message": ...}}` and FastAPI-style
/// `{"detail": ...}` bodies; anything else falls back to the raw text, or the
/// status line when the body is empty.
pub fn extract_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
        {
            return message.to_string();
        }
        if let Some(detail) = value.get("detail") {
            match detail {
                Value::String(s) if !s.is_empty() => return s.clone(),
                Value::Null => {}
                other => return other.to_string(),
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {trimmed}")
    }
}
