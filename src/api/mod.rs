//! Request and response payloads for the backend API and for external
//! NewAPI-compatible servers.
//!
//! Fields mirror the wire shapes the backend produces; anything the backend
//! may omit is optional here and rendered as `N/A` by the CLI.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod client;

#[derive(Debug, Serialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    pub role: Option<String>,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize, Default)]
pub struct ChatUsage {
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatResponseChoice>,
    #[serde(default)]
    pub usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
pub struct ProvidersResponse {
    pub providers: Vec<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub categories: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderModels {
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub count: usize,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub providers: IndexMap<String, ProviderModels>,
    #[serde(default)]
    pub total_models: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    pub total_results: Option<u64>,
    pub search_time: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
}

#[derive(Debug, Serialize)]
pub struct SpeechRequest {
    pub input: String,
    pub voice: String,
}

#[derive(Debug, Deserialize)]
pub struct SpeechResponse {
    pub audio_url: Option<String>,
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    pub location: Option<String>,
    pub temperature: Option<String>,
    pub condition: Option<String>,
    pub humidity: Option<String>,
    pub wind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub token: &'a str,
}

/// External NewAPI billing subscription payload; only the two fields the
/// dashboard reads are typed, the rest rides along untyped.
#[derive(Debug, Deserialize)]
pub struct SubscriptionResponse {
    pub hard_limit_usd: Option<Value>,
    pub usage: Option<Value>,
}
