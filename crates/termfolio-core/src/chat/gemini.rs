use async_trait::async_trait;
use serde::Deserialize;

use super::{ChatBackend, ChatError};
use crate::config::ChatConfig;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Google Generative Language `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Client for `config`, or `None` without an API key.
    pub fn from_config(config: &ChatConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some(
            Self::new(api_key)
                .with_model(&config.model)
                .with_endpoint(&config.endpoint),
        )
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending generateContent");
        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.into_text().ok_or(ChatError::EmptyResponse)
    }
}
