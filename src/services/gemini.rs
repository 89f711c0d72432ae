use async_trait::async_trait;
use serde::Deserialize;

use super::{error_for_status, ServiceError, ServiceResult, TextGenerator};

const GEMINI_API: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn first_text(response: GenerateResponse) -> ServiceResult<String> {
    response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ServiceError::MalformedResponse {
            service: "gemini",
            detail: "no text candidate".into(),
        })
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> ServiceResult<String> {
        let response = self
            .http
            .post(format!("{GEMINI_API}/{}:generateContent", self.model))
            .query(&[("key", &self.api_key)])
            .json(&serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": { "maxOutputTokens": 256 }
            }))
            .send()
            .await?;

        let response = error_for_status("gemini", response).await?;
        first_text(response.json().await?)
    }
}
