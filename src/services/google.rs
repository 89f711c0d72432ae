use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{error_for_status, LanguageService, SentimentService, ServiceError, ServiceResult};

const LANGUAGE_API: &str = "https://language.googleapis.com/v1/documents:analyzeSentiment";
const TRANSLATE_API: &str = "https://translation.googleapis.com/language/translate/v2";

/// REST client for Cloud Natural Language and Cloud Translation v2.
#[derive(Clone)]
pub struct GoogleCloudClient {
    http: reqwest::Client,
    api_key: String,
}

impl GoogleCloudClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentimentResponse {
    document_sentiment: Option<DocumentSentiment>,
}

#[derive(Debug, Deserialize)]
struct DocumentSentiment {
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TranslateEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct DetectionData {
    detections: Vec<Vec<Detection>>,
}

#[derive(Debug, Deserialize)]
struct Detection {
    language: String,
}

#[derive(Debug, Deserialize)]
struct TranslationData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

fn sentiment_score(response: SentimentResponse) -> ServiceResult<f64> {
    response
        .document_sentiment
        .and_then(|s| s.score)
        .ok_or(ServiceError::MalformedResponse {
            service: "sentiment analysis",
            detail: "missing documentSentiment.score".into(),
        })
}

fn detected_language(data: DetectionData) -> Option<String> {
    data.detections
        .into_iter()
        .next()
        .and_then(|candidates| candidates.into_iter().next())
        .map(|d| d.language)
        .filter(|lang| !lang.is_empty())
}

fn translated_text(data: TranslationData) -> ServiceResult<String> {
    data.translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or(ServiceError::MalformedResponse {
            service: "translation",
            detail: "empty translations list".into(),
        })
}

#[async_trait]
impl SentimentService for GoogleCloudClient {
    async fn analyze_sentiment(&self, text: &str) -> ServiceResult<f64> {
        let response = self
            .http
            .post(LANGUAGE_API)
            .query(&[("key", &self.api_key)])
            .json(&json!({
                "document": { "type": "PLAIN_TEXT", "content": text },
                "encodingType": "UTF8",
            }))
            .send()
            .await?;

        let response = error_for_status("sentiment analysis", response).await?;
        sentiment_score(response.json().await?)
    }
}

#[async_trait]
impl LanguageService for GoogleCloudClient {
    async fn detect(&self, text: &str) -> ServiceResult<Option<String>> {
        let response = self
            .http
            .post(format!("{TRANSLATE_API}/detect"))
            .query(&[("key", &self.api_key)])
            .json(&json!({ "q": text }))
            .send()
            .await?;

        let response = error_for_status("language detection", response).await?;
        let envelope: TranslateEnvelope<DetectionData> = response.json().await?;
        Ok(detected_language(envelope.data))
    }

    async fn translate_to_english(&self, text: &str, source: &str) -> ServiceResult<String> {
        let response = self
            .http
            .post(TRANSLATE_API)
            .query(&[("key", &self.api_key)])
            .json(&json!({
                "q": text,
                "source": source,
                "target": "en",
                "format": "text",
            }))
            .send()
            .await?;

        let response = error_for_status("translation", response).await?;
        let envelope: TranslateEnvelope<TranslationData> = response.json().await?;
        translated_text(envelope.data)
    }
}
