//! Entry analysis and mood aggregation.
//!
//! External capabilities (language, sentiment, text generation) sit behind
//! traits so handlers receive explicitly constructed handles. Best-effort
//! stages (`language`, `advice`) own their degrade-and-continue policy;
//! `sentiment` failures propagate.

pub mod advice;
pub mod analysis;
pub mod daily;
pub mod gemini;
pub mod google;
pub mod language;
pub mod sentiment;
pub mod stats;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    Unconfigured(&'static str),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed response from {service}: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[async_trait]
pub trait LanguageService: Send + Sync {
    /// ISO-639 code of the text's language, or `None` if the service gave none.
    async fn detect(&self, text: &str) -> ServiceResult<Option<String>>;

    async fn translate_to_english(&self, text: &str, source: &str) -> ServiceResult<String>;
}

#[async_trait]
pub trait SentimentService: Send + Sync {
    /// Document-level score, conventionally in [-1, 1].
    async fn analyze_sentiment(&self, text: &str) -> ServiceResult<f64>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> ServiceResult<String>;
}

/// Shared HTTP client for all upstream calls.
pub fn http_client(timeout: std::time::Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}

async fn error_for_status(
    service: &'static str,
    response: reqwest::Response,
) -> ServiceResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Api {
        service,
        status,
        body,
    })
}
