//! Shared fixtures: stub capabilities and an in-memory app.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Request},
    Router,
};
use chrono::FixedOffset;
use http_body_util::BodyExt;
use moodjournal_api::middleware::rate_limit::RateLimitState;
use moodjournal_api::services::{
    LanguageService, SentimentService, ServiceError, ServiceResult, TextGenerator,
};
use moodjournal_api::store::MemoryStore;
use moodjournal_api::{build_router, AppState, Capabilities};
use serde_json::Value;

pub const USER_ID: &str = "user-1";
pub const USER_EMAIL: &str = "journal@example.com";

/// Language stub: detects a fixed language, optionally failing translation.
pub struct StubLanguage {
    pub detected: Option<&'static str>,
    pub translation: Option<&'static str>,
}

#[async_trait]
impl LanguageService for StubLanguage {
    async fn detect(&self, _text: &str) -> ServiceResult<Option<String>> {
        Ok(self.detected.map(String::from))
    }

    async fn translate_to_english(&self, _text: &str, _source: &str) -> ServiceResult<String> {
        self.translation
            .map(String::from)
            .ok_or(ServiceError::Api {
                service: "translation",
                status: 503,
                body: "unavailable".into(),
            })
    }
}

/// Scores by keyword so tests can tell which text was scored.
pub struct KeywordSentiment {
    pub calls: AtomicUsize,
    pub fail: bool,
}

#[async_trait]
impl SentimentService for KeywordSentiment {
    async fn analyze_sentiment(&self, text: &str) -> ServiceResult<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ServiceError::Api {
                service: "sentiment analysis",
                status: 500,
                body: "internal".into(),
            });
        }
        let lower = text.to_lowercase();
        Ok(if lower.contains("thrilled") || lower.contains("happy") {
            0.8
        } else if lower.contains("awful") {
            -0.7
        } else {
            0.1
        })
    }
}

pub struct FixedGenerator;

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, prompt: &str) -> ServiceResult<String> {
        if prompt.contains("100 words") {
            Ok("Write down what made this moment good.".into())
        } else {
            Ok("Plan one small thing for tomorrow.".into())
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub sentiment: Arc<KeywordSentiment>,
}

pub struct TestOptions {
    pub language: StubLanguage,
    pub sentiment_fails: bool,
    pub advice_configured: bool,
    pub rate_limit: u32,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            language: StubLanguage {
                detected: Some("en"),
                translation: None,
            },
            sentiment_fails: false,
            advice_configured: true,
            rate_limit: 100,
        }
    }
}

pub async fn setup(options: TestOptions) -> TestApp {
    let store = MemoryStore::new();
    store.insert_user(USER_ID, USER_EMAIL).await;

    let sentiment = Arc::new(KeywordSentiment {
        calls: AtomicUsize::new(0),
        fail: options.sentiment_fails,
    });
    let generator: Option<Arc<dyn TextGenerator>> = if options.advice_configured {
        Some(Arc::new(FixedGenerator))
    } else {
        None
    };

    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Capabilities {
            language: Arc::new(options.language),
            sentiment: sentiment.clone(),
            generator,
        },
        FixedOffset::east_opt(0).unwrap(),
        RateLimitState::new(options.rate_limit, 60),
    );

    let router =
        build_router(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));

    TestApp {
        router,
        store,
        sentiment,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
