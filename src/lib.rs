use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use chrono::FixedOffset;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use middleware::rate_limit::RateLimitState;
use services::advice::AdviceGenerator;
use services::analysis::EntryAnalyzer;
use services::daily::DailyAggregator;
use services::language::LanguageNormalizer;
use services::sentiment::SentimentScorer;
use services::stats::PeriodStatsAggregator;
use services::{LanguageService, SentimentService, TextGenerator};
use store::{AnalyticsStore, EntryRepository, PgStore};

/// Handles to the external capabilities, constructed once at startup.
pub struct Capabilities {
    pub language: Arc<dyn LanguageService>,
    pub sentiment: Arc<dyn SentimentService>,
    /// `None` when no advice credentials are configured.
    pub generator: Option<Arc<dyn TextGenerator>>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntryRepository>,
    pub analyzer: EntryAnalyzer,
    pub daily: DailyAggregator,
    pub stats: PeriodStatsAggregator,
    pub advisor: AdviceGenerator,
    pub rate_limiter: RateLimitState,
    /// Present when backed by Postgres; used by the readiness probe.
    pub database: Option<PgStore>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EntryRepository>,
        analytics: Arc<dyn AnalyticsStore>,
        capabilities: Capabilities,
        day_offset: FixedOffset,
        rate_limiter: RateLimitState,
    ) -> Self {
        let advisor = AdviceGenerator::new(capabilities.generator);
        let daily = DailyAggregator::new(store.clone(), advisor.clone(), day_offset);
        let analyzer = EntryAnalyzer::new(
            LanguageNormalizer::new(capabilities.language),
            SentimentScorer::new(capabilities.sentiment),
            advisor.clone(),
            store.clone(),
            analytics.clone(),
            daily.clone(),
        );

        Self {
            store,
            analyzer,
            daily,
            stats: PeriodStatsAggregator::new(analytics),
            advisor,
            rate_limiter,
            database: None,
        }
    }

    pub fn with_database(mut self, db: PgStore) -> Self {
        self.database = Some(db);
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    // Endpoints that spend external API quota
    let upstream_routes = Router::new()
        .route("/analyzeMood", post(handlers::entries::analyze_mood))
        .route("/getGeminiAdvice", post(handlers::advice::gemini_advice))
        .route("/getMoodForDay", get(handlers::days::mood_for_day))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_upstream,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/getEntriesByDay", get(handlers::days::entries_by_day))
        .route("/getMoodStatsBQ", get(handlers::stats::mood_stats))
        .merge(upstream_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
