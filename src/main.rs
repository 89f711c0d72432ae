use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use moodjournal_api::config::Config;
use moodjournal_api::middleware::rate_limit::RateLimitState;
use moodjournal_api::services::gemini::GeminiClient;
use moodjournal_api::services::google::GoogleCloudClient;
use moodjournal_api::services::{http_client, TextGenerator};
use moodjournal_api::store::{MemoryStore, PgStore};
use moodjournal_api::{build_router, db, AppState, Capabilities};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodjournal_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;
    let day_offset = config.day_offset()?;

    let http = http_client(Duration::from_secs(config.upstream_timeout_secs))
        .context("Failed to build HTTP client")?;

    let google = Arc::new(GoogleCloudClient::new(
        http.clone(),
        config.google_cloud_api_key.clone(),
    ));
    let generator = config.gemini_api_key.as_ref().map(|key| {
        Arc::new(GeminiClient::new(http.clone(), key.clone(), config.gemini_model.clone()))
            as Arc<dyn TextGenerator>
    });
    if generator.is_none() {
        tracing::warn!("GEMINI_API_KEY not set, advice will use fallback text");
    }

    let capabilities = Capabilities {
        language: google.clone(),
        sentiment: google,
        generator,
    };

    let rate_limiter =
        RateLimitState::new(config.rate_limit_max_requests, config.rate_limit_window_secs);
    rate_limiter.spawn_cleanup_worker();

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            db::run_migrations(&pool).await?;
            let pg = PgStore::new(pool);
            AppState::new(
                Arc::new(pg.clone()),
                Arc::new(pg.clone()),
                capabilities,
                day_offset,
                rate_limiter,
            )
            .with_database(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            let memory = MemoryStore::new();
            AppState::new(
                Arc::new(memory.clone()),
                Arc::new(memory),
                capabilities,
                day_offset,
                rate_limiter,
            )
        }
    };

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    // Client IP is needed for rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
