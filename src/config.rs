use std::env;
use std::str::FromStr;

use anyhow::Context;
use chrono::FixedOffset;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    /// Postgres URL. When absent, entries live in an in-process store.
    pub database_url: Option<String>,

    pub google_cloud_api_key: String,

    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    pub upstream_timeout_secs: u64,

    /// Offset that defines the local calendar day for daily summaries.
    pub day_utc_offset_minutes: i32,

    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("PORT", 8080)?,

            database_url: optional("DATABASE_URL"),

            google_cloud_api_key: env::var("GOOGLE_CLOUD_API_KEY")
                .context("GOOGLE_CLOUD_API_KEY must be set")?,

            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),

            upstream_timeout_secs: parse_or("UPSTREAM_TIMEOUT_SECS", 30)?,

            day_utc_offset_minutes: parse_or("DAY_UTC_OFFSET_MINUTES", 0)?,

            rate_limit_max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", 30)?,
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", 60)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn day_offset(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.day_utc_offset_minutes * 60).with_context(|| {
            format!(
                "DAY_UTC_OFFSET_MINUTES out of range: {}",
                self.day_utc_offset_minutes
            )
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        None => Ok(default),
    }
}
