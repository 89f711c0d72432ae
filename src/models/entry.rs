use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::mood::Mood;

/// An analyzed journal entry. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: String,
    pub raw_text: String,
    pub detected_language: String,
    /// Empty when no translation was performed.
    pub translated_text: String,
    /// Absent only on legacy rows written before scores were stored.
    pub sentiment_score: Option<f64>,
    pub mood: Mood,
    pub advice: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the pipeline derives before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub user_id: String,
    pub raw_text: String,
    pub detected_language: String,
    pub translated_text: String,
    pub sentiment_score: f64,
    pub mood: Mood,
    pub advice: String,
    pub created_at: DateTime<Utc>,
}

/// Row mirrored into the analytical store for period statistics.
#[derive(Debug, Clone)]
pub struct AnalyticsRow {
    pub user_id: String,
    pub entry: String,
    pub mood: Mood,
    pub sentiment_score: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl From<&JournalEntry> for AnalyticsRow {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            user_id: entry.user_id.clone(),
            entry: entry.raw_text.clone(),
            mood: entry.mood,
            sentiment_score: entry.sentiment_score,
            timestamp: entry.created_at,
        }
    }
}
