use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::mood::{DailyMood, Mood};

/// Day-level aggregate for one user, keyed by `(user_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMoodSummary {
    pub user_id: String,
    pub date: NaiveDate,
    pub daily_mood: DailyMood,
    pub average_score: Option<f64>,
    pub entry_count: i32,
    pub advice_text: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Partial write for the summary upsert. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct DailySummaryUpdate {
    pub daily_mood: Option<Mood>,
    pub average_score: Option<f64>,
    pub entry_count: Option<i32>,
    pub advice_text: Option<String>,
}

/// Persisted form. Only days with a real mood are ever stored.
#[derive(Debug, Clone, FromRow)]
pub struct StoredDailySummary {
    pub user_id: String,
    pub summary_date: NaiveDate,
    pub daily_mood: Mood,
    pub average_score: Option<f64>,
    pub entry_count: i32,
    pub advice_text: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredDailySummary> for DailyMoodSummary {
    fn from(row: StoredDailySummary) -> Self {
        Self {
            user_id: row.user_id,
            date: row.summary_date,
            daily_mood: row.daily_mood.into(),
            average_score: row.average_score,
            entry_count: row.entry_count,
            advice_text: row.advice_text,
            updated_at: row.updated_at,
        }
    }
}
