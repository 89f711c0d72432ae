//! # Mood Journal — Request/Response DTOs
//!
//! All API contract types in one module. Field names match the JSON the
//! journal frontend consumes; the advice endpoint is camelCase, the rest
//! snake_case.
//!
//! Conventions:
//! - `*Request` / `*Query` → deserialized from client JSON body or query params.
//!   Required fields are `Option` so a missing field is a 400 from our own
//!   validation, not an extractor rejection.
//! - `*Response` → serialized to client JSON

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::daily_summary::DailyMoodSummary;
use crate::models::entry::JournalEntry;
use crate::models::mood::{round_score, DailyMood, Mood};

pub const MAX_ENTRY_CHARS: u64 = 10_000;

pub const NO_ENTRIES_MESSAGE: &str = "No journal entries were recorded for this day.";
pub const NO_VALID_SCORES_MESSAGE: &str =
    "None of this day's entries have a sentiment score, so no advice is available.";

/// Trimmed value of a required field, or a 400 naming it.
pub fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing required field: {field}")))
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date {raw:?}, expected YYYY-MM-DD")))
}

// ============================================================================
// analyzeMood
// ============================================================================

/// POST /analyzeMood
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AnalyzeMoodRequest {
    #[validate(length(max = 128, message = "user_id too long"))]
    pub user_id: Option<String>,

    #[validate(length(max = 10000, message = "Entry must be under 10000 characters"))]
    pub entry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeMoodResponse {
    pub message: String,
    pub entry_id: Uuid,
    pub mood: Mood,
    pub sentiment_score: Option<f64>,
    /// Null when the entry was already English.
    pub translated_text: Option<String>,
    pub detected_language: String,
    pub advice: String,
}

impl From<JournalEntry> for AnalyzeMoodResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            message: "Entry saved!".into(),
            entry_id: entry.id,
            mood: entry.mood,
            sentiment_score: entry.sentiment_score,
            translated_text: Some(entry.translated_text).filter(|t| !t.is_empty()),
            detected_language: entry.detected_language,
            advice: entry.advice,
        }
    }
}

// ============================================================================
// getMoodForDay / getEntriesByDay
// ============================================================================

/// GET /getMoodForDay, GET /getEntriesByDay
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DayQuery {
    pub email: Option<String>,
    /// YYYY-MM-DD
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayMoodResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub user_email: String,
    pub entries_count: i32,
    /// Rounded to 4 decimal places.
    pub average_sentiment_score: Option<f64>,
    pub daily_mood: DailyMood,
    pub advice: String,
    /// Set only for days that could not be scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DayMoodResponse {
    pub fn new(user_email: String, summary: DailyMoodSummary) -> Self {
        let message = match summary.daily_mood {
            DailyMood::NoEntries => Some(NO_ENTRIES_MESSAGE.to_string()),
            DailyMood::NoValidScores => Some(NO_VALID_SCORES_MESSAGE.to_string()),
            _ => None,
        };
        Self {
            success: true,
            date: summary.date,
            user_email,
            entries_count: summary.entry_count,
            average_sentiment_score: summary.average_score.map(round_score),
            daily_mood: summary.daily_mood,
            advice: summary.advice_text.unwrap_or_default(),
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayEntry {
    pub id: Uuid,
    pub entry: String,
    pub mood: Mood,
    pub sentiment_score: Option<f64>,
    pub translated_text: String,
    pub detected_language: String,
    pub timestamp: DateTime<Utc>,
    pub advice: String,
}

impl From<JournalEntry> for DayEntry {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            entry: entry.raw_text,
            mood: entry.mood,
            sentiment_score: entry.sentiment_score,
            translated_text: entry.translated_text,
            detected_language: entry.detected_language,
            timestamp: entry.created_at,
            advice: entry.advice,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub user_email: String,
    pub entries_count: usize,
    /// Newest first.
    pub entries: Vec<DayEntry>,
}

// ============================================================================
// getMoodStatsBQ
// ============================================================================

/// GET /getMoodStatsBQ
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatsQuery {
    pub user_id: Option<String>,
}

// ============================================================================
// getGeminiAdvice
// ============================================================================

/// POST /getGeminiAdvice
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AdviceRequest {
    #[validate(length(max = 64, message = "mood too long"))]
    pub mood: Option<String>,

    #[validate(length(max = 10000, message = "entryText must be under 10000 characters"))]
    pub entry_text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceResponse {
    pub requested_mood: String,
    pub entry_text_provided: bool,
    pub advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(translated: &str) -> JournalEntry {
        JournalEntry {
            id: Uuid::nil(),
            user_id: "u1".into(),
            raw_text: "Je suis content".into(),
            detected_language: "fr".into(),
            translated_text: translated.into(),
            sentiment_score: Some(0.7),
            mood: Mood::Positive,
            advice: "Keep going.".into(),
            created_at: DateTime::parse_from_rfc3339("2026-05-04T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_required_rejects_missing_and_blank() {
        assert!(matches!(required(None, "entry"), Err(AppError::Validation(_))));
        assert!(matches!(
            required(Some("   ".into()), "entry"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(required(Some(" u1 ".into()), "user_id").unwrap(), "u1");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-05-04").unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
        );
        assert!(parse_date("04/05/2026").is_err());
        assert!(parse_date("2026-02-30").is_err());
    }

    #[test]
    fn test_analyze_response_nulls_empty_translation() {
        let json = serde_json::to_value(AnalyzeMoodResponse::from(entry(""))).unwrap();
        assert!(json["translated_text"].is_null());
        assert_eq!(json["message"], "Entry saved!");
        assert_eq!(json["mood"], "Positive");

        let json = serde_json::to_value(AnalyzeMoodResponse::from(entry("I am happy"))).unwrap();
        assert_eq!(json["translated_text"], "I am happy");
        assert_eq!(json["detected_language"], "fr");
    }

    #[test]
    fn test_day_entry_timestamp_is_iso8601() {
        let json = serde_json::to_value(DayEntry::from(entry(""))).unwrap();
        assert_eq!(json["timestamp"], "2026-05-04T10:00:00Z");
        assert_eq!(json["entry"], "Je suis content");
        assert_eq!(json["translated_text"], "");
    }

    #[test]
    fn test_day_mood_response_rounds_average() {
        let summary = DailyMoodSummary {
            user_id: "u1".into(),
            date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            daily_mood: DailyMood::Neutral,
            average_score: Some(0.123456),
            entry_count: 3,
            advice_text: None,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(DayMoodResponse::new("a@b.com".into(), summary)).unwrap();
        assert_eq!(json["average_sentiment_score"], 0.1235);
        assert_eq!(json["date"], "2026-05-04");
        assert_eq!(json["daily_mood"], "Neutral");
        assert_eq!(json["advice"], "");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_unscored_days_carry_message() {
        let summary = |daily_mood| DailyMoodSummary {
            user_id: "u1".into(),
            date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            daily_mood,
            average_score: None,
            entry_count: 0,
            advice_text: None,
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(DayMoodResponse::new(
            "a@b.com".into(),
            summary(DailyMood::NoEntries),
        ))
        .unwrap();
        assert_eq!(json["message"], NO_ENTRIES_MESSAGE);
        assert_eq!(json["advice"], "");

        let json = serde_json::to_value(DayMoodResponse::new(
            "a@b.com".into(),
            summary(DailyMood::NoValidScores),
        ))
        .unwrap();
        assert_eq!(json["message"], NO_VALID_SCORES_MESSAGE);
        assert_eq!(json["daily_mood"], "No valid scores");
    }

    #[test]
    fn test_advice_request_uses_camel_case() {
        let req: AdviceRequest =
            serde_json::from_str(r#"{"mood":"Negative","entryText":"Long day"}"#).unwrap();
        assert_eq!(req.mood.as_deref(), Some("Negative"));
        assert_eq!(req.entry_text.as_deref(), Some("Long day"));

        let json = serde_json::to_value(AdviceResponse {
            requested_mood: "Negative".into(),
            entry_text_provided: true,
            advice: "Rest.".into(),
        })
        .unwrap();
        assert_eq!(json["requestedMood"], "Negative");
        assert_eq!(json["entryTextProvided"], true);
    }

    #[test]
    fn test_oversized_entry_fails_validation() {
        let req = AnalyzeMoodRequest {
            user_id: Some("u1".into()),
            entry: Some("x".repeat(MAX_ENTRY_CHARS as usize + 1)),
        };
        assert!(req.validate().is_err());
    }
}
