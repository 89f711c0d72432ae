use std::sync::Arc;

use chrono::Utc;

use super::advice::{AdviceGenerator, AdviceScope};
use super::daily::DailyAggregator;
use super::language::LanguageNormalizer;
use super::sentiment::SentimentScorer;
use super::ServiceError;
use crate::models::entry::{AnalyticsRow, JournalEntry, NewJournalEntry};
use crate::store::{AnalyticsStore, EntryRepository, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("sentiment scoring failed: {0}")]
    Scoring(#[from] ServiceError),

    #[error("failed to persist entry: {0}")]
    Store(#[from] StoreError),
}

/// Turns raw journal text into a stored, classified, advice-annotated entry.
///
/// Stages run strictly in order: normalize, score, advise, persist. Nothing
/// is written until scoring and advice have resolved.
#[derive(Clone)]
pub struct EntryAnalyzer {
    normalizer: LanguageNormalizer,
    scorer: SentimentScorer,
    advisor: AdviceGenerator,
    store: Arc<dyn EntryRepository>,
    analytics: Arc<dyn AnalyticsStore>,
    daily: DailyAggregator,
}

impl EntryAnalyzer {
    pub fn new(
        normalizer: LanguageNormalizer,
        scorer: SentimentScorer,
        advisor: AdviceGenerator,
        store: Arc<dyn EntryRepository>,
        analytics: Arc<dyn AnalyticsStore>,
        daily: DailyAggregator,
    ) -> Self {
        Self {
            normalizer,
            scorer,
            advisor,
            store,
            analytics,
            daily,
        }
    }

    pub async fn analyze_and_store(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<JournalEntry, AnalysisError> {
        let normalized = self.normalizer.normalize(text).await;
        let sentiment = self.scorer.score(&normalized.text_for_scoring).await?;
        let advice = self
            .advisor
            .advise(sentiment.mood.as_str(), AdviceScope::Entry(text))
            .await;

        let entry = self
            .store
            .insert_entry(NewJournalEntry {
                user_id: user_id.to_string(),
                raw_text: text.to_string(),
                detected_language: normalized.detected_language,
                translated_text: normalized.translated_text,
                sentiment_score: sentiment.score,
                mood: sentiment.mood,
                advice: advice.text,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            user_id = %user_id,
            entry_id = %entry.id,
            mood = %entry.mood,
            detected_language = %entry.detected_language,
            "Journal entry analyzed and stored"
        );

        // The entry is committed; the steps below only refresh derived data.
        if let Err(e) = self.analytics.record_entry(AnalyticsRow::from(&entry)).await {
            tracing::warn!(
                error = %e,
                entry_id = %entry.id,
                "Failed to mirror entry into analytics store"
            );
        }

        let day = self.daily.local_date(entry.created_at);
        if let Err(e) = self.daily.aggregate_day(user_id, day).await {
            tracing::warn!(
                error = %e,
                user_id = %user_id,
                date = %day,
                "Daily mood refresh failed"
            );
        }

        Ok(entry)
    }
}
