use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

use super::advice::{AdviceGenerator, AdviceScope};
use crate::models::daily_summary::{DailyMoodSummary, DailySummaryUpdate};
use crate::models::mood::{DailyMood, Mood};
use crate::store::{EntryRepository, StoreResult};


/// Recomputes a day's mood from every entry the user wrote that day.
///
/// Always a full recomputation followed by a merge upsert, so concurrent or
/// repeated calls converge on the same record.
#[derive(Clone)]
pub struct DailyAggregator {
    store: Arc<dyn EntryRepository>,
    advisor: AdviceGenerator,
    offset: FixedOffset,
}

impl DailyAggregator {
    pub fn new(
        store: Arc<dyn EntryRepository>,
        advisor: AdviceGenerator,
        offset: FixedOffset,
    ) -> Self {
        Self {
            store,
            advisor,
            offset,
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of `at` in the configured local offset.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub async fn aggregate_day(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> StoreResult<DailyMoodSummary> {
        let (start, end) = day_bounds(date, self.offset);
        let entries = self.store.entries_between(user_id, start, end).await?;
        let entry_count = entries.len() as i32;

        let scores: Vec<f64> = entries
            .iter()
            .filter_map(|e| e.sentiment_score)
            .filter(|s| s.is_finite())
            .collect();

        let Some(average) = mean(&scores) else {
            let daily_mood = if entries.is_empty() {
                DailyMood::NoEntries
            } else {
                DailyMood::NoValidScores
            };
            return Ok(DailyMoodSummary {
                user_id: user_id.to_string(),
                date,
                daily_mood,
                average_score: None,
                entry_count,
                advice_text: None,
                updated_at: Utc::now(),
            });
        };

        let mood = Mood::from_daily_average(average);
        let advice = self.advisor.advise(mood.as_str(), AdviceScope::Day).await;
        let generated = advice.is_generated();

        // A fallback is reported in place of stored advice but never stored.
        let update = DailySummaryUpdate {
            daily_mood: Some(mood),
            average_score: Some(average),
            entry_count: Some(entry_count),
            advice_text: generated.then(|| advice.text.clone()),
        };

        let mut summary = self.store.upsert_daily_summary(user_id, date, update).await?;
        if !generated {
            summary.advice_text = Some(advice.text);
        }

        tracing::debug!(
            user_id = %user_id,
            date = %date,
            mood = %mood,
            entries = entry_count,
            "Daily mood recomputed"
        );

        Ok(summary)
    }
}

/// First and last instant of `date` in `offset`, both inclusive, as UTC.
pub fn day_bounds(date: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_midnight = date.and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - Duration::seconds(offset.local_minus_utc() as i64);
    let start = DateTime::<Utc>::from_naive_utc_and_offset(utc_midnight, Utc);
    let end = start + Duration::days(1) - Duration::nanoseconds(1);
    (start, end)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::{JournalEntry, NewJournalEntry};
    use crate::services::advice::DAILY_ADVICE_FALLBACK;
    use crate::services::{ServiceError, ServiceResult, TextGenerator};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CountingGenerator {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl CountingGenerator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, _prompt: &str) -> ServiceResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Unconfigured("gemini"));
            }
            Ok("Write down one thing that went well.".into())
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        DateTime::<Utc>::from_naive_utc_and_offset(date().and_hms_opt(hour, 0, 0).unwrap(), Utc)
    }

    async fn add(store: &MemoryStore, score: f64, hour: u32) {
        store
            .insert_entry(NewJournalEntry {
                user_id: "u1".into(),
                raw_text: format!("entry at {hour}"),
                detected_language: "en".into(),
                translated_text: String::new(),
                sentiment_score: score,
                mood: Mood::from_score(score),
                advice: String::new(),
                created_at: at(hour),
            })
            .await
            .unwrap();
    }

    fn aggregator(store: &MemoryStore, generator: Arc<CountingGenerator>) -> DailyAggregator {
        DailyAggregator::new(
            Arc::new(store.clone()),
            AdviceGenerator::new(Some(generator)),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    #[test]
    fn test_day_bounds_utc() {
        let (start, end) = day_bounds(date(), FixedOffset::east_opt(0).unwrap());
        assert_eq!(start, at(0));
        assert_eq!(end, at(0) + Duration::days(1) - Duration::nanoseconds(1));
    }

    #[test]
    fn test_day_bounds_with_offset() {
        // UTC+2: local midnight is 22:00 UTC on the previous day
        let (start, _) = day_bounds(date(), FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(start, at(0) - Duration::hours(2));
    }

    #[tokio::test]
    async fn test_no_entries_skips_advice_and_store() {
        let store = MemoryStore::new();
        let generator = CountingGenerator::new();
        let summary = aggregator(&store, generator.clone())
            .aggregate_day("u1", date())
            .await
            .unwrap();

        assert_eq!(summary.daily_mood, DailyMood::NoEntries);
        assert_eq!(summary.average_score, None);
        assert_eq!(summary.entry_count, 0);
        assert_eq!(summary.advice_text, None);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.summary_count().await, 0);
    }

    #[tokio::test]
    async fn test_entries_without_scores() {
        let store = MemoryStore::new();
        store
            .insert_raw_entry(JournalEntry {
                id: Uuid::new_v4(),
                user_id: "u1".into(),
                raw_text: "legacy".into(),
                detected_language: "en".into(),
                translated_text: String::new(),
                sentiment_score: None,
                mood: Mood::Neutral,
                advice: String::new(),
                created_at: at(9),
            })
            .await;

        let summary = aggregator(&store, CountingGenerator::new())
            .aggregate_day("u1", date())
            .await
            .unwrap();
        assert_eq!(summary.daily_mood, DailyMood::NoValidScores);
        assert_eq!(summary.entry_count, 1);
        assert_eq!(store.summary_count().await, 0);
    }

    #[tokio::test]
    async fn test_average_uses_daily_thresholds() {
        let store = MemoryStore::new();
        add(&store, 0.4, 8).await;
        add(&store, 0.2, 12).await;
        add(&store, -1.0, 0).await;
        // First instant of the next day is outside the window
        store
            .insert_entry(NewJournalEntry {
                user_id: "u1".into(),
                raw_text: "tomorrow".into(),
                detected_language: "en".into(),
                translated_text: String::new(),
                sentiment_score: -1.0,
                mood: Mood::Negative,
                advice: String::new(),
                created_at: at(0) + Duration::days(1),
            })
            .await
            .unwrap();

        let summary = aggregator(&store, CountingGenerator::new())
            .aggregate_day("u1", date())
            .await
            .unwrap();

        let expected = (0.4 + 0.2 - 1.0) / 3.0;
        assert_eq!(summary.entry_count, 3);
        assert_eq!(summary.average_score, Some(expected));
        assert_eq!(summary.daily_mood, DailyMood::Neutral);
    }

    #[tokio::test]
    async fn test_average_above_daily_band_is_positive() {
        let store = MemoryStore::new();
        // Both Neutral as entries, Positive as a day
        add(&store, 0.3, 8).await;
        add(&store, 0.4, 20).await;

        let summary = aggregator(&store, CountingGenerator::new())
            .aggregate_day("u1", date())
            .await
            .unwrap();
        assert_eq!(summary.daily_mood, DailyMood::Positive);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let store = MemoryStore::new();
        add(&store, 0.8, 9).await;
        add(&store, 0.1, 18).await;
        let agg = aggregator(&store, CountingGenerator::new());

        let first = agg.aggregate_day("u1", date()).await.unwrap();
        let second = agg.aggregate_day("u1", date()).await.unwrap();

        assert_eq!(store.summary_count().await, 1);
        assert_eq!(
            DailyMoodSummary {
                updated_at: first.updated_at,
                ..second.clone()
            },
            first
        );
        assert_eq!(second.daily_mood, DailyMood::Positive);
        assert_eq!(second.average_score, Some((0.8 + 0.1) / 2.0));
    }

    #[tokio::test]
    async fn test_advice_failure_reports_fallback_over_stored_advice() {
        let store = MemoryStore::new();
        add(&store, 0.9, 9).await;
        let generator = CountingGenerator::new();
        let agg = aggregator(&store, generator.clone());

        let first = agg.aggregate_day("u1", date()).await.unwrap();
        assert_eq!(first.daily_mood, DailyMood::Positive);
        assert_eq!(
            first.advice_text.as_deref(),
            Some("Write down one thing that went well.")
        );

        // The day turns negative while the generator is down
        generator.failing.store(true, Ordering::SeqCst);
        add(&store, -1.0, 10).await;
        add(&store, -1.0, 11).await;
        let second = agg.aggregate_day("u1", date()).await.unwrap();
        assert_eq!(second.entry_count, 3);
        assert_eq!(second.daily_mood, DailyMood::Negative);
        assert_eq!(second.advice_text.as_deref(), Some(DAILY_ADVICE_FALLBACK));

        // Earlier advice stays in the store, untouched by the fallback
        let stored = store.daily_summary("u1", date()).await.unwrap().unwrap();
        assert_eq!(stored.daily_mood, DailyMood::Negative);
        assert_eq!(stored.advice_text, first.advice_text);
    }

    #[tokio::test]
    async fn test_advice_failure_without_history_reports_fallback() {
        let store = MemoryStore::new();
        add(&store, -0.9, 9).await;
        let generator = CountingGenerator::new();
        generator.failing.store(true, Ordering::SeqCst);

        let summary = aggregator(&store, generator)
            .aggregate_day("u1", date())
            .await
            .unwrap();
        assert_eq!(summary.daily_mood, DailyMood::Negative);
        assert_eq!(summary.advice_text.as_deref(), Some(DAILY_ADVICE_FALLBACK));
        // The fallback is reported but never persisted
        let stored = store.daily_summary("u1", date()).await.unwrap().unwrap();
        assert_eq!(stored.advice_text, None);
    }
}
