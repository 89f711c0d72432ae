use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::models::stats::{MoodCounts, PeriodMoodStats};
use crate::store::{AnalyticsStore, StoreResult};

/// Rolling windows, cumulative: the 30-day window contains the 7-day one.
pub const WINDOWS_DAYS: [i64; 3] = [7, 30, 365];

#[derive(Clone)]
pub struct PeriodStatsAggregator {
    analytics: Arc<dyn AnalyticsStore>,
}

impl PeriodStatsAggregator {
    pub fn new(analytics: Arc<dyn AnalyticsStore>) -> Self {
        Self { analytics }
    }

    pub async fn stats(&self, user_id: &str) -> StoreResult<PeriodMoodStats> {
        self.stats_at(user_id, Utc::now()).await
    }

    pub async fn stats_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<PeriodMoodStats> {
        let [week, month, year] = WINDOWS_DAYS;
        Ok(PeriodMoodStats {
            last_7_days: self.window(user_id, now, week).await?,
            last_30_days: self.window(user_id, now, month).await?,
            last_365_days: self.window(user_id, now, year).await?,
        })
    }

    async fn window(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        days: i64,
    ) -> StoreResult<MoodCounts> {
        let mut counts = MoodCounts::default();
        for (mood, count) in self
            .analytics
            .mood_counts(user_id, now - Duration::days(days), now)
            .await?
        {
            counts.add(mood, count);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::AnalyticsRow;
    use crate::models::mood::Mood;
    use crate::store::MemoryStore;

    async fn record(store: &MemoryStore, user: &str, mood: Mood, at: DateTime<Utc>) {
        store
            .record_entry(AnalyticsRow {
                user_id: user.into(),
                entry: "e".into(),
                mood,
                sentiment_score: None,
                timestamp: at,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_user_is_zero_filled() {
        let stats = PeriodStatsAggregator::new(Arc::new(MemoryStore::new()))
            .stats("nobody")
            .await
            .unwrap();
        assert_eq!(stats, PeriodMoodStats::default());

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json["last_7_days"],
            serde_json::json!({"Positive": 0, "Neutral": 0, "Negative": 0})
        );
    }

    #[tokio::test]
    async fn test_windows_are_cumulative() {
        let store = MemoryStore::new();
        let now = Utc::now();
        for hours in [1, 20, 40] {
            record(&store, "u1", Mood::Positive, now - Duration::hours(hours)).await;
        }
        record(&store, "u2", Mood::Negative, now - Duration::hours(1)).await;

        let stats = PeriodStatsAggregator::new(Arc::new(store))
            .stats_at("u1", now)
            .await
            .unwrap();

        let three_positive = MoodCounts {
            positive: 3,
            neutral: 0,
            negative: 0,
        };
        assert_eq!(stats.last_7_days, three_positive);
        assert_eq!(stats.last_30_days, three_positive);
        assert_eq!(stats.last_365_days, three_positive);
    }

    #[tokio::test]
    async fn test_older_entries_only_in_wider_windows() {
        let store = MemoryStore::new();
        let now = Utc::now();
        record(&store, "u1", Mood::Negative, now - Duration::days(2)).await;
        record(&store, "u1", Mood::Neutral, now - Duration::days(10)).await;
        record(&store, "u1", Mood::Neutral, now - Duration::days(200)).await;
        record(&store, "u1", Mood::Positive, now - Duration::days(400)).await;

        let stats = PeriodStatsAggregator::new(Arc::new(store))
            .stats_at("u1", now)
            .await
            .unwrap();

        assert_eq!(stats.last_7_days.total(), 1);
        assert_eq!(stats.last_7_days.negative, 1);
        assert_eq!(stats.last_30_days.neutral, 1);
        assert_eq!(stats.last_30_days.total(), 2);
        assert_eq!(stats.last_365_days.neutral, 2);
        assert_eq!(stats.last_365_days.positive, 0);
    }
}
