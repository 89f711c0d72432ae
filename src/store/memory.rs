use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AnalyticsStore, EntryRepository, StoreError, StoreResult};
use crate::models::daily_summary::{DailyMoodSummary, DailySummaryUpdate};
use crate::models::entry::{AnalyticsRow, JournalEntry, NewJournalEntry};
use crate::models::mood::Mood;
use crate::models::user::User;

/// In-process store used when no database is configured, and by tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    entries: Vec<JournalEntry>,
    summaries: HashMap<(String, NaiveDate), DailyMoodSummary>,
    analytics: Vec<AnalyticsRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account. Account creation belongs to the auth service.
    pub async fn insert_user(&self, id: &str, email: &str) -> User {
        let user = User {
            id: id.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .users
            .insert(user.id.clone(), user.clone());
        user
    }

    /// Insert an entry verbatim, including legacy rows without a score.
    pub async fn insert_raw_entry(&self, entry: JournalEntry) {
        self.inner.write().await.entries.push(entry);
    }

    pub async fn summary_count(&self) -> usize {
        self.inner.read().await.summaries.len()
    }

    pub async fn analytics_len(&self) -> usize {
        self.inner.read().await.analytics.len()
    }
}

#[async_trait]
impl EntryRepository for MemoryStore {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_entry(&self, entry: NewJournalEntry) -> StoreResult<JournalEntry> {
        let stored = JournalEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            raw_text: entry.raw_text,
            detected_language: entry.detected_language,
            translated_text: entry.translated_text,
            sentiment_score: Some(entry.sentiment_score),
            mood: entry.mood,
            advice: entry.advice,
            created_at: entry.created_at,
        };
        self.inner.write().await.entries.push(stored.clone());
        Ok(stored)
    }

    async fn entries_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<JournalEntry>> {
        let mut entries: Vec<JournalEntry> = self
            .inner
            .read()
            .await
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && e.created_at >= start && e.created_at <= end)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn upsert_daily_summary(
        &self,
        user_id: &str,
        date: NaiveDate,
        update: DailySummaryUpdate,
    ) -> StoreResult<DailyMoodSummary> {
        let mut inner = self.inner.write().await;
        let key = (user_id.to_string(), date);
        let now = Utc::now();

        if let Some(existing) = inner.summaries.get_mut(&key) {
            if let Some(mood) = update.daily_mood {
                existing.daily_mood = mood.into();
            }
            if update.average_score.is_some() {
                existing.average_score = update.average_score;
            }
            if let Some(count) = update.entry_count {
                existing.entry_count = count;
            }
            if update.advice_text.is_some() {
                existing.advice_text = update.advice_text;
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let mood = update.daily_mood.ok_or_else(|| StoreError::IncompleteSummary {
            user_id: user_id.to_string(),
            date,
        })?;
        let summary = DailyMoodSummary {
            user_id: user_id.to_string(),
            date,
            daily_mood: mood.into(),
            average_score: update.average_score,
            entry_count: update.entry_count.unwrap_or(0),
            advice_text: update.advice_text,
            updated_at: now,
        };
        inner.summaries.insert(key, summary.clone());
        Ok(summary)
    }

    async fn daily_summary(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<DailyMoodSummary>> {
        Ok(self
            .inner
            .read()
            .await
            .summaries
            .get(&(user_id.to_string(), date))
            .cloned())
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn record_entry(&self, row: AnalyticsRow) -> StoreResult<()> {
        self.inner.write().await.analytics.push(row);
        Ok(())
    }

    async fn mood_counts(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<(Mood, i64)>> {
        let inner = self.inner.read().await;
        let mut counts: HashMap<Mood, i64> = HashMap::new();
        for row in inner
            .analytics
            .iter()
            .filter(|r| r.user_id == user_id && r.timestamp >= since && r.timestamp <= until)
        {
            *counts.entry(row.mood).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
