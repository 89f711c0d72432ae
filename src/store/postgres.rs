use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AnalyticsStore, EntryRepository, StoreError, StoreResult};
use crate::models::daily_summary::{DailyMoodSummary, DailySummaryUpdate, StoredDailySummary};
use crate::models::entry::{AnalyticsRow, JournalEntry, NewJournalEntry};
use crate::models::mood::Mood;
use crate::models::user::User;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[async_trait]
impl EntryRepository for PgStore {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, email, created_at FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, email, created_at FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn insert_entry(&self, entry: NewJournalEntry) -> StoreResult<JournalEntry> {
        let stored = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (
                id, user_id, raw_text, detected_language, translated_text,
                sentiment_score, mood, advice, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.user_id)
        .bind(&entry.raw_text)
        .bind(&entry.detected_language)
        .bind(&entry.translated_text)
        .bind(entry.sentiment_score)
        .bind(entry.mood)
        .bind(&entry.advice)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn entries_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<JournalEntry>> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT * FROM journal_entries
            WHERE user_id = $1 AND created_at BETWEEN $2 AND $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn upsert_daily_summary(
        &self,
        user_id: &str,
        date: NaiveDate,
        update: DailySummaryUpdate,
    ) -> StoreResult<DailyMoodSummary> {
        let Some(mood) = update.daily_mood else {
            // Without a mood we can only merge into an existing row.
            let row = sqlx::query_as::<_, StoredDailySummary>(
                r#"
                UPDATE daily_mood_summaries SET
                    average_score = COALESCE($3, average_score),
                    entry_count = COALESCE($4, entry_count),
                    advice_text = COALESCE($5, advice_text),
                    updated_at = NOW()
                WHERE user_id = $1 AND summary_date = $2
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(date)
            .bind(update.average_score)
            .bind(update.entry_count)
            .bind(&update.advice_text)
            .fetch_optional(&self.pool)
            .await?;

            return row.map(Into::into).ok_or_else(|| StoreError::IncompleteSummary {
                user_id: user_id.to_string(),
                date,
            });
        };

        let row = sqlx::query_as::<_, StoredDailySummary>(
            r#"
            INSERT INTO daily_mood_summaries (
                user_id, summary_date, daily_mood, average_score, entry_count, advice_text
            )
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6)
            ON CONFLICT (user_id, summary_date) DO UPDATE SET
                daily_mood = $3,
                average_score = COALESCE($4, daily_mood_summaries.average_score),
                entry_count = COALESCE($5, daily_mood_summaries.entry_count),
                advice_text = COALESCE($6, daily_mood_summaries.advice_text),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(mood)
        .bind(update.average_score)
        .bind(update.entry_count)
        .bind(&update.advice_text)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn daily_summary(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<DailyMoodSummary>> {
        let row = sqlx::query_as::<_, StoredDailySummary>(
            "SELECT * FROM daily_mood_summaries WHERE user_id = $1 AND summary_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn record_entry(&self, row: AnalyticsRow) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sentiment_entries (user_id, entry, mood, sentiment_score, "timestamp")
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&row.user_id)
        .bind(&row.entry)
        .bind(row.mood)
        .bind(row.sentiment_score)
        .bind(row.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mood_counts(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<(Mood, i64)>> {
        let counts = sqlx::query_as::<_, (Mood, i64)>(
            r#"
            SELECT mood, COUNT(*) AS count
            FROM sentiment_entries
            WHERE user_id = $1 AND "timestamp" BETWEEN $2 AND $3
            GROUP BY mood
            "#,
        )
        .bind(user_id)
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
