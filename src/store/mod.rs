//! Repository contracts for the document store (users, entries, daily
//! summaries) and the analytical store (period counts).
//!
//! Both Postgres and in-memory backends implement the two traits; the
//! service layer only ever sees `Arc<dyn ...>` handles.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::daily_summary::{DailyMoodSummary, DailySummaryUpdate};
use crate::models::entry::{AnalyticsRow, JournalEntry, NewJournalEntry};
use crate::models::mood::Mood;
use crate::models::user::User;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cannot create daily summary for {user_id} on {date} without a mood")]
    IncompleteSummary { user_id: String, date: NaiveDate },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Append an analyzed entry; the store assigns the id.
    async fn insert_entry(&self, entry: NewJournalEntry) -> StoreResult<JournalEntry>;

    /// Entries with `start <= created_at <= end`, newest first.
    async fn entries_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<JournalEntry>>;

    /// Set-if-present-else-keep merge keyed by `(user_id, date)`.
    /// Creating a new record requires `update.daily_mood`.
    async fn upsert_daily_summary(
        &self,
        user_id: &str,
        date: NaiveDate,
        update: DailySummaryUpdate,
    ) -> StoreResult<DailyMoodSummary>;

    async fn daily_summary(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<DailyMoodSummary>>;
}

#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn record_entry(&self, row: AnalyticsRow) -> StoreResult<()>;

    /// Per-mood counts with `since <= timestamp <= until`. Moods with no
    /// rows may be absent from the result.
    async fn mood_counts(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> StoreResult<Vec<(Mood, i64)>>;
}
