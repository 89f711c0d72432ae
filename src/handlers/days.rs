use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;

use crate::dto::{parse_date, required, DayEntry, DayMoodResponse, DayQuery, EntriesResponse};
use crate::error::{AppError, AppResult};
use crate::models::user::User;
use crate::services::daily::day_bounds;
use crate::AppState;

async fn resolve_day(state: &AppState, query: DayQuery) -> AppResult<(User, NaiveDate)> {
    let email = required(query.email, "email")?;
    let date = parse_date(&required(query.date, "date")?)?;

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok((user, date))
}

pub async fn mood_for_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<DayMoodResponse>> {
    let (user, date) = resolve_day(&state, query).await?;
    let summary = state.daily.aggregate_day(&user.id, date).await?;

    Ok(Json(DayMoodResponse::new(user.email, summary)))
}

pub async fn entries_by_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<EntriesResponse>> {
    let (user, date) = resolve_day(&state, query).await?;
    let (start, end) = day_bounds(date, state.daily.offset());

    let entries: Vec<DayEntry> = state
        .store
        .entries_between(&user.id, start, end)
        .await?
        .into_iter()
        .map(DayEntry::from)
        .collect();

    Ok(Json(EntriesResponse {
        success: true,
        date,
        user_email: user.email,
        entries_count: entries.len(),
        entries,
    }))
}
