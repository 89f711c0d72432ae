use axum::extract::{Query, State};
use axum::Json;

use crate::dto::{required, StatsQuery};
use crate::error::AppResult;
use crate::models::stats::PeriodMoodStats;
use crate::AppState;

pub async fn mood_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<PeriodMoodStats>> {
    let user_id = required(query.user_id, "user_id")?;
    let stats = state.stats.stats(&user_id).await?;
    Ok(Json(stats))
}
