use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{required, AnalyzeMoodRequest, AnalyzeMoodResponse};
use crate::error::{AppError, AppResult};
use crate::AppState;

pub async fn analyze_mood(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeMoodRequest>,
) -> AppResult<Json<AnalyzeMoodResponse>> {
    body.validate()?;
    let user_id = required(body.user_id, "user_id")?;
    let entry = required(body.entry, "entry")?;

    state
        .store
        .find_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let stored = state.analyzer.analyze_and_store(&user_id, &entry).await?;

    Ok(Json(stored.into()))
}
