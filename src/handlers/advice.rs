use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{required, AdviceRequest, AdviceResponse};
use crate::error::{AppError, AppResult};
use crate::services::advice::AdviceScope;
use crate::AppState;

pub async fn gemini_advice(
    State(state): State<AppState>,
    Json(body): Json<AdviceRequest>,
) -> AppResult<Json<AdviceResponse>> {
    if !state.advisor.is_configured() {
        return Err(AppError::ServiceUnavailable(
            "Advice service is not configured".into(),
        ));
    }

    body.validate()?;
    let mood = required(body.mood, "mood")?;
    let entry_text = body
        .entry_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let scope = match entry_text.as_deref() {
        Some(text) => AdviceScope::Entry(text),
        None => AdviceScope::Day,
    };
    let advice = state.advisor.advise(&mood, scope).await;

    Ok(Json(AdviceResponse {
        requested_mood: mood,
        entry_text_provided: entry_text.is_some(),
        advice: advice.text,
    }))
}
