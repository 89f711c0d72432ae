use std::sync::Arc;

use super::{SentimentService, ServiceResult};
use crate::models::mood::Mood;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub score: f64,
    pub mood: Mood,
}

/// Scores text and classifies it. There is no fallback score: a failed
/// call fails the submission.
#[derive(Clone)]
pub struct SentimentScorer {
    service: Arc<dyn SentimentService>,
}

impl SentimentScorer {
    pub fn new(service: Arc<dyn SentimentService>) -> Self {
        Self { service }
    }

    pub async fn score(&self, text: &str) -> ServiceResult<SentimentScore> {
        let score = self.service.analyze_sentiment(text).await?;
        Ok(SentimentScore {
            score,
            mood: Mood::from_score(score),
        })
    }
}
