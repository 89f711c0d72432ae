use std::sync::Arc;

use serde::Serialize;

use super::{ServiceError, ServiceResult, TextGenerator};

pub const ENTRY_ADVICE_FALLBACK: &str = "Advice service is currently unavailable.";
pub const DAILY_ADVICE_FALLBACK: &str = "Could not retrieve or store daily advice at this moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
}

impl Advice {
    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            source: AdviceSource::Fallback,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.source == AdviceSource::Generated
    }
}

/// What the advice is about: one entry, or a whole day's aggregate mood.
#[derive(Debug, Clone, Copy)]
pub enum AdviceScope<'a> {
    Entry(&'a str),
    Day,
}

impl AdviceScope<'_> {
    fn fallback_text(&self) -> &'static str {
        match self {
            AdviceScope::Entry(_) => ENTRY_ADVICE_FALLBACK,
            AdviceScope::Day => DAILY_ADVICE_FALLBACK,
        }
    }
}

/// Best-effort advice. Missing credentials or a failed call degrade to a
/// fixed string; callers never see the error.
#[derive(Clone)]
pub struct AdviceGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AdviceGenerator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn unconfigured() -> Self {
        Self { generator: None }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn advise(&self, mood: &str, scope: AdviceScope<'_>) -> Advice {
        match self.try_advise(mood, scope).await {
            Ok(text) => Advice {
                text,
                source: AdviceSource::Generated,
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    mood = %mood,
                    "Advice generation unavailable, using fallback"
                );
                Advice::fallback(scope.fallback_text())
            }
        }
    }

    async fn try_advise(&self, mood: &str, scope: AdviceScope<'_>) -> ServiceResult<String> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(ServiceError::Unconfigured("advice generation"))?;
        generator.generate(&build_prompt(mood, scope)).await
    }
}

pub fn build_prompt(mood: &str, scope: AdviceScope<'_>) -> String {
    match scope {
        AdviceScope::Entry(entry) if !entry.trim().is_empty() => format!(
            r#"You are a supportive journaling companion. The user just wrote this journal entry, which was classified as "{mood}":

"""
{entry}
"""

Reply with 1-2 sentences (at most 100 words) of advice tied to what they actually wrote. Avoid generic platitudes. Suggest one concrete next step or ask one reflection question."#,
            entry = entry.trim(),
        ),
        _ => format!(
            r#"You are a supportive journaling companion. Across today's journal entries the user's overall mood was "{mood}".

Reply with 1-2 sentences (at most 50 words) of advice for the rest of their day. Avoid generic platitudes. Suggest one concrete next step or ask one reflection question."#
        ),
    }
}
