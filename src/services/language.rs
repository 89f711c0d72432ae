use std::sync::Arc;

use super::{LanguageService, ServiceResult};

pub const DEFAULT_LANGUAGE: &str = "en";
const UNDETERMINED: &str = "und";

/// Text to score plus what the language stage found out about it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    pub text_for_scoring: String,
    pub detected_language: String,
    /// Empty when no translation was performed.
    pub translated_text: String,
}

impl NormalizedText {
    /// The degraded result: score the original text as English.
    pub fn passthrough(text: &str) -> Self {
        Self {
            text_for_scoring: text.to_string(),
            detected_language: DEFAULT_LANGUAGE.to_string(),
            translated_text: String::new(),
        }
    }
}

/// Detects the entry language and translates non-English text for scoring.
/// Never fails: any detection or translation error yields the passthrough.
#[derive(Clone)]
pub struct LanguageNormalizer {
    service: Arc<dyn LanguageService>,
}

impl LanguageNormalizer {
    pub fn new(service: Arc<dyn LanguageService>) -> Self {
        Self { service }
    }

    pub async fn normalize(&self, text: &str) -> NormalizedText {
        match self.try_normalize(text).await {
            Ok(normalized) => normalized,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Language detection/translation failed, scoring original text"
                );
                NormalizedText::passthrough(text)
            }
        }
    }

    async fn try_normalize(&self, text: &str) -> ServiceResult<NormalizedText> {
        let language = match self.service.detect(text).await? {
            Some(lang) if needs_translation(&lang) => lang,
            Some(lang) => {
                return Ok(NormalizedText {
                    detected_language: lang,
                    ..NormalizedText::passthrough(text)
                })
            }
            None => return Ok(NormalizedText::passthrough(text)),
        };

        let translated = self.service.translate_to_english(text, &language).await?;
        tracing::debug!(language = %language, "Translated entry for scoring");

        Ok(NormalizedText {
            text_for_scoring: translated.clone(),
            detected_language: language,
            translated_text: translated,
        })
    }
}

fn needs_translation(language: &str) -> bool {
    !language.is_empty() && language != DEFAULT_LANGUAGE && language != UNDETERMINED
}
