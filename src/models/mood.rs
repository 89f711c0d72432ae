use serde::{Deserialize, Serialize};

/// Entry-level classification band. Boundaries are strict: ±0.5 is Neutral.
pub const ENTRY_POSITIVE_THRESHOLD: f64 = 0.5;
pub const ENTRY_NEGATIVE_THRESHOLD: f64 = -0.5;

/// Daily averages use a narrower band than single entries.
pub const DAILY_POSITIVE_THRESHOLD: f64 = 0.25;
pub const DAILY_NEGATIVE_THRESHOLD: f64 = -0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mood_label")]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Positive, Mood::Neutral, Mood::Negative];

    /// Classify a single entry's sentiment score.
    pub fn from_score(score: f64) -> Self {
        classify(score, ENTRY_POSITIVE_THRESHOLD, ENTRY_NEGATIVE_THRESHOLD)
    }

    /// Classify the mean score of a day's entries.
    pub fn from_daily_average(average: f64) -> Self {
        classify(average, DAILY_POSITIVE_THRESHOLD, DAILY_NEGATIVE_THRESHOLD)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "Positive",
            Mood::Neutral => "Neutral",
            Mood::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn classify(value: f64, positive_above: f64, negative_below: f64) -> Mood {
    if value > positive_above {
        Mood::Positive
    } else if value < negative_below {
        Mood::Negative
    } else {
        Mood::Neutral
    }
}

/// Outcome of a day-level recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DailyMood {
    Positive,
    Neutral,
    Negative,
    #[serde(rename = "No entries")]
    NoEntries,
    #[serde(rename = "No valid scores")]
    NoValidScores,
}

impl DailyMood {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyMood::Positive => "Positive",
            DailyMood::Neutral => "Neutral",
            DailyMood::Negative => "Negative",
            DailyMood::NoEntries => "No entries",
            DailyMood::NoValidScores => "No valid scores",
        }
    }

    /// The mood label, if this day produced one.
    pub fn mood(&self) -> Option<Mood> {
        match self {
            DailyMood::Positive => Some(Mood::Positive),
            DailyMood::Neutral => Some(Mood::Neutral),
            DailyMood::Negative => Some(Mood::Negative),
            DailyMood::NoEntries | DailyMood::NoValidScores => None,
        }
    }
}

impl From<Mood> for DailyMood {
    fn from(mood: Mood) -> Self {
        match mood {
            Mood::Positive => DailyMood::Positive,
            Mood::Neutral => DailyMood::Neutral,
            Mood::Negative => DailyMood::Negative,
        }
    }
}

impl std::fmt::Display for DailyMood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation rounding for average scores. Stored values keep full precision.
pub fn round_score(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
