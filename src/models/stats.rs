use serde::Serialize;

use super::mood::Mood;

/// Mood counts for one window. Every mood is always present, zero if unseen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoodCounts {
    #[serde(rename = "Positive")]
    pub positive: i64,
    #[serde(rename = "Neutral")]
    pub neutral: i64,
    #[serde(rename = "Negative")]
    pub negative: i64,
}

impl MoodCounts {
    pub fn add(&mut self, mood: Mood, count: i64) {
        match mood {
            Mood::Positive => self.positive += count,
            Mood::Neutral => self.neutral += count,
            Mood::Negative => self.negative += count,
        }
    }

    pub fn total(&self) -> i64 {
        self.positive + self.neutral + self.negative
    }
}

/// Rolling-window statistics. Derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodMoodStats {
    pub last_7_days: MoodCounts,
    pub last_30_days: MoodCounts,
    pub last_365_days: MoodCounts,
}
