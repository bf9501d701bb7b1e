//! Mood log model matching the frontend MoodLog interface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single mood observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodLog {
    pub id: String,
    pub date: DateTime<Utc>,
    pub value: i32,
    #[serde(default)]
    pub note: String,
}

/// Request body for logging a mood.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMoodLog {
    pub value: i32,
    #[serde(default)]
    pub note: String,
}

/// Result of the external emotion-detection service.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectedEmotion {
    pub emotion: String,
    pub confidence: f64,
}

/// Query parameters for time-windowed mood listings.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendQuery {
    #[serde(default = "default_trend_days")]
    pub days: i64,
}

fn default_trend_days() -> i64 {
    30
}

/// Consecutive-day logging streak.
#[derive(Debug, Clone, Serialize)]
pub struct StreakInfo {
    pub streak: u32,
}
