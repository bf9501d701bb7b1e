//! Assessment result model matching the frontend AssessmentResult interface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sub-scale and overall scores produced by the scoring engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AssessmentScores {
    pub anxiety: i32,
    pub depression: i32,
    pub stress: i32,
    pub sleep: i32,
    pub social: i32,
    pub overall: i32,
}

/// A stored assessment. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentResult {
    pub id: String,
    pub date: DateTime<Utc>,
    pub anxiety: i32,
    pub depression: i32,
    pub stress: i32,
    pub sleep: i32,
    pub social: i32,
    pub overall: i32,
}

impl AssessmentResult {
    pub fn new(id: String, date: DateTime<Utc>, scores: AssessmentScores) -> Self {
        Self {
            id,
            date,
            anxiety: scores.anxiety,
            depression: scores.depression,
            stress: scores.stress,
            sleep: scores.sleep,
            social: scores.social,
            overall: scores.overall,
        }
    }

    pub fn scores(&self) -> AssessmentScores {
        AssessmentScores {
            anxiety: self.anxiety,
            depression: self.depression,
            stress: self.stress,
            sleep: self.sleep,
            social: self.social,
            overall: self.overall,
        }
    }
}

/// Request body for submitting a completed survey.
///
/// Inverted scale questions are expected already transformed (`11 - raw`).
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAssessmentRequest {
    pub answers: crate::survey::Answers,
}
