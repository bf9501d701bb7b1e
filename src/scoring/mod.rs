//! Assessment scoring.
//!
//! Pure arithmetic over an answer mapping. Missing answers count as zero; no
//! validation happens here.

use serde::Serialize;

use crate::models::AssessmentScores;
use crate::survey::{Answers, Subscale};

/// Round to nearest, ties toward positive infinity.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Average of the sub-scale's three answers, rounded.
pub fn subscale_score(answers: &Answers, subscale: Subscale) -> i32 {
    let sum: i64 = subscale
        .question_ids()
        .iter()
        .map(|id| i64::from(answers.get(*id).copied().unwrap_or(0)))
        .sum();
    round_half_up(sum as f64 / 3.0)
}

/// Combine the sub-scales into one wellbeing figure.
///
/// Anxiety, depression and stress are "lower is better", so they enter
/// inverted around 10; sleep and social count directly.
pub fn overall_score(anxiety: i32, depression: i32, stress: i32, sleep: i32, social: i32) -> i32 {
    let total = (10 - i64::from(anxiety))
        + (10 - i64::from(depression))
        + (10 - i64::from(stress))
        + i64::from(sleep)
        + i64::from(social);
    round_half_up(total as f64 / 5.0)
}

/// Reduce a flat answer mapping into sub-scale and overall scores.
pub fn score(answers: &Answers) -> AssessmentScores {
    let anxiety = subscale_score(answers, Subscale::Anxiety);
    let depression = subscale_score(answers, Subscale::Depression);
    let stress = subscale_score(answers, Subscale::Stress);
    let sleep = subscale_score(answers, Subscale::Sleep);
    let social = subscale_score(answers, Subscale::Social);

    AssessmentScores {
        anxiety,
        depression,
        stress,
        sleep,
        social,
        overall: overall_score(anxiety, depression, stress, sleep, social),
    }
}

/// Qualitative band of a wellbeing score.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Moderate,
    NeedsAttention,
}

impl ScoreBand {
    pub fn for_score(score: i32) -> Self {
        match score {
            s if s >= 8 => ScoreBand::Excellent,
            s if s >= 6 => ScoreBand::Good,
            s if s >= 4 => ScoreBand::Moderate,
            _ => ScoreBand::NeedsAttention,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Moderate => "Moderate",
            ScoreBand::NeedsAttention => "Needs Attention",
        }
    }
}

/// A suggested practice derived from an assessment.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: &'static str,
    pub description: &'static str,
}

const MAX_RECOMMENDATIONS: usize = 3;

/// Suggestions for the weakest areas of an assessment, at most three.
pub fn recommendations(scores: &AssessmentScores) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if scores.anxiety > 6 {
        out.push(Recommendation {
            title: "Anxiety Management",
            description: "Practice daily mindfulness meditation to reduce anxiety symptoms",
        });
    }
    if scores.depression > 6 {
        out.push(Recommendation {
            title: "Mood Enhancement",
            description: "Engage in regular physical activity to boost mood and energy levels",
        });
    }
    if scores.sleep < 5 {
        out.push(Recommendation {
            title: "Sleep Improvement",
            description: "Establish a consistent sleep schedule and bedtime routine",
        });
    }
    if scores.social < 5 {
        out.push(Recommendation {
            title: "Social Connection",
            description: "Schedule regular social activities with friends or family",
        });
    }
    if out.is_empty() {
        out.push(Recommendation {
            title: "Maintain Wellbeing",
            description:
                "Continue your current practices and consider adding new wellness activities",
        });
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}
