//! Survey and assessment API endpoints.

use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{AssessmentResult, SubmitAssessmentRequest};
use crate::scoring::{self, Recommendation, ScoreBand};
use crate::survey::{self, Answers, Response, Section, SCALE_MAX, SCALE_MIN};
use crate::trends::{self, HistoryPoint};

/// Number of assessments shown in the history chart.
const HISTORY_LEN: usize = 5;

/// Result of submitting a survey.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutcome {
    /// A crisis question was answered "yes"; nothing was stored.
    pub crisis_support_recommended: bool,
    pub assessment: Option<AssessmentResult>,
    pub band: Option<ScoreBand>,
    pub band_label: Option<&'static str>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct ScaleLabel {
    pub value: i32,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDefinition {
    pub sections: &'static [Section],
    pub scale_labels: Vec<ScaleLabel>,
}

/// GET /api/survey - Section and question definitions.
pub async fn get_survey() -> ApiResult<SurveyDefinition> {
    let scale_labels = (SCALE_MIN..=SCALE_MAX)
        .filter_map(|value| survey::scale_label(value).map(|label| ScaleLabel { value, label }))
        .collect();

    success(SurveyDefinition {
        sections: survey::SECTIONS,
        scale_labels,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnswerRequest {
    #[serde(default)]
    pub answers: Answers,
    pub question_id: String,
    pub response: Response,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyProgress {
    pub answers: Answers,
    pub section_complete: bool,
    pub crisis_support_recommended: bool,
}

/// POST /api/survey/answer - Record one raw response into an answer set.
///
/// Stateless: the caller keeps the answers between questions.
pub async fn record_survey_answer(
    Json(request): Json<RecordAnswerRequest>,
) -> ApiResult<SurveyProgress> {
    let (section, question) = survey::locate(&request.question_id).ok_or_else(|| {
        AppError::NotFound(format!("Question {} not found", request.question_id))
    })?;

    survey::check_response(question, request.response).map_err(AppError::Validation)?;

    let mut answers = request.answers;
    survey::record_answer(&mut answers, question, request.response);

    success(SurveyProgress {
        section_complete: survey::section_complete(section, &answers),
        crisis_support_recommended: survey::crisis_flagged(&answers),
        answers,
    })
}

/// POST /api/assessments - Score and store a completed survey.
pub async fn submit_assessment(
    Extension(session): Extension<Session>,
    Json(request): Json<SubmitAssessmentRequest>,
) -> ApiResult<AssessmentOutcome> {
    survey::validate_answers(&request.answers).map_err(AppError::Validation)?;

    if survey::crisis_flagged(&request.answers) {
        tracing::warn!(
            "Crisis support flagged for {}; assessment not stored",
            session.user.id
        );
        return success(AssessmentOutcome {
            crisis_support_recommended: true,
            assessment: None,
            band: None,
            band_label: None,
            recommendations: Vec::new(),
        });
    }

    let scores = scoring::score(&request.answers);
    let assessment = session.store.lock().await.add_assessment(scores).await;

    let band = ScoreBand::for_score(assessment.overall);
    success(AssessmentOutcome {
        crisis_support_recommended: false,
        band: Some(band),
        band_label: Some(band.label()),
        recommendations: scoring::recommendations(&scores),
        assessment: Some(assessment),
    })
}

/// GET /api/assessments - All assessments, newest first.
pub async fn list_assessments(
    Extension(session): Extension<Session>,
) -> ApiResult<Vec<AssessmentResult>> {
    success(session.store.lock().await.assessments().to_vec())
}

/// GET /api/assessments/latest - Most recent assessment, or null.
pub async fn latest_assessment(
    Extension(session): Extension<Session>,
) -> ApiResult<Option<AssessmentResult>> {
    success(session.store.lock().await.latest_assessment().cloned())
}

/// GET /api/assessments/history - Overall scores of the latest assessments, oldest first.
pub async fn assessment_history(
    Extension(session): Extension<Session>,
) -> ApiResult<Vec<HistoryPoint>> {
    let store = session.store.lock().await;
    success(trends::assessment_history(store.assessments(), HISTORY_LEN))
}
