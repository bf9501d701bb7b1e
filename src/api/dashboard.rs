//! Dashboard API endpoint.

use axum::{extract::Query, Extension};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::Session;
use crate::models::{AssessmentResult, MoodLog};
use crate::scoring::{self, Recommendation, ScoreBand};
use crate::trends::{self, HistoryPoint, RadarPoint, TrendRange};

const HISTORY_LEN: usize = 5;

#[derive(Debug, Deserialize, Default)]
pub struct DashboardQuery {
    #[serde(default)]
    pub range: TrendRange,
}

/// Everything the dashboard page shows, computed in one pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub latest_assessment: Option<AssessmentResult>,
    pub overall_band: Option<ScoreBand>,
    pub overall_band_label: Option<&'static str>,
    pub radar: Vec<RadarPoint>,
    pub history: Vec<HistoryPoint>,
    pub range: TrendRange,
    pub mood_trend: Vec<MoodLog>,
    pub streak: u32,
    pub assessment_count: usize,
    pub journal_count: usize,
    pub recommendations: Vec<Recommendation>,
}

/// GET /api/dashboard?range=week|month|year
pub async fn dashboard(
    Extension(session): Extension<Session>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Dashboard> {
    let store = session.store.lock().await;
    let latest = store.latest_assessment().cloned();
    let band = latest.as_ref().map(|a| ScoreBand::for_score(a.overall));

    success(Dashboard {
        overall_band: band,
        overall_band_label: band.map(ScoreBand::label),
        radar: latest.as_ref().map(trends::radar_profile).unwrap_or_default(),
        recommendations: latest
            .as_ref()
            .map(|a| scoring::recommendations(&a.scores()))
            .unwrap_or_default(),
        history: trends::assessment_history(store.assessments(), HISTORY_LEN),
        range: query.range,
        mood_trend: store.mood_trend(query.range.days()),
        streak: store.streak(Utc::now().date_naive()),
        assessment_count: store.assessments().len(),
        journal_count: store.journal_entries().len(),
        latest_assessment: latest,
    })
}
