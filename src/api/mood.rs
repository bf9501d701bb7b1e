//! Mood API endpoints.

use axum::{extract::Query, Extension, Json};
use chrono::Utc;

use super::{success, validate_mood, ApiResult};
use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{DetectedEmotion, MoodLog, NewMoodLog, StreakInfo, TrendQuery};
use crate::trends;

/// POST /api/mood - Log a mood.
pub async fn log_mood(
    Extension(session): Extension<Session>,
    Json(request): Json<NewMoodLog>,
) -> ApiResult<MoodLog> {
    validate_mood(request.value, "Mood value")?;
    success(session.store.lock().await.add_mood_log(request).await)
}

/// POST /api/mood/emotion - Log the mood implied by a detected emotion.
pub async fn log_emotion(
    Extension(session): Extension<Session>,
    Json(request): Json<DetectedEmotion>,
) -> ApiResult<MoodLog> {
    if request.emotion.trim().is_empty() {
        return Err(AppError::Validation("Emotion is required".to_string()));
    }
    if !(0.0..=1.0).contains(&request.confidence) {
        return Err(AppError::Validation(
            "Confidence must be between 0 and 1".to_string(),
        ));
    }

    let log = NewMoodLog {
        value: trends::mood_for_emotion(&request.emotion),
        note: trends::emotion_note(&request.emotion, request.confidence),
    };
    success(session.store.lock().await.add_mood_log(log).await)
}

/// GET /api/mood - All mood logs, newest first.
pub async fn list_mood(Extension(session): Extension<Session>) -> ApiResult<Vec<MoodLog>> {
    success(session.store.lock().await.mood_logs().to_vec())
}

/// GET /api/mood/trend?days=N - Mood logs of the last N days, oldest first.
pub async fn mood_trend(
    Extension(session): Extension<Session>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Vec<MoodLog>> {
    if query.days < 0 {
        return Err(AppError::BadRequest("days must not be negative".to_string()));
    }
    success(session.store.lock().await.mood_trend(query.days))
}

/// GET /api/mood/streak - Consecutive days with a mood log, ending today.
pub async fn mood_streak(Extension(session): Extension<Session>) -> ApiResult<StreakInfo> {
    let streak = session.store.lock().await.streak(Utc::now().date_naive());
    success(StreakInfo { streak })
}
