//! Journal API endpoints.

use axum::{extract::Query, Extension, Json};
use serde::Serialize;

use super::{success, validate_mood, ApiResult};
use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{JournalEntry, JournalQuery, MoodLog, NewJournalEntry, NewMoodLog};
use crate::trends;

/// A new journal entry and the mood log recorded with it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedJournalEntry {
    pub entry: JournalEntry,
    pub mood_log: MoodLog,
}

/// GET /api/journal - Filtered and sorted journal entries.
pub async fn list_journal(
    Extension(session): Extension<Session>,
    Query(query): Query<JournalQuery>,
) -> ApiResult<Vec<JournalEntry>> {
    let store = session.store.lock().await;
    success(trends::filter_journal(store.journal_entries(), &query))
}

/// POST /api/journal - Create an entry; its mood is logged too.
pub async fn create_journal_entry(
    Extension(session): Extension<Session>,
    Json(request): Json<NewJournalEntry>,
) -> ApiResult<CreatedJournalEntry> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }
    validate_mood(request.mood, "Mood")?;

    let mut store = session.store.lock().await;
    let mood = NewMoodLog {
        value: request.mood,
        note: request.title.clone(),
    };
    let entry = store.add_journal_entry(request).await;
    let mood_log = store.add_mood_log(mood).await;

    success(CreatedJournalEntry { entry, mood_log })
}

/// GET /api/journal/tags - Every tag in use, sorted.
pub async fn journal_tags(Extension(session): Extension<Session>) -> ApiResult<Vec<String>> {
    let store = session.store.lock().await;
    success(trends::unique_tags(store.journal_entries()))
}
