//! Per-session user data store.
//!
//! Owns one user's assessments, journal entries and mood logs for the length
//! of a session. Records are only ever appended, newest first, and the whole
//! collection is written back to the repository after each append.

mod sample;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::{Collection, Repository};
use crate::models::{
    AssessmentResult, AssessmentScores, JournalEntry, MoodLog, NewJournalEntry, NewMoodLog,
};
use crate::trends;

pub struct UserDataStore {
    user_id: String,
    repo: Arc<Repository>,
    assessments: Vec<AssessmentResult>,
    journal_entries: Vec<JournalEntry>,
    mood_logs: Vec<MoodLog>,
}

impl UserDataStore {
    /// Load a user's collections, seeding any that were never stored.
    ///
    /// A collection that cannot be read starts empty for this session.
    pub async fn load(repo: Arc<Repository>, user_id: &str, seed_sample_data: bool) -> Self {
        let now = Utc::now();

        let assessments = load_or_seed(&repo, Collection::Assessments, user_id, || {
            seed_sample_data.then(|| sample::assessments(now))
        })
        .await;
        let journal_entries = load_or_seed(&repo, Collection::Journal, user_id, || {
            seed_sample_data.then(|| sample::journal_entries(now))
        })
        .await;
        let mood_logs = load_or_seed(&repo, Collection::Mood, user_id, || {
            seed_sample_data.then(|| sample::mood_logs(now))
        })
        .await;

        tracing::debug!(
            "Loaded data for {}: {} assessments, {} journal entries, {} mood logs",
            user_id,
            assessments.len(),
            journal_entries.len(),
            mood_logs.len()
        );

        Self {
            user_id: user_id.to_string(),
            repo,
            assessments,
            journal_entries,
            mood_logs,
        }
    }

    pub fn assessments(&self) -> &[AssessmentResult] {
        &self.assessments
    }

    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.journal_entries
    }

    pub fn mood_logs(&self) -> &[MoodLog] {
        &self.mood_logs
    }

    pub async fn add_assessment(&mut self, scores: AssessmentScores) -> AssessmentResult {
        let record = AssessmentResult::new(new_id(), Utc::now(), scores);
        self.assessments.insert(0, record.clone());
        persist(&self.repo, Collection::Assessments, &self.user_id, &self.assessments).await;
        record
    }

    pub async fn add_journal_entry(&mut self, entry: NewJournalEntry) -> JournalEntry {
        let record = JournalEntry {
            id: new_id(),
            date: Utc::now(),
            title: entry.title,
            content: entry.content,
            mood: entry.mood,
            tags: entry.tags,
        };
        self.journal_entries.insert(0, record.clone());
        persist(&self.repo, Collection::Journal, &self.user_id, &self.journal_entries).await;
        record
    }

    pub async fn add_mood_log(&mut self, log: NewMoodLog) -> MoodLog {
        let record = MoodLog {
            id: new_id(),
            date: Utc::now(),
            value: log.value,
            note: log.note,
        };
        self.mood_logs.insert(0, record.clone());
        persist(&self.repo, Collection::Mood, &self.user_id, &self.mood_logs).await;
        record
    }

    /// First assessment in collection order.
    ///
    /// Relies on newest-first insertion rather than comparing dates.
    pub fn latest_assessment(&self) -> Option<&AssessmentResult> {
        self.assessments.first()
    }

    /// Mood logs from the last `days` days, oldest first.
    pub fn mood_trend(&self, days: i64) -> Vec<MoodLog> {
        trends::mood_trend(&self.mood_logs, days, Utc::now())
    }

    pub fn streak(&self, today: NaiveDate) -> u32 {
        trends::streak(&self.mood_logs, today)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

async fn load_or_seed<T, F>(
    repo: &Repository,
    collection: Collection,
    user_id: &str,
    seed: F,
) -> Vec<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Option<Vec<T>>,
{
    match repo.load_collection(collection, user_id).await {
        Ok(Some(items)) => items,
        Ok(None) => match seed() {
            Some(items) => {
                persist(repo, collection, user_id, &items).await;
                items
            }
            None => Vec::new(),
        },
        Err(e) => {
            tracing::error!(
                "Failed to load {} for {}: {}",
                collection.prefix(),
                user_id,
                e
            );
            Vec::new()
        }
    }
}

/// Write a collection back. Failures are logged; memory stays authoritative.
async fn persist<T: Serialize>(
    repo: &Repository,
    collection: Collection,
    user_id: &str,
    items: &[T],
) {
    if let Err(e) = repo.save_collection(collection, user_id, items).await {
        tracing::error!(
            "Failed to persist {} for {}: {}",
            collection.prefix(),
            user_id,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Arc<Repository>, TempDir) {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("store.sqlite")).await.unwrap();
        (Arc::new(Repository::new(pool)), dir)
    }

    fn scores(overall: i32) -> AssessmentScores {
        AssessmentScores {
            anxiety: 4,
            depression: 4,
            stress: 4,
            sleep: 8,
            social: 8,
            overall,
        }
    }

    #[tokio::test]
    async fn latest_assessment_empty_then_added() {
        let (repo, _dir) = repo().await;
        let mut store = UserDataStore::load(repo, "user-1", false).await;

        assert!(store.latest_assessment().is_none());
        let added = store.add_assessment(scores(7)).await;
        assert_eq!(store.latest_assessment(), Some(&added));
    }

    #[tokio::test]
    async fn appends_are_newest_first_with_unique_ids() {
        let (repo, _dir) = repo().await;
        let mut store = UserDataStore::load(repo, "user-1", false).await;

        let first = store.add_assessment(scores(5)).await;
        let second = store.add_assessment(scores(6)).await;
        assert_ne!(first.id, second.id);
        assert_eq!(store.assessments()[0].id, second.id);
        assert_eq!(store.latest_assessment().map(|a| a.overall), Some(6));
    }

    #[tokio::test]
    async fn new_mood_log_is_the_whole_one_day_trend() {
        let (repo, _dir) = repo().await;
        let mut store = UserDataStore::load(repo, "user-1", false).await;

        let log = store
            .add_mood_log(NewMoodLog {
                value: 7,
                note: "Walked outside".to_string(),
            })
            .await;

        let trend = store.mood_trend(1);
        assert_eq!(trend, vec![log]);
        assert_eq!(store.mood_trend(1), trend);
        assert_eq!(store.streak(Utc::now().date_naive()), 1);
    }

    #[tokio::test]
    async fn collections_survive_reload() {
        let (repo, _dir) = repo().await;
        let mut store = UserDataStore::load(repo.clone(), "user-1", false).await;
        let entry = store
            .add_journal_entry(NewJournalEntry {
                title: "Gratitude".to_string(),
                content: "Thankful for friends".to_string(),
                mood: 8,
                tags: ["family".to_string()].into_iter().collect(),
            })
            .await;

        let reloaded = UserDataStore::load(repo.clone(), "user-1", true).await;
        assert_eq!(reloaded.journal_entries(), &[entry]);

        let other = UserDataStore::load(repo, "user-2", false).await;
        assert!(other.journal_entries().is_empty());
    }

    #[tokio::test]
    async fn seeding_fills_and_persists_missing_collections() {
        let (repo, _dir) = repo().await;
        let store = UserDataStore::load(repo.clone(), "user-1", true).await;
        assert_eq!(store.assessments().len(), 5);
        assert_eq!(store.journal_entries().len(), 10);
        assert_eq!(store.mood_logs().len(), 30);

        let reloaded = UserDataStore::load(repo, "user-1", true).await;
        assert_eq!(reloaded.mood_logs(), store.mood_logs());
    }

    #[tokio::test]
    async fn corrupt_collection_starts_empty() {
        let (repo, _dir) = repo().await;
        repo.put_value("mood-user-1", "not json").await.unwrap();

        let store = UserDataStore::load(repo, "user-1", true).await;
        assert!(store.mood_logs().is_empty());
        assert_eq!(store.assessments().len(), 5);
    }

    #[tokio::test]
    async fn write_failures_keep_memory_authoritative() {
        let (repo, _dir) = repo().await;
        let mut store = UserDataStore::load(repo.clone(), "user-1", false).await;
        repo.close().await;

        let log = store
            .add_mood_log(NewMoodLog {
                value: 3,
                note: String::new(),
            })
            .await;
        assert_eq!(store.mood_logs(), &[log]);
    }
}
