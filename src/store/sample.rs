//! Generated sample data for users with nothing stored yet.

use chrono::{DateTime, Days, Utc};
use rand::Rng;

use crate::models::{AssessmentResult, JournalEntry, MoodLog};

const JOURNAL_TOPICS: [&str; 5] = [
    "Morning Reflection",
    "Stress Management",
    "Gratitude",
    "Achievement",
    "Challenge",
];

const JOURNAL_TAGS: [&str; 7] = [
    "work",
    "family",
    "health",
    "relationship",
    "personal-growth",
    "anxiety",
    "gratitude",
];

fn days_before(now: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    now.checked_sub_days(Days::new(days)).unwrap_or(now)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Five assessments, one per week, newest first.
pub fn assessments(now: DateTime<Utc>) -> Vec<AssessmentResult> {
    let mut rng = rand::rng();
    (0..5)
        .map(|week| AssessmentResult {
            id: new_id(),
            date: days_before(now, week * 7),
            anxiety: rng.random_range(1..=10),
            depression: rng.random_range(1..=10),
            stress: rng.random_range(1..=10),
            sleep: rng.random_range(1..=10),
            social: rng.random_range(1..=10),
            overall: rng.random_range(1..=10),
        })
        .collect()
}

/// Ten daily journal entries with one to three tags each, newest first.
pub fn journal_entries(now: DateTime<Utc>) -> Vec<JournalEntry> {
    let mut rng = rand::rng();
    (0..10u64)
        .map(|day| {
            let date = days_before(now, day);
            let mood = rng.random_range(1..=10);
            let tag_count = rng.random_range(1..=3);
            let tags = (0..tag_count)
                .map(|_| JOURNAL_TAGS[rng.random_range(0..JOURNAL_TAGS.len())].to_string())
                .collect();

            JournalEntry {
                id: new_id(),
                date,
                title: format!(
                    "{} - Day {}",
                    JOURNAL_TOPICS[day as usize % JOURNAL_TOPICS.len()],
                    day + 1
                ),
                content: format!(
                    "This is a sample journal entry for {}. Today my mood was {}/10.",
                    date.format("%a %b %d %Y"),
                    mood
                ),
                mood,
                tags,
            }
        })
        .collect()
}

/// Thirty daily mood logs, newest first.
pub fn mood_logs(now: DateTime<Utc>) -> Vec<MoodLog> {
    let mut rng = rand::rng();
    (0..30u64)
        .map(|day| MoodLog {
            id: new_id(),
            date: days_before(now, day),
            value: rng.random_range(1..=10),
            note: if day % 5 == 0 {
                "Feeling good today".to_string()
            } else {
                String::new()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_sizes_and_ranges() {
        let now = Utc::now();
        let assessments = assessments(now);
        let journal = journal_entries(now);
        let moods = mood_logs(now);

        assert_eq!(assessments.len(), 5);
        assert_eq!(journal.len(), 10);
        assert_eq!(moods.len(), 30);

        assert!(assessments.iter().all(|a| (1..=10).contains(&a.overall)));
        assert!(journal.iter().all(|e| (1..=3).contains(&e.tags.len())));
        assert!(moods.iter().all(|m| (1..=10).contains(&m.value)));
        assert_eq!(moods[0].note, "Feeling good today");
        assert_eq!(moods[1].note, "");
    }

    #[test]
    fn sample_records_are_newest_first_with_unique_ids() {
        let now = Utc::now();
        let moods = mood_logs(now);
        assert!(moods.windows(2).all(|w| w[0].date > w[1].date));

        let ids: HashSet<_> = moods.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids.len(), moods.len());

        let journal = journal_entries(now);
        assert_eq!(journal[0].title, "Morning Reflection - Day 1");
        assert_eq!(journal[5].title, "Morning Reflection - Day 6");
    }
}
