//! Derived views over a user's collections.
//!
//! Everything here is a pure function of its inputs; the caller supplies the
//! clock so results are reproducible.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AssessmentResult, JournalEntry, JournalOrder, JournalQuery, MoodLog};

/// Mood logs dated within `[now - days, now]`, oldest first.
///
/// Logs sharing a timestamp keep their relative collection order.
pub fn mood_trend(logs: &[MoodLog], days: i64, now: DateTime<Utc>) -> Vec<MoodLog> {
    let start = TimeDelta::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut window: Vec<MoodLog> = logs
        .iter()
        .filter(|log| log.date >= start && log.date <= now)
        .cloned()
        .collect();
    window.sort_by_key(|log| log.date);
    window
}

/// Consecutive calendar days, ending today, with at least one mood log.
///
/// Several logs on the same day count once. Days are UTC calendar days.
pub fn streak(logs: &[MoodLog], today: NaiveDate) -> u32 {
    let logged: HashSet<NaiveDate> = logs.iter().map(|log| log.date.date_naive()).collect();

    let mut count = 0;
    let mut day = today;
    while logged.contains(&day) {
        count += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(previous) => day = previous,
            None => break,
        }
    }
    count
}

/// Dashboard time range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendRange {
    Week,
    #[default]
    Month,
    Year,
}

impl TrendRange {
    pub fn days(self) -> i64 {
        match self {
            TrendRange::Week => 7,
            TrendRange::Month => 30,
            TrendRange::Year => 365,
        }
    }
}

/// One axis of the wellbeing radar chart; higher is always better.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RadarPoint {
    pub label: &'static str,
    pub value: i32,
}

pub fn radar_profile(assessment: &AssessmentResult) -> Vec<RadarPoint> {
    vec![
        RadarPoint {
            label: "Anxiety",
            value: 10 - assessment.anxiety,
        },
        RadarPoint {
            label: "Depression",
            value: 10 - assessment.depression,
        },
        RadarPoint {
            label: "Stress",
            value: 10 - assessment.stress,
        },
        RadarPoint {
            label: "Sleep",
            value: assessment.sleep,
        },
        RadarPoint {
            label: "Social",
            value: assessment.social,
        },
    ]
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryPoint {
    pub date: DateTime<Utc>,
    pub overall: i32,
}

/// The `limit` most recent assessments' overall scores, oldest first.
///
/// "Most recent" follows collection order, which is newest-first.
pub fn assessment_history(assessments: &[AssessmentResult], limit: usize) -> Vec<HistoryPoint> {
    assessments
        .iter()
        .take(limit)
        .rev()
        .map(|a| HistoryPoint {
            date: a.date,
            overall: a.overall,
        })
        .collect()
}

/// Journal entries matching every filter in the query, in the requested order.
pub fn filter_journal(entries: &[JournalEntry], query: &JournalQuery) -> Vec<JournalEntry> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let tags = query.tag_list();

    let mut matched: Vec<JournalEntry> = entries
        .iter()
        .filter(|entry| match &needle {
            Some(n) => {
                entry.title.to_lowercase().contains(n.as_str())
                    || entry.content.to_lowercase().contains(n.as_str())
            }
            None => true,
        })
        .filter(|entry| tags.iter().all(|t| entry.tags.contains(t)))
        .filter(|entry| query.mood.map_or(true, |m| entry.mood == m))
        .cloned()
        .collect();

    match query.order {
        JournalOrder::Newest => matched.sort_by(|a, b| b.date.cmp(&a.date)),
        JournalOrder::Oldest => matched.sort_by(|a, b| a.date.cmp(&b.date)),
    }
    matched
}

/// Every tag used across the journal, sorted.
pub fn unique_tags(entries: &[JournalEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|e| e.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Mood value for an emotion reported by the detection service.
pub fn mood_for_emotion(emotion: &str) -> i32 {
    match emotion.trim().to_lowercase().as_str() {
        "joy" => 10,
        "happy" => 9,
        "excited" => 8,
        "surprise" => 7,
        "fear" => 3,
        "sad" | "disgust" | "contempt" => 2,
        "angry" => 1,
        _ => 5,
    }
}

pub fn emotion_note(emotion: &str, confidence: f64) -> String {
    format!(
        "Detected emotion: {} (confidence: {}%)",
        emotion,
        (confidence * 100.0).round() as i64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn log(id: &str, date: DateTime<Utc>, value: i32) -> MoodLog {
        MoodLog {
            id: id.to_string(),
            date,
            value,
            note: String::new(),
        }
    }

    fn entry(id: &str, date: DateTime<Utc>, title: &str, mood: i32, tags: &[&str]) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            date,
            title: title.to_string(),
            content: format!("Notes about {}", title.to_lowercase()),
            mood,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn trend_filters_window_and_sorts_ascending() {
        let now = at(2024, 3, 10, 12);
        let logs = vec![
            log("today", at(2024, 3, 10, 9), 7),
            log("old", at(2024, 2, 1, 9), 3),
            log("future", at(2024, 3, 11, 9), 5),
            log("three-days", at(2024, 3, 7, 9), 6),
        ];

        let trend = mood_trend(&logs, 7, now);
        let ids: Vec<_> = trend.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["three-days", "today"]);
    }

    #[test]
    fn trend_is_idempotent_and_stable() {
        let now = at(2024, 3, 10, 12);
        let same = at(2024, 3, 9, 8);
        let logs = vec![log("b", same, 4), log("a", same, 5), log("c", at(2024, 3, 8, 8), 6)];

        let first = mood_trend(&logs, 30, now);
        let second = mood_trend(&logs, 30, now);
        assert_eq!(first, second);
        let ids: Vec<_> = first.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn trend_with_extreme_window_does_not_panic() {
        let now = at(2024, 3, 10, 12);
        let logs = vec![log("a", at(1990, 1, 1, 0), 4)];
        assert_eq!(mood_trend(&logs, i64::MAX, now).len(), 1);
        assert!(mood_trend(&logs, -5, now).is_empty());
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let logs = vec![
            log("a", at(2024, 3, 10, 8), 5),
            log("b", at(2024, 3, 9, 8), 5),
            log("c", at(2024, 3, 8, 8), 5),
        ];
        assert_eq!(streak(&logs, today), 3);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let logs = vec![log("a", at(2024, 3, 10, 8), 5), log("b", at(2024, 3, 7, 8), 5)];
        assert_eq!(streak(&logs, today), 1);
    }

    #[test]
    fn streak_requires_today_and_ignores_duplicates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(streak(&[], today), 0);

        let yesterday_only = vec![log("a", at(2024, 3, 9, 8), 5)];
        assert_eq!(streak(&yesterday_only, today), 0);

        let doubled = vec![
            log("a", at(2024, 3, 10, 8), 5),
            log("b", at(2024, 3, 10, 20), 5),
            log("c", at(2024, 3, 9, 8), 5),
        ];
        assert_eq!(streak(&doubled, today), 2);
    }

    #[test]
    fn radar_inverts_lower_is_better_scales() {
        let assessment = AssessmentResult {
            id: "a".to_string(),
            date: at(2024, 3, 10, 8),
            anxiety: 3,
            depression: 2,
            stress: 7,
            sleep: 6,
            social: 9,
            overall: 7,
        };
        let values: Vec<_> = radar_profile(&assessment).iter().map(|p| p.value).collect();
        assert_eq!(values, vec![7, 8, 3, 6, 9]);
    }

    #[test]
    fn history_takes_latest_and_reverses() {
        let assessments: Vec<_> = (0..7)
            .map(|i| AssessmentResult {
                id: format!("a{}", i),
                date: at(2024, 3, 20 - i as u32, 8),
                anxiety: 5,
                depression: 5,
                stress: 5,
                sleep: 5,
                social: 5,
                overall: i,
            })
            .collect();
        let history = assessment_history(&assessments, 5);
        let overall: Vec<_> = history.iter().map(|h| h.overall).collect();
        assert_eq!(overall, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn journal_filters_combine() {
        let entries = vec![
            entry("1", at(2024, 3, 8, 8), "Gratitude", 8, &["family", "gratitude"]),
            entry("2", at(2024, 3, 9, 8), "Work stress", 3, &["work"]),
            entry("3", at(2024, 3, 10, 8), "Family dinner", 8, &["family"]),
        ];

        let query = JournalQuery {
            tags: Some("family".to_string()),
            ..Default::default()
        };
        let ids: Vec<_> = filter_journal(&entries, &query)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["3", "1"]);

        let query = JournalQuery {
            search: Some("DINNER".to_string()),
            mood: Some(8),
            order: JournalOrder::Oldest,
            ..Default::default()
        };
        let ids: Vec<_> = filter_journal(&entries, &query)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["3"]);

        let query = JournalQuery {
            tags: Some("family, gratitude".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_journal(&entries, &query).len(), 1);
    }

    #[test]
    fn tags_are_unique_and_sorted() {
        let entries = vec![
            entry("1", at(2024, 3, 8, 8), "A", 5, &["work", "health"]),
            entry("2", at(2024, 3, 9, 8), "B", 5, &["health", "family"]),
        ];
        assert_eq!(unique_tags(&entries), vec!["family", "health", "work"]);
    }

    #[test]
    fn emotions_map_to_mood_values() {
        assert_eq!(mood_for_emotion("Happy"), 9);
        assert_eq!(mood_for_emotion("joy"), 10);
        assert_eq!(mood_for_emotion("angry"), 1);
        assert_eq!(mood_for_emotion("bewildered"), 5);
        assert_eq!(
            emotion_note("happy", 0.876),
            "Detected emotion: happy (confidence: 88%)"
        );
    }
}
