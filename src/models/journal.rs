//! Journal entry model matching the frontend JournalEntry interface.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A journal entry. There is no edit path once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub mood: i32,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Request body for creating a journal entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJournalEntry {
    pub title: String,
    pub content: String,
    pub mood: i32,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Sort order for journal listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum JournalOrder {
    #[default]
    Newest,
    Oldest,
}

/// Query parameters for filtering journal entries.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JournalQuery {
    /// Case-insensitive substring matched against title and content
    #[serde(default)]
    pub search: Option<String>,
    /// Comma-separated tags; an entry must carry all of them
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub mood: Option<i32>,
    #[serde(default)]
    pub order: JournalOrder,
}

impl JournalQuery {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|t| {
                t.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
