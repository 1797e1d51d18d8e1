//! Player-facing diary.
//!
//! Refused actions (not enough coin, a job that will not take the player
//! back) are narrated here so the player learns why nothing happened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaryKind {
    /// Quest started or finished.
    Quest,
    /// Hiring, shifts, dismissal.
    Job,
    /// Buying, selling, crafting, paying.
    Trade,
    /// Free-form narration written by content.
    Narrative,
    /// An action that could not be carried out.
    Refusal,
}

/// A single diary line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Category.
    pub kind: DiaryKind,
    /// Narration.
    pub text: String,
    /// Absolute in-game day the entry was written.
    pub day: i64,
    /// Wall-clock time the entry was written.
    pub recorded_at: DateTime<Utc>,
}

/// Chronological diary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diary {
    entries: Vec<DiaryEntry>,
}

impl Diary {
    /// Create an empty diary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn write(&mut self, kind: DiaryKind, text: impl Into<String>, day: i64) {
        self.entries.push(DiaryEntry {
            kind,
            text: text.into(),
            day,
            recorded_at: Utc::now(),
        });
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&DiaryEntry> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the diary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export the diary as markdown, one section per in-game day.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Diary\n\n");
        let mut current_day = None;
        for entry in &self.entries {
            if current_day != Some(entry.day) {
                out.push_str(&format!("## Day {}\n\n", entry.day));
                current_day = Some(entry.day);
            }
            let marker = match entry.kind {
                DiaryKind::Refusal => "*",
                _ => "-",
            };
            out.push_str(&format!("{marker} {}\n", entry.text));
        }
        out
    }
}
