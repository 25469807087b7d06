//! Journal storage and export.

use serde::{Deserialize, Serialize};

use super::entry::JournalEntry;

/// A chronological log of session events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the journal.
    pub fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// Get all entries.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of turns played.
    pub fn turns(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, JournalEntry::Turn { .. }))
            .count()
    }

    /// Export the journal as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Escape the Castle Journal\n\n");
        for entry in &self.entries {
            match entry {
                JournalEntry::SessionStart {
                    session_id,
                    narrator,
                    timestamp,
                } => {
                    out.push_str(&format!(
                        "*Session {session_id}* started {} with narrator `{narrator}`\n\n",
                        timestamp.format("%Y-%m-%d %H:%M")
                    ));
                }
                JournalEntry::Turn {
                    action,
                    narration,
                    hp,
                    hp_delta,
                    noise,
                    ..
                } => {
                    out.push_str(&format!("> {action}\n\n"));
                    out.push_str(&format!("{narration}\n\n"));
                    if *hp_delta != 0 {
                        out.push_str(&format!("**HP** {hp} ({hp_delta}), noise {noise}\n\n"));
                    }
                }
                JournalEntry::RoomEntered { room, .. } => {
                    out.push_str(&format!("## {room}\n\n"));
                }
                JournalEntry::NarratorFailure { action, error, .. } => {
                    out.push_str(&format!("> {action}\n\n*Narrator failed*: {error}\n\n"));
                }
                JournalEntry::GameOver { ending, .. } => {
                    out.push_str(&format!("**Game over**: {ending}\n\n"));
                }
            }
        }
        out
    }

    /// Export the journal as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Escape the Castle Journal\n=========================\n\n");
        for entry in &self.entries {
            match entry {
                JournalEntry::SessionStart {
                    session_id,
                    narrator,
                    ..
                } => {
                    out.push_str(&format!("Session {session_id} (narrator: {narrator})\n\n"));
                }
                JournalEntry::Turn {
                    action,
                    narration,
                    hp,
                    hp_delta,
                    ..
                } => {
                    out.push_str(&format!("> {action}\n{narration}\n"));
                    if *hp_delta != 0 {
                        out.push_str(&format!("HP {hp} ({hp_delta})\n"));
                    }
                    out.push('\n');
                }
                JournalEntry::RoomEntered { room, .. } => {
                    out.push_str(&format!("--- {room} ---\n\n"));
                }
                JournalEntry::NarratorFailure { action, error, .. } => {
                    out.push_str(&format!("> {action}\nNarrator failed: {error}\n\n"));
                }
                JournalEntry::GameOver { ending, .. } => {
                    out.push_str(&format!("Game over: {ending}\n\n"));
                }
            }
        }
        out
    }
}
