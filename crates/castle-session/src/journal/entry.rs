//! Journal entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the session journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JournalEntry {
    /// A playthrough began.
    SessionStart {
        /// Session identifier.
        session_id: String,
        /// Narrator backend in use.
        narrator: String,
        /// When the session started.
        timestamp: DateTime<Utc>,
    },
    /// One reconciled turn.
    Turn {
        /// What the player typed.
        action: String,
        /// Final narration shown to the player.
        narration: String,
        /// Room title at the start of the turn.
        room: String,
        /// Hp after the turn.
        hp: i32,
        /// Hp change applied this turn.
        hp_delta: i32,
        /// Authoritative noise level.
        noise: u8,
        /// Events that happened, by wire name.
        events: Vec<String>,
        /// When the turn was played.
        timestamp: DateTime<Utc>,
    },
    /// The player entered a room.
    RoomEntered {
        /// Room title.
        room: String,
        /// When the room was entered.
        timestamp: DateTime<Utc>,
    },
    /// The narrator failed and the turn was abandoned.
    NarratorFailure {
        /// The action that could not be narrated.
        action: String,
        /// Error description.
        error: String,
        /// When the failure happened.
        timestamp: DateTime<Utc>,
    },
    /// The playthrough ended.
    GameOver {
        /// How it ended ("escaped", "died", "gave up").
        ending: String,
        /// When it ended.
        timestamp: DateTime<Utc>,
    },
}
