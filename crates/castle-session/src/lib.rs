//! Session driver for Escape the Castle.
//!
//! Wires a narrator backend to the rule engine: builds the prompt, asks the
//! narrator for a JSON turn proposal (retrying once on bad output), lets the
//! engine decide what actually happens, and keeps a journal of the playthrough.

pub mod config;
pub mod error;
pub mod journal;
pub mod narrator;
pub mod prompt;
pub mod report;
pub mod session;

pub use config::SessionConfig;
pub use error::{NarratorError, SessionError, SessionResult};
pub use narrator::{ChatMessage, Narrator, OfflineNarrator, OllamaNarrator, ScriptedNarrator};
pub use report::TurnReport;
pub use session::{Ending, GameSession};
