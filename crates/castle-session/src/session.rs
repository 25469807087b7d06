//! Game session management.
//!
//! `GameSession` owns one playthrough: the world state, the narrator backend,
//! the narrator's call history, and the journal. Each turn asks the narrator
//! for a proposal, reconciles it with the rule engine, and rewrites the
//! narration to match what actually happened.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use castle_core::scene::{self, WELCOME_TEXT};
use castle_core::{FlagId, MAX_HP, RoomId, WorldState};
use castle_rules::{RuleEngine, TurnProposal, arbitrate, normalize, parse_generated_json};

use crate::config::SessionConfig;
use crate::error::{NarratorError, SessionError, SessionResult};
use crate::journal::{Journal, JournalEntry};
use crate::narrator::{ChatMessage, Narrator, OfflineNarrator};
use crate::prompt::{self, STRICT_RETRY, SYSTEM_PROMPT};
use crate::report::TurnReport;

/// Added when the player dies and the narration did not say so.
pub const DEATH_LINE: &str =
    "Your knees buckle as the world narrows to a single, fading point of light.";
/// Added when the player escapes.
pub const VICTORY_LINE: &str = "You duck beneath the raised portcullis and run into the fog. \
Behind you the castle fades into the night. You are free.";
/// Shown when the player gives up.
pub const QUIT_LINE: &str = "You give up. The castle remains your world.";
/// Shown after any ending but escape.
pub const GAME_OVER: &str = "*** GAME OVER ***";
/// Shown after escaping.
pub const ESCAPED: &str = "*** YOU ESCAPED ***";
/// Shown instead of narration when the narrator fails twice.
pub const NARRATOR_FAILURE: &str = "The torch sputters; your thoughts blur. (LLM error). Try again.";

static DEATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:die|dies|dead|death|lifeless|darkness takes you|your last breath)\b")
        .expect("valid death regex")
});

/// Commands handled without asking the narrator. Only `export` takes an
/// argument; the rest must be the whole input, so "I search the bed" is an
/// action and not `i`.
const LOCAL_COMMANDS: &[&str] = &[
    "inventory", "inv", "i", "status", "help", "?", "journal", "export", "quit", "exit", "q",
];
const COMMANDS_WITH_ARGUMENT: &[&str] = &["export"];

/// Split `input` into a lowercased local command and its argument.
fn local_command(input: &str) -> Option<(String, &str)> {
    let trimmed = input.trim();
    let (cmd, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(cmd, rest)| (cmd, rest.trim()));
    let cmd = cmd.to_lowercase();
    let known = LOCAL_COMMANDS.contains(&cmd.as_str());
    let fits = rest.is_empty() || COMMANDS_WITH_ARGUMENT.contains(&cmd.as_str());
    (known && fits).then_some((cmd, rest))
}

/// How a playthrough ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The player escaped through the gate.
    Escaped,
    /// Hp reached zero.
    Died,
    /// The player quit.
    GaveUp,
}

impl Ending {
    fn as_str(self) -> &'static str {
        match self {
            Self::Escaped => "escaped",
            Self::Died => "died",
            Self::GaveUp => "gave up",
        }
    }
}

/// An interactive Escape the Castle session.
pub struct GameSession {
    id: Uuid,
    state: WorldState,
    engine: RuleEngine,
    narrator: Box<dyn Narrator>,
    history: Vec<ChatMessage>,
    journal: Journal,
    config: SessionConfig,
    ending: Option<Ending>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("narrator", &self.narrator.name())
            .field("room", &self.state.room())
            .field("hp", &self.state.hp())
            .field("ending", &self.ending)
            .finish()
    }
}

impl GameSession {
    /// Create a session with the given narrator backend.
    pub fn new(narrator: impl Narrator + 'static, config: SessionConfig) -> Self {
        let id = Uuid::new_v4();
        let mut journal = Journal::new();
        journal.append(JournalEntry::SessionStart {
            session_id: id.to_string(),
            narrator: narrator.name().to_string(),
            timestamp: Utc::now(),
        });
        tracing::info!(session = %id, narrator = narrator.name(), "session started");
        Self {
            id,
            state: WorldState::new(),
            engine: RuleEngine::new(),
            narrator: Box::new(narrator),
            history: Vec::new(),
            journal,
            config,
            ending: None,
        }
    }

    /// Create a session that plays on the player's words alone.
    pub fn offline() -> Self {
        Self::new(OfflineNarrator, SessionConfig::default())
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The authoritative world state.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Get the journal.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Messages kept for replay to the narrator.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// How the playthrough ended, if it has.
    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    /// Whether the playthrough has ended.
    pub fn is_over(&self) -> bool {
        self.ending.is_some()
    }

    /// Whether `input` is a local command rather than an in-game action.
    pub fn is_local_command(input: &str) -> bool {
        local_command(input).is_some()
    }

    /// Opening narration: welcome text, room banner, and the cell's intro.
    pub fn welcome(&mut self) -> String {
        let banner = self.enter_room(self.state.room());
        [WELCOME_TEXT, banner.as_str(), "What do you do?"].join("\n\n")
    }

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> SessionResult<String> {
        let trimmed = input.trim();
        let (cmd, rest) = local_command(trimmed).unwrap_or_default();

        match cmd.as_str() {
            "inventory" | "inv" | "i" => Ok(self.do_inventory()),
            "status" => Ok(self.do_status()),
            "help" | "?" => Ok(do_help()),
            "journal" => Ok(self.do_journal_show()),
            "export" => self.do_journal_export(rest),
            "quit" | "exit" | "q" => Ok(self.do_quit()),
            _ => {
                let report = self.take_turn(trimmed)?;
                let mut out = format!("{}\n\n{}", report.narration, report.status_lines());
                match self.ending {
                    Some(Ending::Escaped) => out.push_str(&format!("\n\n{ESCAPED}")),
                    Some(_) => out.push_str(&format!("\n\n{GAME_OVER}")),
                    None => {}
                }
                Ok(out)
            }
        }
    }

    /// Play one in-game action.
    ///
    /// On a narrator failure the world state is left untouched and the same
    /// action may be tried again.
    pub fn take_turn(&mut self, action: &str) -> SessionResult<TurnReport> {
        let action = action.trim();
        if action.is_empty() {
            return Err(SessionError::EmptyAction);
        }
        if self.is_over() {
            return Err(SessionError::SessionOver);
        }

        let room = self.state.room();
        let span = tracing::info_span!("turn", session = %self.id, room = %room);
        let _enter = span.enter();

        let proposal = match self.ask(&prompt::user_prompt(&self.state, action)) {
            Ok(proposal) => proposal,
            Err(e) => {
                tracing::warn!(error = %e, "narrator failed twice, turn abandoned");
                self.journal.append(JournalEntry::NarratorFailure {
                    action: action.to_string(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                return Err(e.into());
            }
        };

        let intents = normalize(room, action);
        let outcome = self
            .engine
            .apply(&mut self.state, &proposal, &intents, action);
        tracing::info!(
            events = ?outcome.events,
            hp_delta = outcome.hp_delta,
            noise = outcome.noise,
            "turn resolved"
        );

        let mut parts = vec![arbitrate(&proposal.narration, &outcome)];
        if let Some(next) = outcome.room_transition {
            tracing::info!(from = %room, to = %next, "room transition");
            parts.push(self.enter_room(next));
        }
        let ending = if outcome.dead {
            if !DEATH_RE.is_match(&parts.join(" ")) {
                parts.push(DEATH_LINE.to_string());
            }
            Some(Ending::Died)
        } else if outcome.game_won {
            parts.push(VICTORY_LINE.to_string());
            Some(Ending::Escaped)
        } else {
            None
        };
        let narration = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        self.journal.append(JournalEntry::Turn {
            action: action.to_string(),
            narration: narration.clone(),
            room: room.title().to_string(),
            hp: self.state.hp(),
            hp_delta: outcome.hp_delta,
            noise: outcome.noise,
            events: outcome.events.iter().map(|e| e.to_string()).collect(),
            timestamp: Utc::now(),
        });
        if let Some(ending) = ending {
            self.finish(ending);
        }

        Ok(TurnReport::new(narration, &outcome, &self.state))
    }

    /// Ask the narrator for a proposal, retrying once with a stricter prompt
    /// and no history. History grows only on success.
    fn ask(&mut self, user_prompt: &str) -> Result<TurnProposal, NarratorError> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
        let start = self.history.len().saturating_sub(self.config.history_messages);
        messages.extend(self.history[start..].iter().cloned());
        messages.push(ChatMessage::user(user_prompt));

        let first = self
            .narrator
            .complete(&messages)
            .and_then(|raw| parse_generated_json(&raw).ok_or(NarratorError::InvalidJson));
        let value = match first {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "narrator reply unusable, retrying once");
                let strict = [
                    ChatMessage::system(SYSTEM_PROMPT),
                    ChatMessage::user(format!("{user_prompt}{STRICT_RETRY}")),
                ];
                let raw = self.narrator.complete(&strict)?;
                parse_generated_json(&raw).ok_or(NarratorError::InvalidJson)?
            }
        };

        self.history.push(ChatMessage::user(user_prompt));
        self.history.push(ChatMessage::assistant(value.to_string()));
        let excess = self.history.len().saturating_sub(self.config.history_messages);
        self.history.drain(..excess);
        Ok(TurnProposal::coerce(&value))
    }

    /// Banner, one-shot intro, and lit hint for entering `room`.
    fn enter_room(&mut self, room: RoomId) -> String {
        let card = scene::card(room);
        let mut lines = vec![format!("-- You are in the {}. --", card.title)];
        let first_visit = self.state.mark_intro_shown(room);
        if let (true, Some(intro)) = (first_visit, card.intro) {
            lines.push(intro.to_string());
        }
        if let (Some(hint), true) = (card.lit_hint, self.state.light_present()) {
            lines.push(hint.to_string());
        }
        self.journal.append(JournalEntry::RoomEntered {
            room: card.title.to_string(),
            timestamp: Utc::now(),
        });
        lines.join("\n\n")
    }

    fn finish(&mut self, ending: Ending) {
        tracing::info!(session = %self.id, ending = ending.as_str(), "game over");
        self.ending = Some(ending);
        self.journal.append(JournalEntry::GameOver {
            ending: ending.as_str().to_string(),
            timestamp: Utc::now(),
        });
    }

    fn do_inventory(&self) -> String {
        let inventory = self.state.inventory();
        if inventory.is_empty() {
            "[Inventory: empty]".to_string()
        } else {
            format!("[Inventory: {}]", inventory.join(", "))
        }
    }

    fn do_status(&self) -> String {
        let room = self.state.room();
        let flags: Vec<&str> = self.state.flags().map(FlagId::as_str).collect();
        let mut out = format!("Room: {} ({})\n", room.title(), self.state.footing());
        out.push_str(&format!("HP: {}/{MAX_HP}\n", self.state.hp()));
        out.push_str(&format!("{}\n", self.do_inventory()));
        if flags.is_empty() {
            out.push_str("Progress: none\n");
        } else {
            out.push_str(&format!("Progress: {}\n", flags.join(", ")));
        }
        out.push_str(&format!("Turns: {}\n", self.journal.turns()));
        out.push_str(&format!("Narrator: {}", self.narrator.name()));
        out
    }

    fn do_journal_show(&self) -> String {
        if self.journal.turns() == 0 {
            return "Journal is empty.".to_string();
        }
        let entries = self.journal.entries();
        let start = entries.len().saturating_sub(10);
        let mut recent = Journal::new();
        for entry in &entries[start..] {
            recent.append(entry.clone());
        }
        recent.export_text().trim_end().to_string()
    }

    fn do_journal_export(&self, format: &str) -> SessionResult<String> {
        match format.to_lowercase().as_str() {
            "markdown" | "md" | "" => Ok(self.journal.export_markdown()),
            "text" | "txt" => Ok(self.journal.export_text()),
            other => Err(SessionError::UnknownFormat(other.to_string())),
        }
    }

    fn do_quit(&mut self) -> String {
        if self.ending.is_none() {
            self.finish(Ending::GaveUp);
        }
        format!("{QUIT_LINE}\n\n{GAME_OVER}")
    }
}

fn do_help() -> String {
    "\
Describe what you do in plain words, e.g. \"search the straw\" or \"climb the stairs\".

Commands:
  inventory, inv               Show what you are holding
  status                       Show room, hp, and progress
  journal                      Show recent turns
  export [markdown|text]       Export the full journal
  help                         Show this help
  quit                         Give up"
        .to_string()
}
