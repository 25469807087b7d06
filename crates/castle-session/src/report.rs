//! Per-turn result handed to the presentation layer.

use castle_core::{EventId, RoomId, WorldState};
use castle_rules::Outcome;
use serde::Serialize;

/// Everything a front end needs to render one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    /// Final narration, including any room-entry text and ending lines.
    pub narration: String,
    /// Hp after the turn.
    pub hp: i32,
    /// Hp change applied this turn.
    pub hp_delta: i32,
    /// Authoritative noise level.
    pub noise: u8,
    /// Single-slot inventory projection ("lit torch").
    pub inventory: Vec<String>,
    /// Room the player is in after the turn.
    pub room_id: RoomId,
    /// Title of that room.
    pub room_title: String,
    /// Reason for the hp change, if any.
    pub cause: Option<String>,
    /// Events that happened.
    pub events: Vec<EventId>,
    /// The player escaped.
    pub game_won: bool,
    /// The player died.
    pub dead: bool,
}

impl TurnReport {
    pub(crate) fn new(narration: String, outcome: &Outcome, state: &WorldState) -> Self {
        Self {
            narration,
            hp: state.hp(),
            hp_delta: outcome.hp_delta,
            noise: outcome.noise,
            inventory: state.inventory(),
            room_id: state.room(),
            room_title: state.room().title().to_string(),
            cause: outcome.cause.clone(),
            events: outcome.events.clone(),
            game_won: outcome.game_won,
            dead: outcome.dead,
        }
    }

    /// Whether the playthrough ended this turn.
    pub fn is_over(&self) -> bool {
        self.game_won || self.dead
    }

    /// Bracketed status lines: hp (with change and cause), noise, inventory.
    pub fn status_lines(&self) -> String {
        let hp = match (self.hp_delta, &self.cause) {
            (0, _) => format!("[HP {}]", self.hp),
            (delta, Some(cause)) if !cause.is_empty() => {
                format!("[HP {} ({delta}), {cause}]", self.hp)
            }
            (delta, _) => format!("[HP {} ({delta})]", self.hp),
        };
        let inventory = if self.inventory.is_empty() {
            "empty".to_string()
        } else {
            self.inventory.join(", ")
        };
        format!(
            "{hp}\n[Noise this turn: {}]\n[Inventory: {inventory}]",
            self.noise
        )
    }
}
