//! The authoritative result of one turn.

use castle_core::{EventId, FlagId, Footing, RoomId};
use serde::Serialize;

/// What the rule engine decided happened this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Room the turn took place in.
    pub room: RoomId,
    /// Hp change actually applied, after clamping.
    pub hp_delta: i32,
    /// Authoritative noise level, 0 to 3.
    pub noise: u8,
    /// Events that survived reconciliation, plus any the rules added.
    pub events: Vec<EventId>,
    /// Flags raised this turn.
    pub new_flags: Vec<FlagId>,
    /// Room entered at the end of the turn.
    pub room_transition: Option<RoomId>,
    /// Footing changed within the room.
    pub footing_change: Option<Footing>,
    /// The player escaped the castle.
    pub game_won: bool,
    /// The player died.
    pub dead: bool,
    /// Human-readable reason for an hp change.
    pub cause: Option<String>,
    /// In-fiction refusals to show the player.
    pub denials: Vec<String>,
    /// Diagnostics about dropped or corrected proposal elements. Never shown
    /// to the player.
    pub notes: Vec<String>,
    /// Whether the room is lit at the end of the turn.
    pub light_present: bool,
    /// The action was a pure look/inspect query.
    pub look_only: bool,
}

impl Outcome {
    pub(crate) fn new(room: RoomId) -> Self {
        Self {
            room,
            hp_delta: 0,
            noise: 0,
            events: Vec::new(),
            new_flags: Vec::new(),
            room_transition: None,
            footing_change: None,
            game_won: false,
            dead: false,
            cause: None,
            denials: Vec::new(),
            notes: Vec::new(),
            light_present: false,
            look_only: false,
        }
    }

    /// Nothing observable changed: no event, flag, hp change, or transition.
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
            && self.new_flags.is_empty()
            && self.hp_delta == 0
            && self.room_transition.is_none()
            && !self.game_won
    }

    /// Whether `event` happened this turn.
    pub fn has_event(&self, event: EventId) -> bool {
        self.events.contains(&event)
    }
}
