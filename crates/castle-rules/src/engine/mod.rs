//! The rule enforcement engine.
//!
//! [`RuleEngine::apply`] reconciles a narrator proposal with the events the
//! player's words imply and commits the result to the world state. The steps
//! run in a fixed order: noise, legality, contradictions, policies, flags,
//! inventory, lighting, movement, then hp and victory.
//!
//! The engine never fails. Anything it cannot accept is dropped with a note
//! (diagnostics) or a denial (in-fiction text for the player).

mod outcome;
mod policy;

use castle_core::scene;
use castle_core::{CoreError, EventId, FlagId, Footing, ItemId, RoomId, WorldState};

use crate::intent::{self, Intents};
use crate::proposal::{DEFAULT_PROGRESSION, TurnProposal};

pub use outcome::Outcome;

use policy::{POLICIES, PolicyRule};

const AMBIGUOUS_DENIAL: &str = "You hesitate between two courses of action and end up doing neither.";
const NOTHING_TO_LIGHT: &str = "You have nothing in hand that would take a flame.";
const ALREADY_LIT: &str = "Your torch is already burning.";
const NO_FLAME: &str = "There is no flame here to light it from.";
const CLIMB_DOWN_FIRST: &str = "You would have to climb down from the wall-walk first.";
const PORTCULLIS_DOWN: &str = "The portcullis is down; its iron bars block the gate.";

/// What the world looked like when the turn began.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Snapshot {
    pub(crate) held: Option<ItemId>,
    pub(crate) held_lit: bool,
    pub(crate) light_present: bool,
    pub(crate) footing: Footing,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    event: EventId,
    /// Inferred from the player's own words rather than the proposal.
    from_player: bool,
}

/// A turn being reconciled.
pub(crate) struct Turn<'a> {
    pub(crate) room: RoomId,
    pub(crate) start: Snapshot,
    pub(crate) noise: u8,
    pub(crate) hp_delta: i32,
    pub(crate) causes: Vec<String>,
    intents: &'a Intents,
    text: &'a str,
    candidates: Vec<Candidate>,
    pending_flags: Vec<FlagId>,
    outcome: Outcome,
}

impl<'a> Turn<'a> {
    fn begin(state: &WorldState, intents: &'a Intents, text: &'a str) -> Self {
        let held = state.items().held();
        let start = Snapshot {
            held,
            held_lit: held.is_some_and(|item| state.items().is_lit(item)),
            light_present: state.light_present(),
            footing: state.footing(),
        };
        Self {
            room: state.room(),
            start,
            noise: 0,
            hp_delta: 0,
            causes: Vec::new(),
            intents,
            text,
            candidates: Vec::new(),
            pending_flags: Vec::new(),
            outcome: Outcome::new(state.room()),
        }
    }

    pub(crate) fn has(&self, event: EventId) -> bool {
        self.candidates.iter().any(|c| c.event == event)
    }

    /// Whether `event` is backed by the player's own words.
    pub(crate) fn player_has(&self, event: EventId) -> bool {
        self.candidates
            .iter()
            .any(|c| c.event == event && c.from_player)
    }

    /// Remove `event`. Returns whether it was present.
    pub(crate) fn remove(&mut self, event: EventId) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|c| c.event != event);
        self.candidates.len() != before
    }

    pub(crate) fn add_engine_event(&mut self, event: EventId) {
        if !self.has(event) {
            self.candidates.push(Candidate {
                event,
                from_player: false,
            });
        }
    }

    pub(crate) fn note(&mut self, note: impl Into<String>) {
        self.outcome.notes.push(note.into());
    }

    pub(crate) fn deny(&mut self, denial: &str) {
        if !self.outcome.denials.iter().any(|d| d == denial) {
            self.outcome.denials.push(denial.to_string());
        }
    }

    fn settle_noise(&mut self, proposal: &TurnProposal) {
        let clamped = proposal.noise_level.clamp(0, 3) as u8;
        if i64::from(clamped) != proposal.noise_level {
            self.note(format!(
                "noise level {} clamped to {clamped}",
                proposal.noise_level
            ));
        }
        self.noise = clamped.max(self.intents.noise_floor);
        if self.noise > clamped {
            self.note(format!("noise raised to {} by the player's wording", self.noise));
        }
        if proposal.hp_delta != 0 {
            self.note(format!("proposed hp_delta {} ignored", proposal.hp_delta));
        }
        if !proposal.progression_hint.is_empty() && proposal.progression_hint != DEFAULT_PROGRESSION
        {
            self.note(format!(
                "progression hint '{}' ignored",
                proposal.progression_hint
            ));
        }
    }

    fn collect_events(&mut self, proposal: &TurnProposal) {
        let room = self.room;
        let intents = self.intents;
        for event in &intents.events {
            if scene::allows(room, *event) {
                self.candidates.push(Candidate {
                    event: *event,
                    from_player: true,
                });
            }
        }

        let requested = proposal
            .events
            .iter()
            .copied()
            .chain(proposal.flags_requested.iter().map(|f| f.source_event()));
        for event in requested {
            if self.has(event) {
                continue;
            }
            if intents.look_only {
                self.note(format!("dropped {event}: looking changes nothing"));
            } else if event.engine_only() {
                self.note(format!("dropped {event}: only the engine may raise it"));
            } else if !scene::allows(room, event) {
                self.note(format!("dropped {event}: not part of the {room} catalog"));
            } else if !intent::justified(event, self.text) {
                self.note(format!("dropped {event}: the action does not mention it"));
            } else {
                self.candidates.push(Candidate {
                    event,
                    from_player: false,
                });
            }
        }

        for name in &proposal.unrecognized {
            self.outcome.notes.push(format!("ignored unknown name '{name}'"));
        }
    }

    fn resolve_contradictions(&mut self) {
        let moves: Vec<Candidate> = self
            .candidates
            .iter()
            .copied()
            .filter(|c| c.event.is_movement())
            .collect();
        if moves.len() > 1 {
            let keep = self.winner(&moves);
            for c in &moves {
                if Some(c.event) != keep {
                    self.remove(c.event);
                    self.note(format!("dropped {}: conflicting movement", c.event));
                }
            }
            if keep.is_none() {
                self.deny(AMBIGUOUS_DENIAL);
            }
        }

        let mut pairs = vec![
            (EventId::LightTorch, EventId::ExtinguishTorch),
            (EventId::OpenHallDoor, EventId::ReturnToCell),
        ];
        pairs.extend(
            ItemId::ALL
                .into_iter()
                .map(|item| (EventId::Pickup(item), EventId::Drop(item))),
        );
        for (a, b) in pairs {
            let group: Vec<Candidate> = self
                .candidates
                .iter()
                .copied()
                .filter(|c| c.event == a || c.event == b)
                .collect();
            if group.len() < 2 {
                continue;
            }
            match self.winner(&group) {
                Some(keep) => {
                    let loser = if keep == a { b } else { a };
                    self.remove(loser);
                    self.note(format!("dropped {loser}: contradicts {keep}"));
                }
                None => {
                    self.remove(a);
                    self.remove(b);
                    self.note(format!("dropped {a} and {b}: contradictory"));
                    self.deny(AMBIGUOUS_DENIAL);
                }
            }
        }
    }

    /// The player-backed candidate with the best normalizer rank.
    fn winner(&self, group: &[Candidate]) -> Option<EventId> {
        group
            .iter()
            .filter(|c| c.from_player)
            .min_by_key(|c| self.intents.rank(c.event).unwrap_or(usize::MAX))
            .map(|c| c.event)
    }

    fn commit_flags(&mut self, state: &mut WorldState) {
        let candidates = std::mem::take(&mut self.candidates);
        for candidate in candidates {
            let Some(flag) = candidate.event.flag() else {
                self.candidates.push(candidate);
                continue;
            };
            if let Some(requires) = flag.prerequisite() {
                if !state.has_flag(requires) {
                    self.note(format!("dropped {}: {requires} not set", candidate.event));
                    self.deny(flag.denial());
                    continue;
                }
            }
            if candidate.event.exit_to().is_some() {
                self.pending_flags.push(flag);
            } else {
                match state.raise_flag(flag) {
                    Ok(true) => self.outcome.new_flags.push(flag),
                    Ok(false) => {}
                    Err(e) => {
                        self.note(format!("dropped {}: {e}", candidate.event));
                        continue;
                    }
                }
            }
            self.candidates.push(candidate);
        }
    }

    fn arbitrate_inventory(&mut self, state: &mut WorldState) {
        let room = self.room;
        let mut rejected = Vec::new();
        let drops: Vec<ItemId> = self
            .candidates
            .iter()
            .filter_map(|c| match c.event {
                EventId::Drop(item) => Some(item),
                _ => None,
            })
            .collect();
        let pickups: Vec<ItemId> = self
            .candidates
            .iter()
            .filter_map(|c| match c.event {
                EventId::Pickup(item) => Some(item),
                _ => None,
            })
            .collect();

        for item in drops {
            if let Err(e) = state.items_mut().put_down(item, room) {
                self.refuse_item(&e);
                rejected.push(EventId::Drop(item));
            }
        }
        for item in pickups {
            if let Err(e) = state.items_mut().take(item, room) {
                self.refuse_item(&e);
                rejected.push(EventId::Pickup(item));
            }
        }
        for event in rejected {
            self.remove(event);
        }
    }

    fn refuse_item(&mut self, error: &CoreError) {
        self.note(error.to_string());
        let denial = match error {
            CoreError::HandsFull { held, wanted } => format!(
                "Your hands are full: you are already holding the {held}. You cannot take the {wanted} as well."
            ),
            CoreError::ItemNotHere(item) => format!("There is no {item} here to pick up."),
            CoreError::AlreadyHolding(item) => format!("You are already holding the {item}."),
            CoreError::NotHolding(item) => format!("You are not holding the {item}."),
            _ => return,
        };
        self.deny(&denial);
    }

    fn apply_lighting(&mut self, state: &mut WorldState) {
        if self.has(EventId::LightTorch) {
            let holding_torch = state.items().held() == Some(ItemId::Torch);
            let refusal = if !holding_torch {
                Some(NOTHING_TO_LIGHT)
            } else if state.items().is_lit(ItemId::Torch) {
                Some(ALREADY_LIT)
            } else if !scene::card(self.room).flame_source {
                Some(NO_FLAME)
            } else {
                None
            };
            match refusal {
                Some(denial) => {
                    self.remove(EventId::LightTorch);
                    self.deny(denial);
                }
                None => {
                    if let Err(e) = state.items_mut().set_lit(ItemId::Torch, true) {
                        self.note(e.to_string());
                        self.remove(EventId::LightTorch);
                    }
                }
            }
        }

        if self.has(EventId::ExtinguishTorch) {
            let reachable = state.items().held() == Some(ItemId::Torch)
                || state.items().is_in(ItemId::Torch, self.room);
            if reachable && state.items().is_lit(ItemId::Torch) {
                if let Err(e) = state.items_mut().set_lit(ItemId::Torch, false) {
                    self.note(e.to_string());
                    self.remove(EventId::ExtinguishTorch);
                }
            } else {
                self.note("dropped extinguish_torch: no burning torch at hand");
                self.remove(EventId::ExtinguishTorch);
            }
        }
    }

    /// Gate the turn's movement. Returns the room to enter, if any.
    fn gate_movement(&mut self, state: &mut WorldState) -> Option<RoomId> {
        let event = self
            .candidates
            .iter()
            .map(|c| c.event)
            .find(|e| e.is_movement())?;
        if !self.intents.contains(event) {
            self.note(format!("dropped {event}: the player did not ask to move"));
            self.remove(event);
            return None;
        }

        if event.exit_to().is_some() {
            let Some(exit) = scene::exit_for(self.room, event) else {
                self.note(format!("dropped {event}: no such exit from {}", self.room));
                self.remove(event);
                return None;
            };
            if state.footing() != Footing::Ground {
                self.remove(event);
                self.deny(CLIMB_DOWN_FIRST);
                return None;
            }
            if exit.requires.iter().any(|flag| !state.has_flag(*flag)) {
                self.remove(event);
                self.deny(exit.denial);
                return None;
            }
            return Some(exit.to);
        }

        if let Some(footing) = event.footing_to() {
            if state.footing() == footing {
                self.note(format!("dropped {event}: already on the {footing}"));
                self.remove(event);
            } else {
                state.set_footing(footing);
                self.outcome.footing_change = Some(footing);
            }
        }
        None
    }

    fn finish(mut self, state: &mut WorldState, transition: Option<RoomId>) -> Outcome {
        let applied = state.apply_hp_delta(self.hp_delta);
        if applied != self.hp_delta {
            self.note(format!("hp change {} clamped to {applied}", self.hp_delta));
        }
        self.outcome.hp_delta = applied;
        self.outcome.dead = state.is_dead();

        if self.has(EventId::EscapeThroughGate) {
            if !state.has_flag(FlagId::PortcullisRaised) {
                self.remove(EventId::EscapeThroughGate);
                self.deny(PORTCULLIS_DOWN);
            } else if state.footing() != Footing::Ground {
                self.remove(EventId::EscapeThroughGate);
                self.deny(CLIMB_DOWN_FIRST);
            } else if !self.outcome.dead {
                self.outcome.game_won = true;
            }
        }

        if let Some(destination) = transition {
            if self.outcome.dead {
                self.note(format!("entering {destination} cancelled by death"));
                self.candidates.retain(|c| c.event.exit_to().is_none());
            } else {
                state.enter(destination);
                for flag in std::mem::take(&mut self.pending_flags) {
                    match state.raise_flag(flag) {
                        Ok(true) => self.outcome.new_flags.push(flag),
                        Ok(false) => {}
                        Err(e) => self.note(e.to_string()),
                    }
                }
                self.outcome.room_transition = Some(destination);
            }
        }

        if applied != 0 {
            self.outcome.cause = Some(self.causes.join("; "));
        }
        self.outcome.noise = self.noise;
        self.outcome.events = self.candidates.iter().map(|c| c.event).collect();
        self.outcome.light_present = state.light_present();
        self.outcome.look_only = self.intents.look_only;
        for note in &self.outcome.notes {
            tracing::debug!(room = %self.room, "{note}");
        }
        self.outcome
    }
}

/// Reconciles proposals with the world state.
#[derive(Clone, Copy)]
pub struct RuleEngine {
    policies: &'static [PolicyRule],
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("policies", &self.policies.len())
            .finish()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self { policies: POLICIES }
    }
}

impl RuleEngine {
    /// Create an engine with the castle's policy table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile one turn and commit it to `state`.
    ///
    /// `intents` must come from [`intent::normalize`] on the same `text` in
    /// the current room.
    pub fn apply(
        &self,
        state: &mut WorldState,
        proposal: &TurnProposal,
        intents: &Intents,
        text: &str,
    ) -> Outcome {
        let span = tracing::debug_span!("apply", room = %state.room());
        let _enter = span.enter();

        let mut turn = Turn::begin(state, intents, text);
        turn.settle_noise(proposal);
        turn.collect_events(proposal);
        turn.resolve_contradictions();
        policy::reduce(self.policies, &mut turn, state);
        turn.commit_flags(state);
        turn.arbitrate_inventory(state);
        turn.apply_lighting(state);
        let transition = turn.gate_movement(state);
        turn.finish(state, transition)
    }

    /// Normalize `text` in the current room, then [`apply`](Self::apply).
    pub fn resolve(&self, state: &mut WorldState, proposal: &TurnProposal, text: &str) -> Outcome {
        let intents = intent::normalize(state.room(), text);
        self.apply(state, proposal, &intents, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn play(state: &mut WorldState, text: &str, raw: Value) -> Outcome {
        RuleEngine::new().resolve(state, &TurnProposal::coerce(&raw), text)
    }

    fn quiet(state: &mut WorldState, text: &str) -> Outcome {
        play(state, text, json!({}))
    }

    /// State standing in the coal cellar, optionally holding a lit torch.
    fn in_cellar(lit_torch: bool) -> WorldState {
        let mut state = WorldState::new();
        state.raise_flag(FlagId::FoundLooseStone).unwrap();
        state.raise_flag(FlagId::StoneMoved).unwrap();
        state.raise_flag(FlagId::EnteredHole).unwrap();
        state.enter(RoomId::CoalCellar);
        if lit_torch {
            state.items_mut().take(ItemId::Torch, RoomId::CoalCellar).unwrap();
            state.items_mut().set_lit(ItemId::Torch, true).unwrap();
        }
        state
    }

    fn in_courtyard() -> WorldState {
        let mut state = in_cellar(true);
        state.raise_flag(FlagId::HallDoorOpened).unwrap();
        state.raise_flag(FlagId::GuardDisabled).unwrap();
        state.enter(RoomId::Courtyard);
        state
    }

    #[test]
    fn search_straw_finds_the_stone() {
        let mut state = WorldState::new();
        let out = play(
            &mut state,
            "Search under the straw bed",
            json!({ "narration": "You sift the straw.", "noise_level": 1, "events": [] }),
        );
        assert_eq!(out.new_flags, vec![FlagId::FoundLooseStone]);
        assert!(state.has_flag(FlagId::FoundLooseStone));
        assert_eq!(state.hp(), 100);
    }

    #[test]
    fn lift_stone_before_finding_it_is_denied() {
        let mut state = WorldState::new();
        let out = quiet(&mut state, "lift the loose stone");
        assert!(!state.has_flag(FlagId::StoneMoved));
        assert!(out.new_flags.is_empty());
        assert_eq!(out.denials, vec![FlagId::StoneMoved.denial().to_string()]);
    }

    #[test]
    fn clear_straw_and_lift_in_one_turn() {
        let mut state = WorldState::new();
        let out = quiet(&mut state, "clear the straw and lift the loose stone");
        assert_eq!(
            out.new_flags,
            vec![FlagId::FoundLooseStone, FlagId::StoneMoved]
        );
    }

    #[test]
    fn noisy_cell_gets_punished() {
        let mut state = WorldState::new();
        let out = play(&mut state, "shout for help", json!({ "noise_level": 0 }));
        assert_eq!(out.noise, 3);
        assert_eq!(out.hp_delta, -20);
        assert!(out.has_event(EventId::GuardPunishes));
        assert_eq!(state.hp(), 80);
        assert!(out.cause.is_some());
    }

    #[test]
    fn proposal_cannot_raise_engine_events() {
        let mut state = WorldState::new();
        let out = play(
            &mut state,
            "sit quietly",
            json!({ "events": ["guard_punishes"], "hp_delta": -50, "noise_level": 9 }),
        );
        // noise 9 clamps to 3, which still angers the guard
        assert_eq!(out.noise, 3);
        assert_eq!(out.hp_delta, -20);
        assert!(out.notes.iter().any(|n| n.contains("guard_punishes")));
        assert!(out.notes.iter().any(|n| n.contains("hp_delta")));
    }

    #[test]
    fn unjustified_proposal_events_are_dropped() {
        let mut state = WorldState::new();
        let out = play(
            &mut state,
            "I stretch my legs",
            json!({ "events": ["straw_rummaged", "fight_guard", "teleport"], "flags_set": ["stone_moved"] }),
        );
        assert!(out.is_noop());
        assert!(state.flags().next().is_none());
        assert!(out.notes.iter().any(|n| n.contains("teleport")));
    }

    #[test]
    fn crawl_requires_moved_stone() {
        let mut state = WorldState::new();
        let out = quiet(&mut state, "crawl into the hole");
        assert_eq!(out.room_transition, None);
        assert_eq!(state.room(), RoomId::Cell);
        assert!(!out.denials.is_empty());
    }

    #[test]
    fn crawl_through_hole_enters_cellar() {
        let mut state = WorldState::new();
        state.raise_flag(FlagId::FoundLooseStone).unwrap();
        state.raise_flag(FlagId::StoneMoved).unwrap();
        let out = quiet(&mut state, "crawl into the hole");
        assert_eq!(out.room_transition, Some(RoomId::CoalCellar));
        assert_eq!(out.new_flags, vec![FlagId::EnteredHole]);
        assert_eq!(state.room(), RoomId::CoalCellar);
        assert!(!out.light_present);
    }

    #[test]
    fn throwing_into_the_hole_does_not_traverse() {
        let mut state = WorldState::new();
        state.raise_flag(FlagId::FoundLooseStone).unwrap();
        state.raise_flag(FlagId::StoneMoved).unwrap();
        let out = play(
            &mut state,
            "throw a pebble into the hole",
            json!({ "events": ["enter_coal_cellar"], "progression": "next_room" }),
        );
        assert_eq!(out.room_transition, None);
        assert_eq!(state.room(), RoomId::Cell);
        assert!(!state.has_flag(FlagId::EnteredHole));
    }

    #[test]
    fn dark_cellar_stumble() {
        let mut state = in_cellar(false);
        let out = quiet(&mut state, "walk deeper into the cellar");
        assert_eq!(out.hp_delta, -10);
        assert!(out.has_event(EventId::DarkStumble));
        assert!(!out.has_event(EventId::MoveDeeper));
        assert_eq!(state.room(), RoomId::CoalCellar);
        assert!(out.denials[0].contains("without light"));
    }

    #[test]
    fn return_to_cell_in_the_dark_is_safe() {
        let mut state = in_cellar(false);
        let out = quiet(&mut state, "go back");
        assert_eq!(out.hp_delta, 0);
        assert_eq!(out.room_transition, Some(RoomId::Cell));
    }

    #[test]
    fn pick_up_torch_in_the_dark() {
        let mut state = in_cellar(false);
        let out = quiet(&mut state, "feel around and pick up the object at my feet");
        assert!(out.has_event(EventId::Pickup(ItemId::Torch)));
        assert_eq!(state.items().held(), Some(ItemId::Torch));
        assert_eq!(out.hp_delta, 0);
    }

    #[test]
    fn hands_full() {
        let mut state = in_cellar(true);
        let out = quiet(&mut state, "pick up the coal");
        assert_eq!(state.items().held(), Some(ItemId::Torch));
        assert!(state.items().is_in(ItemId::Coal, RoomId::CoalCellar));
        assert!(out.denials[0].contains("hands are full"));
        assert!(out.is_noop());
    }

    #[test]
    fn drop_then_pick_up_same_turn() {
        let mut state = in_cellar(true);
        let out = quiet(&mut state, "drop the torch, then pick up the coal");
        assert_eq!(state.items().held(), Some(ItemId::Coal));
        assert!(state.items().is_in(ItemId::Torch, RoomId::CoalCellar));
        assert!(out.has_event(EventId::Drop(ItemId::Torch)));
        assert!(out.has_event(EventId::Pickup(ItemId::Coal)));
        // the dropped torch still lights the cellar
        assert!(out.light_present);
    }

    #[test]
    fn light_torch_only_in_the_cell() {
        let mut state = in_cellar(false);
        state.items_mut().take(ItemId::Torch, RoomId::CoalCellar).unwrap();
        let out = quiet(&mut state, "light the torch");
        assert!(!state.items().is_lit(ItemId::Torch));
        assert_eq!(out.denials, vec![NO_FLAME.to_string()]);

        state.enter(RoomId::Cell);
        let out = quiet(&mut state, "light the torch");
        assert!(state.items().is_lit(ItemId::Torch));
        assert!(out.has_event(EventId::LightTorch));
    }

    #[test]
    fn no_flame_in_the_hall_or_courtyard() {
        let mut state = in_cellar(false);
        state.items_mut().take(ItemId::Torch, RoomId::CoalCellar).unwrap();
        state.raise_flag(FlagId::HallDoorOpened).unwrap();
        state.enter(RoomId::GreatHall);
        let out = quiet(&mut state, "light the torch");
        assert!(!state.items().is_lit(ItemId::Torch));
        assert!(!out.has_event(EventId::LightTorch));
        assert_eq!(out.denials, vec![NO_FLAME.to_string()]);

        state.raise_flag(FlagId::GuardDisabled).unwrap();
        state.enter(RoomId::Courtyard);
        let out = quiet(&mut state, "light the torch");
        assert!(!state.items().is_lit(ItemId::Torch));
        assert_eq!(out.denials, vec![NO_FLAME.to_string()]);
    }

    #[test]
    fn extinguished_torch_relights_only_in_the_cell() {
        let mut state = in_courtyard();
        let out = quiet(&mut state, "put out the torch");
        assert!(out.has_event(EventId::ExtinguishTorch));
        assert!(!state.items().is_lit(ItemId::Torch));
        let out = quiet(&mut state, "light the torch");
        assert_eq!(out.denials, vec![NO_FLAME.to_string()]);
    }

    #[test]
    fn lit_cellar_allows_exploration() {
        let mut state = in_cellar(true);
        let out = quiet(&mut state, "open the door at the top of the stairs");
        assert_eq!(out.new_flags, vec![FlagId::HallDoorOpened]);
        let out = quiet(&mut state, "climb the stairs");
        assert_eq!(out.room_transition, Some(RoomId::GreatHall));
        assert_eq!(state.room(), RoomId::GreatHall);
    }

    #[test]
    fn shut_door_blocks_the_stairs() {
        let mut state = in_cellar(true);
        let out = quiet(&mut state, "climb the stairs");
        assert_eq!(out.room_transition, None);
        assert_eq!(
            out.denials,
            vec!["The door at the top of the stairs is still shut.".to_string()]
        );
    }

    #[test]
    fn hall_clash_cost_depends_on_weapon() {
        let mut state = in_cellar(true);
        state.raise_flag(FlagId::HallDoorOpened).unwrap();
        state.enter(RoomId::GreatHall);
        let out = quiet(&mut state, "attack the guard");
        assert_eq!(out.hp_delta, -10);
        assert!(state.has_flag(FlagId::GuardDisabled));

        let out = quiet(&mut state, "attack the guard again");
        assert_eq!(out.hp_delta, 0);
        assert!(!out.has_event(EventId::FightGuard));
    }

    #[test]
    fn hall_clash_uses_the_item_held_at_turn_start() {
        let mut state = in_cellar(false);
        state.raise_flag(FlagId::HallDoorOpened).unwrap();
        state.enter(RoomId::GreatHall);
        state.items_mut().take(ItemId::Candlestick, RoomId::GreatHall).unwrap();
        let out = quiet(&mut state, "drop the candlestick and attack the guard");
        assert_eq!(out.hp_delta, -10);
        assert!(out.has_event(EventId::Drop(ItemId::Candlestick)));
        assert!(state.items().is_in(ItemId::Candlestick, RoomId::GreatHall));
        assert!(state.has_flag(FlagId::GuardDisabled));
    }

    #[test]
    fn proposed_fight_without_provocation_is_dropped() {
        let mut state = in_cellar(true);
        state.raise_flag(FlagId::HallDoorOpened).unwrap();
        state.enter(RoomId::GreatHall);
        let out = play(
            &mut state,
            "tiptoe past the guard",
            json!({ "events": ["fight_guard"], "flags_set": ["guard_disabled"] }),
        );
        assert_eq!(out.hp_delta, 0);
        assert!(!out.has_event(EventId::FightGuard));
        assert!(!state.has_flag(FlagId::GuardDisabled));
    }

    #[test]
    fn hall_clash_bare_handed() {
        let mut state = in_cellar(false);
        state.raise_flag(FlagId::HallDoorOpened).unwrap();
        state.enter(RoomId::GreatHall);
        let out = quiet(&mut state, "punch the guard");
        assert_eq!(out.hp_delta, -30);
    }

    #[test]
    fn guard_blocks_the_doors() {
        let mut state = in_cellar(true);
        state.raise_flag(FlagId::HallDoorOpened).unwrap();
        state.enter(RoomId::GreatHall);
        let out = quiet(&mut state, "walk out through the double doors");
        assert_eq!(out.room_transition, None);
        assert_eq!(state.room(), RoomId::GreatHall);
    }

    #[test]
    fn lever_needs_the_wall_walk() {
        let mut state = in_courtyard();
        let out = quiet(&mut state, "pull the lever");
        assert!(!state.has_flag(FlagId::PortcullisRaised));
        assert!(out.denials[0].contains("wall-walk"));

        let out = quiet(&mut state, "climb the gatehouse stairs");
        assert_eq!(out.footing_change, Some(Footing::WallWalk));
        let out = quiet(&mut state, "pull the lever");
        assert_eq!(out.new_flags, vec![FlagId::PortcullisRaised]);

        let out = quiet(&mut state, "pull the lever");
        assert!(out.is_noop());
    }

    #[test]
    fn escape_requires_raised_portcullis() {
        let mut state = in_courtyard();
        let out = quiet(&mut state, "run out through the gate");
        assert!(!out.game_won);
        assert_eq!(out.denials, vec![PORTCULLIS_DOWN.to_string()]);
    }

    #[test]
    fn escape_from_the_wall_walk_is_denied() {
        let mut state = in_courtyard();
        state.set_footing(Footing::WallWalk);
        state.raise_flag(FlagId::PortcullisRaised).unwrap();
        let out = quiet(&mut state, "run out through the gate");
        assert!(!out.game_won);
        assert_eq!(out.denials, vec![CLIMB_DOWN_FIRST.to_string()]);

        quiet(&mut state, "climb down to the courtyard");
        let out = quiet(&mut state, "run out through the gate");
        assert!(out.game_won);
    }

    #[test]
    fn death_cancels_transition() {
        let mut state = WorldState::new();
        state.raise_flag(FlagId::FoundLooseStone).unwrap();
        state.raise_flag(FlagId::StoneMoved).unwrap();
        state.apply_hp_delta(-90);
        let out = quiet(&mut state, "scream and crawl into the hole");
        assert!(out.dead);
        assert_eq!(out.hp_delta, -10);
        assert_eq!(state.hp(), 0);
        assert_eq!(out.room_transition, None);
        assert_eq!(state.room(), RoomId::Cell);
    }

    #[test]
    fn look_is_idempotent() {
        let mut state = in_cellar(true);
        let before = state.clone();
        for _ in 0..3 {
            let out = play(
                &mut state,
                "look around",
                json!({ "narration": "Coal everywhere.", "events": ["move_deeper"] }),
            );
            assert!(out.look_only);
            assert!(out.is_noop());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn looking_in_the_dark_does_not_stumble() {
        let mut state = in_cellar(false);
        let before = state.clone();
        let out = play(
            &mut state,
            "look around",
            json!({ "narration": "You grope forward.", "events": ["move_deeper"] }),
        );
        assert!(out.look_only);
        assert_eq!(out.hp_delta, 0);
        assert!(!out.has_event(EventId::DarkStumble));
        assert!(out.is_noop());
        assert_eq!(state, before);
    }

    #[test]
    fn examining_the_door_does_not_open_it() {
        let mut state = in_cellar(true);
        let out = play(
            &mut state,
            "examine the door",
            json!({ "events": ["open_hall_door"], "flags_set": ["hall_door_opened"] }),
        );
        assert!(out.look_only);
        assert!(out.new_flags.is_empty());
        assert!(!state.has_flag(FlagId::HallDoorOpened));
    }

    #[test]
    fn proposed_door_in_the_dark_is_dropped_without_stumbling() {
        let mut state = in_cellar(false);
        let out = play(
            &mut state,
            "knock on the door",
            json!({ "events": ["open_hall_door"] }),
        );
        assert!(!out.has_event(EventId::DarkStumble));
        assert!(!state.has_flag(FlagId::HallDoorOpened));
    }

    #[test]
    fn proposal_movement_without_player_intent_is_dropped() {
        let mut state = in_cellar(true);
        let out = play(
            &mut state,
            "examine the stairs and the door",
            json!({ "events": ["climb_to_hall"] }),
        );
        assert_eq!(out.room_transition, None);
        assert_eq!(state.room(), RoomId::CoalCellar);
    }
}
