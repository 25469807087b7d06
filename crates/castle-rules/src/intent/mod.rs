//! Intent normalization: canonical events straight from the player's words.
//!
//! The narrator is not trusted to decide whether a traversal or item action
//! happened. These rules read the raw action text and propose the events the
//! player actually asked for, independent of any proposal.

mod patterns;
mod resolver;

use castle_core::{EventId, ItemId, RoomId};

pub use patterns::{DROP_VERBS, IntentRule, ROOM_RULES, TAKE_VERBS};
pub use resolver::items_in;

use patterns::{
    CLAUSE_RE, EXTINGUISH_RE, JUSTIFICATION_REGEXES, LIGHT_RE, LOOK_RE, LOUD_RE, NOTICEABLE_RE,
    ROOM_REGEXES,
};
use resolver::{mentions_vague_object, vague_item_for};

/// Events inferred from one player action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intents {
    /// Candidate events, highest priority first.
    pub events: Vec<EventId>,
    /// Minimum noise level the wording implies (0 to 3).
    pub noise_floor: u8,
    /// The action was a pure look/inspect query.
    pub look_only: bool,
}

impl Intents {
    /// Whether the player's words produced `event`.
    pub fn contains(&self, event: EventId) -> bool {
        self.events.contains(&event)
    }

    /// Priority rank of `event` (lower wins), if it was inferred.
    pub fn rank(&self, event: EventId) -> Option<usize> {
        self.events.iter().position(|e| *e == event)
    }

    /// The single movement event, if the player asked to move.
    pub fn movement(&self) -> Option<EventId> {
        self.events.iter().copied().find(|e| e.is_movement())
    }
}

/// Infer candidate events for `text` spoken in `room`.
///
/// Pure function of room and text. At most one movement event is produced:
/// when wording matches several exits, the room's rule order decides.
pub fn normalize(room: RoomId, text: &str) -> Intents {
    let lower = text.trim().to_lowercase();
    let mut intents = Intents::default();
    if lower.is_empty() {
        return intents;
    }

    let mut moved = false;
    for (rule_room, event, regex) in ROOM_REGEXES.iter() {
        if *rule_room != room || !regex.is_match(&lower) {
            continue;
        }
        if event.is_movement() {
            if moved {
                continue;
            }
            moved = true;
        }
        push_unique(&mut intents.events, *event);
    }

    if LIGHT_RE.is_match(&lower) {
        push_unique(&mut intents.events, EventId::LightTorch);
    }
    if EXTINGUISH_RE.is_match(&lower) {
        push_unique(&mut intents.events, EventId::ExtinguishTorch);
    }

    for clause in CLAUSE_RE.split(&lower) {
        for event in item_actions(room, clause) {
            push_unique(&mut intents.events, event);
        }
    }

    intents.noise_floor = if LOUD_RE.is_match(&lower) {
        3
    } else if NOTICEABLE_RE.is_match(&lower) {
        2
    } else {
        0
    };
    intents.look_only = intents.events.is_empty() && LOOK_RE.is_match(&lower);
    intents
}

/// Whether the player's words back up a proposed event.
///
/// A proposal may only introduce an event whose keywords appear in the
/// action. Engine-only events are never justified.
pub fn justified(event: EventId, text: &str) -> bool {
    if event.engine_only() {
        return false;
    }
    let lower = text.to_lowercase();
    match event {
        EventId::Pickup(item) => {
            has_verb(&lower, TAKE_VERBS) && (names(&lower, item) || mentions_vague_object(&lower))
        }
        EventId::Drop(item) => {
            has_verb(&lower, DROP_VERBS) && (names(&lower, item) || mentions_vague_object(&lower))
        }
        _ => JUSTIFICATION_REGEXES
            .iter()
            .find(|(e, _)| *e == event)
            .is_some_and(|(_, regex)| regex.is_match(&lower)),
    }
}

fn item_actions(room: RoomId, clause: &str) -> Vec<EventId> {
    // "hold the torch to the flame" is lighting, not a pickup
    if LIGHT_RE.is_match(clause) || EXTINGUISH_RE.is_match(clause) {
        return Vec::new();
    }
    let first_verb = clause
        .split_whitespace()
        .find(|w| TAKE_VERBS.contains(w) || DROP_VERBS.contains(w));
    let Some(verb) = first_verb else {
        return Vec::new();
    };
    let dropping = DROP_VERBS.contains(&verb);

    let mut items = items_in(clause);
    if items.is_empty() && !dropping && mentions_vague_object(clause) {
        items.extend(vague_item_for(room));
    }
    items
        .into_iter()
        .map(|item| {
            if dropping {
                EventId::Drop(item)
            } else {
                EventId::Pickup(item)
            }
        })
        .collect()
}

fn has_verb(text: &str, verbs: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|w| verbs.contains(&w))
}

fn names(text: &str, item: ItemId) -> bool {
    items_in(text).contains(&item)
}

fn push_unique(events: &mut Vec<EventId>, event: EventId) {
    if !events.contains(&event) {
        events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straw_mention_reveals() {
        let intents = normalize(RoomId::Cell, "Look under the straw bed");
        assert_eq!(intents.events, vec![EventId::StrawRummaged]);
        assert!(!intents.look_only);
        assert_eq!(intents.noise_floor, 0);
    }

    #[test]
    fn clear_straw_and_lift_stone() {
        let intents = normalize(RoomId::Cell, "clear the straw and lift the loose stone");
        assert_eq!(
            intents.events,
            vec![EventId::StrawRummaged, EventId::StoneLifted]
        );
    }

    #[test]
    fn straw_only_does_not_lift() {
        let intents = normalize(RoomId::Cell, "move the straw aside and look for a stone");
        assert!(!intents.contains(EventId::StoneLifted));
    }

    #[test]
    fn crawl_into_hole() {
        let intents = normalize(RoomId::Cell, "crawl into the hole");
        assert_eq!(intents.movement(), Some(EventId::EnterCoalCellar));
    }

    #[test]
    fn throwing_into_the_hole_is_not_traversal() {
        let intents = normalize(RoomId::Cell, "throw the coal into the hole");
        assert_eq!(intents.movement(), None);
        assert!(intents.contains(EventId::Drop(ItemId::Coal)));
    }

    #[test]
    fn go_back_resolves_by_room_priority() {
        let coal = normalize(RoomId::CoalCellar, "go back");
        assert_eq!(coal.movement(), Some(EventId::ReturnToCell));

        let hall = normalize(RoomId::GreatHall, "go back");
        assert_eq!(hall.movement(), Some(EventId::DescendToCellar));

        let courtyard = normalize(RoomId::Courtyard, "go back inside");
        assert_eq!(courtyard.movement(), Some(EventId::ReturnToHall));
    }

    #[test]
    fn only_one_movement_per_turn() {
        let intents = normalize(RoomId::CoalCellar, "go back, no, climb the stairs");
        let moves: Vec<_> = intents.events.iter().filter(|e| e.is_movement()).collect();
        assert_eq!(moves, vec![&EventId::ReturnToCell]);
    }

    #[test]
    fn walk_deeper_in_cellar() {
        let intents = normalize(RoomId::CoalCellar, "walk deeper into the cellar");
        assert_eq!(intents.movement(), Some(EventId::MoveDeeper));
    }

    #[test]
    fn pick_up_unknown_object() {
        let intents = normalize(RoomId::CoalCellar, "pick up the object at my feet");
        assert_eq!(intents.events, vec![EventId::Pickup(ItemId::Torch)]);
    }

    #[test]
    fn drop_then_pick_up() {
        let intents = normalize(RoomId::CoalCellar, "drop the torch, then pick up the coal");
        assert_eq!(
            intents.events,
            vec![
                EventId::Drop(ItemId::Torch),
                EventId::Pickup(ItemId::Coal)
            ]
        );
    }

    #[test]
    fn lighting_is_not_a_pickup() {
        let intents = normalize(RoomId::Cell, "hold the torch to the wall torch");
        assert_eq!(intents.events, vec![EventId::LightTorch]);

        let intents = normalize(RoomId::Cell, "light the torch");
        assert_eq!(intents.events, vec![EventId::LightTorch]);
    }

    #[test]
    fn noise_floor() {
        assert_eq!(normalize(RoomId::Cell, "shout loudly").noise_floor, 3);
        assert_eq!(normalize(RoomId::Cell, "hum a little tune").noise_floor, 2);
        assert_eq!(normalize(RoomId::Cell, "knock on the door").noise_floor, 2);
        assert_eq!(normalize(RoomId::Cell, "whisper a prayer").noise_floor, 0);
    }

    #[test]
    fn pure_look() {
        assert!(normalize(RoomId::Cell, "look around").look_only);
        assert!(normalize(RoomId::CoalCellar, "examine the walls").look_only);
        assert!(!normalize(RoomId::Cell, "sit down").look_only);
    }

    #[test]
    fn fight_and_leave_hall() {
        let intents = normalize(RoomId::GreatHall, "smash the guard with the candlestick");
        assert!(intents.contains(EventId::FightGuard));
        assert_eq!(intents.noise_floor, 3);

        let intents = normalize(RoomId::GreatHall, "walk out through the double doors");
        assert_eq!(intents.movement(), Some(EventId::EnterCourtyard));
    }

    #[test]
    fn courtyard_movements() {
        assert_eq!(
            normalize(RoomId::Courtyard, "climb the gatehouse stairs").movement(),
            Some(EventId::ClimbGatehouse)
        );
        assert_eq!(
            normalize(RoomId::Courtyard, "climb down to the courtyard").movement(),
            Some(EventId::DescendGatehouse)
        );
        assert_eq!(
            normalize(RoomId::Courtyard, "run out through the gate").movement(),
            Some(EventId::EscapeThroughGate)
        );
        assert!(normalize(RoomId::Courtyard, "pull the lever").contains(EventId::PullGateLever));
    }

    #[test]
    fn justification_requires_keywords() {
        assert!(justified(EventId::StrawRummaged, "I search the hay"));
        assert!(!justified(EventId::StrawRummaged, "I search the room"));
        assert!(!justified(EventId::GuardPunishes, "the guard hits me"));
        assert!(justified(EventId::Pickup(ItemId::Torch), "grab it"));
        assert!(!justified(EventId::Pickup(ItemId::Torch), "look at the torch"));
        assert!(justified(EventId::Drop(ItemId::Coal), "drop the coal"));
    }

    #[test]
    fn empty_text() {
        assert_eq!(normalize(RoomId::Cell, "   "), Intents::default());
    }
}
