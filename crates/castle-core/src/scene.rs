//! Static scene registry: scene cards, the room graph, and per-room catalogs.
//!
//! Everything here is immutable for the lifetime of the process. Scene cards
//! are serialized verbatim into narrator requests.

use serde::Serialize;

use crate::event::EventId;
use crate::flag::FlagId;
use crate::item::ItemId;
use crate::room::RoomId;

/// Narration shown once when a playthrough begins.
pub const WELCOME_TEXT: &str = "You stand in a dark stone cell. A torch burns low on one wall. \
An iron door with a barred window faces a torchlit corridor where a drowsy guard slumps on a bench. \
He wears full armor; there is no realistic chance to trick him or defeat him. \
High above, a tiny window reveals a foggy night sky and distant battlements; falling from there would be certain death. \
A thin straw bed lies on the floor. Hidden beneath the straw is said to be a loose cobblestone, if you can find it.\n\n\
Advice: Keep quiet. If you make noticeable noise in the cell, the guard will wake, unlock the door, and strike you before returning to his post.";

/// One step of a room's noise scale.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NoiseBand {
    /// Noise level, 0 to 3.
    pub level: u8,
    /// What counts as this level in the room.
    pub description: &'static str,
}

/// Authored content and rules for one room.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SceneCard {
    /// Room identifier.
    pub room_id: RoomId,
    /// Room title.
    pub title: &'static str,
    /// Long-form description handed to the narrator.
    pub room_description: &'static str,
    /// Hard facts the narrator must respect.
    pub facts_and_constraints: &'static [&'static str],
    /// Flags that may change in this room.
    pub stateful_flags: &'static [FlagId],
    /// What each noise level means here.
    pub noise_scale_reference: &'static [NoiseBand],
    /// Rules for which events to report.
    pub triggers_policy: &'static [&'static str],
    /// Narration style guidance.
    pub style_and_tone: &'static [&'static str],
    /// Longer introduction printed on first entry.
    #[serde(skip)]
    pub intro: Option<&'static str>,
    /// Extra detail printed on entry while a carried light is present.
    #[serde(skip)]
    pub lit_hint: Option<&'static str>,
    /// Whether the room is lit without a carried light source.
    #[serde(skip)]
    pub fixed_light: bool,
    /// One neutral sentence of atmosphere, used when nothing else is left to say.
    #[serde(skip)]
    pub ambient: &'static str,
    /// Whether a carried torch can be lit from a flame in this room.
    #[serde(skip)]
    pub flame_source: bool,
}

/// A directed edge of the room graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    /// Room the exit leaves from.
    pub from: RoomId,
    /// Room the exit leads to.
    pub to: RoomId,
    /// The traversal event that uses this exit.
    pub via: EventId,
    /// Flags that must be set before the exit can be used.
    pub requires: &'static [FlagId],
    /// In-fiction denial when a required flag is missing.
    pub denial: &'static str,
}

const STANDARD_STYLE: &[&str] = &[
    "Second person, immersive, concise, vivid.",
    "Maximum ~3 sentences per turn.",
    "Announce each key outcome exactly once; do not repeat the same fact.",
    "If nothing meaningful happens, end with 'Nothing happened.'",
];

static CELL: SceneCard = SceneCard {
    room_id: RoomId::Cell,
    title: "Prison Cell",
    room_description: "You awaken in a cramped 5x5 meter dungeon cell. The walls, ceiling, and floor are built from large \
rounded cobblestones about 20-30 centimeters across. A single torch flickers on one wall. \
An iron door with a barred window faces a corridor lit by torches. A guard dozes on a bench outside; \
he wears full armor and looks irritable. There is no realistic chance to trick him or defeat him. \
High up, a tiny 10x10 cm window shows a foggy night sky and the outline of the castle, a lethal 20-meter drop. \
On the floor lies a thin straw bed. Hidden under the straw is a loose cobblestone; lifting it reveals a crawlable hole \
leading down to a coal cellar.",
    facts_and_constraints: &[
        "Strictly physical and realistic; no magic, no conjuration of tools, no impossible stunts.",
        "You cannot remove the wall torch, but a held wooden torch can be lit from it.",
        "The high window cannot be used to escape (fatal drop).",
        "The guard is outside, drowsy but will react to disruptive noise; he wears full armor and cannot be overpowered or tricked.",
        "Quiet interactions with the guard are flavor only (no progress).",
        "There are no hidden items beyond what is stated.",
        "English only.",
    ],
    stateful_flags: &[
        FlagId::FoundLooseStone,
        FlagId::StoneMoved,
        FlagId::EnteredHole,
    ],
    noise_scale_reference: &[
        NoiseBand {
            level: 0,
            description: "Silent/minimal: careful inspection, tiptoeing, whispering, gently moving straw.",
        },
        NoiseBand {
            level: 1,
            description: "Quiet: normal walking, soft speaking, light rummaging.",
        },
        NoiseBand {
            level: 2,
            description: "Noticeable/disruptive: humming, singing, dancing with steps, knocking, moving objects loudly. Calling for help aloud or addressing the guard aloud counts as 2 unless explicitly whispered.",
        },
        NoiseBand {
            level: 3,
            description: "Loud/alarming: shouting, banging metal, breaking objects, screaming.",
        },
    ],
    triggers_policy: &[
        "Noise reflects physical loudness, not persuasion success.",
        "If noise_level >= 2, the guard reacts immediately this turn: he unlocks the door, strikes you for -20 HP, then returns. Must be narrated.",
        "Any careful inspection/searching/looking under/moving/rummaging of the straw MUST be recorded as event 'straw_rummaged' and reveals the loose stone (flag found_loose_stone).",
        "If the player lifts/moves/pries/drags the loose stone (once discovered), add event 'stone_lifted' and reveal a crawlable hole.",
        "If the player crawls into/goes through the hole (once available), add event 'enter_coal_cellar'.",
        "If the player holds the wooden torch and lights it on the wall torch, add event 'light_torch'.",
        "If an action is impossible, produce a playful grounded refusal and end with 'Nothing happened.'",
        "Never invent items/exits beyond the scene; never escape via the high window.",
    ],
    style_and_tone: STANDARD_STYLE,
    intro: None,
    lit_hint: None,
    fixed_light: true,
    ambient: "Damp cobblestones press close around you, and the wall torch crackles.",
    flame_source: true,
};

static COAL_CELLAR: SceneCard = SceneCard {
    room_id: RoomId::CoalCellar,
    title: "Coal Cellar",
    room_description: "A pitch-black coal cellar: tight stone walls, heaps of coal, dust in the air, and a cold stone floor. \
You emerge from a crawlspace in the wall. In the dark you bump your foot against something lying on the ground; \
you can't tell what it is until you pick it up. With light, you can make out heaps of coal and, at the far end, \
a short stone staircase leading up to a door.",
    facts_and_constraints: &[
        "English only.",
        "No guards here; noise does not summon anyone.",
        "Physical realism applies; no magic or conjured tools.",
        "The crawl opening behind you leads back up to the prison cell.",
        "It is very dark by default. Without a lit torch, moving around is dangerous.",
    ],
    stateful_flags: &[FlagId::HallDoorOpened],
    noise_scale_reference: &[
        NoiseBand {
            level: 0,
            description: "Careful whisper/motion.",
        },
        NoiseBand {
            level: 1,
            description: "Quiet movement.",
        },
        NoiseBand {
            level: 2,
            description: "Noticeable noise.",
        },
        NoiseBand {
            level: 3,
            description: "Very loud.",
        },
    ],
    triggers_policy: &[
        "If the player walks/explores/moves deeper in darkness, they stumble: warn them it is unwise to move without light and that they remain where they are.",
        "With a lit torch, movement is safe and surroundings are visible.",
        "If the player picks up the unknown object at their feet, reveal it as a wooden torch: add event 'pickup_torch'.",
        "If the player returns through the crawl opening, add event 'return_to_cell'.",
        "With light, you may describe coal heaps, the cramped stone floor, and a short stone staircase leading to a door at the far end.",
        "If the player opens the door at the top of the stairs, add event 'open_hall_door'; climbing through it adds 'climb_to_hall'.",
        "If an action is impossible, produce a playful grounded refusal and end with 'Nothing happened.'",
        "Never invent items or exits not stated.",
    ],
    style_and_tone: STANDARD_STYLE,
    intro: Some(
        "It's pitch-black. Coal dust clings to your throat; the stone floor feels uneven underfoot. \
Heaps of coal hem you in on both sides. As you steady yourself, your foot bumps against something lying on the ground. \
You can feel it with your toes, but you can't tell what it is until you pick it up.",
    ),
    lit_hint: Some(
        "Torchlight pushes back the darkness: heaps of coal crowd the tight stone floor, and at the far end a short staircase leads to a closed door.",
    ),
    fixed_light: false,
    ambient: "Coal dust hangs thick in the air around you.",
    flame_source: false,
};

static GREAT_HALL: SceneCard = SceneCard {
    room_id: RoomId::GreatHall,
    title: "Great Hall",
    room_description: "A long hall with a vaulted ceiling, lit by a dying fire in a huge hearth. \
Trestle tables stand in rows; on the nearest one an iron candlestick holds a stub of candle. \
A guard in a padded jerkin dozes on a stool by the hearth, a cudgel across his knees. \
Heavy double doors at the far end lead out to the courtyard. Behind you, stairs lead down to the coal cellar.",
    facts_and_constraints: &[
        "English only.",
        "The guard here wears no armor and can be overpowered, but he fights back.",
        "Any noticeable noise wakes the guard, and he attacks at once.",
        "The double doors to the courtyard cannot be passed while the guard is standing.",
        "Physical realism applies; no magic or conjured tools.",
    ],
    stateful_flags: &[FlagId::GuardDisabled],
    noise_scale_reference: &[
        NoiseBand {
            level: 0,
            description: "Silent: creeping, holding your breath.",
        },
        NoiseBand {
            level: 1,
            description: "Quiet: careful steps, whispering.",
        },
        NoiseBand {
            level: 2,
            description: "Noticeable: knocking over benches, talking aloud, scraping furniture.",
        },
        NoiseBand {
            level: 3,
            description: "Loud: shouting, smashing, banging.",
        },
    ],
    triggers_policy: &[
        "If the player attacks the guard, or noise_level >= 2 wakes him, add event 'fight_guard'. The fight happens once; afterwards he lies unconscious.",
        "A weapon in hand makes the fight less costly; bare hands hurt the most.",
        "Walking out through the double doors adds event 'enter_courtyard', but only once the guard is down.",
        "Going back down the stairs adds event 'descend_to_cellar'.",
        "If an action is impossible, produce a playful grounded refusal and end with 'Nothing happened.'",
    ],
    style_and_tone: STANDARD_STYLE,
    intro: Some(
        "Warmth washes over you. Embers glow in a hearth big enough to stand in, throwing long shadows across rows of trestle tables. \
By the fire a guard slumps on a stool, chin on his chest, a cudgel across his knees. \
Beyond him, heavy double doors promise the open air.",
    ),
    lit_hint: None,
    fixed_light: true,
    ambient: "The fire in the hearth pops and settles.",
    flame_source: false,
};

static COURTYARD: SceneCard = SceneCard {
    room_id: RoomId::Courtyard,
    title: "Castle Courtyard",
    room_description: "A cobbled courtyard under a foggy night sky, lit by torches in iron brackets. \
The castle gate is barred by a lowered portcullis. Stone stairs climb the gatehouse wall to a narrow wall-walk, \
where a winch lever raises the portcullis. The doors behind you lead back into the great hall.",
    facts_and_constraints: &[
        "English only.",
        "The winch lever can only be reached from the gatehouse wall-walk, never from the ground.",
        "The portcullis is far too heavy to lift by hand.",
        "Leaving through the gate requires the portcullis to be raised and the player to be on the ground.",
    ],
    stateful_flags: &[FlagId::PortcullisRaised],
    noise_scale_reference: &[
        NoiseBand {
            level: 0,
            description: "Silent.",
        },
        NoiseBand {
            level: 1,
            description: "Quiet steps on cobbles.",
        },
        NoiseBand {
            level: 2,
            description: "Noticeable noise.",
        },
        NoiseBand {
            level: 3,
            description: "Very loud.",
        },
    ],
    triggers_policy: &[
        "Climbing the gatehouse stairs adds event 'climb_gatehouse'; climbing back down adds 'descend_gatehouse'.",
        "Pulling the winch lever on the wall-walk adds event 'pull_gate_lever' and raises the portcullis.",
        "Running out through the open gate adds event 'escape_through_gate'.",
        "Going back inside adds event 'return_to_hall'.",
        "If an action is impossible, produce a playful grounded refusal and end with 'Nothing happened.'",
    ],
    style_and_tone: STANDARD_STYLE,
    intro: Some(
        "Cold night air fills your lungs. Fog drifts over wet cobbles, and torches hiss in their brackets. \
Across the yard the gate is shut by a lowered portcullis, its iron teeth sunk into the stone. \
Narrow stairs climb the gatehouse wall to a wall-walk where the dark shape of a winch stands against the sky.",
    ),
    lit_hint: None,
    fixed_light: true,
    ambient: "Cold fog drifts across the cobbles.",
    flame_source: false,
};

static EXITS: [Exit; 6] = [
    Exit {
        from: RoomId::Cell,
        to: RoomId::CoalCellar,
        via: EventId::EnterCoalCellar,
        requires: &[FlagId::StoneMoved],
        denial: "There is no opening here to crawl through.",
    },
    Exit {
        from: RoomId::CoalCellar,
        to: RoomId::Cell,
        via: EventId::ReturnToCell,
        requires: &[],
        denial: "",
    },
    Exit {
        from: RoomId::CoalCellar,
        to: RoomId::GreatHall,
        via: EventId::ClimbToHall,
        requires: &[FlagId::HallDoorOpened],
        denial: "The door at the top of the stairs is still shut.",
    },
    Exit {
        from: RoomId::GreatHall,
        to: RoomId::CoalCellar,
        via: EventId::DescendToCellar,
        requires: &[],
        denial: "",
    },
    Exit {
        from: RoomId::GreatHall,
        to: RoomId::Courtyard,
        via: EventId::EnterCourtyard,
        requires: &[FlagId::GuardDisabled],
        denial: "The guard sits between you and the doors; you cannot slip past him.",
    },
    Exit {
        from: RoomId::Courtyard,
        to: RoomId::GreatHall,
        via: EventId::ReturnToHall,
        requires: &[],
        denial: "",
    },
];

/// The scene card for a room.
pub fn card(room: RoomId) -> &'static SceneCard {
    match room {
        RoomId::Cell => &CELL,
        RoomId::CoalCellar => &COAL_CELLAR,
        RoomId::GreatHall => &GREAT_HALL,
        RoomId::Courtyard => &COURTYARD,
    }
}

/// All exits of the room graph.
pub fn exits() -> &'static [Exit] {
    &EXITS
}

/// Exits leaving `room`.
pub fn exits_from(room: RoomId) -> impl Iterator<Item = &'static Exit> {
    EXITS.iter().filter(move |exit| exit.from == room)
}

/// The exit out of `room` that `event` would take.
pub fn exit_for(room: RoomId, event: EventId) -> Option<&'static Exit> {
    exits_from(room).find(|exit| exit.via == event)
}

/// Whether `event` belongs to the closed catalog of `room`.
pub fn allows(room: RoomId, event: EventId) -> bool {
    event.room().is_none_or(|home| home == room)
}

/// The closed event catalog of a room, room-specific events first.
pub fn catalog(room: RoomId) -> Vec<EventId> {
    let mut events: Vec<EventId> = EventId::ROOM_EVENTS
        .into_iter()
        .filter(|event| event.room() == Some(room))
        .collect();
    events.push(EventId::LightTorch);
    events.push(EventId::ExtinguishTorch);
    for item in ItemId::ALL {
        events.push(EventId::Pickup(item));
        events.push(EventId::Drop(item));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_room_has_a_card() {
        for room in RoomId::ALL {
            let card = card(room);
            assert_eq!(card.room_id, room);
            assert_eq!(card.title, room.title());
        }
    }

    #[test]
    fn only_the_cellar_is_dark() {
        for room in RoomId::ALL {
            assert_eq!(card(room).fixed_light, room != RoomId::CoalCellar);
        }
    }

    #[test]
    fn only_the_cell_can_light_a_torch() {
        for room in RoomId::ALL {
            assert_eq!(card(room).flame_source, room == RoomId::Cell);
        }
    }

    #[test]
    fn every_room_has_an_ambient_line() {
        for room in RoomId::ALL {
            assert!(card(room).ambient.ends_with('.'));
        }
    }

    #[test]
    fn exits_connect_adjacent_rooms() {
        for exit in exits() {
            assert_eq!(exit.via.exit_to(), Some(exit.to));
            assert_eq!(exit.via.room(), Some(exit.from));
            if !exit.requires.is_empty() {
                assert!(!exit.denial.is_empty());
            }
        }
        assert!(exit_for(RoomId::Cell, EventId::ClimbToHall).is_none());
        assert_eq!(
            exit_for(RoomId::CoalCellar, EventId::ClimbToHall).map(|e| e.to),
            Some(RoomId::GreatHall)
        );
    }

    #[test]
    fn catalogs_are_room_scoped() {
        assert!(allows(RoomId::Cell, EventId::StrawRummaged));
        assert!(!allows(RoomId::CoalCellar, EventId::StrawRummaged));
        assert!(allows(RoomId::GreatHall, EventId::Pickup(ItemId::Candlestick)));
        let coal = catalog(RoomId::CoalCellar);
        assert!(coal.contains(&EventId::DarkStumble));
        assert!(!coal.contains(&EventId::FightGuard));
    }

    #[test]
    fn card_serializes_without_presentation_fields() {
        let json = serde_json::to_value(card(RoomId::CoalCellar)).unwrap();
        assert_eq!(json["room_id"], "coal_01");
        assert_eq!(json["stateful_flags"][0], "hall_door_opened");
        assert!(json.get("intro").is_none());
        assert_eq!(json["noise_scale_reference"][3]["level"], 3);
    }
}
