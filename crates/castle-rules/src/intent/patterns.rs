//! Pattern tables for intent recognition.
//!
//! All patterns run against lowercased player text.

use std::sync::LazyLock;

use castle_core::{EventId, RoomId};
use regex::Regex;

/// A room-scoped pattern that proposes an event when it matches.
pub struct IntentRule {
    /// Room the rule applies in.
    pub room: RoomId,
    /// Event proposed on a match.
    pub event: EventId,
    /// Regex source, matched against lowercased text.
    pub pattern: &'static str,
}

/// Room rules in priority order. Within a room, the first matching movement
/// rule wins; later movement rules are skipped.
pub const ROOM_RULES: &[IntentRule] = &[
    // Prison cell
    IntentRule {
        room: RoomId::Cell,
        event: EventId::StrawRummaged,
        pattern: r"\b(?:straw|hay|bed|mattress|bedding)\b",
    },
    IntentRule {
        room: RoomId::Cell,
        event: EventId::StoneLifted,
        pattern: r"\b(?:lift|pry|prise|prize|move|pull|drag|remove|raise|shift|push|heave|lever|take|dig|wiggle|wriggle|roll|tug|yank)\w*(?:\s+\w+){0,3}?\s+(?:stone|cobble|cobblestone|rock)s?\b",
    },
    IntentRule {
        room: RoomId::Cell,
        event: EventId::EnterCoalCellar,
        pattern: r"\b(?:crawl|climb|go|enter|squeeze|slip|wriggle|descend|slide|jump|get|step|lower (?:myself|yourself))\w*\b.*\b(?:into|in|through|down)\b.*\b(?:hole|opening|gap|crawlspace|tunnel|passage|cellar)\b|\b(?:crawl|enter|squeeze)\w*\b.*\b(?:hole|opening|gap|crawlspace|tunnel|passage)\b",
    },
    // Coal cellar
    IntentRule {
        room: RoomId::CoalCellar,
        event: EventId::ReturnToCell,
        pattern: r"\b(?:go|head|crawl|climb|squeeze|get|move|turn)\w*\s+back\b|\breturn\w*\b|\b(?:crawl|climb|go|head|squeeze)\w*\b.*\b(?:cell|crawlspace|crawl space|opening|hole|tunnel)\b",
    },
    IntentRule {
        room: RoomId::CoalCellar,
        event: EventId::OpenHallDoor,
        pattern: r"\b(?:open|push|pull|unlatch|unbolt|try|shove|force|lift the latch)\w*\b.*\bdoor\b",
    },
    IntentRule {
        room: RoomId::CoalCellar,
        event: EventId::ClimbToHall,
        pattern: r"\b(?:climb|go|walk|head|run|step|move|ascend|pass|slip)\w*\b.*\b(?:upstairs|staircase|stairs|steps|through the door|into the hall|hall)\b|\bascend\w*\b",
    },
    IntentRule {
        room: RoomId::CoalCellar,
        event: EventId::MoveDeeper,
        pattern: r"\b(?:walk|move|go|head|venture|wander|step|stride|proceed|advance|feel (?:my|your) way|stumble|creep|shuffle)\w*\b.*\b(?:deeper|further|farther|forward|ahead|around|across|on|inside)\b|\bexplor\w*",
    },
    // Great hall
    IntentRule {
        room: RoomId::GreatHall,
        event: EventId::FightGuard,
        pattern: r"\b(?:attack|fight|hit|strike|punch|kick|club|bash|smash|tackle|knock|wrestle|overpower|choke|stab|ambush|jump|charge|brain|bludgeon)\w*\b.*\bguard\b|\bguard\b.*\b(?:attack|fight|hit|strike|punch|kick|club|bash|knock)\w*\b",
    },
    IntentRule {
        room: RoomId::GreatHall,
        event: EventId::EnterCourtyard,
        pattern: r"\b(?:go|walk|head|run|step|slip|sneak|move|leave|exit|push|open)\w*\b.*\b(?:double doors|doors|courtyard|outside)\b|\b(?:go|walk|head|run|step|slip|sneak)\w*\s+out\b",
    },
    IntentRule {
        room: RoomId::GreatHall,
        event: EventId::DescendToCellar,
        pattern: r"\b(?:go|walk|head|climb|run|step|return|sneak)\w*\b.*\b(?:down|back|downstairs|cellar|stairs)\b|\bdescend\w*\b",
    },
    // Courtyard
    IntentRule {
        room: RoomId::Courtyard,
        event: EventId::PullGateLever,
        pattern: r"\b(?:pull|push|turn|crank|work|operate|use|yank|throw|heave|wind|tug)\w*\b.*\b(?:lever|winch|crank|wheel)\b|\b(?:raise|lift|open)\w*\b.*\bportcullis\b",
    },
    IntentRule {
        room: RoomId::Courtyard,
        event: EventId::DescendGatehouse,
        pattern: r"\b(?:climb|go|walk|get|step|jump|head|come|hop)\w*\s+(?:back\s+)?down\b|\bdescend\w*\b",
    },
    IntentRule {
        room: RoomId::Courtyard,
        event: EventId::ClimbGatehouse,
        pattern: r"\b(?:climb|go|walk|head|run|step|ascend|get)\w*\b.*\b(?:up|stairs|steps|wall-walk|wall walk|walkway|gatehouse|wall|battlements|ramparts)\b|\bascend\w*\b",
    },
    IntentRule {
        room: RoomId::Courtyard,
        event: EventId::EscapeThroughGate,
        pattern: r"\b(?:run|walk|go|escape|flee|slip|step|head|leave|dash|sprint|exit|crawl|duck)\w*\b.*\b(?:gate|gateway|portcullis|out of the castle|freedom)\b|\bescape\w*\b",
    },
    IntentRule {
        room: RoomId::Courtyard,
        event: EventId::ReturnToHall,
        pattern: r"\b(?:go|walk|head|return|step|run)\w*\b.*\b(?:back|inside|hall|indoors)\b|\breturn\w*\b",
    },
];

/// Lighting the torch, valid in every room.
pub const LIGHT_PATTERN: &str = r"\b(?:re)?(?:light|ignite|kindle)\w*\s+(?:up\s+)?(?:the\s+|my\s+|this\s+|that\s+|a\s+)?(?:wooden\s+)?(?:torch|stick|it)\b|\bset\s+(?:the\s+|my\s+)?(?:torch|stick|it)\s+(?:on\s+fire|alight|ablaze)|\bset\s+fire\s+to\b|\b(?:hold|put|touch|press|dip|stick|push)\w*\s+(?:the\s+|my\s+)?(?:wooden\s+)?(?:torch|stick|it)\s+(?:to|into|against|in)\s+(?:the\s+)?(?:wall\s+torch|wall-torch|flame|fire|burning)";

/// Putting the torch out.
pub const EXTINGUISH_PATTERN: &str =
    r"\b(?:extinguish|snuff|douse|smother|quench)\w*\b|\b(?:put|blow|stamp|beat)\w*\s+(?:(?:the|my|it)\s+)?(?:torch\s+)?out\b";

/// Sounds loud enough to count as noise level 3.
pub const LOUD_PATTERN: &str = r"\b(?:shout|scream|yell|bang|smash|holler|roar|shriek|bellow|howl)\w*\b";

/// Sounds that count as noise level 2.
pub const NOTICEABLE_PATTERN: &str = r"\b(?:sing|sings|singing|sang|hum|hums|humming|hummed|knock|knocks|knocking|knocked|stomp\w*|whistl\w*|clap\w*|rattl\w*|danc\w*|hammer\w*|call(?:s|ing|ed)?\s+(?:out|for\s+help|to\s+the\s+guard)|cr(?:y|ies|ied)\s+out|talk\w*\s+loud\w*|speak\w*\s+loud\w*)\b";

/// A pure look/inspect query, when it opens the action.
pub const LOOK_PATTERN: &str = r"^(?:look|l|x|examine|inspect|peer|study|observe|survey|glance|check|listen|describe|where|what|stare|gaze|watch)\b";

/// Keywords that must appear in the player's words before a proposed event
/// is believed. Pickup and drop are checked through the verb tables instead.
pub const JUSTIFICATIONS: &[(EventId, &str)] = &[
    (EventId::StrawRummaged, r"\b(?:straw|hay|bed|mattress|bedding)\b"),
    (EventId::StoneLifted, r"\b(?:stone|cobble|cobblestone|rock)s?\b"),
    (
        EventId::EnterCoalCellar,
        r"\b(?:hole|opening|gap|crawlspace|tunnel|passage|cellar|crawl)\w*",
    ),
    (
        EventId::MoveDeeper,
        r"\b(?:walk|move|explor|deeper|further|farther|around|step|forward|ahead|venture|wander)\w*",
    ),
    (
        EventId::ReturnToCell,
        r"\b(?:back|return|cell|crawl|hole|opening|tunnel)\w*",
    ),
    (EventId::OpenHallDoor, r"\bdoor\b"),
    (
        EventId::ClimbToHall,
        r"\b(?:stair|steps|door|upstairs|hall|climb|ascend)\w*",
    ),
    (
        EventId::FightGuard,
        r"\b(?:guard|attack|fight|hit|punch|strike|kick|club|tackle|overpower)\w*",
    ),
    (
        EventId::DescendToCellar,
        r"\b(?:down|cellar|stair|back|descend)\w*",
    ),
    (
        EventId::EnterCourtyard,
        r"\b(?:door|doors|courtyard|out|outside|leave|exit)\b",
    ),
    (
        EventId::ClimbGatehouse,
        r"\b(?:climb|up|stair|steps|wall|gatehouse|ascend|battlement|rampart)\w*",
    ),
    (EventId::DescendGatehouse, r"\b(?:down|descend)\w*"),
    (
        EventId::PullGateLever,
        r"\b(?:lever|winch|crank|portcullis|wheel)\b",
    ),
    (
        EventId::EscapeThroughGate,
        r"\b(?:gate|gateway|escape|flee|freedom|portcullis)\b",
    ),
    (
        EventId::ReturnToHall,
        r"\b(?:back|inside|hall|return|indoors)\w*",
    ),
    (
        EventId::LightTorch,
        r"\b(?:light|ignite|fire|flame|kindle|burn|alight|ablaze)\w*",
    ),
    (
        EventId::ExtinguishTorch,
        r"\b(?:extinguish|out|snuff|douse|smother|quench)\w*",
    ),
];

/// Verbs that pick an item up.
pub const TAKE_VERBS: &[&str] = &[
    "take", "takes", "get", "gets", "pick", "picks", "grab", "grabs", "collect", "snatch",
    "seize", "lift", "fetch", "retrieve", "feel", "pocket", "scoop", "reach", "carry",
];
/// Verbs that put an item down.
pub const DROP_VERBS: &[&str] = &[
    "drop", "drops", "discard", "toss", "throw", "throws", "leave", "put", "puts", "set", "lay",
    "place", "dump", "hurl", "chuck", "fling",
];
/// Words that stand for an unidentified object lying at the player's feet.
pub const VAGUE_NOUNS: &[&str] = &["object", "thing", "something", "it", "whatever"];

/// Compiled room rules, in table order.
pub static ROOM_REGEXES: LazyLock<Vec<(RoomId, EventId, Regex)>> = LazyLock::new(|| {
    ROOM_RULES
        .iter()
        .map(|rule| {
            let regex = Regex::new(rule.pattern).expect("valid intent pattern");
            (rule.room, rule.event, regex)
        })
        .collect()
});

/// Compiled justification keywords.
pub static JUSTIFICATION_REGEXES: LazyLock<Vec<(EventId, Regex)>> = LazyLock::new(|| {
    JUSTIFICATIONS
        .iter()
        .map(|(event, pattern)| {
            let regex = Regex::new(pattern).expect("valid justification pattern");
            (*event, regex)
        })
        .collect()
});

/// Compiled [`LIGHT_PATTERN`].
pub static LIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LIGHT_PATTERN).expect("valid light pattern"));
/// Compiled [`EXTINGUISH_PATTERN`].
pub static EXTINGUISH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EXTINGUISH_PATTERN).expect("valid extinguish pattern"));
/// Compiled [`LOUD_PATTERN`].
pub static LOUD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LOUD_PATTERN).expect("valid loud pattern"));
/// Compiled [`NOTICEABLE_PATTERN`].
pub static NOTICEABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NOTICEABLE_PATTERN).expect("valid noticeable pattern"));
/// Compiled [`LOOK_PATTERN`].
pub static LOOK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LOOK_PATTERN).expect("valid look pattern"));
/// Splits text into clauses for item actions.
pub static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[,;.!?]+|\band then\b|\bthen\b|\band\b").expect("valid clause pattern")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_compiles() {
        assert_eq!(ROOM_REGEXES.len(), ROOM_RULES.len());
        assert_eq!(JUSTIFICATION_REGEXES.len(), JUSTIFICATIONS.len());
        LazyLock::force(&LIGHT_RE);
        LazyLock::force(&EXTINGUISH_RE);
        LazyLock::force(&LOUD_RE);
        LazyLock::force(&NOTICEABLE_RE);
        LazyLock::force(&LOOK_RE);
        LazyLock::force(&CLAUSE_RE);
    }

    #[test]
    fn rules_stay_in_their_room_catalog() {
        for rule in ROOM_RULES {
            assert_eq!(rule.event.room(), Some(rule.room), "{}", rule.event);
        }
    }

    #[test]
    fn every_room_event_has_a_justification_unless_engine_only() {
        for event in EventId::ROOM_EVENTS {
            let listed = JUSTIFICATIONS.iter().any(|(e, _)| *e == event);
            assert_eq!(listed, !event.engine_only(), "{event}");
        }
    }
}
