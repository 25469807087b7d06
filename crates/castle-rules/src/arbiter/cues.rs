//! Canonical sentences for outcomes the narration must not leave out.

use std::sync::LazyLock;

use castle_core::{EventId, FlagId, ItemId};
use regex::Regex;

use crate::intent::items_in;

/// Sentences announcing a newly raised flag, with the pattern that shows the
/// narration already told it.
const FLAG_CUES: &[(FlagId, &str, &str)] = &[
    (
        FlagId::FoundLooseStone,
        "You notice a loose stone beneath the straw bed.",
        r"\bloose\b.*\b(?:stone|cobble)|\b(?:stone|cobble)\w*\b.*\b(?:loose|wobbl|shift)",
    ),
    (
        FlagId::StoneMoved,
        "You reveal a crawlable hole.",
        r"\b(?:hole|opening|gap|crawlspace)\b",
    ),
    (
        FlagId::HallDoorOpened,
        "The door at the top of the stairs creaks open.",
        r"\bdoor\b.*\b(?:open|swing|swung|give|gave|creak)\w*",
    ),
    (
        FlagId::GuardDisabled,
        "The hall guard crumples to the floor and does not get up.",
        r"\b(?:crumple|collapse|slump|unconscious|senseless|out cold|falls?|fell|drops?|dropped)\w*",
    ),
    (
        FlagId::PortcullisRaised,
        "With a groan of chains, the portcullis rises.",
        r"\bportcullis\b.*\b(?:rise|rises|rising|rose|raise|lift|up|clank|grind)\w*",
    ),
];

/// Sentences announcing an event that raises no flag of its own.
const EVENT_CUES: &[(EventId, &str, &str)] = &[
    (
        EventId::GuardPunishes,
        "The guard unlocks the door, strikes you, then returns to his bench.",
        r"\bguard\b.*\b(?:strike|strikes|struck|hit|hits|beat|beats|club|clubs|cuff|cuffs|slam|slams|blow)\b|\b(?:strike|strikes|struck|hit|hits|beat|beats|club|clubs|cuff|cuffs|slam|slams|blow)\b.*\bguard\b",
    ),
    (
        EventId::DarkStumble,
        "You stumble in the dark and bark your shin on something hard.",
        r"\b(?:stumbl|trip|fall|fell|stagger)\w*",
    ),
    (
        EventId::LightTorch,
        "Your torch catches fire and burns steadily.",
        r"\b(?:catch|catches|caught|flame|flames|burn|burns|burning|ignite|ignites|alight|lit|flare|flares)\b",
    ),
    (
        EventId::ExtinguishTorch,
        "Your torch gutters and goes out.",
        r"\b(?:out|extinguish\w*|snuff\w*|douse\w*|dies)\b",
    ),
    (
        EventId::MoveDeeper,
        "You pick your way deeper among the heaps of coal.",
        r"\b(?:deeper|further|farther|explor\w*)\b",
    ),
    (
        EventId::ClimbGatehouse,
        "You climb the narrow stairs onto the gatehouse wall-walk.",
        r"\b(?:wall-walk|wall walk|walkway|battlements|ramparts|top of the gatehouse)\b",
    ),
    (
        EventId::DescendGatehouse,
        "You climb back down into the courtyard.",
        r"\b(?:down|descend\w*)\b",
    ),
];

const PICKUP_TOLD: &str =
    r"\b(?:pick|picks|picked|take|takes|took|grab|grabs|grabbed|lift|lifts|lifted|scoop|scooped|hold|holding|pocket|pocketed|retrieve|retrieved|now carry|now have)\b";
const DROP_TOLD: &str =
    r"\b(?:drop|drops|dropped|set|sets|put|puts|place|places|placed|toss|tossed|throw|throws|threw|lay|lays|laid|discard\w*|fling|flung)\b";

static FLAG_REGEXES: LazyLock<Vec<(FlagId, &'static str, Regex)>> = LazyLock::new(|| {
    FLAG_CUES
        .iter()
        .map(|(flag, sentence, told)| {
            (*flag, *sentence, Regex::new(told).expect("valid flag cue regex"))
        })
        .collect()
});
static EVENT_REGEXES: LazyLock<Vec<(EventId, &'static str, Regex)>> = LazyLock::new(|| {
    EVENT_CUES
        .iter()
        .map(|(event, sentence, told)| {
            (*event, *sentence, Regex::new(told).expect("valid event cue regex"))
        })
        .collect()
});
static PICKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PICKUP_TOLD).expect("valid pickup cue regex"));
static DROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DROP_TOLD).expect("valid drop cue regex"));

/// A canonical sentence and how to tell whether narration already covers it.
pub(crate) struct Cue {
    pub(crate) sentence: String,
    told: &'static Regex,
    item: Option<ItemId>,
}

impl Cue {
    /// Whether `narration` already describes this outcome.
    pub(crate) fn told_in(&self, narration: &str) -> bool {
        let lower = narration.to_lowercase();
        self.told.is_match(&lower) && self.item.is_none_or(|item| items_in(&lower).contains(&item))
    }
}

/// The cue for a flag raised this turn.
pub(crate) fn flag_cue(flag: FlagId) -> Option<Cue> {
    FLAG_REGEXES
        .iter()
        .find(|(f, _, _)| *f == flag)
        .map(|(_, sentence, told)| Cue {
            sentence: (*sentence).to_string(),
            told,
            item: None,
        })
}

/// The cue for an event that happened this turn.
pub(crate) fn event_cue(event: EventId) -> Option<Cue> {
    match event {
        EventId::Pickup(item) => Some(Cue {
            sentence: match item {
                ItemId::Torch => "You pick up a wooden torch.".to_string(),
                _ => format!("You pick up the {item}."),
            },
            told: &PICKUP_RE,
            item: Some(item),
        }),
        EventId::Drop(item) => Some(Cue {
            sentence: format!("You set down the {item}."),
            told: &DROP_RE,
            item: Some(item),
        }),
        _ => EVENT_REGEXES
            .iter()
            .find(|(e, _, _)| *e == event)
            .map(|(_, sentence, told)| Cue {
                sentence: (*sentence).to_string(),
                told,
                item: None,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flag_but_the_hole_has_a_cue() {
        for flag in FlagId::ALL {
            assert_eq!(flag_cue(flag).is_some(), flag != FlagId::EnteredHole, "{flag}");
        }
    }

    #[test]
    fn told_checks_verbs() {
        let cue = event_cue(EventId::GuardPunishes).unwrap();
        assert!(cue.told_in("The guard storms in and strikes you hard."));
        assert!(!cue.told_in("The guard stirs on his bench."));
        assert!(!cue.told_in(
            "You bang your cup on the bars and hit them again and again."
        ));
        assert!(cue.told_in("A heavy blow from the guard sends you reeling."));
    }

    #[test]
    fn item_cues_need_the_item() {
        let cue = event_cue(EventId::Pickup(ItemId::Torch)).unwrap();
        assert_eq!(cue.sentence, "You pick up a wooden torch.");
        assert!(cue.told_in("You grab the stick from the floor."));
        assert!(!cue.told_in("You grab a handful of air."));

        let cue = event_cue(EventId::Drop(ItemId::Coal)).unwrap();
        assert_eq!(cue.sentence, "You set down the lump of coal.");
    }
}
