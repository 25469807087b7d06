//! Narration arbiter: makes the narrator's prose agree with the outcome.
//!
//! The narrator writes before the engine decides, so its text may describe
//! things that did not happen. [`arbitrate`] removes sentences that contradict
//! the [`Outcome`], appends canonical sentences for outcomes the text left
//! out, and replaces the narration of a turn where nothing happened.

mod cues;

use std::sync::LazyLock;

use castle_core::{EventId, RoomId, scene};
use regex::Regex;

use crate::engine::Outcome;

use cues::{Cue, event_cue, flag_cue};

/// Canonical narration for a turn where nothing changed.
pub const NOTHING_HAPPENED: &str = "Nothing happened.";
/// Narration for a look in a lit room when the narrator offered nothing.
pub const LOOK_FALLBACK: &str = "You take a careful look around.";
/// Narration replacing visual claims made in darkness.
pub const TOO_DARK: &str = "It is too dark to make out anything.";

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^.!?]+[.!?]*["')]*"#).expect("valid sentence regex"));
static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:nothing(?: special| much| else)? (?:happened|happens)|the scene remains as it was)[.!]*$")
        .expect("valid boilerplate regex")
});
static VISUAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:see|sees|saw|seen|spot\w*|notice\w*|glimps\w*|make out|made out|visible|gleam\w*|glint\w*|shimmer\w*|shadow\w*|colou?r\w*|glow\w*|flicker\w*|illuminat\w*|shin(?:e|es|ing)|bright\w*|torchlight|lit)\b")
        .expect("valid visual regex")
});
static DARKNESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:dark|darkness|pitch|black|blind\w*|cannot see|can't see|nothing)\b")
        .expect("valid darkness regex")
});
static TOO_DARK_CLAIM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:too dark|pitch[- ]black|pitch[- ]dark|cannot see|can't see|unable to see|total darkness|utter darkness)\b")
        .expect("valid darkness claim regex")
});
static STRIKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bguard\b.*\b(?:strikes|struck|hits|beats|clubs|punches|kicks|slams|knocks)\b|\b(?:strike|struck|hit|beat|club|punch|kick|knock)\w*\b.*\bguard\b|\b(?:unconscious|out cold|senseless)\b")
        .expect("valid strike regex")
});
static OBLIVIOUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:guard|he)\b.*\b(?:sleeps|asleep|snores|snoring|oblivious|unaware|undisturbed|does not notice|doesn't notice|never notices|does not stir|doesn't stir|does not wake|doesn't wake|never wakes|keeps dozing|dozes on|keeps sleeping|goes on sleeping)\b")
        .expect("valid oblivious regex")
});
static ARRIVAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\byou (?:now )?(?:find yourself|arrive|emerge|enter|reach|are now in|step (?:into|out|through)|crawl (?:into|through)|squeeze (?:into|through)|climb (?:into|up into|through|up to))\b")
        .expect("valid arrival regex")
});
static ESCAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:you escape|you are free|freedom at last|you have escaped|beyond the castle walls)\b")
        .expect("valid escape regex")
});

/// Correct `narration` so it agrees with `outcome`.
///
/// A turn where nothing changed is narrated as its denials followed by
/// [`NOTHING_HAPPENED`], except for a pure look, which keeps the narrator's
/// description.
pub fn arbitrate(narration: &str, outcome: &Outcome) -> String {
    let final_room = outcome.room_transition.unwrap_or(outcome.room);
    let mut sentences: Vec<String> = sentences(narration)
        .filter(|s| !BOILERPLATE_RE.is_match(s))
        .collect();

    let mut blinded = false;
    if !outcome.light_present {
        let before = sentences.len();
        sentences.retain(|s| !VISUAL_RE.is_match(s) || DARKNESS_RE.is_match(s));
        blinded = sentences.len() != before;
    } else if final_room == RoomId::CoalCellar {
        sentences.retain(|s| !TOO_DARK_CLAIM_RE.is_match(s));
        for sentence in &mut sentences {
            *sentence = brighten(sentence);
        }
    }

    let fought = outcome.has_event(EventId::GuardPunishes) || outcome.has_event(EventId::FightGuard);
    if !fought {
        sentences.retain(|s| !STRIKE_RE.is_match(s));
    }
    if outcome.has_event(EventId::GuardPunishes) {
        sentences.retain(|s| !OBLIVIOUS_RE.is_match(s));
    }
    if outcome.room_transition.is_none() && outcome.footing_change.is_none() {
        sentences.retain(|s| !ARRIVAL_RE.is_match(s));
    }
    if !outcome.game_won {
        sentences.retain(|s| !ESCAPE_RE.is_match(s));
    }
    if blinded {
        sentences.push(TOO_DARK.to_string());
    }

    if outcome.is_noop() {
        if outcome.look_only {
            if sentences.is_empty() {
                let fallback = if outcome.light_present { LOOK_FALLBACK } else { TOO_DARK };
                return fallback.to_string();
            }
            return sentences.join(" ");
        }
        let mut parts = outcome.denials.clone();
        parts.push(NOTHING_HAPPENED.to_string());
        return parts.join(" ");
    }

    let told = sentences.join(" ");
    for cue in required_cues(outcome) {
        if !cue.told_in(&told) && !sentences.contains(&cue.sentence) {
            sentences.push(cue.sentence);
        }
    }
    for denial in &outcome.denials {
        if !sentences.contains(denial) {
            sentences.push(denial.clone());
        }
    }
    if sentences.is_empty() {
        return scene::card(final_room).ambient.to_string();
    }
    sentences.join(" ")
}

fn required_cues(outcome: &Outcome) -> Vec<Cue> {
    let flag_events: Vec<EventId> = outcome.new_flags.iter().map(|f| f.source_event()).collect();
    let mut cues: Vec<Cue> = outcome.new_flags.iter().filter_map(|f| flag_cue(*f)).collect();
    cues.extend(
        outcome
            .events
            .iter()
            .filter(|e| !flag_events.contains(e))
            .filter_map(|e| event_cue(*e)),
    );
    cues
}

fn sentences(text: &str) -> impl Iterator<Item = String> + '_ {
    SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn brighten(sentence: &str) -> String {
    sentence
        .replace("in the dark coal cellar", "in the coal cellar")
        .replace("In the dark coal cellar", "In the coal cellar")
        .replace("in the dark", "by torchlight")
        .replace("In the dark", "By torchlight")
}
