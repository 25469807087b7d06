//! Coercion of raw narrator output into a typed turn proposal.
//!
//! Nothing here fails: malformed or missing fields fall back to defaults so
//! the worst case is a no-op proposal.

use std::sync::LazyLock;

use castle_core::{EventId, FlagId};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Default progression hint when the narrator omits one.
pub const DEFAULT_PROGRESSION: &str = "stay";

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("valid code fence regex")
});
static OBJECT_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid object span regex"));

/// The narrator's suggestion for one turn. Untrusted until the rule engine
/// has reconciled it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnProposal {
    /// Suggested narration.
    pub narration: String,
    /// Suggested noise level, not yet clamped.
    pub noise_level: i64,
    /// Suggested hp change. The engine decides hp on its own.
    pub hp_delta: i64,
    /// Recognized events, in the order given, without duplicates.
    pub events: Vec<EventId>,
    /// Recognized flag requests, in the order given, without duplicates.
    pub flags_requested: Vec<FlagId>,
    /// Free-form progression hint ("stay", "next_room", ...).
    pub progression_hint: String,
    /// Narrator's explanation for a refusal, if any.
    pub safety_reason: String,
    /// Event or flag names that matched nothing.
    pub unrecognized: Vec<String>,
}

impl Default for TurnProposal {
    fn default() -> Self {
        Self {
            narration: String::new(),
            noise_level: 0,
            hp_delta: 0,
            events: Vec::new(),
            flags_requested: Vec::new(),
            progression_hint: DEFAULT_PROGRESSION.to_string(),
            safety_reason: String::new(),
            unrecognized: Vec::new(),
        }
    }
}

impl TurnProposal {
    /// Coerce any JSON value into a proposal. Non-objects yield the default.
    pub fn coerce(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::default();
        };

        let mut proposal = Self {
            narration: text_field(obj, &["narration"]),
            noise_level: int_field(obj, &["noise_level", "noise"]),
            hp_delta: int_field(obj, &["hp_delta"]),
            safety_reason: text_field(obj, &["safety_reason"]),
            ..Self::default()
        };
        let hint = text_field(obj, &["progression", "progression_hint"]);
        if !hint.is_empty() {
            proposal.progression_hint = hint;
        }

        for name in name_list(first(obj, &["events"])) {
            match EventId::parse(&name) {
                Some(event) => push_unique(&mut proposal.events, event),
                None => proposal.unrecognized.push(name),
            }
        }
        for name in name_list(first(obj, &["flags_set", "flags_requested", "flags"])) {
            if let Some(flag) = FlagId::parse(&name) {
                push_unique(&mut proposal.flags_requested, flag);
            } else if let Some(event) = EventId::from_flag_name(&name) {
                // legacy state names ("torch_lit") map onto their event
                push_unique(&mut proposal.events, event);
            } else {
                proposal.unrecognized.push(name);
            }
        }
        proposal
    }

    /// Parse raw narrator text and coerce it. `None` if no JSON could be found.
    pub fn from_text(text: &str) -> Option<Self> {
        parse_generated_json(text).map(|value| Self::coerce(&value))
    }
}

/// Extract a JSON value from generated text.
///
/// Tries the whole text, then the contents of a markdown code fence, then the
/// outermost `{...}` span.
pub fn parse_generated_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    if let Some(inner) = CODE_FENCE_RE.captures(trimmed).and_then(|c| c.get(1)) {
        if let Ok(value) = serde_json::from_str(inner.as_str()) {
            return Some(value);
        }
    }
    OBJECT_SPAN_RE
        .find(trimmed)
        .and_then(|span| serde_json::from_str(span.as_str()).ok())
}

fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    match first(obj, keys) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn int_field(obj: &Map<String, Value>, keys: &[&str]) -> i64 {
    first(obj, keys).map(to_int).unwrap_or(0)
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Names from a list, a map of booleans (true keys), or a comma-separated string.
fn name_list(value: Option<&Value>) -> Vec<String> {
    let names: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .filter(|(_, v)| truthy(v))
            .map(|(k, _)| k.clone())
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castle_core::ItemId;
    use serde_json::json;

    #[test]
    fn well_formed() {
        let p = TurnProposal::coerce(&json!({
            "narration": "  You shift the straw.  ",
            "noise_level": 1,
            "hp_delta": 0,
            "events": ["straw_rummaged"],
            "flags_set": ["found_loose_stone"],
            "progression": "stay",
            "safety_reason": ""
        }));
        assert_eq!(p.narration, "You shift the straw.");
        assert_eq!(p.noise_level, 1);
        assert_eq!(p.events, vec![EventId::StrawRummaged]);
        assert_eq!(p.flags_requested, vec![FlagId::FoundLooseStone]);
        assert_eq!(p.progression_hint, "stay");
        assert!(p.unrecognized.is_empty());
    }

    #[test]
    fn non_object_is_default() {
        assert_eq!(TurnProposal::coerce(&json!([1, 2])), TurnProposal::default());
        assert_eq!(TurnProposal::coerce(&Value::Null), TurnProposal::default());
    }

    #[test]
    fn numbers_fall_back_to_zero() {
        let p = TurnProposal::coerce(&json!({
            "noise_level": "loud",
            "hp_delta": null
        }));
        assert_eq!(p.noise_level, 0);
        assert_eq!(p.hp_delta, 0);
    }

    #[test]
    fn numeric_strings_and_floats() {
        let p = TurnProposal::coerce(&json!({
            "noise_level": " 2 ",
            "hp_delta": -20.7
        }));
        assert_eq!(p.noise_level, 2);
        assert_eq!(p.hp_delta, -20);

        let p = TurnProposal::coerce(&json!({ "noise_level": "3.0" }));
        assert_eq!(p.noise_level, 3);
    }

    #[test]
    fn map_of_booleans() {
        let p = TurnProposal::coerce(&json!({
            "events": { "straw_rummaged": true, "stone_lifted": false },
            "flags_set": { "found_loose_stone": true }
        }));
        assert_eq!(p.events, vec![EventId::StrawRummaged]);
        assert_eq!(p.flags_requested, vec![FlagId::FoundLooseStone]);
    }

    #[test]
    fn unknown_and_legacy_names() {
        let p = TurnProposal::coerce(&json!({
            "events": ["pickup_stick", "teleport", "pickup_stick"],
            "flags_set": ["torch_lit", "is_king"]
        }));
        assert_eq!(
            p.events,
            vec![EventId::Pickup(ItemId::Torch), EventId::LightTorch]
        );
        assert_eq!(p.unrecognized, vec!["teleport".to_string(), "is_king".to_string()]);
    }

    #[test]
    fn empty_progression_defaults_to_stay() {
        let p = TurnProposal::coerce(&json!({ "progression": "   " }));
        assert_eq!(p.progression_hint, "stay");
        let p = TurnProposal::coerce(&json!({ "progression_hint": "next_room" }));
        assert_eq!(p.progression_hint, "next_room");
    }

    #[test]
    fn non_string_narration() {
        let p = TurnProposal::coerce(&json!({ "narration": ["a", "b"] }));
        assert_eq!(p.narration, "");
    }

    #[test]
    fn parse_plain_json() {
        let v = parse_generated_json(r#"{"narration": "hi"}"#).unwrap();
        assert_eq!(v["narration"], "hi");
    }

    #[test]
    fn parse_fenced_json() {
        let text = "Sure!\n```json\n{\"narration\": \"fenced\"}\n```\n";
        let v = parse_generated_json(text).unwrap();
        assert_eq!(v["narration"], "fenced");
    }

    #[test]
    fn parse_embedded_object() {
        let text = "Here you go: {\"noise_level\": 2} hope that helps";
        let v = parse_generated_json(text).unwrap();
        assert_eq!(v["noise_level"], 2);
    }

    #[test]
    fn parse_garbage() {
        assert!(parse_generated_json("the torch sputters").is_none());
        assert!(parse_generated_json("").is_none());
        assert!(TurnProposal::from_text("{ not json").is_none());
    }
}
