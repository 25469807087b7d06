//! Prompt text sent to the narrator.

use castle_core::{WorldState, scene};

/// System prompt describing the narrator's job and the reply schema.
pub const SYSTEM_PROMPT: &str = r#"You are the Game Master for a grounded, text-based escape adventure.
Follow the CURRENT ROOM's scene card and the rules below. Respond in VALID JSON only.

Global rules:
- English only. Interpret player intent semantically.
- Evaluate noise_level (0-3) using the current room's scale; it resets next turn.
- In cell_01, if noise_level >= 2 the guard strikes once (-20 HP) and you MUST narrate it.
- If the player's action mentions the straw or the straw bed and the loose stone is not discovered yet, add 'straw_rummaged' to events and 'found_loose_stone' to flags_set.
- Moving the stone requires an explicit attempt to lift, pry, or drag it ('stone_lifted').
- Never invent items, tools, magic, or exits beyond the active scene card.
- Narration: immersive 2nd person, at most ~3 sentences, announce each key outcome ONCE.
- If the action is impossible, or nothing meaningful changes, end with "Nothing happened."
- Report what happened with semantic events ('enter_coal_cellar', 'return_to_cell', 'open_hall_door', 'climb_to_hall', 'fight_guard', 'enter_courtyard', 'climb_gatehouse', 'pull_gate_lever', 'escape_through_gate', 'light_torch', 'pickup_torch', 'drop_coal', ...).

Coal cellar:
- Without a lit torch the cellar is pitch-black; describe only touch, sound, and smell.
- The object at the player's feet is a wooden torch; reveal that only when it is picked up.
- The torch can be lit ONLY in the Prison Cell, from the wall torch.

Return a single JSON object with this schema:
{
  "narration": string,
  "noise_level": integer,
  "hp_delta": integer,
  "events": string[],
  "flags_set": string[],
  "progression": string,
  "safety_reason": string
}
"#;

/// Appended to the user prompt when the narrator's first reply was unusable.
pub const STRICT_RETRY: &str =
    "\n\nYour last output was invalid JSON. Respond again with VALID JSON ONLY.";

const REMINDERS: &str = "\
- Prison Cell only: noise >= 2 means the guard unlocks, strikes (-20 HP), and returns (must narrate).
- Straw-only actions never move the stone; lifting it reveals a crawlable hole into the coal cellar.
- Coal Cellar: moving around without a lit torch makes you stumble (-10 HP) and you stay where you are.
- Only one item can be held at a time.
- The hall guard must be dealt with before the double doors can be reached.
- The portcullis winch is on the gatehouse wall-walk; the gate only opens once it is raised.
- Announce each key outcome exactly once; avoid repetition.";

/// Build the per-turn user prompt for `action` in the current room.
pub fn user_prompt(state: &WorldState, action: &str) -> String {
    let room = state.room();
    let card = scene::card(room);
    let scene_card =
        serde_json::to_string_pretty(card).unwrap_or_else(|_| format!("{{\"room_id\": \"{room}\"}}"));
    let flags = serde_json::to_string(&state.flags_by_room()).unwrap_or_default();
    let inventory = serde_json::to_string(&state.inventory()).unwrap_or_default();

    format!(
        "CURRENT ROOM:\n\
         - Id: {id}\n\
         - Title: {title}\n\
         - Footing: {footing}\n\n\
         SCENE CARD:\n{scene_card}\n\n\
         CURRENT STATE:\n\
         - HP: {hp}\n\
         - Flags: {flags}\n\
         - Inventory: {inventory}\n\n\
         REMINDERS:\n{REMINDERS}\n\n\
         PLAYER ACTION:\n{action}\n\n\
         IMPORTANT:\n\
         - Output VALID JSON ONLY matching the schema above. No backticks, no code fences, no commentary.\n\
         - Keep narration concise (<= ~3 sentences).\n",
        id = room.as_str(),
        title = card.title,
        footing = state.footing(),
        hp = state.hp(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_room_and_action() {
        let state = WorldState::new();
        let prompt = user_prompt(&state, "search the straw");
        assert!(prompt.contains("- Id: cell_01"));
        assert!(prompt.contains("- HP: 100"));
        assert!(prompt.contains("\"room_id\": \"cell_01\""));
        assert!(prompt.contains("PLAYER ACTION:\nsearch the straw"));
        assert!(prompt.contains("- Inventory: []"));
    }

    #[test]
    fn system_prompt_declares_schema() {
        for key in ["narration", "noise_level", "hp_delta", "events", "flags_set", "progression"] {
            assert!(SYSTEM_PROMPT.contains(key), "{key}");
        }
    }
}
