//! Item name resolution with fuzzy matching.

use strsim::jaro_winkler;

use castle_core::{ItemId, RoomId};

use super::patterns::VAGUE_NOUNS;

/// Minimum similarity score for fuzzy matching (0.0-1.0).
///
/// Item nouns are short, so this sits above the usual 0.8; "coat" must not
/// resolve to "coal".
const FUZZY_THRESHOLD: f64 = 0.9;

/// Resolve the items named in a clause, in the order they appear.
///
/// Multi-word nouns ("lump of coal") match as substrings; single words match
/// exactly or fuzzily ("candelstick").
pub fn items_in(clause: &str) -> Vec<ItemId> {
    let words: Vec<&str> = clause
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .collect();

    let mut found: Vec<(usize, ItemId)> = Vec::new();
    for item in ItemId::ALL {
        let position = item.nouns().iter().find_map(|noun| {
            if noun.contains(' ') {
                let first = noun.split(' ').next().unwrap_or(noun);
                clause
                    .contains(noun)
                    .then(|| words.iter().position(|w| *w == first))
                    .flatten()
            } else {
                words.iter().position(|w| word_matches(w, noun))
            }
        });
        if let Some(position) = position {
            found.push((position, item));
        }
    }

    found.sort_by_key(|(position, _)| *position);
    found.into_iter().map(|(_, item)| item).collect()
}

/// Whether the clause refers to an unnamed object ("pick it up").
pub fn mentions_vague_object(clause: &str) -> bool {
    clause
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| VAGUE_NOUNS.contains(&w))
}

/// The item an unnamed object most likely refers to in `room`.
pub fn vague_item_for(room: RoomId) -> Option<ItemId> {
    ItemId::ALL.into_iter().find(|item| item.home_room() == room)
}

fn word_matches(word: &str, noun: &str) -> bool {
    if word == noun || word.strip_suffix('s') == Some(noun) {
        return true;
    }
    word.len() >= 4 && jaro_winkler(word, noun) >= FUZZY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_nouns() {
        assert_eq!(items_in("pick up the torch"), vec![ItemId::Torch]);
        assert_eq!(items_in("grab the lump of coal"), vec![ItemId::Coal]);
        assert_eq!(items_in("take the stick"), vec![ItemId::Torch]);
    }

    #[test]
    fn fuzzy_typo() {
        assert_eq!(items_in("take the candelstick"), vec![ItemId::Candlestick]);
        assert_eq!(items_in("grab the torhc"), vec![ItemId::Torch]);
    }

    #[test]
    fn no_false_friends() {
        assert!(items_in("take off my coat").is_empty());
        assert!(items_in("lift the stone").is_empty());
    }

    #[test]
    fn order_of_appearance() {
        assert_eq!(
            items_in("swap the coal for the torch"),
            vec![ItemId::Coal, ItemId::Torch]
        );
    }

    #[test]
    fn vague_objects() {
        assert!(mentions_vague_object("pick it up"));
        assert!(mentions_vague_object("feel for the object at my feet"));
        assert!(!mentions_vague_object("pick up the torch"));
        assert_eq!(vague_item_for(RoomId::CoalCellar), Some(ItemId::Torch));
        assert_eq!(vague_item_for(RoomId::Cell), None);
    }
}
