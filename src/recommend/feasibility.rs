//! Can the admitted card set form a legal deck at all?

use std::collections::{HashMap, HashSet};

use crate::card::CardDetail;
use crate::event::EventType;
use crate::live::LiveType;
use crate::master::{Attr, Unit};

/// World-bloom chapters score one tier per distinct attribute, so a viable
/// pool must be able to field five distinct characters with five distinct
/// attributes. That is a bipartite matching between attributes and
/// characters.
pub fn check_attr_for_bloom(attr_map: &HashMap<Attr, HashSet<i64>>) -> bool {
    if attr_map.len() < 5 {
        return false;
    }
    if attr_map.values().map(|it| it.len()).min().unwrap_or(0) >= 5 {
        return true;
    }
    let mut matched_char: HashMap<i64, Attr> = HashMap::new();
    let mut matched = 0usize;
    for &attr in attr_map.keys() {
        let mut visited: HashSet<Attr> = HashSet::new();
        if augment(attr_map, attr, &mut matched_char, &mut visited) {
            matched += 1;
        }
    }
    matched == 5
}

/// Kuhn's augmenting path: take a free character, or evict a matched
/// attribute and re-seat it elsewhere.
fn augment(
    attr_map: &HashMap<Attr, HashSet<i64>>,
    attr: Attr,
    matched_char: &mut HashMap<i64, Attr>,
    visited: &mut HashSet<Attr>,
) -> bool {
    visited.insert(attr);
    let Some(chars_for_attr) = attr_map.get(&attr) else {
        return false;
    };
    for &character in chars_for_attr {
        if !matched_char.contains_key(&character) {
            matched_char.insert(character, attr);
            return true;
        }
    }
    for &character in chars_for_attr {
        let Some(&attr_for_char) = matched_char.get(&character) else {
            continue;
        };
        if !visited.contains(&attr_for_char)
            && augment(attr_map, attr_for_char, matched_char, visited)
        {
            matched_char.insert(character, attr);
            return true;
        }
    }
    false
}

/// Whether the cards can fill a deck under the mode's composition rules.
pub fn can_make_deck(
    live_type: LiveType,
    event_type: EventType,
    cards: &[&CardDetail],
    member: usize,
) -> bool {
    let mut attr_map: HashMap<Attr, HashSet<i64>> = HashMap::new();
    let mut unit_map: HashMap<Unit, HashSet<i64>> = HashMap::new();
    for card in cards {
        // Challenge decks may repeat a character, so count cards there.
        let id = if live_type == LiveType::Challenge {
            card.card_id
        } else {
            card.character_id
        };
        attr_map.entry(card.attr).or_default().insert(id);
        for &unit in &card.units {
            unit_map.entry(unit).or_default().insert(card.character_id);
        }
    }
    if live_type == LiveType::Challenge {
        if member < 5 {
            return cards.len() >= member;
        }
        return attr_map.values().all(|it| it.len() >= 5);
    }
    match event_type {
        EventType::Marathon | EventType::Cheerful => {
            attr_map.values().any(|it| it.len() >= 5)
                || unit_map.values().any(|it| it.len() >= 5)
        }
        EventType::Bloom => {
            unit_map.values().any(|it| it.len() >= 5) && check_attr_for_bloom(&attr_map)
        }
        EventType::None => false,
    }
}

/// Bloom-only prune: with three or more slots taken, a deck that cannot
/// reach three distinct attributes is never worth extending.
pub fn is_deck_attr_less_than_3(deck_cards: &[&CardDetail], candidate: &CardDetail) -> bool {
    if deck_cards.len() <= 2 {
        return false;
    }
    let mut attrs: HashSet<Attr> = HashSet::new();
    attrs.insert(candidate.attr);
    for card in deck_cards {
        attrs.insert(card.attr);
    }
    if deck_cards.len() == 3 {
        return attrs.len() < 2;
    }
    attrs.len() < 3
}
