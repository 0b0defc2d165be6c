use deckforge::card::CardDetail;
use deckforge::detail_map::{PowerMap, SkillMap};
use deckforge::event::EventType;
use deckforge::live::LiveType;
use deckforge::master::{Attr, CardRarityType, Unit};
use deckforge::recommend::feasibility::{can_make_deck, is_deck_attr_less_than_3};

fn card(card_id: i64, character_id: i64, attr: Attr, unit: Unit) -> CardDetail {
    CardDetail {
        card_id,
        level: 1,
        skill_level: 1,
        master_rank: 0,
        card_rarity_type: CardRarityType::Rarity4,
        character_id,
        units: vec![unit],
        attr,
        power: PowerMap::new(),
        skill: SkillMap::new(),
        event_bonus: None,
        support_deck_bonus: None,
        has_canvas_bonus: false,
    }
}

#[test]
fn marathon_needs_five_of_one_attr_or_unit() {
    let same_unit: Vec<CardDetail> = (1..=5)
        .map(|i| card(i, i, Attr::Cool, Unit::LightSound))
        .collect();
    let refs: Vec<&CardDetail> = same_unit.iter().collect();
    assert!(can_make_deck(LiveType::Multi, EventType::Marathon, &refs, 5));

    let mixed: Vec<CardDetail> = vec![
        card(1, 1, Attr::Cool, Unit::LightSound),
        card(2, 2, Attr::Cute, Unit::Idol),
        card(3, 3, Attr::Happy, Unit::Street),
        card(4, 4, Attr::Mysterious, Unit::ThemePark),
    ];
    let refs: Vec<&CardDetail> = mixed.iter().collect();
    assert!(!can_make_deck(LiveType::Multi, EventType::Marathon, &refs, 5));
}

#[test]
fn marathon_counts_characters_not_cards() {
    // Five cool cards, but two belong to the same character.
    let cards: Vec<CardDetail> = vec![
        card(1, 1, Attr::Cool, Unit::LightSound),
        card(2, 1, Attr::Cool, Unit::LightSound),
        card(3, 3, Attr::Cool, Unit::Idol),
        card(4, 4, Attr::Cool, Unit::Street),
        card(5, 5, Attr::Cool, Unit::ThemePark),
    ];
    let refs: Vec<&CardDetail> = cards.iter().collect();
    assert!(!can_make_deck(LiveType::Multi, EventType::Marathon, &refs, 5));
}

#[test]
fn challenge_allows_short_decks_and_repeated_characters() {
    let cards: Vec<CardDetail> = vec![
        card(1, 1, Attr::Cool, Unit::LightSound),
        card(2, 1, Attr::Cute, Unit::LightSound),
        card(3, 1, Attr::Happy, Unit::LightSound),
    ];
    let refs: Vec<&CardDetail> = cards.iter().collect();
    assert!(can_make_deck(LiveType::Challenge, EventType::None, &refs, 3));
    assert!(!can_make_deck(LiveType::Challenge, EventType::None, &refs[..2], 3));
}

#[test]
fn bloom_needs_a_full_unit_and_five_matchable_attrs() {
    let attrs = [
        Attr::Cool,
        Attr::Cute,
        Attr::Happy,
        Attr::Mysterious,
        Attr::Pure,
    ];
    let cards: Vec<CardDetail> = attrs
        .iter()
        .enumerate()
        .map(|(i, &attr)| card(i as i64 + 1, i as i64 + 1, attr, Unit::LightSound))
        .collect();
    let refs: Vec<&CardDetail> = cards.iter().collect();
    assert!(can_make_deck(LiveType::Multi, EventType::Bloom, &refs, 5));

    // Four attributes can never fill five distinct-attribute slots.
    assert!(!can_make_deck(LiveType::Multi, EventType::Bloom, &refs[..4], 5));
}

#[test]
fn bloom_rejects_attrs_that_share_their_only_character() {
    // Character 1 carries both cool and cute; no assignment can give five
    // distinct characters five distinct attributes.
    let cards: Vec<CardDetail> = vec![
        card(1, 1, Attr::Cool, Unit::LightSound),
        card(2, 1, Attr::Cute, Unit::LightSound),
        card(3, 2, Attr::Happy, Unit::LightSound),
        card(4, 3, Attr::Mysterious, Unit::LightSound),
        card(5, 4, Attr::Pure, Unit::LightSound),
        card(6, 5, Attr::Happy, Unit::LightSound),
    ];
    let refs: Vec<&CardDetail> = cards.iter().collect();
    assert!(!can_make_deck(LiveType::Multi, EventType::Bloom, &refs, 5));
}

#[test]
fn bloom_matching_reassigns_through_augmenting_paths() {
    // Cool's only character also carries cute, but cool has an alternative.
    let cards: Vec<CardDetail> = vec![
        card(1, 1, Attr::Cool, Unit::LightSound),
        card(2, 1, Attr::Cute, Unit::LightSound),
        card(3, 2, Attr::Cool, Unit::LightSound),
        card(4, 3, Attr::Happy, Unit::LightSound),
        card(5, 4, Attr::Mysterious, Unit::LightSound),
        card(6, 5, Attr::Pure, Unit::LightSound),
    ];
    let refs: Vec<&CardDetail> = cards.iter().collect();
    assert!(can_make_deck(LiveType::Multi, EventType::Bloom, &refs, 5));
}

#[test]
fn no_event_means_no_event_deck() {
    let cards: Vec<CardDetail> = (1..=5)
        .map(|i| card(i, i, Attr::Cool, Unit::LightSound))
        .collect();
    let refs: Vec<&CardDetail> = cards.iter().collect();
    assert!(!can_make_deck(LiveType::Multi, EventType::None, &refs, 5));
}

#[test]
fn attr_diversity_prune_kicks_in_from_the_fourth_slot() {
    let a = card(1, 1, Attr::Cool, Unit::LightSound);
    let b = card(2, 2, Attr::Cool, Unit::LightSound);
    let c = card(3, 3, Attr::Cool, Unit::LightSound);
    let d = card(4, 4, Attr::Cute, Unit::LightSound);
    let candidate_same = card(5, 5, Attr::Cool, Unit::LightSound);
    let candidate_new = card(6, 5, Attr::Cute, Unit::LightSound);
    let candidate_third = card(7, 5, Attr::Happy, Unit::LightSound);

    // Two slots taken: never pruned.
    assert!(!is_deck_attr_less_than_3(&[&a, &b], &candidate_same));
    // Three slots, all cool: a fourth cool card cannot reach two attrs.
    assert!(is_deck_attr_less_than_3(&[&a, &b, &c], &candidate_same));
    assert!(!is_deck_attr_less_than_3(&[&a, &b, &c], &candidate_new));
    // Four slots with two attrs: the fifth must bring the third.
    assert!(is_deck_attr_less_than_3(&[&a, &b, &c, &d], &candidate_same));
    assert!(!is_deck_attr_less_than_3(&[&a, &b, &c, &d], &candidate_third));
}
