mod common;

use rstest::rstest;

use deckforge::event::{EventCalculator, EventType};
use deckforge::live::LiveType;

#[rstest]
#[case::solo_plain(2_000_000.0, 100.0, 0.0, 200.0)]
#[case::solo_with_bonus(2_000_000.0, 100.0, 25.0, 250.0)]
#[case::solo_harder_chart(1_500_000.0, 110.0, 25.0, 240.0)]
#[case::solo_score_floors(1_999_999.0, 100.0, 0.0, 199.0)]
fn solo_points_scale_with_score_music_and_bonus(
    #[case] score: f64,
    #[case] music_rate: f64,
    #[case] deck_bonus: f64,
    #[case] expected: f64,
) {
    let points = EventCalculator::get_event_point(
        LiveType::Solo,
        EventType::Marathon,
        score,
        music_rate,
        deck_bonus,
        1.0,
        0.0,
        1000.0,
    )
    .expect("event points");
    assert_eq!(points, expected);
}

#[test]
fn boost_multiplies_after_the_floor() {
    let points = EventCalculator::get_event_point(
        LiveType::Solo,
        EventType::Marathon,
        1_500_000.0,
        110.0,
        25.0,
        10.0,
        0.0,
        1000.0,
    )
    .expect("event points");
    assert_eq!(points, 2400.0);
}

#[test]
fn marathon_reference_points_with_boost() {
    let points = EventCalculator::get_event_point(
        LiveType::Solo,
        EventType::Marathon,
        1_000_000.0,
        100.0,
        250.0,
        15.0,
        0.0,
        1000.0,
    )
    .expect("event points");
    // floor(150 * 1.0 * 3.5) * 15.
    assert_eq!(points, 7875.0);
}

#[test]
fn challenge_points_ignore_music_and_bonus() {
    let points = EventCalculator::get_event_point(
        LiveType::Challenge,
        EventType::None,
        2_500_000.0,
        47.0,
        300.0,
        1.0,
        0.0,
        1000.0,
    )
    .expect("event points");
    assert_eq!(points, (100.0 + 125.0) * 120.0);
}

#[test]
fn multi_estimates_an_empty_room_as_four_copies_of_self() {
    let explicit = EventCalculator::get_event_point(
        LiveType::Multi,
        EventType::Marathon,
        1_700_000.0,
        100.0,
        0.0,
        1.0,
        4.0 * 1_700_000.0,
        1000.0,
    )
    .expect("event points");
    let estimated = EventCalculator::get_event_point(
        LiveType::Multi,
        EventType::Marathon,
        1_700_000.0,
        100.0,
        0.0,
        1.0,
        0.0,
        1000.0,
    )
    .expect("event points");
    assert_eq!(explicit, estimated);
    // 110 + floor(1.7M / 17000) + capped room term.
    assert_eq!(explicit, 110.0 + 100.0 + 13.0);
}

#[test]
fn multi_room_term_is_capped_at_13() {
    let low_room = EventCalculator::get_event_point(
        LiveType::Multi,
        EventType::Marathon,
        1_700_000.0,
        100.0,
        0.0,
        1.0,
        340_000.0,
        1000.0,
    )
    .expect("event points");
    assert_eq!(low_room, 110.0 + 100.0 + 1.0);
}

#[test]
fn multi_is_rejected_during_cheerful_carnival() {
    assert!(EventCalculator::get_event_point(
        LiveType::Multi,
        EventType::Cheerful,
        1_000_000.0,
        100.0,
        0.0,
        1.0,
        0.0,
        1000.0,
    )
    .is_err());
}

#[test]
fn cheerful_is_rejected_outside_cheerful_carnival() {
    assert!(EventCalculator::get_event_point(
        LiveType::Cheerful,
        EventType::Marathon,
        1_000_000.0,
        100.0,
        0.0,
        1.0,
        0.0,
        1000.0,
    )
    .is_err());
}

#[rstest]
#[case::life_floor(0.0, 1.25)]
#[case::life_cap(2000.0, 1.35)]
#[case::life_midway(750.0, 1.3)]
fn cheerful_life_rate_is_clamped(#[case] life: f64, #[case] life_rate: f64) {
    let points = EventCalculator::get_event_point(
        LiveType::Cheerful,
        EventType::Cheerful,
        1_700_000.0,
        100.0,
        0.0,
        1.0,
        0.0,
        life,
    )
    .expect("event points");
    assert_eq!(points, (223.0 * life_rate).floor());
}
