mod common;

use deckforge::config::DeckRecommendConfig;
use deckforge::error::DeckForgeError;
use deckforge::recommend::ChallengeLiveDeckRecommend;

#[tokio::test]
async fn challenge_recommend_finds_the_single_card_deck() {
    let recommend = ChallengeLiveDeckRecommend::new(common::provider());
    let config = DeckRecommendConfig::new(common::fixture_music_meta());
    let decks = recommend
        .recommend_challenge_live_deck(1, &config)
        .await
        .expect("challenge decks");
    assert_eq!(decks.len(), 1);
    let best = &decks[0];
    assert_eq!(best.deck.cards.len(), 1);
    assert_eq!(best.deck.cards[0].card_id, 101);
    // One 100% skill plus its encore over weight 0.25 each, power 30000.
    assert_eq!(best.score, (2.0 + 2.0 * 0.25) * 30000.0 * 4.0);
}

#[tokio::test]
async fn challenge_recommend_without_cards_is_infeasible() {
    let recommend = ChallengeLiveDeckRecommend::new(common::provider());
    let config = DeckRecommendConfig::new(common::fixture_music_meta());
    let err = recommend
        .recommend_challenge_live_deck(99, &config)
        .await
        .expect_err("no cards for this character");
    assert!(matches!(err, DeckForgeError::Infeasible(_)));
}

#[tokio::test]
async fn recommendation_is_idempotent() {
    let recommend = ChallengeLiveDeckRecommend::new(common::provider());
    let config = DeckRecommendConfig::new(common::fixture_music_meta());
    let first = recommend
        .recommend_challenge_live_deck(1, &config)
        .await
        .expect("challenge decks");
    let second = recommend
        .recommend_challenge_live_deck(1, &config)
        .await
        .expect("challenge decks");
    let ids = |decks: &[deckforge::recommend::RecommendDeck]| -> Vec<Vec<i64>> {
        decks
            .iter()
            .map(|it| it.deck.cards.iter().map(|card| card.card_id).collect())
            .collect()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(
        first.iter().map(|it| it.score).collect::<Vec<_>>(),
        second.iter().map(|it| it.score).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn limit_bounds_the_number_of_returned_decks() {
    let recommend = ChallengeLiveDeckRecommend::new(common::provider());
    let mut config = DeckRecommendConfig::new(common::fixture_music_meta());
    config.limit = 3;
    let decks = recommend
        .recommend_challenge_live_deck(1, &config)
        .await
        .expect("challenge decks");
    // Only one card exists for the character, so only one deck can form.
    assert_eq!(decks.len(), 1);
}
