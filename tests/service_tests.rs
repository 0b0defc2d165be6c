mod common;

use serde_json::json;

use deckforge::event::EventType;
use deckforge::master::AreaItemLevel;
use deckforge::service::{AreaItemService, DeckService, EventService};

#[tokio::test]
async fn event_type_parses_known_kinds_and_rejects_others() {
    let service = EventService::new(common::provider());
    assert_eq!(
        service.get_event_type(1).await.expect("event type"),
        EventType::Marathon
    );
    // Event 9 carries an unhandled type string.
    assert!(service.get_event_type(9).await.is_err());
    // Unknown event id.
    assert!(service.get_event_type(404).await.is_err());
}

#[tokio::test]
async fn marathon_event_config_uses_the_defaults() {
    let service = EventService::new(common::provider());
    let config = service.get_event_config(1, 0).await.expect("event config");
    assert_eq!(config.event_id, 1);
    assert_eq!(config.event_type, EventType::Marathon);
    assert_eq!(config.card_bonus_count_limit, 5);
    assert_eq!(config.skill_score_up_limit, f64::INFINITY);
    assert!(config.event_unit.is_none());
    assert!(config.world_bloom_different_attribute_bonuses.is_none());
    assert!(!config.is_world_bloom_finale());
}

fn level(area_item_id: i64, level: i32) -> AreaItemLevel {
    serde_json::from_value(json!({
        "areaItemId": area_item_id,
        "level": level,
        "targetUnit": "any",
        "targetCardAttr": "any",
        "power1BonusRate": 0.0,
        "power1AllMatchBonusRate": 0.0,
        "power2BonusRate": 0.0,
        "power2AllMatchBonusRate": 0.0,
        "power3BonusRate": 0.0,
        "power3AllMatchBonusRate": 0.0
    }))
    .expect("area item level")
}

#[tokio::test]
async fn shop_rows_switch_blocks_above_level_ten() {
    let service = AreaItemService::new(common::provider());
    let low = service
        .get_shop_item(&level(1, 3))
        .await
        .expect("shop item");
    assert_eq!(low.id, 1003);
    let high = service
        .get_shop_item(&level(1, 11))
        .await
        .expect("shop item");
    assert_eq!(high.id, 1551);
    assert_eq!(high.costs.len(), 2);
}

#[tokio::test]
async fn empty_user_areas_own_no_area_items() {
    let service = AreaItemService::new(common::provider());
    let levels = service.get_area_item_levels().await.expect("levels");
    assert!(levels.is_empty());
}

#[tokio::test]
async fn deck_lookup_resolves_members_to_user_cards() {
    let mut user = common::base_user_data();
    user["userDecks"] = json!([{
        "userId": 1,
        "deckId": 7,
        "name": "main",
        "leader": 101,
        "subLeader": 102,
        "member1": 101,
        "member2": 102,
        "member3": 103,
        "member4": 104,
        "member5": 105
    }]);
    let service = DeckService::new(common::provider_with(common::base_master_data(), user));
    let deck = service.get_deck(7).await.expect("user deck");
    let cards = service.get_deck_cards(&deck).await.expect("deck cards");
    assert_eq!(cards.len(), 5);
    assert_eq!(cards[0].card_id, 101);
    assert_eq!(cards[4].card_id, 105);
    assert!(service.get_deck(8).await.is_err());
}

#[tokio::test]
async fn missing_user_card_is_an_error() {
    let service = DeckService::new(common::provider());
    assert!(service.get_user_card(999).await.is_err());
    assert!(service.get_user_card(101).await.is_ok());
}
