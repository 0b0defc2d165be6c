use std::collections::HashSet;
use std::sync::Arc;

use crate::card::{CardCalculator, CardDetail};
use crate::config::CardConfigMap;
use crate::error::DfResult;
use crate::event::EventCalculator;
use crate::provider::CachedDataProvider;
use crate::service::EventService;
use crate::user::UserCard;

/// Picks the world-bloom support deck: the 20 highest-bonus owned cards
/// that are not already in the main deck.
pub struct BloomSupportDeckRecommend {
    provider: Arc<CachedDataProvider>,
    card_calculator: CardCalculator,
    event_service: EventService,
}

impl BloomSupportDeckRecommend {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            card_calculator: CardCalculator::new(provider.clone()),
            event_service: EventService::new(provider.clone()),
            provider,
        }
    }

    pub async fn recommend_bloom_support_deck(
        &self,
        main_deck_card_ids: &[i64],
        event_id: i64,
        special_character_id: i64,
    ) -> DfResult<Vec<CardDetail>> {
        let user_cards = self.provider.user::<Vec<UserCard>>("userCards").await?;
        let event_config = self
            .event_service
            .get_event_config(event_id, special_character_id)
            .await?;
        let all_cards = self
            .card_calculator
            .batch_get_card_detail(&user_cards, &CardConfigMap::new(), &event_config, None)
            .await?;
        let deck_card_ids: HashSet<i64> = main_deck_card_ids.iter().copied().collect();
        Ok(EventCalculator::get_support_deck_bonus(&deck_card_ids, &all_cards).1)
    }
}
