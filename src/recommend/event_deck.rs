use std::sync::Arc;

use crate::config::DeckRecommendConfig;
use crate::error::DfResult;
use crate::event::EventCalculator;
use crate::live::LiveType;
use crate::provider::CachedDataProvider;
use crate::recommend::{BaseDeckRecommend, RecommendDeck};
use crate::service::EventService;
use crate::user::UserCard;

/// Maximizes event points for a given event and live mode.
pub struct EventDeckRecommend {
    provider: Arc<CachedDataProvider>,
    base_recommend: BaseDeckRecommend,
    event_service: EventService,
}

impl EventDeckRecommend {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            base_recommend: BaseDeckRecommend::new(provider.clone()),
            event_service: EventService::new(provider.clone()),
            provider,
        }
    }

    /// Pass the chapter character for world-bloom events, 0 otherwise.
    pub async fn recommend_event_deck(
        &self,
        event_id: i64,
        live_type: LiveType,
        config: &DeckRecommendConfig,
        special_character_id: i64,
    ) -> DfResult<Vec<RecommendDeck>> {
        let event_config = self
            .event_service
            .get_event_config(event_id, special_character_id)
            .await?;
        let user_cards = self.provider.user::<Vec<UserCard>>("userCards").await?;
        self.base_recommend
            .recommend_high_score_deck(
                &user_cards,
                EventCalculator::get_event_point_function(live_type, event_config.event_type),
                config,
                live_type,
                &event_config,
            )
            .await
    }
}
