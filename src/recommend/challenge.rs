use std::sync::Arc;

use crate::config::{DeckRecommendConfig, EventConfig};
use crate::error::DfResult;
use crate::live::{LiveCalculator, LiveType};
use crate::master::Card;
use crate::provider::CachedDataProvider;
use crate::recommend::{BaseDeckRecommend, RecommendDeck};
use crate::user::UserCard;
use crate::util::find_or_err;

/// Challenge lives field one character's cards and score solo.
pub struct ChallengeLiveDeckRecommend {
    provider: Arc<CachedDataProvider>,
    base_recommend: BaseDeckRecommend,
}

impl ChallengeLiveDeckRecommend {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            base_recommend: BaseDeckRecommend::new(provider.clone()),
            provider,
        }
    }

    pub async fn recommend_challenge_live_deck(
        &self,
        character_id: i64,
        config: &DeckRecommendConfig,
    ) -> DfResult<Vec<RecommendDeck>> {
        let user_cards = self.provider.user::<Vec<UserCard>>("userCards").await?;
        let cards = self.provider.master::<Card>("cards").await?;
        let mut character_cards = Vec::new();
        for user_card in user_cards.iter() {
            let card = find_or_err(&cards, "card", |it| it.id == user_card.card_id)?;
            if card.character_id == character_id {
                character_cards.push(user_card.clone());
            }
        }
        self.base_recommend
            .recommend_high_score_deck(
                &character_cards,
                LiveCalculator::get_live_score_function(LiveType::Solo),
                config,
                LiveType::Challenge,
                &EventConfig::default(),
            )
            .await
    }
}
