use std::sync::Arc;

use crate::config::CardConfig;
use crate::error::DfResult;
use crate::master::{Card, CardRarity, GameCharacter, Unit};
use crate::provider::CachedDataProvider;
use crate::user::{UserCard, SCENARIO_ALREADY_READ, SPECIAL_TRAINING_DONE};
use crate::util::find_or_err;

pub struct CardService {
    provider: Arc<CachedDataProvider>,
}

impl CardService {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    /// The units a card counts towards: its character's unit, preceded by
    /// the support unit for virtual singers guesting elsewhere.
    pub async fn get_card_units(&self, card: &Card) -> DfResult<Vec<Unit>> {
        let characters = self.provider.master::<GameCharacter>("gameCharacters").await?;
        let mut units = Vec::with_capacity(2);
        if let Some(support) = card.support_unit {
            units.push(support);
        }
        units.push(find_or_err(&characters, "game character", |it| it.id == card.character_id)?.unit);
        Ok(units)
    }

    /// Applies the what-if overrides for the card's rarity, returning an
    /// adjusted copy of the user card. The stored state is never mutated.
    pub async fn apply_card_config(
        &self,
        user_card: &UserCard,
        card: &Card,
        config: Option<&CardConfig>,
    ) -> DfResult<UserCard> {
        let Some(config) = config else {
            return Ok(user_card.clone());
        };
        if !config.rank_max && !config.episode_read && !config.master_max && !config.skill_max {
            return Ok(user_card.clone());
        }
        let rarities = self.provider.master::<CardRarity>("cardRarities").await?;
        let rarity = find_or_err(&rarities, "card rarity", |it| {
            it.card_rarity_type == card.card_rarity_type
        })?;
        let mut ret = user_card.clone();
        if config.rank_max {
            match rarity.training_max_level {
                Some(level) => {
                    ret.level = level;
                    ret.special_training_status = SPECIAL_TRAINING_DONE.to_string();
                }
                None => ret.level = rarity.max_level,
            }
        }
        if config.episode_read {
            if let Some(episodes) = &mut ret.episodes {
                for episode in episodes {
                    episode.scenario_status = SCENARIO_ALREADY_READ.to_string();
                }
            }
        }
        if config.master_max {
            ret.master_rank = 5;
        }
        if config.skill_max {
            ret.skill_level = rarity.max_skill_level;
        }
        Ok(ret)
    }
}
