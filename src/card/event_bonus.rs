//! Per-card event bonus and world-bloom support deck bonus.

use std::sync::Arc;

use crate::config::EventConfig;
use crate::detail_map::{EventBonus, EventBonusMap};
use crate::error::DfResult;
use crate::master::{
    Card, EventCard, EventDeckBonus, EventHonorBonus, EventRarityBonusRate, GameCharacterUnit,
    Unit, WorldBloomSupportDeckBonus, WorldBloomSupportDeckUnitEventLimitedBonus,
};
use crate::provider::CachedDataProvider;
use crate::user::{UserCard, UserHonor};
use crate::util::find_or_err;

/// Character ids below this are unit members; 21 and up are virtual singers
/// whose bonus eligibility depends on the support unit.
const FIRST_VIRTUAL_SINGER_ID: i64 = 21;

pub struct CardEventCalculator {
    provider: Arc<CachedDataProvider>,
}

impl CardEventCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    /// The best matching attribute/character bonus rate for the card.
    async fn get_event_deck_bonus(&self, event_id: i64, card: &Card) -> DfResult<f64> {
        let deck_bonuses = self.provider.master::<EventDeckBonus>("eventDeckBonuses").await?;
        let character_units = self
            .provider
            .master::<GameCharacterUnit>("gameCharacterUnits")
            .await?;
        let mut best = 0f64;
        for bonus in deck_bonuses.iter().filter(|it| {
            it.event_id == event_id && (it.card_attr.is_none() || it.card_attr == Some(card.attr))
        }) {
            let Some(unit_id) = bonus.game_character_unit_id else {
                best = best.max(bonus.bonus_rate);
                continue;
            };
            let gcu = find_or_err(&character_units, "game character unit", |it| it.id == unit_id)?;
            if gcu.game_character_id != card.character_id {
                continue;
            }
            if card.character_id < FIRST_VIRTUAL_SINGER_ID
                || card.support_unit == Some(gcu.unit)
                || card.support_unit.is_none()
            {
                best = best.max(bonus.bonus_rate);
            }
        }
        Ok(best)
    }

    pub async fn get_card_event_bonus(
        &self,
        user_card: &UserCard,
        event_id: i64,
    ) -> DfResult<EventBonusMap> {
        let cards = self.provider.master::<Card>("cards").await?;
        let event_cards = self.provider.master::<EventCard>("eventCards").await?;
        let rarity_bonus_rates = self
            .provider
            .master::<EventRarityBonusRate>("eventRarityBonusRates")
            .await?;
        let card = find_or_err(&cards, "card", |it| it.id == user_card.card_id)?;
        let mut fixed_bonus = self.get_event_deck_bonus(event_id, card).await?;
        fixed_bonus += find_or_err(&rarity_bonus_rates, "event rarity bonus rate", |it| {
            it.card_rarity_type == card.card_rarity_type && it.master_rank == user_card.master_rank
        })?
        .bonus_rate;
        let event_card = event_cards
            .iter()
            .find(|it| it.event_id == event_id && it.card_id == card.id);
        let card_bonus = event_card.map(|it| it.bonus_rate).unwrap_or(0.0);
        let leader_bonus = self
            .get_card_leader_bonus(
                event_id,
                card.character_id,
                event_card.map(|it| it.leader_bonus_rate).unwrap_or(0.0),
            )
            .await?;
        let mut bonus = EventBonusMap::new();
        bonus.set_bonus(EventBonus {
            fixed_bonus,
            card_bonus,
            leader_bonus,
        });
        Ok(bonus)
    }

    /// Owned event honors stack onto the card's own leader bonus.
    async fn get_card_leader_bonus(
        &self,
        event_id: i64,
        character_id: i64,
        card_leader_bonus: f64,
    ) -> DfResult<f64> {
        let honor_bonuses = self.provider.master::<EventHonorBonus>("eventHonorBonuses").await?;
        let bonuses: Vec<&EventHonorBonus> = honor_bonuses
            .iter()
            .filter(|it| it.event_id == event_id && it.leader_game_character_id == character_id)
            .collect();
        if bonuses.is_empty() {
            return Ok(card_leader_bonus);
        }
        let user_honors = self.provider.user::<Vec<UserHonor>>("userHonors").await?;
        Ok(user_honors
            .iter()
            .filter_map(|honor| bonuses.iter().find(|it| it.honor_id == honor.honor_id))
            .fold(card_leader_bonus, |p, it| p + it.bonus_rate))
    }
}

pub struct CardBloomEventCalculator {
    provider: Arc<CachedDataProvider>,
}

impl CardBloomEventCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    /// `None` outside world-bloom chapters, and for cards outside the
    /// chapter's support unit.
    pub async fn get_card_support_deck_bonus(
        &self,
        user_card: &UserCard,
        card: &Card,
        units: &[Unit],
        event_config: &EventConfig,
    ) -> DfResult<Option<f64>> {
        if event_config.special_character_id <= 0 {
            return Ok(None);
        }
        let Some(support_unit) = event_config.world_bloom_support_unit else {
            return Ok(None);
        };
        if !units.contains(&support_unit) {
            return Ok(None);
        }
        let support_bonuses = self
            .provider
            .master::<WorldBloomSupportDeckBonus>("worldBloomSupportDeckBonuses")
            .await?;
        let bonus = find_or_err(&support_bonuses, "world bloom support deck bonus", |it| {
            it.card_rarity_type == card.card_rarity_type
        })?;
        let character_type = if card.character_id == event_config.special_character_id {
            "specific"
        } else {
            "others"
        };
        let mut total = 0f64;
        total += find_or_err(
            &bonus.world_bloom_support_deck_character_bonuses,
            "support deck character bonus",
            |it| it.world_bloom_support_deck_character_type == character_type,
        )?
        .bonus_rate;
        total += find_or_err(
            &bonus.world_bloom_support_deck_master_rank_bonuses,
            "support deck master rank bonus",
            |it| it.master_rank == user_card.master_rank,
        )?
        .bonus_rate;
        total += find_or_err(
            &bonus.world_bloom_support_deck_skill_level_bonuses,
            "support deck skill level bonus",
            |it| it.skill_level == user_card.skill_level,
        )?
        .bonus_rate;
        let limited_bonuses = self
            .provider
            .master::<WorldBloomSupportDeckUnitEventLimitedBonus>(
                "worldBloomSupportDeckUnitEventLimitedBonuses",
            )
            .await?;
        if let Some(card_bonus) = limited_bonuses.iter().find(|it| {
            it.event_id == event_config.event_id
                && it.game_character_id == event_config.special_character_id
                && it.card_id == card.id
        }) {
            total += card_bonus.bonus_rate;
        }
        Ok(Some(total))
    }
}
