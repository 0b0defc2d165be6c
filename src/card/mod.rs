//! Card-level evaluation: one [`CardDetail`] per owned card, carrying the
//! composition-conditional power/skill/bonus maps the deck layer reads.

pub mod event_bonus;
pub mod power;
pub mod skill;

use std::sync::Arc;

use crate::config::{CardConfigMap, EventConfig};
use crate::detail_map::{EventBonusMap, PowerMap, SkillMap};
use crate::error::DfResult;
use crate::master::{AreaItemLevel, Attr, Card, CardRarityType, Unit};
use crate::provider::CachedDataProvider;
use crate::service::{AreaItemService, CardService, MysekaiService};
use crate::user::{MysekaiGateBonus, UserCard};
use crate::util::find_or_err;

use event_bonus::{CardBloomEventCalculator, CardEventCalculator};
use power::CardPowerCalculator;
use skill::CardSkillCalculator;

/// Everything the deck layer needs to know about one card.
#[derive(Debug, Clone)]
pub struct CardDetail {
    pub card_id: i64,
    pub level: i32,
    pub skill_level: i32,
    pub master_rank: i32,
    pub card_rarity_type: CardRarityType,
    pub character_id: i64,
    pub units: Vec<Unit>,
    pub attr: Attr,
    pub power: PowerMap,
    pub skill: SkillMap,
    pub event_bonus: Option<EventBonusMap>,
    pub support_deck_bonus: Option<f64>,
    pub has_canvas_bonus: bool,
}

pub struct CardCalculator {
    provider: Arc<CachedDataProvider>,
    power_calculator: CardPowerCalculator,
    skill_calculator: CardSkillCalculator,
    event_calculator: CardEventCalculator,
    bloom_event_calculator: CardBloomEventCalculator,
    area_item_service: AreaItemService,
    card_service: CardService,
    mysekai_service: MysekaiService,
}

const MASTER_TABLES: [&str; 12] = [
    "cards",
    "cardEpisodes",
    "masterLessons",
    "cardRarities",
    "characterRanks",
    "gameCharacters",
    "gameCharacterUnits",
    "skills",
    "eventCards",
    "eventDeckBonuses",
    "eventRarityBonusRates",
    "eventHonorBonuses",
];

impl CardCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            power_calculator: CardPowerCalculator::new(provider.clone()),
            skill_calculator: CardSkillCalculator::new(provider.clone()),
            event_calculator: CardEventCalculator::new(provider.clone()),
            bloom_event_calculator: CardBloomEventCalculator::new(provider.clone()),
            area_item_service: AreaItemService::new(provider.clone()),
            card_service: CardService::new(provider.clone()),
            mysekai_service: MysekaiService::new(provider.clone()),
            provider,
        }
    }

    /// Evaluates one card, or `None` when its rarity is disabled.
    pub async fn get_card_detail(
        &self,
        user_card: &UserCard,
        area_item_levels: &[AreaItemLevel],
        config: &CardConfigMap,
        event_config: &EventConfig,
        has_canvas_bonus: bool,
        gate_bonuses: &[MysekaiGateBonus],
    ) -> DfResult<Option<CardDetail>> {
        let cards = self.provider.master::<Card>("cards").await?;
        let card = find_or_err(&cards, "card", |it| it.id == user_card.card_id)?;
        let rarity_config = config.get(&card.card_rarity_type);
        if rarity_config.map(|it| it.disable).unwrap_or(false) {
            return Ok(None);
        }
        let user_card = self
            .card_service
            .apply_card_config(user_card, card, rarity_config)
            .await?;
        let units = self.card_service.get_card_units(card).await?;
        let skill = self
            .skill_calculator
            .get_card_skill(&user_card, card, event_config.skill_score_up_limit)
            .await?;
        let power = self
            .power_calculator
            .get_card_power(
                &user_card,
                card,
                &units,
                area_item_levels,
                has_canvas_bonus,
                gate_bonuses,
                event_config.mysekai_fixture_limit,
            )
            .await?;
        let event_bonus = if event_config.event_id == 0 {
            None
        } else {
            Some(
                self.event_calculator
                    .get_card_event_bonus(&user_card, event_config.event_id)
                    .await?,
            )
        };
        let support_deck_bonus = self
            .bloom_event_calculator
            .get_card_support_deck_bonus(&user_card, card, &units, event_config)
            .await?;
        Ok(Some(CardDetail {
            card_id: card.id,
            level: user_card.level,
            skill_level: user_card.skill_level,
            master_rank: user_card.master_rank,
            card_rarity_type: card.card_rarity_type,
            character_id: card.character_id,
            units,
            attr: card.attr,
            power,
            skill,
            event_bonus,
            support_deck_bonus,
            has_canvas_bonus,
        }))
    }

    /// Evaluates a whole collection; shared inputs (area items, canvas set,
    /// gate bonuses) are resolved once. In world-bloom support context the
    /// result is ordered by descending support bonus.
    pub async fn batch_get_card_detail(
        &self,
        user_cards: &[UserCard],
        config: &CardConfigMap,
        event_config: &EventConfig,
        area_item_levels: Option<&[AreaItemLevel]>,
    ) -> DfResult<Vec<CardDetail>> {
        self.provider.preload_master_data(&MASTER_TABLES).await?;
        let area_item_levels = match area_item_levels {
            Some(levels) => levels.to_vec(),
            None => self.area_item_service.get_area_item_levels().await?,
        };
        let canvas_bonus_cards = self.mysekai_service.get_mysekai_canvas_bonus_cards().await?;
        let gate_bonuses = self.mysekai_service.get_mysekai_gate_bonuses().await?;
        let mut ret = Vec::with_capacity(user_cards.len());
        for user_card in user_cards {
            if let Some(detail) = self
                .get_card_detail(
                    user_card,
                    &area_item_levels,
                    config,
                    event_config,
                    canvas_bonus_cards.contains(&user_card.card_id),
                    &gate_bonuses,
                )
                .await?
            {
                ret.push(detail);
            }
        }
        if event_config.special_character_id > 0 {
            ret.sort_by(|a, b| {
                b.support_deck_bonus
                    .unwrap_or(0.0)
                    .total_cmp(&a.support_deck_bonus.unwrap_or(0.0))
            });
        }
        Ok(ret)
    }

    /// Dominance across every composition: strictly worse power and skill,
    /// and strictly worse event bonus when both sides have one.
    pub fn is_certainly_less_than(a: &CardDetail, b: &CardDetail) -> bool {
        a.power.is_certainly_less_than(&b.power)
            && a.skill.is_certainly_less_than(&b.skill)
            && match (&a.event_bonus, &b.event_bonus) {
                (Some(ea), Some(eb)) => ea.is_certainly_less_than(eb),
                _ => true,
            }
    }
}
