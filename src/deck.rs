//! Deck-level evaluation: resolves each member's conditional maps against
//! the actual composition and sums the result.

use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::card::{CardCalculator, CardDetail};
use crate::config::EventConfig;
use crate::detail_map::{CardPower, SkillDetail, SlotKey};
use crate::error::{DeckForgeError, DfResult};
use crate::event::EventCalculator;
use crate::master::{AreaItemLevel, Attr, Honor, Unit, WorldBloomDifferentAttributeBonus};
use crate::provider::CachedDataProvider;
use crate::user::{UserCard, UserHonor};
use crate::util::find_or_err;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCardSkill {
    pub score_up: f64,
    pub life_recovery: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCardDetail {
    pub card_id: i64,
    pub level: i32,
    pub skill_level: i32,
    pub master_rank: i32,
    pub power: CardPower,
    /// Display value: the card's full bonus if it led the deck.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_bonus: Option<f64>,
    pub skill: DeckCardSkill,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPower {
    pub base: i64,
    pub area_item_bonus: i64,
    pub character_bonus: i64,
    pub honor_bonus: i64,
    pub fixture_bonus: i64,
    pub gate_bonus: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDetail {
    pub power: DeckPower,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_bonus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_deck_bonus: Option<f64>,
    pub cards: Vec<DeckCardDetail>,
}

pub struct DeckCalculator {
    provider: Arc<CachedDataProvider>,
    card_calculator: CardCalculator,
}

impl DeckCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            card_calculator: CardCalculator::new(provider.clone()),
            provider,
        }
    }

    pub async fn get_honor_bonus_power(&self) -> DfResult<i64> {
        let honors = self.provider.master::<Honor>("honors").await?;
        let user_honors = self.provider.user::<Vec<UserHonor>>("userHonors").await?;
        let mut total = 0i64;
        for user_honor in user_honors.iter() {
            let honor = find_or_err(&honors, "honor", |it| it.id == user_honor.honor_id)?;
            total += find_or_err(&honor.levels, "honor level", |it| it.level == user_honor.level)?
                .bonus;
        }
        Ok(total)
    }

    /// Resolves the given members against each other. Order matters: the
    /// first card is the leader. `all_cards` feeds the world-bloom support
    /// deck, which draws from the rest of the collection.
    pub fn get_deck_detail_by_cards(
        cards: &[&CardDetail],
        all_cards: &[CardDetail],
        honor_bonus: i64,
        card_bonus_count_limit: usize,
        world_bloom_different_attribute_bonuses: Option<&[WorldBloomDifferentAttributeBonus]>,
    ) -> DfResult<DeckDetail> {
        let attr_counts: HashMap<Attr, usize> = cards.iter().map(|it| it.attr).counts();
        let mut unit_counts: HashMap<Unit, u8> = HashMap::new();
        for card in cards {
            for &unit in &card.units {
                *unit_counts.entry(unit).or_default() += 1;
            }
        }
        let mut powers: Vec<CardPower> = Vec::with_capacity(cards.len());
        for card in cards {
            let attr_count = attr_counts[&card.attr] as u8;
            let mut best: Option<CardPower> = None;
            for &unit in &card.units {
                let current = *card.power.get_power(unit, unit_counts[&unit], attr_count)?;
                best = Some(match best {
                    Some(prev) if prev.total >= current.total => prev,
                    _ => current,
                });
            }
            powers.push(best.ok_or_else(|| {
                DeckForgeError::Config(format!("card {} has no units", card.card_id))
            })?);
        }
        let power = DeckPower {
            base: powers.iter().map(|it| it.base).sum(),
            area_item_bonus: powers.iter().map(|it| it.area_item_bonus).sum(),
            character_bonus: powers.iter().map(|it| it.character_bonus).sum(),
            honor_bonus,
            fixture_bonus: powers.iter().map(|it| it.fixture_bonus).sum(),
            gate_bonus: powers.iter().map(|it| it.gate_bonus).sum(),
            total: powers.iter().map(|it| it.total).sum::<i64>() + honor_bonus,
        };

        let diff_unit_count = (unit_counts.len() as u8).saturating_sub(1);
        let mut prepares: Vec<SkillDetail> = Vec::with_capacity(cards.len());
        for card in cards {
            let mut best = card.skill.get_skill(SlotKey::Diff, diff_unit_count)?.clone();
            for &unit in &card.units {
                let current = card
                    .skill
                    .get_skill(SlotKey::Member(unit), unit_counts[&unit])?;
                if current.score_up > best.score_up {
                    best = current.clone();
                }
            }
            prepares.push(best);
        }

        let mut deck_cards = Vec::with_capacity(cards.len());
        for (i, (card, prepare)) in cards.iter().zip(&prepares).enumerate() {
            let mut score_up = prepare.score_up;
            if let Some(reference) = prepare.score_up_reference {
                let other_max = cards
                    .iter()
                    .zip(&prepares)
                    .filter(|(other, _)| other.card_id != card.card_id)
                    .fold(0f64, |v, (_, p)| v.max(p.score_up_to_reference));
                let referred = (reference.base + (other_max * reference.rate / 100.0).floor())
                    .min(reference.max);
                score_up = score_up.max(referred);
            }
            let event_bonus = match &card.event_bonus {
                Some(bonus) => Some(bonus.get_max_bonus(i == 0)?),
                None => None,
            };
            deck_cards.push(DeckCardDetail {
                card_id: card.card_id,
                level: card.level,
                skill_level: card.skill_level,
                master_rank: card.master_rank,
                power: powers[i],
                event_bonus,
                skill: DeckCardSkill {
                    score_up,
                    life_recovery: prepare.life_recovery,
                },
            });
        }

        let event_bonus = EventCalculator::get_deck_bonus(
            cards,
            card_bonus_count_limit,
            world_bloom_different_attribute_bonuses,
        )?;
        let support_deck_bonus = world_bloom_different_attribute_bonuses.map(|_| {
            let deck_card_ids = cards.iter().map(|it| it.card_id).collect();
            EventCalculator::get_support_deck_bonus(&deck_card_ids, all_cards).0
        });
        Ok(DeckDetail {
            power,
            event_bonus,
            support_deck_bonus,
            cards: deck_cards,
        })
    }

    pub async fn get_deck_detail(
        &self,
        deck_cards: &[UserCard],
        all_cards: &[UserCard],
        event_config: &EventConfig,
        area_item_levels: Option<&[AreaItemLevel]>,
    ) -> DfResult<DeckDetail> {
        let config = crate::config::CardConfigMap::new();
        let all_details = self
            .card_calculator
            .batch_get_card_detail(all_cards, &config, event_config, area_item_levels)
            .await?;
        let deck_details = self
            .card_calculator
            .batch_get_card_detail(deck_cards, &config, event_config, area_item_levels)
            .await?;
        let deck_refs: Vec<&CardDetail> = deck_details.iter().collect();
        Self::get_deck_detail_by_cards(
            &deck_refs,
            &all_details,
            self.get_honor_bonus_power().await?,
            event_config.card_bonus_count_limit,
            event_config
                .world_bloom_different_attribute_bonuses
                .as_deref(),
        )
    }
}
