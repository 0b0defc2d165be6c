//! Event point model.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::card::event_bonus::CardEventCalculator;
use crate::card::CardDetail;
use crate::deck::DeckDetail;
use crate::detail_map::EventBonusMap;
use crate::error::{DeckForgeError, DfResult};
use crate::live::{LiveCalculator, LiveType};
use crate::master::{Attr, Card, WorldBloomDifferentAttributeBonus};
use crate::music::MusicMeta;
use crate::provider::CachedDataProvider;
use crate::recommend::ScoreFunction;
use crate::service::EventService;
use crate::user::UserCard;
use crate::util::find_or_err;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "marathon")]
    Marathon,
    #[serde(rename = "cheerful_carnival")]
    Cheerful,
    #[serde(rename = "world_bloom")]
    Bloom,
}

impl FromStr for EventType {
    type Err = DeckForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marathon" => Ok(Self::Marathon),
            "cheerful_carnival" => Ok(Self::Cheerful),
            "world_bloom" => Ok(Self::Bloom),
            other => Err(DeckForgeError::Config(format!("unknown event type {other}"))),
        }
    }
}

pub struct EventCalculator {
    provider: Arc<CachedDataProvider>,
    card_event_calculator: CardEventCalculator,
    event_service: EventService,
}

impl EventCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            card_event_calculator: CardEventCalculator::new(provider.clone()),
            event_service: EventService::new(provider.clone()),
            provider,
        }
    }

    /// Total bonus percentage of a concrete user deck.
    pub async fn get_deck_event_bonus(
        &self,
        deck_cards: &[UserCard],
        event_id: i64,
    ) -> DfResult<f64> {
        let master_cards = self.provider.master::<Card>("cards").await?;
        let mut parts: Vec<(Attr, EventBonusMap)> = Vec::with_capacity(deck_cards.len());
        for user_card in deck_cards {
            let card = find_or_err(&master_cards, "card", |it| it.id == user_card.card_id)?;
            let bonus = self
                .card_event_calculator
                .get_card_event_bonus(user_card, event_id)
                .await?;
            parts.push((card.attr, bonus));
        }
        let event = self.event_service.get_event_config(event_id, 0).await?;
        Ok(Self::deck_bonus_from_parts(
            parts.iter().map(|(attr, map)| (*attr, Some(map))),
            event.card_bonus_count_limit,
            event.world_bloom_different_attribute_bonuses.as_deref(),
        )?
        .unwrap_or(0.0))
    }

    /// Converts a live score into event points. `other_score` of 0 means
    /// "estimate the room as four copies of self"; `life` only matters for
    /// cheerful carnival lives.
    #[allow(clippy::too_many_arguments)]
    pub fn get_event_point(
        live_type: LiveType,
        event_type: EventType,
        self_score: f64,
        music_rate: f64,
        deck_bonus: f64,
        boost_rate: f64,
        other_score: f64,
        life: f64,
    ) -> DfResult<f64> {
        let music_rate = music_rate / 100.0;
        let deck_rate = deck_bonus / 100.0 + 1.0;
        let other_score = if other_score == 0.0 {
            4.0 * self_score
        } else {
            other_score
        };
        match live_type {
            LiveType::Solo | LiveType::Auto => {
                let base_score = 100.0 + (self_score / 20000.0).floor();
                Ok((base_score * music_rate * deck_rate).floor() * boost_rate)
            }
            LiveType::Challenge => {
                let base_score = 100.0 + (self_score / 20000.0).floor();
                Ok(base_score * 120.0)
            }
            LiveType::Multi => {
                if event_type == EventType::Cheerful {
                    return Err(DeckForgeError::Config(
                        "multi live is not playable in a cheerful carnival event".into(),
                    ));
                }
                let base_score = 110.0
                    + (self_score / 17000.0).floor()
                    + (other_score / 340000.0).floor().min(13.0);
                Ok((base_score * music_rate * deck_rate).floor() * boost_rate)
            }
            LiveType::Cheerful => {
                if event_type != EventType::Cheerful {
                    return Err(DeckForgeError::Config(
                        "cheerful live is only playable in a cheerful carnival event".into(),
                    ));
                }
                let base_score = 110.0
                    + (self_score / 17000.0).floor()
                    + (other_score / 340000.0).floor().min(13.0);
                let life_rate = 1.15 + (life / 5000.0).clamp(0.1, 0.2);
                Ok(((base_score * music_rate * deck_rate).floor() * life_rate).floor() * boost_rate)
            }
        }
    }

    fn deck_bonus_from_parts<'a>(
        parts: impl IntoIterator<Item = (Attr, Option<&'a EventBonusMap>)>,
        card_bonus_count_limit: usize,
        world_bloom_different_attribute_bonuses: Option<&[WorldBloomDifferentAttributeBonus]>,
    ) -> DfResult<Option<f64>> {
        let mut bonus = 0f64;
        let mut card_bonus_count = 0usize;
        let mut attrs: HashSet<Attr> = HashSet::new();
        for (i, (attr, map)) in parts.into_iter().enumerate() {
            let Some(map) = map else {
                return Ok(None);
            };
            let detail = map.get_bonus()?;
            bonus += detail.fixed_bonus;
            if detail.card_bonus > 0.0 && card_bonus_count < card_bonus_count_limit {
                bonus += detail.card_bonus;
                card_bonus_count += 1;
            }
            if i == 0 {
                bonus += detail.leader_bonus;
            }
            attrs.insert(attr);
        }
        let Some(wb) = world_bloom_different_attribute_bonuses else {
            return Ok(Some(bonus));
        };
        let row = find_or_err(wb, "world bloom different attribute bonus", |it| {
            it.attribute_count == attrs.len()
        })?;
        Ok(Some(bonus + row.bonus_rate))
    }

    /// `None` when any member lacks an event bonus (no event context).
    pub fn get_deck_bonus(
        cards: &[&CardDetail],
        card_bonus_count_limit: usize,
        world_bloom_different_attribute_bonuses: Option<&[WorldBloomDifferentAttributeBonus]>,
    ) -> DfResult<Option<f64>> {
        Self::deck_bonus_from_parts(
            cards.iter().map(|it| (it.attr, it.event_bonus.as_ref())),
            card_bonus_count_limit,
            world_bloom_different_attribute_bonuses,
        )
    }

    /// Greedy support pick: the collection is pre-sorted by support bonus,
    /// so the first 20 eligible non-members are the best ones.
    pub fn get_support_deck_bonus(
        deck_card_ids: &HashSet<i64>,
        all_cards: &[CardDetail],
    ) -> (f64, Vec<CardDetail>) {
        let mut bonus = 0f64;
        let mut cards = Vec::new();
        for card in all_cards {
            let Some(support_bonus) = card.support_deck_bonus else {
                continue;
            };
            if deck_card_ids.contains(&card.card_id) {
                continue;
            }
            bonus += support_bonus;
            cards.push(card.clone());
            if cards.len() >= crate::service::deck::SUPPORT_DECK_SIZE {
                break;
            }
        }
        (bonus, cards)
    }

    pub fn get_deck_event_point(
        deck_detail: &DeckDetail,
        music_meta: &MusicMeta,
        live_type: LiveType,
        event_type: EventType,
    ) -> DfResult<f64> {
        if live_type != LiveType::Challenge && deck_detail.event_bonus.is_none() {
            return Err(DeckForgeError::Config("deck event bonus is missing".into()));
        }
        if event_type == EventType::Bloom && deck_detail.support_deck_bonus.is_none() {
            return Err(DeckForgeError::Config(
                "support deck bonus is missing".into(),
            ));
        }
        let score = LiveCalculator::get_live_score_by_deck(deck_detail, music_meta, live_type)?;
        Self::get_event_point(
            live_type,
            event_type,
            score as f64,
            music_meta.event_rate,
            deck_detail.event_bonus.unwrap_or(0.0)
                + deck_detail.support_deck_bonus.unwrap_or(0.0),
            1.0,
            0.0,
            1000.0,
        )
    }

    pub fn get_event_point_function(live_type: LiveType, event_type: EventType) -> ScoreFunction {
        Box::new(move |music_meta, deck_detail| {
            Self::get_deck_event_point(deck_detail, music_meta, live_type, event_type)
        })
    }
}
