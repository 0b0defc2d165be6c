//! Branch-and-bound deck search.
//!
//! Candidates are admitted in priority tiers, ordered by card id, and
//! explored depth-first. Domination bounds from the per-card maps prune
//! branches that provably cannot beat an already-found deck.

pub mod area_item;
pub mod bloom_support;
pub mod challenge;
pub mod event_deck;
pub mod feasibility;
pub mod music;
pub mod priority;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::card::{CardCalculator, CardDetail};
use crate::config::{DeckRecommendConfig, EventConfig};
use crate::deck::{DeckCalculator, DeckDetail};
use crate::error::{DeckForgeError, DfResult};
use crate::event::EventType;
use crate::live::LiveType;
use crate::master::Unit;
use crate::music::MusicMeta;
use crate::provider::CachedDataProvider;
use crate::service::AreaItemService;
use crate::user::UserCard;

use feasibility::{can_make_deck, is_deck_attr_less_than_3};
use priority::get_card_priorities;

/// Scores a resolved deck for ranking purposes. Live score functions and
/// event point functions both fit this shape.
pub type ScoreFunction = Box<dyn Fn(&MusicMeta, &DeckDetail) -> DfResult<f64> + Send + Sync>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendDeck {
    pub score: f64,
    #[serde(flatten)]
    pub deck: DeckDetail,
}

/// Admits cards tier by tier until the admitted set can form a deck and has
/// grown past the previous round. Falls through to the whole pool once the
/// tiers are exhausted.
fn filter_card_priority<'a>(
    live_type: LiveType,
    event_type: EventType,
    cards: &'a [CardDetail],
    pre_len: usize,
    member: usize,
    leader_character_id: i64,
) -> Vec<&'a CardDetail> {
    let priorities = get_card_priorities(live_type, event_type);
    let mut out: Vec<&CardDetail> = Vec::new();
    let mut latest_priority = i32::MIN;
    let mut admitted: HashSet<i64> = HashSet::new();
    for priority in priorities {
        if priority.priority > latest_priority
            && out.len() > pre_len
            && can_make_deck(live_type, event_type, &out, member)
        {
            return out;
        }
        latest_priority = priority.priority;
        for card in cards {
            if admitted.contains(&card.card_id)
                || card.card_rarity_type != priority.card_rarity_type
                || card.master_rank < priority.master_rank
            {
                continue;
            }
            let bonus_ok = match &card.event_bonus {
                None => true,
                Some(map) => map
                    .get_max_bonus(
                        leader_character_id <= 0 || leader_character_id == card.character_id,
                    )
                    .map(|bonus| bonus >= priority.event_bonus)
                    .unwrap_or(false),
            };
            if !bonus_ok {
                continue;
            }
            admitted.insert(card.card_id);
            out.push(card);
        }
    }
    cards.iter().collect()
}

fn compare_deck(a: &RecommendDeck, b: &RecommendDeck) -> std::cmp::Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.deck.power.total.cmp(&a.deck.power.total))
        .then_with(|| leader_card_id(a).cmp(&leader_card_id(b)))
}

fn leader_card_id(deck: &RecommendDeck) -> i64 {
    deck.deck.cards.first().map(|it| it.card_id).unwrap_or(0)
}

/// Merges two ranked lists, drops duplicates (same score, power and
/// leader), and keeps the best `limit`.
fn update_deck(
    pre: Vec<RecommendDeck>,
    result: Vec<RecommendDeck>,
    limit: usize,
) -> Vec<RecommendDeck> {
    let mut ans: Vec<RecommendDeck> = pre.into_iter().chain(result).collect();
    ans.sort_by(compare_deck);
    ans.dedup_by(|b, a| {
        a.score == b.score
            && a.deck.power.total == b.deck.power.total
            && leader_card_id(a) == leader_card_id(b)
    });
    ans.truncate(limit);
    ans
}

struct SearchContext<'a> {
    pool: &'a [&'a CardDetail],
    all_cards: &'a [CardDetail],
    score_fn: &'a dyn Fn(&DeckDetail) -> DfResult<f64>,
    limit: usize,
    is_challenge: bool,
    member: usize,
    leader_character_id: i64,
    honor_bonus: i64,
    event_config: &'a EventConfig,
}

impl SearchContext<'_> {
    fn evaluate(&self, deck_refs: &[&CardDetail]) -> DfResult<(DeckDetail, f64)> {
        let detail = DeckCalculator::get_deck_detail_by_cards(
            deck_refs,
            self.all_cards,
            self.honor_bonus,
            self.event_config.card_bonus_count_limit,
            self.event_config
                .world_bloom_different_attribute_bonuses
                .as_deref(),
        )?;
        let score = (self.score_fn)(&detail)?;
        Ok((detail, score))
    }
}

fn find_best_cards(ctx: &SearchContext<'_>, deck: Vec<usize>) -> DfResult<Vec<RecommendDeck>> {
    let mut deck_refs: Vec<&CardDetail> = deck.iter().map(|&i| ctx.pool[i]).collect();
    if deck.len() == ctx.member {
        let (mut detail, mut score) = ctx.evaluate(&deck_refs)?;
        if ctx.leader_character_id <= 0 {
            // The leader slot gets the best skill weight; promote the
            // strongest skill and re-evaluate once.
            let mut best_index = 0;
            let mut best_score_up = detail.cards[0].skill.score_up;
            for (i, card) in detail.cards.iter().enumerate() {
                if card.skill.score_up > best_score_up {
                    best_score_up = card.skill.score_up;
                    best_index = i;
                }
            }
            if best_index != 0 {
                deck_refs.swap(0, best_index);
                (detail, score) = ctx.evaluate(&deck_refs)?;
            }
        }
        return Ok(vec![RecommendDeck {
            score,
            deck: detail,
        }]);
    }

    let mut ans: Vec<RecommendDeck> = Vec::new();
    let mut pre_card: Option<&CardDetail> = None;
    let first = deck_refs.first().copied();
    let last = deck_refs.last().copied();
    for (i, &card) in ctx.pool.iter().enumerate() {
        if deck_refs.iter().any(|it| it.card_id == card.card_id) {
            continue;
        }
        if !ctx.is_challenge && deck_refs.iter().any(|it| it.character_id == card.character_id) {
            continue;
        }
        if ctx.leader_character_id > 0
            && deck.is_empty()
            && card.character_id != ctx.leader_character_id
        {
            continue;
        }
        if let Some(first) = first {
            if ctx.leader_character_id <= 0 && first.skill.is_certainly_less_than(&card.skill) {
                continue;
            }
            if card.attr != first.attr && !first.units.iter().any(|u| card.units.contains(u)) {
                continue;
            }
        }
        if ctx
            .event_config
            .world_bloom_different_attribute_bonuses
            .is_some()
            && is_deck_attr_less_than_3(&deck_refs, card)
        {
            continue;
        }
        if deck.len() >= 2 {
            if let Some(last) = last {
                if CardCalculator::is_certainly_less_than(last, card) {
                    continue;
                }
                // Symmetry break: unordered tail slots explore ascending ids.
                if !CardCalculator::is_certainly_less_than(card, last)
                    && card.card_id < last.card_id
                {
                    continue;
                }
            }
        }
        if let Some(pre) = pre_card {
            if CardCalculator::is_certainly_less_than(card, pre) {
                continue;
            }
        }
        pre_card = Some(card);
        let mut next = deck.clone();
        next.push(i);
        let result = find_best_cards(ctx, next)?;
        ans = update_deck(ans, result, ctx.limit);
    }
    if deck.is_empty() && ans.is_empty() {
        warn!(candidates = ctx.pool.len(), "no deck found in candidate pool");
    }
    Ok(ans)
}

pub struct BaseDeckRecommend {
    card_calculator: CardCalculator,
    deck_calculator: DeckCalculator,
    area_item_service: AreaItemService,
}

impl BaseDeckRecommend {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            card_calculator: CardCalculator::new(provider.clone()),
            deck_calculator: DeckCalculator::new(provider.clone()),
            area_item_service: AreaItemService::new(provider),
        }
    }

    /// Finds the `limit` best decks under `score_fn`, widening the
    /// candidate pool tier by tier until enough decks are found or the
    /// pool stops growing.
    pub async fn recommend_high_score_deck(
        &self,
        user_cards: &[UserCard],
        score_fn: ScoreFunction,
        config: &DeckRecommendConfig,
        live_type: LiveType,
        event_config: &EventConfig,
    ) -> DfResult<Vec<RecommendDeck>> {
        let honor_bonus = self.deck_calculator.get_honor_bonus_power().await?;
        let area_item_levels = self.area_item_service.get_area_item_levels().await?;
        let mut cards = self
            .card_calculator
            .batch_get_card_detail(
                user_cards,
                &config.card_config,
                event_config,
                Some(&area_item_levels),
            )
            .await?;
        let filter_unit = event_config
            .world_bloom_support_unit
            .or(event_config.event_unit);
        if let Some(unit) = filter_unit {
            let origin_len = cards.len();
            cards.retain(|it| it.units == [Unit::Piapro] || it.units.contains(&unit));
            debug!(unit = %unit, kept = cards.len(), total = origin_len, "filtered cards by unit");
        }
        let leader_character_id = if event_config.is_world_bloom_finale() {
            event_config.special_character_id
        } else {
            config.leader_character_id
        };

        let mut pre_len = 0usize;
        let mut found: Vec<RecommendDeck> = Vec::new();
        loop {
            let filtered = filter_card_priority(
                live_type,
                event_config.event_type,
                &cards,
                pre_len,
                config.member,
                leader_character_id,
            );
            if filtered.len() == pre_len {
                if found.is_empty() {
                    return Err(DeckForgeError::Infeasible(format!(
                        "cannot recommend any deck from {} cards",
                        cards.len()
                    )));
                }
                return Ok(found);
            }
            pre_len = filtered.len();
            let mut pool = filtered;
            pool.sort_by_key(|it| it.card_id);
            debug!(pool = pool.len(), total = cards.len(), "searching deck pool");
            let is_challenge = live_type == LiveType::Challenge;
            let member = if is_challenge {
                config.member.min(pool.len())
            } else {
                config.member
            };
            let music_meta = &config.music_meta;
            let eval = |detail: &DeckDetail| score_fn(music_meta, detail);
            let ctx = SearchContext {
                pool: &pool,
                all_cards: &cards,
                score_fn: &eval,
                limit: config.limit,
                is_challenge,
                member,
                leader_character_id,
                honor_bonus,
                event_config,
            };
            found = find_best_cards(&ctx, Vec::new())?;
            if found.len() >= config.limit {
                return Ok(found);
            }
        }
    }
}

pub use area_item::{AreaItemRecommend, RecommendAreaItem};
pub use bloom_support::BloomSupportDeckRecommend;
pub use challenge::ChallengeLiveDeckRecommend;
pub use event_deck::EventDeckRecommend;
pub use music::{MusicRecommend, RecommendMusic};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DeckCardDetail, DeckCardSkill, DeckPower};
    use crate::detail_map::{CardPower, PowerMap, SkillMap};
    use crate::master::{Attr, CardRarityType};

    fn deck(score: f64, power: i64, leader_id: i64) -> RecommendDeck {
        RecommendDeck {
            score,
            deck: DeckDetail {
                power: DeckPower {
                    base: power,
                    area_item_bonus: 0,
                    character_bonus: 0,
                    honor_bonus: 0,
                    fixture_bonus: 0,
                    gate_bonus: 0,
                    total: power,
                },
                event_bonus: None,
                support_deck_bonus: None,
                cards: vec![DeckCardDetail {
                    card_id: leader_id,
                    level: 1,
                    skill_level: 1,
                    master_rank: 0,
                    power: CardPower {
                        base: power,
                        area_item_bonus: 0,
                        character_bonus: 0,
                        fixture_bonus: 0,
                        gate_bonus: 0,
                        total: power,
                    },
                    event_bonus: None,
                    skill: DeckCardSkill {
                        score_up: 100.0,
                        life_recovery: 0.0,
                    },
                }],
            },
        }
    }

    #[test]
    fn update_deck_ranks_by_score_then_power_then_leader() {
        let merged = update_deck(
            vec![deck(100.0, 50, 3), deck(200.0, 40, 2)],
            vec![deck(200.0, 60, 1), deck(150.0, 70, 4)],
            10,
        );
        let order: Vec<i64> = merged
            .iter()
            .map(|it| leader_card_id(it))
            .collect();
        assert_eq!(order, vec![1, 2, 4, 3]);
    }

    #[test]
    fn update_deck_drops_duplicates_and_truncates() {
        let merged = update_deck(
            vec![deck(200.0, 60, 1), deck(100.0, 50, 3)],
            vec![deck(200.0, 60, 1), deck(150.0, 70, 4)],
            2,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(leader_card_id(&merged[0]), 1);
        assert_eq!(leader_card_id(&merged[1]), 4);
    }

    fn candidate(card_id: i64, rarity: CardRarityType) -> CardDetail {
        CardDetail {
            card_id,
            level: 1,
            skill_level: 1,
            master_rank: 0,
            card_rarity_type: rarity,
            character_id: card_id,
            units: vec![Unit::LightSound],
            attr: Attr::Cool,
            power: PowerMap::new(),
            skill: SkillMap::new(),
            event_bonus: None,
            support_deck_bonus: None,
            has_canvas_bonus: false,
        }
    }

    #[test]
    fn challenge_filter_stops_after_the_top_rarity_tier() {
        let mut cards: Vec<CardDetail> = (1..=5)
            .map(|id| candidate(id, CardRarityType::Rarity4))
            .collect();
        cards.push(candidate(6, CardRarityType::Rarity2));
        let filtered =
            filter_card_priority(LiveType::Challenge, EventType::None, &cards, 0, 5, 0);
        assert_eq!(filtered.len(), 5);
        assert!(filtered
            .iter()
            .all(|it| it.card_rarity_type == CardRarityType::Rarity4));
    }

    #[test]
    fn exhausted_tiers_fall_back_to_the_whole_pool() {
        let cards: Vec<CardDetail> = (1..=3)
            .map(|id| candidate(id, CardRarityType::Rarity4))
            .collect();
        // Three cards can never satisfy the full-size feasibility check, so
        // every tier is consumed and the whole pool comes back.
        let filtered =
            filter_card_priority(LiveType::Challenge, EventType::None, &cards, 0, 5, 0);
        assert_eq!(filtered.len(), 3);
    }
}
