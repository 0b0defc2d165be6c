//! Per-card power under every deck composition it can appear in.
//!
//! The game evaluates percentage bonuses in 32-bit float steps and floors
//! each component before summing. `rate_step`/`floor_rate_step` reproduce
//! that rounding; keeping it bit-exact is what makes scores reproducible.

use std::sync::Arc;

use crate::detail_map::{CardPower, PowerMap};
use crate::error::DfResult;
use crate::master::{
    AreaItemLevel, Card, CardEpisode, CardMysekaiCanvasBonus, CharacterRank, MasterLesson, Unit,
};
use crate::provider::CachedDataProvider;
use crate::user::{
    MysekaiGateBonus, UserCard, UserCharacter, UserMysekaiFixtureBonus, SCENARIO_ALREADY_READ,
};
use crate::util::{find_or_err, floor_rate_step, rate_step};

const CARD_PARAMETER_TYPES: [&str; 3] = ["param1", "param2", "param3"];

pub struct CardPowerCalculator {
    provider: Arc<CachedDataProvider>,
}

impl CardPowerCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn get_card_power(
        &self,
        user_card: &UserCard,
        card: &Card,
        card_units: &[Unit],
        area_item_levels: &[AreaItemLevel],
        has_canvas_bonus: bool,
        gate_bonuses: &[MysekaiGateBonus],
        mysekai_fixture_limit: f64,
    ) -> DfResult<PowerMap> {
        let mut ret = PowerMap::new();
        let base_power = self
            .get_card_base_powers(user_card, card, has_canvas_bonus)
            .await?;
        let character_bonus = self
            .get_character_bonus_power(&base_power, card.character_id)
            .await?;
        let fixture_bonus = self
            .get_fixture_bonus_power(&base_power, card.character_id, mysekai_fixture_limit)
            .await?;
        let gate_bonus = Self::get_gate_bonus_power(&base_power, gate_bonuses, card_units);
        for &unit in card_units {
            for i in 0..4 {
                let same_unit = (i & 1) == 1;
                let same_attr = (i & 2) == 2;
                let area_item_bonus = Self::get_area_item_bonus_power(
                    area_item_levels,
                    &base_power,
                    card.character_id,
                    unit,
                    same_unit,
                    card.attr.as_ref(),
                    same_attr,
                );
                let base = Self::sum_power(&base_power);
                let total = base + area_item_bonus + character_bonus + fixture_bonus + gate_bonus;
                ret.set_power(
                    unit,
                    same_unit,
                    same_attr,
                    CardPower {
                        base,
                        area_item_bonus,
                        character_bonus,
                        fixture_bonus,
                        gate_bonus,
                        total,
                    },
                );
            }
        }
        Ok(ret)
    }

    async fn get_card_base_powers(
        &self,
        user_card: &UserCard,
        card: &Card,
        has_canvas_bonus: bool,
    ) -> DfResult<[i64; 3]> {
        let card_episodes = self.provider.master::<CardEpisode>("cardEpisodes").await?;
        let master_lessons = self.provider.master::<MasterLesson>("masterLessons").await?;
        let parameters: Vec<_> = card
            .card_parameters
            .iter()
            .filter(|it| it.card_level == user_card.level)
            .collect();
        let mut ret = [0i64; 3];
        for (i, param) in CARD_PARAMETER_TYPES.iter().enumerate() {
            ret[i] = parameters
                .iter()
                .find(|it| it.card_parameter_type == *param)
                .ok_or_else(|| {
                    crate::error::DeckForgeError::NotFound(format!(
                        "card parameter {param} at level {}",
                        user_card.level
                    ))
                })?
                .power;
        }
        if user_card.is_trained() {
            ret[0] += card.special_training_power1_bonus_fixed;
            ret[1] += card.special_training_power2_bonus_fixed;
            ret[2] += card.special_training_power3_bonus_fixed;
        }
        if let Some(user_episodes) = &user_card.episodes {
            for user_episode in user_episodes
                .iter()
                .filter(|it| it.scenario_status == SCENARIO_ALREADY_READ)
            {
                let episode = find_or_err(&card_episodes, "card episode", |it| {
                    it.id == user_episode.card_episode_id
                })?;
                ret[0] += episode.power1_bonus_fixed;
                ret[1] += episode.power2_bonus_fixed;
                ret[2] += episode.power3_bonus_fixed;
            }
        }
        for lesson in master_lessons.iter().filter(|it| {
            it.card_rarity_type == card.card_rarity_type && it.master_rank <= user_card.master_rank
        }) {
            ret[0] += lesson.power1_bonus_fixed;
            ret[1] += lesson.power2_bonus_fixed;
            ret[2] += lesson.power3_bonus_fixed;
        }
        if has_canvas_bonus {
            let canvas_bonuses = self
                .provider
                .master::<CardMysekaiCanvasBonus>("cardMysekaiCanvasBonuses")
                .await?;
            let canvas = find_or_err(&canvas_bonuses, "canvas bonus", |it| {
                it.card_rarity_type == card.card_rarity_type
            })?;
            ret[0] += canvas.power1_bonus_fixed;
            ret[1] += canvas.power2_bonus_fixed;
            ret[2] += canvas.power3_bonus_fixed;
        }
        Ok(ret)
    }

    /// Area items add up per power component in f32, floored per component.
    #[allow(clippy::too_many_arguments)]
    fn get_area_item_bonus_power(
        area_item_levels: &[AreaItemLevel],
        base_power: &[i64; 3],
        character_id: i64,
        unit: Unit,
        same_unit: bool,
        attr: &str,
        same_attr: bool,
    ) -> i64 {
        let unit_name: &str = unit.as_ref();
        let mut bonus = [0f32; 3];
        for item in area_item_levels.iter().filter(|it| {
            (it.target_unit == "any" || it.target_unit == unit_name)
                && (it.target_card_attr == "any" || it.target_card_attr == attr)
                && (it.target_game_character_id.is_none()
                    || it.target_game_character_id == Some(character_id))
        }) {
            let all_match = (item.target_unit != "any" && same_unit)
                || (item.target_card_attr != "any" && same_attr);
            let rates = if all_match {
                [
                    item.power1_all_match_bonus_rate,
                    item.power2_all_match_bonus_rate,
                    item.power3_all_match_bonus_rate,
                ]
            } else {
                [
                    item.power1_bonus_rate,
                    item.power2_bonus_rate,
                    item.power3_bonus_rate,
                ]
            };
            for (i, rate) in rates.into_iter().enumerate() {
                bonus[i] += rate_step(rate, 0.01, base_power[i] as f64);
            }
        }
        bonus.iter().map(|it| it.floor() as i64).sum()
    }

    async fn get_character_bonus_power(
        &self,
        base_power: &[i64; 3],
        character_id: i64,
    ) -> DfResult<i64> {
        let character_ranks = self.provider.master::<CharacterRank>("characterRanks").await?;
        let user_characters = self.provider.user::<Vec<UserCharacter>>("userCharacters").await?;
        let user_character = find_or_err(&user_characters, "user character", |it| {
            it.character_id == character_id
        })?;
        let rank = find_or_err(&character_ranks, "character rank", |it| {
            it.character_id == user_character.character_id
                && it.character_rank == user_character.character_rank
        })?;
        let rates = [
            rank.power1_bonus_rate,
            rank.power2_bonus_rate,
            rank.power3_bonus_rate,
        ];
        Ok(rates
            .into_iter()
            .enumerate()
            .map(|(i, rate)| floor_rate_step(rate, 0.01, base_power[i] as f64) as i64)
            .sum())
    }

    /// Fixture bonuses come in per-mille; world-bloom finales cap the rate.
    async fn get_fixture_bonus_power(
        &self,
        base_power: &[i64; 3],
        character_id: i64,
        mysekai_fixture_limit: f64,
    ) -> DfResult<i64> {
        let fixture_bonuses = self
            .provider
            .user_opt::<Vec<UserMysekaiFixtureBonus>>(
                "userMysekaiFixtureGameCharacterPerformanceBonuses",
            )
            .await?;
        let Some(fixture_bonuses) = fixture_bonuses else {
            return Ok(0);
        };
        let Some(bonus) = fixture_bonuses
            .iter()
            .find(|it| it.game_character_id == character_id)
        else {
            return Ok(0);
        };
        let rate = bonus.total_bonus_rate.min(mysekai_fixture_limit);
        Ok(floor_rate_step(rate, 0.001, Self::sum_power(base_power) as f64) as i64)
    }

    fn get_gate_bonus_power(
        base_power: &[i64; 3],
        gate_bonuses: &[MysekaiGateBonus],
        card_units: &[Unit],
    ) -> i64 {
        let is_only_piapro = card_units == [Unit::Piapro];
        let mut rate = 0f64;
        for bonus in gate_bonuses {
            if is_only_piapro || card_units.contains(&bonus.unit) {
                rate = rate.max(bonus.power_bonus_rate);
            }
        }
        floor_rate_step(rate, 0.01, Self::sum_power(base_power) as f64) as i64
    }

    fn sum_power(power: &[i64; 3]) -> i64 {
        power.iter().sum()
    }
}
