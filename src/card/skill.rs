//! Per-card skill under every deck composition.

use std::collections::HashMap;
use std::sync::Arc;

use crate::detail_map::{ReferenceRate, SkillDetail, SkillMap};
use crate::error::DfResult;
use crate::master::{Card, Skill, SkillEffectType, Unit};
use crate::provider::CachedDataProvider;
use crate::user::{UserCard, UserCharacter};
use crate::util::find_or_err;

/// One skill's effects flattened at the card's skill level.
#[derive(Debug, Default)]
struct SkillBreakdown {
    score_up_basic: f64,
    score_up_character_rank: f64,
    life_recovery: f64,
    /// Extra value per same-unit member beyond the first.
    score_up_same_unit: Option<(Unit, f64)>,
    /// (rate, max): scales with the strongest other member.
    score_up_reference: Option<(f64, f64)>,
    /// Keyed by the distinct-unit count that activates the tier.
    score_up_different_unit: Option<HashMap<u8, f64>>,
}

impl SkillBreakdown {
    fn score_up_self_fixed(&self) -> f64 {
        self.score_up_basic + self.score_up_character_rank
    }
}

pub struct CardSkillCalculator {
    provider: Arc<CachedDataProvider>,
}

impl CardSkillCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_card_skill(
        &self,
        user_card: &UserCard,
        card: &Card,
        score_up_limit: f64,
    ) -> DfResult<SkillMap> {
        let mut skill_map = SkillMap::new();
        let details = self.get_skill_breakdowns(user_card, card).await?;
        let max_score_up_basic = details
            .iter()
            .fold(0f64, |v, it| v.max(it.score_up_self_fixed()))
            .min(score_up_limit);
        let max_life = details.iter().fold(0f64, |v, it| v.max(it.life_recovery));
        skill_map.set_fixed_skill(SkillDetail {
            score_up: max_score_up_basic,
            score_up_to_reference: max_score_up_basic,
            score_up_reference: None,
            life_recovery: max_life,
        });
        for detail in &details {
            Self::update_skill_map(&mut skill_map, detail, max_score_up_basic, score_up_limit)?;
        }
        Ok(skill_map)
    }

    fn update_skill_map(
        skill_map: &mut SkillMap,
        detail: &SkillBreakdown,
        max_score_up_basic: f64,
        score_up_limit: f64,
    ) -> DfResult<()> {
        let self_fixed = detail.score_up_self_fixed();
        if let Some((unit, value)) = detail.score_up_same_unit {
            // The fifth same-unit member upgrades the bonus tier.
            for i in 1..=5u8 {
                let extra = if i == 5 { 5.0 } else { f64::from(i - 1) };
                let score_up = (self_fixed + extra * value).min(score_up_limit);
                skill_map.set_same_unit_skill(
                    unit,
                    i,
                    SkillDetail {
                        score_up,
                        score_up_to_reference: score_up,
                        score_up_reference: None,
                        life_recovery: detail.life_recovery,
                    },
                );
            }
        }
        if let Some((rate, max)) = detail.score_up_reference {
            let max_value = (self_fixed + max).min(score_up_limit);
            if max_value > max_score_up_basic {
                skill_map.set_reference_skill(SkillDetail {
                    score_up: max_score_up_basic,
                    score_up_to_reference: max_value,
                    score_up_reference: Some(ReferenceRate {
                        base: self_fixed,
                        rate,
                        max: max_value,
                    }),
                    life_recovery: detail.life_recovery,
                })?;
            }
        }
        if let Some(tiers) = &detail.score_up_different_unit {
            for (&unit_count, &value) in tiers {
                let current = (self_fixed + value).min(self_fixed);
                if current > max_score_up_basic {
                    skill_map.set_diff_unit_skill(
                        unit_count,
                        SkillDetail {
                            score_up: current,
                            score_up_to_reference: current,
                            score_up_reference: None,
                            life_recovery: detail.life_recovery,
                        },
                    );
                }
            }
        }
        Ok(())
    }

    async fn get_skill_breakdowns(
        &self,
        user_card: &UserCard,
        card: &Card,
    ) -> DfResult<Vec<SkillBreakdown>> {
        let skills = self.get_skills(user_card, card).await?;
        let character_rank = self.get_character_rank(card.character_id).await?;
        skills
            .iter()
            .map(|skill| Self::get_skill_breakdown(user_card, skill, character_rank))
            .collect()
    }

    fn get_skill_breakdown(
        user_card: &UserCard,
        skill: &Skill,
        character_rank: i32,
    ) -> DfResult<SkillBreakdown> {
        let mut ret = SkillBreakdown::default();
        for effect in &skill.skill_effects {
            let detail = find_or_err(&effect.skill_effect_details, "skill effect detail", |it| {
                it.level == user_card.skill_level
            })?;
            match effect.skill_effect_type {
                SkillEffectType::ScoreUp
                | SkillEffectType::ScoreUpConditionLife
                | SkillEffectType::ScoreUpKeep => {
                    if let Some(enhance) = &effect.skill_enhance {
                        ret.score_up_same_unit = Some((
                            enhance.skill_enhance_condition.unit,
                            enhance.activate_effect_value,
                        ));
                    }
                    ret.score_up_basic = ret.score_up_basic.max(detail.activate_effect_value);
                }
                SkillEffectType::LifeRecovery => {
                    ret.life_recovery += detail.activate_effect_value;
                }
                SkillEffectType::ScoreUpCharacterRank => {
                    if let Some(rank) = effect.activate_character_rank {
                        if rank <= character_rank {
                            ret.score_up_character_rank = ret
                                .score_up_character_rank
                                .max(detail.activate_effect_value);
                        }
                    }
                }
                SkillEffectType::OtherMemberScoreUpReferenceRate => {
                    ret.score_up_reference = Some((
                        detail.activate_effect_value,
                        detail.activate_effect_value2.unwrap_or(0.0),
                    ));
                }
                SkillEffectType::ScoreUpUnitCount => {
                    if let Some(count) = effect.activate_unit_count {
                        ret.score_up_different_unit
                            .get_or_insert_with(HashMap::new)
                            .insert(count as u8, detail.activate_effect_value);
                    }
                }
                SkillEffectType::Other => {}
            }
        }
        Ok(ret)
    }

    /// The base skill, plus the trained variant once special training is
    /// complete.
    async fn get_skills(&self, user_card: &UserCard, card: &Card) -> DfResult<Vec<Skill>> {
        let mut skill_ids = vec![card.skill_id];
        if let Some(trained_skill_id) = card.special_training_skill_id {
            if user_card.is_trained() {
                skill_ids.push(trained_skill_id);
            }
        }
        let skills = self.provider.master::<Skill>("skills").await?;
        Ok(skills
            .iter()
            .filter(|it| skill_ids.contains(&it.id))
            .cloned()
            .collect())
    }

    async fn get_character_rank(&self, character_id: i64) -> DfResult<i32> {
        let user_characters = self.provider.user::<Vec<UserCharacter>>("userCharacters").await?;
        Ok(find_or_err(&user_characters, "user character", |it| {
            it.character_id == character_id
        })?
        .character_rank)
    }
}
