//! Aggregate live score model driven by precomputed music meta.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::config::EventConfig;
use crate::deck::{DeckCalculator, DeckCardDetail, DeckCardSkill, DeckDetail};
use crate::error::{DeckForgeError, DfResult};
use crate::music::MusicMeta;
use crate::provider::CachedDataProvider;
use crate::recommend::ScoreFunction;
use crate::service::EventService;
use crate::user::UserCard;
use crate::util::find_or_err;

pub const MAX_LIFE: f64 = 2000.0;
pub const BASE_LIFE: f64 = 1000.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LiveType {
    Solo,
    Auto,
    Challenge,
    Multi,
    Cheerful,
}

/// A manually chosen skill order: card ids in activation order, leader last.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSkill {
    pub card_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDetail {
    pub score: i64,
    pub time: f64,
    pub life: i64,
    pub tap: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck: Option<DeckDetail>,
}

pub struct LiveCalculator {
    provider: Arc<CachedDataProvider>,
    deck_calculator: DeckCalculator,
    event_service: EventService,
}

impl LiveCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self {
            deck_calculator: DeckCalculator::new(provider.clone()),
            event_service: EventService::new(provider.clone()),
            provider,
        }
    }

    pub async fn get_music_meta(&self, music_id: i64, difficulty: &str) -> DfResult<MusicMeta> {
        let metas = self.provider.music_meta().await?;
        find_or_err(&metas, "music meta", |it| {
            it.music_id == music_id && it.difficulty == difficulty
        })
        .cloned()
    }

    fn get_base_score(music_meta: &MusicMeta, live_type: LiveType) -> f64 {
        match live_type {
            LiveType::Solo | LiveType::Challenge => music_meta.base_score,
            // Fever windows roughly double half the fever segment.
            LiveType::Multi | LiveType::Cheerful => {
                music_meta.base_score + music_meta.fever_score * 0.5
            }
            LiveType::Auto => music_meta.base_score_auto,
        }
    }

    fn get_skill_score(music_meta: &MusicMeta, live_type: LiveType) -> &[f64] {
        match live_type {
            LiveType::Solo | LiveType::Challenge => &music_meta.skill_score_solo,
            LiveType::Multi | LiveType::Cheerful => &music_meta.skill_score_multi,
            LiveType::Auto => &music_meta.skill_score_auto,
        }
    }

    /// Returns the six skill activations in slot order plus whether the
    /// caller may still sort the per-slot weights. A caller-provided order
    /// with a real leader slot passes through untouched.
    fn get_sorted_skill_details(
        deck_detail: &DeckDetail,
        live_type: LiveType,
        skill_details: Option<&[DeckCardSkill]>,
    ) -> DfResult<(Vec<DeckCardSkill>, bool)> {
        if let Some(details) = skill_details {
            if details.len() == 6 && details[5].score_up > 0.0 {
                return Ok((details.to_vec(), false));
            }
        }
        let leader = deck_detail.cards.first().ok_or_else(|| {
            DeckForgeError::Config("deck has no cards".into())
        })?;
        if live_type == LiveType::Multi {
            let skill = Self::get_multi_live_skill(deck_detail);
            return Ok((vec![skill; 6], false));
        }
        let mut sorted: Vec<DeckCardSkill> =
            deck_detail.cards.iter().map(|it| it.skill).collect();
        sorted.sort_by(|a, b| a.score_up.total_cmp(&b.score_up));
        let empty = DeckCardSkill {
            score_up: 0.0,
            life_recovery: 0.0,
        };
        sorted.resize(5, empty);
        sorted.push(leader.skill);
        Ok((sorted, true))
    }

    /// With a sortable order, the weakest weights land on the weakest
    /// skills; the trailing leader slot keeps its own weight.
    fn get_sorted_skill_rate(sorted: bool, card_length: usize, skill_scores: &[f64]) -> Vec<f64> {
        let mut rates = skill_scores.to_vec();
        if sorted {
            let end = card_length.min(rates.len());
            rates[..end].sort_by(|a, b| a.total_cmp(b));
        }
        rates
    }

    pub fn get_live_detail_by_deck(
        deck_detail: &DeckDetail,
        music_meta: &MusicMeta,
        live_type: LiveType,
        skill_details: Option<&[DeckCardSkill]>,
        multi_power_sum: i64,
    ) -> DfResult<LiveDetail> {
        let (details, sorted) =
            Self::get_sorted_skill_details(deck_detail, live_type, skill_details)?;
        let base_rate = Self::get_base_score(music_meta, live_type);
        let skill_scores = Self::get_skill_score(music_meta, live_type);
        let skill_rate = Self::get_sorted_skill_rate(sorted, deck_detail.cards.len(), skill_scores);
        let rate = base_rate
            + details
                .iter()
                .zip(&skill_rate)
                .map(|(detail, rate)| detail.score_up * rate / 100.0)
                .sum::<f64>();
        let life: f64 = details.iter().map(|it| it.life_recovery).sum();
        let power_sum = if multi_power_sum == 0 {
            5 * deck_detail.power.total
        } else {
            multi_power_sum
        };
        let active_bonus = if live_type == LiveType::Multi {
            5.0 * Self::get_multi_active_bonus(power_sum as f64)
        } else {
            0.0
        };
        Ok(LiveDetail {
            score: (rate * deck_detail.power.total as f64 * 4.0 + active_bonus).floor() as i64,
            time: music_meta.music_time,
            life: (life + BASE_LIFE).min(MAX_LIFE) as i64,
            tap: music_meta.tap_count,
            deck: None,
        })
    }

    pub fn get_multi_active_bonus(power_sum: f64) -> f64 {
        0.015 * power_sum
    }

    /// In multi lives teammates fire too: the leader counts in full, the
    /// rest at one fifth.
    fn get_multi_live_skill(deck_detail: &DeckDetail) -> DeckCardSkill {
        let score_up = deck_detail
            .cards
            .iter()
            .enumerate()
            .map(|(i, it)| {
                if i == 0 {
                    it.skill.score_up
                } else {
                    it.skill.score_up / 5.0
                }
            })
            .sum();
        let life_recovery = deck_detail
            .cards
            .first()
            .map(|it| it.skill.life_recovery)
            .unwrap_or(0.0);
        DeckCardSkill {
            score_up,
            life_recovery,
        }
    }

    /// Expands a caller-chosen activation order into the six slots; the last
    /// listed skill becomes the leader (encore) slot.
    fn get_solo_live_skill(
        live_skills: Option<&[LiveSkill]>,
        cards: &[DeckCardDetail],
    ) -> DfResult<Option<Vec<DeckCardSkill>>> {
        let Some(live_skills) = live_skills else {
            return Ok(None);
        };
        let skills: Vec<DeckCardSkill> = live_skills
            .iter()
            .map(|live_skill| {
                find_or_err(cards, "deck card", |it| it.card_id == live_skill.card_id)
                    .map(|it| it.skill)
            })
            .collect::<DfResult<_>>()?;
        let empty = DeckCardSkill {
            score_up: 0.0,
            life_recovery: 0.0,
        };
        let mut ret = vec![empty; 6];
        for (i, skill) in skills.iter().take(skills.len().saturating_sub(1)).enumerate() {
            ret[i] = *skill;
        }
        if let Some(last) = skills.last() {
            ret[5] = *last;
        }
        Ok(Some(ret))
    }

    pub async fn get_live_detail(
        &self,
        deck_cards: &[UserCard],
        music_meta: &MusicMeta,
        live_type: LiveType,
        live_skills: Option<&[LiveSkill]>,
        event_id: Option<i64>,
    ) -> DfResult<LiveDetail> {
        let event_config = match event_id {
            Some(id) => self.event_service.get_event_config(id, 0).await?,
            None => EventConfig::default(),
        };
        let deck_detail = self
            .deck_calculator
            .get_deck_detail(deck_cards, deck_cards, &event_config, None)
            .await?;
        let skills = if live_type == LiveType::Multi {
            None
        } else {
            Self::get_solo_live_skill(live_skills, &deck_detail.cards)?
        };
        let mut ret =
            Self::get_live_detail_by_deck(&deck_detail, music_meta, live_type, skills.as_deref(), 0)?;
        ret.deck = Some(deck_detail);
        Ok(ret)
    }

    pub fn get_live_score_by_deck(
        deck_detail: &DeckDetail,
        music_meta: &MusicMeta,
        live_type: LiveType,
    ) -> DfResult<i64> {
        Ok(Self::get_live_detail_by_deck(deck_detail, music_meta, live_type, None, 0)?.score)
    }

    pub fn get_live_score_function(live_type: LiveType) -> ScoreFunction {
        Box::new(move |music_meta, deck_detail| {
            Self::get_live_score_by_deck(deck_detail, music_meta, live_type).map(|it| it as f64)
        })
    }
}
