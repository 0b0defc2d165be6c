//! Note-exact score model over a parsed chart.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{DeckForgeError, DfResult};
use crate::live::{LiveCalculator, LiveType};
use crate::master::{IngameCombo, IngameNote};
use crate::music::MusicScore;
use crate::provider::CachedDataProvider;
use crate::util::find_or_err;

const SKILL_DURATION: f64 = 5.0;
const FEVER_EFFECT: f64 = 50.0;

#[derive(Debug, Clone, Copy)]
struct EffectWindow {
    start_time: f64,
    end_time: f64,
    effect: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveNoteScore {
    pub note_coefficient: f64,
    pub combo_coefficient: f64,
    pub judge_coefficient: f64,
    pub effect_bonuses: Vec<f64>,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveExactDetail {
    pub total: f64,
    pub active_bonus: f64,
    pub notes: Vec<LiveNoteScore>,
}

pub struct LiveExactCalculator {
    provider: Arc<CachedDataProvider>,
}

impl LiveExactCalculator {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    /// Scores each note of the chart under the given skill activations.
    /// `skills` are effect percentages in activation order, one per chart
    /// skill trigger. `fever_music_score` lets a different chart drive the
    /// fever window (cheerful lives play the fever chart separately).
    pub async fn calculate(
        &self,
        power: i64,
        skills: &[f64],
        live_type: LiveType,
        music_score: &MusicScore,
        multi_sum_power: Option<i64>,
        fever_music_score: Option<&MusicScore>,
    ) -> DfResult<LiveExactDetail> {
        if skills.len() < music_score.skills.len() {
            return Err(DeckForgeError::Config(format!(
                "chart has {} skill triggers but only {} skill values given",
                music_score.skills.len(),
                skills.len()
            )));
        }
        let mut effects = Self::get_skill_windows(skills, music_score);
        if live_type == LiveType::Multi || live_type == LiveType::Cheerful {
            effects.push(Self::get_fever_window(
                fever_music_score.unwrap_or(music_score),
            ));
        }
        let ingame_notes = self.provider.master::<IngameNote>("ingameNodes").await?;
        let note_coefficients: Vec<f64> = music_score
            .notes
            .iter()
            .map(|note| {
                find_or_err(&ingame_notes, "ingame note", |it| it.id == note.kind)
                    .map(|it| it.score_coefficient)
            })
            .collect::<DfResult<_>>()?;
        let coefficient_total: f64 = note_coefficients.iter().sum();
        let ingame_combos = self.provider.master::<IngameCombo>("ingameCombos").await?;
        let mut notes = Vec::with_capacity(music_score.notes.len());
        for (i, note) in music_score.notes.iter().enumerate() {
            let note_coefficient = note_coefficients[i];
            let combo = (i + 1) as i64;
            let combo_coefficient = find_or_err(&ingame_combos, "ingame combo", |it| {
                it.from_count <= combo && combo <= it.to_count
            })?
            .score_coefficient;
            let judge_coefficient = 1.0;
            let effect_bonuses: Vec<f64> = effects
                .iter()
                .filter(|it| it.start_time <= note.time && note.time <= it.end_time)
                .map(|it| it.effect)
                .collect();
            let effect_coefficient: f64 =
                effect_bonuses.iter().fold(1.0, |total, it| total * it / 100.0);
            let score = note_coefficient * combo_coefficient * judge_coefficient
                * effect_coefficient
                * power as f64
                * 4.0
                / coefficient_total;
            notes.push(LiveNoteScore {
                note_coefficient,
                combo_coefficient,
                judge_coefficient,
                effect_bonuses,
                score,
            });
        }
        let note_total: f64 = notes.iter().map(|it| it.score).sum();
        let active_bonus = if live_type == LiveType::Multi {
            let sum_power = multi_sum_power.unwrap_or(power * 5);
            5.0 * LiveCalculator::get_multi_active_bonus(sum_power as f64)
        } else {
            0.0
        };
        Ok(LiveExactDetail {
            total: note_total + active_bonus,
            active_bonus,
            notes,
        })
    }

    fn get_skill_windows(skills: &[f64], music_score: &MusicScore) -> Vec<EffectWindow> {
        music_score
            .skills
            .iter()
            .enumerate()
            .map(|(i, it)| EffectWindow {
                start_time: it.time,
                end_time: it.time + SKILL_DURATION,
                effect: skills[i],
            })
            .collect()
    }

    /// Fever runs from the last fever trigger until a tenth of the chart's
    /// notes have passed.
    fn get_fever_window(music_score: &MusicScore) -> EffectWindow {
        let none = EffectWindow {
            start_time: 0.0,
            end_time: 0.0,
            effect: 0.0,
        };
        if music_score.fevers.is_empty() {
            return none;
        }
        let start_time = music_score
            .fevers
            .iter()
            .fold(0f64, |v, it| v.max(it.time));
        let notes_after: Vec<f64> = music_score
            .notes
            .iter()
            .filter(|note| note.time >= start_time)
            .map(|note| note.time)
            .collect();
        let fever_note_count = notes_after.len().min(music_score.notes.len() / 10);
        let Some(&end_time) = fever_note_count
            .checked_sub(1)
            .and_then(|i| notes_after.get(i))
        else {
            return none;
        };
        EffectWindow {
            start_time,
            end_time,
            effect: FEVER_EFFECT,
        }
    }
}
