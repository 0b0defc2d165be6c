//! Tunable inputs to the calculators and the deck search.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::event::EventType;
use crate::master::{CardRarityType, Unit, WorldBloomDifferentAttributeBonus};
use crate::music::MusicMeta;

/// What-if overrides applied to owned cards before calculation, keyed by
/// rarity. All off by default.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardConfig {
    /// Exclude cards of this rarity entirely.
    pub disable: bool,
    /// Pretend the card is at max level (trained if the rarity allows it).
    pub rank_max: bool,
    /// Pretend every side story is read.
    pub episode_read: bool,
    /// Pretend master rank 5.
    pub master_max: bool,
    /// Pretend max skill level for the rarity.
    pub skill_max: bool,
}

pub type CardConfigMap = HashMap<CardRarityType, CardConfig>;

pub const WORLD_BLOOM_FINALE: &str = "finale";

/// Resolved event context. Assembled by
/// [`crate::service::EventService::get_event_config`]; the default value
/// stands for "no event running".
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// 0 when no event applies.
    pub event_id: i64,
    pub event_type: EventType,
    /// Unit shared by every bonus row of the event, if there is one.
    pub event_unit: Option<Unit>,
    /// World-bloom chapter character, 0 otherwise.
    pub special_character_id: i64,
    /// How many per-card bonuses may stack in one deck.
    pub card_bonus_count_limit: usize,
    pub skill_score_up_limit: f64,
    pub mysekai_fixture_limit: f64,
    pub world_bloom_different_attribute_bonuses: Option<Vec<WorldBloomDifferentAttributeBonus>>,
    pub world_bloom_type: Option<String>,
    pub world_bloom_support_unit: Option<Unit>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            event_id: 0,
            event_type: EventType::None,
            event_unit: None,
            special_character_id: 0,
            card_bonus_count_limit: 5,
            skill_score_up_limit: f64::INFINITY,
            mysekai_fixture_limit: f64::INFINITY,
            world_bloom_different_attribute_bonuses: None,
            world_bloom_type: None,
            world_bloom_support_unit: None,
        }
    }
}

impl EventConfig {
    pub fn is_world_bloom_finale(&self) -> bool {
        self.world_bloom_type.as_deref() == Some(WORLD_BLOOM_FINALE)
    }
}

/// Parameters of one deck-search run.
#[derive(Debug, Clone)]
pub struct DeckRecommendConfig {
    pub music_meta: MusicMeta,
    /// How many decks to keep.
    pub limit: usize,
    /// Deck size, usually 5.
    pub member: usize,
    /// Pin this character into the leader slot; 0 leaves it free.
    pub leader_character_id: i64,
    pub card_config: CardConfigMap,
}

impl DeckRecommendConfig {
    pub fn new(music_meta: MusicMeta) -> Self {
        Self {
            music_meta,
            limit: 1,
            member: 5,
            leader_character_id: 0,
            card_config: CardConfigMap::new(),
        }
    }
}
