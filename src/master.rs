//! Static master-data records.
//!
//! Shapes mirror the game's master tables; only the fields the calculators
//! read are kept. Unknown JSON fields are ignored by serde.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Unit {
    LightSound,
    Idol,
    Street,
    ThemePark,
    SchoolRefusal,
    Piapro,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Attr {
    Cool,
    Cute,
    Happy,
    Mysterious,
    Pure,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum CardRarityType {
    #[serde(rename = "rarity_1")]
    #[strum(serialize = "rarity_1")]
    Rarity1,
    #[serde(rename = "rarity_2")]
    #[strum(serialize = "rarity_2")]
    Rarity2,
    #[serde(rename = "rarity_3")]
    #[strum(serialize = "rarity_3")]
    Rarity3,
    #[serde(rename = "rarity_4")]
    #[strum(serialize = "rarity_4")]
    Rarity4,
    #[serde(rename = "rarity_birthday")]
    #[strum(serialize = "rarity_birthday")]
    RarityBirthday,
}

/// `supportUnit` is `"none"` for most cards and a unit name for virtual
/// singer cards appearing in another unit's songs.
fn unit_or_none<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Unit>, D::Error> {
    let s = String::deserialize(d)?;
    if s == "none" {
        Ok(None)
    } else {
        s.parse().map(Some).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardParameter {
    pub card_level: i32,
    pub card_parameter_type: String,
    pub power: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    pub character_id: i64,
    pub card_rarity_type: CardRarityType,
    pub special_training_power1_bonus_fixed: i64,
    pub special_training_power2_bonus_fixed: i64,
    pub special_training_power3_bonus_fixed: i64,
    pub attr: Attr,
    #[serde(deserialize_with = "unit_or_none")]
    pub support_unit: Option<Unit>,
    pub skill_id: i64,
    #[serde(default)]
    pub special_training_skill_id: Option<i64>,
    pub card_parameters: Vec<CardParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEpisode {
    pub id: i64,
    pub card_id: i64,
    pub power1_bonus_fixed: i64,
    pub power2_bonus_fixed: i64,
    pub power3_bonus_fixed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRarity {
    pub card_rarity_type: CardRarityType,
    pub max_level: i32,
    #[serde(default)]
    pub training_max_level: Option<i32>,
    pub max_skill_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterLesson {
    pub card_rarity_type: CardRarityType,
    pub master_rank: i32,
    pub power1_bonus_fixed: i64,
    pub power2_bonus_fixed: i64,
    pub power3_bonus_fixed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMysekaiCanvasBonus {
    pub card_rarity_type: CardRarityType,
    pub power1_bonus_fixed: i64,
    pub power2_bonus_fixed: i64,
    pub power3_bonus_fixed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRank {
    pub character_id: i64,
    pub character_rank: i32,
    pub power1_bonus_rate: f64,
    pub power2_bonus_rate: f64,
    pub power3_bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCharacter {
    pub id: i64,
    pub unit: Unit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCharacterUnit {
    pub id: i64,
    pub game_character_id: i64,
    pub unit: Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillEffectType {
    ScoreUp,
    ScoreUpConditionLife,
    ScoreUpKeep,
    LifeRecovery,
    ScoreUpCharacterRank,
    OtherMemberScoreUpReferenceRate,
    ScoreUpUnitCount,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEffectDetail {
    pub level: i32,
    pub activate_effect_value: f64,
    #[serde(default)]
    pub activate_effect_value2: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEnhanceCondition {
    pub unit: Unit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEnhance {
    pub activate_effect_value: f64,
    pub skill_enhance_condition: SkillEnhanceCondition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEffect {
    pub skill_effect_type: SkillEffectType,
    #[serde(default)]
    pub activate_character_rank: Option<i32>,
    #[serde(default)]
    pub activate_unit_count: Option<usize>,
    pub skill_effect_details: Vec<SkillEffectDetail>,
    #[serde(default)]
    pub skill_enhance: Option<SkillEnhance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    pub skill_effects: Vec<SkillEffect>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaItem {
    pub id: i64,
    pub area_id: i64,
}

/// One upgrade level of an area item. `target_unit`/`target_card_attr` are
/// `"any"` or a concrete unit/attr name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaItemLevel {
    pub area_item_id: i64,
    pub level: i32,
    pub target_unit: String,
    pub target_card_attr: String,
    #[serde(default)]
    pub target_game_character_id: Option<i64>,
    pub power1_bonus_rate: f64,
    pub power1_all_match_bonus_rate: f64,
    pub power2_bonus_rate: f64,
    pub power2_all_match_bonus_rate: f64,
    pub power3_bonus_rate: f64,
    pub power3_all_match_bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonResource {
    #[serde(default)]
    pub resource_id: Option<i64>,
    pub resource_type: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItemCost {
    pub cost: CommonResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    pub id: i64,
    pub costs: Vec<ShopItemCost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HonorLevel {
    pub level: i32,
    pub bonus: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Honor {
    pub id: i64,
    pub levels: Vec<HonorLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub event_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCard {
    pub event_id: i64,
    pub card_id: i64,
    pub bonus_rate: f64,
    #[serde(default)]
    pub leader_bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDeckBonus {
    pub event_id: i64,
    #[serde(default)]
    pub game_character_unit_id: Option<i64>,
    #[serde(default)]
    pub card_attr: Option<Attr>,
    pub bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRarityBonusRate {
    pub card_rarity_type: CardRarityType,
    pub master_rank: i32,
    pub bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHonorBonus {
    pub event_id: i64,
    pub leader_game_character_id: i64,
    pub honor_id: i64,
    pub bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCardBonusLimit {
    pub event_id: i64,
    pub member_count_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSkillScoreUpLimit {
    pub event_id: i64,
    pub score_up_rate_limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMysekaiFixtureLimit {
    pub event_id: i64,
    pub bonus_rate_limit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBloom {
    pub event_id: i64,
    pub game_character_id: i64,
    pub world_bloom_chapter_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBloomDifferentAttributeBonus {
    pub attribute_count: usize,
    pub bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBloomSupportDeckCharacterBonus {
    pub world_bloom_support_deck_character_type: String,
    pub bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBloomSupportDeckMasterRankBonus {
    pub master_rank: i32,
    pub bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBloomSupportDeckSkillLevelBonus {
    pub skill_level: i32,
    pub bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBloomSupportDeckBonus {
    pub card_rarity_type: CardRarityType,
    pub world_bloom_support_deck_character_bonuses: Vec<WorldBloomSupportDeckCharacterBonus>,
    pub world_bloom_support_deck_master_rank_bonuses: Vec<WorldBloomSupportDeckMasterRankBonus>,
    pub world_bloom_support_deck_skill_level_bonuses: Vec<WorldBloomSupportDeckSkillLevelBonus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBloomSupportDeckUnitEventLimitedBonus {
    pub event_id: i64,
    pub game_character_id: i64,
    pub card_id: i64,
    pub bonus_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MysekaiGate {
    pub id: i64,
    pub unit: Unit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MysekaiGateLevel {
    pub mysekai_gate_id: i64,
    pub level: i32,
    pub power_bonus_rate: f64,
}

/// Per-note-type score coefficient (table key `ingameNodes`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngameNote {
    pub id: i64,
    pub score_coefficient: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngameCombo {
    pub from_count: i64,
    pub to_count: i64,
    pub score_coefficient: f64,
}
