//! Player-owned mutable state.

use serde::{Deserialize, Serialize};

use crate::master::Unit;

pub const SPECIAL_TRAINING_DONE: &str = "done";
pub const SCENARIO_ALREADY_READ: &str = "already_read";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCardEpisode {
    pub card_episode_id: i64,
    pub scenario_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub card_id: i64,
    pub level: i32,
    pub skill_level: i32,
    pub master_rank: i32,
    pub special_training_status: String,
    #[serde(default)]
    pub episodes: Option<Vec<UserCardEpisode>>,
}

impl UserCard {
    pub fn is_trained(&self) -> bool {
        self.special_training_status == SPECIAL_TRAINING_DONE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCharacter {
    pub character_id: i64,
    pub character_rank: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserHonor {
    pub honor_id: i64,
    pub level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAreaItem {
    pub area_item_id: i64,
    pub level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserArea {
    pub area_id: i64,
    #[serde(default)]
    pub area_items: Vec<UserAreaItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeck {
    pub user_id: i64,
    pub deck_id: i64,
    pub name: String,
    pub leader: i64,
    pub sub_leader: i64,
    pub member1: i64,
    pub member2: i64,
    pub member3: i64,
    pub member4: i64,
    pub member5: i64,
}

impl UserDeck {
    pub fn members(&self) -> [i64; 5] {
        [
            self.member1,
            self.member2,
            self.member3,
            self.member4,
            self.member5,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChallengeLiveSoloDeck {
    pub character_id: i64,
    pub leader: Option<i64>,
    pub support1: Option<i64>,
    pub support2: Option<i64>,
    pub support3: Option<i64>,
    pub support4: Option<i64>,
}

impl UserChallengeLiveSoloDeck {
    pub fn members(&self) -> Vec<i64> {
        [
            self.leader,
            self.support1,
            self.support2,
            self.support3,
            self.support4,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// World-bloom support deck: up to 20 members, zero-padded slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWorldBloomSupportDeck {
    pub game_character_id: i64,
    pub event_id: i64,
    pub members: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMysekaiCanvas {
    pub card_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMysekaiGate {
    pub mysekai_gate_id: i64,
    pub mysekai_gate_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMysekaiFixtureBonus {
    pub game_character_id: i64,
    pub total_bonus_rate: f64,
}

/// Resolved gate bonus (gate joined with its current level).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MysekaiGateBonus {
    pub unit: Unit,
    pub power_bonus_rate: f64,
}
