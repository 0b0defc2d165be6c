#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use deckforge::error::{DeckForgeError, DfResult};
use deckforge::music::MusicMeta;
use deckforge::provider::{CachedDataProvider, DataProvider, SharedCache};

/// In-memory provider with fetch counters, so tests can assert how many
/// times the backing store was actually hit.
pub struct MemoryProvider {
    master: Value,
    user: Value,
    music_meta: Value,
    pub master_fetches: AtomicUsize,
    pub user_fetches: AtomicUsize,
}

impl MemoryProvider {
    pub fn new(master: Value, user: Value, music_meta: Value) -> Self {
        Self {
            master,
            user,
            music_meta,
            master_fetches: AtomicUsize::new(0),
            user_fetches: AtomicUsize::new(0),
        }
    }

    pub fn master_fetch_count(&self) -> usize {
        self.master_fetches.load(Ordering::SeqCst)
    }

    pub fn user_fetch_count(&self) -> usize {
        self.user_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataProvider for MemoryProvider {
    async fn get_master_data(&self, key: &str) -> DfResult<Value> {
        self.master_fetches.fetch_add(1, Ordering::SeqCst);
        self.master
            .get(key)
            .cloned()
            .ok_or_else(|| DeckForgeError::NotFound(format!("master table '{key}'")))
    }

    async fn get_user_data(&self, key: &str) -> DfResult<Value> {
        self.user
            .get(key)
            .cloned()
            .ok_or_else(|| DeckForgeError::NotFound(format!("user data '{key}'")))
    }

    async fn get_user_data_all(&self) -> DfResult<Value> {
        self.user_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.user.clone())
    }

    async fn get_music_meta(&self) -> DfResult<Value> {
        Ok(self.music_meta.clone())
    }
}

fn fixture_card(id: i64, character_id: i64) -> Value {
    json!({
        "id": id,
        "characterId": character_id,
        "cardRarityType": "rarity_4",
        "specialTrainingPower1BonusFixed": 300,
        "specialTrainingPower2BonusFixed": 300,
        "specialTrainingPower3BonusFixed": 300,
        "attr": "cool",
        "supportUnit": "none",
        "skillId": 1,
        "cardParameters": [
            { "cardLevel": 50, "cardParameterType": "param1", "power": 10000 },
            { "cardLevel": 50, "cardParameterType": "param2", "power": 10000 },
            { "cardLevel": 50, "cardParameterType": "param3", "power": 10000 },
            { "cardLevel": 60, "cardParameterType": "param1", "power": 12000 },
            { "cardLevel": 60, "cardParameterType": "param2", "power": 12000 },
            { "cardLevel": 60, "cardParameterType": "param3", "power": 12000 }
        ]
    })
}

/// Five rarity-4 cool cards (ids 101..105) for the five light_sound
/// characters, one plain score-up skill, no area items or honors.
pub fn base_master_data() -> Value {
    let characters: Vec<Value> = (1..=5)
        .map(|id| json!({ "id": id, "unit": "light_sound" }))
        .collect();
    let character_units: Vec<Value> = (1..=5)
        .map(|id| json!({ "id": id, "gameCharacterId": id, "unit": "light_sound" }))
        .collect();
    let character_ranks: Vec<Value> = (1..=5)
        .map(|id| {
            json!({
                "characterId": id,
                "characterRank": 1,
                "power1BonusRate": 0.0,
                "power2BonusRate": 0.0,
                "power3BonusRate": 0.0
            })
        })
        .collect();
    let cards: Vec<Value> = (1..=5).map(|id| fixture_card(100 + id, id)).collect();
    json!({
        "cards": cards,
        "cardEpisodes": [],
        "masterLessons": [],
        "cardRarities": [
            {
                "cardRarityType": "rarity_4",
                "maxLevel": 60,
                "trainingMaxLevel": 60,
                "maxSkillLevel": 4
            }
        ],
        "characterRanks": character_ranks,
        "gameCharacters": characters,
        "gameCharacterUnits": character_units,
        "skills": [
            {
                "id": 1,
                "skillEffects": [
                    {
                        "skillEffectType": "score_up",
                        "skillEffectDetails": [
                            { "level": 1, "activateEffectValue": 100.0 },
                            { "level": 2, "activateEffectValue": 110.0 },
                            { "level": 3, "activateEffectValue": 120.0 },
                            { "level": 4, "activateEffectValue": 130.0 }
                        ]
                    }
                ]
            }
        ],
        "eventCards": [],
        "eventDeckBonuses": [],
        "eventRarityBonusRates": [],
        "eventHonorBonuses": [],
        "areaItemLevels": [],
        "areas": [],
        "areaItems": [],
        "shopItems": [
            {
                "id": 1003,
                "costs": [
                    { "cost": { "resourceType": "coin", "quantity": 5000 } }
                ]
            },
            {
                "id": 1551,
                "costs": [
                    { "cost": { "resourceType": "coin", "quantity": 100000 } },
                    { "cost": { "resourceId": 17, "resourceType": "material", "quantity": 30 } }
                ]
            }
        ],
        "honors": [
            { "id": 1, "levels": [ { "level": 1, "bonus": 500 } ] }
        ],
        "events": [
            { "id": 1, "eventType": "marathon" },
            { "id": 9, "eventType": "festival" }
        ],
        "eventSkillScoreUpLimits": [],
        "eventCardBonusLimits": [],
        "eventMysekaiFixtureGameCharacterPerformanceBonusLimits": [],
        "worldBlooms": [],
        "worldBloomDifferentAttributeBonuses": [],
        "mysekaiGates": [],
        "mysekaiGateLevels": [],
        "ingameNodes": [
            { "id": 1, "scoreCoefficient": 1.0 },
            { "id": 2, "scoreCoefficient": 2.0 }
        ],
        "ingameCombos": [
            { "fromCount": 1, "toCount": 1000, "scoreCoefficient": 1.0 }
        ]
    })
}

/// Owns the five fixture cards at level 50, untrained, skill level 1.
pub fn base_user_data() -> Value {
    let user_cards: Vec<Value> = (1..=5)
        .map(|id| {
            json!({
                "cardId": 100 + id,
                "level": 50,
                "skillLevel": 1,
                "masterRank": 0,
                "specialTrainingStatus": "not_doing"
            })
        })
        .collect();
    let user_characters: Vec<Value> = (1..=5)
        .map(|id| json!({ "characterId": id, "characterRank": 1 }))
        .collect();
    json!({
        "userCards": user_cards,
        "userCharacters": user_characters,
        "userAreas": [],
        "userHonors": []
    })
}

/// Skill weights chosen so the live score math stays exact in f64.
pub fn base_music_meta() -> Value {
    json!([
        {
            "music_id": 1,
            "difficulty": "expert",
            "music_time": 120.0,
            "event_rate": 100.0,
            "base_score": 2.0,
            "base_score_auto": 1.75,
            "skill_score_solo": [0.25, 0.25, 0.25, 0.25, 0.25, 0.25],
            "skill_score_auto": [0.25, 0.25, 0.25, 0.25, 0.25, 0.25],
            "skill_score_multi": [0.625, 0.625, 0.625, 0.625, 0.625, 0.625],
            "fever_score": 1.0,
            "tap_count": 500
        }
    ])
}

pub fn fixture_music_meta() -> MusicMeta {
    serde_json::from_value(base_music_meta()[0].clone()).expect("music meta fixture")
}

pub fn provider_with(master: Value, user: Value) -> Arc<CachedDataProvider> {
    let inner = Arc::new(MemoryProvider::new(master, user, base_music_meta()));
    Arc::new(CachedDataProvider::new(inner, Arc::new(SharedCache::new())))
}

pub fn provider() -> Arc<CachedDataProvider> {
    provider_with(base_master_data(), base_user_data())
}
