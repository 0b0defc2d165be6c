use std::sync::Arc;

use crate::config::EventConfig;
use crate::error::{DeckForgeError, DfResult};
use crate::event::EventType;
use crate::master::{
    Event, EventCardBonusLimit, EventDeckBonus, EventMysekaiFixtureLimit, EventSkillScoreUpLimit,
    GameCharacter, GameCharacterUnit, Unit, WorldBloom, WorldBloomDifferentAttributeBonus,
};
use crate::provider::CachedDataProvider;
use crate::util::find_or_err;

pub struct EventService {
    provider: Arc<CachedDataProvider>,
}

impl EventService {
    pub fn new(provider: Arc<CachedDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_event_type(&self, event_id: i64) -> DfResult<EventType> {
        let events = self.provider.master::<Event>("events").await?;
        let event = find_or_err(&events, "event", |it| it.id == event_id)?;
        event
            .event_type
            .parse()
            .map_err(|_| DeckForgeError::Config(format!("unknown event type {}", event.event_type)))
    }

    /// Assembles everything event-dependent the calculators need. Pass the
    /// chapter character for world-bloom events, 0 otherwise.
    pub async fn get_event_config(
        &self,
        event_id: i64,
        special_character_id: i64,
    ) -> DfResult<EventConfig> {
        let event_type = self.get_event_type(event_id).await?;
        let is_world_bloom = event_type == EventType::Bloom;
        let world_bloom_type = if is_world_bloom {
            self.get_world_bloom_type(event_id).await?
        } else {
            None
        };
        let is_finale = world_bloom_type.as_deref() == Some(crate::config::WORLD_BLOOM_FINALE);
        Ok(EventConfig {
            event_id,
            event_type,
            event_unit: self.get_event_bonus_unit(event_id).await?,
            special_character_id,
            card_bonus_count_limit: if is_finale {
                self.get_event_card_bonus_count_limit(event_id).await?
            } else {
                5
            },
            skill_score_up_limit: self.get_event_skill_score_up_limit(event_id).await?,
            mysekai_fixture_limit: if is_finale {
                self.get_mysekai_fixture_limit(event_id).await?
            } else {
                f64::INFINITY
            },
            world_bloom_different_attribute_bonuses: if is_world_bloom {
                Some(
                    self.provider
                        .master::<WorldBloomDifferentAttributeBonus>(
                            "worldBloomDifferentAttributeBonuses",
                        )
                        .await?
                        .as_ref()
                        .clone(),
                )
            } else {
                None
            },
            world_bloom_type,
            world_bloom_support_unit: if is_world_bloom {
                self.get_world_bloom_support_unit(special_character_id)
                    .await?
            } else {
                None
            },
        })
    }

    /// The unit shared by every character-targeted bonus row of the event,
    /// if one exists. A character counts for its own unit and, when the
    /// bonus row pins a different unit, for that one too.
    async fn get_event_bonus_unit(&self, event_id: i64) -> DfResult<Option<Unit>> {
        let deck_bonuses = self.provider.master::<EventDeckBonus>("eventDeckBonuses").await?;
        let character_units = self
            .provider
            .master::<GameCharacterUnit>("gameCharacterUnits")
            .await?;
        let characters = self.provider.master::<GameCharacter>("gameCharacters").await?;
        let bonuses: Vec<&GameCharacterUnit> = deck_bonuses
            .iter()
            .filter(|it| it.event_id == event_id)
            .filter_map(|it| it.game_character_unit_id)
            .map(|id| find_or_err(&character_units, "game character unit", |a| a.id == id))
            .collect::<DfResult<_>>()?;
        let mut counts: Vec<(Unit, usize)> = Vec::new();
        let bump = |unit: Unit, counts: &mut Vec<(Unit, usize)>| {
            match counts.iter_mut().find(|(u, _)| *u == unit) {
                Some((_, n)) => *n += 1,
                None => counts.push((unit, 1)),
            }
        };
        for gcu in &bonuses {
            let character =
                find_or_err(&characters, "game character", |it| it.id == gcu.game_character_id)?;
            bump(character.unit, &mut counts);
            if character.unit != gcu.unit {
                bump(gcu.unit, &mut counts);
            }
        }
        Ok(counts
            .into_iter()
            .find(|(_, n)| *n == bonuses.len())
            .map(|(unit, _)| unit))
    }

    async fn get_event_card_bonus_count_limit(&self, event_id: i64) -> DfResult<usize> {
        let limits = self
            .provider
            .master::<EventCardBonusLimit>("eventCardBonusLimits")
            .await?;
        Ok(limits
            .iter()
            .find(|it| it.event_id == event_id)
            .map(|it| it.member_count_limit)
            .unwrap_or(5))
    }

    async fn get_event_skill_score_up_limit(&self, event_id: i64) -> DfResult<f64> {
        let limits = self
            .provider
            .master::<EventSkillScoreUpLimit>("eventSkillScoreUpLimits")
            .await?;
        Ok(limits
            .iter()
            .find(|it| it.event_id == event_id)
            .map(|it| it.score_up_rate_limit)
            .unwrap_or(f64::INFINITY))
    }

    async fn get_mysekai_fixture_limit(&self, event_id: i64) -> DfResult<f64> {
        let limits = self
            .provider
            .master::<EventMysekaiFixtureLimit>(
                "eventMysekaiFixtureGameCharacterPerformanceBonusLimits",
            )
            .await?;
        Ok(limits
            .iter()
            .find(|it| it.event_id == event_id)
            .map(|it| it.bonus_rate_limit)
            .unwrap_or(f64::INFINITY))
    }

    async fn get_world_bloom_type(&self, event_id: i64) -> DfResult<Option<String>> {
        let world_blooms = self.provider.master::<WorldBloom>("worldBlooms").await?;
        Ok(world_blooms
            .iter()
            .find(|it| it.event_id == event_id)
            .map(|it| it.world_bloom_chapter_type.clone()))
    }

    async fn get_world_bloom_support_unit(
        &self,
        special_character_id: i64,
    ) -> DfResult<Option<Unit>> {
        if special_character_id <= 0 {
            return Ok(None);
        }
        let characters = self.provider.master::<GameCharacter>("gameCharacters").await?;
        Ok(Some(
            find_or_err(&characters, "game character", |it| it.id == special_character_id)?.unit,
        ))
    }
}
