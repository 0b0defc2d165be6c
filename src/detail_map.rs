//! Slot-conditional lookup maps attached to every card.
//!
//! A card's power, skill and event bonus all depend on who else ends up in
//! the deck. Rather than recomputing them per candidate deck, each card
//! precomputes a small map from deck-composition keys to resolved values,
//! together with min/max bounds over all entries. The bounds drive the
//! domination pruning of the deck search: a card whose `max` is below another
//! card's `min` can never beat it, whatever the composition.

use std::collections::HashMap;

use crate::error::{DeckForgeError, DfResult};
use crate::master::Unit;

/// First component of a composition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    /// Applies regardless of composition.
    Any,
    /// Keyed by the number of distinct units in the deck.
    Diff,
    /// Keyed by a concrete unit the card is counted under.
    Member(Unit),
}

/// Base map: composition key `(slot, unit_member, attr_member)` to value,
/// plus comparison bounds over everything ever inserted.
#[derive(Debug, Clone)]
pub struct DetailMap<T> {
    values: HashMap<(SlotKey, u8, u8), T>,
    min: f64,
    max: f64,
}

impl<T> Default for DetailMap<T> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl<T> DetailMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widens the bounds without storing an entry. Used when a value is
    /// reachable but not enumerable as a single map entry.
    pub fn note(&mut self, cmp: f64) {
        self.min = self.min.min(cmp);
        self.max = self.max.max(cmp);
    }

    pub fn set(&mut self, slot: SlotKey, unit_member: u8, attr_member: u8, cmp: f64, value: T) {
        self.note(cmp);
        self.values.insert((slot, unit_member, attr_member), value);
    }

    pub fn get(&self, slot: SlotKey, unit_member: u8, attr_member: u8) -> Option<&T> {
        self.values.get(&(slot, unit_member, attr_member))
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Sound only as a one-sided bound: `false` says nothing.
    pub fn is_certainly_less_than<U>(&self, other: &DetailMap<U>) -> bool {
        self.max < other.min
    }
}

/// Fully resolved power of one card under one deck composition.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPower {
    pub base: i64,
    pub area_item_bonus: i64,
    pub character_bonus: i64,
    pub fixture_bonus: i64,
    pub gate_bonus: i64,
    pub total: i64,
}

/// Power entries are keyed per card unit and per same-unit/same-attr flag
/// pair; member counts collapse to "5 of a kind or not".
#[derive(Debug, Clone, Default)]
pub struct PowerMap {
    map: DetailMap<CardPower>,
}

impl PowerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_power(&mut self, unit: Unit, same_unit: bool, same_attr: bool, value: CardPower) {
        self.map.set(
            SlotKey::Member(unit),
            if same_unit { 5 } else { 1 },
            if same_attr { 5 } else { 1 },
            value.total as f64,
            value,
        );
    }

    pub fn get_power(&self, unit: Unit, unit_member: u8, attr_member: u8) -> DfResult<&CardPower> {
        let unit_member = if unit_member == 5 { 5 } else { 1 };
        let attr_member = if attr_member == 5 { 5 } else { 1 };
        self.map
            .get(SlotKey::Member(unit), unit_member, attr_member)
            .ok_or_else(|| {
                DeckForgeError::NotFound(format!(
                    "power entry for {unit:?}/{unit_member}/{attr_member}"
                ))
            })
    }

    pub fn min(&self) -> f64 {
        self.map.min()
    }

    pub fn max(&self) -> f64 {
        self.map.max()
    }

    pub fn is_certainly_less_than(&self, other: &PowerMap) -> bool {
        self.map.is_certainly_less_than(&other.map)
    }
}

/// Reference-style skill: scales with the strongest other member, capped.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReferenceRate {
    pub base: f64,
    pub rate: f64,
    pub max: f64,
}

/// Resolved skill of one card under one deck composition. `score_up` is the
/// guaranteed value; `score_up_to_reference` is what this card contributes
/// when another member references it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDetail {
    pub score_up: f64,
    pub score_up_to_reference: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_up_reference: Option<ReferenceRate>,
    pub life_recovery: f64,
}

/// Skill entries: a composition-independent baseline, optional same-unit and
/// distinct-unit-count entries, and an optional reference skill that pins the
/// map to a single value.
#[derive(Debug, Clone, Default)]
pub struct SkillMap {
    map: DetailMap<SkillDetail>,
    fixed: Option<SkillDetail>,
}

impl SkillMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composition-independent skill; every lookup resolves to it until a
    /// same-unit entry widens the map again.
    pub fn set_fixed_skill(&mut self, value: SkillDetail) {
        self.map
            .set(SlotKey::Any, 1, 1, value.score_up, value.clone());
        self.fixed = Some(value);
    }

    pub fn set_reference_skill(&mut self, value: SkillDetail) -> DfResult<()> {
        let reference = value.score_up_reference.ok_or_else(|| {
            DeckForgeError::Config("reference skill without a reference rate".into())
        })?;
        // Guaranteed floor: referencing an average member yields at least
        // base + floor(10 * rate / 100).
        self.map
            .note(reference.base + (10.0 * reference.rate / 100.0).floor());
        self.map
            .set(SlotKey::Any, 1, 1, reference.max, value.clone());
        self.fixed = Some(value);
        Ok(())
    }

    pub fn set_same_unit_skill(&mut self, unit: Unit, unit_member: u8, value: SkillDetail) {
        self.set_unit_skill(SlotKey::Member(unit), unit_member, value);
    }

    pub fn set_diff_unit_skill(&mut self, unit_member: u8, value: SkillDetail) {
        self.set_unit_skill(SlotKey::Diff, unit_member, value);
    }

    fn set_unit_skill(&mut self, slot: SlotKey, unit_member: u8, value: SkillDetail) {
        self.map.set(slot, unit_member, 1, value.score_up, value);
        self.fixed = None;
    }

    /// Resolution order: pinned value, exact entry, the distinct-unit
    /// fallback at `min(2, n)`, then the baseline.
    pub fn get_skill(&self, slot: SlotKey, unit_member: u8) -> DfResult<&SkillDetail> {
        if let Some(fixed) = &self.fixed {
            return Ok(fixed);
        }
        if let Some(best) = self.map.get(slot, unit_member, 1) {
            return Ok(best);
        }
        if slot == SlotKey::Diff {
            if let Some(best) = self.map.get(SlotKey::Diff, unit_member.min(2), 1) {
                return Ok(best);
            }
        }
        self.map.get(SlotKey::Any, 1, 1).ok_or_else(|| {
            DeckForgeError::NotFound(format!("skill entry for {slot:?}/{unit_member}"))
        })
    }

    pub fn min(&self) -> f64 {
        self.map.min()
    }

    pub fn max(&self) -> f64 {
        self.map.max()
    }

    pub fn is_certainly_less_than(&self, other: &SkillMap) -> bool {
        self.map.is_certainly_less_than(&other.map)
    }
}

/// Event bonus of one card, split into its additive parts (percent).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBonus {
    pub fixed_bonus: f64,
    pub card_bonus: f64,
    pub leader_bonus: f64,
}

/// Bounds run from the fixed part alone to the fully stacked bonus, so
/// domination stays sound whether or not the card ends up leading.
#[derive(Debug, Clone, Default)]
pub struct EventBonusMap {
    map: DetailMap<EventBonus>,
    bonus: Option<EventBonus>,
}

impl EventBonusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bonus(&mut self, value: EventBonus) {
        self.map.note(value.fixed_bonus);
        self.map
            .note(value.fixed_bonus + value.card_bonus + value.leader_bonus);
        self.bonus = Some(value);
    }

    pub fn get_bonus(&self) -> DfResult<&EventBonus> {
        self.bonus
            .as_ref()
            .ok_or_else(|| DeckForgeError::NotFound("event bonus".into()))
    }

    pub fn get_max_bonus(&self, leader: bool) -> DfResult<f64> {
        let bonus = self.get_bonus()?;
        Ok(bonus.fixed_bonus + bonus.card_bonus + if leader { bonus.leader_bonus } else { 0.0 })
    }

    pub fn min(&self) -> f64 {
        self.map.min()
    }

    pub fn max(&self) -> f64 {
        self.map.max()
    }

    pub fn is_certainly_less_than(&self, other: &EventBonusMap) -> bool {
        self.map.is_certainly_less_than(&other.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(score_up: f64) -> SkillDetail {
        SkillDetail {
            score_up,
            score_up_to_reference: score_up,
            score_up_reference: None,
            life_recovery: 0.0,
        }
    }

    #[test]
    fn empty_map_bounds_never_dominate() {
        let a: DetailMap<()> = DetailMap::new();
        let b: DetailMap<()> = DetailMap::new();
        assert!(!a.is_certainly_less_than(&b));
    }

    #[test]
    fn fixed_skill_answers_any_lookup() {
        let mut map = SkillMap::new();
        map.set_fixed_skill(skill(100.0));
        let got = map
            .get_skill(SlotKey::Member(Unit::Street), 3)
            .expect("fixed skill");
        assert_eq!(got.score_up, 100.0);
    }

    #[test]
    fn same_unit_entry_unpins_the_fixed_skill() {
        let mut map = SkillMap::new();
        map.set_fixed_skill(skill(100.0));
        map.set_same_unit_skill(Unit::Street, 5, skill(150.0));
        let exact = map
            .get_skill(SlotKey::Member(Unit::Street), 5)
            .expect("exact entry");
        assert_eq!(exact.score_up, 150.0);
        let fallback = map
            .get_skill(SlotKey::Member(Unit::Idol), 2)
            .expect("baseline");
        assert_eq!(fallback.score_up, 100.0);
    }

    #[test]
    fn diff_lookup_falls_back_to_two_units() {
        let mut map = SkillMap::new();
        map.set_fixed_skill(skill(60.0));
        map.set_diff_unit_skill(2, skill(80.0));
        let got = map.get_skill(SlotKey::Diff, 5).expect("diff fallback");
        assert_eq!(got.score_up, 80.0);
    }

    #[test]
    fn power_lookup_collapses_member_counts() {
        let mut map = PowerMap::new();
        let value = CardPower {
            base: 100,
            area_item_bonus: 10,
            character_bonus: 5,
            fixture_bonus: 0,
            gate_bonus: 0,
            total: 115,
        };
        map.set_power(Unit::Idol, false, true, value);
        let got = map.get_power(Unit::Idol, 2, 5).expect("collapsed key");
        assert_eq!(got.total, 115);
        assert!(map.get_power(Unit::Idol, 5, 5).is_err());
    }

    #[test]
    fn event_bonus_bounds_span_fixed_to_full() {
        let mut map = EventBonusMap::new();
        map.set_bonus(EventBonus {
            fixed_bonus: 25.0,
            card_bonus: 10.0,
            leader_bonus: 5.0,
        });
        assert_eq!(map.min(), 25.0);
        assert_eq!(map.max(), 40.0);
        assert_eq!(map.get_max_bonus(false).expect("bonus"), 35.0);
        assert_eq!(map.get_max_bonus(true).expect("bonus"), 40.0);
    }
}
