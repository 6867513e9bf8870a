//! Character documents: persisted fields plus the ephemeral derived view

use crate::config::{RulesConfig, MAX_STAT};
use crate::derived::{derive_stats, BonusAccumulator, DerivedStats};
use crate::formula::RollData;
use crate::item::Item;
use crate::source::{apply_sources, ActiveEffect, ItemSource, StatSource};
use crate::types::{Currency, SkillKey, StatKey, WeaponSkillKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A base stat as persisted. `None` means not yet assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatData {
    #[serde(default)]
    pub value: Option<i32>,
}

/// A skill or weapon skill as persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillData {
    #[serde(default)]
    pub trained: bool,
    pub stat: StatKey,
}

/// A resource whose maximum is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pool {
    #[serde(default)]
    pub current: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    /// Set once the builder has committed this character
    #[serde(default)]
    pub constructed: bool,
}

/// Persisted character fields (`system.*`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub fatigue: i32,
    #[serde(default = "default_stats")]
    pub stats: BTreeMap<StatKey, StatData>,
    #[serde(default = "default_skills")]
    pub skills: BTreeMap<SkillKey, SkillData>,
    #[serde(default = "default_weapon_skills")]
    pub weapon_skills: BTreeMap<WeaponSkillKey, SkillData>,
    #[serde(default)]
    pub health: Pool,
    #[serde(default)]
    pub mana: Pool,
    #[serde(default)]
    pub luck: Pool,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub attributes: Attributes,
}

fn default_level() -> u32 {
    1
}

fn default_stats() -> BTreeMap<StatKey, StatData> {
    StatKey::all().iter().map(|k| (*k, StatData::default())).collect()
}

fn default_skills() -> BTreeMap<SkillKey, SkillData> {
    SkillKey::all()
        .iter()
        .map(|k| (*k, SkillData { trained: false, stat: k.default_stat() }))
        .collect()
}

fn default_weapon_skills() -> BTreeMap<WeaponSkillKey, SkillData> {
    WeaponSkillKey::all()
        .iter()
        .map(|k| (*k, SkillData { trained: false, stat: k.default_stat() }))
        .collect()
}

impl Default for CharacterData {
    fn default() -> Self {
        CharacterData {
            level: default_level(),
            experience: 0,
            fatigue: 0,
            stats: default_stats(),
            skills: default_skills(),
            weapon_skills: default_weapon_skills(),
            health: Pool::default(),
            mana: Pool::default(),
            luck: Pool::default(),
            currency: Currency::default(),
            attributes: Attributes::default(),
        }
    }
}

impl CharacterData {
    /// Persisted base value; missing is 0
    pub fn stat_value(&self, key: StatKey) -> i32 {
        self.stats.get(&key).and_then(|s| s.value).unwrap_or(0)
    }

    pub fn set_stat(&mut self, key: StatKey, value: i32) {
        self.stats.entry(key).or_default().value = Some(value);
    }

    /// Level as used in formulas (never below 1)
    pub fn effective_level(&self) -> i32 {
        i32::try_from(self.level.max(1)).unwrap_or(i32::MAX)
    }

    /// Pre-bonus snapshot: persisted values only, stat totals equal clamped base values
    pub fn roll_data(&self) -> RollData {
        let mut data = RollData::new()
            .with("level", self.effective_level() as f64)
            .with("xp", self.experience as f64)
            .with("fatigue", self.fatigue as f64)
            .with("health.current", self.health.current as f64)
            .with("mana.current", self.mana.current as f64)
            .with("luck.current", self.luck.current as f64)
            .with("currency.gold", self.currency.gold as f64)
            .with("currency.silver", self.currency.silver as f64)
            .with("currency.copper", self.currency.copper as f64);
        for stat in StatKey::all() {
            let value = self.stat_value(*stat);
            data.insert(format!("{}.value", stat.key()), value as f64);
            data.insert(
                format!("{}.total", stat.key()),
                value.clamp(0, MAX_STAT) as f64,
            );
        }
        data
    }
}

/// A character document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub system: CharacterData,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub effects: Vec<ActiveEffect>,

    /// Derived values, valid only after [`Character::prepare_derived_data`]
    #[serde(skip)]
    pub derived: DerivedStats,
    /// Bonus lists collected during the last pass
    #[serde(skip)]
    pub bonuses: BonusAccumulator,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Character {
            id: id.into(),
            name: name.into(),
            system: CharacterData::default(),
            items: Vec::new(),
            effects: Vec::new(),
            derived: DerivedStats::default(),
            bonuses: BonusAccumulator::default(),
        }
    }

    /// Recompute every derived field from scratch
    pub fn prepare_derived_data(&mut self, rules: &RulesConfig) {
        let mut bonuses = BonusAccumulator::new();
        {
            let item_sources: Vec<ItemSource<'_>> =
                self.items.iter().map(ItemSource::new).collect();
            let mut sources: Vec<&dyn StatSource> = Vec::new();
            sources.extend(item_sources.iter().map(|s| s as &dyn StatSource));
            sources.extend(self.effects.iter().map(|e| e as &dyn StatSource));
            apply_sources(&mut sources, &mut bonuses);
        }

        self.derived = derive_stats(&self.system, &self.items, &bonuses, rules);
        self.bonuses = bonuses;

        tracing::debug!(
            character = %self.id,
            hp = self.derived.health.max,
            mana = self.derived.mana.max,
            armor = self.derived.armor,
            "prepared derived data"
        );
    }

    /// The first embedded class item, if any
    pub fn class_item(&self) -> Option<&Item> {
        self.items.iter().find(|i| i.as_class().is_some())
    }

    pub fn ancestry_item(&self) -> Option<&Item> {
        self.items.iter().find(|i| i.as_ancestry().is_some())
    }

    pub fn spells(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.is_spell())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_character_shape() {
        let data = CharacterData::default();
        assert_eq!(data.level, 1);
        assert_eq!(data.stats.len(), 6);
        assert_eq!(data.skills.len(), 12);
        assert_eq!(data.weapon_skills.len(), 4);
        assert_eq!(data.stat_value(StatKey::Might), 0);
    }

    #[test]
    fn test_roll_data_snapshot() {
        let mut data = CharacterData::default();
        data.set_stat(StatKey::Might, 4);
        data.level = 3;
        let roll = data.roll_data();
        assert_eq!(roll.get("might.value"), Some(4.0));
        assert_eq!(roll.get("might.total"), Some(4.0));
        assert_eq!(roll.get("level"), Some(3.0));
        assert_eq!(roll.get("mana.max"), None);
    }

    #[test]
    fn test_serialized_paths() {
        let mut character = Character::new("a1", "Test");
        character.system.set_stat(StatKey::Reason, 5);
        let json = serde_json::to_value(&character).unwrap();
        assert_eq!(json["system"]["stats"]["reason"]["value"], 5);
        assert!(json["system"]["weaponSkills"]["melee"].is_object());
        assert!(json.get("derived").is_none());
    }
}
