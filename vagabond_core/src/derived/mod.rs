//! Derived stats - Everything recomputed on each preparation pass

mod accumulator;
mod computed;
mod pipeline;

pub use accumulator::{BonusAccumulator, BonusTarget, UnknownTarget};
pub use pipeline::derive_stats;

use crate::types::{AttackCategory, SaveKey, SkillKey, StatKey, WeaponSkillKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Base value, evaluated bonus and clamped total for one stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatTotal {
    pub value: i32,
    pub bonus: i32,
    pub total: i32,
}

/// A save or skill check on the inverted difficulty scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Check {
    pub stat: StatKey,
    pub trained: bool,
    pub bonus: i32,
    pub difficulty: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HealthDerived {
    pub max: i32,
    pub bonus: i32,
    pub per_level_bonus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ManaDerived {
    pub max: i32,
    pub casting_max: i32,
    pub bonus: i32,
    pub casting_max_bonus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpeedDerived {
    pub base: i32,
    pub crawl: i32,
    pub travel: i32,
    pub bonus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InventoryDerived {
    pub max_slots: i32,
    pub bonus_slots: i32,
    pub occupied_slots: i32,
    pub available_slots: i32,
    /// Includes zero-slot items
    pub item_count: u32,
}

/// Evaluated universal damage and check modifiers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UniversalBonuses {
    pub damage: i32,
    pub weapon_damage: BTreeMap<WeaponSkillKey, i32>,
    pub spell_damage: i32,
    pub alchemical_damage: i32,
    pub die_size: BTreeMap<AttackCategory, i32>,
    pub crit_threshold: BTreeMap<AttackCategory, i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LevelUp {
    pub next_level: u32,
    pub xp_required: u32,
    pub can_level_up: bool,
}

/// Ephemeral view of a character, never persisted
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivedStats {
    pub stats: BTreeMap<StatKey, StatTotal>,
    pub saves: BTreeMap<SaveKey, Check>,
    pub skills: BTreeMap<SkillKey, Check>,
    pub weapon_skills: BTreeMap<WeaponSkillKey, Check>,
    pub health: HealthDerived,
    pub mana: ManaDerived,
    pub is_spellcaster: bool,
    pub speed: SpeedDerived,
    pub armor: i32,
    pub inventory: InventoryDerived,
    pub universal: UniversalBonuses,
    pub luck_max: i32,
    pub level_up: LevelUp,
}
