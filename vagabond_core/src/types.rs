//! Enumerated rule constants shared by the stat engine and the builder

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string does not name a known constant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownKey {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownKey {
    fn new(kind: &'static str, value: &str) -> Self {
        UnknownKey {
            kind,
            value: value.to_string(),
        }
    }
}

/// The six base character stats (range 0-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Might,
    Dexterity,
    Awareness,
    Reason,
    Presence,
    Luck,
}

impl StatKey {
    /// All stats, in the order used for automatic assignment
    pub fn all() -> &'static [StatKey] {
        &[
            StatKey::Might,
            StatKey::Dexterity,
            StatKey::Awareness,
            StatKey::Reason,
            StatKey::Presence,
            StatKey::Luck,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            StatKey::Might => "might",
            StatKey::Dexterity => "dexterity",
            StatKey::Awareness => "awareness",
            StatKey::Reason => "reason",
            StatKey::Presence => "presence",
            StatKey::Luck => "luck",
        }
    }

    /// Position of this stat in [`StatKey::all`]
    pub fn index(&self) -> usize {
        match self {
            StatKey::Might => 0,
            StatKey::Dexterity => 1,
            StatKey::Awareness => 2,
            StatKey::Reason => 3,
            StatKey::Presence => 4,
            StatKey::Luck => 5,
        }
    }
}

impl FromStr for StatKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::all()
            .iter()
            .copied()
            .find(|k| k.key() == s)
            .ok_or_else(|| UnknownKey::new("stat", s))
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Saving throws, each governed by a fixed pair of stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveKey {
    Reflex,
    Endure,
    Will,
}

impl SaveKey {
    pub fn all() -> &'static [SaveKey] {
        &[SaveKey::Reflex, SaveKey::Endure, SaveKey::Will]
    }

    pub fn key(&self) -> &'static str {
        match self {
            SaveKey::Reflex => "reflex",
            SaveKey::Endure => "endure",
            SaveKey::Will => "will",
        }
    }

    /// The two stats summed for this save. Endure counts Might twice.
    pub fn stats(&self) -> (StatKey, StatKey) {
        match self {
            SaveKey::Reflex => (StatKey::Dexterity, StatKey::Awareness),
            SaveKey::Endure => (StatKey::Might, StatKey::Might),
            SaveKey::Will => (StatKey::Reason, StatKey::Presence),
        }
    }
}

impl FromStr for SaveKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SaveKey::all()
            .iter()
            .copied()
            .find(|k| k.key() == s)
            .ok_or_else(|| UnknownKey::new("save", s))
    }
}

/// The twelve general skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKey {
    Arcana,
    Craft,
    Medicine,
    Brawl,
    Finesse,
    Sneak,
    Detect,
    Mysticism,
    Survival,
    Influence,
    Leadership,
    Performance,
}

impl SkillKey {
    pub fn all() -> &'static [SkillKey] {
        &[
            SkillKey::Arcana,
            SkillKey::Craft,
            SkillKey::Medicine,
            SkillKey::Brawl,
            SkillKey::Finesse,
            SkillKey::Sneak,
            SkillKey::Detect,
            SkillKey::Mysticism,
            SkillKey::Survival,
            SkillKey::Influence,
            SkillKey::Leadership,
            SkillKey::Performance,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            SkillKey::Arcana => "arcana",
            SkillKey::Craft => "craft",
            SkillKey::Medicine => "medicine",
            SkillKey::Brawl => "brawl",
            SkillKey::Finesse => "finesse",
            SkillKey::Sneak => "sneak",
            SkillKey::Detect => "detect",
            SkillKey::Mysticism => "mysticism",
            SkillKey::Survival => "survival",
            SkillKey::Influence => "influence",
            SkillKey::Leadership => "leadership",
            SkillKey::Performance => "performance",
        }
    }

    /// Stat that governs this skill on a fresh character
    pub fn default_stat(&self) -> StatKey {
        match self {
            SkillKey::Arcana | SkillKey::Craft | SkillKey::Medicine => StatKey::Reason,
            SkillKey::Brawl => StatKey::Might,
            SkillKey::Finesse | SkillKey::Sneak => StatKey::Dexterity,
            SkillKey::Detect | SkillKey::Mysticism | SkillKey::Survival => StatKey::Awareness,
            SkillKey::Influence | SkillKey::Leadership | SkillKey::Performance => {
                StatKey::Presence
            }
        }
    }
}

impl FromStr for SkillKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillKey::all()
            .iter()
            .copied()
            .find(|k| k.key() == s)
            .ok_or_else(|| UnknownKey::new("skill", s))
    }
}

impl fmt::Display for SkillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Weapon skills, shaped like skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSkillKey {
    Melee,
    Brawl,
    Finesse,
    Ranged,
}

impl WeaponSkillKey {
    pub fn all() -> &'static [WeaponSkillKey] {
        &[
            WeaponSkillKey::Melee,
            WeaponSkillKey::Brawl,
            WeaponSkillKey::Finesse,
            WeaponSkillKey::Ranged,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            WeaponSkillKey::Melee => "melee",
            WeaponSkillKey::Brawl => "brawl",
            WeaponSkillKey::Finesse => "finesse",
            WeaponSkillKey::Ranged => "ranged",
        }
    }

    pub fn default_stat(&self) -> StatKey {
        match self {
            WeaponSkillKey::Melee | WeaponSkillKey::Brawl => StatKey::Might,
            WeaponSkillKey::Finesse => StatKey::Dexterity,
            WeaponSkillKey::Ranged => StatKey::Awareness,
        }
    }
}

impl FromStr for WeaponSkillKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeaponSkillKey::all()
            .iter()
            .copied()
            .find(|k| k.key() == s)
            .ok_or_else(|| UnknownKey::new("weapon skill", s))
    }
}

/// Attack categories that carry their own die-size and crit modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackCategory {
    Melee,
    Brawl,
    Finesse,
    Ranged,
    Spell,
    Alchemical,
}

impl AttackCategory {
    pub fn all() -> &'static [AttackCategory] {
        &[
            AttackCategory::Melee,
            AttackCategory::Brawl,
            AttackCategory::Finesse,
            AttackCategory::Ranged,
            AttackCategory::Spell,
            AttackCategory::Alchemical,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            AttackCategory::Melee => "melee",
            AttackCategory::Brawl => "brawl",
            AttackCategory::Finesse => "finesse",
            AttackCategory::Ranged => "ranged",
            AttackCategory::Spell => "spell",
            AttackCategory::Alchemical => "alchemical",
        }
    }
}

impl FromStr for AttackCategory {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttackCategory::all()
            .iter()
            .copied()
            .find(|k| k.key() == s)
            .ok_or_else(|| UnknownKey::new("attack category", s))
    }
}

impl From<WeaponSkillKey> for AttackCategory {
    fn from(skill: WeaponSkillKey) -> Self {
        match skill {
            WeaponSkillKey::Melee => AttackCategory::Melee,
            WeaponSkillKey::Brawl => AttackCategory::Brawl,
            WeaponSkillKey::Finesse => AttackCategory::Finesse,
            WeaponSkillKey::Ranged => AttackCategory::Ranged,
        }
    }
}

/// Damage types carried by weapons, spells and alchemical items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    #[default]
    Physical,
    Blunt,
    Piercing,
    Slashing,
    Fire,
    Cold,
    Shock,
    Acid,
    Poison,
    Psychic,
    Necrotic,
    Holy,
}

/// Coin purse: gold, silver and copper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub copper: u32,
}

impl Currency {
    pub fn new(gold: u32, silver: u32, copper: u32) -> Self {
        Currency {
            gold,
            silver,
            copper,
        }
    }

    /// Convert to silver, the single base unit used for budgets
    pub fn to_base_units(&self) -> f64 {
        self.gold as f64 * 10.0 + self.silver as f64 + self.copper as f64 / 10.0
    }

    pub fn is_zero(&self) -> bool {
        self.gold == 0 && self.silver == 0 && self.copper == 0
    }
}
