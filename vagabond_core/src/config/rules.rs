//! Ruleset tables: stat arrays, speed bands, XP pacing and builder defaults

use super::ConfigError;
use crate::types::StatKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Highest value any stat total may reach
pub const MAX_STAT: i32 = 12;

/// All tunable rule tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// The twelve d12 stat arrays
    pub stat_arrays: Vec<StatArray>,
    /// Speed bands keyed by Dexterity threshold, ascending
    pub speed: Vec<SpeedBand>,
    #[serde(default = "default_base_slots")]
    pub inventory_base_slots: i32,
    #[serde(default)]
    pub xp: XpRules,
    #[serde(default)]
    pub builder: BuilderRules,
    #[serde(default)]
    pub packs: PackIds,
}

fn default_base_slots() -> i32 {
    8
}

/// One row of the d12 stat-array table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatArray {
    pub id: u8,
    pub values: [i32; 6],
}

/// Speed triple granted at or above a Dexterity threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedBand {
    pub dexterity: i32,
    pub base: i32,
    pub crawl: i32,
    pub travel: i32,
}

/// Named XP pacing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpPacing {
    Quick,
    #[default]
    Standard,
    Slow,
    Epic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpRules {
    #[serde(default)]
    pub pacing: XpPacing,
    #[serde(default = "default_quick")]
    pub quick: u32,
    #[serde(default = "default_standard")]
    pub standard: u32,
    #[serde(default = "default_slow")]
    pub slow: u32,
    #[serde(default = "default_epic")]
    pub epic: u32,
}

fn default_quick() -> u32 {
    5
}
fn default_standard() -> u32 {
    10
}
fn default_slow() -> u32 {
    15
}
fn default_epic() -> u32 {
    20
}

impl Default for XpRules {
    fn default() -> Self {
        XpRules {
            pacing: XpPacing::Standard,
            quick: default_quick(),
            standard: default_standard(),
            slow: default_slow(),
            epic: default_epic(),
        }
    }
}

impl XpRules {
    /// XP per level for a given curve
    pub fn per_level(&self, pacing: XpPacing) -> u32 {
        match pacing {
            XpPacing::Quick => self.quick,
            XpPacing::Standard => self.standard,
            XpPacing::Slow => self.slow,
            XpPacing::Epic => self.epic,
        }
    }

    /// Accumulated XP needed to reach `next_level` on the configured curve
    pub fn required_for(&self, next_level: u32) -> u32 {
        self.per_level(self.pacing).saturating_mul(next_level)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderRules {
    /// Gear budget in silver when no starting pack is chosen
    #[serde(default = "default_budget")]
    pub default_budget: f64,
    /// Relative weights for random ancestry selection, by ancestry name
    #[serde(default)]
    pub ancestry_weights: BTreeMap<String, u32>,
}

fn default_budget() -> f64 {
    300.0
}

impl Default for BuilderRules {
    fn default() -> Self {
        let ancestry_weights = [("Human", 5), ("Dwarf", 1), ("Elf", 1), ("Halfling", 1)]
            .into_iter()
            .map(|(name, weight)| (name.to_string(), weight))
            .collect();
        BuilderRules {
            default_budget: default_budget(),
            ancestry_weights,
        }
    }
}

/// Compendium pack identifiers used by the builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackIds {
    pub ancestries: String,
    pub classes: String,
    pub perks: String,
    pub spells: String,
    pub starter_packs: String,
    pub gear: String,
}

impl Default for PackIds {
    fn default() -> Self {
        PackIds {
            ancestries: "vagabond.ancestries".to_string(),
            classes: "vagabond.classes".to_string(),
            perks: "vagabond.perks".to_string(),
            spells: "vagabond.spells".to_string(),
            starter_packs: "vagabond.starter-packs".to_string(),
            gear: "vagabond.gear".to_string(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        let rows: [[i32; 6]; 12] = [
            [5, 5, 5, 4, 4, 3],
            [5, 5, 5, 5, 3, 2],
            [6, 5, 4, 4, 4, 3],
            [6, 5, 5, 4, 3, 2],
            [6, 6, 4, 3, 3, 3],
            [6, 6, 4, 4, 3, 2],
            [6, 6, 5, 3, 2, 2],
            [7, 4, 4, 4, 4, 3],
            [7, 5, 4, 4, 3, 3],
            [7, 5, 5, 3, 3, 2],
            [7, 6, 4, 3, 3, 2],
            [7, 7, 3, 3, 2, 2],
        ];
        let stat_arrays = rows
            .iter()
            .enumerate()
            .map(|(i, values)| StatArray {
                id: i as u8 + 1,
                values: *values,
            })
            .collect();

        RulesConfig {
            stat_arrays,
            speed: vec![
                SpeedBand { dexterity: 0, base: 25, crawl: 75, travel: 5 },
                SpeedBand { dexterity: 4, base: 30, crawl: 90, travel: 6 },
                SpeedBand { dexterity: 6, base: 35, crawl: 105, travel: 7 },
            ],
            inventory_base_slots: default_base_slots(),
            xp: XpRules::default(),
            builder: BuilderRules::default(),
            packs: PackIds::default(),
        }
    }
}

impl RulesConfig {
    pub fn stat_array(&self, id: u8) -> Option<&StatArray> {
        self.stat_arrays.iter().find(|a| a.id == id)
    }

    /// Highest speed band whose threshold does not exceed `dexterity`.
    /// Falls back to the lowest band when `dexterity` is below every threshold.
    pub fn speed_for(&self, dexterity: i32) -> SpeedBand {
        self.speed
            .iter()
            .rev()
            .find(|band| band.dexterity <= dexterity)
            .or_else(|| self.speed.first())
            .copied()
            .unwrap_or(SpeedBand { dexterity: 0, base: 0, crawl: 0, travel: 0 })
    }

    /// Check table shapes and ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stat_arrays.len() != 12 {
            return Err(ConfigError::ValidationError(format!(
                "expected 12 stat arrays, found {}",
                self.stat_arrays.len()
            )));
        }
        for id in 1..=12u8 {
            let array = self.stat_array(id).ok_or_else(|| {
                ConfigError::ValidationError(format!("stat array {} is missing", id))
            })?;
            if array.values.iter().any(|v| !(0..=MAX_STAT).contains(v)) {
                return Err(ConfigError::ValidationError(format!(
                    "stat array {} has a value outside 0-{}",
                    id, MAX_STAT
                )));
            }
        }
        if self.speed.is_empty() {
            return Err(ConfigError::ValidationError("speed table is empty".to_string()));
        }
        if self.speed.windows(2).any(|w| w[0].dexterity >= w[1].dexterity) {
            return Err(ConfigError::ValidationError(
                "speed thresholds must be strictly ascending".to_string(),
            ));
        }
        let xp = &self.xp;
        if [xp.quick, xp.standard, xp.slow, xp.epic].contains(&0) {
            return Err(ConfigError::ValidationError(
                "xp per-level values must be positive".to_string(),
            ));
        }
        if self.builder.default_budget < 0.0 {
            return Err(ConfigError::ValidationError(
                "default budget must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Stat order used when auto-assigning an array
    pub fn assignment_order(&self) -> &'static [StatKey] {
        StatKey::all()
    }
}

/// Parse and validate rules from a TOML string
pub fn parse_rules(content: &str) -> Result<RulesConfig, ConfigError> {
    let rules: RulesConfig = super::parse_toml(content)?;
    rules.validate()?;
    Ok(rules)
}

/// Load and validate rules from a TOML file
pub fn load_rules(path: &Path) -> Result<RulesConfig, ConfigError> {
    let rules: RulesConfig = super::load_toml(path)?;
    rules.validate()?;
    Ok(rules)
}

/// Rules bundled with the crate
pub fn default_rules() -> RulesConfig {
    let toml = include_str!("../../config/rules.toml");
    parse_rules(toml).unwrap_or_else(|error| {
        tracing::error!(%error, "bundled rules failed to load, using built-in tables");
        RulesConfig::default()
    })
}
