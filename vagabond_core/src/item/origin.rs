//! Ancestry and class payloads

use crate::types::{SkillKey, StatKey};
use serde::{Deserialize, Serialize};

/// Creature size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    pub stat: StatKey,
    pub amount: i32,
}

/// A single ancestry trait and what it grants
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AncestryTrait {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stat_bonuses: Vec<StatBonus>,
    /// Skill or weapon-skill keys trained by this trait
    #[serde(default)]
    pub extra_training: Vec<String>,
    /// Spell uuids granted outright
    #[serde(default)]
    pub required_spells: Vec<String>,
    /// Perk uuids granted outright
    #[serde(default)]
    pub perks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AncestryData {
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub being_type: String,
    #[serde(default)]
    pub traits: Vec<AncestryTrait>,
}

impl AncestryData {
    pub fn granted_perks(&self) -> impl Iterator<Item = &String> {
        self.traits.iter().flat_map(|t| t.perks.iter())
    }

    pub fn granted_spells(&self) -> impl Iterator<Item = &String> {
        self.traits.iter().flat_map(|t| t.required_spells.iter())
    }

    pub fn granted_training(&self) -> impl Iterator<Item = &String> {
        self.traits.iter().flat_map(|t| t.extra_training.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassFeature {
    pub name: String,
    /// Perk granted automatically when this feature is gained
    #[serde(default)]
    pub perk: Option<String>,
}

/// Features and spell allotment gained at a class level
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassLevel {
    pub level: u32,
    #[serde(default)]
    pub features: Vec<ClassFeature>,
    /// Spells known at this level
    #[serde(default)]
    pub spells: u32,
}

/// Pick `count` skills from `pool`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillChoice {
    pub count: u32,
    pub pool: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassData {
    #[serde(default)]
    pub is_spellcaster: bool,
    #[serde(default)]
    pub mana_multiplier: i32,
    #[serde(default)]
    pub casting_stat: Option<StatKey>,
    #[serde(default)]
    pub casting_skill: Option<SkillKey>,
    #[serde(default)]
    pub levels: Vec<ClassLevel>,
    #[serde(default)]
    pub guaranteed_skills: Vec<String>,
    #[serde(default)]
    pub skill_choices: Vec<SkillChoice>,
}

impl ClassData {
    pub fn level(&self, level: u32) -> Option<&ClassLevel> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Spells known at `level`; 0 when the table has no row for it
    pub fn spells_at(&self, level: u32) -> u32 {
        self.level(level).map(|l| l.spells).unwrap_or(0)
    }

    /// Perks granted by features at or below `level`, in table order, deduplicated
    pub fn granted_perks(&self, level: u32) -> Vec<String> {
        let mut perks: Vec<String> = Vec::new();
        for row in self.levels.iter().filter(|l| l.level <= level) {
            for perk in row.features.iter().filter_map(|f| f.perk.as_ref()) {
                if !perks.contains(perk) {
                    perks.push(perk.clone());
                }
            }
        }
        perks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class() -> ClassData {
        ClassData {
            is_spellcaster: true,
            mana_multiplier: 4,
            casting_stat: Some(StatKey::Reason),
            casting_skill: Some(SkillKey::Arcana),
            levels: vec![
                ClassLevel {
                    level: 1,
                    features: vec![
                        ClassFeature { name: "Spellcraft".into(), perk: Some("perk-a".into()) },
                        ClassFeature { name: "Lore".into(), perk: None },
                    ],
                    spells: 2,
                },
                ClassLevel {
                    level: 2,
                    features: vec![ClassFeature {
                        name: "Focus".into(),
                        perk: Some("perk-b".into()),
                    }],
                    spells: 3,
                },
            ],
            guaranteed_skills: vec!["arcana".into()],
            skill_choices: vec![],
        }
    }

    #[test]
    fn test_spells_at_level() {
        assert_eq!(class().spells_at(1), 2);
        assert_eq!(class().spells_at(5), 0);
    }

    #[test]
    fn test_granted_perks_by_level() {
        assert_eq!(class().granted_perks(1), vec!["perk-a".to_string()]);
        assert_eq!(class().granted_perks(2).len(), 2);
    }
}
