//! BonusAccumulator - Collects bonus contributions before a derivation pass

use crate::formula::Bonus;
use crate::types::{AttackCategory, SaveKey, SkillKey, StatKey, WeaponSkillKey};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The bonus list an effect change writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BonusTarget {
    Stat(StatKey),
    Save(SaveKey),
    Skill(SkillKey),
    WeaponSkill(WeaponSkillKey),
    Health,
    HealthPerLevel,
    Mana,
    CastingMax,
    Speed,
    Armor,
    InventorySlots,
    Damage,
    WeaponDamage(WeaponSkillKey),
    SpellDamage,
    AlchemicalDamage,
    DieSize(AttackCategory),
    CritThreshold(AttackCategory),
    Spellcaster,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bonus key: {0}")]
pub struct UnknownTarget(pub String);

impl FromStr for BonusTarget {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownTarget(s.to_string());
        let path = s.strip_prefix("system.").unwrap_or(s);
        let parts: Vec<&str> = path.split('.').collect();

        let target = match parts.as_slice() {
            ["stats", stat, "bonus"] => BonusTarget::Stat(stat.parse().map_err(|_| unknown())?),
            ["saves", save, "bonus"] => BonusTarget::Save(save.parse().map_err(|_| unknown())?),
            ["skills", skill, "bonus"] => {
                BonusTarget::Skill(skill.parse().map_err(|_| unknown())?)
            }
            ["weaponSkills", skill, "bonus"] => {
                BonusTarget::WeaponSkill(skill.parse().map_err(|_| unknown())?)
            }
            ["health", "bonus"] => BonusTarget::Health,
            ["health", "perLevelBonus"] => BonusTarget::HealthPerLevel,
            ["mana", "bonus"] => BonusTarget::Mana,
            ["mana", "castingMaxBonus"] => BonusTarget::CastingMax,
            ["speed", "bonus"] => BonusTarget::Speed,
            ["armorBonus"] => BonusTarget::Armor,
            ["inventory", "bonusSlots"] => BonusTarget::InventorySlots,
            ["universal", "damage"] => BonusTarget::Damage,
            ["universal", "weaponDamage", skill] => {
                BonusTarget::WeaponDamage(skill.parse().map_err(|_| unknown())?)
            }
            ["universal", "spellDamage"] => BonusTarget::SpellDamage,
            ["universal", "alchemicalDamage"] => BonusTarget::AlchemicalDamage,
            ["universal", "dieSize", category] => {
                BonusTarget::DieSize(category.parse().map_err(|_| unknown())?)
            }
            ["universal", "critThreshold", category] => {
                BonusTarget::CritThreshold(category.parse().map_err(|_| unknown())?)
            }
            ["attributes", "isSpellcaster"] => BonusTarget::Spellcaster,
            _ => return Err(unknown()),
        };
        Ok(target)
    }
}

impl fmt::Display for BonusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BonusTarget::Stat(k) => write!(f, "system.stats.{}.bonus", k.key()),
            BonusTarget::Save(k) => write!(f, "system.saves.{}.bonus", k.key()),
            BonusTarget::Skill(k) => write!(f, "system.skills.{}.bonus", k.key()),
            BonusTarget::WeaponSkill(k) => write!(f, "system.weaponSkills.{}.bonus", k.key()),
            BonusTarget::Health => f.write_str("system.health.bonus"),
            BonusTarget::HealthPerLevel => f.write_str("system.health.perLevelBonus"),
            BonusTarget::Mana => f.write_str("system.mana.bonus"),
            BonusTarget::CastingMax => f.write_str("system.mana.castingMaxBonus"),
            BonusTarget::Speed => f.write_str("system.speed.bonus"),
            BonusTarget::Armor => f.write_str("system.armorBonus"),
            BonusTarget::InventorySlots => f.write_str("system.inventory.bonusSlots"),
            BonusTarget::Damage => f.write_str("system.universal.damage"),
            BonusTarget::WeaponDamage(k) => {
                write!(f, "system.universal.weaponDamage.{}", k.key())
            }
            BonusTarget::SpellDamage => f.write_str("system.universal.spellDamage"),
            BonusTarget::AlchemicalDamage => f.write_str("system.universal.alchemicalDamage"),
            BonusTarget::DieSize(c) => write!(f, "system.universal.dieSize.{}", c.key()),
            BonusTarget::CritThreshold(c) => {
                write!(f, "system.universal.critThreshold.{}", c.key())
            }
            BonusTarget::Spellcaster => f.write_str("system.attributes.isSpellcaster"),
        }
    }
}

/// Accumulates bonus contributions from every source
///
/// Cleared at the start of each derivation pass, filled by the
/// [`StatSource`](crate::source::StatSource)s, then read by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct BonusAccumulator {
    pub stats: BTreeMap<StatKey, Vec<Bonus>>,
    pub saves: BTreeMap<SaveKey, Vec<Bonus>>,
    pub skills: BTreeMap<SkillKey, Vec<Bonus>>,
    pub weapon_skills: BTreeMap<WeaponSkillKey, Vec<Bonus>>,

    pub health: Vec<Bonus>,
    pub health_per_level: Vec<Bonus>,
    pub mana: Vec<Bonus>,
    pub casting_max: Vec<Bonus>,
    pub speed: Vec<Bonus>,
    pub armor: Vec<Bonus>,
    pub inventory_slots: Vec<Bonus>,

    // Universal damage/check modifiers
    pub damage: Vec<Bonus>,
    pub weapon_damage: BTreeMap<WeaponSkillKey, Vec<Bonus>>,
    pub spell_damage: Vec<Bonus>,
    pub alchemical_damage: Vec<Bonus>,
    pub die_size: BTreeMap<AttackCategory, Vec<Bonus>>,
    pub crit_threshold: BTreeMap<AttackCategory, Vec<Bonus>>,

    /// Last override written to the spellcaster flag, if any
    pub spellcaster_override: Option<Bonus>,
}

const EMPTY: &[Bonus] = &[];

impl BonusAccumulator {
    pub fn new() -> Self {
        BonusAccumulator::default()
    }

    /// Drop every contribution
    pub fn reset(&mut self) {
        *self = BonusAccumulator::default();
    }

    /// Append a contribution to the list named by `target`
    pub fn push(&mut self, target: BonusTarget, bonus: Bonus) {
        match target {
            BonusTarget::Stat(k) => self.stats.entry(k).or_default().push(bonus),
            BonusTarget::Save(k) => self.saves.entry(k).or_default().push(bonus),
            BonusTarget::Skill(k) => self.skills.entry(k).or_default().push(bonus),
            BonusTarget::WeaponSkill(k) => self.weapon_skills.entry(k).or_default().push(bonus),
            BonusTarget::Health => self.health.push(bonus),
            BonusTarget::HealthPerLevel => self.health_per_level.push(bonus),
            BonusTarget::Mana => self.mana.push(bonus),
            BonusTarget::CastingMax => self.casting_max.push(bonus),
            BonusTarget::Speed => self.speed.push(bonus),
            BonusTarget::Armor => self.armor.push(bonus),
            BonusTarget::InventorySlots => self.inventory_slots.push(bonus),
            BonusTarget::Damage => self.damage.push(bonus),
            BonusTarget::WeaponDamage(k) => self.weapon_damage.entry(k).or_default().push(bonus),
            BonusTarget::SpellDamage => self.spell_damage.push(bonus),
            BonusTarget::AlchemicalDamage => self.alchemical_damage.push(bonus),
            BonusTarget::DieSize(c) => self.die_size.entry(c).or_default().push(bonus),
            BonusTarget::CritThreshold(c) => self.crit_threshold.entry(c).or_default().push(bonus),
            BonusTarget::Spellcaster => self.spellcaster_override = Some(bonus),
        }
    }

    pub fn stat(&self, key: StatKey) -> &[Bonus] {
        self.stats.get(&key).map(Vec::as_slice).unwrap_or(EMPTY)
    }

    pub fn save(&self, key: SaveKey) -> &[Bonus] {
        self.saves.get(&key).map(Vec::as_slice).unwrap_or(EMPTY)
    }

    pub fn skill(&self, key: SkillKey) -> &[Bonus] {
        self.skills.get(&key).map(Vec::as_slice).unwrap_or(EMPTY)
    }

    pub fn weapon_skill(&self, key: WeaponSkillKey) -> &[Bonus] {
        self.weapon_skills.get(&key).map(Vec::as_slice).unwrap_or(EMPTY)
    }

    pub fn weapon_damage(&self, key: WeaponSkillKey) -> &[Bonus] {
        self.weapon_damage.get(&key).map(Vec::as_slice).unwrap_or(EMPTY)
    }

    pub fn die_size(&self, category: AttackCategory) -> &[Bonus] {
        self.die_size.get(&category).map(Vec::as_slice).unwrap_or(EMPTY)
    }

    pub fn crit_threshold(&self, category: AttackCategory) -> &[Bonus] {
        self.crit_threshold.get(&category).map(Vec::as_slice).unwrap_or(EMPTY)
    }
}
