//! Lookups over a finished derivation pass

use super::DerivedStats;
use crate::types::{AttackCategory, SaveKey, SkillKey, StatKey, WeaponSkillKey};

impl DerivedStats {
    /// Clamped total for a stat (0 before the first pass)
    pub fn stat_total(&self, key: StatKey) -> i32 {
        self.stats.get(&key).map(|s| s.total).unwrap_or(0)
    }

    pub fn save_difficulty(&self, key: SaveKey) -> Option<i32> {
        self.saves.get(&key).map(|c| c.difficulty)
    }

    pub fn skill_difficulty(&self, key: SkillKey) -> Option<i32> {
        self.skills.get(&key).map(|c| c.difficulty)
    }

    pub fn weapon_skill_difficulty(&self, key: WeaponSkillKey) -> Option<i32> {
        self.weapon_skills.get(&key).map(|c| c.difficulty)
    }

    /// Flat damage bonus for a weapon attack: universal plus per-weapon-skill
    pub fn weapon_damage_bonus(&self, skill: WeaponSkillKey) -> i32 {
        self.universal.damage + self.universal.weapon_damage.get(&skill).copied().unwrap_or(0)
    }

    /// Flat damage bonus for a spell
    pub fn spell_damage_bonus(&self) -> i32 {
        self.universal.damage + self.universal.spell_damage
    }

    pub fn alchemical_damage_bonus(&self) -> i32 {
        self.universal.damage + self.universal.alchemical_damage
    }

    pub fn die_size_bonus(&self, category: AttackCategory) -> i32 {
        self.universal.die_size.get(&category).copied().unwrap_or(0)
    }

    /// Crit threshold modifier; negative values crit more often
    pub fn crit_threshold_bonus(&self, category: AttackCategory) -> i32 {
        self.universal.crit_threshold.get(&category).copied().unwrap_or(0)
    }

    /// True when carried items exceed capacity
    pub fn is_overloaded(&self) -> bool {
        self.inventory.available_slots < 0
    }
}

#[cfg(test)]
mod tests {
    use crate::derived::{derive_stats, BonusAccumulator, BonusTarget, DerivedStats};
    use crate::character::CharacterData;
    use crate::config::RulesConfig;
    use crate::formula::Bonus;
    use crate::item::{EquipmentData, EquipmentKind, Item, ItemKind};
    use crate::types::{AttackCategory, StatKey, WeaponSkillKey};

    #[test]
    fn test_empty_view_defaults() {
        let derived = DerivedStats::default();
        assert_eq!(derived.stat_total(StatKey::Might), 0);
        assert_eq!(derived.skill_difficulty(crate::types::SkillKey::Arcana), None);
        assert!(!derived.is_overloaded());
    }

    #[test]
    fn test_damage_bonus_combines_universal() {
        let mut bonuses = BonusAccumulator::new();
        bonuses.push(BonusTarget::Damage, Bonus::from(1));
        bonuses.push(BonusTarget::WeaponDamage(WeaponSkillKey::Melee), Bonus::from(2));
        bonuses.push(BonusTarget::SpellDamage, Bonus::from(3));
        bonuses.push(BonusTarget::DieSize(AttackCategory::Melee), Bonus::from(2));
        let derived =
            derive_stats(&CharacterData::default(), &[], &bonuses, &RulesConfig::default());

        assert_eq!(derived.weapon_damage_bonus(WeaponSkillKey::Melee), 3);
        assert_eq!(derived.weapon_damage_bonus(WeaponSkillKey::Ranged), 1);
        assert_eq!(derived.spell_damage_bonus(), 4);
        assert_eq!(derived.alchemical_damage_bonus(), 1);
        assert_eq!(derived.die_size_bonus(AttackCategory::Melee), 2);
        assert_eq!(derived.crit_threshold_bonus(AttackCategory::Melee), 0);
    }

    #[test]
    fn test_overloaded() {
        let mut anvil = EquipmentData::new(EquipmentKind::Gear);
        anvil.slots = 12;
        let items = vec![Item::new("anvil", "Anvil", ItemKind::Equipment(anvil))];
        let derived = derive_stats(
            &CharacterData::default(),
            &items,
            &BonusAccumulator::new(),
            &RulesConfig::default(),
        );
        assert_eq!(derived.inventory.available_slots, -4);
        assert!(derived.is_overloaded());
    }
}
