//! The derivation pass, in strict phase order

use super::{
    BonusAccumulator, Check, DerivedStats, HealthDerived, InventoryDerived, LevelUp, ManaDerived,
    SpeedDerived, StatTotal, UniversalBonuses,
};
use crate::character::{CharacterData, SkillData};
use crate::config::{RulesConfig, MAX_STAT};
use crate::formula::{evaluate_bonuses, to_int, Bonus, RollData};
use crate::item::{EquipmentKind, Item};
use crate::types::{AttackCategory, SaveKey, SkillKey, StatKey, WeaponSkillKey};
use std::collections::BTreeMap;

/// Compute every derived value from persisted fields, owned items and
/// already-collected bonus lists. Never fails.
pub fn derive_stats(
    data: &CharacterData,
    items: &[Item],
    bonuses: &BonusAccumulator,
    rules: &RulesConfig,
) -> DerivedStats {
    let level = data.effective_level();

    // Stat bonuses see only persisted values
    let base = data.roll_data();
    let stats = stat_totals(data, bonuses, &base);
    let total = |key: StatKey| stats.get(&key).map(|s| s.total).unwrap_or(0);

    // Everything after sees the stat totals
    let mut roll = base;
    for (key, stat) in &stats {
        roll.insert(format!("{}.total", key.key()), stat.total as f64);
    }
    let eval = |list: &[Bonus]| to_int(evaluate_bonuses(list, &roll));

    let universal = UniversalBonuses {
        damage: eval(&bonuses.damage),
        weapon_damage: WeaponSkillKey::all()
            .iter()
            .map(|k| (*k, eval(bonuses.weapon_damage(*k))))
            .collect(),
        spell_damage: eval(&bonuses.spell_damage),
        alchemical_damage: eval(&bonuses.alchemical_damage),
        die_size: AttackCategory::all()
            .iter()
            .map(|c| (*c, eval(bonuses.die_size(*c))))
            .collect(),
        crit_threshold: AttackCategory::all()
            .iter()
            .map(|c| (*c, eval(bonuses.crit_threshold(*c))))
            .collect(),
    };

    // Health
    let health_bonus = eval(&bonuses.health);
    let per_level_bonus = eval(&bonuses.health_per_level);
    let health = HealthDerived {
        max: total(StatKey::Might)
            .saturating_mul(level)
            .saturating_add(per_level_bonus.saturating_mul(level))
            .saturating_add(health_bonus)
            .max(1),
        bonus: health_bonus,
        per_level_bonus,
    };

    // Mana
    let class = items.iter().find_map(Item::as_class);
    let is_spellcaster = match &bonuses.spellcaster_override {
        Some(flag) => flag.is_truthy(&roll),
        None => class.map(|c| c.is_spellcaster).unwrap_or(false),
    };
    let mana_bonus = eval(&bonuses.mana);
    let casting_max_bonus = eval(&bonuses.casting_max);
    let mana = if is_spellcaster {
        let multiplier = class.map(|c| c.mana_multiplier).unwrap_or(0);
        let casting_stat = class.and_then(|c| c.casting_stat).map(total).unwrap_or(0);
        ManaDerived {
            max: multiplier.saturating_mul(level).saturating_add(mana_bonus),
            casting_max: casting_stat
                .saturating_add(level.saturating_add(1) / 2)
                .saturating_add(casting_max_bonus),
            bonus: mana_bonus,
            casting_max_bonus,
        }
    } else {
        ManaDerived { max: 0, casting_max: 0, bonus: mana_bonus, casting_max_bonus }
    };

    // Speed
    let band = rules.speed_for(total(StatKey::Dexterity));
    let speed_bonus = eval(&bonuses.speed);
    let speed = SpeedDerived {
        base: band.base.saturating_add(speed_bonus).max(0),
        crawl: band.crawl.max(0),
        travel: band.travel.max(0),
        bonus: speed_bonus,
    };

    // Armor
    let armor = items
        .iter()
        .filter_map(Item::as_equipment)
        .filter(|e| e.equipped)
        .filter_map(|e| match &e.details {
            EquipmentKind::Armor(armor) => Some(armor.final_rating()),
            _ => None,
        })
        .fold(0i32, i32::saturating_add)
        .saturating_add(eval(&bonuses.armor));

    // Inventory
    let bonus_slots = eval(&bonuses.inventory_slots);
    let max_slots = rules
        .inventory_base_slots
        .saturating_add(total(StatKey::Might))
        .saturating_add(bonus_slots)
        .saturating_sub(data.fatigue)
        .max(0);
    let carried = items
        .iter()
        .filter_map(Item::as_equipment)
        .filter(|e| e.container_id.is_none());
    let (occupied_slots, item_count) = carried.fold((0i32, 0u32), |(slots, count), e| {
        let cost = i32::try_from(e.slots).unwrap_or(i32::MAX);
        (slots.saturating_add(cost), count.saturating_add(1))
    });
    let inventory = InventoryDerived {
        max_slots,
        bonus_slots,
        occupied_slots,
        available_slots: max_slots.saturating_sub(occupied_slots),
        item_count,
    };

    // Saves
    let saves = SaveKey::all()
        .iter()
        .map(|key| {
            let (a, b) = key.stats();
            let bonus = eval(bonuses.save(*key));
            let check = Check {
                stat: a,
                trained: false,
                bonus,
                difficulty: 20i32.saturating_sub(total(a) + total(b)).saturating_sub(bonus),
            };
            (*key, check)
        })
        .collect();

    // Skills
    let skills = SkillKey::all()
        .iter()
        .map(|key| {
            let persisted = persisted_skill(&data.skills, *key, key.default_stat());
            let bonus = eval(bonuses.skill(*key));
            (*key, skill_check(persisted, total(persisted.stat), bonus))
        })
        .collect();
    let weapon_skills = WeaponSkillKey::all()
        .iter()
        .map(|key| {
            let persisted = persisted_skill(&data.weapon_skills, *key, key.default_stat());
            let bonus = eval(bonuses.weapon_skill(*key));
            (*key, skill_check(persisted, total(persisted.stat), bonus))
        })
        .collect();

    let luck_max = total(StatKey::Luck);

    let next_level = data.level.max(1).saturating_add(1);
    let xp_required = rules.xp.required_for(next_level);
    let level_up = LevelUp {
        next_level,
        xp_required,
        can_level_up: data.experience >= xp_required,
    };

    DerivedStats {
        stats,
        saves,
        skills,
        weapon_skills,
        health,
        mana,
        is_spellcaster,
        speed,
        armor,
        inventory,
        universal,
        luck_max,
        level_up,
    }
}

fn stat_totals(
    data: &CharacterData,
    bonuses: &BonusAccumulator,
    base: &RollData,
) -> BTreeMap<StatKey, StatTotal> {
    StatKey::all()
        .iter()
        .map(|key| {
            let value = data.stat_value(*key);
            let bonus = to_int(evaluate_bonuses(bonuses.stat(*key), base));
            let total = value.saturating_add(bonus).clamp(0, MAX_STAT);
            (*key, StatTotal { value, bonus, total })
        })
        .collect()
}

fn persisted_skill<K: Ord>(map: &BTreeMap<K, SkillData>, key: K, default: StatKey) -> SkillData {
    map.get(&key)
        .copied()
        .unwrap_or(SkillData { trained: false, stat: default })
}

/// `20 - (trained ? 2s : s) - bonus`
pub(crate) fn skill_check(skill: SkillData, stat_total: i32, bonus: i32) -> Check {
    let contribution = if skill.trained { stat_total.saturating_mul(2) } else { stat_total };
    Check {
        stat: skill.stat,
        trained: skill.trained,
        bonus,
        difficulty: 20i32.saturating_sub(contribution).saturating_sub(bonus),
    }
}
