//! ItemSource - Bonuses granted by owned items

use crate::derived::{BonusAccumulator, BonusTarget};
use crate::formula::Bonus;
use crate::item::{Item, ItemKind};
use crate::source::StatSource;

/// Contributions from one embedded item
///
/// Ancestry trait stat bonuses always apply. Item effects apply while the
/// item grants effects (equipment only when equipped).
pub struct ItemSource<'a> {
    pub item: &'a Item,
}

impl<'a> ItemSource<'a> {
    pub fn new(item: &'a Item) -> Self {
        ItemSource { item }
    }
}

impl StatSource for ItemSource<'_> {
    fn id(&self) -> &str {
        &self.item.id
    }

    fn priority(&self) -> i32 {
        match self.item.system {
            ItemKind::Ancestry(_) => -100,
            ItemKind::Class(_) => -50,
            _ => 0,
        }
    }

    fn apply(&self, bonuses: &mut BonusAccumulator) {
        if let Some(ancestry) = self.item.as_ancestry() {
            for grant in ancestry.traits.iter().flat_map(|t| t.stat_bonuses.iter()) {
                bonuses.push(BonusTarget::Stat(grant.stat), Bonus::from(grant.amount));
            }
        }

        if !self.item.grants_effects() {
            return;
        }
        for effect in &self.item.effects {
            effect.push_changes(bonuses);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{
        AncestryData, AncestryTrait, ArmorData, EquipmentData, EquipmentKind, StatBonus,
    };
    use crate::source::ActiveEffect;
    use crate::types::StatKey;

    #[test]
    fn test_ancestry_trait_stat_bonus() {
        let dwarf = Item::new(
            "dwarf",
            "Dwarf",
            ItemKind::Ancestry(AncestryData {
                traits: vec![AncestryTrait {
                    name: "Sturdy".into(),
                    stat_bonuses: vec![StatBonus { stat: StatKey::Might, amount: 1 }],
                    ..Default::default()
                }],
                ..Default::default()
            }),
        );
        let mut acc = BonusAccumulator::new();
        let source = ItemSource::new(&dwarf);
        source.apply(&mut acc);
        assert_eq!(acc.stat(StatKey::Might), &[Bonus::from(1)]);
        assert_eq!(source.priority(), -100);
    }

    #[test]
    fn test_unequipped_equipment_effects_ignored() {
        let mut shield = Item::new(
            "shield",
            "Shield",
            ItemKind::Equipment(EquipmentData::new(EquipmentKind::Armor(ArmorData {
                rating: 1,
                rating_bonus: 0,
                might_requirement: 0,
            }))),
        )
        .with_effect(ActiveEffect::new("ward", "Ward").with_change("system.saves.reflex.bonus", 1));

        let mut acc = BonusAccumulator::new();
        ItemSource::new(&shield).apply(&mut acc);
        assert!(acc.saves.is_empty());

        if let Some(data) = shield.as_equipment_mut() {
            data.equipped = true;
        }
        ItemSource::new(&shield).apply(&mut acc);
        assert_eq!(acc.saves.len(), 1);
    }
}
