//! Item documents and their variant payloads

mod equipment;
mod origin;

pub use equipment::{ArmorData, EquipState, EquipmentData, EquipmentKind, Grip, WeaponData};
pub use origin::{
    AncestryData, AncestryTrait, ClassData, ClassFeature, ClassLevel, Size, SkillChoice,
    StatBonus,
};

use crate::source::ActiveEffect;
use crate::types::{Currency, DamageType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerkData {
    #[serde(default)]
    pub prerequisites: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellData {
    #[serde(default)]
    pub damage_base: String,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default)]
    pub favorite: bool,
}

/// One item granted by a starter pack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackEntry {
    pub uuid: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StarterPackData {
    #[serde(default)]
    pub items: Vec<PackEntry>,
    #[serde(default)]
    pub currency: Currency,
}

impl StarterPackData {
    pub fn contains(&self, uuid: &str) -> bool {
        self.items.iter().any(|e| e.uuid == uuid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VehiclePartData {
    #[serde(default)]
    pub part_type: String,
    #[serde(default)]
    pub hit_points: i32,
    #[serde(default)]
    pub cost: Currency,
}

/// Variant payload, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Ancestry(AncestryData),
    Class(ClassData),
    Perk(PerkData),
    Spell(SpellData),
    Equipment(EquipmentData),
    StarterPack(StarterPackData),
    VehiclePart(VehiclePartData),
}

impl ItemKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ItemKind::Ancestry(_) => "ancestry",
            ItemKind::Class(_) => "class",
            ItemKind::Perk(_) => "perk",
            ItemKind::Spell(_) => "spell",
            ItemKind::Equipment(_) => "equipment",
            ItemKind::StarterPack(_) => "starter_pack",
            ItemKind::VehiclePart(_) => "vehicle_part",
        }
    }
}

/// An item document, either embedded in a character or held in a library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier (uuid for library items, embedded id once owned)
    pub id: String,
    pub name: String,
    pub system: ItemKind,
    #[serde(default)]
    pub effects: Vec<ActiveEffect>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, system: ItemKind) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            system,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: ActiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.system.type_name()
    }

    pub fn as_ancestry(&self) -> Option<&AncestryData> {
        match &self.system {
            ItemKind::Ancestry(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.system {
            ItemKind::Class(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_equipment(&self) -> Option<&EquipmentData> {
        match &self.system {
            ItemKind::Equipment(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_equipment_mut(&mut self) -> Option<&mut EquipmentData> {
        match &mut self.system {
            ItemKind::Equipment(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_starter_pack(&self) -> Option<&StarterPackData> {
        match &self.system {
            ItemKind::StarterPack(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_spell(&self) -> bool {
        matches!(self.system, ItemKind::Spell(_))
    }

    /// Equipment cost in silver; non-equipment items cost nothing
    pub fn cost_in_base_units(&self) -> f64 {
        match &self.system {
            ItemKind::Equipment(data) => data.cost.to_base_units(),
            ItemKind::VehiclePart(data) => data.cost.to_base_units(),
            _ => 0.0,
        }
    }

    /// Whether this item's effects currently apply to its owner.
    /// Equipment only contributes while equipped; other owned items always do.
    pub fn grants_effects(&self) -> bool {
        match &self.system {
            ItemKind::Equipment(data) => data.equipped,
            ItemKind::StarterPack(_) | ItemKind::VehiclePart(_) => false,
            _ => true,
        }
    }

    /// Auto-assign equip/favorite flags by category at character creation
    pub fn apply_creation_flags(&mut self) {
        match &mut self.system {
            ItemKind::Spell(data) => data.favorite = true,
            ItemKind::Equipment(data) => data.auto_equip(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_json_shape() {
        let json = r#"{
            "id": "spell-1",
            "name": "Burn",
            "system": { "type": "spell", "damage_base": "d6", "damage_type": "fire" }
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.is_spell());
        assert_eq!(item.type_name(), "spell");
        assert!(item.effects.is_empty());
    }

    #[test]
    fn test_creation_flags_favorite_spells() {
        let mut spell = Item::new("s", "Burn", ItemKind::Spell(SpellData::default()));
        spell.apply_creation_flags();
        match spell.system {
            ItemKind::Spell(data) => assert!(data.favorite),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_unequipped_gear_grants_nothing() {
        let cloak = Item::new(
            "c",
            "Cloak",
            ItemKind::Equipment(EquipmentData::new(EquipmentKind::Gear)),
        );
        assert!(!cloak.grants_effects());
        let perk = Item::new("p", "Tough", ItemKind::Perk(PerkData::default()));
        assert!(perk.grants_effects());
    }
}
