//! Equipment payloads: weapons, armor, gear, alchemical items, relics

use crate::types::{Currency, DamageType, WeaponSkillKey};
use serde::{Deserialize, Serialize};

/// How a weapon is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grip {
    #[default]
    OneHanded,
    TwoHanded,
    Versatile,
}

/// How an item is currently worn or wielded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipState {
    #[default]
    Unequipped,
    Worn,
    OneHand,
    TwoHands,
}

impl Grip {
    /// Wield state used when a weapon is equipped automatically
    pub fn default_equip_state(&self) -> EquipState {
        match self {
            Grip::TwoHanded => EquipState::TwoHands,
            Grip::OneHanded | Grip::Versatile => EquipState::OneHand,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponData {
    /// Damage die, e.g. "d6"
    pub damage: String,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default)]
    pub grip: Grip,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub properties: Vec<String>,
    pub skill: WeaponSkillKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorData {
    pub rating: i32,
    /// Enchantment or quality bonus folded into the final rating
    #[serde(default)]
    pub rating_bonus: i32,
    #[serde(default)]
    pub might_requirement: i32,
}

impl ArmorData {
    pub fn final_rating(&self) -> i32 {
        self.rating.saturating_add(self.rating_bonus)
    }
}

/// Type-specific stat block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EquipmentKind {
    Weapon(WeaponData),
    Armor(ArmorData),
    Gear,
    Alchemical {
        damage: String,
        #[serde(default)]
        damage_type: DamageType,
    },
    Relic {
        #[serde(default)]
        lore: String,
    },
    Container,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentData {
    #[serde(default)]
    pub cost: Currency,
    /// Inventory slots taken by this stack
    #[serde(default)]
    pub slots: u32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub equip_state: EquipState,
    #[serde(default)]
    pub favorite: bool,
    /// Id of the container item holding this one, if any
    #[serde(default)]
    pub container_id: Option<String>,
    pub details: EquipmentKind,
}

fn default_quantity() -> u32 {
    1
}

impl EquipmentData {
    pub fn new(details: EquipmentKind) -> Self {
        EquipmentData {
            cost: Currency::default(),
            slots: 1,
            quantity: 1,
            equipped: false,
            equip_state: EquipState::Unequipped,
            favorite: false,
            container_id: None,
            details,
        }
    }

    /// Equip according to category: armor is worn, weapons wielded by grip
    pub fn auto_equip(&mut self) {
        match &self.details {
            EquipmentKind::Armor(_) => {
                self.equipped = true;
                self.equip_state = EquipState::Worn;
            }
            EquipmentKind::Weapon(weapon) => {
                self.equipped = true;
                self.equip_state = weapon.grip.default_equip_state();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greatsword() -> EquipmentData {
        EquipmentData::new(EquipmentKind::Weapon(WeaponData {
            damage: "d10".to_string(),
            damage_type: DamageType::Slashing,
            grip: Grip::TwoHanded,
            range: None,
            properties: vec!["heavy".to_string()],
            skill: WeaponSkillKey::Melee,
        }))
    }

    #[test]
    fn test_auto_equip_weapon_by_grip() {
        let mut sword = greatsword();
        sword.auto_equip();
        assert!(sword.equipped);
        assert_eq!(sword.equip_state, EquipState::TwoHands);
    }

    #[test]
    fn test_auto_equip_armor_and_gear() {
        let mut armor = EquipmentData::new(EquipmentKind::Armor(ArmorData {
            rating: 2,
            rating_bonus: 1,
            might_requirement: 3,
        }));
        armor.auto_equip();
        assert!(armor.equipped);
        assert_eq!(armor.equip_state, EquipState::Worn);

        let mut rope = EquipmentData::new(EquipmentKind::Gear);
        rope.auto_equip();
        assert!(!rope.equipped);
    }

    #[test]
    fn test_final_rating() {
        let armor = ArmorData { rating: 3, rating_bonus: 1, might_requirement: 0 };
        assert_eq!(armor.final_rating(), 4);
    }

    #[test]
    fn test_deserialize_weapon() {
        let json = r#"{
            "cost": { "gold": 1 },
            "slots": 1,
            "details": { "kind": "weapon", "damage": "d6", "grip": "versatile", "skill": "melee" }
        }"#;
        let data: EquipmentData = serde_json::from_str(json).unwrap();
        assert!(matches!(data.details, EquipmentKind::Weapon(_)));
        assert_eq!(data.quantity, 1);
        assert!((data.cost.to_base_units() - 10.0).abs() < f64::EPSILON);
    }
}
