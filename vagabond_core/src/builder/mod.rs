//! Character builder - Step-gated wizard that materializes a new character
//!
//! [`BuilderSession`] holds the pure state machine. [`CharacterBuilder`]
//! wraps it with the host ports: it resolves references, sends notices
//! for refused actions and commits the result.

mod actions;
mod commit;
mod economy;
mod error;
mod random;
mod session;
mod stats;
mod step;
mod tray;
mod view;

pub use commit::CommitReport;
pub use economy::Economy;
pub use error::BuilderError;
pub use random::{ancestry_weights, weighted_choice};
pub use session::{
    BuilderSession, ClassSummary, GearEntry, Selected, Selection, StartingPackSummary,
};
pub use stats::{PickedUp, StatAssignment};
pub use step::BuilderStep;
pub use view::{BuilderView, StepView};

use crate::config::RulesConfig;
use crate::host::{Document, HostPorts, IndexCache, Notice};
use crate::item::Item;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Drives one build session against a host
pub struct CharacterBuilder {
    ports: HostPorts,
    rules: RulesConfig,
    rng: StdRng,
    cache: IndexCache,
    session: BuilderSession,
}

impl CharacterBuilder {
    pub fn new(ports: HostPorts, rules: RulesConfig) -> Self {
        Self::with_rng(ports, rules, StdRng::from_entropy())
    }

    /// Deterministic randomizers
    pub fn with_rng(ports: HostPorts, rules: RulesConfig, rng: StdRng) -> Self {
        CharacterBuilder {
            ports,
            rules,
            rng,
            cache: IndexCache::new(),
            session: BuilderSession::new(),
        }
    }

    pub fn session(&self) -> &BuilderSession {
        &self.session
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Tell the user about a refused action and hand the error back
    fn report(&self, error: BuilderError) -> BuilderError {
        tracing::warn!(%error, "builder action refused");
        let message = self.ports.localizer.localize(error.i18n_key());
        self.ports.notifier.notify(Notice::error(message));
        error
    }

    fn check<T>(&self, result: Result<T, BuilderError>) -> Result<T, BuilderError> {
        result.map_err(|error| self.report(error))
    }

    async fn resolve_item(&self, uuid: &str) -> Result<Item, BuilderError> {
        match self.ports.resolver.resolve(uuid).await? {
            Some(Document::Item(item)) => Ok(item),
            Some(Document::Actor(_)) => Err(BuilderError::WrongItemType {
                uuid: uuid.to_string(),
                expected: "item",
                found: "actor".to_string(),
            }),
            None => Err(BuilderError::NotFound(uuid.to_string())),
        }
    }

    /// Resolve and require a specific item type
    async fn resolve_kind(&self, uuid: &str, expected: &'static str) -> Result<Item, BuilderError> {
        let item = self.resolve_item(uuid).await?;
        if item.type_name() != expected {
            return Err(BuilderError::WrongItemType {
                uuid: uuid.to_string(),
                expected,
                found: item.type_name().to_string(),
            });
        }
        Ok(item)
    }

    /// Missing or mistyped references count as absent; host failures still propagate
    async fn resolve_lenient(&self, uuid: &str) -> Result<Option<Item>, BuilderError> {
        match self.resolve_item(uuid).await {
            Ok(item) => Ok(Some(item)),
            Err(BuilderError::Host(error)) => Err(BuilderError::Host(error)),
            Err(error) => {
                tracing::warn!(uuid, %error, "skipping unresolved reference");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::character::Character;
    use crate::host::{MemoryHost, RngDice, TomlLocalizer};
    use crate::item::{
        AncestryData, AncestryTrait, ArmorData, ClassData, ClassFeature, ClassLevel,
        EquipmentData, EquipmentKind, Grip, ItemKind, PackEntry, PerkData, SkillChoice,
        SpellData, StarterPackData, StatBonus, WeaponData,
    };
    use crate::types::{Currency, StatKey, WeaponSkillKey};
    use std::sync::Arc;

    fn gear(id: &str, name: &str, cost: Currency, slots: u32, details: EquipmentKind) -> Item {
        let mut data = EquipmentData::new(details);
        data.cost = cost;
        data.slots = slots;
        Item::new(id, name, ItemKind::Equipment(data))
    }

    /// A small content library loaded into a memory host
    pub async fn host() -> Arc<MemoryHost> {
        let host = MemoryHost::new();
        let rules = RulesConfig::default();
        let packs = &rules.packs;

        for name in ["Human", "Dwarf"] {
            let ancestry = AncestryData {
                traits: vec![AncestryTrait {
                    name: "Hardy".into(),
                    stat_bonuses: vec![StatBonus { stat: StatKey::Might, amount: 1 }],
                    extra_training: vec!["survival".into()],
                    ..Default::default()
                }],
                ..Default::default()
            };
            host.insert_item(
                Some(&packs.ancestries),
                Item::new(name.to_lowercase(), name, ItemKind::Ancestry(ancestry)),
            )
            .await;
        }

        let wizard = ClassData {
            is_spellcaster: true,
            mana_multiplier: 4,
            casting_stat: Some(StatKey::Reason),
            levels: vec![ClassLevel {
                level: 1,
                features: vec![ClassFeature {
                    name: "Arcane Sight".into(),
                    perk: Some("arcane-sight".into()),
                }],
                spells: 2,
            }],
            guaranteed_skills: vec!["brawl".into()],
            skill_choices: vec![SkillChoice {
                count: 1,
                pool: vec!["arcana".into(), "mysticism".into()],
            }],
            ..Default::default()
        };
        host.insert_item(
            Some(&packs.classes),
            Item::new("wizard", "Wizard", ItemKind::Class(wizard)),
        )
        .await;

        for perk in ["arcane-sight", "tough", "lucky"] {
            host.insert_item(
                Some(&packs.perks),
                Item::new(perk, perk, ItemKind::Perk(PerkData::default())),
            )
            .await;
        }
        for spell in ["burn", "frost", "shock"] {
            host.insert_item(
                Some(&packs.spells),
                Item::new(spell, spell, ItemKind::Spell(SpellData::default())),
            )
            .await;
        }

        let sword = gear(
            "sword",
            "Sword",
            Currency::new(10, 0, 0),
            1,
            EquipmentKind::Weapon(WeaponData {
                damage: "d8".into(),
                damage_type: Default::default(),
                grip: Grip::Versatile,
                range: None,
                properties: Vec::new(),
                skill: WeaponSkillKey::Melee,
            }),
        );
        let leather = gear(
            "leather",
            "Leather",
            Currency::new(5, 0, 0),
            1,
            EquipmentKind::Armor(ArmorData { rating: 1, rating_bonus: 0, might_requirement: 0 }),
        );
        let torch = gear("torch", "Torch", Currency::new(0, 1, 0), 1, EquipmentKind::Gear);
        for item in [sword, leather, torch] {
            host.insert_item(Some(&packs.gear), item).await;
        }

        let pack = StarterPackData {
            items: vec![PackEntry { uuid: "torch".into(), quantity: 3 }],
            currency: Currency::new(12, 0, 0),
        };
        host.insert_item(
            Some(&packs.starter_packs),
            Item::new("explorer", "Explorer's Pack", ItemKind::StarterPack(pack)),
        )
        .await;

        host.insert_actor(Character::new("hero", "Hero")).await;
        Arc::new(host)
    }

    pub fn builder(host: Arc<MemoryHost>, seed: u64) -> CharacterBuilder {
        let ports = HostPorts::memory(
            host,
            Arc::new(TomlLocalizer::english()),
            Arc::new(RngDice::seeded(seed)),
        );
        CharacterBuilder::with_rng(ports, RulesConfig::default(), StdRng::seed_from_u64(seed))
    }
}
