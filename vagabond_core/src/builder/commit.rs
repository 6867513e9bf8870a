//! Finish - write the selection onto a character

use super::{BuilderError, CharacterBuilder};
use crate::character::Character;
use crate::host::{Document, HostError, Notice, PathUpdates};
use crate::item::Item;
use crate::types::{SkillKey, WeaponSkillKey};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;

/// Outcome of a successful commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub character_id: String,
    pub items_created: usize,
    pub trained_skills: Vec<String>,
    pub health: i32,
    pub mana: i32,
    pub luck: i32,
}

/// The selection turned into concrete documents
pub(super) struct Materialized {
    pub items: Vec<Item>,
    pub trained_skills: Vec<String>,
}

/// Set the trained flag for a skill and/or weapon skill named `name`.
/// Returns false when the name matches neither.
pub(super) fn mark_trained(character: &mut Character, name: &str) -> bool {
    let mut matched = false;
    if let Ok(key) = name.parse::<SkillKey>() {
        if let Some(skill) = character.system.skills.get_mut(&key) {
            skill.trained = true;
        }
        matched = true;
    }
    if let Ok(key) = name.parse::<WeaponSkillKey>() {
        if let Some(skill) = character.system.weapon_skills.get_mut(&key) {
            skill.trained = true;
        }
        matched = true;
    }
    matched
}

fn trained_paths(name: &str) -> Vec<String> {
    let mut paths = Vec::new();
    if let Ok(key) = name.parse::<SkillKey>() {
        paths.push(format!("system.skills.{}.trained", key.key()));
    }
    if let Ok(key) = name.parse::<WeaponSkillKey>() {
        paths.push(format!("system.weaponSkills.{}.trained", key.key()));
    }
    paths
}

fn push_unique(list: &mut Vec<String>, seen: &mut BTreeSet<String>, value: &str) {
    if seen.insert(value.to_string()) {
        list.push(value.to_string());
    }
}

impl CharacterBuilder {
    /// Resolve everything selected into item copies with creation flags set
    pub(super) async fn materialize(&self) -> Result<Materialized, BuilderError> {
        let selection = &self.session.selection;
        let mut items = Vec::new();

        let ancestry = match &selection.ancestry {
            Some(selected) => self.resolve_lenient(&selected.uuid).await?,
            None => None,
        };
        let ancestry_data = ancestry.as_ref().and_then(Item::as_ancestry).cloned();
        items.extend(ancestry);

        if let Some(class) = &selection.class {
            items.extend(self.resolve_lenient(&class.uuid).await?);
        }

        if let Some(pack) = &selection.starting_pack {
            if let Some(pack_item) = self.resolve_lenient(&pack.uuid).await? {
                let entries = pack_item
                    .as_starter_pack()
                    .map(|p| p.items.clone())
                    .unwrap_or_default();
                items.push(pack_item);
                for entry in entries {
                    if let Some(mut item) = self.resolve_lenient(&entry.uuid).await? {
                        if let Some(data) = item.as_equipment_mut() {
                            data.quantity = entry.quantity;
                        }
                        items.push(item);
                    }
                }
            }
        }

        let mut seen = BTreeSet::new();
        let mut perks = Vec::new();
        for uuid in self.session.all_perks() {
            push_unique(&mut perks, &mut seen, &uuid);
        }
        let mut spells = selection.spells.clone();
        let mut skills = Vec::new();
        let mut seen_skills = BTreeSet::new();
        for name in self.session.all_trained_skills() {
            push_unique(&mut skills, &mut seen_skills, &name);
        }
        if let Some(ancestry) = &ancestry_data {
            for uuid in ancestry.granted_perks() {
                push_unique(&mut perks, &mut seen, uuid);
            }
            for uuid in ancestry.granted_spells() {
                if !spells.contains(uuid) {
                    spells.push(uuid.clone());
                }
            }
            for name in ancestry.granted_training() {
                push_unique(&mut skills, &mut seen_skills, name);
            }
        }

        for uuid in perks.iter().chain(spells.iter()) {
            items.extend(self.resolve_lenient(uuid).await?);
        }

        let pack_contents: &[String] = selection
            .starting_pack
            .as_ref()
            .map(|p| p.contents.as_slice())
            .unwrap_or(&[]);
        for gear in selection.gear.iter().filter(|g| !pack_contents.contains(&g.uuid)) {
            items.extend(self.resolve_lenient(&gear.uuid).await?);
        }

        for item in &mut items {
            item.apply_creation_flags();
        }
        Ok(Materialized { items, trained_skills: skills })
    }

    /// Commit the session onto `character_id`.
    ///
    /// Writes stats and the constructed flag, creates every item, then
    /// re-derives the character to set trained skills and fill the pools.
    /// A host failure stops the sequence where it happened.
    pub async fn finish(&mut self, character_id: &str) -> Result<CommitReport, BuilderError> {
        let result = self.commit(character_id).await;
        let report = self.check(result)?;
        let message = self.ports.localizer.localize("builder.info.created");
        self.ports.notifier.notify(Notice::info(message));
        Ok(report)
    }

    async fn commit(&self, character_id: &str) -> Result<CommitReport, BuilderError> {
        self.validate_complete()?;
        let selection = &self.session.selection;

        let mut updates = PathUpdates::new();
        for (stat, value) in selection.stats.assigned() {
            updates.insert(format!("system.stats.{}.value", stat.key()), json!(value));
        }
        updates.insert("system.attributes.constructed".to_string(), json!(true));
        if let Some(pack) = &selection.starting_pack {
            let currency = serde_json::to_value(pack.currency).map_err(HostError::from)?;
            updates.insert("system.currency".to_string(), currency);
        }
        self.ports.store.update(character_id, updates).await?;
        tracing::info!(character = character_id, "wrote stats");

        let materialized = self.materialize().await?;
        let spell_count = materialized
            .items
            .iter()
            .filter(|i| i.is_spell())
            .count();
        let created = self
            .ports
            .store
            .create_embedded_items(character_id, materialized.items)
            .await?;
        tracing::info!(character = character_id, items = created.len(), spells = spell_count, "created items");

        // Second pass sees the new items
        let mut character = self
            .ports
            .resolver
            .resolve(character_id)
            .await?
            .and_then(Document::into_actor)
            .ok_or_else(|| BuilderError::NotFound(character_id.to_string()))?;
        character.prepare_derived_data(&self.rules);

        let mut updates = PathUpdates::new();
        for name in &materialized.trained_skills {
            let paths = trained_paths(name);
            if paths.is_empty() {
                tracing::warn!(skill = %name, "unknown skill name, not trained");
            }
            for path in paths {
                updates.insert(path, json!(true));
            }
        }
        let derived = &character.derived;
        updates.insert("system.health.current".to_string(), json!(derived.health.max));
        updates.insert("system.mana.current".to_string(), json!(derived.mana.max));
        updates.insert("system.luck.current".to_string(), json!(derived.luck_max));
        self.ports.store.update(character_id, updates).await?;
        tracing::info!(character = character_id, "finalized skills and pools");

        Ok(CommitReport {
            character_id: character_id.to_string(),
            items_created: created.len(),
            trained_skills: materialized.trained_skills,
            health: derived.health.max,
            mana: derived.mana.max,
            luck: derived.luck_max,
        })
    }
}
