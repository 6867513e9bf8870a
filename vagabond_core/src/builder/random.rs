//! Randomizers for each step, plus a full random build

use super::{BuilderError, CharacterBuilder};
use crate::host::IndexEntry;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::BTreeMap;

/// Weight for each entry by name; names missing from the table weigh 1
pub fn ancestry_weights(entries: &[IndexEntry], table: &BTreeMap<String, u32>) -> Vec<u32> {
    entries
        .iter()
        .map(|e| table.get(&e.name).copied().unwrap_or(1))
        .collect()
}

/// Weighted pick, uniform when every weight is zero; `None` when empty
pub fn weighted_choice<R: Rng>(weights: &[u32], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    match WeightedIndex::new(weights) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(_) => Some(rng.gen_range(0..weights.len())),
    }
}

impl CharacterBuilder {
    /// Entries of `type_name` from a configured pack
    async fn pack_entries(
        &mut self,
        pack: &str,
        type_name: &str,
    ) -> Result<Vec<IndexEntry>, BuilderError> {
        let entries: Vec<IndexEntry> = self
            .cache
            .get(self.ports.index.as_ref(), pack, &[])
            .await?
            .iter()
            .filter(|e| e.item_type == type_name)
            .cloned()
            .collect();
        if entries.is_empty() {
            return Err(BuilderError::EmptyIndex(pack.to_string()));
        }
        Ok(entries)
    }

    pub async fn randomize_ancestry(&mut self) -> Result<String, BuilderError> {
        let result = self.try_randomize_ancestry().await;
        self.check(result)
    }

    async fn try_randomize_ancestry(&mut self) -> Result<String, BuilderError> {
        let pack = self.rules.packs.ancestries.clone();
        let entries = self.pack_entries(&pack, "ancestry").await?;
        let weights = ancestry_weights(&entries, &self.rules.builder.ancestry_weights);
        let choice = weighted_choice(&weights, &mut self.rng)
            .ok_or_else(|| BuilderError::EmptyIndex(pack.clone()))?;
        let uuid = entries[choice].uuid.clone();
        self.try_select_ancestry(&uuid).await?;
        Ok(uuid)
    }

    /// Uniform class, then random picks from each optional skill pool
    pub async fn randomize_class(&mut self) -> Result<String, BuilderError> {
        let result = self.try_randomize_class().await;
        self.check(result)
    }

    async fn try_randomize_class(&mut self) -> Result<String, BuilderError> {
        let pack = self.rules.packs.classes.clone();
        let entries = self.pack_entries(&pack, "class").await?;
        let uuid = entries
            .choose(&mut self.rng)
            .map(|e| e.uuid.clone())
            .ok_or_else(|| BuilderError::EmptyIndex(pack.clone()))?;
        self.try_select_class(&uuid).await?;

        let choices = self
            .session
            .selection
            .class
            .as_ref()
            .map(|c| c.skill_choices.clone())
            .unwrap_or_default();
        for choice in choices {
            let taken = self.session.all_trained_skills();
            let open: Vec<&String> = choice.pool.iter().filter(|s| !taken.contains(*s)).collect();
            let picks: Vec<String> = open
                .choose_multiple(&mut self.rng, choice.count as usize)
                .map(|s| s.to_string())
                .collect();
            self.session.selection.trained_skills.extend(picks);
        }
        Ok(uuid)
    }

    /// Roll a d12 for the array, optionally dealing it onto the stats
    pub async fn randomize_stats(&mut self, auto_assign: bool) -> Result<u8, BuilderError> {
        let result = self.try_randomize_stats(auto_assign).await;
        self.check(result)
    }

    async fn try_randomize_stats(&mut self, auto_assign: bool) -> Result<u8, BuilderError> {
        let roll = self.ports.dice.roll(12).await;
        let id = u8::try_from(roll).map_err(|_| BuilderError::UnknownArray(u8::MAX))?;
        let array = self.rules.stat_array(id).ok_or(BuilderError::UnknownArray(id))?;
        self.session.selection.stats.select_array(array);
        if auto_assign {
            self.session.selection.stats.auto_assign(self.rules.assignment_order());
        }
        tracing::debug!(array = id, auto_assign, "randomized stats");
        Ok(id)
    }

    /// Replace the spell tray with a random set up to the class cap
    pub async fn randomize_spells(&mut self) -> Result<Vec<String>, BuilderError> {
        let result = self.try_randomize_spells().await;
        self.check(result)
    }

    async fn try_randomize_spells(&mut self) -> Result<Vec<String>, BuilderError> {
        if self.session.selection.class.is_none() {
            return Err(BuilderError::MissingClass);
        }
        let cap = self.session.spell_cap() as usize;
        let picks: Vec<String> = if cap == 0 {
            Vec::new()
        } else {
            let pack = self.rules.packs.spells.clone();
            let entries = self.pack_entries(&pack, "spell").await?;
            let amount = cap.min(entries.len());
            index::sample(&mut self.rng, entries.len(), amount)
                .into_iter()
                .map(|i| entries[i].uuid.clone())
                .collect()
        };
        // Only replace the tray once the picks are known
        self.session.selection.spells.clear();
        for uuid in &picks {
            self.session.add_spell(uuid)?;
        }
        Ok(picks)
    }

    pub async fn randomize_starting_pack(&mut self) -> Result<String, BuilderError> {
        let result = self.try_randomize_starting_pack().await;
        self.check(result)
    }

    async fn try_randomize_starting_pack(&mut self) -> Result<String, BuilderError> {
        let pack = self.rules.packs.starter_packs.clone();
        let entries = self.pack_entries(&pack, "starter_pack").await?;
        let uuid = entries
            .choose(&mut self.rng)
            .map(|e| e.uuid.clone())
            .ok_or_else(|| BuilderError::EmptyIndex(pack.clone()))?;
        self.try_select_starting_pack(&uuid).await?;
        Ok(uuid)
    }

    /// Ancestry, class, stats (auto-assigned), spells, starting pack.
    /// Perks come from the class and gear is left to the player.
    pub async fn randomize_all(&mut self) -> Result<(), BuilderError> {
        let result = self.try_randomize_all().await;
        self.check(result)
    }

    async fn try_randomize_all(&mut self) -> Result<(), BuilderError> {
        self.try_randomize_ancestry().await?;
        self.try_randomize_class().await?;
        self.try_randomize_stats(true).await?;
        self.try_randomize_spells().await?;
        self.try_randomize_starting_pack().await?;
        tracing::info!("randomized full build");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::testing::{builder, host};
    use crate::config::{BuilderRules, RulesConfig};
    use crate::host::{HostPorts, RngDice, TomlLocalizer};
    use rand::rngs::StdRng;
    use std::sync::Arc;
    use crate::types::StatKey;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entry(name: &str) -> IndexEntry {
        IndexEntry {
            uuid: name.to_lowercase(),
            name: name.into(),
            item_type: "ancestry".into(),
            fields: Default::default(),
        }
    }

    #[test]
    fn test_ancestry_weights_converge() {
        let entries: Vec<IndexEntry> =
            ["Human", "Dwarf", "Elf", "Halfling"].iter().map(|n| entry(n)).collect();
        let weights = ancestry_weights(&entries, &BuilderRules::default().ancestry_weights);
        assert_eq!(weights, vec![5, 1, 1, 1]);

        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut counts = [0u32; 4];
        for _ in 0..1000 {
            let i = weighted_choice(&weights, &mut rng).unwrap();
            counts[i] += 1;
        }
        let human = counts[0] as f64 / 1000.0;
        assert!((0.55..=0.70).contains(&human), "human frequency {}", human);
        for count in &counts[1..] {
            let share = *count as f64 / 1000.0;
            assert!((0.08..=0.17).contains(&share), "minor frequency {}", share);
        }
    }

    #[test]
    fn test_unmatched_names_are_uniform() {
        let entries: Vec<IndexEntry> = ["Orc", "Goblin"].iter().map(|n| entry(n)).collect();
        let weights = ancestry_weights(&entries, &BuilderRules::default().ancestry_weights);
        assert_eq!(weights, vec![1, 1]);
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pick = weighted_choice(&[0, 0, 0], &mut rng).unwrap();
        assert!(pick < 3);
        assert_eq!(weighted_choice(&[], &mut rng), None);
    }

    #[tokio::test]
    async fn test_randomize_all() {
        let mut b = builder(host().await, 9);
        b.randomize_all().await.unwrap();

        let session = b.session();
        assert!(session.selection.ancestry.is_some());
        assert_eq!(session.selection.class.as_ref().map(|c| c.uuid.as_str()), Some("wizard"));
        assert!(session.selection.stats.is_complete());
        assert_eq!(session.selection.spells.len(), 2);
        assert_eq!(session.selection.starting_pack.as_ref().map(|p| p.uuid.as_str()), Some("explorer"));
        // One pick from [arcana, mysticism]
        assert_eq!(session.selection.trained_skills.len(), 1);
        assert!(session.selection.gear.is_empty());
    }

    #[tokio::test]
    async fn test_randomize_stats_uses_d12() {
        let mut b = builder(host().await, 3);
        let id = b.randomize_stats(true).await.unwrap();
        assert!((1..=12).contains(&id));
        let stats = &b.session().selection.stats;
        assert_eq!(stats.array_id(), Some(id));
        let might = stats.value(StatKey::Might).unwrap();
        assert!(StatKey::all().iter().all(|k| stats.value(*k).unwrap() <= might));
    }

    #[tokio::test]
    async fn test_failed_spell_randomize_keeps_tray() {
        let host = host().await;
        let mut rules = RulesConfig::default();
        rules.packs.spells = "vagabond.missing".into();
        let ports = HostPorts::memory(
            host,
            Arc::new(TomlLocalizer::english()),
            Arc::new(RngDice::seeded(4)),
        );
        let mut b = CharacterBuilder::with_rng(ports, rules, StdRng::seed_from_u64(4));
        b.select_class("wizard").await.unwrap();
        b.add_spell("burn").await.unwrap();

        assert!(matches!(b.randomize_spells().await, Err(BuilderError::Host(_))));
        assert_eq!(b.session().selection.spells, vec!["burn".to_string()]);
    }

    #[tokio::test]
    async fn test_randomize_spells_needs_class() {
        let mut b = builder(host().await, 3);
        assert_eq!(b.randomize_spells().await, Err(BuilderError::MissingClass));
    }
}
