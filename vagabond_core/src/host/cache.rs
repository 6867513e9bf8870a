//! IndexCache - Per-pack compendium index memo

use super::{CompendiumIndex, HostError, IndexEntry};
use std::collections::HashMap;

/// Compendium indices fetched once per pack and kept for the session
#[derive(Debug, Default)]
pub struct IndexCache {
    packs: HashMap<String, Vec<IndexEntry>>,
}

impl IndexCache {
    pub fn new() -> Self {
        IndexCache::default()
    }

    /// The index for `pack_id`, fetching it on first use.
    /// `fields` only matters for the first fetch.
    pub async fn get(
        &mut self,
        index: &dyn CompendiumIndex,
        pack_id: &str,
        fields: &[&str],
    ) -> Result<&[IndexEntry], HostError> {
        if !self.packs.contains_key(pack_id) {
            let fields = fields.iter().map(|f| f.to_string()).collect();
            let entries = index.list_index(pack_id, fields).await?;
            tracing::debug!(pack = pack_id, entries = entries.len(), "cached compendium index");
            self.packs.insert(pack_id.to_string(), entries);
        }
        Ok(self.packs.get(pack_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn is_cached(&self, pack_id: &str) -> bool {
        self.packs.contains_key(pack_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockCompendiumIndex;

    fn entry(uuid: &str) -> IndexEntry {
        IndexEntry {
            uuid: uuid.into(),
            name: uuid.into(),
            item_type: "perk".into(),
            fields: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_fetches_once_per_pack() {
        let mut index = MockCompendiumIndex::new();
        index
            .expect_list_index()
            .times(1)
            .returning(|_, _| Ok(vec![entry("a"), entry("b")]));

        let mut cache = IndexCache::new();
        assert_eq!(cache.get(&index, "perks", &[]).await.unwrap().len(), 2);
        assert_eq!(cache.get(&index, "perks", &[]).await.unwrap().len(), 2);
        assert!(cache.is_cached("perks"));
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let mut index = MockCompendiumIndex::new();
        index
            .expect_list_index()
            .times(2)
            .returning(|pack, _| Err(HostError::not_found("pack", pack)));

        let mut cache = IndexCache::new();
        assert!(cache.get(&index, "gone", &[]).await.is_err());
        assert!(cache.get(&index, "gone", &[]).await.is_err());
        assert!(!cache.is_cached("gone"));
    }
}
