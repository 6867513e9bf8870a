//! In-memory host for tests and the demo shell

use super::{
    CompendiumIndex, Document, DocumentResolver, DocumentStore, HostError, IndexEntry, Notice,
    Notifier, PathUpdates,
};
use crate::character::Character;
use crate::item::Item;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;

/// Content packs as loaded from JSON: pack id → items
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentLibrary {
    #[serde(default)]
    pub packs: BTreeMap<String, Vec<Item>>,
    #[serde(default)]
    pub actors: Vec<Character>,
}

impl ContentLibrary {
    pub fn from_json(content: &str) -> Result<Self, HostError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Stores documents by uuid. Item uuids are their ids; packs list uuids.
#[derive(Default)]
pub struct MemoryHost {
    items: RwLock<BTreeMap<String, Item>>,
    actors: RwLock<BTreeMap<String, Character>>,
    packs: RwLock<BTreeMap<String, Vec<String>>>,
    notices: Mutex<Vec<Notice>>,
    next_id: AtomicU64,
}

impl MemoryHost {
    pub fn new() -> Self {
        MemoryHost::default()
    }

    pub async fn from_library(library: ContentLibrary) -> Self {
        let host = MemoryHost::new();
        for (pack, items) in library.packs {
            for item in items {
                host.insert_item(Some(&pack), item).await;
            }
        }
        for actor in library.actors {
            host.insert_actor(actor).await;
        }
        host
    }

    /// Add a library item, optionally listing it in a pack
    pub async fn insert_item(&self, pack: Option<&str>, item: Item) {
        if let Some(pack) = pack {
            self.packs
                .write()
                .await
                .entry(pack.to_string())
                .or_default()
                .push(item.id.clone());
        }
        self.items.write().await.insert(item.id.clone(), item);
    }

    pub async fn insert_actor(&self, character: Character) {
        self.actors.write().await.insert(character.id.clone(), character);
    }

    pub async fn actor(&self, id: &str) -> Option<Character> {
        self.actors.read().await.get(id).cloned()
    }

    /// Every notice sent so far
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_else(|e| e.into_inner().clone())
    }

    fn fresh_id(&self, character_id: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}.item{}", character_id, n)
    }
}

/// Set `path` (dot separated) inside `root`, creating objects along the way
fn set_path(root: &mut Value, path: &str, value: Value) -> Result<(), HostError> {
    let mut parts = path.split('.').peekable();
    let mut node = root;
    while let Some(part) = parts.next() {
        if part.is_empty() {
            return Err(HostError::InvalidPath(path.to_string()));
        }
        let object = node
            .as_object_mut()
            .ok_or_else(|| HostError::InvalidPath(path.to_string()))?;
        if parts.peek().is_none() {
            object.insert(part.to_string(), value);
            return Ok(());
        }
        node = object
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
    Err(HostError::InvalidPath(path.to_string()))
}

fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, part| node.get(part))
}

#[async_trait]
impl DocumentResolver for MemoryHost {
    async fn resolve(&self, uuid: &str) -> Result<Option<Document>, HostError> {
        if let Some(item) = self.items.read().await.get(uuid) {
            return Ok(Some(Document::Item(item.clone())));
        }
        Ok(self.actors.read().await.get(uuid).cloned().map(Document::Actor))
    }
}

#[async_trait]
impl CompendiumIndex for MemoryHost {
    async fn list_index(
        &self,
        pack_id: &str,
        fields: Vec<String>,
    ) -> Result<Vec<IndexEntry>, HostError> {
        let packs = self.packs.read().await;
        let uuids = packs
            .get(pack_id)
            .ok_or_else(|| HostError::not_found("pack", pack_id))?;
        let items = self.items.read().await;

        let mut entries = Vec::with_capacity(uuids.len());
        for item in uuids.iter().filter_map(|uuid| items.get(uuid)) {
            let json = serde_json::to_value(item)?;
            let fields = fields
                .iter()
                .filter_map(|path| get_path(&json, path).map(|v| (path.clone(), v.clone())))
                .collect();
            entries.push(IndexEntry {
                uuid: item.id.clone(),
                name: item.name.clone(),
                item_type: item.type_name().to_string(),
                fields,
            });
        }
        Ok(entries)
    }
}

#[async_trait]
impl DocumentStore for MemoryHost {
    async fn update(&self, character_id: &str, updates: PathUpdates) -> Result<(), HostError> {
        let mut actors = self.actors.write().await;
        let character = actors
            .get_mut(character_id)
            .ok_or_else(|| HostError::not_found("actor", character_id))?;

        let mut json = serde_json::to_value(&*character)?;
        for (path, value) in updates {
            set_path(&mut json, &path, value)?;
        }
        let updated: Character = serde_json::from_value(json)?;
        *character = updated;
        Ok(())
    }

    async fn create_embedded_items(
        &self,
        character_id: &str,
        items: Vec<Item>,
    ) -> Result<Vec<Item>, HostError> {
        let mut actors = self.actors.write().await;
        let character = actors
            .get_mut(character_id)
            .ok_or_else(|| HostError::not_found("actor", character_id))?;

        let created: Vec<Item> = items
            .into_iter()
            .map(|mut item| {
                item.id = self.fresh_id(character_id);
                item
            })
            .collect();
        character.items.extend(created.iter().cloned());
        Ok(created)
    }
}

impl Notifier for MemoryHost {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemKind, PerkData};
    use crate::types::StatKey;
    use serde_json::json;

    fn perk(id: &str) -> Item {
        Item::new(id, id.to_uppercase(), ItemKind::Perk(PerkData::default()))
    }

    #[test]
    fn test_set_path_creates_objects() {
        let mut root = json!({ "system": {} });
        set_path(&mut root, "system.stats.might.value", json!(5)).unwrap();
        assert_eq!(root["system"]["stats"]["might"]["value"], 5);
        assert!(set_path(&mut root, "system.stats.might.value.deeper", json!(1)).is_err());
        assert!(set_path(&mut root, "system..x", json!(1)).is_err());
    }

    #[tokio::test]
    async fn test_resolve_and_index() {
        let host = MemoryHost::new();
        host.insert_item(Some("vagabond.perks"), perk("tough")).await;
        host.insert_item(None, perk("loose")).await;

        assert!(matches!(host.resolve("loose").await, Ok(Some(Document::Item(_)))));
        assert!(matches!(host.resolve("nope").await, Ok(None)));

        let index = host
            .list_index("vagabond.perks", vec!["system.type".into()])
            .await
            .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].item_type, "perk");
        assert_eq!(index[0].fields["system.type"], "perk");
        assert!(host.list_index("vagabond.nothing", vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_update_paths() {
        let host = MemoryHost::new();
        host.insert_actor(Character::new("a1", "Test")).await;

        let mut updates = PathUpdates::new();
        updates.insert("system.stats.might.value".into(), json!(6));
        updates.insert("system.attributes.constructed".into(), json!(true));
        host.update("a1", updates).await.unwrap();

        let actor = host.actor("a1").await.unwrap();
        assert_eq!(actor.system.stat_value(StatKey::Might), 6);
        assert!(actor.system.attributes.constructed);
    }

    #[tokio::test]
    async fn test_bad_update_leaves_actor_untouched() {
        let host = MemoryHost::new();
        host.insert_actor(Character::new("a1", "Test")).await;

        let mut updates = PathUpdates::new();
        updates.insert("system.level".into(), json!("not a number"));
        assert!(matches!(host.update("a1", updates).await, Err(HostError::Serialization(_))));
        assert_eq!(host.actor("a1").await.unwrap().system.level, 1);
        assert!(host.update("missing", PathUpdates::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_create_embedded_items_assigns_ids() {
        let host = MemoryHost::new();
        host.insert_actor(Character::new("a1", "Test")).await;
        let created = host
            .create_embedded_items("a1", vec![perk("tough"), perk("tough")])
            .await
            .unwrap();
        assert_ne!(created[0].id, created[1].id);
        assert_eq!(host.actor("a1").await.unwrap().items.len(), 2);
    }

    #[test]
    fn test_notices_recorded() {
        let host = MemoryHost::new();
        host.notify(Notice::warn("careful"));
        assert_eq!(host.notices(), vec![Notice::warn("careful")]);
    }
}
