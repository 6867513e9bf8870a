//! Port traits for host services

use super::{Document, HostError, IndexEntry, Notice, PathUpdates};
use crate::item::Item;
use async_trait::async_trait;

/// Turns stored identifiers into live documents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentResolver: Send + Sync {
    /// `Ok(None)` when nothing has that uuid
    async fn resolve(&self, uuid: &str) -> Result<Option<Document>, HostError>;
}

/// Lists the contents of a compendium pack
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompendiumIndex: Send + Sync {
    async fn list_index(
        &self,
        pack_id: &str,
        fields: Vec<String>,
    ) -> Result<Vec<IndexEntry>, HostError>;
}

/// Persists character changes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn update(&self, character_id: &str, updates: PathUpdates) -> Result<(), HostError>;

    /// Embed copies of `items`; returns them as created
    async fn create_embedded_items(
        &self,
        character_id: &str,
        items: Vec<Item>,
    ) -> Result<Vec<Item>, HostError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait Localizer: Send + Sync {
    /// Translated text, or the key itself when missing
    fn localize(&self, key: &str) -> String;
}

/// Uniform die rolls
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiceRoller: Send + Sync {
    /// A value in `1..=faces`
    async fn roll(&self, faces: u32) -> u32;
}

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
