//! Host collaborators - document lookup, persistence, dice, text and notices
//!
//! The engine never talks to a host application directly. Every service is
//! a port trait bundled into [`HostPorts`] and injected at construction.
//! [`MemoryHost`] implements the document ports in memory for tests and the
//! demo shell.

mod cache;
mod dice;
mod error;
mod localize;
mod memory;
mod ports;

pub use cache::IndexCache;
pub use dice::RngDice;
pub use error::HostError;
pub use localize::TomlLocalizer;
pub use memory::{ContentLibrary, MemoryHost};
pub use ports::{
    CompendiumIndex, DiceRoller, DocumentResolver, DocumentStore, Localizer, Notifier,
};

#[cfg(test)]
pub use ports::{
    MockCompendiumIndex, MockDiceRoller, MockDocumentResolver, MockDocumentStore, MockLocalizer,
    MockNotifier,
};

use crate::character::Character;
use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A resolved host document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "documentName")]
pub enum Document {
    Actor(Character),
    Item(Item),
}

impl Document {
    pub fn into_actor(self) -> Option<Character> {
        match self {
            Document::Actor(character) => Some(character),
            Document::Item(_) => None,
        }
    }
}

/// One row of a compendium index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    /// Extra fields requested by the caller, keyed by their dotted path
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Dotted path → new value, applied as one update
pub type PathUpdates = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// A user-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Warn, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Error, message: message.into() }
    }
}

/// All host collaborators the builder needs
#[derive(Clone)]
pub struct HostPorts {
    pub resolver: Arc<dyn DocumentResolver>,
    pub index: Arc<dyn CompendiumIndex>,
    pub store: Arc<dyn DocumentStore>,
    pub localizer: Arc<dyn Localizer>,
    pub dice: Arc<dyn DiceRoller>,
    pub notifier: Arc<dyn Notifier>,
}

impl HostPorts {
    /// Wire every document port to one in-memory host
    pub fn memory(
        host: Arc<MemoryHost>,
        localizer: Arc<dyn Localizer>,
        dice: Arc<dyn DiceRoller>,
    ) -> Self {
        HostPorts {
            resolver: host.clone(),
            index: host.clone(),
            store: host.clone(),
            localizer,
            dice,
            notifier: host,
        }
    }
}
