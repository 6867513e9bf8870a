//! Prelude module for convenient imports
//!
//! ```rust
//! use vagabond_core::prelude::*;
//! ```

// Core types
pub use crate::character::{Character, CharacterData};
pub use crate::types::{Currency, SaveKey, SkillKey, StatKey, WeaponSkillKey};

// Items
pub use crate::item::{Item, ItemKind};

// Derivation
pub use crate::derived::{derive_stats, DerivedStats};
pub use crate::source::{ActiveEffect, StatSource};

// Builder
pub use crate::builder::{BuilderError, BuilderStep, CharacterBuilder, Economy};

// Host
pub use crate::host::{Document, HostPorts, MemoryHost, Notice, RngDice, TomlLocalizer};

// Config
pub use crate::config::{default_rules, RulesConfig};
