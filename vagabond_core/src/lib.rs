//! vagabond_core - Character rules engine for the Vagabond system
//!
//! This library provides:
//! - Bonus formulas: numeric or `@path` expressions over a roll-data snapshot
//! - Stat sources: items and active effects feeding a bonus accumulator
//! - Derived stats: totals, saves, skills, pools, speed, armor, inventory
//! - CharacterBuilder: the step-by-step creation wizard and its commit
//! - Host ports: document lookup, persistence, localization, dice, notices

pub mod builder;
pub mod character;
pub mod config;
pub mod derived;
pub mod formula;
pub mod host;
pub mod item;
pub mod prelude;
pub mod source;
pub mod types;

// Re-export core types for convenience
pub use builder::{BuilderError, BuilderSession, BuilderStep, CharacterBuilder, CommitReport};
pub use character::{Character, CharacterData};
pub use config::{default_rules, load_rules, ConfigError, RulesConfig};
pub use derived::{derive_stats, BonusAccumulator, DerivedStats};
pub use formula::{Bonus, RollData};
pub use host::{HostError, HostPorts, MemoryHost};
pub use item::{Item, ItemKind};
pub use source::{ActiveEffect, ItemSource, StatSource};
pub use types::{Currency, SaveKey, SkillKey, StatKey, WeaponSkillKey};
