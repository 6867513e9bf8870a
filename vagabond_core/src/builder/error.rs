//! BuilderError - Reasons a builder action is refused

use super::BuilderStep;
use crate::host::HostError;
use thiserror::Error;

/// Why a builder action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("no ancestry selected")]
    MissingAncestry,
    #[error("no class selected")]
    MissingClass,
    #[error("stat assignment is incomplete")]
    StatsIncomplete,
    #[error("step {0:?} is not reachable yet")]
    StepLocked(BuilderStep),
    #[error("step {0:?} is not complete")]
    StepIncomplete(BuilderStep),
    #[error("unknown stat array {0}")]
    UnknownArray(u8),
    #[error("pool index {0} is out of range")]
    PoolIndexOutOfRange(usize),
    #[error("value {0} is not in the pool")]
    ValueNotInPool(i32),
    #[error("no value is picked up")]
    NothingPickedUp,
    #[error("{0} is already selected")]
    DuplicateEntry(String),
    #[error("spell limit of {0} reached")]
    SpellCapReached(u32),
    #[error("{0} is granted by the class and cannot be removed")]
    ClassPerkLocked(String),
    #[error("{0} is not in the tray")]
    NotInTray(String),
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("{uuid} is a {found}, expected {expected}")]
    WrongItemType {
        uuid: String,
        expected: &'static str,
        found: String,
    },
    #[error("compendium pack {0} is empty")]
    EmptyIndex(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl BuilderError {
    /// Localization key for the user-facing message
    pub fn i18n_key(&self) -> &'static str {
        match self {
            BuilderError::MissingAncestry => "builder.error.missing_ancestry",
            BuilderError::MissingClass => "builder.error.missing_class",
            BuilderError::StatsIncomplete => "builder.error.stats_incomplete",
            BuilderError::StepLocked(_) => "builder.error.step_locked",
            BuilderError::StepIncomplete(_) => "builder.error.step_incomplete",
            BuilderError::UnknownArray(_) => "builder.error.unknown_array",
            BuilderError::PoolIndexOutOfRange(_) => "builder.error.pool_index",
            BuilderError::ValueNotInPool(_) => "builder.error.value_not_in_pool",
            BuilderError::NothingPickedUp => "builder.error.nothing_picked_up",
            BuilderError::DuplicateEntry(_) => "builder.error.duplicate",
            BuilderError::SpellCapReached(_) => "builder.error.spell_cap",
            BuilderError::ClassPerkLocked(_) => "builder.error.class_perk_locked",
            BuilderError::NotInTray(_) => "builder.error.not_in_tray",
            BuilderError::NotFound(_) => "builder.error.not_found",
            BuilderError::WrongItemType { .. } => "builder.error.wrong_type",
            BuilderError::EmptyIndex(_) => "builder.error.empty_index",
            BuilderError::Host(_) => "builder.error.host",
        }
    }
}
