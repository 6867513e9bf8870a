//! BuilderStep - Wizard step order and navigation

use serde::{Deserialize, Serialize};

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderStep {
    #[default]
    Ancestry,
    Class,
    Stats,
    Perks,
    Spells,
    StartingPacks,
    Gear,
}

impl BuilderStep {
    pub fn all() -> &'static [BuilderStep] {
        &[
            BuilderStep::Ancestry,
            BuilderStep::Class,
            BuilderStep::Stats,
            BuilderStep::Perks,
            BuilderStep::Spells,
            BuilderStep::StartingPacks,
            BuilderStep::Gear,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<BuilderStep> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> Option<BuilderStep> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Option<BuilderStep> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Localization key for the step label
    pub fn i18n_key(&self) -> &'static str {
        match self {
            BuilderStep::Ancestry => "builder.step.ancestry",
            BuilderStep::Class => "builder.step.class",
            BuilderStep::Stats => "builder.step.stats",
            BuilderStep::Perks => "builder.step.perks",
            BuilderStep::Spells => "builder.step.spells",
            BuilderStep::StartingPacks => "builder.step.starting_packs",
            BuilderStep::Gear => "builder.step.gear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(BuilderStep::Ancestry.next(), Some(BuilderStep::Class));
        assert_eq!(BuilderStep::Gear.next(), None);
        assert_eq!(BuilderStep::Ancestry.prev(), None);
        assert_eq!(BuilderStep::Spells.prev(), Some(BuilderStep::Perks));
        assert_eq!(BuilderStep::StartingPacks.index(), 5);
    }
}
