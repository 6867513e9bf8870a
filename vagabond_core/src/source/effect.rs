//! ActiveEffect - Persistent bonus grants attached to characters and items

use crate::derived::{BonusAccumulator, BonusTarget};
use crate::formula::Bonus;
use crate::source::StatSource;
use serde::{Deserialize, Serialize};

/// How a change combines with the target list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeMode {
    #[default]
    Add,
    Override,
}

/// One key/value change carried by an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectChange {
    /// Target path, e.g. `system.stats.might.bonus`
    pub key: String,
    #[serde(default)]
    pub mode: ChangeMode,
    #[serde(default)]
    pub value: Bonus,
}

/// A named bundle of changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub changes: Vec<EffectChange>,
}

impl ActiveEffect {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ActiveEffect {
            id: id.into(),
            name: name.into(),
            disabled: false,
            changes: Vec::new(),
        }
    }

    /// Add an `Add`-mode change
    pub fn with_change(mut self, key: impl Into<String>, value: impl Into<Bonus>) -> Self {
        self.changes.push(EffectChange {
            key: key.into(),
            mode: ChangeMode::Add,
            value: value.into(),
        });
        self
    }

    /// Add an `Override`-mode change
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<Bonus>) -> Self {
        self.changes.push(EffectChange {
            key: key.into(),
            mode: ChangeMode::Override,
            value: value.into(),
        });
        self
    }

    /// Push every change into the accumulator. Unknown keys are skipped.
    pub fn push_changes(&self, bonuses: &mut BonusAccumulator) {
        if self.disabled {
            return;
        }
        for change in &self.changes {
            let target: BonusTarget = match change.key.parse() {
                Ok(target) => target,
                Err(error) => {
                    tracing::warn!(effect = %self.name, %error, "skipping effect change");
                    continue;
                }
            };
            match (change.mode, target) {
                (_, BonusTarget::Spellcaster) => bonuses.push(target, change.value.clone()),
                (ChangeMode::Override, _) => {
                    tracing::warn!(
                        effect = %self.name,
                        key = %change.key,
                        "override is only supported on the spellcaster flag; adding instead"
                    );
                    bonuses.push(target, change.value.clone());
                }
                (ChangeMode::Add, _) => bonuses.push(target, change.value.clone()),
            }
        }
    }
}

impl StatSource for ActiveEffect {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        200 // Character effects apply after item-granted ones
    }

    fn apply(&self, bonuses: &mut BonusAccumulator) {
        self.push_changes(bonuses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatKey;

    #[test]
    fn test_effect_pushes_changes() {
        let effect = ActiveEffect::new("bless", "Blessing")
            .with_change("system.stats.luck.bonus", 1)
            .with_change("system.speed.bonus", "5");
        let mut acc = BonusAccumulator::new();
        effect.apply(&mut acc);
        assert_eq!(acc.stat(StatKey::Luck), &[Bonus::from(1)]);
        assert_eq!(acc.speed, vec![Bonus::from("5")]);
    }

    #[test]
    fn test_disabled_effect_does_nothing() {
        let mut effect = ActiveEffect::new("x", "X").with_change("system.armorBonus", 3);
        effect.disabled = true;
        let mut acc = BonusAccumulator::new();
        effect.apply(&mut acc);
        assert!(acc.armor.is_empty());
    }

    #[test]
    fn test_unknown_key_skipped() {
        let effect = ActiveEffect::new("x", "X")
            .with_change("system.stats.charm.bonus", 3)
            .with_change("system.armorBonus", 1);
        let mut acc = BonusAccumulator::new();
        effect.apply(&mut acc);
        assert_eq!(acc.armor.len(), 1);
        assert!(acc.stats.is_empty());
    }

    #[test]
    fn test_spellcaster_override() {
        let effect =
            ActiveEffect::new("x", "Touched").with_override("system.attributes.isSpellcaster", "true");
        let mut acc = BonusAccumulator::new();
        effect.apply(&mut acc);
        assert_eq!(acc.spellcaster_override, Some(Bonus::from("true")));
    }

    #[test]
    fn test_priority() {
        assert_eq!(ActiveEffect::new("a", "A").priority(), 200);
    }
}
