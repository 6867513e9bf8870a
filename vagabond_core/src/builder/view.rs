//! Read-only projections of the session for a UI shell

use super::{BuilderError, BuilderStep, CharacterBuilder, Economy, PickedUp};
use crate::character::Character;
use crate::types::StatKey;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step: BuilderStep,
    pub label: String,
    pub reachable: bool,
    pub complete: bool,
    pub current: bool,
}

/// Everything a shell needs to render the wizard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuilderView {
    pub step: BuilderStep,
    pub steps: Vec<StepView>,
    pub economy: Economy,
    pub array_id: Option<u8>,
    pub pool: Vec<i32>,
    pub assigned: BTreeMap<StatKey, i32>,
    pub picked_up: Option<PickedUp>,
    pub perks: Vec<String>,
    pub spells: Vec<String>,
    pub spell_cap: u32,
    pub trained_skills: Vec<String>,
    pub preview: Option<String>,
    pub can_finish: bool,
}

impl CharacterBuilder {
    pub fn view(&self) -> BuilderView {
        let session = &self.session;
        let stats = &session.selection.stats;
        let steps = BuilderStep::all()
            .iter()
            .map(|step| StepView {
                step: *step,
                label: self.ports.localizer.localize(step.i18n_key()),
                reachable: session.is_reachable(*step),
                complete: session.is_step_complete(*step),
                current: *step == session.step,
            })
            .collect();

        BuilderView {
            step: session.step,
            steps,
            economy: self.economy(),
            array_id: stats.array_id(),
            pool: stats.pool().to_vec(),
            assigned: stats.assigned().clone(),
            picked_up: stats.picked_up(),
            perks: session.all_perks(),
            spells: session.selection.spells.clone(),
            spell_cap: session.spell_cap(),
            trained_skills: session.all_trained_skills(),
            preview: session.preview.clone(),
            can_finish: self.validate_complete().is_ok(),
        }
    }

    /// Ancestry, class and a full stat assignment are all present
    pub(super) fn validate_complete(&self) -> Result<(), BuilderError> {
        let selection = &self.session.selection;
        if selection.ancestry.is_none() {
            return Err(BuilderError::MissingAncestry);
        }
        if selection.class.is_none() {
            return Err(BuilderError::MissingClass);
        }
        if !selection.stats.is_complete() {
            return Err(BuilderError::StatsIncomplete);
        }
        Ok(())
    }

    /// Materialize the current selection into a scratch character and run
    /// the derivation pass on it. Unresolvable references are left out.
    pub async fn preview_character(&self) -> Result<Character, BuilderError> {
        let materialized = self.materialize().await?;
        let mut character = Character::new("preview", "Preview");
        for (stat, value) in self.session.selection.stats.assigned() {
            character.system.set_stat(*stat, *value);
        }
        for name in &materialized.trained_skills {
            super::commit::mark_trained(&mut character, name);
        }
        character.items = materialized.items;
        character.prepare_derived_data(&self.rules);
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::testing::{builder, host};
    use crate::builder::BuilderStep;
    use crate::types::{SkillKey, StatKey};

    #[tokio::test]
    async fn test_view_of_empty_session() {
        let b = builder(host().await, 1);
        let view = b.view();
        assert_eq!(view.step, BuilderStep::Ancestry);
        assert_eq!(view.steps.len(), 7);
        assert_eq!(view.steps[0].label, "Ancestry");
        assert!(view.steps[0].current);
        assert!(!view.steps[1].reachable);
        assert_eq!(view.economy.budget, 300.0);
        assert!(!view.can_finish);
    }

    #[tokio::test]
    async fn test_preview_character_reflects_selection() {
        let mut b = builder(host().await, 1);
        b.select_ancestry("dwarf").await.unwrap();
        b.select_class("wizard").await.unwrap();
        b.select_array(1).unwrap();
        b.auto_assign_stats().unwrap();
        b.add_spell("burn").await.unwrap();

        let view = b.view();
        assert!(view.can_finish);
        assert_eq!(view.perks, vec!["arcane-sight"]);

        let preview = b.preview_character().await.unwrap();
        // Might 5 plus the ancestry's +1
        assert_eq!(preview.derived.stat_total(StatKey::Might), 6);
        assert!(preview.derived.is_spellcaster);
        assert_eq!(preview.derived.mana.max, 4);
        assert!(preview.system.skills[&SkillKey::Brawl].trained);
        assert!(preview.system.skills[&SkillKey::Survival].trained);
        assert_eq!(preview.spells().count(), 1);
    }
}
