//! BuilderSession - In-memory wizard state, not persisted until finish

use super::{BuilderError, BuilderStep, StatAssignment};
use crate::item::{ClassData, SkillChoice, StarterPackData};
use crate::types::Currency;
use serde::Serialize;
use std::collections::BTreeSet;

/// A selected library document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selected {
    pub uuid: String,
    pub name: String,
}

/// What the builder needs to know about the chosen class without
/// resolving it again
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub uuid: String,
    pub name: String,
    pub is_spellcaster: bool,
    /// Level-1 spell allotment
    pub spell_cap: u32,
    /// Perk uuids granted by level-1 features
    pub auto_perks: Vec<String>,
    pub guaranteed_skills: Vec<String>,
    pub skill_choices: Vec<SkillChoice>,
}

impl ClassSummary {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, class: &ClassData) -> Self {
        ClassSummary {
            uuid: uuid.into(),
            name: name.into(),
            is_spellcaster: class.is_spellcaster,
            spell_cap: class.spells_at(1),
            auto_perks: class.granted_perks(1),
            guaranteed_skills: class.guaranteed_skills.clone(),
            skill_choices: class.skill_choices.clone(),
        }
    }
}

/// The chosen starting pack and the budget it grants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartingPackSummary {
    pub uuid: String,
    pub name: String,
    pub currency: Currency,
    /// Pack currency in silver
    pub budget: f64,
    /// Item uuids the pack already provides
    pub contents: Vec<String>,
}

impl StartingPackSummary {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, pack: &StarterPackData) -> Self {
        StartingPackSummary {
            uuid: uuid.into(),
            name: name.into(),
            currency: pack.currency,
            budget: pack.currency.to_base_units(),
            contents: pack.items.iter().map(|e| e.uuid.clone()).collect(),
        }
    }
}

/// A gear tray entry with its cost in silver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GearEntry {
    pub uuid: String,
    pub name: String,
    pub cost: f64,
}

/// Everything chosen so far
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub ancestry: Option<Selected>,
    pub class: Option<ClassSummary>,
    pub stats: StatAssignment,
    /// Manually chosen skill names
    pub trained_skills: BTreeSet<String>,
    /// Manually added perk uuids
    pub perks: Vec<String>,
    pub spells: Vec<String>,
    pub starting_pack: Option<StartingPackSummary>,
    pub gear: Vec<GearEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuilderSession {
    pub step: BuilderStep,
    pub selection: Selection,
    /// Last clicked document, for detail display
    pub preview: Option<String>,
}

impl BuilderSession {
    pub fn new() -> Self {
        BuilderSession::default()
    }

    /// Whether the gating rule lets the wizard show `step`
    pub fn is_reachable(&self, step: BuilderStep) -> bool {
        let index = step.index();
        let selection = &self.selection;
        (index < 1 || selection.ancestry.is_some())
            && (index < 2 || selection.class.is_some())
            && (index < 3 || selection.stats.is_complete())
    }

    /// Only the stats step has a real completion test
    pub fn is_step_complete(&self, step: BuilderStep) -> bool {
        match step {
            BuilderStep::Stats => self.selection.stats.is_complete(),
            _ => true,
        }
    }

    pub fn reachable_steps(&self) -> Vec<BuilderStep> {
        BuilderStep::all()
            .iter()
            .copied()
            .filter(|s| self.is_reachable(*s))
            .collect()
    }

    pub fn next(&mut self) -> Result<BuilderStep, BuilderError> {
        if !self.is_step_complete(self.step) {
            return Err(BuilderError::StepIncomplete(self.step));
        }
        let next = self.step.next().ok_or(BuilderError::StepLocked(self.step))?;
        if !self.is_reachable(next) {
            return Err(BuilderError::StepLocked(next));
        }
        self.step = next;
        self.preview = None;
        Ok(next)
    }

    pub fn prev(&mut self) -> Result<BuilderStep, BuilderError> {
        let prev = self.step.prev().ok_or(BuilderError::StepLocked(self.step))?;
        self.step = prev;
        self.preview = None;
        Ok(prev)
    }

    pub fn goto(&mut self, step: BuilderStep) -> Result<BuilderStep, BuilderError> {
        if !self.is_reachable(step) {
            return Err(BuilderError::StepLocked(step));
        }
        self.step = step;
        self.preview = None;
        Ok(step)
    }

    /// Replace the class. Spells and trained skills depend on it and are cleared.
    pub fn set_class(&mut self, class: ClassSummary) {
        self.selection.spells.clear();
        self.selection.trained_skills.clear();
        self.selection.class = Some(class);
    }

    pub fn set_preview(&mut self, uuid: impl Into<String>) {
        self.preview = Some(uuid.into());
    }

    pub fn clear_preview_if(&mut self, uuid: &str) {
        if self.preview.as_deref() == Some(uuid) {
            self.preview = None;
        }
    }

    /// Class-granted perk uuids
    pub fn auto_perks(&self) -> &[String] {
        self.selection
            .class
            .as_ref()
            .map(|c| c.auto_perks.as_slice())
            .unwrap_or(&[])
    }

    /// Auto-granted then manual perks, deduplicated, first occurrence kept
    pub fn all_perks(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.auto_perks()
            .iter()
            .chain(self.selection.perks.iter())
            .filter(|uuid| seen.insert(uuid.as_str()))
            .cloned()
            .collect()
    }

    pub fn spell_cap(&self) -> u32 {
        self.selection.class.as_ref().map(|c| c.spell_cap).unwrap_or(0)
    }

    /// Class-guaranteed then manual skills, deduplicated
    pub fn all_trained_skills(&self) -> Vec<String> {
        let guaranteed = self
            .selection
            .class
            .iter()
            .flat_map(|c| c.guaranteed_skills.iter());
        let mut seen = BTreeSet::new();
        guaranteed
            .chain(self.selection.trained_skills.iter())
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatArray;
    use crate::types::StatKey;

    fn class(cap: u32, perks: &[&str]) -> ClassSummary {
        ClassSummary {
            uuid: "class".into(),
            name: "Class".into(),
            is_spellcaster: cap > 0,
            spell_cap: cap,
            auto_perks: perks.iter().map(|p| p.to_string()).collect(),
            guaranteed_skills: vec!["brawl".into()],
            skill_choices: Vec::new(),
        }
    }

    fn completed_stats() -> StatAssignment {
        let mut stats = StatAssignment::new();
        stats.select_array(&StatArray { id: 1, values: [5, 5, 5, 4, 4, 3] });
        stats.auto_assign(StatKey::all());
        stats
    }

    #[test]
    fn test_gating() {
        let mut session = BuilderSession::new();
        assert_eq!(session.reachable_steps(), vec![BuilderStep::Ancestry]);

        session.selection.ancestry = Some(Selected { uuid: "a".into(), name: "A".into() });
        assert!(session.is_reachable(BuilderStep::Class));
        assert!(!session.is_reachable(BuilderStep::Stats));

        session.set_class(class(0, &[]));
        assert!(session.is_reachable(BuilderStep::Stats));
        assert!(!session.is_reachable(BuilderStep::Perks));

        session.selection.stats = completed_stats();
        assert_eq!(session.reachable_steps().len(), 7);
    }

    #[test]
    fn test_next_refuses_incomplete_stats() {
        let mut session = BuilderSession::new();
        assert_eq!(session.next(), Err(BuilderError::StepLocked(BuilderStep::Class)));

        session.selection.ancestry = Some(Selected { uuid: "a".into(), name: "A".into() });
        session.set_class(class(0, &[]));
        session.goto(BuilderStep::Stats).unwrap();
        assert_eq!(session.next(), Err(BuilderError::StepIncomplete(BuilderStep::Stats)));

        session.selection.stats = completed_stats();
        session.set_preview("x");
        assert_eq!(session.next(), Ok(BuilderStep::Perks));
        assert_eq!(session.preview, None);
    }

    #[test]
    fn test_prev_and_goto() {
        let mut session = BuilderSession::new();
        assert!(session.prev().is_err());
        assert_eq!(session.goto(BuilderStep::Gear), Err(BuilderError::StepLocked(BuilderStep::Gear)));
        assert_eq!(session.goto(BuilderStep::Ancestry), Ok(BuilderStep::Ancestry));
    }

    #[test]
    fn test_set_class_clears_dependent_choices() {
        let mut session = BuilderSession::new();
        session.selection.spells.push("burn".into());
        session.selection.trained_skills.insert("sneak".into());
        session.selection.perks.push("tough".into());
        session.set_class(class(2, &[]));
        assert!(session.selection.spells.is_empty());
        assert!(session.selection.trained_skills.is_empty());
        assert_eq!(session.selection.perks, vec!["tough".to_string()]);
    }

    #[test]
    fn test_perk_union_deduplicated() {
        let mut session = BuilderSession::new();
        session.set_class(class(0, &["tough", "keen"]));
        session.selection.perks = vec!["keen".into(), "lucky".into()];
        assert_eq!(session.all_perks(), vec!["tough", "keen", "lucky"]);
    }

    #[test]
    fn test_trained_skill_union() {
        let mut session = BuilderSession::new();
        session.set_class(class(0, &[]));
        session.selection.trained_skills.insert("brawl".into());
        session.selection.trained_skills.insert("sneak".into());
        assert_eq!(session.all_trained_skills(), vec!["brawl", "sneak"]);
    }
}
