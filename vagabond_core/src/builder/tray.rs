//! Tray mutations for perks, spells and gear

use super::{BuilderError, BuilderSession, GearEntry};

impl BuilderSession {
    pub fn has_perk(&self, uuid: &str) -> bool {
        self.auto_perks().iter().any(|p| p == uuid) || self.selection.perks.iter().any(|p| p == uuid)
    }

    /// Class-granted perks count as present
    pub fn add_perk(&mut self, uuid: &str) -> Result<(), BuilderError> {
        if self.has_perk(uuid) {
            return Err(BuilderError::DuplicateEntry(uuid.to_string()));
        }
        self.selection.perks.push(uuid.to_string());
        Ok(())
    }

    pub fn remove_perk(&mut self, uuid: &str) -> Result<(), BuilderError> {
        if self.auto_perks().iter().any(|p| p == uuid) {
            return Err(BuilderError::ClassPerkLocked(uuid.to_string()));
        }
        remove_from(&mut self.selection.perks, uuid)?;
        self.clear_preview_if(uuid);
        Ok(())
    }

    /// Refused without a class, on duplicates, and at the spell cap
    pub fn add_spell(&mut self, uuid: &str) -> Result<(), BuilderError> {
        if self.selection.class.is_none() {
            return Err(BuilderError::MissingClass);
        }
        if self.selection.spells.iter().any(|s| s == uuid) {
            return Err(BuilderError::DuplicateEntry(uuid.to_string()));
        }
        let cap = self.spell_cap();
        if self.selection.spells.len() as u32 >= cap {
            return Err(BuilderError::SpellCapReached(cap));
        }
        self.selection.spells.push(uuid.to_string());
        Ok(())
    }

    pub fn remove_spell(&mut self, uuid: &str) -> Result<(), BuilderError> {
        remove_from(&mut self.selection.spells, uuid)?;
        self.clear_preview_if(uuid);
        Ok(())
    }

    /// Adds even when over budget; the caller decides whether to warn
    pub fn add_gear(&mut self, entry: GearEntry) -> Result<(), BuilderError> {
        if self.selection.gear.iter().any(|g| g.uuid == entry.uuid) {
            return Err(BuilderError::DuplicateEntry(entry.uuid));
        }
        self.selection.gear.push(entry);
        Ok(())
    }

    pub fn remove_gear(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let index = self
            .selection
            .gear
            .iter()
            .position(|g| g.uuid == uuid)
            .ok_or_else(|| BuilderError::NotInTray(uuid.to_string()))?;
        self.selection.gear.remove(index);
        self.clear_preview_if(uuid);
        Ok(())
    }
}

fn remove_from(tray: &mut Vec<String>, uuid: &str) -> Result<(), BuilderError> {
    let index = tray
        .iter()
        .position(|entry| entry == uuid)
        .ok_or_else(|| BuilderError::NotInTray(uuid.to_string()))?;
    tray.remove(index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ClassSummary;

    fn session_with_class(cap: u32) -> BuilderSession {
        let mut session = BuilderSession::new();
        session.set_class(ClassSummary {
            uuid: "wizard".into(),
            name: "Wizard".into(),
            is_spellcaster: true,
            spell_cap: cap,
            auto_perks: vec!["arcane-sight".into()],
            guaranteed_skills: Vec::new(),
            skill_choices: Vec::new(),
        });
        session
    }

    #[test]
    fn test_spell_cap_enforced() {
        let mut session = session_with_class(4);
        for uuid in ["a", "b", "c", "d"] {
            session.add_spell(uuid).unwrap();
        }
        assert_eq!(session.add_spell("e"), Err(BuilderError::SpellCapReached(4)));
        assert_eq!(session.selection.spells.len(), 4);
    }

    #[test]
    fn test_spell_needs_class() {
        let mut session = BuilderSession::new();
        assert_eq!(session.add_spell("a"), Err(BuilderError::MissingClass));
    }

    #[test]
    fn test_duplicate_spell_rejected() {
        let mut session = session_with_class(4);
        session.add_spell("a").unwrap();
        assert!(matches!(session.add_spell("a"), Err(BuilderError::DuplicateEntry(_))));
    }

    #[test]
    fn test_class_perk_blocks_add_and_remove() {
        let mut session = session_with_class(0);
        assert!(matches!(session.add_perk("arcane-sight"), Err(BuilderError::DuplicateEntry(_))));
        assert!(matches!(session.remove_perk("arcane-sight"), Err(BuilderError::ClassPerkLocked(_))));
        session.add_perk("tough").unwrap();
        session.remove_perk("tough").unwrap();
        assert!(matches!(session.remove_perk("tough"), Err(BuilderError::NotInTray(_))));
    }

    #[test]
    fn test_remove_clears_matching_preview() {
        let mut session = session_with_class(2);
        session.add_spell("burn").unwrap();
        session.add_spell("frost").unwrap();
        session.set_preview("burn");
        session.remove_spell("frost").unwrap();
        assert_eq!(session.preview.as_deref(), Some("burn"));
        session.remove_spell("burn").unwrap();
        assert_eq!(session.preview, None);
    }

    #[test]
    fn test_gear_tray() {
        let mut session = BuilderSession::new();
        let rope = GearEntry { uuid: "rope".into(), name: "Rope".into(), cost: 5.0 };
        session.add_gear(rope.clone()).unwrap();
        assert!(session.add_gear(rope).is_err());
        session.remove_gear("rope").unwrap();
        assert!(session.selection.gear.is_empty());
    }
}
