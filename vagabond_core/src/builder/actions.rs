//! User actions: navigation, selections, stat assignment and trays

use super::{
    BuilderError, BuilderStep, CharacterBuilder, ClassSummary, Economy, GearEntry, Selected,
    StartingPackSummary,
};
use crate::host::Notice;
use crate::types::{SkillKey, StatKey, WeaponSkillKey};

impl CharacterBuilder {
    // === Navigation ===

    pub fn next(&mut self) -> Result<BuilderStep, BuilderError> {
        let result = self.session.next();
        self.check(result)
    }

    pub fn prev(&mut self) -> Result<BuilderStep, BuilderError> {
        let result = self.session.prev();
        self.check(result)
    }

    pub fn goto(&mut self, step: BuilderStep) -> Result<BuilderStep, BuilderError> {
        let result = self.session.goto(step);
        self.check(result)
    }

    pub fn set_preview(&mut self, uuid: &str) {
        self.session.set_preview(uuid);
    }

    // === Single selections ===

    pub async fn select_ancestry(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let result = self.try_select_ancestry(uuid).await;
        self.check(result)
    }

    pub(super) async fn try_select_ancestry(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let item = self.resolve_kind(uuid, "ancestry").await?;
        tracing::debug!(uuid, name = %item.name, "selected ancestry");
        self.session.selection.ancestry = Some(Selected { uuid: uuid.to_string(), name: item.name });
        self.session.set_preview(uuid);
        Ok(())
    }

    /// Choosing a different class clears spells and trained skills
    pub async fn select_class(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let result = self.try_select_class(uuid).await;
        self.check(result)
    }

    pub(super) async fn try_select_class(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let item = self.resolve_kind(uuid, "class").await?;
        let class = item.as_class().ok_or_else(|| BuilderError::NotFound(uuid.to_string()))?;
        let summary = ClassSummary::new(uuid, item.name.clone(), class);
        tracing::debug!(uuid, spell_cap = summary.spell_cap, "selected class");
        self.session.set_class(summary);
        self.session.set_preview(uuid);
        Ok(())
    }

    pub async fn select_starting_pack(&mut self, uuid: &str) -> Result<Economy, BuilderError> {
        let result = self.try_select_starting_pack(uuid).await;
        self.check(result)
    }

    pub(super) async fn try_select_starting_pack(
        &mut self,
        uuid: &str,
    ) -> Result<Economy, BuilderError> {
        let item = self.resolve_kind(uuid, "starter_pack").await?;
        let pack = item
            .as_starter_pack()
            .ok_or_else(|| BuilderError::NotFound(uuid.to_string()))?;
        self.session.selection.starting_pack =
            Some(StartingPackSummary::new(uuid, item.name.clone(), pack));
        self.session.set_preview(uuid);
        Ok(self.economy())
    }

    pub fn clear_starting_pack(&mut self) {
        if let Some(pack) = self.session.selection.starting_pack.take() {
            self.session.clear_preview_if(&pack.uuid);
        }
    }

    // === Stats ===

    /// Start assignment from array `id` (1-12)
    pub fn select_array(&mut self, id: u8) -> Result<(), BuilderError> {
        let result = match self.rules.stat_array(id) {
            Some(array) => {
                self.session.selection.stats.select_array(array);
                Ok(())
            }
            None => Err(BuilderError::UnknownArray(id)),
        };
        self.check(result)
    }

    pub fn pick_up(&mut self, pool_index: usize) -> Result<i32, BuilderError> {
        let result = self.session.selection.stats.pick_up(pool_index);
        self.check(result)
    }

    pub fn place(&mut self, stat: StatKey) -> Result<(), BuilderError> {
        let result = self.session.selection.stats.place(stat);
        self.check(result)
    }

    /// Drag-and-drop path: move `value` from `pool_index` straight onto `stat`
    pub fn drop_value(
        &mut self,
        stat: StatKey,
        value: i32,
        pool_index: usize,
    ) -> Result<(), BuilderError> {
        let result = self.session.selection.stats.assign(stat, value, pool_index);
        self.check(result)
    }

    pub fn reset_stats(&mut self) {
        self.session.selection.stats.reset();
    }

    pub fn auto_assign_stats(&mut self) -> Result<(), BuilderError> {
        let result = match self.session.selection.stats.array_id() {
            Some(_) => {
                let order = self.rules.assignment_order();
                self.session.selection.stats.auto_assign(order);
                Ok(())
            }
            None => Err(BuilderError::StatsIncomplete),
        };
        self.check(result)
    }

    // === Skills ===

    /// Mark a skill or weapon skill as trained by name
    pub fn train_skill(&mut self, name: &str) -> Result<(), BuilderError> {
        let result = self.try_train_skill(name);
        self.check(result)
    }

    fn try_train_skill(&mut self, name: &str) -> Result<(), BuilderError> {
        if self.session.selection.class.is_none() {
            return Err(BuilderError::MissingClass);
        }
        if name.parse::<SkillKey>().is_err() && name.parse::<WeaponSkillKey>().is_err() {
            return Err(BuilderError::NotFound(name.to_string()));
        }
        if self.session.all_trained_skills().iter().any(|s| s == name) {
            return Err(BuilderError::DuplicateEntry(name.to_string()));
        }
        self.session.selection.trained_skills.insert(name.to_string());
        Ok(())
    }

    pub fn untrain_skill(&mut self, name: &str) -> Result<(), BuilderError> {
        let result = if self.session.selection.trained_skills.remove(name) {
            Ok(())
        } else {
            Err(BuilderError::NotInTray(name.to_string()))
        };
        self.check(result)
    }

    // === Trays ===

    pub async fn add_perk(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let resolved = self.resolve_kind(uuid, "perk").await;
        let result = resolved.and_then(|_| self.session.add_perk(uuid));
        self.check(result)
    }

    pub fn remove_perk(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let result = self.session.remove_perk(uuid);
        self.check(result)
    }

    pub async fn add_spell(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let resolved = self.resolve_kind(uuid, "spell").await;
        let result = resolved.and_then(|_| self.session.add_spell(uuid));
        self.check(result)
    }

    pub fn remove_spell(&mut self, uuid: &str) -> Result<(), BuilderError> {
        let result = self.session.remove_spell(uuid);
        self.check(result)
    }

    /// Over-budget purchases go through with a warning
    pub async fn add_gear(&mut self, uuid: &str) -> Result<Economy, BuilderError> {
        let result = self.try_add_gear(uuid).await;
        let economy = self.check(result)?;
        if economy.is_over {
            tracing::warn!(uuid, remaining = economy.remaining, "gear exceeds starting budget");
            let message = self.ports.localizer.localize("builder.warn.over_budget");
            self.ports.notifier.notify(Notice::warn(message));
        }
        Ok(economy)
    }

    async fn try_add_gear(&mut self, uuid: &str) -> Result<Economy, BuilderError> {
        let item = self.resolve_kind(uuid, "equipment").await?;
        let entry = GearEntry {
            uuid: uuid.to_string(),
            cost: item.cost_in_base_units(),
            name: item.name,
        };
        self.session.add_gear(entry)?;
        Ok(self.economy())
    }

    pub fn remove_gear(&mut self, uuid: &str) -> Result<Economy, BuilderError> {
        let result = self.session.remove_gear(uuid).map(|_| self.economy());
        self.check(result)
    }

    pub fn economy(&self) -> Economy {
        self.session.economy(self.rules.builder.default_budget)
    }
}
