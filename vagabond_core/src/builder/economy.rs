//! Economy - Gear spend against the starting-pack budget

use super::BuilderSession;
use serde::Serialize;

/// Gear budget against spend, both in silver. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Economy {
    pub budget: f64,
    pub spend: f64,
    pub remaining: f64,
    pub is_over: bool,
}

impl Economy {
    pub fn new(budget: f64, spend: f64) -> Self {
        let remaining = budget - spend;
        Economy { budget, spend, remaining, is_over: remaining < 0.0 }
    }
}

impl BuilderSession {
    /// Budget from the starting pack (or `default_budget`) against gear
    /// not already supplied by that pack
    pub fn economy(&self, default_budget: f64) -> Economy {
        let pack = self.selection.starting_pack.as_ref();
        let budget = pack.map(|p| p.budget).unwrap_or(default_budget);
        let spend = self
            .selection
            .gear
            .iter()
            .filter(|g| !pack.is_some_and(|p| p.contents.contains(&g.uuid)))
            .map(|g| g.cost)
            .sum();
        Economy::new(budget, spend)
    }
}
