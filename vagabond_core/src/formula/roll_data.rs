//! RollData - Flattened, immutable attribute snapshot for formula references

use std::collections::BTreeMap;

/// A flattened snapshot of character attributes keyed by dotted path
///
/// Formulas reference entries as `@path.to.attr`. The snapshot is built once
/// per derivation phase and never mutated while formulas are evaluated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollData {
    values: BTreeMap<String, f64>,
}

impl RollData {
    pub fn new() -> Self {
        RollData::default()
    }

    /// Builder-style insert, used when assembling a snapshot
    pub fn with(mut self, path: impl Into<String>, value: f64) -> Self {
        self.insert(path, value);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, value: f64) {
        self.values.insert(path.into(), value);
    }

    /// Look up a path. A leading `@` is ignored.
    pub fn get(&self, path: &str) -> Option<f64> {
        let path = path.strip_prefix('@').unwrap_or(path);
        self.values.get(path).copied()
    }
}
