//! Stat array assignment - pool of values dealt onto the six stats

use super::BuilderError;
use crate::config::StatArray;
use crate::types::StatKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// A pool value lifted for placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PickedUp {
    pub value: i32,
    pub pool_index: usize,
}

/// Assignment sub-state. Assigned slots plus the pool always hold exactly
/// the selected array's six values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatAssignment {
    array_id: Option<u8>,
    array: Vec<i32>,
    pool: Vec<i32>,
    slots: BTreeMap<StatKey, i32>,
    picked_up: Option<PickedUp>,
}

impl StatAssignment {
    pub fn new() -> Self {
        StatAssignment::default()
    }

    /// Start over with a fresh array: every slot unset, pool = the array
    pub fn select_array(&mut self, array: &StatArray) {
        self.array_id = Some(array.id);
        self.array = array.values.to_vec();
        self.reset();
    }

    /// Return every value to the pool, keeping the chosen array
    pub fn reset(&mut self) {
        self.pool = self.array.clone();
        self.slots.clear();
        self.picked_up = None;
    }

    pub fn array_id(&self) -> Option<u8> {
        self.array_id
    }

    pub fn pool(&self) -> &[i32] {
        &self.pool
    }

    pub fn picked_up(&self) -> Option<PickedUp> {
        self.picked_up
    }

    pub fn value(&self, stat: StatKey) -> Option<i32> {
        self.slots.get(&stat).copied()
    }

    pub fn assigned(&self) -> &BTreeMap<StatKey, i32> {
        &self.slots
    }

    /// All six stats hold a value
    pub fn is_complete(&self) -> bool {
        StatKey::all().iter().all(|k| self.slots.contains_key(k))
    }

    /// Lift the pool value at `index`, awaiting [`place`](Self::place)
    pub fn pick_up(&mut self, index: usize) -> Result<i32, BuilderError> {
        let value = *self
            .pool
            .get(index)
            .ok_or(BuilderError::PoolIndexOutOfRange(index))?;
        self.picked_up = Some(PickedUp { value, pool_index: index });
        Ok(value)
    }

    /// Drop the picked-up value onto `stat`
    pub fn place(&mut self, stat: StatKey) -> Result<(), BuilderError> {
        let picked = self.picked_up.ok_or(BuilderError::NothingPickedUp)?;
        self.assign(stat, picked.value, picked.pool_index)
    }

    /// Move `value` from the pool onto `stat`.
    ///
    /// Removes the entry at `pool_index`, or the first equal entry if that
    /// index is stale. Any value already on `stat` goes back to the pool.
    pub fn assign(
        &mut self,
        stat: StatKey,
        value: i32,
        pool_index: usize,
    ) -> Result<(), BuilderError> {
        let remove_at = match self.pool.get(pool_index) {
            Some(v) if *v == value => pool_index,
            _ => self
                .pool
                .iter()
                .position(|v| *v == value)
                .ok_or(BuilderError::ValueNotInPool(value))?,
        };
        self.pool.remove(remove_at);
        if let Some(previous) = self.slots.insert(stat, value) {
            self.pool.push(previous);
        }
        self.picked_up = None;
        Ok(())
    }

    /// Assign the array in `order`, largest value first
    pub fn auto_assign(&mut self, order: &[StatKey]) {
        self.reset();
        let mut values = std::mem::take(&mut self.pool);
        values.sort_unstable_by(|a, b| b.cmp(a));
        let mut values = values.into_iter();
        for stat in order {
            match values.next() {
                Some(value) => {
                    self.slots.insert(*stat, value);
                }
                None => break,
            }
        }
        self.pool = values.collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn array_one() -> StatArray {
        StatArray { id: 1, values: [5, 5, 5, 4, 4, 3] }
    }

    fn sorted(mut values: Vec<i32>) -> Vec<i32> {
        values.sort_unstable();
        values
    }

    fn multiset(assignment: &StatAssignment) -> Vec<i32> {
        let mut all: Vec<i32> = assignment.pool().to_vec();
        all.extend(assignment.assigned().values());
        sorted(all)
    }

    #[test]
    fn test_select_array_fills_pool() {
        let mut a = StatAssignment::new();
        a.select_array(&array_one());
        assert_eq!(a.array_id(), Some(1));
        assert_eq!(a.pool(), &[5, 5, 5, 4, 4, 3]);
        assert!(!a.is_complete());
    }

    #[test]
    fn test_assign_all_six() {
        let mut a = StatAssignment::new();
        a.select_array(&array_one());
        for stat in StatKey::all() {
            a.pick_up(0).unwrap();
            a.place(*stat).unwrap();
        }
        assert!(a.is_complete());
        assert!(a.pool().is_empty());
        assert_eq!(multiset(&a), vec![3, 4, 4, 5, 5, 5]);
    }

    #[test]
    fn test_reassign_returns_previous_value() {
        let mut a = StatAssignment::new();
        a.select_array(&array_one());
        a.assign(StatKey::Might, 3, 5).unwrap();
        a.assign(StatKey::Might, 5, 0).unwrap();
        assert_eq!(a.value(StatKey::Might), Some(5));
        assert_eq!(sorted(a.pool().to_vec()), vec![3, 4, 4, 5, 5]);
    }

    #[test]
    fn test_stale_index_falls_back_to_value() {
        let mut a = StatAssignment::new();
        a.select_array(&array_one());
        a.assign(StatKey::Luck, 3, 99).unwrap();
        assert_eq!(a.pool(), &[5, 5, 5, 4, 4]);
        a.assign(StatKey::Reason, 4, 0).unwrap();
        assert_eq!(a.pool(), &[5, 5, 5, 4]);
    }

    #[test]
    fn test_value_not_in_pool_rejected() {
        let mut a = StatAssignment::new();
        a.select_array(&array_one());
        assert_eq!(a.assign(StatKey::Might, 7, 0), Err(BuilderError::ValueNotInPool(7)));
        assert_eq!(multiset(&a), vec![3, 4, 4, 5, 5, 5]);
    }

    #[test]
    fn test_place_requires_pick() {
        let mut a = StatAssignment::new();
        a.select_array(&array_one());
        assert_eq!(a.place(StatKey::Might), Err(BuilderError::NothingPickedUp));
        assert_eq!(a.pick_up(6), Err(BuilderError::PoolIndexOutOfRange(6)));
        a.pick_up(2).unwrap();
        a.place(StatKey::Might).unwrap();
        assert_eq!(a.picked_up(), None);
    }

    #[test]
    fn test_reset_keeps_array() {
        let mut a = StatAssignment::new();
        a.select_array(&array_one());
        a.assign(StatKey::Might, 5, 0).unwrap();
        a.reset();
        assert_eq!(a.array_id(), Some(1));
        assert_eq!(a.pool(), &[5, 5, 5, 4, 4, 3]);
        assert!(a.assigned().is_empty());
    }

    #[test]
    fn test_auto_assign_descending() {
        let mut a = StatAssignment::new();
        a.select_array(&StatArray { id: 12, values: [7, 7, 3, 3, 2, 2] });
        a.auto_assign(StatKey::all());
        assert!(a.is_complete());
        assert!(a.pool().is_empty());
        assert_eq!(a.value(StatKey::Might), Some(7));
        assert_eq!(a.value(StatKey::Dexterity), Some(7));
        assert_eq!(a.value(StatKey::Luck), Some(2));
    }

    proptest! {
        #[test]
        fn prop_multiset_preserved(
            values in prop::array::uniform6(0i32..=12),
            ops in prop::collection::vec((0usize..8, 0usize..6, any::<bool>()), 0..40),
        ) {
            let array = StatArray { id: 3, values };
            let mut a = StatAssignment::new();
            a.select_array(&array);
            let expected = sorted(values.to_vec());

            for (index, stat, via_pick) in ops {
                let stat = StatKey::all()[stat];
                let _ = if via_pick {
                    a.pick_up(index).and_then(|_| a.place(stat))
                } else {
                    let value = a.pool().get(index).copied().unwrap_or(values[index % 6]);
                    a.assign(stat, value, index)
                };
                prop_assert_eq!(multiset(&a), expected.clone());
            }
        }
    }
}
