//! StatSource - Trait and implementations for bonus providers

mod effect;
mod item;

pub use effect::{ActiveEffect, ChangeMode, EffectChange};
pub use item::ItemSource;

use crate::derived::BonusAccumulator;

/// Trait for anything that contributes bonuses to a derivation pass
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Default priority is 0.
    /// Suggested priorities:
    /// - Ancestry: -100
    /// - Class: -50
    /// - Other owned items: 0
    /// - Character effects: 200
    fn priority(&self) -> i32 {
        0
    }

    /// Push this source's contributions into the accumulator
    fn apply(&self, bonuses: &mut BonusAccumulator);
}

/// Apply sources in priority order (stable for equal priorities)
pub fn apply_sources(sources: &mut [&dyn StatSource], bonuses: &mut BonusAccumulator) {
    sources.sort_by_key(|s| s.priority());
    for source in sources.iter() {
        source.apply(bonuses);
    }
}
