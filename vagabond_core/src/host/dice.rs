//! RngDice - Seedable dice roller for the in-memory host

use super::DiceRoller;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Local dice backed by a seedable RNG
pub struct RngDice {
    rng: Mutex<StdRng>,
}

impl RngDice {
    pub fn new() -> Self {
        RngDice { rng: Mutex::new(StdRng::from_entropy()) }
    }

    pub fn seeded(seed: u64) -> Self {
        RngDice { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Default for RngDice {
    fn default() -> Self {
        RngDice::new()
    }
}

#[async_trait]
impl DiceRoller for RngDice {
    async fn roll(&self, faces: u32) -> u32 {
        let faces = faces.max(1);
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(1..=faces),
            Err(poisoned) => poisoned.into_inner().gen_range(1..=faces),
        }
    }
}
