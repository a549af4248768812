// engine/src/policy/random.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::{Game, PieceId};

use super::base::Policy;

/// Uniform choice among the currently clickable pieces.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_piece(&mut self, g: &Game) -> Option<PieceId> {
        let ids = g.clickable_pieces();
        let &id = ids.choose(&mut self.rng)?;
        Some(id)
    }
}
