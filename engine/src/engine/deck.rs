// engine/src/engine/deck.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::combo::Combo;
use crate::engine::config::GameConfig;

/// The spawn population for one session: the selected combinations and the
/// shuffled queue the scheduler consumes front-to-back.
#[derive(Clone, Debug)]
pub struct SpawnDeck {
    combos: Vec<Combo>,
    queue: Vec<Combo>,
    per_combo: usize,
}

impl SpawnDeck {
    /// Build the deck from the caller's RNG stream.
    ///
    /// `combination_count` is clamped into `[1, cross_size]`. The queue
    /// length is the smallest multiple of the clamped count that is at least
    /// `total_pieces` and at least `combination_count * match_count`, so
    /// every selected combination appears equally often and can complete at
    /// least one stack.
    pub fn generate(cfg: &GameConfig, rng: &mut StdRng) -> Self {
        let mut universe = cfg.catalog.cross_product();
        assert!(!universe.is_empty(), "catalog cross-product is empty");
        let k = cfg.combination_count.clamp(1, universe.len());

        // Uniform K-subset: full shuffle, keep the prefix.
        universe.shuffle(rng);
        universe.truncate(k);
        let combos = universe;

        let floor = k * cfg.match_count.max(1);
        let total = cfg.total_pieces.max(floor).div_ceil(k) * k;
        let per_combo = total / k;

        let mut queue = Vec::with_capacity(total);
        for &combo in &combos {
            for _ in 0..per_combo {
                queue.push(combo);
            }
        }
        queue.shuffle(rng);

        Self {
            combos,
            queue,
            per_combo,
        }
    }

    /// Selected combinations, in selection order.
    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }

    /// The shuffled spawn queue; immutable once generated.
    pub fn queue(&self) -> &[Combo] {
        &self.queue
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    pub fn per_combo(&self) -> usize {
        self.per_combo
    }
}
