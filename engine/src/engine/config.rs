// engine/src/engine/config.rs
#![forbid(unsafe_code)]

use std::time::Duration;

use crate::engine::combo::Catalog;
use crate::engine::freeze::FreezeSpec;

/// Tunable session parameters.
///
/// Out-of-range values never error: `normalized()` clamps them silently, and
/// the deck generator clamps the combination count and raises the total on
/// its own. A config fresh from user input is therefore always playable.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub catalog: Catalog,
    /// Distinct combinations drawn from the catalog cross-product.
    pub combination_count: usize,
    /// Same-combination pieces that clear a slot.
    pub match_count: usize,
    /// Requested population size; raised to `combination_count * match_count`
    /// and rounded up to a multiple of `combination_count` by the generator.
    pub total_pieces: usize,
    /// Holding slots in the bar.
    pub slot_count: usize,
    /// Pieces released per burst.
    pub burst_size: usize,
    /// Delay between bursts (and before the completion signal).
    pub burst_interval: Duration,
    /// Board spawn locations the scheduler cycles through.
    pub spawn_points: usize,
    pub freeze: FreezeSpec,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            catalog: Catalog::new(3, 4, 3),
            combination_count: 8,
            match_count: 3,
            total_pieces: 48,
            slot_count: 7,
            burst_size: 5,
            burst_interval: Duration::from_millis(500),
            spawn_points: 6,
            freeze: FreezeSpec::none(),
        }
    }
}

impl GameConfig {
    /// Clamp every structural parameter into its sane range. Combination
    /// count and total are left for the deck generator, which owns those
    /// rules.
    pub fn normalized(mut self) -> Self {
        self.catalog.shapes = self.catalog.shapes.clamp(1, 256);
        self.catalog.colors = self.catalog.colors.clamp(1, 256);
        self.catalog.animals = self.catalog.animals.clamp(1, 256);
        self.match_count = self.match_count.max(1);
        self.slot_count = self.slot_count.max(1);
        self.burst_size = self.burst_size.max(1);
        self.spawn_points = self.spawn_points.max(1);
        self
    }
}
