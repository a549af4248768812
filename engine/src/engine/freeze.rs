// engine/src/engine/freeze.rs
#![forbid(unsafe_code)]

/*
Freeze side effect (temporarily unclickable pieces)

Key principle
-------------
Spawn-stream semantics must be identical whether or not freezing is enabled.
The effect therefore draws from its own RNG stream derived from the episode
seed + `seed_salt`, and it only ever touches the pieces' `active` flag.

Timeline
--------
- Arm when spawning completes: sample `freeze_count` pieces with replacement
  (duplicates collapse, so fewer unique pieces may freeze) and deactivate
  them.
- Gray scalar: stays 0 for `fade_delay`, then rises linearly to 1 over
  `fade_duration`. The scalar is a renderer hint; what it shades is not the
  core's business.
- Thaw when the removed-piece count reaches `unfreeze_after_removed`:
  reactivate every frozen piece and fade the scalar back to 0 over
  `fade_duration`. The threshold is only consulted once armed.
*/

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::engine::board::{Board, PieceId};

#[derive(Clone, Copy, Debug)]
pub struct FreezeSpec {
    /// Sample draws to freeze when spawning completes (0 disables the
    /// effect).
    pub freeze_count: usize,
    /// Removed-piece count at which frozen pieces thaw.
    pub unfreeze_after_removed: usize,
    /// Pause before the gray fade-in starts.
    pub fade_delay: Duration,
    /// Length of the fade, both in and out.
    pub fade_duration: Duration,
    /// Salt mixed into the episode seed to create an independent sampling
    /// stream.
    pub seed_salt: u64,
}

impl FreezeSpec {
    pub const DEFAULT_SEED_SALT: u64 = 0x1CED_BA11_5EED_FACE;

    pub fn none() -> Self {
        Self {
            freeze_count: 0,
            unfreeze_after_removed: 0,
            fade_delay: Duration::from_secs(5),
            fade_duration: Duration::from_millis(1500),
            seed_salt: Self::DEFAULT_SEED_SALT,
        }
    }
}

impl Default for FreezeSpec {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Clone, Copy, Debug)]
enum Fade {
    Idle,
    /// Frozen, gray still 0; the fade-in starts at `at`.
    Waiting { at: Duration },
    FadingIn { from: Duration },
    Gray,
    FadingOut { from: Duration, start: f32 },
    Done,
}

/// Runtime state of the freeze effect. Owned by the game, advanced by tick.
#[derive(Clone, Debug)]
pub struct FreezeEffect {
    spec: FreezeSpec,
    rng: StdRng,
    frozen: Vec<PieceId>,
    armed: bool,
    fade: Fade,
    gray: f32,
}

impl FreezeEffect {
    pub fn new(spec: FreezeSpec, episode_seed: u64) -> Self {
        Self {
            spec,
            rng: StdRng::seed_from_u64(episode_seed ^ spec.seed_salt),
            frozen: Vec::new(),
            armed: false,
            fade: Fade::Idle,
            gray: 0.0,
        }
    }

    /// Grayscale hint for the host renderer, 0 (normal) to 1 (fully gray).
    pub fn gray_amount(&self) -> f32 {
        self.gray
    }

    /// Currently frozen piece ids, unique, in freeze order.
    pub fn frozen(&self) -> &[PieceId] {
        &self.frozen
    }

    /// True between sampling and thaw; the thaw threshold is live.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Spawning finished: sample and deactivate the frozen set.
    pub(crate) fn on_spawning_complete(&mut self, board: &mut Board, now: Duration) {
        if self.spec.freeze_count == 0 || board.is_empty() {
            return;
        }
        for id in board.sample_with_replacement(self.spec.freeze_count, &mut self.rng) {
            if board.set_active(id, false) && !self.frozen.contains(&id) {
                self.frozen.push(id);
            }
        }
        self.armed = !self.frozen.is_empty();
        if self.armed {
            self.fade = Fade::Waiting {
                at: now + self.spec.fade_delay,
            };
        }
    }

    /// Thaw check plus fade advance. `removed` is the count of pieces that
    /// left the board through completed stacks.
    pub(crate) fn tick(&mut self, board: &mut Board, now: Duration, removed: usize) {
        if self.armed && removed >= self.spec.unfreeze_after_removed {
            for &id in &self.frozen {
                board.set_active(id, true);
            }
            self.frozen.clear();
            self.armed = false;
            self.fade = Fade::FadingOut {
                from: now,
                start: self.gray,
            };
        }
        self.advance_fade(now);
    }

    fn advance_fade(&mut self, now: Duration) {
        match self.fade {
            Fade::Idle | Fade::Gray | Fade::Done => {}
            Fade::Waiting { at } => {
                if now >= at {
                    self.fade = Fade::FadingIn { from: at };
                    self.advance_fade(now);
                }
            }
            Fade::FadingIn { from } => {
                let t = progress(from, now, self.spec.fade_duration);
                self.gray = t;
                if t >= 1.0 {
                    self.fade = Fade::Gray;
                }
            }
            Fade::FadingOut { from, start } => {
                let t = progress(from, now, self.spec.fade_duration);
                self.gray = start * (1.0 - t);
                if t >= 1.0 {
                    self.gray = 0.0;
                    self.fade = Fade::Done;
                }
            }
        }
    }
}

/// Linear progress of `now` through `[from, from + dur]`, clamped to [0, 1].
fn progress(from: Duration, now: Duration, dur: Duration) -> f32 {
    if now <= from {
        return if dur.is_zero() { 1.0 } else { 0.0 };
    }
    if dur.is_zero() {
        return 1.0;
    }
    ((now - from).as_secs_f32() / dur.as_secs_f32()).min(1.0)
}
