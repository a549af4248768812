// engine/src/engine/game.rs
#![forbid(unsafe_code)]

use std::time::Duration;

use rand::prelude::*;

use crate::engine::bar::{Bar, Delivery, GameStatus, SlotEntry};
use crate::engine::board::{Board, PieceId};
use crate::engine::combo::Combo;
use crate::engine::config::GameConfig;
use crate::engine::deck::SpawnDeck;
use crate::engine::events::{EventBus, GameEvent, GameListener};
use crate::engine::freeze::FreezeEffect;
use crate::engine::scheduler::SpawnScheduler;

/// Input gate verdict for a click.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClickOutcome {
    /// The click passed the gate; the flight driver takes over from here.
    Accepted { destination: usize },
    /// A delivery is in flight.
    BarLocked,
    /// The piece is frozen.
    PieceInactive,
    /// The session already ended.
    GameOver,
}

/// One session behind a single mutable entry point.
///
/// The host owns time: it advances the simulation with `tick(now)` and runs
/// piece flights itself, bracketing each with `lock_bar` / `deliver` /
/// `unlock_bar`. Everything observable goes out through the event bus.
pub struct Game {
    config: GameConfig,
    board: Board,
    bar: Bar,
    deck: SpawnDeck,
    scheduler: SpawnScheduler,
    freeze: FreezeEffect,
    bus: EventBus,
    clock: Duration,
}

impl Game {
    /// Build a session. The config is normalized first; the deck and the
    /// spawn-point order come from the seed, the freeze sampling from an
    /// independent salted stream of the same seed.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = config.normalized();
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = SpawnDeck::generate(&config, &mut rng);
        let scheduler = SpawnScheduler::new(
            deck.queue().to_vec(),
            config.spawn_points,
            config.burst_size,
            config.burst_interval,
            &mut rng,
        );
        let freeze = FreezeEffect::new(config.freeze, seed);
        Self {
            bar: Bar::new(config.slot_count, config.match_count),
            board: Board::new(),
            deck,
            scheduler,
            freeze,
            bus: EventBus::new(),
            clock: Duration::ZERO,
            config,
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn GameListener>) {
        self.bus.subscribe(listener);
    }

    // ------------------------------------------------------------------
    // Simulation clock
    // ------------------------------------------------------------------

    /// Advance to `now`: release due spawn bursts, update the freeze effect,
    /// then run the win check. A no-op once the session is terminal.
    pub fn tick(&mut self, now: Duration) {
        if self.bar.status().is_terminal() {
            return;
        }
        debug_assert!(now >= self.clock, "simulation clock went backwards");
        self.clock = now;

        let due = self.scheduler.poll(now);
        for order in &due.spawns {
            let piece = self.board.spawn(order.combo, order.point);
            self.bus.publish(&GameEvent::PieceSpawned {
                piece,
                combo: order.combo,
                point: order.point,
            });
        }
        if due.completed {
            self.bus.publish(&GameEvent::SpawningComplete);
            self.freeze.on_spawning_complete(&mut self.board, now);
        }

        let removed = self.removed();
        self.freeze.tick(&mut self.board, now, removed);

        if self.board.is_empty() && self.bar.mark_won() {
            self.bus.publish(&GameEvent::Won);
        }
    }

    // ------------------------------------------------------------------
    // Input gate and delivery
    // ------------------------------------------------------------------

    /// The input gate. Terminal sessions, a locked bar and frozen pieces all
    /// swallow the click; an accepted click fires `PieceClicked` and reports
    /// the destination slot. Clicking an id that never spawned or is already
    /// gone is a driver bug and panics.
    pub fn click(&mut self, piece: PieceId) -> ClickOutcome {
        if self.bar.status().is_terminal() {
            return ClickOutcome::GameOver;
        }
        let found = self
            .board
            .get(piece)
            .unwrap_or_else(|| panic!("clicked piece {piece} is not on the board"));
        if self.bar.is_locked() {
            return ClickOutcome::BarLocked;
        }
        if !found.active {
            return ClickOutcome::PieceInactive;
        }
        let combo = found.combo;
        let destination = self.bar.probe_slot(combo);
        self.bus.publish(&GameEvent::PieceClicked { piece, combo });
        ClickOutcome::Accepted { destination }
    }

    /// Probe passthrough: where the piece would land if delivered right now.
    /// Never fails for a live piece.
    pub fn query_destination(&self, piece: PieceId) -> usize {
        let found = self
            .board
            .get(piece)
            .unwrap_or_else(|| panic!("queried piece {piece} is not on the board"));
        self.bar.probe_slot(found.combo)
    }

    /// Commit a delivery once the (externally animated) flight lands.
    ///
    /// Contract: the piece is on the board, not already sitting in a slot,
    /// and the session is not terminal. Violations panic loudly; the silent
    /// rejections all live in the click gate.
    pub fn deliver(&mut self, piece: PieceId) -> Delivery {
        assert!(
            !self.bar.status().is_terminal(),
            "piece {piece} delivered after the session ended"
        );
        let found = self
            .board
            .get(piece)
            .unwrap_or_else(|| panic!("delivered piece {piece} is not on the board"));
        let combo = found.combo;
        assert!(!self.bar.holds(piece), "piece {piece} delivered twice");

        let outcome = self.bar.deliver(SlotEntry { piece, combo });
        match &outcome {
            Delivery::Stacked { slot } => {
                self.bus.publish(&GameEvent::PieceStacked {
                    piece,
                    slot: *slot,
                });
            }
            Delivery::Completed { slot, pieces } => {
                self.bus.publish(&GameEvent::PieceStacked {
                    piece,
                    slot: *slot,
                });
                for entry in pieces {
                    self.bus.publish(&GameEvent::SlotCompleted {
                        piece: entry.piece,
                        slot: *slot,
                    });
                    let gone = self.board.remove(entry.piece);
                    debug_assert!(gone.is_some(), "completed piece was not on the board");
                }
            }
            Delivery::Lost => {
                self.bus.publish(&GameEvent::Lost);
            }
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Flight lock
    // ------------------------------------------------------------------

    /// The flight driver locks the bar for the duration of a delivery. A
    /// completed stack releases the lock on its own.
    pub fn lock_bar(&mut self) {
        self.bar.lock();
    }

    pub fn unlock_bar(&mut self) {
        self.bar.unlock();
    }

    pub fn is_locked(&self) -> bool {
        self.bar.is_locked()
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn status(&self) -> GameStatus {
        self.bar.status()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn bar(&self) -> &Bar {
        &self.bar
    }

    pub fn freeze(&self) -> &FreezeEffect {
        &self.freeze
    }

    /// Last tick time.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// The selected combinations, in selection order.
    pub fn combos(&self) -> &[Combo] {
        self.deck.combos()
    }

    /// The full population size after raising and rounding.
    pub fn planned_total(&self) -> usize {
        self.deck.total()
    }

    pub fn per_combo(&self) -> usize {
        self.deck.per_combo()
    }

    pub fn spawned(&self) -> usize {
        self.scheduler.spawned()
    }

    pub fn queued(&self) -> usize {
        self.scheduler.remaining()
    }

    pub fn spawning_complete(&self) -> bool {
        self.scheduler.is_complete()
    }

    /// Pieces that left the board through completed stacks.
    pub fn removed(&self) -> usize {
        self.scheduler.spawned() - self.board.len()
    }

    /// When the next burst (or the completion signal) is due.
    pub fn next_wake(&self) -> Option<Duration> {
        self.scheduler.next_wake()
    }

    /// Pieces a policy may legally click right now: live, not frozen, not
    /// already stacked. Ignores the transient bar lock.
    pub fn clickable_pieces(&self) -> Vec<PieceId> {
        self.board
            .iter()
            .filter(|p| p.active && !self.bar.holds(p.id))
            .map(|p| p.id)
            .collect()
    }

    /// First clickable piece of this combination, in spawn order.
    pub fn find_clickable(&self, combo: Combo) -> Option<PieceId> {
        self.board
            .iter()
            .find(|p| p.combo == combo && p.active && !self.bar.holds(p.id))
            .map(|p| p.id)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Two-line plain-text snapshot: the slot row, then the counters.
    pub fn render_ascii(&self) -> String {
        let mut s = String::new();
        s.push_str("bar:");
        for slot in self.bar.slots() {
            match slot.combo() {
                Some(combo) => {
                    s.push_str(&format!(
                        " [{} {}{}]",
                        combo,
                        "*".repeat(slot.len()),
                        "-".repeat(self.bar.match_count() - slot.len())
                    ));
                }
                None => {
                    s.push_str(&format!(" [{}]", "-".repeat(self.bar.match_count())));
                }
            }
        }
        s.push('\n');
        s.push_str(&format!(
            "t={:.2}s status={:?} live={} spawned={}/{} queued={} removed={} frozen={} gray={:.2} locked={}\n",
            self.clock.as_secs_f64(),
            self.status(),
            self.board.len(),
            self.spawned(),
            self.planned_total(),
            self.queued(),
            self.removed(),
            self.freeze.frozen().len(),
            self.freeze.gray_amount(),
            self.is_locked(),
        ));
        s
    }
}
