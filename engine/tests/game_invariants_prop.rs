// engine/tests/game_invariants_prop.rs
#![forbid(unsafe_code)]

/**
 * Property/invariant tests for the session core.
 *
 * Purpose:
 * - Provide fuzz-like coverage using generated seeds, shapes and rollout
 *   lengths.
 * - Lock invariants that must hold regardless of how the driver plays.
 *
 * Invariants covered:
 * - Deck shape: clamped combination count, minimal raised/rounded total,
 *   equal per-combination share, subset membership and distinctness.
 * - Probe/commit agreement: the slot reported before a flight is the slot
 *   the commit lands in (or the fallback index on a lose).
 * - Slot discipline after every delivery: uniform combination per stack,
 *   length strictly below the match count at rest.
 * - Count conservation: spawned == live + removed.
 * - Terminal latch: at most one Won/Lost event, never both, and the status
 *   survives further ticks.
 * - Degenerate configs are clamped into playable games instead of erroring.
 */
use std::sync::mpsc;
use std::time::Duration;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use trimatch_engine::engine::{
    Catalog, ClickOutcome, Delivery, FreezeSpec, Game, GameConfig, GameEvent, SpawnDeck,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

proptest! {
    #[test]
    fn deck_is_balanced_and_minimal(
        shapes in 1usize..4,
        colors in 1usize..4,
        animals in 1usize..3,
        k_req in 0usize..40,
        m in 0usize..5,
        total_req in 0usize..80,
        seed in any::<u64>(),
    ) {
        let cfg = GameConfig {
            catalog: Catalog::new(shapes, colors, animals),
            combination_count: k_req,
            match_count: m,
            total_pieces: total_req,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = SpawnDeck::generate(&cfg, &mut rng);

        let cross = shapes * colors * animals;
        let k = k_req.clamp(1, cross);
        let expect_total = total_req.max(k * m.max(1)).div_ceil(k) * k;

        prop_assert_eq!(deck.combos().len(), k);
        prop_assert_eq!(deck.total(), expect_total);
        prop_assert_eq!(deck.per_combo(), expect_total / k);
        prop_assert_eq!(deck.queue().len(), deck.total());

        for (i, &c) in deck.combos().iter().enumerate() {
            prop_assert!(cfg.catalog.contains(c));
            prop_assert!(!deck.combos()[..i].contains(&c));
            let share = deck.queue().iter().filter(|&&q| q == c).count();
            prop_assert_eq!(share, deck.per_combo());
        }
    }

    #[test]
    fn random_play_never_breaks_session_invariants(
        seed in any::<u64>(),
        steps in 1usize..60,
    ) {
        // Small bar and few combinations so loses genuinely happen.
        let cfg = GameConfig {
            catalog: Catalog::new(2, 2, 1),
            combination_count: 3,
            match_count: 3,
            total_pieces: 15,
            slot_count: 4,
            burst_size: 4,
            burst_interval: ms(250),
            spawn_points: 3,
            freeze: FreezeSpec::none(),
        };
        let mut g = Game::new(cfg, seed);
        let (tx, rx) = mpsc::channel();
        g.subscribe(Box::new(tx));
        let mut picker = StdRng::seed_from_u64(seed ^ 0x00C0_FFEE);
        let mut now = Duration::ZERO;

        for _ in 0..steps {
            now += ms(120);
            g.tick(now);
            if g.status().is_terminal() {
                break;
            }
            let ids = g.clickable_pieces();
            if ids.is_empty() {
                continue;
            }
            let id = ids[picker.gen_range(0..ids.len())];
            let ClickOutcome::Accepted { destination } = g.click(id) else {
                panic!("gate rejected clickable piece {id}");
            };
            g.lock_bar();
            now += ms(40);
            g.tick(now);
            let outcome = g.deliver(id);
            g.unlock_bar();

            // The probe never lies: bar state cannot change mid-flight.
            match &outcome {
                Delivery::Stacked { slot } => prop_assert_eq!(*slot, destination),
                Delivery::Completed { slot, .. } => prop_assert_eq!(*slot, destination),
                Delivery::Lost => prop_assert_eq!(destination, g.bar().slot_count() - 1),
            }

            let m = g.bar().match_count();
            for slot in g.bar().slots() {
                prop_assert!(slot.len() < m);
                if let Some(c) = slot.combo() {
                    for e in slot.entries() {
                        prop_assert_eq!(e.combo, c);
                    }
                }
            }
            prop_assert_eq!(g.spawned(), g.board().len() + g.removed());

            if g.status().is_terminal() {
                break;
            }
        }

        // Terminal states latch across further time.
        let settled = g.status();
        g.tick(now + Duration::from_secs(120));
        if settled.is_terminal() {
            prop_assert_eq!(g.status(), settled);
        }

        let events: Vec<GameEvent> = rx.try_iter().collect();
        let wins = events.iter().filter(|e| **e == GameEvent::Won).count();
        let losses = events.iter().filter(|e| **e == GameEvent::Lost).count();
        prop_assert!(wins <= 1);
        prop_assert!(losses <= 1);
        prop_assert!(wins + losses <= 1);
    }

    #[test]
    fn degenerate_configs_are_clamped_into_playable_games(
        shapes in 0usize..3,
        colors in 0usize..3,
        animals in 0usize..3,
        k_req in 0usize..20,
        m in 0usize..4,
        total_req in 0usize..30,
        slots in 0usize..5,
        burst in 0usize..4,
        points in 0usize..4,
        seed in any::<u64>(),
    ) {
        let cfg = GameConfig {
            catalog: Catalog::new(shapes, colors, animals),
            combination_count: k_req,
            match_count: m,
            total_pieces: total_req,
            slot_count: slots,
            burst_size: burst,
            burst_interval: ms(100),
            spawn_points: points,
            freeze: FreezeSpec::none(),
        };
        let mut g = Game::new(cfg, seed);

        prop_assert!(!g.combos().is_empty());
        prop_assert!(g.planned_total() >= g.combos().len());
        prop_assert_eq!(g.planned_total() % g.combos().len(), 0);
        prop_assert!(g.bar().slot_count() >= 1);
        prop_assert!(g.bar().match_count() >= 1);

        g.tick(Duration::from_secs(3600));
        prop_assert_eq!(g.spawned(), g.planned_total());
        prop_assert!(g.spawning_complete());
    }
}
