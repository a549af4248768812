// engine/tests/policy_contracts.rs
#![forbid(unsafe_code)]

/**
 * Policy contract tests.
 *
 * Purpose:
 * - Policies sit outside the core but the rollout driver trusts them
 *   blindly, so their contract needs pinning: return clickable pieces only,
 *   never mutate the session, stay deterministic where seeded.
 *
 * What is tested:
 * - Every returned id is a member of `clickable_pieces()`.
 * - Seeded policies reproduce their choices for identical runs.
 * - `choose_piece` leaves the observable session state untouched.
 * - Greedy ranking: the fullest partial stack is fed first.
 * - Policies answer `None` when nothing is clickable.
 */
use std::time::Duration;

use trimatch_engine::engine::{
    Catalog, ClickOutcome, FreezeSpec, Game, GameConfig, GameStatus, PieceId,
};
use trimatch_engine::policy::{GreedyPolicy, Policy, RandomPolicy};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn cfg() -> GameConfig {
    GameConfig {
        catalog: Catalog::new(2, 2, 2),
        combination_count: 4,
        match_count: 3,
        total_pieces: 12,
        slot_count: 7,
        burst_size: 6,
        burst_interval: ms(200),
        spawn_points: 4,
        freeze: FreezeSpec::none(),
    }
}

fn spawn_all(g: &mut Game) {
    g.tick(Duration::from_secs(3600));
}

/// Observable session state, for mutation checks.
fn snapshot(g: &Game) -> (GameStatus, Vec<PieceId>, usize, usize, Vec<usize>, bool) {
    (
        g.status(),
        g.board().iter().map(|p| p.id).collect(),
        g.spawned(),
        g.queued(),
        g.bar().slots().iter().map(|s| s.len()).collect(),
        g.is_locked(),
    )
}

/// Tick-click-deliver loop; asserts the clickable contract on every choice.
fn drive(g: &mut Game, policy: &mut dyn Policy, steps: usize) -> usize {
    let mut now = g.clock();
    let mut delivered = 0;
    for _ in 0..steps {
        now += ms(150);
        g.tick(now);
        if g.status().is_terminal() {
            break;
        }
        let Some(id) = policy.choose_piece(g) else {
            continue;
        };
        assert!(
            g.clickable_pieces().contains(&id),
            "policy returned non-clickable piece {id}"
        );
        let ClickOutcome::Accepted { .. } = g.click(id) else {
            panic!("gate rejected clickable piece {id}");
        };
        g.lock_bar();
        now += ms(50);
        g.tick(now);
        g.deliver(id);
        g.unlock_bar();
        delivered += 1;
    }
    delivered
}

#[test]
fn policies_return_only_clickable_pieces() {
    let mut g = Game::new(cfg(), 31);
    let mut random = RandomPolicy::new(7);
    assert!(drive(&mut g, &mut random, 8) > 0);

    let mut g = Game::new(cfg(), 31);
    let mut greedy = GreedyPolicy::new();
    assert!(drive(&mut g, &mut greedy, 8) > 0);
}

#[test]
fn random_policy_is_seed_deterministic() {
    let mut ga = Game::new(cfg(), 5);
    let mut gb = Game::new(cfg(), 5);
    spawn_all(&mut ga);
    spawn_all(&mut gb);
    let mut pa = RandomPolicy::new(99);
    let mut pb = RandomPolicy::new(99);

    for _ in 0..10 {
        let a = pa.choose_piece(&ga);
        let b = pb.choose_piece(&gb);
        assert_eq!(a, b);
        let Some(id) = a else { break };
        for g in [&mut ga, &mut gb] {
            assert!(matches!(g.click(id), ClickOutcome::Accepted { .. }));
            g.lock_bar();
            g.deliver(id);
            g.unlock_bar();
        }
        if ga.status().is_terminal() {
            break;
        }
    }
}

#[test]
fn choosing_does_not_mutate_the_session() {
    let mut g = Game::new(cfg(), 11);
    spawn_all(&mut g);
    // A mid-game state with one partial stack.
    let id = g.clickable_pieces()[0];
    assert!(matches!(g.click(id), ClickOutcome::Accepted { .. }));
    g.lock_bar();
    g.deliver(id);
    g.unlock_bar();

    let before = snapshot(&g);
    let mut random = RandomPolicy::new(3);
    let mut greedy = GreedyPolicy::new();
    for _ in 0..3 {
        random.choose_piece(&g);
        greedy.choose_piece(&g);
    }
    assert_eq!(snapshot(&g), before);
}

#[test]
fn greedy_feeds_the_fullest_stack_first() {
    let mut g = Game::new(cfg(), 23);
    spawn_all(&mut g);
    let c0 = g.combos()[0];
    let c1 = g.combos()[1];

    for combo in [c0, c1, c1] {
        let id = g.find_clickable(combo).unwrap();
        assert!(matches!(g.click(id), ClickOutcome::Accepted { .. }));
        g.lock_bar();
        g.deliver(id);
        g.unlock_bar();
    }
    // Stacks now: c0 at height 1, c1 at height 2.
    let pick = GreedyPolicy::new().choose_piece(&g).unwrap();
    assert_eq!(g.board().get(pick).unwrap().combo, c1);
}

#[test]
fn policies_go_quiet_when_nothing_is_clickable() {
    // Before any burst the board is empty.
    let mut g = Game::new(cfg(), 41);
    assert_eq!(RandomPolicy::new(1).choose_piece(&g), None);
    assert_eq!(GreedyPolicy::new().choose_piece(&g), None);

    // And again after a win empties the board for good.
    let win_cfg = GameConfig {
        catalog: Catalog::new(1, 1, 1),
        combination_count: 1,
        total_pieces: 3,
        burst_size: 3,
        ..cfg()
    };
    let mut g = Game::new(win_cfg, 1);
    g.tick(ms(0));
    let combo = g.combos()[0];
    for _ in 0..3 {
        let id = g.find_clickable(combo).unwrap();
        assert!(matches!(g.click(id), ClickOutcome::Accepted { .. }));
        g.lock_bar();
        g.deliver(id);
        g.unlock_bar();
    }
    g.tick(ms(100));
    assert_eq!(g.status(), GameStatus::Won);
    assert_eq!(RandomPolicy::new(1).choose_piece(&g), None);
    assert_eq!(GreedyPolicy::new().choose_piece(&g), None);
}
