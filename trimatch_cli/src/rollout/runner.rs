// src/rollout/runner.rs
#![forbid(unsafe_code)]

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use trimatch_engine::engine::{ClickOutcome, Delivery, Game, GameConfig};
use trimatch_engine::policy::Policy;

use super::sinks::{ReportRow, RolloutSink};
use super::stats::{FinalReport, RolloutStats};

/// Fixed internal cadence for progress-bar live message updates, in episodes.
/// (No CLI knob on purpose.)
const LIVE_EVERY: u64 = 8;

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    // ---------------- core rollout ----------------
    /// Sessions to play to the end.
    pub episodes: u64,
    /// Base seed; episode e uses base_seed + e.
    pub base_seed: u64,
    /// Session parameters handed to every episode.
    pub game: GameConfig,

    /// Used only for the final report string.
    pub policy_name: String,

    // ---------------- virtual clock ----------------
    /// Idle clock step when nothing is clickable and no burst is due.
    pub tick_ms: u64,
    /// Click-to-landing latency; the bar stays locked for this span.
    pub flight_ms: u64,
    /// Give up on an episode still running after this much simulated time.
    pub stall_after_ms: u64,

    // ---------------- output ----------------
    /// 0 = final summary only
    /// 1 = progress bar
    /// 2 = progress bar + periodic table (via sink)
    pub verbosity: u8,

    /// Print a table row every N episodes (only used when verbosity == 2).
    /// 0 disables table reporting.
    pub report_every: u64,

    // ---------------- rendering ----------------
    /// If Some(ms): render every delivery; sleep ms between frames (0 = no sleep).
    pub render_ms: Option<u64>,
}

pub struct Runner {
    cfg: RunnerConfig,
    sink: Box<dyn RolloutSink>,
}

impl Runner {
    pub fn new(cfg: RunnerConfig, sink: Box<dyn RolloutSink>) -> Self {
        Self { cfg, sink }
    }

    pub fn run(&mut self, policy: &mut dyn Policy) -> FinalReport {
        let cfg = self.cfg.clone();

        // Progress bar is UI only; runner logic does not depend on it.
        let pb = if cfg.verbosity >= 1 {
            let pb = ProgressBar::new(cfg.episodes);
            pb.set_style(
                ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos:>9}/{len:<9}  {percent:>3}%  {elapsed_precise}  {msg}",
                )
                .unwrap()
                .progress_chars("=>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut stats = RolloutStats::new();

        let tick = Duration::from_millis(cfg.tick_ms.max(1));
        let flight = Duration::from_millis(cfg.flight_ms);
        let stall_cap = Duration::from_millis(cfg.stall_after_ms.max(1));

        for episode_id in 0..cfg.episodes {
            let seed = cfg.base_seed.wrapping_add(episode_id);
            let mut game = Game::new(cfg.game, seed);
            let mut now = Duration::ZERO;

            // Rendering is a separate axis from verbosity.
            if cfg.render_ms.is_some() {
                println!("=== episode {episode_id} seed={seed} ===");
                print!("{}", game.render_ascii());
            }

            // ------------------------------------------------------------
            // One session: advance the clock, let the policy click, fly,
            // land, repeat until the session ends or the stall cap hits.
            // ------------------------------------------------------------
            loop {
                game.tick(now);
                if game.status().is_terminal() {
                    break;
                }
                if now >= stall_cap {
                    // Still running and out of patience (e.g. a freeze whose
                    // thaw threshold the policy can no longer reach).
                    break;
                }

                let Some(id) = policy.choose_piece(&game) else {
                    // Nothing clickable: jump to the next scheduled burst if
                    // one is due, otherwise idle forward one tick.
                    now = match game.next_wake() {
                        Some(at) if at > now => at,
                        _ => now + tick,
                    };
                    continue;
                };

                let destination = match game.click(id) {
                    ClickOutcome::Accepted { destination } => destination,
                    // Gate rejections are policy misbehavior; skip forward
                    // instead of spinning on the same pick.
                    _ => {
                        now += tick;
                        continue;
                    }
                };

                // Flight: the bar stays locked until the piece lands.
                game.lock_bar();
                now += flight;
                game.tick(now);
                let outcome = game.deliver(id);
                game.unlock_bar();

                let bar_fill: u32 = game.bar().slots().iter().map(|s| s.len() as u32).sum();
                stats.on_delivery(bar_fill, matches!(outcome, Delivery::Completed { .. }));

                // Rendering (ASCII) every delivery when enabled.
                if let Some(ms) = cfg.render_ms {
                    let verdict = match &outcome {
                        Delivery::Stacked { .. } => "stacked",
                        Delivery::Completed { .. } => "cleared",
                        Delivery::Lost => "lost",
                    };
                    println!(
                        "t={:.2}s piece={} slot={} {}",
                        now.as_secs_f64(),
                        id,
                        destination,
                        verdict
                    );
                    print!("{}", game.render_ascii());
                    if ms > 0 {
                        std::thread::sleep(Duration::from_millis(ms));
                    }
                }
            }

            let ep_clicks = stats.ep_clicks;
            stats.on_episode_end(game.status(), now);

            if let Some(ref pb) = pb {
                pb.inc(1);
            }

            if cfg.render_ms.is_some() {
                println!(
                    "=== end: status={:?} clicks={} sim={:.2}s wins={} losses={} stalls={} ===",
                    game.status(),
                    ep_clicks,
                    now.as_secs_f64(),
                    stats.wins,
                    stats.losses,
                    stats.stalls
                );
            }

            // ------------------------------------------------------------
            // Periodic table report (verbosity == 2 only).
            // IMPORTANT: the table prints only AGGREGATE stats.
            // ------------------------------------------------------------
            if cfg.verbosity == 2
                && cfg.report_every > 0
                && (stats.episodes_done % cfg.report_every == 0)
            {
                let row = ReportRow {
                    episode: stats.episodes_done,
                    episodes_total: cfg.episodes,
                    eps: stats.episodes_per_sec(),

                    wins: stats.wins,
                    losses: stats.losses,
                    stalls: stats.stalls,
                    win_rate: stats.win_rate(),

                    avg_clicks: stats.avg_clicks(),
                    max_clicks: stats.clicks_max,

                    avg_sim_s: stats.avg_sim_s(),
                    max_sim_s: stats.max_sim_s(),

                    bar_peak_worst: stats.bar_peak_worst,
                    avg_bar_fill: stats.avg_bar_fill(),

                    triples: stats.triples_total,
                };

                self.sink.on_report_row(&row, pb.as_ref());
            }

            // ------------------------------------------------------------
            // Live progress message cadence (fixed internal cadence).
            // ------------------------------------------------------------
            if cfg.verbosity >= 1 && (stats.episodes_done % LIVE_EVERY == 0) {
                if let Some(ref pb) = pb {
                    pb.set_message(stats.live_msg());
                }
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        // Final report is still created by stats (stable end-of-run struct).
        stats.final_report(&cfg.policy_name)
    }
}
