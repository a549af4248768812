// src/rollout/stats.rs
#![forbid(unsafe_code)]

use std::time::{Duration, Instant};

use trimatch_engine::engine::GameStatus;

#[derive(Clone, Debug)]
pub struct RolloutStats {
    pub episodes_done: u64,
    pub wins: u64,
    pub losses: u64,
    /// Episodes that hit the stall cap while still running.
    pub stalls: u64,

    /// Committed deliveries across all episodes.
    pub clicks_total: u64,
    /// Completed stacks across all episodes.
    pub triples_total: u64,

    /// Deliveries in the current episode (folded into max on episode end).
    pub ep_clicks: u64,
    pub clicks_max: u64,

    // simulated session length aggregates
    pub sim_total: Duration,
    pub sim_max: Duration,

    // bar pressure aggregates (sampled right after every delivery)
    pub bar_fill_sum: f64,
    pub bar_peak_worst: u32,

    t0: Instant,
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            episodes_done: 0,
            wins: 0,
            losses: 0,
            stalls: 0,
            clicks_total: 0,
            triples_total: 0,
            ep_clicks: 0,
            clicks_max: 0,
            sim_total: Duration::ZERO,
            sim_max: Duration::ZERO,
            bar_fill_sum: 0.0,
            bar_peak_worst: 0,
            t0: Instant::now(),
        }
    }

    /// Call once per committed delivery.
    ///
    /// `bar_fill` is the number of pieces sitting in the bar right after the
    /// commit; `cleared` marks a delivery that completed a stack.
    pub fn on_delivery(&mut self, bar_fill: u32, cleared: bool) {
        self.clicks_total += 1;
        self.ep_clicks += 1;

        self.bar_fill_sum += bar_fill as f64;
        self.bar_peak_worst = self.bar_peak_worst.max(bar_fill);

        if cleared {
            self.triples_total += 1;
        }
    }

    /// Call when an episode ends, before the reset. A `Running` status here
    /// means the runner gave up on the episode (stall cap).
    pub fn on_episode_end(&mut self, status: GameStatus, sim: Duration) {
        self.episodes_done += 1;
        match status {
            GameStatus::Won => self.wins += 1,
            GameStatus::Lost => self.losses += 1,
            GameStatus::Running => self.stalls += 1,
        }

        self.clicks_max = self.clicks_max.max(self.ep_clicks);
        self.ep_clicks = 0;

        self.sim_total += sim;
        self.sim_max = self.sim_max.max(sim);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.t0.elapsed().as_secs_f64()
    }

    pub fn episodes_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.episodes_done as f64 / dt
        } else {
            0.0
        }
    }

    pub fn clicks_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.clicks_total as f64 / dt
        } else {
            0.0
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.episodes_done > 0 {
            self.wins as f64 / self.episodes_done as f64
        } else {
            0.0
        }
    }

    pub fn avg_clicks(&self) -> f64 {
        if self.episodes_done > 0 {
            self.clicks_total as f64 / self.episodes_done as f64
        } else {
            0.0
        }
    }

    pub fn avg_sim_s(&self) -> f64 {
        if self.episodes_done > 0 {
            self.sim_total.as_secs_f64() / self.episodes_done as f64
        } else {
            0.0
        }
    }

    pub fn max_sim_s(&self) -> f64 {
        self.sim_max.as_secs_f64()
    }

    pub fn avg_bar_fill(&self) -> f64 {
        if self.clicks_total > 0 {
            self.bar_fill_sum / self.clicks_total as f64
        } else {
            0.0
        }
    }

    pub fn live_msg(&self) -> String {
        format!(
            "eps={:.1}/s wins={} losses={} stalls={} win%={:.1} clk/ep={:.1} sim/ep={:.1}s peakBar={}",
            self.episodes_per_sec(),
            self.wins,
            self.losses,
            self.stalls,
            100.0 * self.win_rate(),
            self.avg_clicks(),
            self.avg_sim_s(),
            self.bar_peak_worst,
        )
    }

    pub fn final_report(&self, policy_name: &str) -> FinalReport {
        FinalReport {
            policy: policy_name.to_string(),

            episodes: self.episodes_done,
            wins: self.wins,
            losses: self.losses,
            stalls: self.stalls,
            win_rate: self.win_rate(),

            elapsed_s: self.elapsed_secs(),
            episodes_per_s: self.episodes_per_sec(),

            clicks_total: self.clicks_total,
            clicks_per_s: self.clicks_per_sec(),
            avg_clicks: self.avg_clicks(),
            max_clicks: self.clicks_max,

            avg_sim_s: self.avg_sim_s(),
            max_sim_s: self.max_sim_s(),

            triples_total: self.triples_total,

            bar_peak_worst: self.bar_peak_worst,
            avg_bar_fill: self.avg_bar_fill(),
        }
    }
}

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct FinalReport {
    pub policy: String,

    pub episodes: u64,
    pub wins: u64,
    pub losses: u64,
    pub stalls: u64,
    pub win_rate: f64,

    pub elapsed_s: f64,
    pub episodes_per_s: f64,

    pub clicks_total: u64,
    pub clicks_per_s: f64,
    pub avg_clicks: f64,
    pub max_clicks: u64,

    pub avg_sim_s: f64,
    pub max_sim_s: f64,

    pub triples_total: u64,

    pub bar_peak_worst: u32,
    pub avg_bar_fill: f64,
}
