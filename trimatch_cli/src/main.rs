// src/main.rs
#![forbid(unsafe_code)]

mod rollout;

use std::time::Duration;

use clap::Parser;

use crate::rollout::{NoopSink, RolloutSink, Runner, RunnerConfig, TableSink};
use trimatch_engine::{
    Catalog, FreezeSpec, GameConfig, GreedyPolicy, Policy, RandomPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "trimatch_cli")]
struct Args {
    // ---------------- rollout sizing ----------------
    /// Sessions to play to the end.
    #[arg(long, default_value_t = 200)]
    episodes: u64,

    /// Base RNG seed (episode e uses base_seed + e). If omitted, a fixed default is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Policy: greedy | random
    #[arg(long, default_value = "greedy")]
    policy: String,

    // ---------------- virtual clock ----------------
    /// Idle clock step in ms when nothing is clickable and no burst is due.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,

    /// Click-to-landing latency in ms (the bar stays locked for this span).
    #[arg(long, default_value_t = 350)]
    flight_ms: u64,

    /// Give up on an episode still running after this many simulated ms.
    #[arg(long, default_value_t = 120_000)]
    stall_after_ms: u64,

    // ---------------- session shape ----------------
    /// Catalog shape axis.
    #[arg(long, default_value_t = 3)]
    shapes: usize,

    /// Catalog color axis.
    #[arg(long, default_value_t = 4)]
    colors: usize,

    /// Catalog animal axis.
    #[arg(long, default_value_t = 3)]
    animals: usize,

    /// Distinct combinations per session (clamped to the catalog cross-product).
    #[arg(long, default_value_t = 8)]
    combos: usize,

    /// Same-combination pieces that clear a slot.
    #[arg(long, default_value_t = 3)]
    match_count: usize,

    /// Requested population size (raised and rounded so combinations stay balanced).
    #[arg(long, default_value_t = 48)]
    total: usize,

    /// Holding slots in the bar.
    #[arg(long, default_value_t = 7)]
    slots: usize,

    // ---------------- spawning ----------------
    /// Pieces released per burst.
    #[arg(long, default_value_t = 5)]
    burst: usize,

    /// Delay between bursts in ms.
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Board spawn locations the scheduler cycles through.
    #[arg(long, default_value_t = 6)]
    spawn_points: usize,

    // ---------------- freeze ----------------
    /**
     * Freeze sample draws when spawning completes (0 disables the effect).
     * Draws are with replacement, so fewer unique pieces may end up frozen.
     */
    #[arg(long, default_value_t = 0)]
    freeze: usize,

    /// Removed-piece count at which frozen pieces thaw. Only relevant if --freeze > 0.
    #[arg(long, default_value_t = 9)]
    unfreeze_after: usize,

    // ---------------- visualization ----------------
    /**
     * Render the bar as ASCII after every delivery; value is sleep in ms (e.g. 30).
     * Omit to disable rendering.
     * Examples:
     *   --render 0    (render as fast as possible)
     *   --render 30   (sleep 30ms between frames)
     */
    #[arg(long, value_name = "ms")]
    render: Option<u64>,

    // ---------------- output / reporting ----------------
    /// Verbosity: 0=silent (final summary only), 1=progress bar, 2=progress bar + periodic table.
    #[arg(long, default_value_t = 1)]
    verbosity: u8,

    /// Print a table row every N episodes (only used with --verbosity 2).
    #[arg(long, default_value_t = 10)]
    report_every: u64,
}

fn main() {
    let args = Args::parse();

    // Episode seeds are derived from this base seed.
    let base_seed = args.seed.unwrap_or(12345);

    // Policy instance (boxed so the CLI can switch implementations at runtime).
    let mut policy: Box<dyn Policy> = match args.policy.as_str() {
        "greedy" => Box::new(GreedyPolicy::new()),
        _ => Box::new(RandomPolicy::new(base_seed.wrapping_add(999))),
    };

    let game = GameConfig {
        catalog: Catalog::new(args.shapes, args.colors, args.animals),
        combination_count: args.combos,
        match_count: args.match_count,
        total_pieces: args.total,
        slot_count: args.slots,
        burst_size: args.burst,
        burst_interval: Duration::from_millis(args.interval_ms),
        spawn_points: args.spawn_points,
        freeze: FreezeSpec {
            freeze_count: args.freeze,
            unfreeze_after_removed: args.unfreeze_after,
            ..FreezeSpec::none()
        },
    };

    // Rollout configuration (data only; no logic).
    let cfg = RunnerConfig {
        episodes: args.episodes,
        base_seed,
        game,

        tick_ms: args.tick_ms,
        flight_ms: args.flight_ms,
        stall_after_ms: args.stall_after_ms,

        render_ms: args.render,

        verbosity: args.verbosity,
        report_every: args.report_every,

        policy_name: args.policy.clone(),
    };

    // Reporting sink:
    // - verbosity 2 => periodic table (unless report_every == 0)
    // - otherwise   => no-op
    let sink: Box<dyn RolloutSink> = if cfg.verbosity >= 2 && cfg.report_every > 0 {
        // Header cadence is a formatting detail; cadence in *episodes* is handled by Runner.
        Box::new(TableSink::new(20))
    } else {
        Box::new(NoopSink)
    };

    let mut runner = Runner::new(cfg, sink);
    let report = runner.run(&mut *policy);

    // Final one-line summary (useful for logs / grep).
    println!(
        "DONE: policy={} episodes={} wins={} losses={} stalls={} win_rate={:.3} elapsed={:.3}s eps/s={:.1} clicks={} clicks/s={:.1} avg_clicks={:.1} max_clicks={} avg_sim={:.2}s triples={} peak_bar={}",
        report.policy,
        report.episodes,
        report.wins,
        report.losses,
        report.stalls,
        report.win_rate,
        report.elapsed_s,
        report.episodes_per_s,
        report.clicks_total,
        report.clicks_per_s,
        report.avg_clicks,
        report.max_clicks,
        report.avg_sim_s,
        report.triples_total,
        report.bar_peak_worst,
    );
}
