// src/rollout/sinks.rs
#![forbid(unsafe_code)]

/// One periodic row emitted by the runner.
///
/// Transport struct: runner/stats compute fields, sinks only format/emit.
#[derive(Clone, Debug)]
pub struct ReportRow {
    pub episode: u64,
    pub episodes_total: u64,

    pub eps: f64,

    pub wins: u64,
    pub losses: u64,
    pub stalls: u64,
    pub win_rate: f64,

    /// Averages over finished episodes.
    pub avg_clicks: f64,
    pub max_clicks: u64,

    /// Simulated session length, per finished episode.
    pub avg_sim_s: f64,
    pub max_sim_s: f64,

    /// Worst bar occupancy observed so far (pieces held at once, over all
    /// deliveries).
    pub bar_peak_worst: u32,
    /// Average bar occupancy sampled right after each delivery.
    pub avg_bar_fill: f64,

    pub triples: u64,
}

/// Sink interface for periodic reporting (table/logging/dataset emission later).
pub trait RolloutSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&indicatif::ProgressBar>);
}

/// Default sink: does nothing.
#[derive(Default)]
pub struct NoopSink;

impl RolloutSink for NoopSink {
    fn on_report_row(&mut self, _row: &ReportRow, _pb: Option<&indicatif::ProgressBar>) {}
}

/// Human-readable periodic table sink.
///
/// Cadence (every N episodes) is handled by Runner. This sink prints whenever called.
pub struct TableSink {
    header_every: u64,
    rows_printed: u64,
}

impl TableSink {
    const DEFAULT_HEADER_EVERY: u64 = 20;

    /// If `header_every == 0`, a reasonable default is used.
    pub fn new(header_every: u64) -> Self {
        Self {
            header_every: if header_every == 0 {
                Self::DEFAULT_HEADER_EVERY
            } else {
                header_every
            },
            rows_printed: 0,
        }
    }

    fn header_line(&self) -> String {
        // Note: keep widths aligned with row_line() below.
        format!(
            "{:>17} {:>8} {:>6} {:>6} {:>6} {:>7} {:>8} {:>8} {:>9} {:>9} {:>8} {:>8} {:>8}",
            "episode/total",
            "eps",
            "win",
            "loss",
            "stall",
            "win%",
            "clk/ep",
            "maxClk",
            "sim/ep",
            "maxSim",
            "peakBar",
            "avgBar",
            "triples",
        )
    }

    fn sep_line(&self) -> String {
        "-".repeat(self.header_line().len())
    }

    fn row_line(&self, r: &ReportRow) -> String {
        format!(
            "{:>8}/{:<8} {:>8.2} {:>6} {:>6} {:>6} {:>7.1} {:>8.1} {:>8} {:>8.1}s {:>8.1}s {:>8} {:>8.2} {:>8}",
            r.episode,
            r.episodes_total,
            r.eps,
            r.wins,
            r.losses,
            r.stalls,
            100.0 * r.win_rate,
            r.avg_clicks,
            r.max_clicks,
            r.avg_sim_s,
            r.max_sim_s,
            r.bar_peak_worst,
            r.avg_bar_fill,
            r.triples,
        )
    }
}

impl RolloutSink for TableSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&indicatif::ProgressBar>) {
        let mut lines: Vec<String> = Vec::new();

        if self.rows_printed == 0 || (self.rows_printed % self.header_every == 0) {
            lines.push(self.header_line());
            lines.push(self.sep_line());
        }

        lines.push(self.row_line(row));
        self.rows_printed += 1;

        if let Some(pb) = pb {
            for l in lines {
                pb.println(l);
            }
        } else {
            for l in lines {
                println!("{l}");
            }
        }
    }
}
