// engine/src/engine/scheduler.rs
#![forbid(unsafe_code)]

use std::time::Duration;

use rand::prelude::*;

use crate::engine::combo::Combo;

/// One scheduled appearance: which combination shows up at which spawn point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpawnOrder {
    pub combo: Combo,
    pub point: usize,
}

/// Everything one `poll` produced.
#[derive(Clone, Debug, Default)]
pub struct SchedulerTick {
    /// Due spawns, oldest burst first.
    pub spawns: Vec<SpawnOrder>,
    /// Set exactly once: on the poll that lands one interval after the final
    /// burst, with the queue exhausted.
    pub completed: bool,
}

/// Releases the spawn queue in fixed-size bursts at a fixed interval.
///
/// Suspension is explicit: the scheduler stores its next wake time and the
/// host advances it with `poll(now)`. A poll that lands several intervals
/// late catches up, emitting every overdue burst in order. There is no
/// cancellation; a scheduler that stops being polled simply stays parked.
#[derive(Clone, Debug)]
pub struct SpawnScheduler {
    queue: Vec<Combo>,
    cursor: usize,
    // Shuffled once at construction; piece i appears at points[i % len].
    points: Vec<usize>,
    burst_size: usize,
    interval: Duration,
    next_wake: Option<Duration>,
    completed: bool,
}

impl SpawnScheduler {
    pub fn new(
        queue: Vec<Combo>,
        spawn_points: usize,
        burst_size: usize,
        interval: Duration,
        rng: &mut StdRng,
    ) -> Self {
        let mut points: Vec<usize> = (0..spawn_points.max(1)).collect();
        points.shuffle(rng);
        Self {
            queue,
            cursor: 0,
            points,
            burst_size: burst_size.max(1),
            interval,
            next_wake: Some(Duration::ZERO),
            completed: false,
        }
    }

    /// Advance to `now`, returning every spawn that came due.
    pub fn poll(&mut self, now: Duration) -> SchedulerTick {
        let mut tick = SchedulerTick::default();
        while let Some(wake) = self.next_wake {
            if wake > now {
                break;
            }
            if self.cursor < self.queue.len() {
                for _ in 0..self.burst_size {
                    if self.cursor >= self.queue.len() {
                        break;
                    }
                    tick.spawns.push(SpawnOrder {
                        combo: self.queue[self.cursor],
                        point: self.points[self.cursor % self.points.len()],
                    });
                    self.cursor += 1;
                }
                self.next_wake = Some(wake + self.interval);
            } else {
                // Trailing interval elapsed: report completion once and park.
                self.completed = true;
                self.next_wake = None;
                tick.completed = true;
            }
        }
        tick
    }

    /// When the next burst (or the completion signal) is due. `None` once
    /// the completion signal has fired.
    pub fn next_wake(&self) -> Option<Duration> {
        self.next_wake
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Pieces released so far.
    pub fn spawned(&self) -> usize {
        self.cursor
    }

    /// Pieces still queued.
    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    pub fn spawn_points(&self) -> usize {
        self.points.len()
    }
}
