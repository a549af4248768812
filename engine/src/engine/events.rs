// engine/src/engine/events.rs
#![forbid(unsafe_code)]

use std::sync::mpsc;

use crate::engine::board::PieceId;
use crate::engine::combo::Combo;

/// Everything the simulation reports outward, fired synchronously in the
/// order the state changes happen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PieceSpawned {
        piece: PieceId,
        combo: Combo,
        point: usize,
    },
    /// The spawn queue is exhausted. Fires once, one burst interval after
    /// the final burst.
    SpawningComplete,
    /// A click passed the input gate.
    PieceClicked { piece: PieceId, combo: Combo },
    /// A delivered piece entered its slot.
    PieceStacked { piece: PieceId, slot: usize },
    /// A stack reached the match count; fired once per cleared piece, in
    /// insertion order.
    SlotCompleted { piece: PieceId, slot: usize },
    Won,
    Lost,
}

/// Observer seam for the host: UI bridges, recorders, rollout sinks.
pub trait GameListener {
    fn on_event(&mut self, event: &GameEvent);
}

/// Forward events into a channel. Handy for tests and thread bridges.
impl GameListener for mpsc::Sender<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        let _ = self.send(event.clone());
    }
}

/// Ordered, synchronous fan-out in registration order. Publishing with no
/// listeners is a no-op; the simulation never waits on its observers.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn GameListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn GameListener>) {
        self.listeners.push(listener);
    }

    pub fn publish(&mut self, event: &GameEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }
}
