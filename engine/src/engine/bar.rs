// engine/src/engine/bar.rs
#![forbid(unsafe_code)]

use crate::engine::board::PieceId;
use crate::engine::combo::Combo;

/// Session outcome. Latched: once `Won` or `Lost`, never leaves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Running)
    }
}

/// One piece held in a slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlotEntry {
    pub piece: PieceId,
    pub combo: Combo,
}

/// A holding position: a bounded stack of same-combination pieces. At rest a
/// slot holds between 0 and match_count - 1 entries; reaching the match
/// count clears it within the same delivery.
#[derive(Clone, Debug, Default)]
pub struct Slot {
    entries: Vec<SlotEntry>,
}

impl Slot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stack's combination (its first entry's), if occupied.
    pub fn combo(&self) -> Option<Combo> {
        self.entries.first().map(|e| e.combo)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[SlotEntry] {
        &self.entries
    }

    pub fn holds(&self, piece: PieceId) -> bool {
        self.entries.iter().any(|e| e.piece == piece)
    }
}

/// What a committed delivery did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Appended to a matching partial stack or opened an empty slot.
    Stacked { slot: usize },
    /// The append reached the match count: the slot cleared and the bar
    /// unlocked itself. `pieces` are the cleared entries in insertion order.
    Completed { slot: usize, pieces: Vec<SlotEntry> },
    /// No matching stack with room and no empty slot.
    Lost,
}

/// The holding bar: a fixed row of slots plus the terminal latch.
///
/// Two operations share the first-fit placement rule. `probe_slot` is the
/// non-failing query consulted while a piece is in flight; `deliver` is the
/// commit and the only place a lose can originate. Keeping them separate is
/// what lets a flight be planned before the board state settles.
#[derive(Clone, Debug)]
pub struct Bar {
    slots: Vec<Slot>,
    match_count: usize,
    locked: bool,
    status: GameStatus,
}

impl Bar {
    pub fn new(slot_count: usize, match_count: usize) -> Self {
        Self {
            slots: vec![Slot::default(); slot_count.max(1)],
            match_count: match_count.max(1),
            locked: false,
            status: GameStatus::Running,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The flight driver holds the lock while a delivery is in the air so a
    /// second click cannot start a concurrent flight.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// True if the piece currently sits in any slot.
    pub fn holds(&self, piece: PieceId) -> bool {
        self.slots.iter().any(|s| s.holds(piece))
    }

    /// Where a piece of this combination would land: the first partial stack
    /// of the same combination, else the first empty slot, else the last
    /// slot index. Never fails; only the commit decides a lose.
    pub fn probe_slot(&self, combo: Combo) -> usize {
        let mut first_empty = None;
        for (i, slot) in self.slots.iter().enumerate() {
            if !slot.is_empty() && slot.len() < self.match_count && slot.combo() == Some(combo) {
                return i;
            }
            if slot.is_empty() && first_empty.is_none() {
                first_empty = Some(i);
            }
        }
        first_empty.unwrap_or(self.slots.len() - 1)
    }

    /// Commit a delivered piece with the same first-fit rule as
    /// `probe_slot`: a matching partial stack wins over an earlier empty
    /// slot. Reaching the match count clears the slot, reports the cleared
    /// entries in insertion order and releases the lock; finding no room
    /// latches `Lost`.
    pub fn deliver(&mut self, entry: SlotEntry) -> Delivery {
        assert!(
            self.status == GameStatus::Running,
            "delivery on a finished bar"
        );

        let target = self
            .slots
            .iter()
            .position(|s| {
                !s.is_empty() && s.len() < self.match_count && s.combo() == Some(entry.combo)
            })
            .or_else(|| self.slots.iter().position(|s| s.is_empty()));

        let Some(index) = target else {
            self.status = GameStatus::Lost;
            return Delivery::Lost;
        };

        self.slots[index].entries.push(entry);
        if self.slots[index].len() == self.match_count {
            let pieces = std::mem::take(&mut self.slots[index].entries);
            self.locked = false;
            return Delivery::Completed {
                slot: index,
                pieces,
            };
        }
        Delivery::Stacked { slot: index }
    }

    /// Latch the win; true only on the transition.
    pub fn mark_won(&mut self) -> bool {
        if self.status == GameStatus::Running {
            self.status = GameStatus::Won;
            true
        } else {
            false
        }
    }
}
