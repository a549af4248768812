// engine/src/engine/board.rs
#![forbid(unsafe_code)]

use std::fmt;

use rand::prelude::*;

use crate::engine::combo::Combo;

/// Opaque per-session piece identity. Distinct from the combination: many
/// pieces share a combination, no two share an id.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PieceId(u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live on-board piece.
#[derive(Clone, Copy, Debug)]
pub struct Piece {
    pub id: PieceId,
    pub combo: Combo,
    /// Clickable flag; cleared while the piece is frozen.
    pub active: bool,
    /// Spawn location the scheduler assigned.
    pub spawn_point: usize,
}

/// The live piece population, in spawn order.
///
/// Pieces stay here while stacked in the bar and leave only when their stack
/// completes, so the win check is a plain emptiness test and it waits for
/// the final triple to actually clear.
#[derive(Clone, Debug, Default)]
pub struct Board {
    pieces: Vec<Piece>,
    next_id: u32,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, combo: Combo, spawn_point: usize) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.push(Piece {
            id,
            combo,
            active: true,
            spawn_point,
        });
        id
    }

    /// Remove and return a piece; spawn order of the rest is preserved.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let at = self.pieces.iter().position(|p| p.id == id)?;
        Some(self.pieces.remove(at))
    }

    /// Toggle the clickable flag. False if the piece is gone.
    pub fn set_active(&mut self, id: PieceId, active: bool) -> bool {
        match self.pieces.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.active = active;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    /// First live piece with this combination, in spawn order.
    pub fn find_by_combo(&self, combo: Combo) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.combo == combo)
    }

    /// `n` independent uniform draws; the same piece may come up more than
    /// once. An empty board yields an empty vec.
    pub fn sample_with_replacement(&self, n: usize, rng: &mut StdRng) -> Vec<PieceId> {
        if self.pieces.is_empty() {
            return Vec::new();
        }
        (0..n)
            .map(|_| self.pieces[rng.gen_range(0..self.pieces.len())].id)
            .collect()
    }
}
