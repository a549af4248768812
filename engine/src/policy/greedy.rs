// engine/src/policy/greedy.rs
#![forbid(unsafe_code)]

use crate::engine::{Game, PieceId};

use super::base::Policy;

/// Feed the fullest partial stack first; open a new stack only when no
/// existing stack can still be fed. Deterministic: ties break toward the
/// lower slot index, and pieces are taken in spawn order.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for GreedyPolicy {
    fn choose_piece(&mut self, g: &Game) -> Option<PieceId> {
        let bar = g.bar();
        let mut stacks: Vec<(usize, usize)> = bar
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, s)| (s.len(), i))
            .collect();
        // Fullest first, earlier slot on ties.
        stacks.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        for (_, index) in stacks {
            if let Some(combo) = bar.slot(index).combo() {
                if let Some(id) = g.find_clickable(combo) {
                    return Some(id);
                }
            }
        }
        g.clickable_pieces().into_iter().next()
    }
}
