// engine/src/policy/base.rs
#![forbid(unsafe_code)]

use crate::engine::{Game, PieceId};

/// Policy picks the next piece to click for the current state.
///
/// Returns a member of `Game::clickable_pieces()`, or `None` when nothing is
/// clickable (everything frozen or stacked, or the board is empty); the
/// driver decides whether to wait a tick or give the episode up.
///
/// Object-safe so it can be used as `Box<dyn Policy>`.
pub trait Policy {
    fn choose_piece(&mut self, g: &Game) -> Option<PieceId>;
}
