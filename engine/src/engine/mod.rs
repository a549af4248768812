// engine/src/engine/mod.rs
#![forbid(unsafe_code)]

mod bar;
mod board;
mod combo;
mod config;
mod deck;
mod events;
mod freeze;
mod game;
mod scheduler;

/**
 * Curated engine public API.
 *
 * Internal implementation modules remain private; only stable items are re-exported here.
 */
pub use bar::{Bar, Delivery, GameStatus, Slot, SlotEntry};
pub use board::{Board, Piece, PieceId};
pub use combo::{Catalog, Combo};
pub use config::GameConfig;
pub use deck::SpawnDeck;
pub use events::{EventBus, GameEvent, GameListener};
pub use freeze::{FreezeEffect, FreezeSpec};
pub use game::{ClickOutcome, Game};
pub use scheduler::{SchedulerTick, SpawnOrder, SpawnScheduler};
