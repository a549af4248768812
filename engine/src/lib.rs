// engine/src/lib.rs
#![forbid(unsafe_code)]

pub mod engine;
pub mod policy;

// Re-export the bits the CLI and most callers need:
pub use engine::{
    Bar, Board, Catalog, ClickOutcome, Combo, Delivery, FreezeSpec, Game, GameConfig, GameEvent,
    GameListener, GameStatus, PieceId,
};
pub use policy::{GreedyPolicy, Policy, RandomPolicy};
