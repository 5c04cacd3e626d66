//! Hardcore Idle - progression core of a hardcore idle RPG
//!
//! Automatic combat, resource gathering and crafting, tuned by a
//! punishing difficulty curve. Everything here is simulation: callers
//! drive it with `Game::update(dt)` and issue commands between frames.

pub mod combat;
pub mod crafting;
pub mod data;
pub mod entities;
pub mod game;
pub mod gathering;
pub mod items;
pub mod progression;
pub mod save;
pub mod stats;

// Re-export commonly used types
pub use data::DataManager;
pub use entities::Player;
pub use game::{Game, GameMode};
pub use stats::{StatBlock, StatId};
