//! Stat model
//!
//! Every numeric attribute in the game is a `StatId`; a `StatBlock` holds
//! one value per id and is composed additively.

pub mod stat_block;

pub use stat_block::{StatBlock, StatId};
