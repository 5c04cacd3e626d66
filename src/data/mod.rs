//! Reference data and external game content
//!
//! All tables are loaded once from RON files (falling back to built-in
//! defaults) and are read-only afterwards.

pub mod defaults;
pub mod defs;
pub mod loader;

pub use defs::*;
pub use loader::{tier_number, DataError, DataManager};
