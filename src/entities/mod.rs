//! Player aggregate and the effects that act on it

pub mod effects;
pub mod player;

pub use effects::{Buff, Effect, DEFAULT_BUFF_DURATION};
pub use player::{CombatStats, Player, STARTING_ZONE};
