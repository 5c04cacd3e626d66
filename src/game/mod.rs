//! Game session and frame driving

mod state;
mod time;

pub use state::{
    Game, GameMessage, GameMode, MessageCategory, AUTO_SAVE_INTERVAL, DEATH_GOLD_PENALTY, RESPAWN_HP_RATIO,
    STARTER_STATION,
};
pub use time::IntervalTimer;
