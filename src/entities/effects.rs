//! Consumable effects and timed buffs

use serde::{Deserialize, Serialize};

use crate::stats::StatId;

/// Buff duration when a data file leaves it out
pub const DEFAULT_BUFF_DURATION: f64 = 60.0;

fn default_duration() -> f64 {
    DEFAULT_BUFF_DURATION
}

/// What a consumable does when used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    Heal {
        value: f64,
    },
    BuffAtk {
        value: f64,
        #[serde(default = "default_duration")]
        duration: f64,
    },
    BuffDef {
        value: f64,
        #[serde(default = "default_duration")]
        duration: f64,
    },
    BuffSpeed {
        value: f64,
        #[serde(default = "default_duration")]
        duration: f64,
    },
}

impl Effect {
    /// The timed buff this effect grants, if it is a buff
    pub fn buff(&self) -> Option<Buff> {
        let (stat, value, duration) = match *self {
            Effect::Heal { .. } => return None,
            Effect::BuffAtk { value, duration } => (StatId::Atk, value, duration),
            Effect::BuffDef { value, duration } => (StatId::Def, value, duration),
            Effect::BuffSpeed { value, duration } => (StatId::AttackSpeed, value, duration),
        };
        Some(Buff::new(stat, value, duration))
    }
}

/// A temporary stat modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub stat: StatId,
    pub value: f64,
    pub duration: f64,
    pub remaining: f64,
}

impl Buff {
    pub fn new(stat: StatId, value: f64, duration: f64) -> Self {
        Self {
            stat,
            value,
            duration,
            remaining: duration,
        }
    }

    /// Tick down; returns true while still active
    pub fn tick(&mut self, dt: f64) -> bool {
        self.remaining -= dt;
        self.remaining > 0.0
    }
}
