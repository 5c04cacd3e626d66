//! Combat system

pub mod damage;
pub mod encounter;
pub mod enemy;
pub mod log;
pub mod status;

pub use damage::{calculate_damage, AttackResult, Proc, Target};
pub use encounter::{CombatOutcome, CombatState, CombatSystem, Resolution, VictoryRewards};
pub use enemy::Enemy;
pub use log::CombatLog;
pub use status::{StatusEffects, StatusKind, StatusTickResult};
