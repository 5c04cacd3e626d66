//! Progression systems

pub mod difficulty;
pub mod skills;
pub mod upgrades;
pub mod xp;

pub use difficulty::{DifficultySettings, EnemyCoreStats, RecipeCosts};
pub use skills::{apply_skill_effects, SkillAvailability, SkillSystem, UnlockError};
pub use upgrades::{StationUpgradeSystem, UpgradeAvailability};
pub use xp::{level_title, xp_to_next_level};
