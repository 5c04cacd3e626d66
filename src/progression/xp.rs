//! Experience and leveling
//!
//! XP curve, level-up stat gains, and progression helpers.

use crate::stats::{StatBlock, StatId};

/// XP needed to leave level 1
pub const FIRST_LEVEL_XP: u64 = 100;

/// Base stat increases granted on every level-up
pub const LEVEL_UP_GAINS: [(StatId, f64); 4] = [
    (StatId::HpMax, 4.0),
    (StatId::Atk, 0.8),
    (StatId::Def, 0.3),
    (StatId::HpRegen, 0.05),
];

/// XP needed to advance from `level` to the next one
pub fn xp_to_next_level(level: u32) -> u64 {
    if level <= 1 {
        FIRST_LEVEL_XP
    } else {
        (150.0 * 1.35f64.powi(level as i32)).floor() as u64
    }
}

/// Apply the per-level base stat gains
pub fn apply_level_up_gains(base: &mut StatBlock) {
    for &(stat, gain) in &LEVEL_UP_GAINS {
        base.add(stat, gain);
    }
}

/// Scale a raw gain by a percentage bonus stat, truncating
pub fn apply_gain_bonus(amount: u64, bonus_pct: f64) -> u64 {
    (amount as f64 * (1.0 + bonus_pct / 100.0)).max(0.0) as u64
}

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        1..=2 => "Novice",
        3..=4 => "Apprentice",
        5..=7 => "Journeyman",
        8..=10 => "Adept",
        11..=14 => "Expert",
        15..=18 => "Master",
        19..=24 => "Grandmaster",
        _ => "Legend",
    }
}
