//! Difficulty settings and level-based scaling
//!
//! A single tuning record turns base numbers into hardcore numbers. Every
//! transform here is pure; systems consult it but never mutate it.

use serde::{Deserialize, Serialize};

use crate::data::{RecipeDef, ResourceQty};

/// Global tuning values for the hardcore curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultySettings {
    pub enemy_hp_mult: f64,
    pub enemy_atk_mult: f64,
    pub boss_hp_mult: f64,
    pub boss_atk_mult: f64,
    /// Enemy strength added per level the player is above the zone
    pub scaling_per_level: f64,

    pub reward_xp_mult: f64,
    pub reward_gold_mult: f64,
    pub overlevel_penalty: f64,
    pub underlevel_bonus: f64,

    pub gather_node_hp_mult: f64,
    pub gather_yield_mult: f64,
    pub gather_respawn_mult: f64,

    pub crafting_gold_mult: f64,
    pub crafting_resource_mult: f64,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            enemy_hp_mult: 1.35,
            enemy_atk_mult: 1.2,
            boss_hp_mult: 1.65,
            boss_atk_mult: 1.35,
            scaling_per_level: 0.08,

            reward_xp_mult: 0.65,
            reward_gold_mult: 0.55,
            overlevel_penalty: 0.18,
            underlevel_bonus: 0.08,

            gather_node_hp_mult: 1.25,
            gather_yield_mult: 0.85,
            gather_respawn_mult: 1.2,

            crafting_gold_mult: 1.15,
            crafting_resource_mult: 1.1,
        }
    }
}

/// The enemy numbers the difficulty curve touches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyCoreStats {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub armor: f64,
    pub attack_speed: f64,
    pub crit_chance: f64,
}

/// Recipe costs after hardcore scaling
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeCosts {
    pub gold: u64,
    pub inputs: Vec<ResourceQty>,
}

impl DifficultySettings {
    /// 1.0 at or below the recommended level, growing linearly above it
    pub fn level_scaling_factor(&self, player_level: u32, recommended_level: u32) -> f64 {
        let gap = player_level.saturating_sub(recommended_level) as f64;
        1.0 + gap * self.scaling_per_level
    }

    /// Reward multiplier: penalises farming below your level, rewards
    /// fighting above it
    pub fn reward_factor(&self, player_level: u32, recommended_level: u32) -> f64 {
        let gap = player_level as i64 - recommended_level as i64;
        if gap > 0 {
            let penalty = (gap as f64 * self.overlevel_penalty).min(0.7);
            (1.0 - penalty).max(0.35)
        } else if gap < 0 {
            let bonus = (gap.unsigned_abs() as f64 * self.underlevel_bonus).min(0.4);
            1.0 + bonus
        } else {
            1.0
        }
    }

    /// Apply hardcore multipliers and level scaling to enemy stats.
    /// Attack speed and crit pass through unchanged.
    pub fn scaled_enemy_stats(
        &self,
        stats: &EnemyCoreStats,
        player_level: u32,
        recommended_level: u32,
        is_boss: bool,
    ) -> EnemyCoreStats {
        let factor = self.level_scaling_factor(player_level, recommended_level);
        let hp_mult = self.enemy_hp_mult * if is_boss { self.boss_hp_mult } else { 1.0 };
        let atk_mult = self.enemy_atk_mult * if is_boss { self.boss_atk_mult } else { 1.0 };

        EnemyCoreStats {
            hp: stats.hp * hp_mult * factor,
            atk: stats.atk * atk_mult * factor,
            def: stats.def * factor,
            armor: stats.armor * factor,
            attack_speed: stats.attack_speed,
            crit_chance: stats.crit_chance,
        }
    }

    /// Node HP grows 12% per tier above the first
    pub fn scaled_node_hp(&self, base_hp: f64, tier_number: u32) -> f64 {
        let tier_bonus = 1.0 + (tier_number.saturating_sub(1) as f64 * 0.12);
        base_hp * self.gather_node_hp_mult * tier_bonus
    }

    pub fn scaled_respawn(&self, base_respawn: f64) -> f64 {
        base_respawn * self.gather_respawn_mult
    }

    pub fn scaled_gather_yield(&self, base_yield: u32) -> u32 {
        let scaled = (base_yield as f64 * self.gather_yield_mult).round_ties_even();
        (scaled as u32).max(1)
    }

    /// XP for a kill. Anything that gave XP still gives at least 1.
    pub fn scaled_kill_xp(&self, base_xp: u64) -> u64 {
        if base_xp == 0 {
            return 0;
        }
        ((base_xp as f64 * self.reward_xp_mult).round_ties_even() as u64).max(1)
    }

    /// Gold for a kill, before the player's own gold bonus
    pub fn scaled_kill_gold(&self, base_gold: u64) -> u64 {
        (base_gold as f64 * self.reward_gold_mult).round_ties_even() as u64
    }

    pub fn scaled_recipe_costs(&self, recipe: &RecipeDef) -> RecipeCosts {
        let inputs = recipe
            .inputs
            .iter()
            .map(|input| ResourceQty {
                resource: input.resource.clone(),
                qty: (input.qty as f64 * self.crafting_resource_mult).round_ties_even() as u32,
            })
            .collect();

        RecipeCosts {
            gold: (recipe.gold_cost as f64 * self.crafting_gold_mult).round_ties_even() as u64,
            inputs,
        }
    }
}
