//! Enemies built from templates for a single encounter

use crate::data::{EnemyDef, GoldRange, ResourceDrop, TierDef};
use crate::progression::difficulty::{DifficultySettings, EnemyCoreStats};
use crate::stats::{StatBlock, StatId};

use super::status::StatusEffects;

/// Fixed boss multipliers, applied before difficulty scaling
pub const BOSS_HP_FACTOR: f64 = 8.0;
pub const BOSS_ATK_FACTOR: f64 = 2.0;
pub const BOSS_DEF_FACTOR: f64 = 3.0;
pub const BOSS_ARMOR_FACTOR: f64 = 2.0;

/// Enemy crits hit for 150% like the player's base
pub const ENEMY_CRIT_DAMAGE: f64 = 150.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub tier: String,
    pub is_boss: bool,
    pub stats: StatBlock,
    pub hp: f64,
    pub xp_reward: u64,
    pub gold: GoldRange,
    pub resource_drops: Vec<ResourceDrop>,
    pub item_drop_chance_pct: f64,
    pub statuses: StatusEffects,
}

impl Enemy {
    /// Build an enemy from its template and the zone's tier, scaled for
    /// the player's level
    pub fn from_def(def: &EnemyDef, tier: &TierDef, player_level: u32, difficulty: &DifficultySettings) -> Self {
        let mut core = EnemyCoreStats {
            hp: def.stats.hp.unwrap_or(tier.enemy_hp),
            atk: def.stats.atk.unwrap_or(tier.enemy_atk),
            def: def.stats.def,
            armor: def.stats.armor,
            attack_speed: def.stats.attack_speed,
            crit_chance: def.stats.crit_chance,
        };

        if def.is_boss {
            core.hp *= BOSS_HP_FACTOR;
            core.atk *= BOSS_ATK_FACTOR;
            core.def *= BOSS_DEF_FACTOR;
            core.armor *= BOSS_ARMOR_FACTOR;
        }

        let scaled = difficulty.scaled_enemy_stats(&core, player_level, tier.recommended_level, false);
        let stats = StatBlock::from_pairs(&[
            (StatId::HpMax, scaled.hp),
            (StatId::Atk, scaled.atk),
            (StatId::Def, scaled.def),
            (StatId::Armor, scaled.armor),
            (StatId::AttackSpeed, scaled.attack_speed),
            (StatId::CritChance, scaled.crit_chance),
            (StatId::CritDamage, ENEMY_CRIT_DAMAGE),
        ]);

        let xp_reward = def.xp.unwrap_or_else(|| ((tier.base_power as u64) / 2).max(3));

        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            tier: def.tier.clone(),
            is_boss: def.is_boss,
            hp: scaled.hp,
            stats,
            xp_reward,
            gold: def.loot.gold,
            resource_drops: def.loot.resource_drops.clone(),
            item_drop_chance_pct: def.loot.item_drop_chance_pct,
            statuses: StatusEffects::new(),
        }
    }

    pub fn max_hp(&self) -> f64 {
        self.stats.get(StatId::HpMax)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Returns true if the enemy died
    pub fn take_damage(&mut self, damage: f64) -> bool {
        self.hp -= damage;
        self.hp <= 0.0
    }

    pub fn heal(&mut self, amount: f64) {
        self.hp = (self.hp + amount).min(self.max_hp());
    }

    /// Seconds between attacks; `None` if the enemy never attacks
    pub fn attack_interval(&self) -> Option<f64> {
        let speed = self.stats.get(StatId::AttackSpeed);
        (speed > 0.0).then(|| 1.0 / speed)
    }
}
