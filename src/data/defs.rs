//! Reference data definitions
//!
//! Immutable tables loaded once at startup. Stat ids stay as strings here
//! and are resolved (or dropped) when applied to a `StatBlock`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::Effect;
use crate::items::ItemSlot;

/// Progression bracket ("t1".."tN")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDef {
    pub id: String,
    pub name: String,
    pub base_power: f64,
    pub recommended_level: u32,
    /// Enemy HP used when an enemy template leaves it out
    #[serde(default = "default_enemy_hp")]
    pub enemy_hp: f64,
    #[serde(default = "default_enemy_atk")]
    pub enemy_atk: f64,
    /// Node HP used when a node template leaves it out
    #[serde(default = "default_node_hp")]
    pub node_hp: f64,
}

fn default_enemy_hp() -> f64 {
    40.0
}

fn default_enemy_atk() -> f64 {
    6.0
}

fn default_node_hp() -> f64 {
    20.0
}

impl Default for TierDef {
    fn default() -> Self {
        Self {
            id: "t1".to_string(),
            name: String::new(),
            base_power: 10.0,
            recommended_level: 1,
            enemy_hp: default_enemy_hp(),
            enemy_atk: default_enemy_atk(),
            node_hp: default_node_hp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub prefix: String,
    pub stat_mult: f64,
    pub affix_mult: f64,
    pub gold_mult: f64,
    pub max_affixes: usize,
}

impl Default for RarityDef {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            prefix: String::new(),
            stat_mult: 1.0,
            affix_mult: 1.0,
            gold_mult: 1.0,
            max_affixes: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDef {
    pub id: String,
    pub name: String,
    pub stat_mult: f64,
    pub gold_mult: f64,
}

impl Default for QualityDef {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            stat_mult: 1.0,
            gold_mult: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tier: Option<String>,
}

/// Inclusive numeric range rolled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldRange {
    pub min: u32,
    pub max: u32,
}

impl Default for YieldRange {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}

/// Harvestable node template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: String,
    pub name: String,
    pub resource: String,
    pub tier: String,
    #[serde(default)]
    pub node_hp: Option<f64>,
    #[serde(rename = "yield", default)]
    pub yield_range: YieldRange,
    #[serde(default = "default_respawn_sec")]
    pub respawn_sec: f64,
}

fn default_respawn_sec() -> f64 {
    5.0
}

/// Item base template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBaseDef {
    pub id: String,
    pub name: String,
    pub slot: ItemSlot,
    pub tier: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub base_stats: BTreeMap<String, StatRange>,
    /// Effect applied when a consumable is used
    #[serde(default)]
    pub effect: Option<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixDef {
    pub id: String,
    pub name: String,
    pub stat: String,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_tier_min")]
    pub tier_min: u32,
}

fn default_tier_min() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetBonus {
    /// Equipped pieces needed to activate
    pub pieces: usize,
    pub stats: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bonuses: Vec<SetBonus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQty {
    pub resource: String,
    pub qty: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDef {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level_required: u32,
    #[serde(default = "default_station_gold")]
    pub unlock_cost_gold: u64,
    #[serde(default)]
    pub unlock_cost_resources: Vec<ResourceQty>,
}

fn default_level() -> u32 {
    1
}

fn default_station_gold() -> u64 {
    100
}

/// What a recipe produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecipeOutput {
    Resource { resource: String, qty: u32 },
    Item { item_base: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default = "default_level")]
    pub level_required: u32,
    #[serde(default)]
    pub gold_cost: u64,
    #[serde(default)]
    pub inputs: Vec<ResourceQty>,
    #[serde(default)]
    pub outputs: Vec<RecipeOutput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStatsDef {
    pub hp: Option<f64>,
    pub atk: Option<f64>,
    pub def: f64,
    pub armor: f64,
    pub attack_speed: f64,
    pub crit_chance: f64,
}

impl Default for EnemyStatsDef {
    fn default() -> Self {
        Self {
            hp: None,
            atk: None,
            def: 0.0,
            armor: 0.0,
            attack_speed: 1.0,
            crit_chance: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldRange {
    pub min: u64,
    pub max: u64,
}

impl Default for GoldRange {
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDrop {
    pub resource: String,
    #[serde(default = "default_drop_chance")]
    pub chance_pct: f64,
}

fn default_drop_chance() -> f64 {
    25.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyLootDef {
    pub gold: GoldRange,
    pub resource_drops: Vec<ResourceDrop>,
    pub item_drop_chance_pct: f64,
}

impl Default for EnemyLootDef {
    fn default() -> Self {
        Self {
            gold: GoldRange::default(),
            resource_drops: Vec::new(),
            item_drop_chance_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: String,
    pub name: String,
    pub tier: String,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default)]
    pub stats: EnemyStatsDef,
    #[serde(default)]
    pub loot: EnemyLootDef,
    /// Defaults to half the tier's base power (minimum 3)
    #[serde(default)]
    pub xp: Option<u64>,
}

/// Passive modifier applied while the player is in a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvEffect {
    pub stat: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDef {
    pub id: String,
    pub name: String,
    pub tier: String,
    #[serde(default)]
    pub enemies: Vec<String>,
    #[serde(default)]
    pub boss: Option<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub environment_effects: Vec<EnvEffect>,
}

/// One entry of a skill or upgrade cost list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cost {
    Gold(u64),
    Resource { resource: String, qty: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillEffectKind {
    /// Added directly to the base stat
    Flat,
    /// Percentage of the current base stat
    Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub stat: String,
    pub kind: SkillEffectKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSkillDef")]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub requires_level: u32,
    pub cost: Vec<Cost>,
    pub effects: Vec<SkillEffect>,
}

/// File form of a skill: either a single `effect` or an `effects` list
#[derive(Deserialize)]
struct RawSkillDef {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_level")]
    requires_level: u32,
    #[serde(default)]
    cost: Vec<Cost>,
    #[serde(default)]
    effect: Option<SkillEffect>,
    #[serde(default)]
    effects: Vec<SkillEffect>,
}

impl From<RawSkillDef> for SkillDef {
    fn from(raw: RawSkillDef) -> Self {
        let mut effects = raw.effects;
        if let Some(single) = raw.effect {
            effects.insert(0, single);
        }
        Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            requires_level: raw.requires_level,
            cost: raw.cost,
            effects,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationUpgradeLevel {
    pub level: u32,
    #[serde(default)]
    pub cost: Vec<Cost>,
    #[serde(default)]
    pub bonus: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationUpgradeDef {
    pub station_id: String,
    pub upgrades: Vec<StationUpgradeLevel>,
}

impl StationUpgradeDef {
    pub fn level(&self, level: u32) -> Option<&StationUpgradeLevel> {
        self.upgrades.iter().find(|u| u.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_effect_single_or_list() {
        let single: SkillDef = serde_json::from_str(
            r#"{"id": "a", "name": "A", "effect": {"stat": "atk", "kind": "flat", "value": 2.0}}"#,
        )
        .unwrap();
        assert_eq!(single.effects.len(), 1);

        let many: SkillDef = serde_json::from_str(
            r#"{"id": "b", "name": "B", "effects": [
                {"stat": "atk", "kind": "flat", "value": 2.0},
                {"stat": "atk", "kind": "percent", "value": 10.0}
            ]}"#,
        )
        .unwrap();
        assert_eq!(many.effects.len(), 2);
        assert_eq!(many.effects[1].kind, SkillEffectKind::Percent);
        assert_eq!(many.requires_level, 1);
    }

    #[test]
    fn test_enemy_defaults() {
        let enemy: EnemyDef =
            serde_json::from_str(r#"{"id": "e", "name": "E", "tier": "t1"}"#).unwrap();
        assert_eq!(enemy.stats.attack_speed, 1.0);
        assert_eq!(enemy.loot.gold, GoldRange { min: 1, max: 5 });
        assert_eq!(enemy.loot.item_drop_chance_pct, 10.0);
        assert!(!enemy.is_boss);
    }
}
