//! Harvestable resource nodes

use crate::data::{tier_number, NodeDef, TierDef, YieldRange};
use crate::progression::DifficultySettings;
use crate::stats::StatId;

/// Which gather power stat applies to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Wood,
    Ore,
    Herb,
}

const WOOD_KEYWORDS: &[&str] = &["wood", "log", "plank", "sap", "resin", "bark"];
const ORE_KEYWORDS: &[&str] = &["ore", "stone", "obsidian", "crystal", "ingot"];
const HERB_KEYWORDS: &[&str] = &["herb", "plant", "mushroom", "flower", "fiber", "leaf"];

impl NodeType {
    /// Deduce the type from a resource id; unmatched ids count as ore
    pub fn from_resource(resource_id: &str) -> Self {
        let matches = |keywords: &[&str]| keywords.iter().any(|k| resource_id.contains(k));
        if matches(WOOD_KEYWORDS) {
            NodeType::Wood
        } else if matches(ORE_KEYWORDS) {
            NodeType::Ore
        } else if matches(HERB_KEYWORDS) {
            NodeType::Herb
        } else {
            NodeType::Ore
        }
    }

    pub fn power_stat(&self) -> StatId {
        match self {
            NodeType::Wood => StatId::GatherPowerWood,
            NodeType::Ore => StatId::GatherPowerOre,
            NodeType::Herb => StatId::GatherPowerHerb,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Wood => "wood",
            NodeType::Ore => "ore",
            NodeType::Herb => "herb",
        }
    }
}

/// A live node: an HP pool that empties on harvest and refills after
/// its respawn timer
#[derive(Debug, Clone, PartialEq)]
pub struct GatherNode {
    pub id: String,
    pub name: String,
    pub resource_id: String,
    pub tier: String,
    pub node_type: NodeType,
    pub recommended_level: u32,
    pub max_hp: f64,
    pub hp: f64,
    pub yield_range: YieldRange,
    pub respawn_time: f64,
    pub respawn_timer: f64,
    pub depleted: bool,
}

impl GatherNode {
    pub fn from_def(def: &NodeDef, tier: &TierDef, difficulty: &DifficultySettings) -> Self {
        let base_hp = def.node_hp.unwrap_or(tier.node_hp);
        let max_hp = difficulty.scaled_node_hp(base_hp, tier_number(&def.tier));

        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            resource_id: def.resource.clone(),
            tier: def.tier.clone(),
            node_type: NodeType::from_resource(&def.resource),
            recommended_level: tier.recommended_level,
            max_hp,
            hp: max_hp,
            yield_range: def.yield_range,
            respawn_time: difficulty.scaled_respawn(def.respawn_sec),
            respawn_timer: 0.0,
            depleted: false,
        }
    }

    /// Hit the node. Returns true only on the hit that depletes it.
    pub fn harvest(&mut self, power: f64) -> bool {
        if self.depleted {
            return false;
        }
        self.hp -= power.max(0.0);
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.depleted = true;
            self.respawn_timer = self.respawn_time;
            return true;
        }
        false
    }

    /// Count down the respawn timer; a respawned node is back at full HP
    pub fn update(&mut self, dt: f64) {
        if !self.depleted {
            return;
        }
        self.respawn_timer -= dt.max(0.0);
        if self.respawn_timer <= 0.0 {
            self.respawn_timer = 0.0;
            self.hp = self.max_hp;
            self.depleted = false;
        }
    }

    pub fn hp_percent(&self) -> f64 {
        if self.max_hp > 0.0 {
            self.hp / self.max_hp * 100.0
        } else {
            0.0
        }
    }
}
