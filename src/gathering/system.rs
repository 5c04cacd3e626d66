//! Gathering engine
//!
//! Holds the zone's active nodes, resolves harvest clicks and ticks
//! respawn timers.

use rand::seq::SliceRandom;
use rand::Rng;

use super::node::{GatherNode, NodeType};
use crate::data::{tier_number, DataManager};
use crate::entities::Player;
use crate::stats::{StatBlock, StatId};

/// Nodes spawned per zone visit
pub const DEFAULT_NODE_COUNT: usize = 5;
/// Harvest power before gather stats
pub const BASE_HARVEST_POWER: f64 = 10.0;

/// What a depleting harvest granted
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestReward {
    pub node_name: String,
    pub resource_id: String,
    pub quantity: u32,
    pub xp: u64,
    pub levels_gained: u32,
}

/// Read-only view of a node for display
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStatus {
    pub index: usize,
    pub name: String,
    pub resource_id: String,
    pub depleted: bool,
    pub hp_percent: f64,
    pub respawn_remaining: f64,
}

/// Harvest power against a node type: base + gather power, then gather speed
pub fn harvest_power(node_type: NodeType, stats: &StatBlock) -> f64 {
    let power = BASE_HARVEST_POWER + stats.get(node_type.power_stat());
    power * (1.0 + stats.get(StatId::GatherSpeed) / 100.0)
}

#[derive(Debug, Clone, Default)]
pub struct GatheringSystem {
    nodes: Vec<GatherNode>,
}

impl GatheringSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[GatherNode] {
        &self.nodes
    }

    /// Replace the active nodes with `count` picks from the zone's node
    /// pool. Returns the number spawned; zero (and nothing replaced) if
    /// the zone is unknown or has no matching nodes.
    pub fn spawn_nodes(&mut self, zone_id: &str, count: usize, data: &DataManager, rng: &mut impl Rng) -> usize {
        let Some(zone) = data.zone(zone_id) else {
            log::warn!("Cannot spawn nodes in unknown zone '{}'", zone_id);
            return 0;
        };
        let pool = data.nodes_in_zone(zone);
        if pool.is_empty() {
            log::debug!("Zone '{}' has no gatherable nodes", zone_id);
            return 0;
        }

        let tier = data.tier_or_default(&zone.tier);
        self.nodes = (0..count)
            .filter_map(|_| pool.choose(rng))
            .map(|def| GatherNode::from_def(def, &tier, &data.difficulty))
            .collect();

        log::debug!("Spawned {} nodes in {}", self.nodes.len(), zone.name);
        self.nodes.len()
    }

    /// Hit a node. Rewards are only granted on the hit that depletes it.
    pub fn harvest(
        &mut self,
        index: usize,
        player: &mut Player,
        data: &DataManager,
        rng: &mut impl Rng,
    ) -> Option<HarvestReward> {
        let node = self.nodes.get_mut(index)?;
        if node.depleted {
            return None;
        }

        let stats = player.total_stats(data);
        let power = harvest_power(node.node_type, &stats);
        if !node.harvest(power) {
            return None;
        }

        let difficulty = &data.difficulty;
        let range = node.yield_range;
        let base_yield = rng.gen_range(range.min.min(range.max)..=range.max.max(range.min));
        let scaled = difficulty.scaled_gather_yield(base_yield);
        let reward_factor = difficulty.reward_factor(player.level, node.recommended_level);
        let bonus = 1.0 + stats.get(StatId::BonusResources) / 100.0;

        let mut quantity = ((scaled as f64 * bonus * reward_factor) as u32).max(1);
        if rng.gen::<f64>() * 100.0 < stats.get(StatId::DoubleDrop) {
            quantity *= 2;
        }
        player.add_resource(&node.resource_id, quantity);

        let xp = ((5.0 * tier_number(&node.tier) as f64 * reward_factor) as u64).max(1);
        let levels_gained = player.add_xp(xp, data);

        log::debug!("Harvested {} x{} from {} (+{} xp)", node.resource_id, quantity, node.name, xp);
        Some(HarvestReward {
            node_name: node.name.clone(),
            resource_id: node.resource_id.clone(),
            quantity,
            xp,
            levels_gained,
        })
    }

    pub fn update(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        for node in &mut self.nodes {
            node.update(dt);
        }
    }

    /// Index of the first node that can be harvested
    pub fn first_available(&self) -> Option<usize> {
        self.nodes.iter().position(|n| !n.depleted)
    }

    pub fn node_status(&self) -> Vec<NodeStatus> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| NodeStatus {
                index,
                name: node.name.clone(),
                resource_id: node.resource_id.clone(),
                depleted: node.depleted,
                hp_percent: node.hp_percent(),
                respawn_remaining: node.respawn_timer,
            })
            .collect()
    }
}
