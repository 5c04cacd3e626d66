//! Resource gathering

pub mod node;
pub mod system;

pub use node::{GatherNode, NodeType};
pub use system::{harvest_power, GatheringSystem, HarvestReward, NodeStatus, DEFAULT_NODE_COUNT};
