//! Item definitions
//!
//! Concrete items, their slots, and rolled affixes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::tier_number;
use crate::stats::{StatBlock, StatId};

/// Unique item ID for tracking
pub type ItemId = Uuid;

/// Weights used to collapse an item's stats into a power score
pub const POWER_WEIGHTS: [(StatId, f64); 6] = [
    (StatId::HpMax, 0.1),
    (StatId::Atk, 2.0),
    (StatId::Def, 1.5),
    (StatId::Armor, 1.2),
    (StatId::CritChance, 3.0),
    (StatId::CritDamage, 0.5),
];

/// Slot an item template asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSlot {
    Weapon,
    Helmet,
    Chest,
    Legs,
    Boots,
    Gloves,
    Ring,
    Amulet,
    ToolOre,
    ToolWood,
    ToolHerb,
    Consumable,
}

impl ItemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            ItemSlot::Weapon => "Weapon",
            ItemSlot::Helmet => "Helmet",
            ItemSlot::Chest => "Chest",
            ItemSlot::Legs => "Legs",
            ItemSlot::Boots => "Boots",
            ItemSlot::Gloves => "Gloves",
            ItemSlot::Ring => "Ring",
            ItemSlot::Amulet => "Amulet",
            ItemSlot::ToolOre => "Pickaxe",
            ItemSlot::ToolWood => "Axe",
            ItemSlot::ToolHerb => "Sickle",
            ItemSlot::Consumable => "Consumable",
        }
    }

    pub fn is_equippable(&self) -> bool {
        !matches!(self, ItemSlot::Consumable)
    }
}

/// Concrete equipment slot on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Helmet,
    Chest,
    Legs,
    Boots,
    Gloves,
    Ring1,
    Ring2,
    Amulet,
    ToolOre,
    ToolWood,
    ToolHerb,
}

impl EquipSlot {
    /// All slots in display order
    pub const ALL: [EquipSlot; 12] = [
        EquipSlot::Weapon,
        EquipSlot::Helmet,
        EquipSlot::Chest,
        EquipSlot::Legs,
        EquipSlot::Boots,
        EquipSlot::Gloves,
        EquipSlot::Ring1,
        EquipSlot::Ring2,
        EquipSlot::Amulet,
        EquipSlot::ToolOre,
        EquipSlot::ToolWood,
        EquipSlot::ToolHerb,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "Weapon",
            EquipSlot::Helmet => "Helmet",
            EquipSlot::Chest => "Chest",
            EquipSlot::Legs => "Legs",
            EquipSlot::Boots => "Boots",
            EquipSlot::Gloves => "Gloves",
            EquipSlot::Ring1 => "Ring 1",
            EquipSlot::Ring2 => "Ring 2",
            EquipSlot::Amulet => "Amulet",
            EquipSlot::ToolOre => "Pickaxe",
            EquipSlot::ToolWood => "Axe",
            EquipSlot::ToolHerb => "Sickle",
        }
    }
}

/// A rolled affix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affix {
    pub affix_id: String,
    pub name: String,
    /// Target stat id (unknown ids are ignored when totalled)
    pub stat: String,
    pub value: f64,
}

/// A generated item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub base_id: String,
    pub name: String,
    pub slot: ItemSlot,
    pub tier: String,
    pub rarity: String,
    pub quality: String,
    pub base_stats: StatBlock,
    pub affixes: Vec<Affix>,
    #[serde(default)]
    pub set_id: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    pub gold_value: u64,
    pub level_requirement: u32,
    pub power_score: f64,
    #[serde(default)]
    pub equipped: bool,
}

impl Item {
    /// Base stats plus every affix, grouped by stat
    pub fn total_stats(&self) -> StatBlock {
        let mut total = self.base_stats.clone();
        for affix in &self.affixes {
            total.add_named(&affix.stat, affix.value);
        }
        total
    }

    pub fn tier_number(&self) -> u32 {
        tier_number(&self.tier)
    }

    pub fn is_consumable(&self) -> bool {
        self.slot == ItemSlot::Consumable
    }

    /// Weighted stat sum plus the tier's base power
    pub fn compute_power_score(&self, base_power: f64) -> f64 {
        let total = self.total_stats();
        let score: f64 = POWER_WEIGHTS
            .iter()
            .map(|&(stat, weight)| total.get(stat) * weight)
            .sum();
        score + base_power
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        let affixes: Vec<String> = self
            .affixes
            .iter()
            .map(|a| format!("+{:.2} {}", a.value, a.stat))
            .collect();
        if affixes.is_empty() {
            format!("{} [{} {}] power {:.1}", self.name, self.quality, self.tier, self.power_score)
        } else {
            format!(
                "{} [{} {}] power {:.1} ({})",
                self.name,
                self.quality,
                self.tier,
                self.power_score,
                affixes.join(", ")
            )
        }
    }
}
