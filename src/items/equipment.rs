//! Equipment system
//!
//! Equipped items by slot. Equipping moves the item in; whatever was in
//! the slot is moved back out to the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::item::{EquipSlot, Item, ItemSlot};
use crate::data::DataManager;
use crate::stats::StatBlock;

/// Player equipment slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: BTreeMap<EquipSlot, Item>,
}

/// Concrete slot for an item given what is already worn.
///
/// Rings fill the first empty ring slot; with both taken, ring 1 is
/// replaced. Consumables have no slot.
pub fn resolve_slot(requested: ItemSlot, equipment: &Equipment) -> Option<EquipSlot> {
    let slot = match requested {
        ItemSlot::Weapon => EquipSlot::Weapon,
        ItemSlot::Helmet => EquipSlot::Helmet,
        ItemSlot::Chest => EquipSlot::Chest,
        ItemSlot::Legs => EquipSlot::Legs,
        ItemSlot::Boots => EquipSlot::Boots,
        ItemSlot::Gloves => EquipSlot::Gloves,
        ItemSlot::Amulet => EquipSlot::Amulet,
        ItemSlot::ToolOre => EquipSlot::ToolOre,
        ItemSlot::ToolWood => EquipSlot::ToolWood,
        ItemSlot::ToolHerb => EquipSlot::ToolHerb,
        ItemSlot::Ring => {
            if equipment.is_empty(EquipSlot::Ring1) {
                EquipSlot::Ring1
            } else if equipment.is_empty(EquipSlot::Ring2) {
                EquipSlot::Ring2
            } else {
                EquipSlot::Ring1
            }
        }
        ItemSlot::Consumable => return None,
    };
    Some(slot)
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip an item, returning the previously equipped item if any.
    /// A non-equippable item is handed back as `Err`.
    pub fn equip(&mut self, mut item: Item) -> Result<Option<Item>, Item> {
        let Some(slot) = resolve_slot(item.slot, self) else {
            return Err(item);
        };
        item.equipped = true;
        let previous = self.slots.insert(slot, item).map(|mut old| {
            old.equipped = false;
            old
        });
        Ok(previous)
    }

    /// Unequip an item from a slot
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots.remove(&slot).map(|mut item| {
            item.equipped = false;
            item
        })
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        !self.slots.contains_key(&slot)
    }

    /// Equipped items in slot order
    pub fn items(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Sum of every equipped item's stats
    pub fn total_stats(&self) -> StatBlock {
        let mut total = StatBlock::new();
        for item in self.slots.values() {
            total += &item.total_stats();
        }
        total
    }

    /// Active set bonuses for the pieces currently worn
    pub fn set_bonus_stats(&self, data: &DataManager) -> StatBlock {
        let mut pieces: BTreeMap<&str, usize> = BTreeMap::new();
        for item in self.slots.values() {
            if let Some(set_id) = &item.set_id {
                *pieces.entry(set_id.as_str()).or_insert(0) += 1;
            }
        }

        let mut total = StatBlock::new();
        for (set_id, count) in pieces {
            let Some(set) = data.set(set_id) else {
                continue;
            };
            for bonus in set.bonuses.iter().filter(|b| count >= b.pieces) {
                total.merge_map(bonus.stats.iter().map(|(k, v)| (k.as_str(), *v)));
            }
        }
        total
    }
}
