//! Item system

pub mod equipment;
pub mod generation;
pub mod inventory;
pub mod item;

pub use equipment::{resolve_slot, Equipment};
pub use generation::{
    next_quality, quality_for_roll, rarity_for_roll, roll_quality, roll_rarity, ItemGenerator, ItemOptions,
};
pub use inventory::{Inventory, INVENTORY_SIZE};
pub use item::{Affix, EquipSlot, Item, ItemId, ItemSlot};
