//! Inventory system
//!
//! Ordered, bounded list of carried items.

use serde::{Deserialize, Serialize};

use super::item::{Item, ItemId};

/// Default carrying capacity
pub const INVENTORY_SIZE: usize = 40;

/// Player inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_capacity(INVENTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Add an item at the end. A full inventory hands the item back.
    pub fn add_item(&mut self, item: Item) -> Result<(), Item> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove an item by ID, keeping the order of the rest
    pub fn remove_by_id(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn get_by_id(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_by_id_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Highest power score among carried items
    pub fn best_by_power<F>(&self, filter: F) -> Option<&Item>
    where
        F: Fn(&Item) -> bool,
    {
        self.items
            .iter()
            .filter(|i| filter(i))
            .max_by(|a, b| a.power_score.total_cmp(&b.power_score))
    }
}
