//! Player aggregate
//!
//! Owns base stats, equipment, inventory, resources and progression.
//! Total stats are computed on demand from every source.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::effects::{Buff, Effect};
use crate::data::DataManager;
use crate::items::{EquipSlot, Equipment, Inventory, Item, ItemId};
use crate::progression::xp::{apply_gain_bonus, apply_level_up_gains, xp_to_next_level};
use crate::stats::{StatBlock, StatId};

/// Zone a new character starts in
pub const STARTING_ZONE: &str = "sprouting_meadow";

/// Cumulative combat counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub kills: u64,
    pub deaths: u64,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub crits: u64,
    pub boss_kills: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    /// Current HP; never above the computed maximum
    pub hp: f64,
    pub base_stats: StatBlock,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub potions: BTreeMap<String, u32>,
    pub resources: BTreeMap<String, u32>,
    pub gold: u64,
    pub buffs: Vec<Buff>,
    pub current_zone_id: String,
    pub unlocked_stations: BTreeSet<String>,
    pub combat_stats: CombatStats,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        let base_stats = Self::level_one_stats();
        Self {
            name: name.into(),
            level: 1,
            xp: 0,
            xp_to_next_level: xp_to_next_level(1),
            hp: base_stats.get(StatId::HpMax),
            base_stats,
            equipment: Equipment::new(),
            inventory: Inventory::new(),
            potions: BTreeMap::new(),
            resources: BTreeMap::new(),
            gold: 0,
            buffs: Vec::new(),
            current_zone_id: STARTING_ZONE.to_string(),
            unlocked_stations: BTreeSet::new(),
            combat_stats: CombatStats::default(),
        }
    }

    /// Base stats of a fresh level 1 character
    pub fn level_one_stats() -> StatBlock {
        StatBlock::from_pairs(&[
            (StatId::HpMax, 30.0),
            (StatId::HpRegen, 0.2),
            (StatId::Atk, 3.0),
            (StatId::AttackSpeed, 0.8),
            (StatId::CritChance, 2.0),
            (StatId::CritDamage, 150.0),
        ])
    }

    /// Base + equipment + set bonuses + zone environment + buffs
    pub fn total_stats(&self, data: &DataManager) -> StatBlock {
        let mut total = self.base_stats.clone();
        total += &self.equipment.total_stats();
        total += &self.equipment.set_bonus_stats(data);

        if let Some(zone) = data.zone(&self.current_zone_id) {
            for effect in &zone.environment_effects {
                total.add_named(&effect.stat, effect.value);
            }
        }

        for buff in &self.buffs {
            total.add(buff.stat, buff.value);
        }
        total
    }

    pub fn max_hp(&self, data: &DataManager) -> f64 {
        self.total_stats(data).get(StatId::HpMax)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Returns true if the hit was lethal
    pub fn take_damage(&mut self, damage: f64) -> bool {
        self.hp -= damage;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            return true;
        }
        false
    }

    pub fn heal(&mut self, amount: f64, data: &DataManager) {
        let max = self.max_hp(data);
        self.hp = (self.hp + amount).min(max);
    }

    /// Pull HP back under the current maximum
    pub fn clamp_hp(&mut self, data: &DataManager) {
        let max = self.max_hp(data);
        if self.hp > max {
            self.hp = max;
        }
    }

    // Experience & gold

    /// Add XP scaled by `xp_gain`; returns the number of levels gained
    pub fn add_xp(&mut self, amount: u64, data: &DataManager) -> u32 {
        let bonus = self.total_stats(data).get(StatId::XpGain);
        self.xp += apply_gain_bonus(amount, bonus);

        let mut levels = 0;
        while self.xp >= self.xp_to_next_level {
            self.level_up(data);
            levels += 1;
        }
        levels
    }

    fn level_up(&mut self, data: &DataManager) {
        self.xp -= self.xp_to_next_level;
        self.level += 1;
        apply_level_up_gains(&mut self.base_stats);
        self.xp_to_next_level = xp_to_next_level(self.level);
        self.hp = self.max_hp(data);
        log::info!("{} reached level {}", self.name, self.level);
    }

    /// Add gold scaled by `gold_gain`; returns the amount actually granted
    pub fn add_gold(&mut self, amount: u64, data: &DataManager) -> u64 {
        let bonus = self.total_stats(data).get(StatId::GoldGain);
        let granted = apply_gain_bonus(amount, bonus);
        self.gold += granted;
        granted
    }

    /// Spend gold if there is enough
    pub fn spend_gold(&mut self, amount: u64) -> bool {
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }

    /// Remove a fraction of current gold (truncated); returns the loss
    pub fn lose_gold_fraction(&mut self, fraction: f64) -> u64 {
        let loss = ((self.gold as f64 * fraction) as u64).min(self.gold);
        self.gold -= loss;
        loss
    }

    // Resources

    pub fn add_resource(&mut self, resource: &str, qty: u32) {
        if qty == 0 {
            return;
        }
        *self.resources.entry(resource.to_string()).or_insert(0) += qty;
    }

    pub fn resource_count(&self, resource: &str) -> u32 {
        self.resources.get(resource).copied().unwrap_or(0)
    }

    pub fn has_resource(&self, resource: &str, qty: u32) -> bool {
        self.resource_count(resource) >= qty
    }

    /// Consume resources if available; empty entries are removed
    pub fn consume_resource(&mut self, resource: &str, qty: u32) -> bool {
        if !self.has_resource(resource, qty) {
            return false;
        }
        if let Some(count) = self.resources.get_mut(resource) {
            *count -= qty;
            if *count == 0 {
                self.resources.remove(resource);
            }
        }
        true
    }

    // Potions & buffs

    pub fn add_potion(&mut self, potion_id: &str, qty: u32) {
        if qty == 0 {
            return;
        }
        *self.potions.entry(potion_id.to_string()).or_insert(0) += qty;
    }

    pub fn potion_count(&self, potion_id: &str) -> u32 {
        self.potions.get(potion_id).copied().unwrap_or(0)
    }

    /// Drink a potion: apply its effect and use up one. Returns false if
    /// none are owned.
    pub fn use_potion(&mut self, potion_id: &str, data: &DataManager) -> bool {
        let Some(count) = self.potions.get_mut(potion_id) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.potions.remove(potion_id);
        }

        match data.item_base(potion_id).and_then(|b| b.effect) {
            Some(Effect::Heal { value }) => self.heal(value, data),
            Some(effect) => {
                if let Some(buff) = effect.buff() {
                    self.buffs.push(buff);
                }
            }
            None => log::warn!("Potion '{}' has no effect", potion_id),
        }
        log::debug!("Used potion {}", potion_id);
        true
    }

    /// Count down buffs, dropping expired ones
    pub fn update_buffs(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        self.buffs.retain_mut(|buff| buff.tick(dt));
    }

    // Equipment

    fn hp_ratio(&self, data: &DataManager) -> f64 {
        let max = self.max_hp(data);
        if max > 0.0 {
            self.hp / max
        } else {
            1.0
        }
    }

    /// Equip an item directly. The displaced item (or a rejected
    /// consumable as `Err`) goes back to the caller. HP keeps its ratio to
    /// the new maximum.
    pub fn equip(&mut self, item: Item, data: &DataManager) -> Result<Option<Item>, Item> {
        let ratio = self.hp_ratio(data);
        let previous = self.equipment.equip(item)?;
        self.hp = self.max_hp(data) * ratio;
        Ok(previous)
    }

    /// Move an item from the inventory onto the player. The displaced
    /// item returns to the inventory.
    pub fn equip_from_inventory(&mut self, id: ItemId, data: &DataManager) -> bool {
        match self.inventory.get_by_id(id) {
            Some(item) if item.slot.is_equippable() => {}
            _ => return false,
        }
        let Some(item) = self.inventory.remove_by_id(id) else {
            return false;
        };

        match self.equip(item, data) {
            Ok(Some(previous)) => self.return_to_inventory(previous),
            Ok(None) => {}
            Err(item) => self.return_to_inventory(item),
        }
        true
    }

    /// Move an equipped item back to the inventory
    pub fn unequip_to_inventory(&mut self, slot: EquipSlot, data: &DataManager) -> bool {
        if self.equipment.is_empty(slot) || self.inventory.is_full() {
            return false;
        }
        let ratio = self.hp_ratio(data);
        if let Some(item) = self.equipment.unequip(slot) {
            self.return_to_inventory(item);
        }
        self.hp = self.max_hp(data) * ratio;
        true
    }

    fn return_to_inventory(&mut self, item: Item) {
        if let Err(item) = self.inventory.add_item(item) {
            log::warn!("Inventory full, {} was lost", item.name);
        }
    }

    // Stations

    pub fn has_station(&self, station_id: &str) -> bool {
        self.unlocked_stations.contains(station_id)
    }

    pub fn unlock_station(&mut self, station_id: &str) -> bool {
        self.unlocked_stations.insert(station_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemGenerator, ItemOptions};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_player() {
        let player = Player::new("Tester");
        assert_eq!(player.level, 1);
        assert_eq!(player.xp_to_next_level, 100);
        assert_eq!(player.hp, 30.0);
        assert_eq!(player.inventory.capacity(), 40);
        assert_eq!(player.base_stats.get(StatId::CritDamage), 150.0);
    }

    #[test]
    fn test_resources_never_hold_zero() {
        let mut player = Player::new("Tester");
        player.add_resource("softwood", 3);
        assert!(!player.consume_resource("softwood", 4));
        assert_eq!(player.resource_count("softwood"), 3);
        assert!(player.consume_resource("softwood", 3));
        assert!(!player.resources.contains_key("softwood"));
        player.add_resource("softwood", 0);
        assert!(player.resources.is_empty());
    }

    #[test]
    fn test_level_up_carries_xp_and_heals() {
        let data = DataManager::default();
        let mut player = Player::new("Tester");
        player.hp = 5.0;

        let levels = player.add_xp(120, &data);
        assert_eq!(levels, 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 20);
        assert_eq!(player.xp_to_next_level, 273);
        assert_eq!(player.base_stats.get(StatId::HpMax), 34.0);
        assert_eq!(player.hp, player.max_hp(&data));
    }

    #[test]
    fn test_gain_bonuses() {
        let data = DataManager::default();
        let mut player = Player::new("Tester");
        player.base_stats.set(StatId::GoldGain, 50.0);
        assert_eq!(player.add_gold(10, &data), 15);
        assert_eq!(player.gold, 15);

        player.base_stats.set(StatId::XpGain, 100.0);
        player.add_xp(30, &data);
        assert_eq!(player.xp, 60);
    }

    #[test]
    fn test_potions() {
        let data = DataManager::default();
        let mut player = Player::new("Tester");
        assert!(!player.use_potion("minor_healing_potion", &data));

        player.hp = 1.0;
        player.add_potion("minor_healing_potion", 1);
        assert!(player.use_potion("minor_healing_potion", &data));
        assert_eq!(player.hp, 26.0);
        assert!(!player.potions.contains_key("minor_healing_potion"));

        player.add_potion("strength_tonic", 2);
        assert!(player.use_potion("strength_tonic", &data));
        assert_eq!(player.potion_count("strength_tonic"), 1);
        assert_eq!(player.total_stats(&data).get(StatId::Atk), 6.0);

        player.update_buffs(59.0);
        assert_eq!(player.buffs.len(), 1);
        player.update_buffs(1.0);
        assert!(player.buffs.is_empty());
        assert_eq!(player.total_stats(&data).get(StatId::Atk), 3.0);
    }

    #[test]
    fn test_zone_environment_effects() {
        let data = DataManager::default();
        let mut player = Player::new("Tester");
        assert_eq!(player.total_stats(&data).get(StatId::Evasion), 0.0);
        player.current_zone_id = "whispering_woods".to_string();
        assert_eq!(player.total_stats(&data).get(StatId::Evasion), -2.0);
    }

    #[test]
    fn test_equip_from_inventory_moves_ownership() {
        let data = DataManager::default();
        let generator = ItemGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(9);
        let mut player = Player::new("Tester");

        let first = generator.generate("padded_vest", ItemOptions::default(), &mut rng).unwrap();
        let second = generator.generate("padded_vest", ItemOptions::default(), &mut rng).unwrap();
        let (first_id, second_id) = (first.id, second.id);
        player.inventory.add_item(first).unwrap();
        player.inventory.add_item(second).unwrap();

        assert!(player.equip_from_inventory(first_id, &data));
        assert_eq!(player.inventory.count(), 1);
        assert_eq!(player.equipment.get(EquipSlot::Chest).map(|i| i.id), Some(first_id));

        assert!(player.equip_from_inventory(second_id, &data));
        assert_eq!(player.equipment.get(EquipSlot::Chest).map(|i| i.id), Some(second_id));
        let back = player.inventory.get_by_id(first_id).unwrap();
        assert!(!back.equipped);
        assert_eq!(player.inventory.count(), 1);
        assert!(player.hp <= player.max_hp(&data));
    }

    #[test]
    fn test_consumables_cannot_be_equipped() {
        let data = DataManager::default();
        let generator = ItemGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(2);
        let mut player = Player::new("Tester");
        let potion = generator
            .generate("minor_healing_potion", ItemOptions::default(), &mut rng)
            .unwrap();
        let id = potion.id;
        player.inventory.add_item(potion).unwrap();
        assert!(!player.equip_from_inventory(id, &data));
        assert_eq!(player.inventory.count(), 1);
    }

    #[test]
    fn test_gold_loss() {
        let mut player = Player::new("Tester");
        player.gold = 100;
        assert_eq!(player.lose_gold_fraction(0.2), 20);
        assert_eq!(player.gold, 80);
        assert!(!player.spend_gold(81));
        assert!(player.spend_gold(80));
        assert_eq!(player.gold, 0);
    }
}
