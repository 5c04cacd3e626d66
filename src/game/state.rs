//! Game session
//!
//! Owns the reference data, the RNG, the player and every system, and
//! advances them once per frame. Player commands (crafting, unlocks,
//! zone travel) go through here so the systems always see the same
//! player and data.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::time::IntervalTimer;
use crate::combat::{CombatOutcome, CombatSystem, VictoryRewards};
use crate::crafting::{CraftError, CraftOptions, CraftOutcome, CraftingSystem, ReforgeError};
use crate::data::{DataManager, RecipeOutput, ResourceQty};
use crate::entities::Player;
use crate::gathering::{GatheringSystem, HarvestReward, DEFAULT_NODE_COUNT};
use crate::items::{EquipSlot, Item, ItemGenerator, ItemId};
use crate::progression::{SkillSystem, StationUpgradeSystem, UnlockError};
use crate::save::{self, SaveData, SaveError, SAVE_VERSION};

/// Seconds between automatic saves
pub const AUTO_SAVE_INTERVAL: f64 = 30.0;
/// Fraction of max HP restored after a death
pub const RESPAWN_HP_RATIO: f64 = 0.5;
/// Fraction of gold lost on death
pub const DEATH_GOLD_PENALTY: f64 = 0.1;

pub const STARTER_STATION: &str = "workbench";
const STARTER_RESOURCES: [(&str, u32); 3] = [("softwood", 3), ("rough_stone", 3), ("wild_fibers", 2)];
const STARTER_GOLD: u64 = 10;

const MAX_MESSAGES: usize = 100;

/// Which activity the session is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameMode {
    #[default]
    Combat,
    Gathering,
}

/// A message for the activity feed
#[derive(Debug, Clone, PartialEq)]
pub struct GameMessage {
    pub text: String,
    pub timestamp: f64,
    pub category: MessageCategory,
}

/// Categories for message filtering/coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Combat,
    Gathering,
    Crafting,
    Item,
    System,
}

/// The main game struct that holds all game data
pub struct Game {
    data: DataManager,
    /// Random number generator (seeded for reproducibility)
    rng: StdRng,
    player: Player,
    combat: CombatSystem,
    gathering: GatheringSystem,
    skills: SkillSystem,
    upgrades: StationUpgradeSystem,
    mode: GameMode,
    messages: Vec<GameMessage>,
    play_time: f64,
    auto_save: IntervalTimer,
    save_path: Option<PathBuf>,
}

impl Game {
    /// Start a fresh character with the starter kit
    pub fn new_game(name: impl Into<String>, data: DataManager, seed: Option<u64>) -> Self {
        let mut game = Self::with_player(Player::new(name), data, seed);
        game.give_starter_kit();
        game.start_session();
        log::info!("New game started for {}", game.player.name);
        game
    }

    /// Resume from a save document
    pub fn from_save(save: SaveData, data: DataManager, seed: Option<u64>) -> Self {
        let mut game = Self::with_player(save.player, data, seed);
        game.skills = SkillSystem::from_unlocked(save.skills.unwrap_or_default());
        game.upgrades = StationUpgradeSystem::from_levels(save.station_upgrades.unwrap_or_default());
        game.player.clamp_hp(&game.data);
        game.start_session();
        log::info!("Resumed {} at level {}", game.player.name, game.player.level);
        game
    }

    fn with_player(player: Player, data: DataManager, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            data,
            rng,
            player,
            combat: CombatSystem::new(),
            gathering: GatheringSystem::new(),
            skills: SkillSystem::new(),
            upgrades: StationUpgradeSystem::new(),
            mode: GameMode::Combat,
            messages: Vec::new(),
            play_time: 0.0,
            auto_save: IntervalTimer::new(AUTO_SAVE_INTERVAL),
            save_path: None,
        }
    }

    fn give_starter_kit(&mut self) {
        let starter = ItemGenerator::new(&self.data).generate_starter_equipment(&mut self.rng);
        for item in starter {
            match self.player.equip(item, &self.data) {
                Ok(None) => {}
                Ok(Some(item)) | Err(item) => self.store_item(item),
            }
        }
        for (resource, qty) in STARTER_RESOURCES {
            self.player.add_resource(resource, qty);
        }
        self.player.gold += STARTER_GOLD;
        self.player.unlock_station(STARTER_STATION);
        self.player.hp = self.player.max_hp(&self.data);
    }

    /// Spawn nodes and the first enemy in the player's zone. A zone that no
    /// longer exists sends the player to the first known zone.
    fn start_session(&mut self) {
        if self.data.zone(&self.player.current_zone_id).is_none() {
            if let Some(zone) = self.data.zones.first() {
                log::warn!(
                    "Unknown zone '{}', moving to {}",
                    self.player.current_zone_id,
                    zone.id
                );
                self.player.current_zone_id = zone.id.clone();
            }
        }
        let zone_id = self.player.current_zone_id.clone();
        self.gathering.spawn_nodes(&zone_id, DEFAULT_NODE_COUNT, &self.data, &mut self.rng);
        self.start_encounter(false);
    }

    // Accessors

    pub fn data(&self) -> &DataManager {
        &self.data
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn combat(&self) -> &CombatSystem {
        &self.combat
    }

    pub fn gathering(&self) -> &GatheringSystem {
        &self.gathering
    }

    pub fn skills(&self) -> &SkillSystem {
        &self.skills
    }

    pub fn upgrades(&self) -> &StationUpgradeSystem {
        &self.upgrades
    }

    pub fn crafting(&self) -> CraftingSystem<'_> {
        CraftingSystem::new(&self.data)
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn messages(&self) -> &[GameMessage] {
        &self.messages
    }

    /// Simulated seconds since the session started
    pub fn play_time(&self) -> f64 {
        self.play_time
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    /// Enable auto-save to `path`, or disable it with `None`
    pub fn set_save_path(&mut self, path: Option<PathBuf>) {
        self.save_path = path;
        self.auto_save.reset();
    }

    /// Add a message to the feed
    pub fn add_message(&mut self, text: impl Into<String>, category: MessageCategory) {
        self.messages.push(GameMessage {
            text: text.into(),
            timestamp: self.play_time,
            category,
        });

        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    // Frame update

    /// Advance the session by `dt` seconds: gathering respawns, then buffs,
    /// then combat (only in combat mode), then auto-save. Returns the
    /// combat outcome if an encounter resolved this frame.
    pub fn update(&mut self, dt: f64) -> Option<CombatOutcome> {
        let dt = dt.max(0.0);
        self.play_time += dt;

        self.gathering.update(dt);
        self.player.update_buffs(dt);

        let mut outcome = None;
        if self.mode == GameMode::Combat {
            outcome = self.combat.update(dt, &mut self.player, &self.data, &mut self.rng);
            match &outcome {
                Some(CombatOutcome::Victory(rewards)) => {
                    self.collect_victory(rewards);
                    self.start_encounter(false);
                }
                Some(CombatOutcome::PlayerDied) => {
                    self.respawn();
                    self.start_encounter(false);
                }
                None => {}
            }
        }

        if self.auto_save.update(dt) {
            self.auto_save_now();
        }
        outcome
    }

    fn collect_victory(&mut self, rewards: &VictoryRewards) {
        self.add_message(
            format!("Defeated {}: +{} xp, +{} gold", rewards.enemy_name, rewards.xp, rewards.gold),
            MessageCategory::Combat,
        );
        for drop in &rewards.resources {
            self.add_message(format!("Looted {}x {}", drop.qty, drop.resource), MessageCategory::Item);
        }
        if rewards.levels_gained > 0 {
            self.add_message(format!("Reached level {}", self.player.level), MessageCategory::System);
        }
        if let Some(item) = &rewards.item {
            self.add_message(format!("Found {}", item.name), MessageCategory::Item);
            self.store_item(item.clone());
        }
    }

    /// Consumables go to the potion counts, everything else to the
    /// inventory
    fn store_item(&mut self, item: Item) {
        if item.is_consumable() {
            self.player.add_potion(&item.base_id, 1);
            return;
        }
        if let Err(item) = self.player.inventory.add_item(item) {
            log::warn!("Inventory full, {} was lost", item.name);
            self.add_message(format!("No room for {}", item.name), MessageCategory::Item);
        }
    }

    fn respawn(&mut self) {
        self.player.hp = self.player.max_hp(&self.data) * RESPAWN_HP_RATIO;
        let lost = self.player.lose_gold_fraction(DEATH_GOLD_PENALTY);
        log::info!("{} died and lost {} gold", self.player.name, lost);
        self.add_message(format!("You died! Lost {} gold", lost), MessageCategory::Combat);
    }

    fn auto_save_now(&mut self) {
        let Some(path) = self.save_path.clone() else {
            return;
        };
        if let Err(e) = save::save_to_path(&self.to_save(), &path) {
            log::warn!("Auto-save failed: {}", e);
        }
    }

    // Combat commands

    /// Start a new encounter in the current zone
    pub fn start_encounter(&mut self, boss: bool) -> bool {
        let zone_id = self.player.current_zone_id.clone();
        self.combat
            .start(&zone_id, boss, self.player.level, &self.data, &mut self.rng)
    }

    /// Replace the current fight with the zone boss
    pub fn spawn_boss(&mut self) -> bool {
        self.start_encounter(true)
    }

    pub fn flee(&mut self) -> Option<u64> {
        let lost = self.combat.flee(&mut self.player)?;
        self.add_message(format!("You fled and lost {} gold", lost), MessageCategory::Combat);
        Some(lost)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.combat.toggle_pause()
    }

    // Modes and zones

    /// Switch activity. Entering gathering spawns nodes if there are none;
    /// entering combat starts a fight if none is running.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        match mode {
            GameMode::Gathering => {
                if self.gathering.nodes().is_empty() {
                    let zone_id = self.player.current_zone_id.clone();
                    self.gathering
                        .spawn_nodes(&zone_id, DEFAULT_NODE_COUNT, &self.data, &mut self.rng);
                }
            }
            GameMode::Combat => {
                if !self.combat.is_active() && !self.combat.is_paused() {
                    self.start_encounter(false);
                }
            }
        }
    }

    /// Travel to a zone: nodes respawn and the current fight is replaced
    pub fn change_zone(&mut self, zone_id: &str) -> bool {
        let Some(zone) = self.data.zone(zone_id) else {
            log::warn!("Cannot travel to unknown zone '{}'", zone_id);
            return false;
        };
        let name = zone.name.clone();

        self.player.current_zone_id = zone_id.to_string();
        self.player.clamp_hp(&self.data);
        self.gathering
            .spawn_nodes(zone_id, DEFAULT_NODE_COUNT, &self.data, &mut self.rng);
        self.start_encounter(false);

        log::info!("Travelled to {}", name);
        self.add_message(format!("Travelled to {}", name), MessageCategory::System);
        true
    }

    /// Move to the next (`direction > 0`) or previous zone, wrapping around
    pub fn cycle_zone(&mut self, direction: i32) -> bool {
        let zones = &self.data.zones;
        if zones.is_empty() {
            return false;
        }
        let current = zones
            .iter()
            .position(|z| z.id == self.player.current_zone_id)
            .unwrap_or(0);
        let next = (current as i64 + direction as i64).rem_euclid(zones.len() as i64) as usize;
        let zone_id = zones[next].id.clone();
        self.change_zone(&zone_id)
    }

    // Gathering commands

    pub fn harvest(&mut self, index: usize) -> Option<HarvestReward> {
        let reward = self
            .gathering
            .harvest(index, &mut self.player, &self.data, &mut self.rng)?;
        self.add_message(
            format!("Gathered {}x {} from {}", reward.quantity, reward.resource_id, reward.node_name),
            MessageCategory::Gathering,
        );
        Some(reward)
    }

    /// Hit the first node that isn't depleted
    pub fn harvest_next(&mut self) -> Option<HarvestReward> {
        let index = self.gathering.first_available()?;
        self.harvest(index)
    }

    // Crafting commands

    fn produces_equipment(&self, recipe_id: &str) -> bool {
        let Some(RecipeOutput::Item { item_base }) = self.data.recipe(recipe_id).and_then(|r| r.outputs.first())
        else {
            return false;
        };
        self.data
            .item_base(item_base)
            .map_or(false, |base| base.slot != crate::items::ItemSlot::Consumable)
    }

    /// Craft a recipe. Crafted equipment lands in the inventory, which
    /// must have room before anything is spent.
    pub fn craft(&mut self, recipe_id: &str, options: CraftOptions<'_>) -> Result<CraftOutcome, CraftError> {
        let crafting = CraftingSystem::new(&self.data);
        crafting.can_craft(recipe_id, &self.player)?;
        if self.player.inventory.is_full() && self.produces_equipment(recipe_id) {
            return Err(CraftError::InventoryFull);
        }
        let outcome = crafting.craft(recipe_id, &mut self.player, options, &mut self.rng)?;

        let text = match &outcome {
            CraftOutcome::Item { item, .. } => {
                self.store_item(item.clone());
                format!("Crafted {}", item.name)
            }
            CraftOutcome::Potion { potion_id, .. } => format!("Brewed {}", potion_id),
            CraftOutcome::Resource(output) => format!("Made {}x {}", output.qty, output.resource),
        };
        self.add_message(text, MessageCategory::Crafting);
        Ok(outcome)
    }

    /// Reroll the affixes of an inventory item
    pub fn reforge(&mut self, item_id: ItemId) -> Result<(), ReforgeError> {
        let mut item = self
            .player
            .inventory
            .get_by_id(item_id)
            .cloned()
            .ok_or(ReforgeError::ItemNotFound)?;
        CraftingSystem::new(&self.data).reforge(&mut item, &mut self.player, &mut self.rng)?;

        let name = item.name.clone();
        if let Some(slot) = self.player.inventory.get_by_id_mut(item_id) {
            *slot = item;
        }
        self.add_message(format!("Reforged {}", name), MessageCategory::Crafting);
        Ok(())
    }

    /// Break down an inventory item
    pub fn dismantle(&mut self, item_id: ItemId) -> Option<ResourceQty> {
        let item = self.player.inventory.remove_by_id(item_id)?;
        let output = CraftingSystem::new(&self.data).dismantle(&item, &mut self.player);
        self.add_message(
            format!("Dismantled {} into {}x {}", item.name, output.qty, output.resource),
            MessageCategory::Crafting,
        );
        Some(output)
    }

    pub fn unlock_station(&mut self, station_id: &str) -> Result<(), CraftError> {
        CraftingSystem::new(&self.data).unlock_station(station_id, &mut self.player)?;
        self.add_message(format!("Unlocked {}", station_id), MessageCategory::Crafting);
        Ok(())
    }

    // Progression commands

    pub fn unlock_skill(&mut self, skill_id: &str) -> Result<(), UnlockError> {
        self.skills.unlock(skill_id, &mut self.player, &self.data)?;
        self.add_message(format!("Learned {}", skill_id), MessageCategory::System);
        Ok(())
    }

    pub fn upgrade_station(&mut self, station_id: &str) -> Result<u32, UnlockError> {
        let level = self.upgrades.upgrade(station_id, &mut self.player, &self.data)?;
        self.add_message(format!("{} is now level {}", station_id, level), MessageCategory::Crafting);
        Ok(level)
    }

    // Items

    pub fn use_potion(&mut self, potion_id: &str) -> bool {
        self.player.use_potion(potion_id, &self.data)
    }

    pub fn equip(&mut self, item_id: ItemId) -> bool {
        self.player.equip_from_inventory(item_id, &self.data)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> bool {
        self.player.unequip_to_inventory(slot, &self.data)
    }

    // Persistence

    pub fn to_save(&self) -> SaveData {
        SaveData {
            version: SAVE_VERSION,
            player: self.player.clone(),
            skills: Some(self.skills.unlocked_ids().to_vec()),
            station_upgrades: Some(self.upgrades.levels().clone()),
        }
    }

    /// Save to the configured save path
    pub fn save(&self) -> Result<(), SaveError> {
        let path = self
            .save_path
            .as_deref()
            .ok_or_else(|| SaveError::InvalidData("No save path configured".to_string()))?;
        save::save_to_path(&self.to_save(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatState;
    use crate::items::{ItemOptions, INVENTORY_SIZE};
    use tempfile::tempdir;

    fn new_game() -> Game {
        Game::new_game("Tester", DataManager::default(), Some(42))
    }

    #[test]
    fn test_starter_kit() {
        let game = new_game();
        let player = game.player();
        assert_eq!(player.equipment.count(), 3);
        assert_eq!(player.resource_count("softwood"), 3);
        assert_eq!(player.resource_count("rough_stone"), 3);
        assert_eq!(player.resource_count("wild_fibers"), 2);
        assert_eq!(player.gold, 10);
        assert!(player.has_station("workbench"));
        assert_eq!(player.hp, player.max_hp(game.data()));

        assert!(game.combat().is_active());
        assert_eq!(game.gathering().nodes().len(), DEFAULT_NODE_COUNT);
    }

    #[test]
    fn test_death_respawn_policy() {
        let mut game = new_game();
        // No gear, so nothing can dodge or block the killing blow
        game.player.equipment = crate::items::Equipment::new();
        game.player.gold = 100;
        game.player.hp = 0.5;

        let mut first = None;
        for _ in 0..200 {
            if let Some(outcome) = game.update(0.25) {
                first = Some(outcome);
                break;
            }
        }

        assert_eq!(first, Some(CombatOutcome::PlayerDied));
        let max = game.player.max_hp(&game.data);
        assert!((game.player.hp - max * RESPAWN_HP_RATIO).abs() < 1e-9);
        assert_eq!(game.player.gold, 90);
        assert_eq!(game.player.combat_stats.deaths, 1);
        assert!(game.combat().is_active());
    }

    #[test]
    fn test_combat_only_runs_in_combat_mode() {
        let mut game = new_game();
        game.set_mode(GameMode::Gathering);
        let before = game.combat().fight_time();
        game.update(5.0);
        assert_eq!(game.combat().fight_time(), before);

        game.set_mode(GameMode::Combat);
        game.update(0.5);
        assert!(game.combat().fight_time() > before);
    }

    #[test]
    fn test_flee_and_restart() {
        let mut game = new_game();
        game.player.gold = 100;
        assert_eq!(game.flee(), Some(20));
        assert_eq!(game.player.gold, 80);
        assert_eq!(game.combat().state(), CombatState::Resolved(crate::combat::Resolution::Fled));

        assert_eq!(game.update(1.0), None);
        game.set_mode(GameMode::Combat);
        assert!(game.combat().is_active());
    }

    #[test]
    fn test_store_item() {
        let mut game = new_game();
        let generator = ItemGenerator::new(&game.data);
        let potion = generator
            .generate("minor_healing_potion", ItemOptions::default(), &mut game.rng)
            .unwrap();
        let sword = generator
            .generate("rusty_sword", ItemOptions::default(), &mut game.rng)
            .unwrap();

        game.store_item(potion);
        game.store_item(sword);
        assert_eq!(game.player.potion_count("minor_healing_potion"), 1);
        assert_eq!(game.player.inventory.count(), 1);
    }

    #[test]
    fn test_craft_needs_inventory_room() {
        let mut game = new_game();
        game.player.add_resource("softwood", 50);
        game.player.add_resource("rough_stone", 50);
        game.player.gold = 500;

        let sword = ItemGenerator::new(&game.data)
            .generate("rusty_sword", ItemOptions::default(), &mut game.rng)
            .unwrap();
        while !game.player.inventory.is_full() {
            game.player.inventory.add_item(sword.clone()).unwrap();
        }
        let before = game.player.clone();

        assert_eq!(
            game.craft("craft_rusty_sword", CraftOptions::default()),
            Err(CraftError::InventoryFull)
        );
        assert_eq!(game.player, before);

        // Processed resources don't need room
        assert!(game.craft("saw_planks", CraftOptions::default()).is_ok());

        game.player.inventory.remove_by_id(sword.id);
        let outcome = game.craft("craft_rusty_sword", CraftOptions::default()).unwrap();
        assert!(matches!(outcome, CraftOutcome::Item { .. }));
        assert_eq!(game.player.inventory.count(), INVENTORY_SIZE);
    }

    #[test]
    fn test_change_zone() {
        let mut game = new_game();
        assert!(game.change_zone("whispering_woods"));
        assert_eq!(game.player().current_zone_id, "whispering_woods");
        assert!(game.gathering().nodes().iter().all(|n| n.tier == "t2"));
        let enemy = game.combat().enemy().unwrap();
        assert_eq!(enemy.tier, "t2");

        assert!(!game.change_zone("nowhere"));
        assert_eq!(game.player().current_zone_id, "whispering_woods");

        assert!(game.cycle_zone(-1));
        assert_eq!(game.player().current_zone_id, "sprouting_meadow");
        assert!(game.cycle_zone(-1));
        assert_eq!(game.player().current_zone_id, "crystal_caverns");
    }

    #[test]
    fn test_reforge_and_dismantle() {
        let mut game = new_game();
        let sword = ItemGenerator::new(&game.data)
            .generate("rusty_sword", ItemOptions { rarity: Some("rare"), ..ItemOptions::default() }, &mut game.rng)
            .unwrap();
        let id = sword.id;
        game.player.inventory.add_item(sword).unwrap();
        game.player.gold = 10_000;

        let cost = game.crafting().reforge_cost(game.player.inventory.get_by_id(id).unwrap(), &game.player);
        game.reforge(id).unwrap();
        assert_eq!(game.player.gold, 10_000 - cost);
        let reforged = game.player.inventory.get_by_id(id).unwrap();
        assert_eq!(reforged.rarity, "rare");
        assert_eq!(game.player.inventory.count(), 1);

        let output = game.dismantle(id).unwrap();
        assert!(output.qty >= 1);
        assert_eq!(game.player.inventory.count(), 0);
        assert_eq!(game.dismantle(id), None);
        assert_eq!(game.reforge(id), Err(ReforgeError::ItemNotFound));
    }

    #[test]
    fn test_save_round_trip() {
        let mut game = new_game();
        game.player.level = 3;
        game.player.gold = 200;
        game.unlock_skill("sharpened_mind").unwrap();
        game.player.add_resource("softwood", 10);
        game.upgrade_station("workbench").unwrap();

        let save = game.to_save();
        let restored = Game::from_save(save.clone(), DataManager::default(), Some(7));
        assert_eq!(restored.player(), game.player());
        assert!(restored.skills().is_unlocked("sharpened_mind"));
        assert_eq!(restored.upgrades().level("workbench"), 1);
        assert_eq!(restored.to_save(), save);
    }

    #[test]
    fn test_auto_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auto.json");
        let mut game = new_game();
        game.set_mode(GameMode::Gathering);

        game.update(AUTO_SAVE_INTERVAL - 1.0);
        assert!(!path.exists());

        game.set_save_path(Some(path.clone()));
        game.update(AUTO_SAVE_INTERVAL + 1.0);
        assert!(path.exists());
        let loaded = save::load_from_path(&path).unwrap();
        assert_eq!(&loaded.player, game.player());
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut game = new_game();
        game.update(-10.0);
        assert_eq!(game.play_time(), 0.0);
        assert!(game.save().is_err());
    }
}
