//! Crafting engine
//!
//! Recipe validation, atomic cost consumption, output resolution, plus the
//! reforge and dismantle economy and station unlocks. Every check runs
//! before anything is consumed, so a failed call never mutates the player.

use rand::Rng;
use thiserror::Error;

use crate::data::{tier_number, DataManager, RecipeDef, RecipeOutput, ResourceQty};
use crate::entities::Player;
use crate::items::{next_quality, roll_quality, Item, ItemGenerator, ItemOptions};
use crate::progression::difficulty::RecipeCosts;
use crate::stats::StatId;

/// Crafting XP per tier of the produced item
pub const CRAFT_XP_PER_TIER: u64 = 20;
/// Craft speed (as a fraction) needed before quality upgrades can happen
pub const QUALITY_UPGRADE_THRESHOLD: f64 = 0.2;
pub const QUALITY_UPGRADE_CHANCE: f64 = 0.1;

/// Resource granted when dismantling an item without a known material
pub const FALLBACK_DISMANTLE_RESOURCE: &str = "rough_stone";

/// Reasons a craft or station unlock was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    #[error("Unknown recipe '{0}'")]
    UnknownRecipe(String),

    #[error("Unknown station '{0}'")]
    UnknownStation(String),

    #[error("Requires {0}")]
    StationLocked(String),

    #[error("{0} is already unlocked")]
    AlreadyUnlocked(String),

    #[error("Requires level {0}")]
    LevelTooLow(u32),

    #[error("Missing {qty}x {name}")]
    MissingResource { name: String, qty: u32 },

    #[error("Missing {0} gold")]
    MissingGold(u64),

    #[error("Recipe '{0}' produces nothing")]
    NothingToProduce(String),

    #[error("Unknown item base '{0}'")]
    UnknownItemBase(String),

    #[error("Inventory is full")]
    InventoryFull,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReforgeError {
    #[error("Item not found")]
    ItemNotFound,

    #[error("Reforging costs {cost} gold, you have {available}")]
    InsufficientGold { cost: u64, available: u64 },

    #[error("Unknown item base '{0}'")]
    UnknownItemBase(String),
}

/// What a successful craft produced
#[derive(Debug, Clone, PartialEq)]
pub enum CraftOutcome {
    /// A new item for the caller to place
    Item { item: Item, xp: u64 },
    /// A consumable, already added to the player's potion counts
    Potion { potion_id: String, xp: u64 },
    /// A processed resource, already added to the player
    Resource(ResourceQty),
}

/// Forced rarity/quality for a craft
#[derive(Debug, Clone, Copy, Default)]
pub struct CraftOptions<'o> {
    pub rarity: Option<&'o str>,
    pub quality: Option<&'o str>,
}

/// A recipe the player can see, with its scaled costs and whether it can
/// be crafted right now
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeAvailability<'a> {
    pub recipe: &'a RecipeDef,
    pub costs: RecipeCosts,
    pub status: Result<(), CraftError>,
}

impl RecipeAvailability<'_> {
    pub fn can_craft(&self) -> bool {
        self.status.is_ok()
    }

    /// "OK" or the refusal reason
    pub fn reason(&self) -> String {
        match &self.status {
            Ok(()) => "OK".to_string(),
            Err(e) => e.to_string(),
        }
    }
}

/// Resource recovered from an item of the given material
pub fn dismantle_resource(material: Option<&str>) -> &'static str {
    match material {
        Some("wood") => "softwood",
        Some("metal") => "iron_ore",
        Some("cloth") => "wild_fibers",
        Some("leather") => "raw_leather",
        _ => FALLBACK_DISMANTLE_RESOURCE,
    }
}

pub struct CraftingSystem<'a> {
    data: &'a DataManager,
}

impl<'a> CraftingSystem<'a> {
    pub fn new(data: &'a DataManager) -> Self {
        Self { data }
    }

    fn resource_name(&self, id: &str) -> String {
        self.data
            .resource(id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn station_name(&self, id: &str) -> String {
        self.data
            .station(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Recipe costs after difficulty scaling
    pub fn recipe_costs(&self, recipe: &RecipeDef) -> RecipeCosts {
        self.data.difficulty.scaled_recipe_costs(recipe)
    }

    /// Check, in order: recipe exists, station unlocked, level, each input,
    /// gold. The first failure is returned.
    pub fn can_craft(&self, recipe_id: &str, player: &Player) -> Result<(), CraftError> {
        let recipe = self
            .data
            .recipe(recipe_id)
            .ok_or_else(|| CraftError::UnknownRecipe(recipe_id.to_string()))?;
        self.check_recipe(recipe, &self.recipe_costs(recipe), player)
    }

    fn check_recipe(&self, recipe: &RecipeDef, costs: &RecipeCosts, player: &Player) -> Result<(), CraftError> {
        if let Some(station) = &recipe.station {
            if !player.has_station(station) {
                return Err(CraftError::StationLocked(self.station_name(station)));
            }
        }

        if player.level < recipe.level_required {
            return Err(CraftError::LevelTooLow(recipe.level_required));
        }

        for input in &costs.inputs {
            if !player.has_resource(&input.resource, input.qty) {
                return Err(CraftError::MissingResource {
                    name: self.resource_name(&input.resource),
                    qty: input.qty,
                });
            }
        }

        if player.gold < costs.gold {
            return Err(CraftError::MissingGold(costs.gold - player.gold));
        }
        Ok(())
    }

    /// Craft a recipe's first output. Costs are only consumed once every
    /// check has passed and the output is known to be producible.
    pub fn craft(
        &self,
        recipe_id: &str,
        player: &mut Player,
        options: CraftOptions<'_>,
        rng: &mut impl Rng,
    ) -> Result<CraftOutcome, CraftError> {
        let recipe = self
            .data
            .recipe(recipe_id)
            .ok_or_else(|| CraftError::UnknownRecipe(recipe_id.to_string()))?;
        let costs = self.recipe_costs(recipe);
        self.check_recipe(recipe, &costs, player)?;

        let output = recipe
            .outputs
            .first()
            .ok_or_else(|| CraftError::NothingToProduce(recipe.id.clone()))?;
        if let RecipeOutput::Item { item_base } = output {
            if self.data.item_base(item_base).is_none() {
                return Err(CraftError::UnknownItemBase(item_base.clone()));
            }
        }

        for input in &costs.inputs {
            player.consume_resource(&input.resource, input.qty);
        }
        player.spend_gold(costs.gold);

        match output {
            RecipeOutput::Resource { resource, qty } => {
                player.add_resource(resource, *qty);
                log::debug!("Crafted {}x {}", qty, resource);
                Ok(CraftOutcome::Resource(ResourceQty {
                    resource: resource.clone(),
                    qty: *qty,
                }))
            }
            RecipeOutput::Item { item_base } => {
                let item = self.craft_item(item_base, player, options, rng)?;
                let xp = CRAFT_XP_PER_TIER * tier_number(&item.tier) as u64;
                player.add_xp(xp, self.data);
                log::debug!("Crafted {}", item.summary());

                if item.is_consumable() {
                    player.add_potion(&item.base_id, 1);
                    Ok(CraftOutcome::Potion {
                        potion_id: item.base_id,
                        xp,
                    })
                } else {
                    Ok(CraftOutcome::Item { item, xp })
                }
            }
        }
    }

    /// Generate the crafted item. A high enough craft speed gives a small
    /// chance to bump the quality one step before the stats are rolled.
    fn craft_item(
        &self,
        item_base: &str,
        player: &Player,
        options: CraftOptions<'_>,
        rng: &mut impl Rng,
    ) -> Result<Item, CraftError> {
        let craft_bonus = player.total_stats(self.data).get(StatId::CraftSpeed) / 100.0;
        let mut quality = options.quality.unwrap_or_else(|| roll_quality(rng));
        // Bumped before generation so the rolled stats and gold value use the
        // upgraded quality, not just the label.
        if craft_bonus > QUALITY_UPGRADE_THRESHOLD && rng.gen::<f64>() < QUALITY_UPGRADE_CHANCE {
            quality = next_quality(quality);
        }

        let item_options = ItemOptions {
            rarity: options.rarity,
            quality: Some(quality),
            ..ItemOptions::default()
        };
        ItemGenerator::new(self.data)
            .generate(item_base, item_options, rng)
            .ok_or_else(|| CraftError::UnknownItemBase(item_base.to_string()))
    }

    /// Gold a reforge would cost before the free-reroll roll
    pub fn reforge_cost(&self, item: &Item, player: &Player) -> u64 {
        let reduction = player.total_stats(self.data).get(StatId::RerollCostReduction) / 100.0;
        (item.gold_value as f64 * (1.0 - reduction)).max(0.0) as u64
    }

    /// Reroll an item's affixes, keeping base stats, tier, rarity and
    /// quality. Nothing changes if the player can't pay.
    pub fn reforge(&self, item: &mut Item, player: &mut Player, rng: &mut impl Rng) -> Result<(), ReforgeError> {
        let base = self
            .data
            .item_base(&item.base_id)
            .ok_or_else(|| ReforgeError::UnknownItemBase(item.base_id.clone()))?;
        let rarity = self.data.rarity(&item.rarity).cloned().unwrap_or_default();

        let mut cost = self.reforge_cost(item, player);
        let free_chance = player.total_stats(self.data).get(StatId::FreeRerollChance);
        if rng.gen::<f64>() * 100.0 < free_chance {
            cost = 0;
        }
        if !player.spend_gold(cost) {
            return Err(ReforgeError::InsufficientGold {
                cost,
                available: player.gold,
            });
        }

        let generator = ItemGenerator::new(self.data);
        item.affixes = generator.roll_affixes(&base.tags, item.tier_number(), &rarity, rng);
        item.power_score = item.compute_power_score(self.data.tier_or_default(&item.tier).base_power);

        log::debug!("Reforged for {} gold: {}", cost, item.summary());
        Ok(())
    }

    /// Break an item down into resources. Removing the item from wherever
    /// it lives is the caller's job.
    pub fn dismantle(&self, item: &Item, player: &mut Player) -> ResourceQty {
        let bonus = 1.0 + player.total_stats(self.data).get(StatId::DismantleBonus) / 100.0;
        let affix_mult = self.data.rarity(&item.rarity).map_or(1.0, |r| r.affix_mult);

        let amount = ((item.tier_number() as f64 * affix_mult * bonus) as u32).max(1);
        let resource = dismantle_resource(item.material.as_deref());
        player.add_resource(resource, amount);

        log::debug!("Dismantled {} into {}x {}", item.name, amount, resource);
        ResourceQty {
            resource: resource.to_string(),
            qty: amount,
        }
    }

    /// Recipes visible to the player, optionally for one station, in data
    /// order. Locked stations and recipes above the player's level are
    /// hidden.
    pub fn available_recipes(&self, player: &Player, station_id: Option<&str>) -> Vec<RecipeAvailability<'a>> {
        self.data
            .recipes
            .iter()
            .filter(|r| station_id.map_or(true, |s| r.station.as_deref() == Some(s)))
            .filter(|r| r.station.as_ref().map_or(true, |s| player.has_station(s)))
            .filter(|r| player.level >= r.level_required)
            .map(|recipe| {
                let costs = self.recipe_costs(recipe);
                let status = self.check_recipe(recipe, &costs, player);
                RecipeAvailability { recipe, costs, status }
            })
            .collect()
    }

    /// Check, in order: already unlocked, station exists, level, gold,
    /// resources. Costs are consumed only when every check passes.
    pub fn unlock_station(&self, station_id: &str, player: &mut Player) -> Result<(), CraftError> {
        if player.has_station(station_id) {
            return Err(CraftError::AlreadyUnlocked(self.station_name(station_id)));
        }
        let station = self
            .data
            .station(station_id)
            .ok_or_else(|| CraftError::UnknownStation(station_id.to_string()))?;

        if player.level < station.level_required {
            return Err(CraftError::LevelTooLow(station.level_required));
        }
        if player.gold < station.unlock_cost_gold {
            return Err(CraftError::MissingGold(station.unlock_cost_gold - player.gold));
        }
        for cost in &station.unlock_cost_resources {
            if !player.has_resource(&cost.resource, cost.qty) {
                return Err(CraftError::MissingResource {
                    name: self.resource_name(&cost.resource),
                    qty: cost.qty,
                });
            }
        }

        player.spend_gold(station.unlock_cost_gold);
        for cost in &station.unlock_cost_resources {
            player.consume_resource(&cost.resource, cost.qty);
        }
        player.unlock_station(station_id);
        log::info!("Unlocked station {}", station.name);
        Ok(())
    }
}
