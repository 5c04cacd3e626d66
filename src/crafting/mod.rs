//! Crafting, reforging and dismantling

pub mod system;

pub use system::{
    dismantle_resource, CraftError, CraftOptions, CraftOutcome, CraftingSystem, RecipeAvailability, ReforgeError,
};
