//! Hardcore Idle - headless driver
//!
//! Runs an idle session for a number of simulated seconds, alternating
//! between fighting and gathering, then prints a summary.
//!
//! Configuration comes from the environment:
//! `IDLE_DATA_DIR` (reference data, default `assets/data`), `IDLE_SEED`,
//! `IDLE_SECONDS` (default 600), `IDLE_SAVE` (save file to resume from
//! and auto-save to) and `RUST_LOG`. `hardcore-idle export-data <dir>`
//! writes the built-in data as RON instead.

use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use hardcore_idle::combat::CombatOutcome;
use hardcore_idle::data::DataManager;
use hardcore_idle::game::{Game, GameMode};
use hardcore_idle::items::ItemSlot;
use hardcore_idle::progression::level_title;
use hardcore_idle::save;

/// Simulation step in seconds
const FRAME_DT: f64 = 0.1;
const DEFAULT_SECONDS: f64 = 600.0;
/// Seconds of fighting, then gathering, per cycle
const COMBAT_PHASE: f64 = 45.0;
const GATHER_PHASE: f64 = 15.0;
/// Seconds between harvest swings while gathering
const HARVEST_INTERVAL: f64 = 0.5;
/// Drink a healing potion below this HP fraction
const POTION_THRESHOLD: f64 = 0.35;

const GEAR_SLOTS: [ItemSlot; 7] = [
    ItemSlot::Weapon,
    ItemSlot::Helmet,
    ItemSlot::Chest,
    ItemSlot::Legs,
    ItemSlot::Boots,
    ItemSlot::Gloves,
    ItemSlot::Amulet,
];

fn main() -> Result<()> {
    init_logging();
    log::info!("Starting Hardcore Idle v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("export-data") {
        let dir = args.get(2).map_or_else(|| PathBuf::from("assets/data"), PathBuf::from);
        DataManager::export_default_data(&dir)
            .with_context(|| format!("exporting data to {}", dir.display()))?;
        println!("Default data written to {}", dir.display());
        return Ok(());
    }

    let data_dir = env::var("IDLE_DATA_DIR").unwrap_or_else(|_| "assets/data".to_string());
    let data = DataManager::load_from_dir(Path::new(&data_dir));
    let seed = match env::var("IDLE_SEED") {
        Ok(raw) => Some(raw.parse::<u64>().context("IDLE_SEED must be an integer")?),
        Err(_) => None,
    };
    let seconds = match env::var("IDLE_SECONDS") {
        Ok(raw) => raw.parse::<f64>().context("IDLE_SECONDS must be a number")?,
        Err(_) => DEFAULT_SECONDS,
    };
    let save_path = env::var("IDLE_SAVE").ok().map(PathBuf::from);

    let mut game = match &save_path {
        Some(path) if path.exists() => {
            let save = save::load_from_path(path).with_context(|| format!("loading {}", path.display()))?;
            Game::from_save(save, data, seed)
        }
        _ => Game::new_game("Wanderer", data, seed),
    };
    game.set_save_path(save_path);

    run_session(&mut game, seconds);

    if game.save_path().is_some() {
        game.save().context("final save")?;
    }
    print_summary(&game);

    log::info!("Hardcore Idle shut down cleanly");
    Ok(())
}

/// Log to a file so stdout stays clean for the summary
fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("hardcore-idle.log")
    {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Could not open log file, logging to stderr: {}", e),
    }
    builder.init();
}

fn run_session(game: &mut Game, seconds: f64) {
    let cycle = COMBAT_PHASE + GATHER_PHASE;
    let mut elapsed = 0.0;
    let mut harvest_timer = 0.0;

    while elapsed < seconds {
        let mode = if elapsed % cycle < COMBAT_PHASE {
            GameMode::Combat
        } else {
            GameMode::Gathering
        };
        if game.mode() != mode {
            game.set_mode(mode);
        }

        if mode == GameMode::Gathering {
            harvest_timer += FRAME_DT;
            if harvest_timer >= HARVEST_INTERVAL {
                harvest_timer = 0.0;
                game.harvest_next();
            }
        }

        if let Some(CombatOutcome::Victory(rewards)) = game.update(FRAME_DT) {
            if rewards.item.is_some() {
                equip_upgrades(game);
            }
        }
        drink_if_low(game);

        elapsed += FRAME_DT;
    }
}

/// Swap in any inventory item that beats what's worn in its slot
fn equip_upgrades(game: &mut Game) {
    for slot in GEAR_SLOTS {
        let player = game.player();
        let worn = player
            .equipment
            .items()
            .filter(|(_, item)| item.slot == slot)
            .map(|(_, item)| item.power_score)
            .fold(0.0, f64::max);
        let candidate = player
            .inventory
            .best_by_power(|item| item.slot == slot && item.level_requirement <= player.level)
            .filter(|item| item.power_score > worn)
            .map(|item| item.id);

        if let Some(id) = candidate {
            game.equip(id);
        }
    }
}

fn drink_if_low(game: &mut Game) {
    let player = game.player();
    let max = player.max_hp(game.data());
    if max <= 0.0 || player.hp / max >= POTION_THRESHOLD {
        return;
    }
    let potion = player
        .potions
        .keys()
        .find(|id| id.contains("healing"))
        .cloned();
    if let Some(potion) = potion {
        game.use_potion(&potion);
    }
}

fn print_summary(game: &Game) {
    let player = game.player();
    let stats = &player.combat_stats;

    println!("=== {} the {} ===", player.name, level_title(player.level));
    println!("Simulated:   {:.0}s", game.play_time());
    println!("Level:       {} ({}/{} xp)", player.level, player.xp, player.xp_to_next_level);
    println!("Gold:        {}", player.gold);
    println!("Zone:        {}", player.current_zone_id);
    println!(
        "Combat:      {} kills ({} bosses), {} deaths, {} crits",
        stats.kills, stats.boss_kills, stats.deaths, stats.crits
    );
    println!(
        "Damage:      {:.0} dealt / {:.0} taken",
        stats.damage_dealt, stats.damage_taken
    );

    println!("Equipment:");
    for (slot, item) in player.equipment.items() {
        println!("  {:<10} {}", slot.name(), item.summary());
    }
    println!("Inventory:   {} items", player.inventory.count());

    if !player.resources.is_empty() {
        println!("Resources:");
        for (resource, qty) in &player.resources {
            println!("  {:<16} {}", resource, qty);
        }
    }
    if !player.potions.is_empty() {
        println!("Potions:");
        for (potion, qty) in &player.potions {
            println!("  {:<24} {}", potion, qty);
        }
    }
}
