//! Integration test: data files and save files
//!
//! Exported RON data must load back unchanged, broken files must fall
//! back to the built-in tables, and a played session must survive a
//! save/load cycle exactly.

use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use hardcore_idle::data::DataManager;
use hardcore_idle::game::Game;
use hardcore_idle::items::{ItemGenerator, ItemOptions};
use hardcore_idle::save::{self, SaveError};
use hardcore_idle::stats::StatId;

#[test]
fn exported_data_loads_back_unchanged() {
    let dir = tempdir().unwrap();
    DataManager::export_default_data(dir.path()).unwrap();

    let loaded = DataManager::load_from_dir(dir.path());
    let defaults = DataManager::default();

    assert_eq!(loaded.tiers, defaults.tiers);
    assert_eq!(loaded.rarities, defaults.rarities);
    assert_eq!(loaded.qualities, defaults.qualities);
    assert_eq!(loaded.resources, defaults.resources);
    assert_eq!(loaded.nodes, defaults.nodes);
    assert_eq!(loaded.item_bases, defaults.item_bases);
    assert_eq!(loaded.affixes, defaults.affixes);
    assert_eq!(loaded.sets, defaults.sets);
    assert_eq!(loaded.stations, defaults.stations);
    assert_eq!(loaded.recipes, defaults.recipes);
    assert_eq!(loaded.enemies, defaults.enemies);
    assert_eq!(loaded.zones, defaults.zones);
    assert_eq!(loaded.skills, defaults.skills);
    assert_eq!(loaded.station_upgrades, defaults.station_upgrades);
    assert_eq!(loaded.difficulty, defaults.difficulty);
}

#[test]
fn broken_data_files_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("zones.ron"), "[ ( id: \"unterminated").unwrap();
    fs::write(
        dir.path().join("difficulty.ron"),
        "(enemy_hp_mult: 3.0, reward_xp_mult: 0.5)",
    )
    .unwrap();

    let loaded = DataManager::load_from_dir(dir.path());
    let defaults = DataManager::default();

    assert_eq!(loaded.zones, defaults.zones);
    // Partial difficulty files keep the other defaults
    assert_eq!(loaded.difficulty.enemy_hp_mult, 3.0);
    assert_eq!(loaded.difficulty.reward_xp_mult, 0.5);
    assert_eq!(loaded.difficulty.enemy_atk_mult, defaults.difficulty.enemy_atk_mult);
}

#[test]
fn played_session_survives_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("save_0.json");

    let mut game = Game::new_game("Persistent", DataManager::default(), Some(21));
    {
        let player = game.player_mut();
        player.base_stats.add(StatId::Atk, 40.0);
        player.level = 6;
        player.gold = 1_000;
        player.add_resource("softwood", 20);
        player.add_resource("healing_herb", 4);
    }
    for _ in 0..600 {
        game.update(0.1);
    }
    game.unlock_skill("toughness").unwrap();
    game.upgrade_station("workbench").unwrap();

    let mut rng = StdRng::seed_from_u64(8);
    let options = ItemOptions {
        rarity: Some("rare"),
        ..ItemOptions::default()
    };
    let ring = ItemGenerator::new(game.data())
        .generate("copper_ring", options, &mut rng)
        .unwrap();
    game.player_mut().inventory.add_item(ring).unwrap();

    game.set_save_path(Some(path.clone()));
    game.save().unwrap();

    let loaded = save::load_from_path(&path).unwrap();
    assert_eq!(loaded, game.to_save());

    let resumed = Game::from_save(loaded, DataManager::default(), Some(21));
    assert_eq!(resumed.player(), game.player());
    assert_eq!(resumed.skills().unlocked_ids(), game.skills().unlocked_ids());
    assert_eq!(resumed.upgrades().levels(), game.upgrades().levels());
}

#[test]
fn import_validates_before_overwriting() {
    let dir = tempdir().unwrap();
    let slot = dir.path().join("slot.json");
    let export = dir.path().join("export.json");
    let corrupt = dir.path().join("corrupt.json");

    let original = Game::new_game("Original", DataManager::default(), Some(1)).to_save();
    let incoming = Game::new_game("Incoming", DataManager::default(), Some(2)).to_save();
    save::save_to_path(&original, &slot).unwrap();
    save::save_to_path(&incoming, &export).unwrap();
    fs::write(&corrupt, r#"{"version": 1, "player": 12}"#).unwrap();

    assert!(matches!(
        save::import_save(&corrupt, &slot),
        Err(SaveError::InvalidData(_))
    ));
    assert_eq!(save::load_from_path(&slot).unwrap(), original);

    save::import_save(&export, &slot).unwrap();
    assert_eq!(save::load_from_path(&slot).unwrap().player.name, "Incoming");
}
