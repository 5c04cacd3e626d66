//! RON data loader
//!
//! Loads reference data from external RON files, with fallback to built-in
//! defaults. Missing or broken files only produce a warning.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::defaults::*;
use super::defs::*;
use crate::progression::DifficultySettings;

/// Errors raised while exporting data files
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {file}: {source}")]
    Serialize {
        file: &'static str,
        #[source]
        source: ron::Error,
    },
}

/// Every reference table the game reads from
#[derive(Debug, Clone)]
pub struct DataManager {
    pub tiers: Vec<TierDef>,
    pub rarities: Vec<RarityDef>,
    pub qualities: Vec<QualityDef>,
    pub resources: Vec<ResourceDef>,
    pub nodes: Vec<NodeDef>,
    pub item_bases: Vec<ItemBaseDef>,
    pub affixes: Vec<AffixDef>,
    pub sets: Vec<SetDef>,
    pub stations: Vec<StationDef>,
    pub recipes: Vec<RecipeDef>,
    pub enemies: Vec<EnemyDef>,
    pub zones: Vec<ZoneDef>,
    pub skills: Vec<SkillDef>,
    pub station_upgrades: Vec<StationUpgradeDef>,
    /// Hardcore tuning, loaded alongside the tables
    pub difficulty: DifficultySettings,
}

impl DataManager {
    /// Load every table from `dir`, falling back to defaults per file
    pub fn load_from_dir(dir: &Path) -> Self {
        log::info!("Loading game data from {}", dir.display());
        Self {
            tiers: load_file(dir, "tiers.ron", default_tiers),
            rarities: load_file(dir, "rarities.ron", default_rarities),
            qualities: load_file(dir, "qualities.ron", default_qualities),
            resources: load_file(dir, "resources.ron", default_resources),
            nodes: load_file(dir, "nodes.ron", default_nodes),
            item_bases: load_file(dir, "item_bases.ron", default_item_bases),
            affixes: load_file(dir, "affixes.ron", default_affixes),
            sets: load_file(dir, "sets.ron", default_sets),
            stations: load_file(dir, "stations.ron", default_stations),
            recipes: load_file(dir, "recipes.ron", default_recipes),
            enemies: load_file(dir, "enemies.ron", default_enemies),
            zones: load_file(dir, "zones.ron", default_zones),
            skills: load_file(dir, "skills.ron", default_skills),
            station_upgrades: load_file(dir, "station_upgrades.ron", default_station_upgrades),
            difficulty: load_file(dir, "difficulty.ron", DifficultySettings::default),
        }
    }

    /// Load from `assets/data/`
    pub fn load_from_assets() -> Self {
        Self::load_from_dir(Path::new("assets/data"))
    }

    pub fn tier(&self, id: &str) -> Option<&TierDef> {
        self.tiers.iter().find(|t| t.id == id)
    }

    pub fn rarity(&self, id: &str) -> Option<&RarityDef> {
        self.rarities.iter().find(|r| r.id == id)
    }

    pub fn quality(&self, id: &str) -> Option<&QualityDef> {
        self.qualities.iter().find(|q| q.id == id)
    }

    pub fn resource(&self, id: &str) -> Option<&ResourceDef> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&NodeDef> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn item_base(&self, id: &str) -> Option<&ItemBaseDef> {
        self.item_bases.iter().find(|b| b.id == id)
    }

    pub fn affix(&self, id: &str) -> Option<&AffixDef> {
        self.affixes.iter().find(|a| a.id == id)
    }

    pub fn set(&self, id: &str) -> Option<&SetDef> {
        self.sets.iter().find(|s| s.id == id)
    }

    pub fn station(&self, id: &str) -> Option<&StationDef> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn recipe(&self, id: &str) -> Option<&RecipeDef> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyDef> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn zone(&self, id: &str) -> Option<&ZoneDef> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn skill(&self, id: &str) -> Option<&SkillDef> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn station_upgrade(&self, station_id: &str) -> Option<&StationUpgradeDef> {
        self.station_upgrades.iter().find(|u| u.station_id == station_id)
    }

    /// Tier definition, or a neutral fallback for unknown ids
    pub fn tier_or_default(&self, id: &str) -> TierDef {
        self.tier(id).cloned().unwrap_or_else(|| TierDef {
            id: id.to_string(),
            ..TierDef::default()
        })
    }

    /// Affixes sharing at least one tag with the item and unlocked at `tier`.
    /// An affix without tags never fits.
    pub fn affixes_for(&self, tags: &[String], tier: u32) -> Vec<&AffixDef> {
        self.affixes
            .iter()
            .filter(|a| a.tier_min <= tier)
            .filter(|a| a.tags.iter().any(|t| tags.contains(t)))
            .collect()
    }

    /// Nodes of the zone's tier whose resource the zone lists
    pub fn nodes_in_zone(&self, zone: &ZoneDef) -> Vec<&NodeDef> {
        self.nodes
            .iter()
            .filter(|n| n.tier == zone.tier && zone.resources.contains(&n.resource))
            .collect()
    }

    /// Write every default table as RON into `dir`
    pub fn export_default_data(dir: &Path) -> Result<(), DataError> {
        fs::create_dir_all(dir).map_err(|source| DataError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        write_file(dir, "tiers.ron", &default_tiers())?;
        write_file(dir, "rarities.ron", &default_rarities())?;
        write_file(dir, "qualities.ron", &default_qualities())?;
        write_file(dir, "resources.ron", &default_resources())?;
        write_file(dir, "nodes.ron", &default_nodes())?;
        write_file(dir, "item_bases.ron", &default_item_bases())?;
        write_file(dir, "affixes.ron", &default_affixes())?;
        write_file(dir, "sets.ron", &default_sets())?;
        write_file(dir, "stations.ron", &default_stations())?;
        write_file(dir, "recipes.ron", &default_recipes())?;
        write_file(dir, "enemies.ron", &default_enemies())?;
        write_file(dir, "zones.ron", &default_zones())?;
        write_file(dir, "skills.ron", &default_skills())?;
        write_file(dir, "station_upgrades.ron", &default_station_upgrades())?;
        write_file(dir, "difficulty.ron", &DifficultySettings::default())?;

        log::info!("Exported default data to {}", dir.display());
        Ok(())
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            rarities: default_rarities(),
            qualities: default_qualities(),
            resources: default_resources(),
            nodes: default_nodes(),
            item_bases: default_item_bases(),
            affixes: default_affixes(),
            sets: default_sets(),
            stations: default_stations(),
            recipes: default_recipes(),
            enemies: default_enemies(),
            zones: default_zones(),
            skills: default_skills(),
            station_upgrades: default_station_upgrades(),
            difficulty: DifficultySettings::default(),
        }
    }
}

/// "t3" -> 3; anything unparseable is tier 1
pub fn tier_number(id: &str) -> u32 {
    id.strip_prefix('t')
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

fn load_file<T: DeserializeOwned>(dir: &Path, name: &str, fallback: fn() -> T) -> T {
    let path = dir.join(name);
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(value) => {
                    log::debug!("Loaded {}", name);
                    return value;
                }
                Err(e) => log::warn!("Failed to parse {}: {}. Using defaults.", name, e),
            },
            Err(e) => log::warn!("Failed to read {}: {}. Using defaults.", name, e),
        }
    } else {
        log::debug!("{} not found, using defaults", name);
    }
    fallback()
}

fn write_file<T: Serialize>(dir: &Path, name: &'static str, value: &T) -> Result<(), DataError> {
    let pretty = ron::ser::PrettyConfig::new().depth_limit(4);
    let content = ron::ser::to_string_pretty(value, pretty)
        .map_err(|source| DataError::Serialize { file: name, source })?;
    let path = dir.join(name);
    fs::write(&path, content).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })
}
