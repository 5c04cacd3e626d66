//! Game save/load system
//!
//! A save is a single JSON document: version tag, the full player dump and
//! the optional skill and station upgrade progress.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::entities::Player;

/// Save file version for compatibility checking
pub const SAVE_VERSION: u32 = 1;

/// Number of save slots
pub const SAVE_SLOTS: u8 = 3;

/// Complete save data structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub player: Player,
    /// Unlocked skill ids, in purchase order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Station id -> upgrade level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_upgrades: Option<BTreeMap<String, u32>>,
}

impl SaveData {
    pub fn new(player: Player) -> Self {
        Self {
            version: SAVE_VERSION,
            player,
            skills: None,
            station_upgrades: None,
        }
    }
}

/// Save error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Invalid save data: {0}")]
    InvalidData(String),
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "hardcore-idle", "HardcoreIdle") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Get the path for a specific save slot
pub fn save_path(slot: u8) -> PathBuf {
    let mut path = save_directory();
    path.push(format!("save_{}.json", slot));
    path
}

/// Check if a save exists in the given slot
pub fn save_exists(slot: u8) -> bool {
    save_path(slot).exists()
}

/// Brief summary of a save for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub name: String,
    pub level: u32,
    pub zone_id: String,
    pub gold: u64,
}

impl From<&SaveData> for SaveSummary {
    fn from(save: &SaveData) -> Self {
        Self {
            name: save.player.name.clone(),
            level: save.player.level,
            zone_id: save.player.current_zone_id.clone(),
            gold: save.player.gold,
        }
    }
}

/// List all save slots with a summary of the ones in use
pub fn list_saves() -> Vec<(u8, Option<SaveSummary>)> {
    (0..SAVE_SLOTS)
        .map(|slot| {
            let summary = if save_exists(slot) {
                load_save_summary(&save_path(slot)).ok()
            } else {
                None
            };
            (slot, summary)
        })
        .collect()
}

/// Load just the summary from a save file
pub fn load_save_summary(path: &Path) -> Result<SaveSummary, SaveError> {
    let save = read_save(path)?;
    Ok(SaveSummary::from(&save))
}

/// Parse a save file without checking its version
fn read_save(path: &Path) -> Result<SaveData, SaveError> {
    let data = fs::read_to_string(path).map_err(|e| SaveError::IoError(e.to_string()))?;
    serde_json::from_str(&data).map_err(|e| SaveError::ParseError(e.to_string()))
}

/// Write a save document, creating parent directories as needed
pub fn save_to_path(save: &SaveData, path: &Path) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| SaveError::IoError(e.to_string()))?;
        }
    }

    let json = serde_json::to_string_pretty(save).map_err(|e| SaveError::ParseError(e.to_string()))?;
    fs::write(path, json).map_err(|e| SaveError::IoError(e.to_string()))?;

    log::info!("Game saved to {}", path.display());
    Ok(())
}

/// Load a save document, rejecting other versions
pub fn load_from_path(path: &Path) -> Result<SaveData, SaveError> {
    let save = read_save(path)?;

    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }

    log::info!("Game loaded from {}", path.display());
    Ok(save)
}

/// Save the game to a slot
pub fn save_game(save: &SaveData, slot: u8) -> Result<(), SaveError> {
    save_to_path(save, &save_path(slot))
}

/// Load a game from a slot
pub fn load_game(slot: u8) -> Result<SaveData, SaveError> {
    load_from_path(&save_path(slot))
}

/// Copy an external save file over `dest`. The source must parse as a
/// save document; otherwise `dest` is left untouched.
pub fn import_save(source: &Path, dest: &Path) -> Result<(), SaveError> {
    let data = fs::read_to_string(source).map_err(|e| SaveError::IoError(e.to_string()))?;
    serde_json::from_str::<SaveData>(&data).map_err(|e| SaveError::InvalidData(e.to_string()))?;

    if let Some(dir) = dest.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| SaveError::IoError(e.to_string()))?;
        }
    }
    fs::write(dest, data).map_err(|e| SaveError::IoError(e.to_string()))?;

    log::info!("Imported save {} into {}", source.display(), dest.display());
    Ok(())
}

/// Delete a save file; a missing file is not an error
pub fn delete_save(path: &Path) -> Result<(), SaveError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| SaveError::IoError(e.to_string()))?;
        log::info!("Deleted save {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_save() -> SaveData {
        let mut player = Player::new("Saver");
        player.level = 4;
        player.gold = 321;
        player.add_resource("softwood", 7);
        player.add_potion("minor_healing_potion", 2);
        player.combat_stats.kills = 12;

        let mut save = SaveData::new(player);
        save.skills = Some(vec!["toughness".into()]);
        save.station_upgrades = Some(BTreeMap::from([("workbench".to_string(), 2)]));
        save
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("save_0.json");
        let save = sample_save();

        save_to_path(&save, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded, save);

        let summary = load_save_summary(&path).unwrap();
        assert_eq!(summary.level, 4);
        assert_eq!(summary.gold, 321);
    }

    #[test]
    fn test_optional_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.json");
        let save = SaveData::new(Player::new("Bare"));

        save_to_path(&save, &path).unwrap();
        let json = fs::read_to_string(&path).unwrap();
        assert!(!json.contains("station_upgrades"));

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.skills, None);
        assert_eq!(loaded.station_upgrades, None);
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.json");
        let mut save = sample_save();
        save.version = SAVE_VERSION + 1;
        save_to_path(&save, &path).unwrap();

        assert_eq!(
            load_from_path(&path),
            Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: SAVE_VERSION + 1
            })
        );
    }

    #[test]
    fn test_import_rejects_garbage() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("save_0.json");
        let junk = dir.path().join("junk.json");
        save_to_path(&sample_save(), &dest).unwrap();
        fs::write(&junk, "{ not a save").unwrap();

        assert!(matches!(import_save(&junk, &dest), Err(SaveError::InvalidData(_))));
        assert_eq!(load_from_path(&dest).unwrap(), sample_save());

        let missing = dir.path().join("missing.json");
        assert!(matches!(import_save(&missing, &dest), Err(SaveError::IoError(_))));
    }

    #[test]
    fn test_import_and_delete() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("export.json");
        let dest = dir.path().join("slots").join("save_1.json");
        save_to_path(&sample_save(), &source).unwrap();

        import_save(&source, &dest).unwrap();
        assert_eq!(load_from_path(&dest).unwrap(), sample_save());

        delete_save(&dest).unwrap();
        assert!(!dest.exists());
        delete_save(&dest).unwrap();
    }
}
