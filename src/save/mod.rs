//! Save/load system
//!
//! Versioned JSON saves, save slots and save import.

pub mod save_game;

pub use save_game::{
    SaveData, SaveError, SaveSummary, SAVE_SLOTS, SAVE_VERSION,
    save_game, load_game, delete_save, import_save,
    save_to_path, load_from_path, load_save_summary,
    save_directory, save_exists, list_saves, save_path,
};
