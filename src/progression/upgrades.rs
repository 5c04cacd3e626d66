//! Crafting station upgrades

use std::collections::BTreeMap;

use super::skills::{check_costs, pay_costs, UnlockError};
use crate::data::{DataManager, StationUpgradeDef, StationUpgradeLevel};
use crate::entities::Player;

/// The next purchasable level of an unlocked station
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeAvailability<'a> {
    pub station_id: &'a str,
    pub current_level: u32,
    pub upgrade: &'a StationUpgradeLevel,
    pub status: Result<(), UnlockError>,
}

impl UpgradeAvailability<'_> {
    pub fn can_upgrade(&self) -> bool {
        self.status.is_ok()
    }
}

/// Upgrade level per station; stations start at level 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationUpgradeSystem {
    levels: BTreeMap<String, u32>,
}

impl StationUpgradeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_levels(levels: BTreeMap<String, u32>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &BTreeMap<String, u32> {
        &self.levels
    }

    pub fn level(&self, station_id: &str) -> u32 {
        self.levels.get(station_id).copied().unwrap_or(0)
    }

    fn next_upgrade<'a>(&self, def: &'a StationUpgradeDef) -> Option<&'a StationUpgradeLevel> {
        def.level(self.level(&def.station_id) + 1)
    }

    /// Next upgrades for every unlocked station that has one left
    pub fn available_upgrades<'a>(&self, player: &Player, data: &'a DataManager) -> Vec<UpgradeAvailability<'a>> {
        data.station_upgrades
            .iter()
            .filter(|def| player.has_station(&def.station_id))
            .filter_map(|def| {
                let upgrade = self.next_upgrade(def)?;
                Some(UpgradeAvailability {
                    station_id: def.station_id.as_str(),
                    current_level: self.level(&def.station_id),
                    upgrade,
                    status: check_costs(&upgrade.cost, player, data),
                })
            })
            .collect()
    }

    /// Buy the next level of a station. Returns the new level.
    pub fn upgrade(&mut self, station_id: &str, player: &mut Player, data: &DataManager) -> Result<u32, UnlockError> {
        let def = data
            .station_upgrade(station_id)
            .ok_or_else(|| UnlockError::UnknownStation(station_id.to_string()))?;
        let name = data.station(station_id).map_or(station_id, |s| s.name.as_str());

        if !player.has_station(station_id) {
            return Err(UnlockError::StationLocked(name.to_string()));
        }
        let upgrade = self
            .next_upgrade(def)
            .ok_or_else(|| UnlockError::MaxLevel(name.to_string()))?;
        check_costs(&upgrade.cost, player, data)?;

        pay_costs(&upgrade.cost, player);
        self.levels.insert(station_id.to_string(), upgrade.level);
        log::info!("{} upgraded to level {}", name, upgrade.level);
        Ok(upgrade.level)
    }

    /// Sum of every bonus up to the station's current level
    pub fn station_bonus(&self, station_id: &str, data: &DataManager) -> BTreeMap<String, f64> {
        let level = self.level(station_id);
        let mut total = BTreeMap::new();
        let Some(def) = data.station_upgrade(station_id) else {
            return total;
        };
        for upgrade in def.upgrades.iter().filter(|u| u.level <= level) {
            for (stat, value) in &upgrade.bonus {
                *total.entry(stat.clone()).or_insert(0.0) += value;
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_player() -> Player {
        let mut player = Player::new("Builder");
        player.unlock_station("workbench");
        player.gold = 500;
        player.add_resource("softwood", 10);
        player.add_resource("plank", 10);
        player
    }

    #[test]
    fn test_upgrade_ladder() {
        let data = DataManager::default();
        let mut upgrades = StationUpgradeSystem::new();
        let mut player = ready_player();

        assert_eq!(upgrades.level("workbench"), 0);
        assert!(upgrades.station_bonus("workbench", &data).is_empty());

        assert_eq!(upgrades.upgrade("workbench", &mut player, &data), Ok(1));
        assert_eq!(player.gold, 450);
        assert_eq!(player.resource_count("softwood"), 0);

        assert_eq!(upgrades.upgrade("workbench", &mut player, &data), Ok(2));
        let bonus = upgrades.station_bonus("workbench", &data);
        assert_eq!(bonus.get("craft_speed"), Some(&15.0));
        assert_eq!(bonus.get("dismantle_bonus"), Some(&10.0));

        assert_eq!(
            upgrades.upgrade("workbench", &mut player, &data),
            Err(UnlockError::MaxLevel("Workbench".into()))
        );
    }

    #[test]
    fn test_locked_station() {
        let data = DataManager::default();
        let mut upgrades = StationUpgradeSystem::new();
        let mut player = ready_player();
        assert_eq!(
            upgrades.upgrade("forge", &mut player, &data),
            Err(UnlockError::StationLocked("Forge".into()))
        );
        assert!(matches!(
            upgrades.upgrade("teleporter", &mut player, &data),
            Err(UnlockError::UnknownStation(_))
        ));
    }

    #[test]
    fn test_failed_upgrade_no_mutation() {
        let data = DataManager::default();
        let mut upgrades = StationUpgradeSystem::new();
        let mut player = ready_player();
        player.gold = 10;
        let before = player.clone();

        assert_eq!(upgrades.upgrade("workbench", &mut player, &data), Err(UnlockError::MissingGold(40)));
        assert_eq!(player, before);
        assert_eq!(upgrades.level("workbench"), 0);
    }

    #[test]
    fn test_available_upgrades() {
        let data = DataManager::default();
        let mut upgrades = StationUpgradeSystem::new();
        let mut player = ready_player();

        let listed = upgrades.available_upgrades(&player, &data);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].station_id, "workbench");
        assert_eq!(listed[0].upgrade.level, 1);
        assert!(listed[0].can_upgrade());

        upgrades.upgrade("workbench", &mut player, &data).unwrap();
        upgrades.upgrade("workbench", &mut player, &data).unwrap();
        assert!(upgrades.available_upgrades(&player, &data).is_empty());
    }
}
