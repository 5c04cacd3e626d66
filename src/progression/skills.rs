//! Permanent skills
//!
//! Skills are bought once with gold and/or resources and permanently
//! modify the player's base stats.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::data::{Cost, DataManager, SkillDef, SkillEffect, SkillEffectKind};
use crate::entities::Player;
use crate::stats::StatBlock;

/// Reasons a skill or station upgrade could not be bought
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    #[error("Unknown skill '{0}'")]
    UnknownSkill(String),

    #[error("{0} is already unlocked")]
    AlreadyUnlocked(String),

    #[error("Requires level {0}")]
    LevelTooLow(u32),

    #[error("Missing {qty}x {name}")]
    MissingResource { name: String, qty: u32 },

    #[error("Missing {0} gold")]
    MissingGold(u64),

    #[error("Unknown station '{0}'")]
    UnknownStation(String),

    #[error("{0} is not unlocked")]
    StationLocked(String),

    #[error("{0} is fully upgraded")]
    MaxLevel(String),
}

/// Gold and per-resource totals of a cost list
fn cost_totals(costs: &[Cost]) -> (u64, BTreeMap<&str, u32>) {
    let mut gold = 0;
    let mut resources = BTreeMap::new();
    for cost in costs {
        match cost {
            Cost::Gold(amount) => gold += amount,
            Cost::Resource { resource, qty } => *resources.entry(resource.as_str()).or_insert(0) += qty,
        }
    }
    (gold, resources)
}

/// Check a whole cost list without touching the player. Resources are
/// checked before gold, in cost order.
pub fn check_costs(costs: &[Cost], player: &Player, data: &DataManager) -> Result<(), UnlockError> {
    let (gold, resources) = cost_totals(costs);
    for (resource, qty) in resources {
        if !player.has_resource(resource, qty) {
            let name = data.resource(resource).map_or(resource, |r| r.name.as_str());
            return Err(UnlockError::MissingResource {
                name: name.to_string(),
                qty,
            });
        }
    }
    if player.gold < gold {
        return Err(UnlockError::MissingGold(gold - player.gold));
    }
    Ok(())
}

/// Take every cost from the player. Call only after `check_costs` passed.
pub fn pay_costs(costs: &[Cost], player: &mut Player) {
    let (gold, resources) = cost_totals(costs);
    for (resource, qty) in resources {
        player.consume_resource(resource, qty);
    }
    player.spend_gold(gold);
}

/// Apply effects left to right. Percent effects use the stat's value at
/// the moment they apply.
pub fn apply_skill_effects(effects: &[SkillEffect], base: &mut StatBlock) {
    for effect in effects {
        let delta = match effect.kind {
            SkillEffectKind::Flat => effect.value,
            SkillEffectKind::Percent => base.get_named(&effect.stat) * effect.value / 100.0,
        };
        base.add_named(&effect.stat, delta);
    }
}

/// A skill the player has not bought yet, and whether they can
#[derive(Debug, Clone, PartialEq)]
pub struct SkillAvailability<'a> {
    pub skill: &'a SkillDef,
    pub status: Result<(), UnlockError>,
}

impl SkillAvailability<'_> {
    pub fn can_unlock(&self) -> bool {
        self.status.is_ok()
    }
}

/// The player's unlocked skills, in purchase order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSystem {
    unlocked: Vec<String>,
}

impl SkillSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from saved ids. Effects are already baked into the saved
    /// base stats, so nothing is reapplied.
    pub fn from_unlocked(unlocked: Vec<String>) -> Self {
        Self { unlocked }
    }

    pub fn is_unlocked(&self, skill_id: &str) -> bool {
        self.unlocked.iter().any(|id| id == skill_id)
    }

    pub fn unlocked_ids(&self) -> &[String] {
        &self.unlocked
    }

    pub fn unlocked_skills<'a>(&self, data: &'a DataManager) -> Vec<&'a SkillDef> {
        self.unlocked.iter().filter_map(|id| data.skill(id)).collect()
    }

    pub fn check_unlock(&self, skill_id: &str, player: &Player, data: &DataManager) -> Result<(), UnlockError> {
        let skill = data
            .skill(skill_id)
            .ok_or_else(|| UnlockError::UnknownSkill(skill_id.to_string()))?;
        self.check_skill(skill, player, data)
    }

    fn check_skill(&self, skill: &SkillDef, player: &Player, data: &DataManager) -> Result<(), UnlockError> {
        if self.is_unlocked(&skill.id) {
            return Err(UnlockError::AlreadyUnlocked(skill.name.clone()));
        }
        if player.level < skill.requires_level {
            return Err(UnlockError::LevelTooLow(skill.requires_level));
        }
        check_costs(&skill.cost, player, data)
    }

    /// Skills not yet unlocked, in data order
    pub fn available_skills<'a>(&self, player: &Player, data: &'a DataManager) -> Vec<SkillAvailability<'a>> {
        data.skills
            .iter()
            .filter(|skill| !self.is_unlocked(&skill.id))
            .map(|skill| SkillAvailability {
                skill,
                status: self.check_skill(skill, player, data),
            })
            .collect()
    }

    /// Buy a skill and bake its effects into the player's base stats
    pub fn unlock(&mut self, skill_id: &str, player: &mut Player, data: &DataManager) -> Result<(), UnlockError> {
        let skill = data
            .skill(skill_id)
            .ok_or_else(|| UnlockError::UnknownSkill(skill_id.to_string()))?;
        self.check_skill(skill, player, data)?;

        pay_costs(&skill.cost, player);
        apply_skill_effects(&skill.effects, &mut player.base_stats);
        player.clamp_hp(data);
        self.unlocked.push(skill.id.clone());

        log::info!("Learned skill {}", skill.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatId;

    #[test]
    fn test_unlock_applies_effects() {
        let data = DataManager::default();
        let mut skills = SkillSystem::new();
        let mut player = Player::new("Learner");
        player.level = 3;
        player.gold = 100;

        skills.unlock("sharpened_mind", &mut player, &data).unwrap();
        // atk 3 + 10%
        assert!((player.base_stats.get(StatId::Atk) - 3.3).abs() < 1e-12);
        assert_eq!(player.base_stats.get(StatId::CritChance), 3.0);
        assert_eq!(player.gold, 20);
        assert!(skills.is_unlocked("sharpened_mind"));

        assert_eq!(
            skills.unlock("sharpened_mind", &mut player, &data),
            Err(UnlockError::AlreadyUnlocked("Sharpened Mind".into()))
        );
    }

    #[test]
    fn test_all_costs_checked_before_paying() {
        let data = DataManager::default();
        let mut skills = SkillSystem::new();
        let mut player = Player::new("Learner");
        player.level = 2;
        // toughness needs 50 gold and 5 softwood
        player.gold = 100;
        player.add_resource("softwood", 4);
        let before = player.clone();

        assert!(matches!(
            skills.unlock("toughness", &mut player, &data),
            Err(UnlockError::MissingResource { qty: 5, .. })
        ));
        assert_eq!(player, before);

        player.gold = 10;
        player.add_resource("softwood", 1);
        let before = player.clone();
        assert_eq!(skills.unlock("toughness", &mut player, &data), Err(UnlockError::MissingGold(40)));
        assert_eq!(player, before);
    }

    #[test]
    fn test_level_gate_and_unknown() {
        let data = DataManager::default();
        let skills = SkillSystem::new();
        let player = Player::new("Learner");
        assert_eq!(
            skills.check_unlock("hardened", &player, &data),
            Err(UnlockError::LevelTooLow(5))
        );
        assert!(matches!(
            skills.check_unlock("flight", &player, &data),
            Err(UnlockError::UnknownSkill(_))
        ));
    }

    #[test]
    fn test_available_skills_hide_unlocked() {
        let data = DataManager::default();
        let mut skills = SkillSystem::new();
        let mut player = Player::new("Learner");
        player.level = 2;
        player.add_resource("wild_fibers", 6);

        let listed = skills.available_skills(&player, &data);
        assert_eq!(listed.len(), data.skills.len());
        let forager = listed.iter().find(|s| s.skill.id == "forager").unwrap();
        assert!(forager.can_unlock());

        skills.unlock("forager", &mut player, &data).unwrap();
        assert_eq!(player.base_stats.get(StatId::GatherPowerWood), 3.0);
        assert!(skills
            .available_skills(&player, &data)
            .iter()
            .all(|s| s.skill.id != "forager"));
        assert_eq!(skills.unlocked_skills(&data).len(), 1);
    }

    #[test]
    fn test_effects_apply_left_to_right() {
        let mut base = StatBlock::from_pairs(&[(StatId::Atk, 10.0)]);
        let effects = vec![
            SkillEffect {
                stat: "atk".into(),
                kind: SkillEffectKind::Flat,
                value: 10.0,
            },
            SkillEffect {
                stat: "atk".into(),
                kind: SkillEffectKind::Percent,
                value: 50.0,
            },
        ];
        apply_skill_effects(&effects, &mut base);
        assert_eq!(base.get(StatId::Atk), 30.0);
    }
}
