//! Timer-driven automatic combat
//!
//! One encounter at a time: Idle -> Active <-> Paused -> Resolved. Both
//! sides attack on independent timers; a timer that overflows fires once
//! and resets to zero, discarding any surplus time in that frame.

use rand::seq::SliceRandom;
use rand::Rng;

use super::damage::{calculate_damage, Target, DOUBLE_HIT_MULTIPLIER};
use super::enemy::Enemy;
use super::log::CombatLog;
use crate::data::{DataManager, ResourceQty};
use crate::entities::Player;
use crate::items::{Item, ItemGenerator};
use crate::stats::{StatBlock, StatId};

/// Fraction of gold lost when fleeing
pub const FLEE_GOLD_PENALTY: f64 = 0.2;

/// How a finished encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Victory,
    Fled,
    Died,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombatState {
    #[default]
    Idle,
    Active,
    Paused,
    Resolved(Resolution),
}

/// Everything a victory granted. The dropped item is handed to the caller,
/// not placed anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct VictoryRewards {
    pub enemy_id: String,
    pub enemy_name: String,
    pub was_boss: bool,
    pub xp: u64,
    /// Gold actually granted, after the player's gold bonus
    pub gold: u64,
    pub levels_gained: u32,
    pub item: Option<Item>,
    pub resources: Vec<ResourceQty>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CombatOutcome {
    Victory(VictoryRewards),
    PlayerDied,
}

#[derive(Debug, Clone, Default)]
pub struct CombatSystem {
    state: CombatState,
    enemy: Option<Enemy>,
    player_timer: f64,
    enemy_timer: f64,
    fight_time: f64,
    fight_damage_dealt: f64,
    fight_damage_taken: f64,
    log: CombatLog,
}

fn attack_interval(attack_speed: f64) -> Option<f64> {
    (attack_speed > 0.0).then(|| 1.0 / attack_speed)
}

impl CombatSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == CombatState::Active
    }

    pub fn is_paused(&self) -> bool {
        self.state == CombatState::Paused
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn log_snapshot(&self) -> Vec<String> {
        self.log.snapshot()
    }

    pub fn fight_time(&self) -> f64 {
        self.fight_time
    }

    pub fn fight_damage_dealt(&self) -> f64 {
        self.fight_damage_dealt
    }

    pub fn fight_damage_taken(&self) -> f64 {
        self.fight_damage_taken
    }

    /// Start a fresh encounter in a zone. Returns false (and changes
    /// nothing) if the zone or enemy data is missing.
    pub fn start(
        &mut self,
        zone_id: &str,
        spawn_boss: bool,
        player_level: u32,
        data: &DataManager,
        rng: &mut impl Rng,
    ) -> bool {
        let Some(zone) = data.zone(zone_id) else {
            log::warn!("Cannot start combat in unknown zone '{}'", zone_id);
            return false;
        };

        let enemy_id = if spawn_boss {
            zone.boss.as_deref()
        } else {
            zone.enemies.choose(rng).map(String::as_str)
        };
        let Some(def) = enemy_id.and_then(|id| data.enemy(id)) else {
            log::debug!("No enemy available in zone '{}'", zone_id);
            return false;
        };

        let tier = data.tier_or_default(&zone.tier);
        let enemy = Enemy::from_def(def, &tier, player_level, &data.difficulty);
        log::info!("Encounter started: {} in {}", enemy.name, zone.name);

        self.log.push(format!("A {} appears!", enemy.name));
        self.enemy = Some(enemy);
        self.state = CombatState::Active;
        self.player_timer = 0.0;
        self.enemy_timer = 0.0;
        self.fight_time = 0.0;
        self.fight_damage_dealt = 0.0;
        self.fight_damage_taken = 0.0;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != CombatState::Active {
            return false;
        }
        self.state = CombatState::Paused;
        self.log.push("Combat paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != CombatState::Paused {
            return false;
        }
        self.state = CombatState::Active;
        self.log.push("Combat resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.pause() || self.resume()
    }

    /// Run away: lose a fifth of your gold, count a death, no rewards.
    /// Returns the gold lost, or `None` if no fight is active.
    pub fn flee(&mut self, player: &mut Player) -> Option<u64> {
        if self.state != CombatState::Active {
            return None;
        }
        let lost = player.lose_gold_fraction(FLEE_GOLD_PENALTY);
        player.combat_stats.deaths += 1;

        self.log.push(format!("You fled and lost {} gold", lost));
        log::info!("Fled combat, lost {} gold", lost);
        self.enemy = None;
        self.state = CombatState::Resolved(Resolution::Fled);
        Some(lost)
    }

    /// Advance the encounter by `dt` seconds. Returns an outcome on the
    /// frame the encounter resolves; otherwise `None`.
    pub fn update(
        &mut self,
        dt: f64,
        player: &mut Player,
        data: &DataManager,
        rng: &mut impl Rng,
    ) -> Option<CombatOutcome> {
        if self.state != CombatState::Active {
            return None;
        }
        let mut enemy = self.enemy.take()?;

        let outcome = self.step(dt.max(0.0), &mut enemy, player, data, rng);
        if outcome.is_none() {
            self.enemy = Some(enemy);
        }
        outcome
    }

    fn step(
        &mut self,
        dt: f64,
        enemy: &mut Enemy,
        player: &mut Player,
        data: &DataManager,
        rng: &mut impl Rng,
    ) -> Option<CombatOutcome> {
        self.fight_time += dt;

        let stats = player.total_stats(data);
        let max_hp = stats.get(StatId::HpMax);
        let regen = stats.get(StatId::HpRegen);
        if regen > 0.0 && player.hp < max_hp {
            player.hp = (player.hp + regen * dt).min(max_hp);
        }

        let tick = enemy.statuses.tick(dt);
        if tick.damage > 0.0 {
            enemy.take_damage(tick.damage);
            self.fight_damage_dealt += tick.damage;
        }
        for kind in tick.expired {
            self.log.push(format!("{} on {} wears off", kind.name(), enemy.name));
        }

        let mut player_died = false;
        if enemy.is_alive() {
            self.player_timer += dt;
            if let Some(interval) = attack_interval(stats.get(StatId::AttackSpeed)) {
                if self.player_timer >= interval {
                    self.player_timer = 0.0;
                    player_died = self.player_attack(&stats, enemy, player, rng);
                }
            }
        }

        if !enemy.is_alive() {
            return Some(self.victory(enemy, player, data, rng));
        }
        if player_died {
            return Some(self.defeat(player));
        }

        if !enemy.statuses.is_stunned() {
            self.enemy_timer += dt;
            if let Some(interval) = enemy.attack_interval() {
                if self.enemy_timer >= interval {
                    self.enemy_timer = 0.0;
                    if self.enemy_attack(&stats, enemy, player, rng) {
                        return Some(self.defeat(player));
                    }
                }
            }
        }

        if !enemy.is_alive() {
            return Some(self.victory(enemy, player, data, rng));
        }
        None
    }

    /// Returns true if reflected damage killed the player
    fn player_attack(&mut self, stats: &StatBlock, enemy: &mut Enemy, player: &mut Player, rng: &mut impl Rng) -> bool {
        let target = Target {
            hp: enemy.hp,
            is_boss: enemy.is_boss,
        };
        let result = calculate_damage(stats, &enemy.stats, target, rng);
        if result.dodged {
            self.log.push(format!("{} dodges your attack", enemy.name));
            return false;
        }

        enemy.take_damage(result.damage);
        self.fight_damage_dealt += result.damage;
        if result.is_crit {
            player.combat_stats.crits += 1;
        }
        self.log.push(format!(
            "You hit {} for {:.0}{}{}",
            enemy.name,
            result.damage,
            if result.is_crit { " CRIT!" } else { "" },
            if result.blocked { " (blocked)" } else { "" },
        ));

        if result.lifesteal > 0.0 {
            player.hp = (player.hp + result.lifesteal).min(stats.get(StatId::HpMax));
        }

        for proc_ in &result.procs {
            if let Some(kind) = enemy.statuses.apply_proc(proc_) {
                self.log.push(format!("{} is afflicted by {}", enemy.name, kind.name()));
            }
        }
        if result.has_double_hit() {
            let extra = result.damage * DOUBLE_HIT_MULTIPLIER;
            enemy.take_damage(extra);
            self.fight_damage_dealt += extra;
            self.log.push(format!("Double hit! +{:.0}", extra));
        }

        if result.thorns > 0.0 {
            self.fight_damage_taken += result.thorns;
            self.log.push(format!("Thorns deal {:.0} to you", result.thorns));
            return player.take_damage(result.thorns);
        }
        false
    }

    /// Returns true if the player died
    fn enemy_attack(&mut self, stats: &StatBlock, enemy: &mut Enemy, player: &mut Player, rng: &mut impl Rng) -> bool {
        let target = Target {
            hp: player.hp,
            is_boss: false,
        };
        let result = calculate_damage(&enemy.stats, stats, target, rng);
        if result.dodged {
            self.log.push(format!("{} misses", enemy.name));
            return false;
        }

        let mut died = player.take_damage(result.damage);
        self.fight_damage_taken += result.damage;
        self.log.push(format!(
            "{} hits you for {:.0}{}{}",
            enemy.name,
            result.damage,
            if result.is_crit { " CRIT!" } else { "" },
            if result.blocked { " (blocked)" } else { "" },
        ));

        if result.has_double_hit() && !died {
            let extra = result.damage * DOUBLE_HIT_MULTIPLIER;
            died = player.take_damage(extra);
            self.fight_damage_taken += extra;
            self.log.push(format!("{} strikes twice! +{:.0}", enemy.name, extra));
        }

        if result.lifesteal > 0.0 {
            enemy.heal(result.lifesteal);
        }

        if result.thorns > 0.0 {
            enemy.take_damage(result.thorns);
            self.fight_damage_dealt += result.thorns;
            self.log.push(format!("Thorns reflect {:.0} damage", result.thorns));
        }
        died
    }

    fn record_fight(&self, player: &mut Player) {
        player.combat_stats.damage_dealt += self.fight_damage_dealt;
        player.combat_stats.damage_taken += self.fight_damage_taken;
    }

    fn victory(&mut self, enemy: &Enemy, player: &mut Player, data: &DataManager, rng: &mut impl Rng) -> CombatOutcome {
        self.log.push(format!("{} defeated!", enemy.name));
        self.record_fight(player);
        player.combat_stats.kills += 1;
        if enemy.is_boss {
            player.combat_stats.boss_kills += 1;
        }

        let xp = data.difficulty.scaled_kill_xp(enemy.xp_reward);
        let levels_gained = player.add_xp(xp, data);
        let (lo, hi) = (enemy.gold.min.min(enemy.gold.max), enemy.gold.min.max(enemy.gold.max));
        let base_gold = data.difficulty.scaled_kill_gold(rng.gen_range(lo..=hi));
        let gold = player.add_gold(base_gold, data);

        let mut item = None;
        if rng.gen::<f64>() * 100.0 < enemy.item_drop_chance_pct {
            item = ItemGenerator::new(data).generate_random_drop(&enemy.tier, player.level, rng);
            if let Some(item) = &item {
                self.log.push(format!("Loot: {}", item.name));
            }
        }

        let mut resources = Vec::new();
        for drop in &enemy.resource_drops {
            if rng.gen::<f64>() * 100.0 < drop.chance_pct {
                let qty = rng.gen_range(1..=3);
                player.add_resource(&drop.resource, qty);
                resources.push(ResourceQty {
                    resource: drop.resource.clone(),
                    qty,
                });
            }
        }

        log::info!(
            "Defeated {} in {:.1}s: {} xp, {} gold",
            enemy.name,
            self.fight_time,
            xp,
            gold
        );
        self.state = CombatState::Resolved(Resolution::Victory);

        CombatOutcome::Victory(VictoryRewards {
            enemy_id: enemy.id.clone(),
            enemy_name: enemy.name.clone(),
            was_boss: enemy.is_boss,
            xp,
            gold,
            levels_gained,
            item,
            resources,
        })
    }

    fn defeat(&mut self, player: &mut Player) -> CombatOutcome {
        self.log.push("You died!");
        self.record_fight(player);
        player.combat_stats.deaths += 1;
        log::info!("{} died after {:.1}s of combat", player.name, self.fight_time);
        self.state = CombatState::Resolved(Resolution::Died);
        CombatOutcome::PlayerDied
    }
}
