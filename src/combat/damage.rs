//! Damage calculation
//!
//! One symmetric formula for both directions: dodge, crit, special flags,
//! block, mitigation, elemental resistance, then lifesteal, thorns and
//! procs.

use rand::Rng;

use crate::stats::{StatBlock, StatId};

/// Damage multiplier applied to a blocked hit
pub const BLOCK_MULTIPLIER: f64 = 0.2;
/// Execute applies below this fraction of the target's max HP
pub const EXECUTE_THRESHOLD: f64 = 0.3;
/// Fraction of a hit dealt again by a double-hit proc
pub const DOUBLE_HIT_MULTIPLIER: f64 = 0.5;

pub const BLEED_DURATION: f64 = 5.0;
pub const BLEED_ATK_RATIO: f64 = 0.2;
pub const POISON_DURATION: f64 = 6.0;
pub const POISON_ATK_RATIO: f64 = 0.15;
pub const STUN_DURATION: f64 = 1.5;

/// Secondary effect triggered by an attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Proc {
    Bleed { damage_per_sec: f64, duration: f64 },
    Poison { damage_per_sec: f64, duration: f64 },
    Stun { duration: f64 },
    DoubleHit,
}

/// What the formula needs to know about the target beyond its stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub hp: f64,
    pub is_boss: bool,
}

/// Result of a single attack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackResult {
    pub damage: f64,
    pub is_crit: bool,
    pub blocked: bool,
    pub dodged: bool,
    /// HP the attacker recovers
    pub lifesteal: f64,
    /// Flat damage reflected back at the attacker
    pub thorns: f64,
    pub procs: Vec<Proc>,
}

impl AttackResult {
    pub fn dodged() -> Self {
        Self {
            dodged: true,
            ..Self::default()
        }
    }

    pub fn has_double_hit(&self) -> bool {
        self.procs.contains(&Proc::DoubleHit)
    }
}

fn roll_pct(rng: &mut impl Rng) -> f64 {
    rng.gen::<f64>() * 100.0
}

/// Resolve one attack
pub fn calculate_damage(
    attacker: &StatBlock,
    defender: &StatBlock,
    target: Target,
    rng: &mut impl Rng,
) -> AttackResult {
    let dodge_chance = defender.get(StatId::Evasion) - attacker.get(StatId::Accuracy) * 0.5;
    if roll_pct(rng) < dodge_chance {
        return AttackResult::dodged();
    }

    let mut result = AttackResult::default();
    let mut damage = attacker.get(StatId::Atk) + attacker.bonus_damage();

    if roll_pct(rng) < attacker.get(StatId::CritChance) {
        result.is_crit = true;
        damage *= attacker.get(StatId::CritDamage) / 100.0;
    }

    let boss_slayer = attacker.get(StatId::FlagBossSlayer);
    if target.is_boss && boss_slayer > 0.0 {
        damage *= 1.0 + boss_slayer / 100.0;
    }

    let execute = attacker.get(StatId::FlagExecute);
    if execute > 0.0 && target.hp < defender.get(StatId::HpMax) * EXECUTE_THRESHOLD {
        damage *= 1.0 + execute / 100.0;
    }

    if roll_pct(rng) < defender.get(StatId::Block) {
        result.blocked = true;
        damage *= BLOCK_MULTIPLIER;
    }

    damage *= mitigation(defender);

    if attacker.elemental_damage() > 0.0 {
        damage *= 1.0 - defender.get(StatId::ElementalResist) / 100.0 * 0.5;
    }

    result.damage = damage.max(1.0);

    let lifesteal = attacker.get(StatId::Lifesteal);
    if lifesteal > 0.0 {
        result.lifesteal = result.damage * lifesteal / 100.0;
    }

    let thorns = defender.get(StatId::Thorns);
    if thorns > 0.0 {
        result.thorns = thorns;
    }

    result.procs = roll_procs(attacker, rng);
    result
}

/// `100 / (100 + def + armor)`
pub fn mitigation(defender: &StatBlock) -> f64 {
    100.0 / (100.0 + defender.get(StatId::Def) + defender.get(StatId::Armor))
}

/// Independent proc rolls, in bleed, poison, stun, double-hit order
pub fn roll_procs(attacker: &StatBlock, rng: &mut impl Rng) -> Vec<Proc> {
    let atk = attacker.get(StatId::Atk);
    let mut procs = Vec::new();

    if roll_pct(rng) < attacker.get(StatId::ProcBleedChance) {
        procs.push(Proc::Bleed {
            damage_per_sec: atk * BLEED_ATK_RATIO,
            duration: BLEED_DURATION,
        });
    }
    if roll_pct(rng) < attacker.get(StatId::ProcPoisonChance) {
        procs.push(Proc::Poison {
            damage_per_sec: atk * POISON_ATK_RATIO,
            duration: POISON_DURATION,
        });
    }
    if roll_pct(rng) < attacker.get(StatId::ProcStunChance) {
        procs.push(Proc::Stun {
            duration: STUN_DURATION,
        });
    }
    if roll_pct(rng) < attacker.get(StatId::ProcDoubleHitChance) {
        procs.push(Proc::DoubleHit);
    }
    procs
}
