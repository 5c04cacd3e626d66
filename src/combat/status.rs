//! Status effects on enemies
//!
//! Bleed and poison tick damage every frame; stun freezes the enemy's
//! attack timer. Reapplying an effect refreshes it rather than stacking.

use super::damage::Proc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Bleed,
    Poison,
    Stun,
}

impl StatusKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Bleed => "Bleed",
            StatusKind::Poison => "Poison",
            StatusKind::Stun => "Stun",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Zero for stun
    pub damage_per_sec: f64,
    pub remaining: f64,
}

/// Result of ticking status effects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTickResult {
    /// Total damage dealt from DoT effects
    pub damage: f64,
    /// Effects that ran out this tick
    pub expired: Vec<StatusKind>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, refreshing duration and keeping the stronger tick
    pub fn apply(&mut self, kind: StatusKind, damage_per_sec: f64, duration: f64) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = existing.remaining.max(duration);
            existing.damage_per_sec = existing.damage_per_sec.max(damage_per_sec);
        } else {
            self.effects.push(StatusEffect {
                kind,
                damage_per_sec,
                remaining: duration,
            });
        }
    }

    /// Apply a proc; double-hit carries no lingering status
    pub fn apply_proc(&mut self, proc_: &Proc) -> Option<StatusKind> {
        match *proc_ {
            Proc::Bleed { damage_per_sec, duration } => {
                self.apply(StatusKind::Bleed, damage_per_sec, duration);
                Some(StatusKind::Bleed)
            }
            Proc::Poison { damage_per_sec, duration } => {
                self.apply(StatusKind::Poison, damage_per_sec, duration);
                Some(StatusKind::Poison)
            }
            Proc::Stun { duration } => {
                self.apply(StatusKind::Stun, 0.0, duration);
                Some(StatusKind::Stun)
            }
            Proc::DoubleHit => None,
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn is_stunned(&self) -> bool {
        self.has(StatusKind::Stun)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Advance all effects by `dt` seconds. Damage only accrues for the
    /// part of `dt` the effect was still running.
    pub fn tick(&mut self, dt: f64) -> StatusTickResult {
        let mut result = StatusTickResult::default();
        let dt = dt.max(0.0);

        for effect in &mut self.effects {
            let active = dt.min(effect.remaining);
            result.damage += effect.damage_per_sec * active;
            effect.remaining -= dt;
            if effect.remaining <= 0.0 {
                result.expired.push(effect.kind);
            }
        }

        self.effects.retain(|e| e.remaining > 0.0);
        result
    }
}
