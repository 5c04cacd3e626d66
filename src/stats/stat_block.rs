//! Stat identifiers and the dense stat container
//!
//! Stat ids are a closed enumeration. String ids only appear at the data
//! boundary (reference files, saves), where unknown names are dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

macro_rules! stat_ids {
    ($($variant:ident => $id:literal,)+) => {
        /// All recognised stat identifiers
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum StatId {
            $($variant,)+
        }

        impl StatId {
            /// Every stat, in storage order
            pub const ALL: &'static [StatId] = &[$(StatId::$variant,)+];

            /// Number of stats held by a `StatBlock`
            pub const COUNT: usize = Self::ALL.len();

            /// The string id used in data files and saves
            pub fn id(&self) -> &'static str {
                match self {
                    $(StatId::$variant => $id,)+
                }
            }

            /// Parse a data-file stat id. Unknown ids yield `None`.
            pub fn from_id(id: &str) -> Option<StatId> {
                match id {
                    $($id => Some(StatId::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

stat_ids! {
    // Combat
    HpMax => "hp_max",
    HpRegen => "hp_regen",
    Atk => "atk",
    Def => "def",
    Armor => "armor",
    ElementalResist => "elemental_resist",
    AttackSpeed => "attack_speed",
    CritChance => "crit_chance",
    CritDamage => "crit_damage",
    Accuracy => "accuracy",
    Evasion => "evasion",
    Block => "block",
    Lifesteal => "lifesteal",
    Thorns => "thorns",
    Shield => "shield",
    CooldownReduction => "cooldown_reduction",

    // Gathering
    BonusResources => "bonus_resources",
    DoubleDrop => "double_drop",
    GatherPowerWood => "gather_power_wood",
    GatherPowerOre => "gather_power_ore",
    GatherPowerHerb => "gather_power_herb",
    GatherSpeed => "gather_speed",

    // Crafting
    CraftSpeed => "craft_speed",
    RerollCostReduction => "reroll_cost_reduction",
    DismantleBonus => "dismantle_bonus",

    // Utility
    GoldGain => "gold_gain",
    XpGain => "xp_gain",

    // Procs (percent chances)
    ProcBleedChance => "proc_bleed_chance",
    ProcPoisonChance => "proc_poison_chance",
    ProcStunChance => "proc_stun_chance",
    ProcDoubleHitChance => "proc_double_hit_chance",

    // Special flags
    FlagExecute => "flag_execute",
    FlagBossSlayer => "flag_boss_slayer",
    FlagResourceSpirit => "flag_resource_spirit",
    FreeRerollChance => "free_reroll_chance",

    // Damage types
    PhysicalDamage => "physical_damage",
    FireDamage => "fire_damage",
    IceDamage => "ice_damage",
    LightningDamage => "lightning_damage",
    PoisonDamage => "poison_damage",
    ShadowDamage => "shadow_damage",
    LightDamage => "light_damage",
}

impl StatId {
    /// Damage stats added on top of `atk` for every attack
    pub const DAMAGE_TYPES: &'static [StatId] = &[
        StatId::PhysicalDamage,
        StatId::FireDamage,
        StatId::IceDamage,
        StatId::LightningDamage,
        StatId::PoisonDamage,
        StatId::ShadowDamage,
        StatId::LightDamage,
    ];

    /// Damage stats that elemental resistance applies to
    pub const ELEMENTAL_TYPES: &'static [StatId] = &[
        StatId::FireDamage,
        StatId::IceDamage,
        StatId::LightningDamage,
        StatId::PoisonDamage,
        StatId::ShadowDamage,
        StatId::LightDamage,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for StatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for StatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        StatId::from_id(&id).ok_or_else(|| serde::de::Error::custom(format!("unknown stat id '{}'", id)))
    }
}

/// A value for every `StatId`, defaulting to zero
#[derive(Clone, PartialEq)]
pub struct StatBlock {
    values: [f64; StatId::COUNT],
}

impl StatBlock {
    /// An all-zero block
    pub fn new() -> Self {
        Self { values: [0.0; StatId::COUNT] }
    }

    /// Build a block from `(stat, value)` pairs
    pub fn from_pairs(pairs: &[(StatId, f64)]) -> Self {
        let mut block = Self::new();
        for &(stat, value) in pairs {
            block.set(stat, value);
        }
        block
    }

    pub fn get(&self, stat: StatId) -> f64 {
        self.values[stat.index()]
    }

    pub fn set(&mut self, stat: StatId, value: f64) {
        self.values[stat.index()] = value;
    }

    pub fn add(&mut self, stat: StatId, delta: f64) {
        self.values[stat.index()] += delta;
    }

    /// Add by string id; unknown ids are absorbed
    pub fn add_named(&mut self, id: &str, delta: f64) {
        if let Some(stat) = StatId::from_id(id) {
            self.add(stat, delta);
        }
    }

    /// Read by string id; unknown ids read as zero
    pub fn get_named(&self, id: &str) -> f64 {
        StatId::from_id(id).map(|s| self.get(s)).unwrap_or(0.0)
    }

    /// Write by string id; unknown ids are absorbed
    pub fn set_named(&mut self, id: &str, value: f64) {
        if let Some(stat) = StatId::from_id(id) {
            self.set(stat, value);
        }
    }

    /// Add every entry of a string-keyed mapping
    pub fn merge_map<'a>(&mut self, entries: impl IntoIterator<Item = (&'a str, f64)>) {
        for (id, value) in entries {
            self.add_named(id, value);
        }
    }

    /// Add every stat of another block
    pub fn merge(&mut self, other: &StatBlock) {
        for (value, delta) in self.values.iter_mut().zip(other.values.iter()) {
            *value += delta;
        }
    }

    /// Sum of all damage stats (physical + elemental)
    pub fn bonus_damage(&self) -> f64 {
        StatId::DAMAGE_TYPES.iter().map(|&s| self.get(s)).sum()
    }

    /// Sum of elemental damage stats only
    pub fn elemental_damage(&self) -> f64 {
        StatId::ELEMENTAL_TYPES.iter().map(|&s| self.get(s)).sum()
    }

    /// Iterate over non-zero stats
    pub fn non_zero(&self) -> impl Iterator<Item = (StatId, f64)> + '_ {
        StatId::ALL
            .iter()
            .map(move |&s| (s, self.get(s)))
            .filter(|&(_, v)| v != 0.0)
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl AddAssign<&StatBlock> for StatBlock {
    fn add_assign(&mut self, rhs: &StatBlock) {
        self.merge(rhs);
    }
}

impl fmt::Debug for StatBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.non_zero().map(|(s, v)| (s.id(), v)))
            .finish()
    }
}

// Saved as a map of non-zero stats keyed by string id.
impl Serialize for StatBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<(StatId, f64)> = self.non_zero().collect();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (stat, value) in entries {
            map.serialize_entry(stat.id(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatBlockVisitor;

        impl<'de> Visitor<'de> for StatBlockVisitor {
            type Value = StatBlock;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of stat ids to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StatBlock, A::Error> {
                let mut block = StatBlock::new();
                while let Some((id, value)) = access.next_entry::<String, f64>()? {
                    match StatId::from_id(&id) {
                        Some(stat) => block.add(stat, value),
                        None => log::warn!("Ignoring unknown stat id '{}'", id),
                    }
                }
                Ok(block)
            }
        }

        deserializer.deserialize_map(StatBlockVisitor)
    }
}

impl From<&BTreeMap<String, f64>> for StatBlock {
    fn from(map: &BTreeMap<String, f64>) -> Self {
        let mut block = StatBlock::new();
        block.merge_map(map.iter().map(|(k, v)| (k.as_str(), *v)));
        block
    }
}
