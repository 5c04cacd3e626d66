//! Procedural item generation
//!
//! Base template + tier + rarity + quality + random affixes gives a
//! concrete item with derived stats, power score and value.

use rand::seq::SliceRandom;
use rand::Rng;

use super::item::{Affix, Item, ItemId, ItemSlot};
use crate::data::{tier_number, DataManager, QualityDef, RarityDef};
use crate::stats::StatBlock;

/// Affix values grow with tier by `tier^TIER_SCALING_EXPONENT`
pub const TIER_SCALING_EXPONENT: f64 = 0.35;

/// Cumulative rarity thresholds over a 0-100 roll
const RARITY_TABLE: [(f64, &str); 5] = [
    (85.0, "common"),
    (96.0, "uncommon"),
    (99.0, "rare"),
    (99.8, "epic"),
    (100.0, "legendary"),
];

/// Cumulative quality thresholds over a 0-100 roll
const QUALITY_TABLE: [(f64, &str); 5] = [
    (60.0, "poor"),
    (88.0, "normal"),
    (97.0, "superior"),
    (99.5, "masterwork"),
    (100.0, "perfect"),
];

/// Quality ladder used for crafting upgrades, lowest first
pub const QUALITY_LADDER: [&str; 5] = ["poor", "normal", "superior", "masterwork", "perfect"];

/// Forced choices for `ItemGenerator::generate`; `None` means roll or use
/// the base template's value
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemOptions<'o> {
    pub tier: Option<&'o str>,
    pub rarity: Option<&'o str>,
    pub quality: Option<&'o str>,
    pub set_id: Option<&'o str>,
}

fn pick(table: &[(f64, &'static str)], roll: f64) -> &'static str {
    table
        .iter()
        .find(|(threshold, _)| roll < *threshold)
        .map(|(_, id)| *id)
        .unwrap_or(table[table.len() - 1].1)
}

/// Rarity for a roll in [0, 100)
pub fn rarity_for_roll(roll: f64) -> &'static str {
    pick(&RARITY_TABLE, roll)
}

/// Quality for a roll in [0, 100)
pub fn quality_for_roll(roll: f64) -> &'static str {
    pick(&QUALITY_TABLE, roll)
}

pub fn roll_rarity(rng: &mut impl Rng) -> &'static str {
    rarity_for_roll(rng.gen::<f64>() * 100.0)
}

pub fn roll_quality(rng: &mut impl Rng) -> &'static str {
    quality_for_roll(rng.gen::<f64>() * 100.0)
}

/// Next quality up the ladder, capped at the top. Unknown ids stay put.
pub fn next_quality(quality: &str) -> &str {
    match QUALITY_LADDER.iter().position(|q| *q == quality) {
        Some(i) => QUALITY_LADDER[(i + 1).min(QUALITY_LADDER.len() - 1)],
        None => quality,
    }
}

/// Fresh item id drawn from the session RNG
pub fn new_item_id(rng: &mut impl Rng) -> ItemId {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Uniform in [min, max]; a degenerate range yields `min`
pub fn roll_range(min: f64, max: f64, rng: &mut impl Rng) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generates items from reference data
pub struct ItemGenerator<'a> {
    data: &'a DataManager,
}

impl<'a> ItemGenerator<'a> {
    pub fn new(data: &'a DataManager) -> Self {
        Self { data }
    }

    /// Build an item from a base template. Unknown base ids give `None`.
    pub fn generate(&self, base_id: &str, options: ItemOptions<'_>, rng: &mut impl Rng) -> Option<Item> {
        let Some(base) = self.data.item_base(base_id) else {
            log::warn!("Unknown item base '{}'", base_id);
            return None;
        };

        let tier_id = options.tier.unwrap_or(base.tier.as_str());
        let rarity_id = options.rarity.unwrap_or_else(|| roll_rarity(rng));
        let quality_id = options.quality.unwrap_or_else(|| roll_quality(rng));

        let tier = self.data.tier_or_default(tier_id);
        let rarity = self.data.rarity(rarity_id).cloned().unwrap_or_default();
        let quality = self.data.quality(quality_id).cloned().unwrap_or_default();

        let mut base_stats = StatBlock::new();
        for (stat, range) in &base.base_stats {
            let rolled = roll_range(range.min, range.max, rng);
            base_stats.add_named(stat, rolled * quality.stat_mult * rarity.stat_mult);
        }

        let affixes = self.roll_affixes(&base.tags, tier_number(tier_id), &rarity, rng);

        let mut item = Item {
            id: new_item_id(rng),
            base_id: base.id.clone(),
            name: format!("{} {}", rarity.prefix, base.name).trim().to_string(),
            slot: base.slot,
            tier: tier_id.to_string(),
            rarity: rarity_id.to_string(),
            quality: quality_id.to_string(),
            base_stats,
            affixes,
            set_id: options.set_id.map(str::to_string),
            material: base.material.clone(),
            gold_value: gold_value(tier.base_power, &rarity, &quality),
            level_requirement: tier.recommended_level,
            power_score: 0.0,
            equipped: false,
        };
        item.power_score = item.compute_power_score(tier.base_power);

        log::debug!("Generated {}", item.summary());
        Some(item)
    }

    /// Sample `rarity.max_affixes` distinct affixes matching the tags and
    /// tier, each scaled by tier and rarity
    pub fn roll_affixes(
        &self,
        tags: &[String],
        tier: u32,
        rarity: &RarityDef,
        rng: &mut impl Rng,
    ) -> Vec<Affix> {
        if rarity.max_affixes == 0 {
            return Vec::new();
        }
        let pool = self.data.affixes_for(tags, tier);
        let tier_scaling = (tier as f64).powf(TIER_SCALING_EXPONENT);

        pool.choose_multiple(rng, rarity.max_affixes.min(pool.len()))
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|def| {
                let rolled = roll_range(def.min, def.max, rng);
                Affix {
                    affix_id: def.id.clone(),
                    name: def.name.clone(),
                    stat: def.stat.clone(),
                    value: round2(rolled * tier_scaling * rarity.affix_mult),
                }
            })
            .collect()
    }

    /// A random item of the zone's tier, or `None` if nothing matches
    pub fn generate_random_drop(&self, zone_tier: &str, player_level: u32, rng: &mut impl Rng) -> Option<Item> {
        let candidates: Vec<&str> = self
            .data
            .item_bases
            .iter()
            .filter(|b| b.tier == zone_tier)
            .map(|b| b.id.as_str())
            .collect();

        let base_id = *candidates.choose(rng)?;
        log::debug!("Rolling {} drop for level {} player", base_id, player_level);
        self.generate(base_id, ItemOptions::default(), rng)
    }

    /// Common, poor quality tier 1 weapon, chest and helmet
    pub fn generate_starter_equipment(&self, rng: &mut impl Rng) -> Vec<Item> {
        let options = ItemOptions {
            rarity: Some("common"),
            quality: Some("poor"),
            ..ItemOptions::default()
        };

        let base_ids: Vec<String> = [ItemSlot::Weapon, ItemSlot::Chest, ItemSlot::Helmet]
            .iter()
            .filter_map(|slot| {
                self.data
                    .item_bases
                    .iter()
                    .find(|b| b.slot == *slot && b.tier == "t1")
                    .map(|b| b.id.clone())
            })
            .collect();

        base_ids
            .iter()
            .filter_map(|base_id| self.generate(base_id, options, rng))
            .collect()
    }
}

fn gold_value(base_power: f64, rarity: &RarityDef, quality: &QualityDef) -> u64 {
    (base_power * rarity.gold_mult * quality.gold_mult).max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rarity_thresholds() {
        assert_eq!(rarity_for_roll(0.0), "common");
        assert_eq!(rarity_for_roll(84.99), "common");
        assert_eq!(rarity_for_roll(85.0), "uncommon");
        assert_eq!(rarity_for_roll(98.5), "rare");
        assert_eq!(rarity_for_roll(99.5), "epic");
        assert_eq!(rarity_for_roll(99.9), "legendary");
    }

    #[test]
    fn test_quality_thresholds() {
        assert_eq!(quality_for_roll(59.9), "poor");
        assert_eq!(quality_for_roll(60.0), "normal");
        assert_eq!(quality_for_roll(90.0), "superior");
        assert_eq!(quality_for_roll(99.0), "masterwork");
        assert_eq!(quality_for_roll(99.7), "perfect");
    }

    #[test]
    fn test_quality_ladder() {
        assert_eq!(next_quality("poor"), "normal");
        assert_eq!(next_quality("masterwork"), "perfect");
        assert_eq!(next_quality("perfect"), "perfect");
        assert_eq!(next_quality("mystery"), "mystery");
    }

    #[test]
    fn test_unknown_base_is_none() {
        let data = DataManager::default();
        let generator = ItemGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generator.generate("no_such_base", ItemOptions::default(), &mut rng).is_none());
    }

    #[test]
    fn test_forced_generation() {
        let data = DataManager::default();
        let generator = ItemGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(7);

        let options = ItemOptions {
            rarity: Some("rare"),
            quality: Some("normal"),
            set_id: Some("wanderer"),
            ..ItemOptions::default()
        };
        let item = generator.generate("rusty_sword", options, &mut rng).unwrap();

        assert_eq!(item.name, "Rare Rusty Sword");
        assert_eq!(item.rarity, "rare");
        assert_eq!(item.set_id.as_deref(), Some("wanderer"));
        assert_eq!(item.affixes.len(), 2);
        // atk 3..5 * 1.25 * 1.0
        let atk = item.base_stats.get(StatId::Atk);
        assert!((3.75..=6.25).contains(&atk));
        // t1 base power 10 * rare 3.0 * normal 1.0
        assert_eq!(item.gold_value, 30);
        assert_eq!(item.level_requirement, 1);
        assert!((item.power_score - item.compute_power_score(10.0)).abs() < 1e-12);

        let ids: Vec<&str> = item.affixes.iter().map(|a| a.affix_id.as_str()).collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_affix_scaling_and_rounding() {
        let data = DataManager::default();
        let generator = ItemGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(3);
        let legendary = data.rarity("legendary").unwrap().clone();
        let tags = vec!["weapon".to_string()];

        let affixes = generator.roll_affixes(&tags, 3, &legendary, &mut rng);
        assert_eq!(affixes.len(), 4);
        let scale = 3f64.powf(0.35) * legendary.affix_mult;
        for affix in &affixes {
            let def = data.affix(&affix.affix_id).unwrap();
            assert!(affix.value >= round2(def.min * scale) - 0.01);
            assert!(affix.value <= round2(def.max * scale) + 0.01);
            assert_eq!(affix.value, round2(affix.value));
        }
    }

    #[test]
    fn test_small_pool_limits_affix_count() {
        let data = DataManager::default();
        let generator = ItemGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(5);
        let legendary = data.rarity("legendary").unwrap().clone();
        // Three tool affixes are unlocked at tier 1
        let tags = vec!["tool".to_string()];
        let affixes = generator.roll_affixes(&tags, 1, &legendary, &mut rng);
        assert_eq!(affixes.len(), 3);
        let none = generator.roll_affixes(&["nothing".to_string()], 1, &legendary, &mut rng);
        assert!(none.is_empty());
    }

    #[test]
    fn test_random_drop_respects_tier() {
        let data = DataManager::default();
        let generator = ItemGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let item = generator.generate_random_drop("t2", 8, &mut rng).unwrap();
            assert_eq!(item.tier, "t2");
        }
        assert!(generator.generate_random_drop("t9", 1, &mut rng).is_none());
    }

    #[test]
    fn test_starter_equipment() {
        let data = DataManager::default();
        let generator = ItemGenerator::new(&data);
        let mut rng = StdRng::seed_from_u64(0);
        let kit = generator.generate_starter_equipment(&mut rng);

        let bases: Vec<&str> = kit.iter().map(|i| i.base_id.as_str()).collect();
        assert_eq!(bases, vec!["rusty_sword", "padded_vest", "leather_cap"]);
        assert!(kit.iter().all(|i| i.rarity == "common" && i.quality == "poor"));
        assert!(kit.iter().all(|i| i.affixes.is_empty()));
    }

    #[test]
    fn test_seeded_ids_are_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(new_item_id(&mut a), new_item_id(&mut b));
        assert_ne!(new_item_id(&mut a), uuid::Uuid::nil());
    }
}
