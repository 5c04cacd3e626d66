//! Built-in content
//!
//! Used whenever a data file is missing or fails to parse, and written out
//! by `export_default_data` as a starting point for modding.

use std::collections::BTreeMap;

use super::defs::*;
use crate::entities::Effect;
use crate::items::ItemSlot;

fn s(value: &str) -> String {
    value.to_string()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn qty(resource: &str, qty: u32) -> ResourceQty {
    ResourceQty { resource: s(resource), qty }
}

fn stat_map(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| (s(k), *v)).collect()
}

fn ranges(entries: &[(&str, f64, f64)]) -> BTreeMap<String, StatRange> {
    entries
        .iter()
        .map(|(k, min, max)| (s(k), StatRange { min: *min, max: *max }))
        .collect()
}

pub fn default_tiers() -> Vec<TierDef> {
    vec![
        TierDef {
            id: s("t1"),
            name: s("Outskirts"),
            base_power: 10.0,
            recommended_level: 1,
            enemy_hp: 40.0,
            enemy_atk: 6.0,
            node_hp: 20.0,
        },
        TierDef {
            id: s("t2"),
            name: s("Wildlands"),
            base_power: 25.0,
            recommended_level: 8,
            enemy_hp: 90.0,
            enemy_atk: 12.0,
            node_hp: 35.0,
        },
        TierDef {
            id: s("t3"),
            name: s("Deepreach"),
            base_power: 50.0,
            recommended_level: 16,
            enemy_hp: 180.0,
            enemy_atk: 22.0,
            node_hp: 55.0,
        },
    ]
}

pub fn default_rarities() -> Vec<RarityDef> {
    let rarity = |id: &str, name: &str, prefix: &str, stat, affix, gold, max| RarityDef {
        id: s(id),
        name: s(name),
        prefix: s(prefix),
        stat_mult: stat,
        affix_mult: affix,
        gold_mult: gold,
        max_affixes: max,
    };
    vec![
        rarity("common", "Common", "", 1.0, 1.0, 1.0, 0),
        rarity("uncommon", "Uncommon", "Fine", 1.1, 1.1, 1.5, 1),
        rarity("rare", "Rare", "Rare", 1.25, 1.25, 3.0, 2),
        rarity("epic", "Epic", "Epic", 1.45, 1.5, 6.0, 3),
        rarity("legendary", "Legendary", "Legendary", 1.75, 1.8, 12.0, 4),
    ]
}

pub fn default_qualities() -> Vec<QualityDef> {
    let quality = |id: &str, name: &str, stat, gold| QualityDef {
        id: s(id),
        name: s(name),
        stat_mult: stat,
        gold_mult: gold,
    };
    vec![
        quality("poor", "Poor", 0.8, 0.6),
        quality("normal", "Normal", 1.0, 1.0),
        quality("superior", "Superior", 1.15, 1.4),
        quality("masterwork", "Masterwork", 1.3, 2.0),
        quality("perfect", "Perfect", 1.5, 3.0),
    ]
}

pub fn default_resources() -> Vec<ResourceDef> {
    [
        ("softwood", "Softwood", "t1"),
        ("resin_sap", "Resin Sap", "t1"),
        ("rough_stone", "Rough Stone", "t1"),
        ("iron_ore", "Iron Ore", "t1"),
        ("wild_fibers", "Wild Fibers", "t1"),
        ("healing_herb", "Healing Herb", "t1"),
        ("raw_leather", "Raw Leather", "t1"),
        ("plank", "Plank", "t1"),
        ("iron_ingot", "Iron Ingot", "t1"),
        ("oak_log", "Oak Log", "t2"),
        ("copper_ore", "Copper Ore", "t2"),
        ("glow_mushroom", "Glow Mushroom", "t2"),
        ("crystal_shard", "Crystal Shard", "t3"),
    ]
    .iter()
    .map(|(id, name, tier)| ResourceDef {
        id: s(id),
        name: s(name),
        tier: Some(s(tier)),
    })
    .collect()
}

pub fn default_nodes() -> Vec<NodeDef> {
    let node = |id: &str, name: &str, resource: &str, tier: &str, min, max, respawn| NodeDef {
        id: s(id),
        name: s(name),
        resource: s(resource),
        tier: s(tier),
        node_hp: None,
        yield_range: YieldRange { min, max },
        respawn_sec: respawn,
    };
    vec![
        node("softwood_tree", "Softwood Tree", "softwood", "t1", 1, 3, 5.0),
        node("sap_tree", "Weeping Pine", "resin_sap", "t1", 1, 2, 8.0),
        node("stone_outcrop", "Stone Outcrop", "rough_stone", "t1", 1, 3, 5.0),
        node("iron_vein", "Iron Vein", "iron_ore", "t1", 1, 2, 7.0),
        node("fiber_patch", "Fiber Patch", "wild_fibers", "t1", 1, 3, 4.0),
        node("herb_bush", "Herb Bush", "healing_herb", "t1", 1, 2, 6.0),
        node("oak_tree", "Old Oak", "oak_log", "t2", 1, 3, 8.0),
        node("copper_vein", "Copper Vein", "copper_ore", "t2", 1, 2, 9.0),
        node("mushroom_ring", "Mushroom Ring", "glow_mushroom", "t2", 1, 2, 9.0),
        node("crystal_cluster", "Crystal Cluster", "crystal_shard", "t3", 1, 2, 12.0),
    ]
}

pub fn default_item_bases() -> Vec<ItemBaseDef> {
    let base = |id: &str,
                name: &str,
                slot: ItemSlot,
                tier: &str,
                tags: &[&str],
                material: Option<&str>,
                stats: &[(&str, f64, f64)]| ItemBaseDef {
        id: s(id),
        name: s(name),
        slot,
        tier: s(tier),
        tags: strings(tags),
        material: material.map(s),
        base_stats: ranges(stats),
        effect: None,
    };

    let mut bases = vec![
        // Weapons
        base("rusty_sword", "Rusty Sword", ItemSlot::Weapon, "t1", &["weapon", "melee"], Some("metal"),
            &[("atk", 3.0, 5.0)]),
        base("wooden_club", "Wooden Club", ItemSlot::Weapon, "t1", &["weapon", "melee"], Some("wood"),
            &[("atk", 2.0, 4.0), ("attack_speed", 0.05, 0.1)]),
        base("iron_sword", "Iron Sword", ItemSlot::Weapon, "t2", &["weapon", "melee"], Some("metal"),
            &[("atk", 8.0, 12.0)]),
        base("obsidian_blade", "Obsidian Blade", ItemSlot::Weapon, "t3", &["weapon", "melee"], Some("stone"),
            &[("atk", 16.0, 22.0), ("crit_chance", 1.0, 3.0)]),
        // Armor
        base("leather_cap", "Leather Cap", ItemSlot::Helmet, "t1", &["armor", "head"], Some("leather"),
            &[("def", 0.5, 1.0), ("hp_max", 2.0, 4.0)]),
        base("padded_vest", "Padded Vest", ItemSlot::Chest, "t1", &["armor", "body"], Some("cloth"),
            &[("def", 1.0, 2.0), ("hp_max", 5.0, 8.0)]),
        base("worn_leggings", "Worn Leggings", ItemSlot::Legs, "t1", &["armor", "legs"], Some("cloth"),
            &[("def", 0.5, 1.5), ("hp_max", 3.0, 5.0)]),
        base("worn_boots", "Worn Boots", ItemSlot::Boots, "t1", &["armor", "feet"], Some("leather"),
            &[("def", 0.5, 1.0), ("evasion", 0.5, 1.5)]),
        base("cloth_gloves", "Cloth Gloves", ItemSlot::Gloves, "t1", &["armor", "hands"], Some("cloth"),
            &[("def", 0.3, 0.8), ("accuracy", 1.0, 2.0)]),
        base("iron_helm", "Iron Helm", ItemSlot::Helmet, "t2", &["armor", "head"], Some("metal"),
            &[("def", 2.0, 3.0), ("armor", 1.0, 2.0)]),
        base("iron_chestplate", "Iron Chestplate", ItemSlot::Chest, "t2", &["armor", "body"], Some("metal"),
            &[("def", 4.0, 6.0), ("armor", 2.0, 4.0), ("hp_max", 10.0, 15.0)]),
        // Jewelry
        base("copper_ring", "Copper Ring", ItemSlot::Ring, "t1", &["jewelry", "ring"], Some("metal"),
            &[("crit_chance", 0.5, 1.0)]),
        base("bone_amulet", "Bone Amulet", ItemSlot::Amulet, "t1", &["jewelry", "amulet"], None,
            &[("hp_max", 3.0, 5.0)]),
        base("silver_ring", "Silver Ring", ItemSlot::Ring, "t2", &["jewelry", "ring"], Some("metal"),
            &[("crit_chance", 1.0, 2.0), ("crit_damage", 5.0, 10.0)]),
        // Tools
        base("stone_pickaxe", "Stone Pickaxe", ItemSlot::ToolOre, "t1", &["tool", "ore"], Some("wood"),
            &[("gather_power_ore", 2.0, 4.0)]),
        base("flint_hatchet", "Flint Hatchet", ItemSlot::ToolWood, "t1", &["tool", "wood"], Some("wood"),
            &[("gather_power_wood", 2.0, 4.0)]),
        base("bone_sickle", "Bone Sickle", ItemSlot::ToolHerb, "t1", &["tool", "herb"], None,
            &[("gather_power_herb", 2.0, 4.0)]),
        base("iron_pickaxe", "Iron Pickaxe", ItemSlot::ToolOre, "t2", &["tool", "ore"], Some("metal"),
            &[("gather_power_ore", 6.0, 9.0), ("gather_speed", 2.0, 5.0)]),
    ];

    let potion = |id: &str, name: &str, effect: Effect| ItemBaseDef {
        id: s(id),
        name: s(name),
        slot: ItemSlot::Consumable,
        tier: s("t1"),
        tags: strings(&["consumable", "potion"]),
        material: None,
        base_stats: BTreeMap::new(),
        effect: Some(effect),
    };
    bases.push(potion("minor_healing_potion", "Minor Healing Potion", Effect::Heal { value: 25.0 }));
    bases.push(potion("strength_tonic", "Strength Tonic", Effect::BuffAtk { value: 3.0, duration: 60.0 }));
    bases.push(potion("bark_draught", "Bark Draught", Effect::BuffDef { value: 2.0, duration: 60.0 }));
    bases.push(potion("quickstep_elixir", "Quickstep Elixir", Effect::BuffSpeed { value: 0.15, duration: 45.0 }));
    bases
}

pub fn default_affixes() -> Vec<AffixDef> {
    let affix = |id: &str, name: &str, stat: &str, min, max, tags: &[&str], tier_min| AffixDef {
        id: s(id),
        name: s(name),
        stat: s(stat),
        min,
        max,
        tags: strings(tags),
        tier_min,
    };
    vec![
        affix("sharp", "of Sharpness", "atk", 1.0, 3.0, &["weapon"], 1),
        affix("keen", "of Keenness", "crit_chance", 1.0, 3.0, &["weapon", "jewelry"], 1),
        affix("brutal", "of Brutality", "crit_damage", 5.0, 15.0, &["weapon"], 1),
        affix("swift", "of Swiftness", "attack_speed", 0.03, 0.08, &["weapon", "jewelry"], 1),
        affix("flaming", "of Embers", "fire_damage", 1.0, 3.0, &["weapon"], 2),
        affix("frosted", "of Frost", "ice_damage", 1.0, 3.0, &["weapon"], 2),
        affix("vampiric", "of the Leech", "lifesteal", 1.0, 3.0, &["weapon"], 2),
        affix("serrated", "of Bleeding", "proc_bleed_chance", 2.0, 5.0, &["weapon"], 2),
        affix("venomous", "of Venom", "proc_poison_chance", 2.0, 5.0, &["weapon"], 2),
        affix("concussive", "of Concussion", "proc_stun_chance", 1.0, 3.0, &["weapon"], 3),
        affix("sturdy", "of Vigor", "hp_max", 3.0, 8.0, &["armor", "jewelry"], 1),
        affix("guarding", "of Guarding", "def", 1.0, 2.0, &["armor"], 1),
        affix("plated", "of Plating", "armor", 1.0, 2.0, &["armor"], 1),
        affix("evasive", "of Evasion", "evasion", 1.0, 3.0, &["armor", "jewelry"], 1),
        affix("regenerating", "of Mending", "hp_regen", 0.1, 0.3, &["armor", "jewelry"], 1),
        affix("thorned", "of Thorns", "thorns", 1.0, 3.0, &["armor"], 2),
        affix("warded", "of Warding", "elemental_resist", 2.0, 5.0, &["armor", "jewelry"], 2),
        affix("lucky", "of Luck", "double_drop", 2.0, 5.0, &["tool"], 1),
        affix("efficient", "of Efficiency", "gather_speed", 3.0, 8.0, &["tool"], 1),
        affix("prospecting", "of Plenty", "bonus_resources", 2.0, 6.0, &["tool", "jewelry"], 1),
        affix("greedy", "of Greed", "gold_gain", 2.0, 5.0, &["jewelry"], 1),
        affix("studious", "of Study", "xp_gain", 2.0, 5.0, &["jewelry"], 2),
    ]
}

pub fn default_sets() -> Vec<SetDef> {
    vec![SetDef {
        id: s("wanderer"),
        name: s("Wanderer's Garb"),
        bonuses: vec![
            SetBonus { pieces: 2, stats: stat_map(&[("hp_max", 5.0)]) },
            SetBonus { pieces: 3, stats: stat_map(&[("def", 2.0), ("hp_regen", 0.2)]) },
        ],
    }]
}

pub fn default_stations() -> Vec<StationDef> {
    vec![
        StationDef {
            id: s("workbench"),
            name: s("Workbench"),
            level_required: 1,
            unlock_cost_gold: 0,
            unlock_cost_resources: vec![],
        },
        StationDef {
            id: s("alchemy_table"),
            name: s("Alchemy Table"),
            level_required: 2,
            unlock_cost_gold: 80,
            unlock_cost_resources: vec![qty("healing_herb", 8), qty("softwood", 5)],
        },
        StationDef {
            id: s("forge"),
            name: s("Forge"),
            level_required: 3,
            unlock_cost_gold: 150,
            unlock_cost_resources: vec![qty("iron_ore", 10), qty("rough_stone", 10)],
        },
    ]
}

pub fn default_recipes() -> Vec<RecipeDef> {
    let recipe = |id: &str, name: &str, station: &str, level, gold, inputs: Vec<ResourceQty>, outputs| RecipeDef {
        id: s(id),
        name: s(name),
        station: Some(s(station)),
        level_required: level,
        gold_cost: gold,
        inputs,
        outputs,
    };
    let item = |base: &str| vec![RecipeOutput::Item { item_base: s(base) }];
    let resource = |id: &str, n| vec![RecipeOutput::Resource { resource: s(id), qty: n }];

    vec![
        recipe("saw_planks", "Saw Planks", "workbench", 1, 0,
            vec![qty("softwood", 3)], resource("plank", 1)),
        recipe("craft_rusty_sword", "Rusty Sword", "workbench", 1, 5,
            vec![qty("softwood", 2), qty("rough_stone", 3)], item("rusty_sword")),
        recipe("craft_wooden_club", "Wooden Club", "workbench", 1, 2,
            vec![qty("softwood", 4)], item("wooden_club")),
        recipe("craft_padded_vest", "Padded Vest", "workbench", 1, 5,
            vec![qty("wild_fibers", 4)], item("padded_vest")),
        recipe("craft_leather_cap", "Leather Cap", "workbench", 2, 8,
            vec![qty("raw_leather", 3)], item("leather_cap")),
        recipe("craft_stone_pickaxe", "Stone Pickaxe", "workbench", 1, 3,
            vec![qty("softwood", 2), qty("rough_stone", 2)], item("stone_pickaxe")),
        recipe("craft_flint_hatchet", "Flint Hatchet", "workbench", 1, 3,
            vec![qty("softwood", 2), qty("rough_stone", 2)], item("flint_hatchet")),
        recipe("brew_minor_healing", "Minor Healing Potion", "alchemy_table", 2, 3,
            vec![qty("healing_herb", 2)], item("minor_healing_potion")),
        recipe("brew_strength_tonic", "Strength Tonic", "alchemy_table", 3, 10,
            vec![qty("healing_herb", 2), qty("resin_sap", 2)], item("strength_tonic")),
        recipe("smelt_iron", "Smelt Iron", "forge", 3, 2,
            vec![qty("iron_ore", 3)], resource("iron_ingot", 1)),
        recipe("craft_iron_sword", "Iron Sword", "forge", 8, 60,
            vec![qty("iron_ingot", 4), qty("plank", 2)], item("iron_sword")),
        recipe("craft_iron_pickaxe", "Iron Pickaxe", "forge", 8, 50,
            vec![qty("iron_ingot", 3), qty("plank", 2)], item("iron_pickaxe")),
    ]
}

pub fn default_enemies() -> Vec<EnemyDef> {
    let drops = |entries: &[(&str, f64)]| -> Vec<ResourceDrop> {
        entries
            .iter()
            .map(|(resource, chance)| ResourceDrop { resource: s(resource), chance_pct: *chance })
            .collect()
    };
    let enemy = |id: &str, name: &str, tier: &str, is_boss, stats: EnemyStatsDef, gold: (u64, u64),
                 resource_drops: Vec<ResourceDrop>, item_chance, xp| EnemyDef {
        id: s(id),
        name: s(name),
        tier: s(tier),
        is_boss,
        stats,
        loot: EnemyLootDef {
            gold: GoldRange { min: gold.0, max: gold.1 },
            resource_drops,
            item_drop_chance_pct: item_chance,
        },
        xp: Some(xp),
    };
    let stats = |hp, atk, def, armor, attack_speed, crit_chance| EnemyStatsDef {
        hp: Some(hp),
        atk: Some(atk),
        def,
        armor,
        attack_speed,
        crit_chance,
    };

    vec![
        enemy("slime", "Slime", "t1", false, stats(30.0, 3.0, 0.0, 0.0, 0.8, 0.0), (1, 3),
            drops(&[("wild_fibers", 20.0)]), 8.0, 5),
        enemy("wild_boar", "Wild Boar", "t1", false, stats(45.0, 4.0, 1.0, 0.0, 0.9, 2.0), (2, 4),
            drops(&[("raw_leather", 35.0)]), 8.0, 7),
        enemy("goblin_scout", "Goblin Scout", "t1", false, stats(38.0, 5.0, 0.5, 0.0, 1.1, 3.0), (2, 6),
            drops(&[("iron_ore", 15.0), ("softwood", 20.0)]), 10.0, 8),
        enemy("meadow_king", "The Meadow King", "t1", true, stats(60.0, 5.0, 2.0, 1.0, 0.8, 5.0), (20, 40),
            drops(&[("healing_herb", 60.0), ("raw_leather", 60.0)]), 60.0, 40),
        enemy("forest_wolf", "Forest Wolf", "t2", false, stats(85.0, 11.0, 2.0, 1.0, 1.2, 5.0), (5, 10),
            drops(&[("raw_leather", 40.0)]), 10.0, 18),
        enemy("bandit", "Road Bandit", "t2", false, stats(100.0, 12.0, 4.0, 2.0, 1.0, 4.0), (8, 15),
            drops(&[("iron_ore", 30.0), ("copper_ore", 20.0)]), 14.0, 22),
        enemy("oak_warden", "The Oak Warden", "t2", true, stats(120.0, 13.0, 6.0, 3.0, 0.7, 5.0), (60, 100),
            drops(&[("oak_log", 80.0)]), 70.0, 120),
        enemy("cave_lurker", "Cave Lurker", "t3", false, stats(170.0, 20.0, 6.0, 4.0, 1.0, 6.0), (15, 30),
            drops(&[("crystal_shard", 20.0)]), 12.0, 40),
    ]
}

pub fn default_zones() -> Vec<ZoneDef> {
    vec![
        ZoneDef {
            id: s("sprouting_meadow"),
            name: s("Sprouting Meadow"),
            tier: s("t1"),
            enemies: strings(&["slime", "wild_boar", "goblin_scout"]),
            boss: Some(s("meadow_king")),
            resources: strings(&["softwood", "resin_sap", "rough_stone", "iron_ore", "wild_fibers", "healing_herb"]),
            environment_effects: vec![],
        },
        ZoneDef {
            id: s("whispering_woods"),
            name: s("Whispering Woods"),
            tier: s("t2"),
            enemies: strings(&["forest_wolf", "bandit"]),
            boss: Some(s("oak_warden")),
            resources: strings(&["oak_log", "copper_ore", "glow_mushroom"]),
            environment_effects: vec![EnvEffect { stat: s("evasion"), value: -2.0 }],
        },
        ZoneDef {
            id: s("crystal_caverns"),
            name: s("Crystal Caverns"),
            tier: s("t3"),
            enemies: strings(&["cave_lurker"]),
            boss: None,
            resources: strings(&["crystal_shard"]),
            environment_effects: vec![
                EnvEffect { stat: s("accuracy"), value: -3.0 },
                EnvEffect { stat: s("elemental_resist"), value: -5.0 },
            ],
        },
    ]
}

pub fn default_skills() -> Vec<SkillDef> {
    let effect = |stat: &str, kind, value| SkillEffect { stat: s(stat), kind, value };
    vec![
        SkillDef {
            id: s("toughness"),
            name: s("Toughness"),
            description: s("Permanently raises maximum HP."),
            requires_level: 2,
            cost: vec![Cost::Gold(50), Cost::Resource { resource: s("softwood"), qty: 5 }],
            effects: vec![effect("hp_max", SkillEffectKind::Flat, 10.0)],
        },
        SkillDef {
            id: s("forager"),
            name: s("Forager"),
            description: s("Better at pulling wood and herbs."),
            requires_level: 2,
            cost: vec![Cost::Resource { resource: s("wild_fibers"), qty: 6 }],
            effects: vec![
                effect("gather_power_wood", SkillEffectKind::Flat, 3.0),
                effect("gather_power_herb", SkillEffectKind::Flat, 3.0),
            ],
        },
        SkillDef {
            id: s("sharpened_mind"),
            name: s("Sharpened Mind"),
            description: s("Hits harder and finds weak spots."),
            requires_level: 3,
            cost: vec![Cost::Gold(80)],
            effects: vec![
                effect("atk", SkillEffectKind::Percent, 10.0),
                effect("crit_chance", SkillEffectKind::Flat, 1.0),
            ],
        },
        SkillDef {
            id: s("hardened"),
            name: s("Hardened"),
            description: s("Skin like bark."),
            requires_level: 5,
            cost: vec![Cost::Gold(150), Cost::Resource { resource: s("iron_ore"), qty: 10 }],
            effects: vec![effect("def", SkillEffectKind::Flat, 2.0)],
        },
    ]
}

pub fn default_station_upgrades() -> Vec<StationUpgradeDef> {
    vec![
        StationUpgradeDef {
            station_id: s("workbench"),
            upgrades: vec![
                StationUpgradeLevel {
                    level: 1,
                    cost: vec![Cost::Gold(50), Cost::Resource { resource: s("softwood"), qty: 10 }],
                    bonus: stat_map(&[("craft_speed", 5.0)]),
                },
                StationUpgradeLevel {
                    level: 2,
                    cost: vec![Cost::Gold(150), Cost::Resource { resource: s("plank"), qty: 10 }],
                    bonus: stat_map(&[("craft_speed", 10.0), ("dismantle_bonus", 10.0)]),
                },
            ],
        },
        StationUpgradeDef {
            station_id: s("forge"),
            upgrades: vec![StationUpgradeLevel {
                level: 1,
                cost: vec![Cost::Gold(200), Cost::Resource { resource: s("iron_ingot"), qty: 5 }],
                bonus: stat_map(&[("reroll_cost_reduction", 10.0)]),
            }],
        },
    ]
}
