//! Level progression - score thresholds and per-level hazard pressure
//!
//! Thresholds are authored for a 100-seed run with a neutral species and
//! scaled to the actual run: more seeds mean more points are available, and
//! stronger species have to work harder for each level.

use serde::Serialize;

use crate::entity::species::Species;

/// One tier of the level ladder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelConfig {
    pub level: u32,
    /// Score needed at the reference seed count (100) and multiplier 1.0
    pub min_score: u32,
    /// Snake spawn attempts per second
    pub snake_spawn_rate: f32,
    pub max_snakes: usize,
    /// Rat spawn attempts per second
    pub rat_spawn_rate: f32,
    pub max_rats: usize,
    pub description: &'static str,
    // Scenery, carried for the presentation layer
    pub background_color: &'static str,
    pub grass_color: &'static str,
    pub tree_count: u32,
    pub bush_count: u32,
}

/// Seed count the `min_score` column is authored against
pub const REFERENCE_SEED_COUNT: u32 = 100;

pub const LEVELS: [LevelConfig; 5] = [
    LevelConfig {
        level: 1,
        min_score: 0,
        snake_spawn_rate: 0.3,
        max_snakes: 1,
        rat_spawn_rate: 0.2,
        max_rats: 1,
        description: "Garden Meadow",
        background_color: "#87CEEB",
        grass_color: "#90EE90",
        tree_count: 2,
        bush_count: 4,
    },
    LevelConfig {
        level: 2,
        min_score: 250,
        snake_spawn_rate: 0.4,
        max_snakes: 2,
        rat_spawn_rate: 0.3,
        max_rats: 2,
        description: "Wild Field",
        background_color: "#87CEEB",
        grass_color: "#7BC67B",
        tree_count: 4,
        bush_count: 6,
    },
    LevelConfig {
        level: 3,
        min_score: 600,
        snake_spawn_rate: 0.5,
        max_snakes: 3,
        rat_spawn_rate: 0.4,
        max_rats: 2,
        description: "Twilight Forest",
        background_color: "#FFB6C1",
        grass_color: "#6AA86A",
        tree_count: 6,
        bush_count: 8,
    },
    LevelConfig {
        level: 4,
        min_score: 1200,
        snake_spawn_rate: 0.6,
        max_snakes: 4,
        rat_spawn_rate: 0.5,
        max_rats: 3,
        description: "Midnight Wilderness",
        background_color: "#191970",
        grass_color: "#2D5016",
        tree_count: 8,
        bush_count: 10,
    },
    LevelConfig {
        level: 5,
        min_score: 2000,
        snake_spawn_rate: 0.8,
        max_snakes: 5,
        rat_spawn_rate: 0.6,
        max_rats: 4,
        description: "Shadow Realm",
        background_color: "#4B0082",
        grass_color: "#1a3a1a",
        tree_count: 10,
        bush_count: 12,
    },
];

/// How hard a species has to work for each level
///
/// Predators catch their points more easily, so their thresholds are raised.
pub fn species_multiplier(species: Option<Species>) -> f32 {
    match species {
        Some(Species::Hawk) | Some(Species::Cat) => 1.5,
        Some(Species::Crow) => 1.3,
        Some(Species::Sparrow) | Some(Species::Chickadee) => 1.0,
        Some(Species::Dove) | Some(Species::Squirrel) => 0.8,
        None => 1.0,
    }
}

/// Score required to reach `level` for this run
pub fn adjusted_threshold(level: &LevelConfig, seed_count: u32, species: Option<Species>) -> u32 {
    let seed_scale = seed_count as f64 / REFERENCE_SEED_COUNT as f64;
    (level.min_score as f64 * seed_scale * species_multiplier(species) as f64).floor() as u32
}

/// Highest level whose adjusted threshold the score has reached
pub fn level_config(score: u32, seed_count: u32, species: Option<Species>) -> &'static LevelConfig {
    let mut current = &LEVELS[0];
    for level in LEVELS.iter() {
        if score < adjusted_threshold(level, seed_count, species) {
            break;
        }
        current = level;
    }
    current
}

/// Adjusted threshold of the next level, or `None` at the top tier
pub fn next_level_threshold(score: u32, seed_count: u32, species: Option<Species>) -> Option<u32> {
    LEVELS
        .iter()
        .map(|level| adjusted_threshold(level, seed_count, species))
        .find(|&threshold| threshold > score)
}
