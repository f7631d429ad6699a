//! Species catalog - static physical and behavioral constants per creature

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::error::SimError;

/// Every creature that can appear around the feeder
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    #[display(fmt = "hawk")]
    Hawk,
    #[display(fmt = "dove")]
    Dove,
    #[display(fmt = "sparrow")]
    Sparrow,
    #[display(fmt = "chickadee")]
    Chickadee,
    #[display(fmt = "crow")]
    Crow,
    #[display(fmt = "squirrel")]
    Squirrel,
    #[display(fmt = "cat")]
    Cat,
}

/// Immutable per-species descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeciesInfo {
    /// Collision radius in screen units
    pub radius: f32,
    /// Base speed; agents are clamped to three times this
    pub speed: f32,
    /// Scales seek impulses (0.0 = timid, 1.2 = relentless)
    pub aggression: f32,
    /// Number of sprite animation frames
    pub sprite_frames: u32,
    /// Seeds this species can eat before leaving the feeder (0 = never eats)
    pub max_seeds: u32,
}

const HAWK: SpeciesInfo = SpeciesInfo { radius: 14.0, speed: 1.6, aggression: 1.0, sprite_frames: 4, max_seeds: 0 };
const DOVE: SpeciesInfo = SpeciesInfo { radius: 10.0, speed: 1.2, aggression: 0.2, sprite_frames: 4, max_seeds: 10 };
const SPARROW: SpeciesInfo = SpeciesInfo { radius: 9.0, speed: 1.4, aggression: 0.6, sprite_frames: 4, max_seeds: 2 };
const CHICKADEE: SpeciesInfo = SpeciesInfo { radius: 7.0, speed: 1.5, aggression: 0.5, sprite_frames: 4, max_seeds: 1 };
const CROW: SpeciesInfo = SpeciesInfo { radius: 16.0, speed: 2.0, aggression: 1.0, sprite_frames: 4, max_seeds: 0 };
const SQUIRREL: SpeciesInfo = SpeciesInfo { radius: 12.0, speed: 1.3, aggression: 0.3, sprite_frames: 2, max_seeds: 1 };
const CAT: SpeciesInfo = SpeciesInfo { radius: 15.0, speed: 1.7, aggression: 1.2, sprite_frames: 3, max_seeds: 0 };

impl Species {
    pub const ALL: [Species; 7] = [
        Species::Hawk,
        Species::Dove,
        Species::Sparrow,
        Species::Chickadee,
        Species::Crow,
        Species::Squirrel,
        Species::Cat,
    ];

    pub fn info(&self) -> &'static SpeciesInfo {
        match self {
            Self::Hawk => &HAWK,
            Self::Dove => &DOVE,
            Self::Sparrow => &SPARROW,
            Self::Chickadee => &CHICKADEE,
            Self::Crow => &CROW,
            Self::Squirrel => &SQUIRREL,
            Self::Cat => &CAT,
        }
    }

    pub fn radius(&self) -> f32 {
        self.info().radius
    }

    pub fn speed(&self) -> f32 {
        self.info().speed
    }

    pub fn aggression(&self) -> f32 {
        self.info().aggression
    }

    pub fn max_seeds(&self) -> u32 {
        self.info().max_seeds
    }

    /// Chickadees, doves, sparrows and squirrels
    pub fn is_seed_eater(&self) -> bool {
        self.max_seeds() > 0
    }

    /// Cats and squirrels walk the grass line and never fly
    pub fn is_ground_bound(&self) -> bool {
        matches!(self, Self::Cat | Self::Squirrel)
    }

    /// Hawks and doves and the like
    pub fn is_flyer(&self) -> bool {
        !self.is_ground_bound()
    }

    /// Species that scare doves and sparrows off
    pub fn is_threat_to_songbirds(&self) -> bool {
        matches!(self, Self::Hawk | Self::Cat)
    }

    /// Species that can catch a rat
    pub fn hunts_rats(&self) -> bool {
        matches!(self, Self::Hawk | Self::Crow)
    }
}

impl FromStr for Species {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hawk" => Ok(Self::Hawk),
            "dove" => Ok(Self::Dove),
            "sparrow" => Ok(Self::Sparrow),
            "chickadee" => Ok(Self::Chickadee),
            "crow" => Ok(Self::Crow),
            "squirrel" => Ok(Self::Squirrel),
            "cat" => Ok(Self::Cat),
            other => Err(SimError::UnknownSpecies(other.to_string())),
        }
    }
}
