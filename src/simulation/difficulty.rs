//! Difficulty tiers - predator pressure and overall pace

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::error::SimError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[display(fmt = "easy")]
    Easy,
    #[default]
    #[display(fmt = "normal")]
    Normal,
    #[display(fmt = "hard")]
    Hard,
    #[display(fmt = "nightmare")]
    Nightmare,
}

/// Tuning applied for one difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyConfig {
    /// Scales hazard spawn rates, cat arrival rate and hawk odds
    pub predator_spawn_multiplier: f32,
    /// Scales the frame step for every moving thing
    pub speed_multiplier: f32,
    /// Crows and cats in the opening batch
    pub initial_predators: u32,
    pub description: &'static str,
}

const EASY: DifficultyConfig = DifficultyConfig {
    predator_spawn_multiplier: 0.5,
    speed_multiplier: 0.8,
    initial_predators: 2,
    description: "Fewer and slower predators",
};

const NORMAL: DifficultyConfig = DifficultyConfig {
    predator_spawn_multiplier: 1.0,
    speed_multiplier: 1.0,
    initial_predators: 4,
    description: "Balanced difficulty",
};

const HARD: DifficultyConfig = DifficultyConfig {
    predator_spawn_multiplier: 1.5,
    speed_multiplier: 1.2,
    initial_predators: 6,
    description: "More predators, faster speeds",
};

const NIGHTMARE: DifficultyConfig = DifficultyConfig {
    predator_spawn_multiplier: 2.0,
    speed_multiplier: 1.5,
    initial_predators: 8,
    description: "Swarms of fast predators",
};

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Nightmare,
    ];

    pub fn config(&self) -> &'static DifficultyConfig {
        match self {
            Self::Easy => &EASY,
            Self::Normal => &NORMAL,
            Self::Hard => &HARD,
            Self::Nightmare => &NIGHTMARE,
        }
    }

    /// Lenient lookup used for stored settings; unknown names become normal
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown difficulty '{}', falling back to normal", name);
            Self::Normal
        })
    }
}

impl FromStr for Difficulty {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            "nightmare" => Ok(Self::Nightmare),
            _ => Err(SimError::UnknownDifficulty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" Nightmare ".parse::<Difficulty>().unwrap(), Difficulty::Nightmare);
        assert!(matches!(
            "brutal".parse::<Difficulty>(),
            Err(SimError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_unknown_name_falls_back_to_normal() {
        assert_eq!(Difficulty::from_name_or_default("brutal"), Difficulty::Normal);
        assert_eq!(Difficulty::from_name_or_default("easy"), Difficulty::Easy);
    }

    #[test]
    fn test_tiers_escalate() {
        for pair in Difficulty::ALL.windows(2) {
            let (a, b) = (pair[0].config(), pair[1].config());
            assert!(a.predator_spawn_multiplier < b.predator_spawn_multiplier);
            assert!(a.speed_multiplier < b.speed_multiplier);
            assert!(a.initial_predators < b.initial_predators);
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.to_string().parse::<Difficulty>().unwrap(), difficulty);
        }
    }
}
