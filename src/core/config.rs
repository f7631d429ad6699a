//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every field can be overridden from
//! a TOML file; missing keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the simulation systems
///
/// These values were tuned against the arcade pacing of the feeder game.
/// Changing them will affect gameplay pacing and feel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TIME ===
    /// Global multiplier applied to every frame step
    ///
    /// Scales all movement and acceleration at once so overall pace can be
    /// tuned without touching individual impulses.
    pub global_speed_scale: f32,

    /// Conversion from wall-clock milliseconds to frame units
    ///
    /// At 0.06, a 16.7 ms frame is one frame unit (60 units per second).
    pub frame_scale: f32,

    /// Upper bound on a single frame step, in frame units
    ///
    /// Prevents agents from tunnelling through each other after a long stall
    /// (tab switch, debugger pause).
    pub max_frame_delta: f32,

    /// Upper bound on simulation clock advance per tick (milliseconds)
    ///
    /// Matches `max_frame_delta / frame_scale` so timers and motion stall
    /// together.
    pub max_elapsed_ms: f64,

    /// Sprite frame duration in milliseconds of simulation time
    pub animation_frame_ms: f64,

    // === FEEDER ===
    /// Distance from the feeder at which an agent counts as "at the feeder"
    pub feeder_radius: f32,

    /// Impulse applied per frame when steering toward or away from the feeder
    pub feeder_pull: f32,

    /// Side of the square seeds are scattered in, centred on the feeder
    ///
    /// Seeds land within ±`seed_scatter / 2` of the feeder on each axis.
    pub seed_scatter: f32,

    /// Extra reach beyond an agent's radius within which it can eat a seed
    pub seed_reach: f32,

    // === PERCEPTION ===
    /// Range within which doves and sparrows notice hawks and cats
    pub flee_radius: f32,

    // === WORLD EDGES ===
    /// Fraction of screen height where the grass begins
    ///
    /// Cats and squirrels walk on `height * ratio + offset`.
    pub ground_baseline_ratio: f32,

    /// Range of the random per-agent offset below the ground baseline
    pub ground_offset_span: f32,

    /// How far past the edge a flyer travels before wrapping around
    pub wrap_margin: f32,

    /// How far past the edge a ground-bound agent walks before despawning
    pub ground_despawn_margin: f32,

    /// How far past the edge a ground hazard travels before wrapping around
    pub hazard_wrap_margin: f32,

    // === PERCHING ===
    /// Minimum flight time before a bird lands (seconds)
    pub perch_flight_min_secs: f64,

    /// Random extra flight time on top of the minimum (seconds)
    ///
    /// With defaults, birds land after 120-180 seconds aloft.
    pub perch_flight_jitter_secs: f64,

    /// Minimum time a bird stays perched (seconds)
    pub perch_rest_min_secs: f64,

    /// Random extra perch time on top of the minimum (seconds)
    ///
    /// With defaults, birds rest for 30-45 seconds.
    pub perch_rest_jitter_secs: f64,

    // === CROWS ===
    /// Time a crow hunts before giving up and flying away (seconds)
    pub crow_lifetime_secs: f64,

    /// Proportional pull toward the fly-out target
    ///
    /// Multiplies the full offset to the target, so the pull is strongest
    /// at the start and the speed clamp keeps it bounded.
    pub crow_fly_out_pull: f32,

    /// How far beyond the screen edge the fly-out target is placed
    ///
    /// Must exceed `crow_despawn_margin` so a departing crow crosses the
    /// despawn line before it reaches its target.
    pub crow_fly_out_offset: f32,

    /// How far outside the screen a departing crow must get before it is gone
    pub crow_despawn_margin: f32,

    /// Hawk kill count at which a crow is summoned to hunt it
    pub crow_escalation_kills: u32,

    /// Distance off-screen where a summoned crow appears
    pub crow_entry_offset: f32,

    // === SPAWNING ===
    /// Number of flock birds in the opening batch
    pub initial_flock: usize,

    /// Interval between flock bird arrivals (milliseconds)
    pub flock_spawn_interval_ms: f64,

    /// Minimum interval between squirrel arrivals (milliseconds)
    pub squirrel_spawn_min_ms: f64,

    /// Random extra squirrel interval (milliseconds)
    pub squirrel_spawn_jitter_ms: f64,

    /// Minimum interval between cat arrivals (milliseconds)
    ///
    /// Divided by the difficulty's predator spawn multiplier.
    pub cat_spawn_min_ms: f64,

    /// Random extra cat interval (milliseconds)
    pub cat_spawn_jitter_ms: f64,

    /// Distance off-screen where flock birds and cats enter
    pub edge_spawn_offset: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            // Time
            global_speed_scale: 0.6,
            frame_scale: 0.06,
            max_frame_delta: 60.0,
            max_elapsed_ms: 1000.0,
            animation_frame_ms: 100.0,

            // Feeder
            feeder_radius: 80.0,
            feeder_pull: 0.08,
            seed_scatter: 25.0,
            seed_reach: 5.0,

            // Perception
            flee_radius: 300.0,

            // World edges
            ground_baseline_ratio: 0.65,
            ground_offset_span: 40.0,
            wrap_margin: 50.0,
            ground_despawn_margin: 100.0,
            hazard_wrap_margin: 100.0,

            // Perching (120-180s aloft, 30-45s rest)
            perch_flight_min_secs: 120.0,
            perch_flight_jitter_secs: 60.0,
            perch_rest_min_secs: 30.0,
            perch_rest_jitter_secs: 15.0,

            // Crows
            crow_lifetime_secs: 60.0,
            crow_fly_out_pull: 0.015,
            crow_fly_out_offset: 400.0,
            crow_despawn_margin: 300.0,
            crow_escalation_kills: 10,
            crow_entry_offset: 120.0,

            // Spawning
            initial_flock: 8,
            flock_spawn_interval_ms: 2000.0,
            squirrel_spawn_min_ms: 15000.0,
            squirrel_spawn_jitter_ms: 5000.0,
            cat_spawn_min_ms: 20000.0,
            cat_spawn_jitter_ms: 10000.0,
            edge_spawn_offset: 50.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document over the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.global_speed_scale <= 0.0 || self.frame_scale <= 0.0 {
            return Err(SimError::InvalidConfig(
                "global_speed_scale and frame_scale must be positive".into(),
            ));
        }

        if self.max_frame_delta <= 0.0 || self.max_elapsed_ms <= 0.0 {
            return Err(SimError::InvalidConfig(
                "frame step caps must be positive".into(),
            ));
        }

        // A flyer must be able to wrap before it would count as departed
        if self.crow_despawn_margin <= self.wrap_margin {
            return Err(SimError::InvalidConfig(format!(
                "crow_despawn_margin ({}) should be > wrap_margin ({})",
                self.crow_despawn_margin, self.wrap_margin
            )));
        }

        if self.crow_fly_out_offset <= self.crow_despawn_margin {
            return Err(SimError::InvalidConfig(format!(
                "crow_fly_out_offset ({}) should be > crow_despawn_margin ({})",
                self.crow_fly_out_offset, self.crow_despawn_margin
            )));
        }

        if !(0.0..=1.0).contains(&self.ground_baseline_ratio) {
            return Err(SimError::InvalidConfig(format!(
                "ground_baseline_ratio ({}) must be within 0..=1",
                self.ground_baseline_ratio
            )));
        }

        if self.perch_flight_jitter_secs < 0.0
            || self.perch_rest_jitter_secs < 0.0
            || self.squirrel_spawn_jitter_ms < 0.0
            || self.cat_spawn_jitter_ms < 0.0
        {
            return Err(SimError::InvalidConfig("Jitter ranges must be non-negative".into()));
        }

        if self.crow_escalation_kills == 0 {
            return Err(SimError::InvalidConfig(
                "crow_escalation_kills must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Ground line for an agent with the given per-agent offset
    pub fn ground_line(&self, height: f32, offset: f32) -> f32 {
        height * self.ground_baseline_ratio + offset
    }
}
