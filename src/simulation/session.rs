//! Game session - the single owner of all mutable simulation state

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{AgentId, Bounds, Vec2};
use crate::entity::agent::Agent;
use crate::entity::hazard::Hazard;
use crate::entity::species::Species;
use crate::simulation::difficulty::{Difficulty, DifficultyConfig};
use crate::simulation::hazards::HazardManager;
use crate::simulation::levels::{self, LevelConfig};
use crate::simulation::seeds::{Seed, SeedField};
use crate::simulation::spawning::{self, SpawnTimers};

/// Run-start choices made on the config screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub seed_count: u32,
    pub difficulty: Difficulty,
    pub player_species: Species,
    /// Fixed RNG seed for reproducible runs; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seed_count: 100,
            difficulty: Difficulty::Normal,
            player_species: Species::Hawk,
            rng_seed: None,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<()> {
        if self.seed_count == 0 {
            return Err(SimError::InvalidSettings("seed_count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Read-only view of a session for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub clock_ms: f64,
    pub agents: Vec<Agent>,
    pub seeds: Vec<Seed>,
    pub seeds_remaining: usize,
    pub hazards: Vec<Hazard>,
    pub level: LevelConfig,
    pub next_level_threshold: Option<u32>,
    pub score: u32,
    pub crow_active: bool,
    pub running: bool,
    pub paused: bool,
}

pub struct Session {
    pub settings: GameSettings,
    pub config: SimulationConfig,
    pub bounds: Bounds,
    pub feeder: Vec2,
    pub(crate) rng: ChaCha8Rng,
    /// Simulation clock (milliseconds since the run started)
    pub clock_ms: f64,
    pub agents: Vec<Agent>,
    pub seeds: SeedField,
    pub hazards: HazardManager,
    pub score: u32,
    pub running: bool,
    pub paused: bool,
    pub(crate) timers: SpawnTimers,
    /// True while any crow is alive; blocks escalation
    pub crow_active: bool,
    pub level: u32,
}

impl Session {
    /// Build a session with its seed field laid out; no agents until `start`
    pub fn new(settings: GameSettings, config: SimulationConfig, bounds: Bounds) -> Result<Self> {
        settings.validate()?;
        config.validate()?;

        let mut rng = match settings.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let feeder = bounds.center();
        let seeds = SeedField::scatter(settings.seed_count, feeder, config.seed_scatter, &mut rng);
        let multiplier = settings.difficulty.config().predator_spawn_multiplier;
        let timers = SpawnTimers::new(0.0, &config, multiplier, &mut rng);

        Ok(Self {
            settings,
            config,
            bounds,
            feeder,
            rng,
            clock_ms: 0.0,
            agents: Vec::new(),
            seeds,
            hazards: HazardManager::new(),
            score: 0,
            running: false,
            paused: false,
            timers,
            crow_active: false,
            level: 1,
        })
    }

    pub fn difficulty(&self) -> &'static DifficultyConfig {
        self.settings.difficulty.config()
    }

    /// Spawn the opening batch and start ticking
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        if self.agents.is_empty() {
            spawning::spawn_initial(self);
        }
        self.running = true;
        self.paused = false;
        tracing::info!(
            "Session started: {} seeds, {} difficulty, playing as {}",
            self.settings.seed_count,
            self.settings.difficulty,
            self.settings.player_species
        );
    }

    pub fn pause(&mut self) {
        if self.running {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
    }

    /// Add an agent at `position`; ground-bound agents land on their ground line
    pub fn spawn_agent(&mut self, species: Species, position: Vec2, is_player: bool) -> AgentId {
        let mut agent = Agent::new(species, position, is_player, self.now_secs(), &self.config, &mut self.rng);
        if let Some(ground) = agent.ground_line(&self.bounds, &self.config) {
            agent.position.y = ground;
        }
        let id = agent.id;
        tracing::debug!("Spawned {} {:?} at ({:.0}, {:.0})", species, id, position.x, position.y);
        self.agents.push(agent);
        id
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn player(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.is_player)
    }

    pub fn now_secs(&self) -> f64 {
        self.clock_ms / 1000.0
    }

    pub fn level_config(&self) -> &'static LevelConfig {
        levels::level_config(self.score, self.settings.seed_count, Some(self.settings.player_species))
    }

    pub fn next_level_threshold(&self) -> Option<u32> {
        levels::next_level_threshold(self.score, self.settings.seed_count, Some(self.settings.player_species))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            clock_ms: self.clock_ms,
            agents: self.agents.clone(),
            seeds: self.seeds.uneaten().copied().collect(),
            seeds_remaining: self.seeds.remaining(),
            hazards: self.hazards.hazards().to_vec(),
            level: self.level_config().clone(),
            next_level_threshold: self.next_level_threshold(),
            score: self.score,
            crow_active: self.crow_active,
            running: self.running,
            paused: self.paused,
        }
    }
}
