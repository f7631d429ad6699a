//! Ground hazard manager
//!
//! Keeps the snake and rat population within the current level's caps,
//! moves them, and applies their contact rules against the flock.

use ahash::AHashMap;
use rand::Rng;
use serde::Serialize;

use crate::core::types::{AgentId, Bounds, HazardId, Vec2};
use crate::entity::agent::Agent;
use crate::entity::hazard::{Hazard, HazardKind};
use crate::entity::species::Species;
use crate::simulation::difficulty::DifficultyConfig;
use crate::simulation::levels::LevelConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HazardEvent {
    /// A hawk or crow caught a rat
    RatEaten {
        hazard: HazardId,
        by: AgentId,
        by_species: Species,
    },
    /// The player touched a hazard it cannot eat
    PlayerKilled { hazard: HazardId, kind: HazardKind },
}

#[derive(Debug, Default)]
pub struct HazardManager {
    hazards: Vec<Hazard>,
    /// Simulation time of each kind's last spawn (milliseconds)
    last_spawn_ms: AHashMap<HazardKind, f64>,
    next_id: u32,
}

impl HazardManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn live_count(&self, kind: HazardKind) -> usize {
        self.hazards.iter().filter(|h| h.alive && h.kind == kind).count()
    }

    /// Move every live hazard, then apply contact rules
    ///
    /// Stops checking as soon as the player is killed; dead hazards are swept
    /// before returning.
    pub fn update(&mut self, dt: f32, bounds: &Bounds, wrap_margin: f32, agents: &mut [Agent]) -> Vec<HazardEvent> {
        let mut events = Vec::new();

        for hazard in self.hazards.iter_mut() {
            hazard.advance(dt, bounds, wrap_margin);
        }

        'hazards: for hazard in self.hazards.iter_mut().filter(|h| h.alive) {
            for agent in agents.iter_mut().filter(|a| a.alive) {
                if !hazard.touches(agent.position, agent.radius()) {
                    continue;
                }

                match hazard.kind {
                    HazardKind::Rat if agent.species.hunts_rats() => {
                        hazard.alive = false;
                        hazard.health = Some(0);
                        if agent.species == Species::Hawk {
                            agent.kill_count += 1;
                        }
                        tracing::debug!("{} {:?} caught rat {:?}", agent.species, agent.id, hazard.id);
                        events.push(HazardEvent::RatEaten {
                            hazard: hazard.id,
                            by: agent.id,
                            by_species: agent.species,
                        });
                        continue 'hazards;
                    }
                    HazardKind::Rat | HazardKind::Snake if agent.is_player => {
                        agent.alive = false;
                        tracing::debug!("Player {} killed by {} {:?}", agent.species, hazard.kind, hazard.id);
                        events.push(HazardEvent::PlayerKilled {
                            hazard: hazard.id,
                            kind: hazard.kind,
                        });
                        break 'hazards;
                    }
                    _ => {}
                }
            }
        }

        self.hazards.retain(|h| h.alive);
        events
    }

    /// Spawn at most one hazard of each kind whose cadence has elapsed
    ///
    /// Cadence is `1000 / (rate × predator multiplier)` ms per kind, and only
    /// while the live count is under the level cap.
    pub fn spawn_due<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        level: &LevelConfig,
        difficulty: &DifficultyConfig,
        bounds: &Bounds,
        rng: &mut R,
    ) -> Vec<HazardId> {
        let mut spawned = Vec::new();

        for kind in HazardKind::ALL {
            let (rate, cap) = match kind {
                HazardKind::Snake => (level.snake_spawn_rate, level.max_snakes),
                HazardKind::Rat => (level.rat_spawn_rate, level.max_rats),
            };
            let effective_rate = (rate * difficulty.predator_spawn_multiplier) as f64;
            if effective_rate <= 0.0 || self.live_count(kind) >= cap {
                continue;
            }

            let interval_ms = 1000.0 / effective_rate;
            let last = self.last_spawn_ms.get(&kind).copied().unwrap_or(0.0);
            if now_ms - last < interval_ms {
                continue;
            }

            let id = self.spawn(kind, bounds, rng);
            self.last_spawn_ms.insert(kind, now_ms);
            spawned.push(id);
        }

        spawned
    }

    /// Place a hazard of `kind` in its grass band with a random ±x heading
    pub fn spawn<R: Rng + ?Sized>(&mut self, kind: HazardKind, bounds: &Bounds, rng: &mut R) -> HazardId {
        let (top, bottom) = kind.spawn_band();
        let x = rng.gen_range(0.0..bounds.width.max(1.0));
        let y = bounds.height * rng.gen_range(top..bottom);
        let heading = if rng.gen_bool(0.5) {
            Vec2::new(1.0, 0.0)
        } else {
            Vec2::new(-1.0, 0.0)
        };

        let id = HazardId::new(self.next_id);
        self.next_id += 1;
        self.hazards.push(Hazard::new(id, kind, Vec2::new(x, y), heading));
        tracing::debug!("Spawned {} {:?} at ({:.0}, {:.0})", kind, id, x, y);
        id
    }

    /// Insert a hazard built elsewhere (scenario setup)
    pub fn insert(&mut self, kind: HazardKind, position: Vec2, heading: Vec2) -> HazardId {
        let id = HazardId::new(self.next_id);
        self.next_id += 1;
        self.hazards.push(Hazard::new(id, kind, position, heading));
        id
    }
}
