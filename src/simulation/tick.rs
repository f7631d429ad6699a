//! Tick system - orchestrates one frame of the feeder simulation
//!
//! Fixed order each tick:
//! spawn timers -> hazard update -> agent update -> player input ->
//! seed consumption -> collision resolution -> level check -> win/loss check ->
//! dead-agent sweep. Crow escalation runs inside the kill handling of the
//! hazard and collision phases, once per hawk kill.

use serde::Serialize;

use crate::core::types::{AgentId, Bounds, HazardId, Vec2};
use crate::entity::agent::{Agent, UpdateContext};
use crate::entity::behavior::Neighbor;
use crate::entity::hazard::HazardKind;
use crate::entity::species::Species;
use crate::simulation::collision::{resolve_collisions, Interaction};
use crate::simulation::hazards::HazardEvent;
use crate::simulation::player::{integrate_player, PlayerInput};
use crate::simulation::session::Session;
use crate::simulation::spawning;

/// Everything the presentation layer supplies for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Wall-clock time since the previous tick
    pub elapsed_ms: f64,
    pub bounds: Bounds,
    pub feeder: Vec2,
    pub player: PlayerInput,
}

impl TickInput {
    /// A frame with no player input, feeder centred in `bounds`
    pub fn idle(elapsed_ms: f64, bounds: Bounds) -> Self {
        Self {
            elapsed_ms,
            bounds,
            feeder: bounds.center(),
            player: PlayerInput::idle(),
        }
    }
}

/// What killed the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeathCause {
    Caught { by: AgentId, species: Species },
    Hazard { hazard: HazardId, kind: HazardKind },
}

/// Events generated during a tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    AgentSpawned {
        id: AgentId,
        species: Species,
    },
    AgentEaten {
        loser: AgentId,
        loser_species: Species,
        winner: AgentId,
        winner_species: Species,
    },
    RatEaten {
        by: AgentId,
        by_species: Species,
    },
    PlayerDied {
        cause: DeathCause,
    },
    CrowSummoned {
        crow: AgentId,
        target: AgentId,
    },
    LevelChanged {
        from: u32,
        to: u32,
        description: &'static str,
    },
    SeedsEaten {
        count: u32,
        remaining: usize,
    },
    /// Game over event - signals end of the run
    GameOver {
        outcome: GameOutcome,
    },
}

/// Outcome of the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameOutcome {
    /// The player was eaten or touched a hazard
    PlayerCaught { score: u32 },
    /// Every seed has been eaten
    SeedsDepleted { score: u32 },
    /// Run still in progress
    InProgress,
}

/// Frame step in scaled frame units for `elapsed_ms` of wall time
pub fn frame_delta(session: &Session, elapsed_ms: f64) -> f32 {
    let config = &session.config;
    let frames = (elapsed_ms.max(0.0) as f32 * config.frame_scale).min(config.max_frame_delta);
    frames * config.global_speed_scale * session.difficulty().speed_multiplier
}

/// Run a single simulation tick
///
/// A session that is not running, or is paused, is left untouched and no
/// events are produced. Once an outcome is reached the session stops.
pub fn run_simulation_tick(session: &mut Session, input: &TickInput) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    if !session.running || session.paused {
        return events;
    }

    session.bounds = input.bounds;
    session.feeder = input.feeder;

    let dt = frame_delta(session, input.elapsed_ms);
    let step_ms = input.elapsed_ms.clamp(0.0, session.config.max_elapsed_ms);
    session.clock_ms += step_ms;

    run_spawn_timers(session, &mut events);
    run_hazards(session, dt, &mut events);

    if player_alive(session) {
        update_agents(session, dt, step_ms / 1000.0);
        update_player(session, input, dt);
        consume_seeds(session, &mut events);
        resolve_interactions(session, &mut events);
        // A caught player ends the run on the spot
        if player_alive(session) {
            check_level(session, &mut events);
        }
    }

    let outcome = check_win_condition(session);
    if outcome != GameOutcome::InProgress {
        session.running = false;
        tracing::info!("Game over: {:?}", outcome);
        events.push(SimulationEvent::GameOver { outcome });
    }

    sweep_dead(session);
    events
}

/// Terminal state check: player death first, then an empty feeder
pub fn check_win_condition(session: &Session) -> GameOutcome {
    if !player_alive(session) {
        GameOutcome::PlayerCaught { score: session.score }
    } else if session.seeds.is_depleted() {
        GameOutcome::SeedsDepleted { score: session.score }
    } else {
        GameOutcome::InProgress
    }
}

/// A session without a player (scenario setups) counts as alive
fn player_alive(session: &Session) -> bool {
    session.player().map(|p| p.alive).unwrap_or(true)
}

fn run_spawn_timers(session: &mut Session, events: &mut Vec<SimulationEvent>) {
    for id in spawning::spawn_periodic(session) {
        if let Some(agent) = session.agent(id) {
            events.push(SimulationEvent::AgentSpawned {
                id,
                species: agent.species,
            });
        }
    }

    let level = session.level_config();
    let difficulty = session.difficulty();
    session
        .hazards
        .spawn_due(session.clock_ms, level, difficulty, &session.bounds, &mut session.rng);
}

fn run_hazards(session: &mut Session, dt: f32, events: &mut Vec<SimulationEvent>) {
    let margin = session.config.hazard_wrap_margin;
    let hazard_events = session
        .hazards
        .update(dt, &session.bounds, margin, &mut session.agents);

    for event in hazard_events {
        match event {
            HazardEvent::RatEaten { by, by_species, .. } => {
                session.score += 1;
                events.push(SimulationEvent::RatEaten { by, by_species });
                if by_species == Species::Hawk {
                    run_escalation(session, by, events);
                }
            }
            HazardEvent::PlayerKilled { hazard, kind } => {
                events.push(SimulationEvent::PlayerDied {
                    cause: DeathCause::Hazard { hazard, kind },
                });
            }
        }
    }
}

fn update_agents(session: &mut Session, dt: f32, step_secs: f64) {
    let neighbors: Vec<Neighbor> = session.agents.iter().map(Agent::neighbor).collect();
    let ctx = UpdateContext {
        dt,
        now_secs: session.clock_ms / 1000.0,
        step_secs,
        bounds: session.bounds,
        feeder: session.feeder,
        config: &session.config,
    };

    for agent in session.agents.iter_mut() {
        agent.update(&ctx, &neighbors, &mut session.rng);
    }
}

fn update_player(session: &mut Session, input: &TickInput, dt: f32) {
    if let Some(player) = session.agents.iter_mut().find(|a| a.is_player) {
        integrate_player(player, &input.player, dt, &session.bounds, &session.config);
    }
}

fn consume_seeds(session: &mut Session, events: &mut Vec<SimulationEvent>) {
    let count = session.seeds.consume(&mut session.agents, session.config.seed_reach);
    if count > 0 {
        events.push(SimulationEvent::SeedsEaten {
            count,
            remaining: session.seeds.remaining(),
        });
    }
}

fn resolve_interactions(session: &mut Session, events: &mut Vec<SimulationEvent>) {
    for interaction in resolve_collisions(&mut session.agents, &mut session.rng) {
        match interaction {
            Interaction::Eaten {
                loser,
                loser_species,
                winner,
                winner_species,
            } => {
                session.score += 1;
                events.push(SimulationEvent::AgentEaten {
                    loser,
                    loser_species,
                    winner,
                    winner_species,
                });
                if winner_species == Species::Hawk {
                    run_escalation(session, winner, events);
                }
            }
            Interaction::PlayerCaught { by, by_species } => {
                events.push(SimulationEvent::PlayerDied {
                    cause: DeathCause::Caught {
                        by,
                        species: by_species,
                    },
                });
            }
        }
    }
}

fn run_escalation(session: &mut Session, hawk: AgentId, events: &mut Vec<SimulationEvent>) {
    if let Some((crow, target)) = spawning::escalate_crow(session, hawk) {
        events.push(SimulationEvent::CrowSummoned { crow, target });
    }
}

fn check_level(session: &mut Session, events: &mut Vec<SimulationEvent>) {
    let level = session.level_config();
    if level.level != session.level {
        tracing::info!("Level {} -> {}: {}", session.level, level.level, level.description);
        events.push(SimulationEvent::LevelChanged {
            from: session.level,
            to: level.level,
            description: level.description,
        });
        session.level = level.level;
    }
}

/// Drop dead agents (never the player) and resync the crow flag
fn sweep_dead(session: &mut Session) {
    session.agents.retain(|a| a.alive || a.is_player);
    session.crow_active = session
        .agents
        .iter()
        .any(|a| a.alive && a.species == Species::Crow);
}
