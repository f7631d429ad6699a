//! Agent arrivals: the opening batch, periodic spawns and crow escalation

use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::{AgentId, Bounds, Vec2};
use crate::entity::agent::{off_screen_point, roll_range};
use crate::entity::species::Species;
use crate::simulation::session::Session;

/// Base odds of a flock arrival being a hawk
const HAWK_ODDS: f32 = 0.05;
/// Relative weights of the songbirds among non-hawk arrivals
const DOVE_WEIGHT: f32 = 0.30;
const SPARROW_WEIGHT: f32 = 0.35;
const CHICKADEE_WEIGHT: f32 = 0.30;

/// Speed multiple a summoned crow enters with
const SUMMONED_CROW_BOOST: f32 = 1.2;
/// Offset from the feeder where the player starts
const PLAYER_START_OFFSET: Vec2 = Vec2 { x: 40.0, y: 0.0 };

/// Arrival schedule, on the simulation clock (milliseconds)
#[derive(Debug, Clone)]
pub struct SpawnTimers {
    pub last_flock_ms: f64,
    pub last_squirrel_ms: f64,
    pub last_cat_ms: f64,
    /// Current squirrel interval, rolled after each arrival
    pub squirrel_interval_ms: f64,
    /// Current cat interval, rolled after each arrival
    pub cat_interval_ms: f64,
}

impl SpawnTimers {
    /// Fresh schedule starting at `now_ms` with newly rolled intervals
    pub fn new<R: Rng + ?Sized>(now_ms: f64, config: &SimulationConfig, predator_multiplier: f32, rng: &mut R) -> Self {
        let mut timers = Self {
            last_flock_ms: now_ms,
            last_squirrel_ms: now_ms,
            last_cat_ms: now_ms,
            squirrel_interval_ms: 0.0,
            cat_interval_ms: 0.0,
        };
        timers.roll_squirrel(config, rng);
        timers.roll_cat(config, predator_multiplier, rng);
        timers
    }

    fn roll_squirrel<R: Rng + ?Sized>(&mut self, config: &SimulationConfig, rng: &mut R) {
        self.squirrel_interval_ms = roll_range(rng, config.squirrel_spawn_min_ms, config.squirrel_spawn_jitter_ms);
    }

    fn roll_cat<R: Rng + ?Sized>(&mut self, config: &SimulationConfig, predator_multiplier: f32, rng: &mut R) {
        let base = roll_range(rng, config.cat_spawn_min_ms, config.cat_spawn_jitter_ms);
        self.cat_interval_ms = base / predator_multiplier.max(f32::EPSILON) as f64;
    }
}

/// Pick a flock species; the predator multiplier scales the hawk odds only
pub fn random_flock_species<R: Rng + ?Sized>(rng: &mut R, predator_multiplier: f32) -> Species {
    let hawk_odds = (HAWK_ODDS * predator_multiplier).clamp(0.0, 1.0);
    let roll: f32 = rng.gen();
    if roll < hawk_odds {
        return Species::Hawk;
    }

    let songbird_roll = rng.gen_range(0.0..DOVE_WEIGHT + SPARROW_WEIGHT + CHICKADEE_WEIGHT);
    if songbird_roll < DOVE_WEIGHT {
        Species::Dove
    } else if songbird_roll < DOVE_WEIGHT + SPARROW_WEIGHT {
        Species::Sparrow
    } else {
        Species::Chickadee
    }
}

/// A random point on the ground baseline; the agent settles onto its own line
pub fn ground_point<R: Rng + ?Sized>(bounds: &Bounds, config: &SimulationConfig, rng: &mut R) -> Vec2 {
    let x = rng.gen_range(0.0..bounds.width.max(1.0));
    Vec2::new(x, config.ground_line(bounds.height, 0.0))
}

/// A point just past the left or right edge, on the ground band
fn ground_entry_point<R: Rng + ?Sized>(bounds: &Bounds, config: &SimulationConfig, rng: &mut R) -> Vec2 {
    let mut point = ground_point(bounds, config, rng);
    point.x = if rng.gen_bool(0.5) {
        -config.edge_spawn_offset
    } else {
        bounds.width + config.edge_spawn_offset
    };
    point
}

/// Opening batch: flock, initial predators, squirrels and the player
pub fn spawn_initial(session: &mut Session) {
    let bounds = session.bounds;
    let multiplier = session.difficulty().predator_spawn_multiplier;
    let predators = session.difficulty().initial_predators;
    let edge = session.config.edge_spawn_offset;

    for _ in 0..session.config.initial_flock {
        let species = random_flock_species(&mut session.rng, multiplier);
        let position = off_screen_point(&bounds, edge, &mut session.rng);
        session.spawn_agent(species, position, false);
    }

    let crows = (predators + 1) / 2;
    let cats = predators / 2;
    for _ in 0..crows {
        let position = off_screen_point(&bounds, edge, &mut session.rng);
        session.spawn_agent(Species::Crow, position, false);
    }
    for _ in 0..cats {
        let position = ground_entry_point(&bounds, &session.config, &mut session.rng);
        session.spawn_agent(Species::Cat, position, false);
    }

    let squirrels = session.rng.gen_range(2..=3);
    for _ in 0..squirrels {
        let position = ground_point(&bounds, &session.config, &mut session.rng);
        session.spawn_agent(Species::Squirrel, position, false);
    }

    let start = session.feeder + PLAYER_START_OFFSET;
    let player_species = session.settings.player_species;
    let player_id = session.spawn_agent(player_species, start, true);
    if let Some(player) = session.agent_mut(player_id) {
        player.velocity = Vec2::ZERO;
        player.at_feeder = true;
    }

    session.timers = SpawnTimers::new(session.clock_ms, &session.config, multiplier, &mut session.rng);

    tracing::debug!(
        "Initial batch: {} agents ({} crows, {} cats, {} squirrels)",
        session.agents.len(),
        crows,
        cats,
        squirrels
    );
}

/// Periodic arrivals due at the current clock
pub fn spawn_periodic(session: &mut Session) -> Vec<AgentId> {
    let mut spawned = Vec::new();
    let now = session.clock_ms;
    let bounds = session.bounds;
    let multiplier = session.difficulty().predator_spawn_multiplier;

    if now - session.timers.last_flock_ms > session.config.flock_spawn_interval_ms {
        let species = random_flock_species(&mut session.rng, multiplier);
        let position = off_screen_point(&bounds, session.config.edge_spawn_offset, &mut session.rng);
        spawned.push(session.spawn_agent(species, position, false));
        session.timers.last_flock_ms = now;
    }

    if now - session.timers.last_squirrel_ms > session.timers.squirrel_interval_ms {
        let position = ground_point(&bounds, &session.config, &mut session.rng);
        spawned.push(session.spawn_agent(Species::Squirrel, position, false));
        session.timers.last_squirrel_ms = now;
        session.timers.roll_squirrel(&session.config, &mut session.rng);
    }

    if now - session.timers.last_cat_ms > session.timers.cat_interval_ms {
        let position = ground_entry_point(&bounds, &session.config, &mut session.rng);
        spawned.push(session.spawn_agent(Species::Cat, position, false));
        session.timers.last_cat_ms = now;
        session.timers.roll_cat(&session.config, multiplier, &mut session.rng);
    }

    spawned
}

/// Summon a crow against `hawk` after one of its kills
///
/// Called from the kill paths, so a hawk past the threshold needs a fresh
/// kill before another crow comes. Nothing happens while any crow is alive.
/// Returns `(crow, hawk)` when one was summoned.
pub fn escalate_crow(session: &mut Session, hawk: AgentId) -> Option<(AgentId, AgentId)> {
    if session.agents.iter().any(|a| a.alive && a.species == Species::Crow) {
        return None;
    }

    let threshold = session.config.crow_escalation_kills;
    let (hawk_id, hawk_position) = session
        .agent(hawk)
        .filter(|a| a.alive && a.species == Species::Hawk && a.kill_count >= threshold)
        .map(|a| (a.id, a.position))?;

    let bounds = session.bounds;
    let entry = off_screen_point(&bounds, session.config.crow_entry_offset, &mut session.rng);
    let crow_id = session.spawn_agent(Species::Crow, entry, false);

    if let Some(crow) = session.agent_mut(crow_id) {
        let heading = entry.direction_to(&hawk_position).unwrap_or(Vec2::new(1.0, 0.0));
        crow.velocity = heading * (Species::Crow.speed() * SUMMONED_CROW_BOOST);
    }

    session.crow_active = true;
    tracing::info!("Crow {:?} summoned against hawk {:?}", crow_id, hawk_id);
    Some((crow_id, hawk_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::difficulty::Difficulty;
    use crate::simulation::session::GameSettings;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session(difficulty: Difficulty) -> Session {
        let settings = GameSettings {
            difficulty,
            rng_seed: Some(7),
            ..GameSettings::default()
        };
        Session::new(settings, SimulationConfig::default(), Bounds::new(800.0, 600.0)).unwrap()
    }

    fn count(session: &Session, species: Species) -> usize {
        session.agents.iter().filter(|a| !a.is_player && a.species == species).count()
    }

    #[test]
    fn test_flock_species_are_songbirds_or_hawks() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            let species = random_flock_species(&mut rng, 1.0);
            assert!(matches!(
                species,
                Species::Hawk | Species::Dove | Species::Sparrow | Species::Chickadee
            ));
        }
    }

    #[test]
    fn test_predator_multiplier_raises_hawk_share() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let hawks = |rng: &mut ChaCha8Rng, m: f32| {
            (0..4000).filter(|_| random_flock_species(&mut *rng, m) == Species::Hawk).count()
        };
        let calm = hawks(&mut rng, 0.0);
        let swarm = hawks(&mut rng, 20.0);
        assert_eq!(calm, 0);
        assert_eq!(swarm, 4000);
    }

    #[test]
    fn test_initial_batch_composition() {
        let mut s = session(Difficulty::Hard);
        spawn_initial(&mut s);

        assert_eq!(count(&s, Species::Crow), 3);
        assert_eq!(count(&s, Species::Cat), 3);
        let squirrels = count(&s, Species::Squirrel);
        assert!((2..=3).contains(&squirrels));
        assert_eq!(s.agents.iter().filter(|a| a.is_player).count(), 1);
        assert_eq!(s.agents.len(), 8 + 3 + 3 + squirrels + 1);
    }

    #[test]
    fn test_ground_spawns_sit_on_ground_band() {
        let mut s = session(Difficulty::Normal);
        spawn_initial(&mut s);
        let ground_agents: Vec<_> = s.agents.iter().filter(|a| a.species.is_ground_bound()).collect();
        assert!(!ground_agents.is_empty());
        for agent in ground_agents {
            assert_eq!(Some(agent.position.y), agent.ground_line(&s.bounds, &s.config));
        }
    }

    #[test]
    fn test_periodic_flock_every_interval() {
        let mut s = session(Difficulty::Normal);
        spawn_initial(&mut s);
        let before = s.agents.len();

        s.clock_ms = 1500.0;
        assert!(spawn_periodic(&mut s).is_empty());

        s.clock_ms = 2001.0;
        assert_eq!(spawn_periodic(&mut s).len(), 1);
        assert_eq!(s.agents.len(), before + 1);

        s.clock_ms = 3000.0;
        assert!(spawn_periodic(&mut s).is_empty());
    }

    #[test]
    fn test_cat_interval_shrinks_with_difficulty() {
        let mut easy = session(Difficulty::Easy);
        spawn_initial(&mut easy);
        let mut nightmare = session(Difficulty::Nightmare);
        spawn_initial(&mut nightmare);

        // Easy: 40-60s, nightmare: 10-15s
        assert!(easy.timers.cat_interval_ms >= 40_000.0);
        assert!(nightmare.timers.cat_interval_ms < 15_000.0);
    }

    #[test]
    fn test_escalation_needs_threshold_and_no_crow() {
        let mut s = session(Difficulty::Normal);
        let hawk = s.spawn_agent(Species::Hawk, Vec2::new(400.0, 300.0), false);

        s.agent_mut(hawk).unwrap().kill_count = 9;
        assert!(escalate_crow(&mut s, hawk).is_none());

        s.agent_mut(hawk).unwrap().kill_count = 10;
        let (crow, target) = escalate_crow(&mut s, hawk).unwrap();
        assert_eq!(target, hawk);
        assert!(s.crow_active);

        let crow = s.agent(crow).unwrap();
        assert!(s.bounds.is_beyond(crow.position, 100.0));
        assert!((crow.velocity.length() - 2.4).abs() < 1e-4);
        // Heading toward the hawk
        let to_hawk = Vec2::new(400.0, 300.0) - crow.position;
        assert!(to_hawk.x * crow.velocity.x + to_hawk.y * crow.velocity.y > 0.0);

        // A live crow blocks another summons
        assert!(escalate_crow(&mut s, hawk).is_none());
    }

    #[test]
    fn test_escalation_ignores_other_killers() {
        let mut s = session(Difficulty::Normal);
        let hawk = s.spawn_agent(Species::Hawk, Vec2::new(400.0, 300.0), false);
        let cat = s.spawn_agent(Species::Cat, Vec2::new(100.0, 0.0), false);
        s.agent_mut(hawk).unwrap().kill_count = 12;

        assert!(escalate_crow(&mut s, cat).is_none());

        s.agent_mut(hawk).unwrap().alive = false;
        assert!(escalate_crow(&mut s, hawk).is_none());
        assert!(!s.crow_active);
    }
}
