//! Agent - one live creature around the feeder
//!
//! Owns its kinematics and behavior state machine: ground pinning, the crow
//! hunt/fly-out lifecycle, the perch cycle, feeder visits, species AI and
//! movement integration. An agent only ever mutates itself; siblings are read
//! through a [`Neighbor`] snapshot.

use rand::Rng;
use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::types::{AgentId, Bounds, Vec2};
use crate::entity::behavior::{self, Neighbor, Steering};
use crate::entity::species::Species;

/// Per-frame inputs shared by every agent update
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    /// Scaled frame step used for kinematics
    pub dt: f32,
    /// Simulation clock after this tick's advance (seconds)
    pub now_secs: f64,
    /// Simulation time covered by this tick (seconds)
    pub step_secs: f64,
    pub bounds: Bounds,
    pub feeder: Vec2,
    pub config: &'a SimulationConfig,
}

/// Crow-only lifecycle: hunt for a while, then leave
#[derive(Debug, Clone, Serialize)]
pub struct CrowState {
    /// Simulation time the crow arrived (seconds)
    pub spawned_at: f64,
    pub fly_out_target: Option<Vec2>,
    /// One-way latch; the exit point is chosen exactly once
    pub fly_out_started: bool,
    /// Set when this crow has caught a hawk; a successful crow never leaves
    pub caught_hawk: bool,
}

/// Landing cycle for flying non-player birds
#[derive(Debug, Clone, Serialize)]
pub struct PerchState {
    pub is_perched: bool,
    /// Time spent on the current perch (seconds)
    pub perch_time: f64,
    /// Simulation time the current flight began (seconds)
    pub last_flight_time: f64,
    pub perch_position: Option<Vec2>,
    /// Flight time after which this bird lands, rolled per flight
    pub flight_threshold: f64,
    /// Perch time after which this bird takes off, rolled per perch
    pub rest_threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    pub id: AgentId,
    pub species: Species,
    pub is_player: bool,
    pub position: Vec2,
    pub velocity: Vec2,
    pub alive: bool,
    pub wander_timer: f32,
    pub seeds_eaten: u32,
    pub at_feeder: bool,
    /// One-way latch once a seed eater has had its fill
    pub has_left_feeder: bool,
    /// Prey caught by a hawk (drives crow escalation)
    pub kill_count: u32,
    pub crow: Option<CrowState>,
    pub perch: PerchState,
    /// Fixed offset below the ground baseline for cats and squirrels
    pub ground_offset: Option<f32>,
    pub frame: u32,
    frame_timer_ms: f64,
}

impl Agent {
    pub fn new<R: Rng + ?Sized>(
        species: Species,
        position: Vec2,
        is_player: bool,
        now_secs: f64,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Self {
        let crow = (species == Species::Crow).then(|| CrowState {
            spawned_at: now_secs,
            fly_out_target: None,
            fly_out_started: false,
            caught_hawk: false,
        });

        let ground_offset = species
            .is_ground_bound()
            .then(|| rng.gen_range(0.0..config.ground_offset_span.max(f32::EPSILON)));

        Self {
            id: AgentId::new(),
            species,
            is_player,
            position,
            velocity: Vec2::new(rng.gen_range(-0.25..0.25), rng.gen_range(-0.25..0.25)),
            alive: true,
            wander_timer: rng.gen_range(0.0..3.0),
            seeds_eaten: 0,
            at_feeder: false,
            has_left_feeder: false,
            kill_count: 0,
            crow,
            perch: PerchState {
                is_perched: false,
                perch_time: 0.0,
                last_flight_time: now_secs,
                perch_position: None,
                flight_threshold: roll_range(rng, config.perch_flight_min_secs, config.perch_flight_jitter_secs),
                rest_threshold: roll_range(rng, config.perch_rest_min_secs, config.perch_rest_jitter_secs),
            },
            ground_offset,
            frame: 0,
            frame_timer_ms: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.species.radius()
    }

    pub fn max_speed(&self) -> f32 {
        self.species.speed() * 3.0
    }

    pub fn max_seeds(&self) -> u32 {
        self.species.max_seeds()
    }

    pub fn can_eat_seed(&self) -> bool {
        self.alive && self.seeds_eaten < self.max_seeds()
    }

    /// Non-ground, non-player birds land periodically
    pub fn can_perch(&self) -> bool {
        !self.species.is_ground_bound() && !self.is_player && !self.is_flying_out()
    }

    pub fn is_flying_out(&self) -> bool {
        self.crow.as_ref().map(|c| c.fly_out_started).unwrap_or(false)
    }

    /// Seed eater still hungry and heading for the feeder
    pub fn is_seeking_feeder(&self) -> bool {
        self.species.is_seed_eater() && !self.has_left_feeder && self.seeds_eaten < self.max_seeds()
    }

    /// Ground line for this agent, if it is ground-bound
    pub fn ground_line(&self, bounds: &Bounds, config: &SimulationConfig) -> Option<f32> {
        self.ground_offset.map(|offset| config.ground_line(bounds.height, offset))
    }

    pub fn neighbor(&self) -> Neighbor {
        Neighbor {
            id: self.id,
            species: self.species,
            position: self.position,
            alive: self.alive,
        }
    }

    /// Record a seed; returns false once the species cap is reached
    pub fn eat_seed(&mut self) -> bool {
        if !self.can_eat_seed() {
            return false;
        }
        self.seeds_eaten += 1;
        true
    }

    /// Advance one frame
    ///
    /// `others` may contain the agent itself and dead agents; both are
    /// skipped for target selection.
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &UpdateContext, others: &[Neighbor], rng: &mut R) {
        if !self.alive {
            return;
        }

        self.advance_animation(ctx);
        self.pin_to_ground(ctx);

        if self.crow.is_some() {
            self.update_crow_lifecycle(ctx, rng);
        }

        if self.can_perch() && self.update_perch(ctx, rng) {
            return;
        }

        self.update_feeder_flags(ctx);

        // Player motion comes from input integration, not AI
        if self.is_player {
            return;
        }

        if self.is_flying_out() {
            // Fly-out pull was applied by the lifecycle step
        } else if self.has_left_feeder {
            behavior::steer(&mut self.velocity, self.position, ctx.feeder, -ctx.config.feeder_pull);
            behavior::wander(&mut self.velocity, &mut self.wander_timer, ctx.dt, rng);
        } else if self.is_seeking_feeder() {
            behavior::steer(&mut self.velocity, self.position, ctx.feeder, ctx.config.feeder_pull);
        } else {
            let live: Vec<Neighbor> = others
                .iter()
                .filter(|n| n.alive && n.id != self.id)
                .copied()
                .collect();
            let steering = behavior::select_steering(self.species, self.position, &live, ctx.config.flee_radius);
            self.apply_steering(steering, ctx, rng);
        }

        self.integrate(ctx);
    }

    fn apply_steering<R: Rng + ?Sized>(&mut self, steering: Steering, ctx: &UpdateContext, rng: &mut R) {
        match steering {
            Steering::Seek(target) => {
                behavior::seek(&mut self.velocity, self.position, target, self.species.aggression())
            }
            Steering::Pursue(target) => {
                behavior::pursue(&mut self.velocity, self.position, target, self.species.aggression())
            }
            Steering::Flee(threat) => behavior::flee(&mut self.velocity, self.position, threat, rng),
            Steering::Feeder => {
                behavior::steer(&mut self.velocity, self.position, ctx.feeder, ctx.config.feeder_pull)
            }
            Steering::Wander => behavior::wander(&mut self.velocity, &mut self.wander_timer, ctx.dt, rng),
        }
    }

    fn advance_animation(&mut self, ctx: &UpdateContext) {
        self.frame_timer_ms += ctx.step_secs * 1000.0;
        if self.frame_timer_ms > ctx.config.animation_frame_ms {
            self.frame_timer_ms = 0.0;
            self.frame = (self.frame + 1) % self.species.info().sprite_frames;
        }
    }

    fn pin_to_ground(&mut self, ctx: &UpdateContext) {
        if let Some(ground) = self.ground_line(&ctx.bounds, ctx.config) {
            self.position.y = ground;
            self.velocity.y = 0.0;
        }
    }

    /// Hunt for `crow_lifetime_secs`, then pick an exit and steer for it
    fn update_crow_lifecycle<R: Rng + ?Sized>(&mut self, ctx: &UpdateContext, rng: &mut R) {
        let Some(crow) = self.crow.as_mut() else {
            return;
        };

        let hunting_for = ctx.now_secs - crow.spawned_at;
        if !crow.fly_out_started && !crow.caught_hawk && hunting_for > ctx.config.crow_lifetime_secs {
            let target = off_screen_point(&ctx.bounds, ctx.config.crow_fly_out_offset, rng);
            crow.fly_out_target = Some(target);
            crow.fly_out_started = true;
            self.perch.is_perched = false;
            self.perch.perch_position = None;
            tracing::debug!("Crow {:?} gave up the hunt, flying out toward {:?}", self.id, target);
        }

        if let (true, Some(target)) = (crow.fly_out_started, crow.fly_out_target) {
            self.velocity += (target - self.position) * ctx.config.crow_fly_out_pull;
        }
    }

    /// Returns true while the bird is perched (AI and movement skipped)
    fn update_perch<R: Rng + ?Sized>(&mut self, ctx: &UpdateContext, rng: &mut R) -> bool {
        let config = ctx.config;

        if !self.perch.is_perched && ctx.now_secs - self.perch.last_flight_time > self.perch.flight_threshold {
            let landing_ceiling = config.ground_line(ctx.bounds.height, 0.0);
            // Only the landing height is clamped; x stays where the bird is
            let spot = Vec2::new(self.position.x, self.position.y.clamp(0.0, landing_ceiling));
            self.perch.is_perched = true;
            self.perch.perch_time = 0.0;
            self.perch.perch_position = Some(spot);
            self.perch.rest_threshold = roll_range(rng, config.perch_rest_min_secs, config.perch_rest_jitter_secs);
            tracing::debug!("{} {:?} perched at {:?}", self.species, self.id, spot);
        }

        if !self.perch.is_perched {
            return false;
        }

        self.perch.perch_time += ctx.step_secs;
        if let Some(spot) = self.perch.perch_position {
            self.position = spot;
        }
        self.velocity = Vec2::ZERO;

        if self.perch.perch_time > self.perch.rest_threshold {
            self.perch.is_perched = false;
            self.perch.perch_position = None;
            self.perch.last_flight_time = ctx.now_secs;
            self.perch.flight_threshold =
                roll_range(rng, config.perch_flight_min_secs, config.perch_flight_jitter_secs);
            return false;
        }

        true
    }

    fn update_feeder_flags(&mut self, ctx: &UpdateContext) {
        self.at_feeder = self.position.distance(&ctx.feeder) < ctx.config.feeder_radius;

        let cap = self.max_seeds();
        if self.at_feeder && cap > 0 && self.seeds_eaten >= cap {
            self.at_feeder = false;
            self.has_left_feeder = true;
        }
    }

    fn integrate(&mut self, ctx: &UpdateContext) {
        let config = ctx.config;
        // Arrivals from beyond the margin fly in rather than wrapping straight away
        let was_inside = !ctx.bounds.is_beyond(self.position, config.wrap_margin);

        self.velocity = self.velocity.clamp_length(self.max_speed());
        self.position += self.velocity * ctx.dt;

        if let Some(ground) = self.ground_line(&ctx.bounds, config) {
            if ctx.bounds.is_beyond(self.position, config.ground_despawn_margin) {
                self.alive = false;
                tracing::debug!("{} {:?} wandered off the ground", self.species, self.id);
            }
            self.position.y = ground;
            self.velocity.y = 0.0;
            return;
        }

        if self.is_flying_out() {
            if ctx.bounds.is_beyond(self.position, config.crow_despawn_margin) {
                self.alive = false;
                tracing::debug!("Crow {:?} left the scene", self.id);
            }
            return;
        }

        if was_inside {
            self.position = ctx.bounds.wrap(self.position, config.wrap_margin);
        }
    }
}

/// Uniform value in [min, min + jitter)
pub(crate) fn roll_range<R: Rng + ?Sized>(rng: &mut R, min: f64, jitter: f64) -> f64 {
    if jitter > 0.0 {
        min + rng.gen_range(0.0..jitter)
    } else {
        min
    }
}

/// Random point `offset` units beyond a uniformly chosen screen edge
pub(crate) fn off_screen_point<R: Rng + ?Sized>(bounds: &Bounds, offset: f32, rng: &mut R) -> Vec2 {
    match rng.gen_range(0..4) {
        0 => Vec2::new(rng.gen_range(0.0..bounds.width.max(1.0)), -offset),
        1 => Vec2::new(rng.gen_range(0.0..bounds.width.max(1.0)), bounds.height + offset),
        2 => Vec2::new(-offset, rng.gen_range(0.0..bounds.height.max(1.0))),
        _ => Vec2::new(bounds.width + offset, rng.gen_range(0.0..bounds.height.max(1.0))),
    }
}
