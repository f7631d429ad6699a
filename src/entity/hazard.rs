//! Ground hazards - snakes and rats that roam the grass independently of the flock

use derive_more::Display;
use serde::Serialize;

use crate::core::types::{Bounds, HazardId, Vec2};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    /// Pure hazard: deadly to the player, never prey
    #[display(fmt = "snake")]
    Snake,
    /// Prey for hawks and crows, deadly to any other player
    #[display(fmt = "rat")]
    Rat,
}

impl HazardKind {
    pub const ALL: [HazardKind; 2] = [HazardKind::Snake, HazardKind::Rat];

    pub fn radius(&self) -> f32 {
        match self {
            Self::Snake => 14.0,
            Self::Rat => 8.0,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            Self::Snake => 0.8,
            Self::Rat => 1.5,
        }
    }

    /// Vertical band of the screen (fractions of height) this kind spawns in
    ///
    /// Snakes keep to the lower grass; rats use the whole lawn.
    pub fn spawn_band(&self) -> (f32, f32) {
        match self {
            Self::Snake => (0.75, 0.95),
            Self::Rat => (0.65, 0.95),
        }
    }

    fn initial_health(&self) -> Option<u32> {
        match self {
            Self::Snake => None,
            Self::Rat => Some(1),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Hazard {
    pub id: HazardId,
    pub kind: HazardKind,
    pub position: Vec2,
    /// Unit heading; actual displacement is `heading * speed * dt`
    pub heading: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub alive: bool,
    pub health: Option<u32>,
}

impl Hazard {
    pub fn new(id: HazardId, kind: HazardKind, position: Vec2, heading: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            heading: heading.normalize(),
            radius: kind.radius(),
            speed: kind.speed(),
            alive: true,
            health: kind.initial_health(),
        }
    }

    /// Advance along the heading; hazards wrap rather than despawn
    pub fn advance(&mut self, dt: f32, bounds: &Bounds, wrap_margin: f32) {
        if !self.alive {
            return;
        }
        self.position += self.heading * (self.speed * dt);
        self.position = bounds.wrap(self.position, wrap_margin);
    }

    pub fn touches(&self, position: Vec2, radius: f32) -> bool {
        self.position.distance(&position) < self.radius + radius
    }
}
