//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for agents (birds, squirrels, cats, the player)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for ground hazards (snakes, rats)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HazardId(pub u32);

impl HazardId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// 2D position or velocity in screen units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Unit vector from `self` towards `target`, or `None` when they coincide
    pub fn direction_to(&self, target: &Self) -> Option<Self> {
        let delta = *target - *self;
        let len = delta.length();
        if len > 0.0 {
            Some(delta * (1.0 / len))
        } else {
            None
        }
    }

    /// Rescale to `max` if longer than `max`
    pub fn clamp_length(&self, max: f32) -> Self {
        let len = self.length();
        if len > max {
            *self * (max / len)
        } else {
            *self
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

/// Visible play area supplied by the presentation layer each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when `pos` lies further than `margin` outside the play area
    pub fn is_beyond(&self, pos: Vec2, margin: f32) -> bool {
        pos.x < -margin
            || pos.x > self.width + margin
            || pos.y < -margin
            || pos.y > self.height + margin
    }

    /// Toroidal wrap used by flyers: leaving one side re-enters on the other
    pub fn wrap(&self, pos: Vec2, margin: f32) -> Vec2 {
        let mut out = pos;
        if out.x < -margin {
            out.x = self.width + margin;
        }
        if out.x > self.width + margin {
            out.x = -margin;
        }
        if out.y < -margin {
            out.y = self.height + margin;
        }
        if out.y > self.height + margin {
            out.y = -margin;
        }
        out
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to_coincident_points() {
        let p = Vec2::new(3.0, 4.0);
        assert!(p.direction_to(&p).is_none());
    }

    #[test]
    fn test_direction_to_is_unit() {
        let d = Vec2::ZERO.direction_to(&Vec2::new(3.0, 4.0)).unwrap();
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!((d.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec2::new(30.0, 40.0).clamp_length(5.0);
        assert!((v.length() - 5.0).abs() < 1e-4);

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(short.clamp_length(5.0), short);
    }

    #[test]
    fn test_wrap_crosses_to_opposite_side() {
        let bounds = Bounds::new(800.0, 600.0);
        let wrapped = bounds.wrap(Vec2::new(-60.0, 300.0), 50.0);
        assert_eq!(wrapped.x, 850.0);
        assert_eq!(wrapped.y, 300.0);

        let wrapped = bounds.wrap(Vec2::new(400.0, 700.0), 50.0);
        assert_eq!(wrapped.y, -50.0);
    }

    #[test]
    fn test_is_beyond() {
        let bounds = Bounds::new(800.0, 600.0);
        assert!(!bounds.is_beyond(Vec2::new(-90.0, 10.0), 100.0));
        assert!(bounds.is_beyond(Vec2::new(-101.0, 10.0), 100.0));
        assert!(bounds.is_beyond(Vec2::new(10.0, 701.0), 100.0));
    }

    #[test]
    fn test_agent_id_unique() {
        assert_ne!(AgentId::new(), AgentId::new());
    }
}
