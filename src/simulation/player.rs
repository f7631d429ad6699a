//! Player input integration
//!
//! The player agent skips species AI; its motion comes from an abstract
//! input the presentation layer derives from keys or a pointer drag.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Bounds, Vec2};
use crate::entity::agent::Agent;

/// Impulse per frame for full axis input
pub const AXIS_IMPULSE: f32 = 0.6;
/// Damping applied while the player is over its speed cap
pub const OVERSPEED_DAMPING: f32 = 0.9;
/// Drag target speed per unit of distance
pub const DRAG_GAIN: f32 = 0.04;
/// Drag target speed cap, in multiples of base speed
pub const DRAG_SPEED_FACTOR: f32 = 4.0;
/// Fraction of the gap to the drag target velocity closed per frame
pub const DRAG_RESPONSE: f32 = 0.6;
/// Drags closer than this are ignored
pub const DRAG_DEADZONE: f32 = 5.0;

/// Abstract controls for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Directional input; any length, normalized before use
    pub axis: Vec2,
    /// Point the player is being dragged toward
    pub drag_target: Option<Vec2>,
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn axis(x: f32, y: f32) -> Self {
        Self {
            axis: Vec2::new(x, y),
            drag_target: None,
        }
    }

    pub fn drag(target: Vec2) -> Self {
        Self {
            axis: Vec2::ZERO,
            drag_target: Some(target),
        }
    }
}

/// Apply one frame of input to the player and move it
pub fn integrate_player(player: &mut Agent, input: &PlayerInput, dt: f32, bounds: &Bounds, config: &SimulationConfig) {
    if !player.alive {
        return;
    }

    let speed = player.species.speed();

    if let Some(target) = input.drag_target {
        let distance = player.position.distance(&target);
        if distance > DRAG_DEADZONE {
            if let Some(dir) = player.position.direction_to(&target) {
                let target_velocity = dir * (distance * DRAG_GAIN).min(speed * DRAG_SPEED_FACTOR);
                player.velocity += (target_velocity - player.velocity) * DRAG_RESPONSE;
            }
        }
    }

    let has_axis = input.axis.length() > 0.0;
    if has_axis {
        player.velocity += input.axis.normalize() * AXIS_IMPULSE;
    }

    if player.velocity.length() > player.max_speed() {
        player.velocity *= OVERSPEED_DAMPING;
    }

    if !has_axis && input.drag_target.is_none() {
        player.velocity = Vec2::ZERO;
    }

    player.position += player.velocity * dt;
    player.position = bounds.wrap(player.position, config.wrap_margin);

    if let Some(ground) = player.ground_line(bounds, config) {
        player.position.y = ground;
        player.velocity.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::species::Species;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(species: Species, position: Vec2) -> Agent {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut agent = Agent::new(species, position, true, 0.0, &SimulationConfig::default(), &mut rng);
        agent.velocity = Vec2::ZERO;
        agent
    }

    #[test]
    fn test_no_input_stops_player() {
        let config = SimulationConfig::default();
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = player(Species::Dove, Vec2::new(200.0, 200.0));
        p.velocity = Vec2::new(2.0, 2.0);

        integrate_player(&mut p, &PlayerInput::idle(), 1.0, &bounds, &config);

        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.position, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn test_axis_input_is_normalized() {
        let config = SimulationConfig::default();
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = player(Species::Dove, Vec2::new(200.0, 200.0));

        integrate_player(&mut p, &PlayerInput::axis(10.0, 0.0), 1.0, &bounds, &config);

        assert!((p.velocity.x - AXIS_IMPULSE).abs() < 1e-6);
        assert!((p.position.x - (200.0 + AXIS_IMPULSE)).abs() < 1e-4);
    }

    #[test]
    fn test_overspeed_is_damped() {
        let config = SimulationConfig::default();
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = player(Species::Dove, Vec2::new(200.0, 200.0));
        p.velocity = Vec2::new(10.0, 0.0);

        integrate_player(&mut p, &PlayerInput::axis(1.0, 0.0), 0.0, &bounds, &config);

        assert!((p.velocity.x - 10.6 * OVERSPEED_DAMPING).abs() < 1e-4);
    }

    #[test]
    fn test_drag_moves_toward_target() {
        let config = SimulationConfig::default();
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = player(Species::Hawk, Vec2::new(200.0, 200.0));

        integrate_player(&mut p, &PlayerInput::drag(Vec2::new(300.0, 200.0)), 1.0, &bounds, &config);

        // Target speed min(100 * 0.04, 1.6 * 4) = 4, closed by 60%
        assert!((p.velocity.x - 2.4).abs() < 1e-4);
        assert!(p.position.x > 200.0);
    }

    #[test]
    fn test_drag_inside_deadzone_keeps_velocity() {
        let config = SimulationConfig::default();
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = player(Species::Hawk, Vec2::new(200.0, 200.0));
        p.velocity = Vec2::new(1.0, 0.0);

        integrate_player(&mut p, &PlayerInput::drag(Vec2::new(203.0, 200.0)), 0.0, &bounds, &config);

        assert_eq!(p.velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_player_wraps() {
        let config = SimulationConfig::default();
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = player(Species::Sparrow, Vec2::new(849.9, 200.0));

        integrate_player(&mut p, &PlayerInput::axis(1.0, 0.0), 1.0, &bounds, &config);

        assert_eq!(p.position.x, -config.wrap_margin);
    }

    #[test]
    fn test_ground_player_stays_pinned() {
        let config = SimulationConfig::default();
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = player(Species::Squirrel, Vec2::new(400.0, 400.0));
        let ground = p.ground_line(&bounds, &config).unwrap();

        integrate_player(&mut p, &PlayerInput::axis(0.0, -1.0), 5.0, &bounds, &config);

        assert_eq!(p.position.y, ground);
        assert_eq!(p.velocity.y, 0.0);
    }
}
