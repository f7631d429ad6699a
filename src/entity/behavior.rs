//! Steering primitives and the per-species target selection table
//!
//! Selection is a pure function over a read-only neighbor snapshot; the
//! agent applies the chosen steering to its own velocity afterwards.

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::core::types::{AgentId, Vec2};
use crate::entity::species::Species;

pub const SEEK_IMPULSE: f32 = 0.2;
pub const SEEK_DAMPING: f32 = 0.995;
pub const FLEE_IMPULSE: f32 = 0.4;
pub const WANDER_IMPULSE: f32 = 0.3;
pub const WANDER_DAMPING: f32 = 0.99;
pub const CROW_PURSUIT_IMPULSE: f32 = 0.25;
pub const CROW_PURSUIT_DAMPING: f32 = 0.992;

/// Wander timer is re-rolled in [min, min + span)
pub const WANDER_TIMER_MIN: f32 = 1.0;
pub const WANDER_TIMER_SPAN: f32 = 2.0;

/// Read-only view of a sibling agent, captured at the start of the agent phase
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub id: AgentId,
    pub species: Species,
    pub position: Vec2,
    pub alive: bool,
}

/// Outcome of the species AI table for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steering {
    /// Accelerate toward a target scaled by aggression
    Seek(Vec2),
    /// Crow hunting a hawk: stronger pull, slight damping
    Pursue(Vec2),
    /// Accelerate away from a threat
    Flee(Vec2),
    /// Head for the feeder regardless of siblings
    Feeder,
    /// No target; drift on random impulses
    Wander,
}

/// Nearest neighbor matching `filter`; ties go to the first seen
pub fn nearest<'a, F>(from: Vec2, others: &'a [Neighbor], filter: F) -> Option<&'a Neighbor>
where
    F: Fn(&Neighbor) -> bool,
{
    others
        .iter()
        .filter(|n| filter(n))
        .min_by_key(|n| OrderedFloat(from.distance(&n.position)))
}

/// Species AI table
///
/// `others` must already exclude the agent itself and dead agents.
pub fn select_steering(species: Species, from: Vec2, others: &[Neighbor], flee_radius: f32) -> Steering {
    match species {
        Species::Hawk => nearest(from, others, |n| !matches!(n.species, Species::Hawk | Species::Crow))
            .map(|t| Steering::Seek(t.position))
            .unwrap_or(Steering::Wander),
        Species::Crow => nearest(from, others, |n| n.species == Species::Hawk)
            .map(|t| Steering::Pursue(t.position))
            .unwrap_or(Steering::Wander),
        Species::Cat => nearest(from, others, |n| !matches!(n.species, Species::Cat | Species::Squirrel))
            .map(|t| Steering::Seek(t.position))
            .unwrap_or(Steering::Wander),
        Species::Dove => match nearby_threat(from, others, flee_radius) {
            Some(threat) => Steering::Flee(threat),
            None => Steering::Wander,
        },
        // Fleeing always wins over chasing chickadees
        Species::Sparrow => match nearby_threat(from, others, flee_radius) {
            Some(threat) => Steering::Flee(threat),
            None => nearest(from, others, |n| n.species == Species::Chickadee)
                .map(|t| Steering::Seek(t.position))
                .unwrap_or(Steering::Wander),
        },
        Species::Chickadee => nearest(from, others, |n| n.species == Species::Chickadee)
            .map(|t| Steering::Seek(t.position))
            .unwrap_or(Steering::Wander),
        Species::Squirrel => Steering::Feeder,
    }
}

fn nearby_threat(from: Vec2, others: &[Neighbor], flee_radius: f32) -> Option<Vec2> {
    nearest(from, others, |n| n.species.is_threat_to_songbirds())
        .filter(|t| from.distance(&t.position) < flee_radius)
        .map(|t| t.position)
}

/// Accelerate toward `target`; coincident positions leave velocity untouched
pub fn seek(velocity: &mut Vec2, from: Vec2, target: Vec2, aggression: f32) {
    if let Some(dir) = from.direction_to(&target) {
        *velocity += dir * (SEEK_IMPULSE * aggression);
        *velocity *= SEEK_DAMPING;
    }
}

/// Crow pursuit of a hawk
pub fn pursue(velocity: &mut Vec2, from: Vec2, target: Vec2, aggression: f32) {
    if let Some(dir) = from.direction_to(&target) {
        *velocity += dir * (CROW_PURSUIT_IMPULSE * aggression);
        *velocity *= CROW_PURSUIT_DAMPING;
    }
}

/// Accelerate away from `threat`; when exactly on top of it, bolt randomly
pub fn flee<R: Rng + ?Sized>(velocity: &mut Vec2, from: Vec2, threat: Vec2, rng: &mut R) {
    match threat.direction_to(&from) {
        Some(away) => *velocity += away * FLEE_IMPULSE,
        None => {
            *velocity += Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        }
    }
}

/// Constant-strength push toward (positive) or away from (negative) a point
pub fn steer(velocity: &mut Vec2, from: Vec2, point: Vec2, strength: f32) {
    if let Some(dir) = from.direction_to(&point) {
        *velocity += dir * strength;
    }
}

/// Random impulse whenever the timer runs out; always damps
pub fn wander<R: Rng + ?Sized>(velocity: &mut Vec2, timer: &mut f32, dt: f32, rng: &mut R) {
    *timer -= dt;
    if *timer <= 0.0 {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        *velocity += Vec2::new(angle.cos(), angle.sin()) * WANDER_IMPULSE;
        *timer = roll_wander_timer(rng);
    }
    *velocity *= WANDER_DAMPING;
}

pub fn roll_wander_timer<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    WANDER_TIMER_MIN + rng.gen_range(0.0..WANDER_TIMER_SPAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn neighbor(species: Species, x: f32, y: f32) -> Neighbor {
        Neighbor { id: AgentId::new(), species, position: Vec2::new(x, y), alive: true }
    }

    #[test]
    fn test_nearest_ties_go_to_first_seen() {
        let others = vec![neighbor(Species::Dove, 10.0, 0.0), neighbor(Species::Sparrow, -10.0, 0.0)];
        let found = nearest(Vec2::ZERO, &others, |_| true).unwrap();
        assert_eq!(found.species, Species::Dove);
    }

    #[test]
    fn test_hawk_ignores_crows_and_hawks() {
        let others = vec![
            neighbor(Species::Crow, 1.0, 0.0),
            neighbor(Species::Hawk, 2.0, 0.0),
            neighbor(Species::Dove, 50.0, 0.0),
        ];
        let steering = select_steering(Species::Hawk, Vec2::ZERO, &others, 300.0);
        assert_eq!(steering, Steering::Seek(Vec2::new(50.0, 0.0)));
    }

    #[test]
    fn test_hawk_wanders_without_prey() {
        let others = vec![neighbor(Species::Crow, 1.0, 0.0)];
        assert_eq!(select_steering(Species::Hawk, Vec2::ZERO, &others, 300.0), Steering::Wander);
    }

    #[test]
    fn test_crow_pursues_hawk() {
        let others = vec![neighbor(Species::Dove, 1.0, 0.0), neighbor(Species::Hawk, 100.0, 0.0)];
        let steering = select_steering(Species::Crow, Vec2::ZERO, &others, 300.0);
        assert_eq!(steering, Steering::Pursue(Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_cat_skips_squirrels() {
        let others = vec![neighbor(Species::Squirrel, 1.0, 0.0), neighbor(Species::Sparrow, 40.0, 0.0)];
        let steering = select_steering(Species::Cat, Vec2::ZERO, &others, 300.0);
        assert_eq!(steering, Steering::Seek(Vec2::new(40.0, 0.0)));
    }

    #[test]
    fn test_dove_flees_only_within_radius() {
        let near = vec![neighbor(Species::Cat, 100.0, 0.0)];
        assert_eq!(
            select_steering(Species::Dove, Vec2::ZERO, &near, 300.0),
            Steering::Flee(Vec2::new(100.0, 0.0))
        );

        let far = vec![neighbor(Species::Hawk, 400.0, 0.0)];
        assert_eq!(select_steering(Species::Dove, Vec2::ZERO, &far, 300.0), Steering::Wander);
    }

    #[test]
    fn test_sparrow_flees_before_chasing() {
        let others = vec![neighbor(Species::Chickadee, 5.0, 0.0), neighbor(Species::Hawk, 200.0, 0.0)];
        assert_eq!(
            select_steering(Species::Sparrow, Vec2::ZERO, &others, 300.0),
            Steering::Flee(Vec2::new(200.0, 0.0))
        );

        let safe = vec![neighbor(Species::Chickadee, 5.0, 0.0), neighbor(Species::Hawk, 500.0, 0.0)];
        assert_eq!(
            select_steering(Species::Sparrow, Vec2::ZERO, &safe, 300.0),
            Steering::Seek(Vec2::new(5.0, 0.0))
        );
    }

    #[test]
    fn test_chickadee_chases_rivals() {
        let others = vec![neighbor(Species::Dove, 1.0, 0.0), neighbor(Species::Chickadee, 30.0, 0.0)];
        assert_eq!(
            select_steering(Species::Chickadee, Vec2::ZERO, &others, 300.0),
            Steering::Seek(Vec2::new(30.0, 0.0))
        );
    }

    #[test]
    fn test_squirrel_always_heads_for_feeder() {
        let others = vec![neighbor(Species::Cat, 1.0, 0.0)];
        assert_eq!(select_steering(Species::Squirrel, Vec2::ZERO, &others, 300.0), Steering::Feeder);
    }

    #[test]
    fn test_seek_coincident_is_noop() {
        let mut v = Vec2::new(1.0, 1.0);
        seek(&mut v, Vec2::ZERO, Vec2::ZERO, 1.0);
        assert_eq!(v, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_seek_accelerates_toward_target() {
        let mut v = Vec2::ZERO;
        seek(&mut v, Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
        assert!((v.x - SEEK_IMPULSE * SEEK_DAMPING).abs() < 1e-6);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_flee_coincident_uses_random_impulse() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut v = Vec2::ZERO;
        flee(&mut v, Vec2::ZERO, Vec2::ZERO, &mut rng);
        assert!(v.x.is_finite() && v.y.is_finite());
        assert!(v.x.abs() <= 1.0 && v.y.abs() <= 1.0);
    }

    #[test]
    fn test_flee_moves_away() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut v = Vec2::ZERO;
        flee(&mut v, Vec2::ZERO, Vec2::new(10.0, 0.0), &mut rng);
        assert!((v.x + FLEE_IMPULSE).abs() < 1e-6);
    }

    #[test]
    fn test_wander_resets_timer_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut v = Vec2::ZERO;
        let mut timer = 0.1;
        wander(&mut v, &mut timer, 1.0, &mut rng);
        assert!((WANDER_TIMER_MIN..WANDER_TIMER_MIN + WANDER_TIMER_SPAN).contains(&timer));
        assert!(v.length() > 0.0);
    }

    #[test]
    fn test_wander_damps_between_impulses() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut v = Vec2::new(1.0, 0.0);
        let mut timer = 10.0;
        wander(&mut v, &mut timer, 1.0, &mut rng);
        assert!((v.x - WANDER_DAMPING).abs() < 1e-6);
        assert_eq!(timer, 9.0);
    }
}
