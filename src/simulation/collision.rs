//! Interaction resolver - who eats whom when two agents overlap
//!
//! A plain O(n²) scan over unordered live pairs in index order. Losers are
//! only flagged dead; removal is the tick's sweep.

use rand::Rng;
use serde::Serialize;

use crate::core::types::AgentId;
use crate::entity::agent::Agent;
use crate::entity::species::Species;

/// Fraction of the overlap offset applied when two of a kind bump
const SAME_SPECIES_PUSH: f32 = 0.05;

/// Radius lead needed for the larger animal to win outright
const SIZE_ADVANTAGE: f32 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Interaction {
    Eaten {
        loser: AgentId,
        loser_species: Species,
        winner: AgentId,
        winner_species: Species,
    },
    /// The player was caught; resolution stops here
    PlayerCaught { by: AgentId, by_species: Species },
}

/// Species-precedence check: Some(true) when `a` eats `b`, Some(false) when
/// `b` eats `a`, None when no rule applies
fn predation(a: Species, b: Species) -> Option<bool> {
    use Species::*;

    let hawk_prey = |s: Species| !matches!(s, Hawk | Crow | Cat);
    let cat_prey = |s: Species| !matches!(s, Cat | Squirrel);

    if a == Hawk && hawk_prey(b) {
        Some(true)
    } else if b == Hawk && hawk_prey(a) {
        Some(false)
    } else if a == Crow && b == Hawk {
        Some(true)
    } else if b == Crow && a == Hawk {
        Some(false)
    } else if a == Cat && cat_prey(b) {
        Some(true)
    } else if b == Cat && cat_prey(a) {
        Some(false)
    } else {
        None
    }
}

/// Decide the winner of an overlap between two different, not-both-seed-eater species
fn a_wins<R: Rng + ?Sized>(a: &Agent, b: &Agent, rng: &mut R) -> bool {
    if let Some(a_eats) = predation(a.species, b.species) {
        return a_eats;
    }
    if a.radius() > b.radius() + SIZE_ADVANTAGE {
        true
    } else if b.radius() > a.radius() + SIZE_ADVANTAGE {
        false
    } else {
        rng.gen_bool(0.5)
    }
}

/// Resolve every overlapping live pair
///
/// Returns the interactions in the order they happened. A player loss is
/// terminal: it is the last interaction returned.
pub fn resolve_collisions<R: Rng + ?Sized>(agents: &mut [Agent], rng: &mut R) -> Vec<Interaction> {
    let mut interactions = Vec::new();

    for i in 0..agents.len() {
        for j in (i + 1)..agents.len() {
            if !agents[i].alive {
                break;
            }
            if !agents[j].alive {
                continue;
            }

            let (head, tail) = agents.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            if a.position.distance(&b.position) >= a.radius() + b.radius() {
                continue;
            }

            if a.species == b.species {
                if rng.gen_bool(0.5) {
                    b.velocity += (b.position - a.position) * SAME_SPECIES_PUSH;
                } else {
                    a.velocity += (a.position - b.position) * SAME_SPECIES_PUSH;
                }
                continue;
            }

            if a.species.is_seed_eater() && b.species.is_seed_eater() {
                continue;
            }

            let (winner, loser) = if a_wins(a, b, rng) { (a, b) } else { (b, a) };
            loser.alive = false;

            if loser.is_player {
                tracing::debug!("Player {} caught by {} {:?}", loser.species, winner.species, winner.id);
                interactions.push(Interaction::PlayerCaught {
                    by: winner.id,
                    by_species: winner.species,
                });
                return interactions;
            }

            match winner.species {
                Species::Hawk => winner.kill_count += 1,
                Species::Crow if loser.species == Species::Hawk => {
                    if let Some(crow) = winner.crow.as_mut() {
                        crow.caught_hawk = true;
                    }
                }
                _ => {}
            }

            tracing::debug!("{} {:?} ate {} {:?}", winner.species, winner.id, loser.species, loser.id);
            interactions.push(Interaction::Eaten {
                loser: loser.id,
                loser_species: loser.species,
                winner: winner.id,
                winner_species: winner.species,
            });
        }
    }

    interactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn agent(species: Species, x: f32, rng: &mut ChaCha8Rng) -> Agent {
        Agent::new(species, Vec2::new(x, 100.0), false, 0.0, &SimulationConfig::default(), rng)
    }

    #[test]
    fn test_hawk_eats_songbird() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for prey in [Species::Dove, Species::Sparrow, Species::Chickadee] {
            let mut agents = vec![agent(prey, 100.0, &mut rng), agent(Species::Hawk, 105.0, &mut rng)];
            let result = resolve_collisions(&mut agents, &mut rng);

            assert_eq!(result.len(), 1);
            assert!(!agents[0].alive);
            assert!(agents[1].alive);
            assert_eq!(agents[1].kill_count, 1);
            assert!(matches!(
                result[0],
                Interaction::Eaten { winner_species: Species::Hawk, .. }
            ));
        }
    }

    #[test]
    fn test_crow_eats_hawk_and_latches() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut agents = vec![agent(Species::Hawk, 100.0, &mut rng), agent(Species::Crow, 110.0, &mut rng)];

        resolve_collisions(&mut agents, &mut rng);

        assert!(!agents[0].alive);
        assert!(agents[1].alive);
        assert!(agents[1].crow.as_ref().unwrap().caught_hawk);
        assert_eq!(agents[1].kill_count, 0);
    }

    #[test]
    fn test_cat_beats_hawk() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut agents = vec![agent(Species::Hawk, 100.0, &mut rng), agent(Species::Cat, 110.0, &mut rng)];
        resolve_collisions(&mut agents, &mut rng);
        assert!(!agents[0].alive);
        assert!(agents[1].alive);
    }

    #[test]
    fn test_same_species_never_dies() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for species in Species::ALL {
            let mut agents = vec![agent(species, 100.0, &mut rng), agent(species, 101.0, &mut rng)];
            let before = (agents[0].velocity, agents[1].velocity);

            let result = resolve_collisions(&mut agents, &mut rng);

            assert!(result.is_empty());
            assert!(agents.iter().all(|a| a.alive));
            assert!(agents[0].velocity != before.0 || agents[1].velocity != before.1);
        }
    }

    #[test]
    fn test_seed_eaters_ignore_each_other() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut agents = vec![agent(Species::Dove, 100.0, &mut rng), agent(Species::Squirrel, 102.0, &mut rng)];
        assert!(resolve_collisions(&mut agents, &mut rng).is_empty());
        assert!(agents.iter().all(|a| a.alive));
    }

    #[test]
    fn test_size_decides_without_precedence() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut agents = vec![agent(Species::Chickadee, 100.0, &mut rng), agent(Species::Crow, 110.0, &mut rng)];
        resolve_collisions(&mut agents, &mut rng);
        assert!(!agents[0].alive);
        assert!(agents[1].alive);
    }

    #[test]
    fn test_far_apart_agents_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut agents = vec![agent(Species::Dove, 100.0, &mut rng), agent(Species::Hawk, 200.0, &mut rng)];
        assert!(resolve_collisions(&mut agents, &mut rng).is_empty());
    }

    #[test]
    fn test_player_caught_stops_scan() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let config = SimulationConfig::default();
        let player = Agent::new(Species::Sparrow, Vec2::new(100.0, 100.0), true, 0.0, &config, &mut rng);
        let mut agents = vec![
            player,
            agent(Species::Hawk, 105.0, &mut rng),
            agent(Species::Dove, 500.0, &mut rng),
            agent(Species::Hawk, 505.0, &mut rng),
        ];

        let result = resolve_collisions(&mut agents, &mut rng);

        assert_eq!(result.len(), 1);
        assert!(matches!(result[0], Interaction::PlayerCaught { by_species: Species::Hawk, .. }));
        assert!(!agents[0].alive);
        assert_eq!(agents[1].kill_count, 0);
        // Later pair untouched
        assert!(agents[2].alive);
    }

    #[test]
    fn test_dead_agents_skipped() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut agents = vec![agent(Species::Dove, 100.0, &mut rng), agent(Species::Hawk, 105.0, &mut rng)];
        agents[0].alive = false;
        assert!(resolve_collisions(&mut agents, &mut rng).is_empty());
        assert_eq!(agents[1].kill_count, 0);
    }

    #[test]
    fn test_dead_winner_stops_participating() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        // Hawk at index 0 is eaten by the cat, so it cannot also take the dove
        let mut agents = vec![
            agent(Species::Hawk, 100.0, &mut rng),
            agent(Species::Cat, 110.0, &mut rng),
            agent(Species::Dove, 95.0, &mut rng),
        ];

        let result = resolve_collisions(&mut agents, &mut rng);

        assert!(!agents[0].alive);
        assert_eq!(agents[0].kill_count, 0);
        // Cat then takes the dove
        assert!(!agents[2].alive);
        assert_eq!(result.len(), 2);
    }
}
