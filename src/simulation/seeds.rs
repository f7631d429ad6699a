//! Seed field around the feeder

use rand::Rng;
use serde::Serialize;

use crate::core::types::Vec2;
use crate::entity::agent::Agent;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Seed {
    pub position: Vec2,
    pub eaten: bool,
}

/// Every seed of the run; seeds are created once and only ever marked eaten
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedField {
    seeds: Vec<Seed>,
}

impl SeedField {
    /// Scatter `count` seeds uniformly in a `scatter`-wide square on the feeder
    pub fn scatter<R: Rng + ?Sized>(count: u32, feeder: Vec2, scatter: f32, rng: &mut R) -> Self {
        let seeds = (0..count)
            .map(|_| Seed {
                position: Vec2::new(
                    feeder.x + (rng.gen::<f32>() - 0.5) * scatter,
                    feeder.y + (rng.gen::<f32>() - 0.5) * scatter,
                ),
                eaten: false,
            })
            .collect();
        Self { seeds }
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn total(&self) -> usize {
        self.seeds.len()
    }

    pub fn remaining(&self) -> usize {
        self.seeds.iter().filter(|s| !s.eaten).count()
    }

    pub fn uneaten(&self) -> impl Iterator<Item = &Seed> {
        self.seeds.iter().filter(|s| !s.eaten)
    }

    /// True once a non-empty field has been eaten bare
    pub fn is_depleted(&self) -> bool {
        !self.seeds.is_empty() && self.remaining() == 0
    }

    /// Let hungry seed eaters take seeds within `radius + reach`
    ///
    /// Each uneaten seed goes to the first eligible agent in collection order.
    /// Returns the number of seeds eaten.
    pub fn consume(&mut self, agents: &mut [Agent], reach: f32) -> u32 {
        let mut eaten = 0;

        for seed in self.seeds.iter_mut().filter(|s| !s.eaten) {
            let eater = agents
                .iter_mut()
                .filter(|a| a.can_eat_seed())
                .find(|a| a.position.distance(&seed.position) < a.radius() + reach);

            if let Some(agent) = eater {
                if agent.eat_seed() {
                    seed.eaten = true;
                    eaten += 1;
                }
            }
        }

        eaten
    }
}
