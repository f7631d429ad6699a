pub mod collision;
pub mod difficulty;
pub mod hazards;
pub mod levels;
pub mod player;
pub mod seeds;
pub mod session;
pub mod spawning;
pub mod tick;

pub use collision::{resolve_collisions, Interaction};
pub use difficulty::{Difficulty, DifficultyConfig};
pub use hazards::{HazardEvent, HazardManager};
pub use levels::{level_config, next_level_threshold, LevelConfig, LEVELS};
pub use player::PlayerInput;
pub use seeds::{Seed, SeedField};
pub use session::{GameSettings, Session, SessionSnapshot};
pub use tick::{run_simulation_tick, DeathCause, GameOutcome, SimulationEvent, TickInput};
