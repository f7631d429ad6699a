pub mod agent;
pub mod behavior;
pub mod hazard;
pub mod species;

pub use agent::{Agent, UpdateContext};
pub use behavior::{Neighbor, Steering};
pub use hazard::{Hazard, HazardKind};
pub use species::{Species, SpeciesInfo};
