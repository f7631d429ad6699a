//! Feeder Frenzy - backyard bird feeder arcade simulation
//!
//! The agent simulation core: a player bird competes with hawks, crows,
//! songbirds, squirrels and cats around a seed feeder while snakes and rats
//! roam the grass. Rendering, input devices and audio live elsewhere; this
//! crate consumes a time step, screen bounds, feeder position and abstract
//! player input, and produces updated state plus discrete events.

pub mod core;
pub mod entity;
pub mod simulation;
