//! Grid ecosystem engine.
//!
//! This crate implements the 2D grid where plants, herbivores, predators and
//! omnivores age, move, eat and reproduce one synchronized tick at a time.

pub mod entity;
pub mod factory;
pub mod grid;
pub mod simulation;
pub mod stats;

pub use entity::{Entity, EntityKind, Outcome};
pub use factory::EntityFactory;
pub use grid::Grid;
pub use simulation::{Simulation, SimulationResult};
pub use stats::{GridStats, PopulationStats};
