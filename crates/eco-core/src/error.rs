//! Error types for the simulation.

use crate::types::{Position, Species};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal configuration errors.
///
/// Every variant here is raised at construction time; nothing in this enum
/// is recovered from mid-simulation. A failed spawn or reproduction attempt
/// is not an error but a `false` placement result.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("spawn probability for {species} is {probability}, must be within [0, 1]")]
    InvalidProbability { species: Species, probability: f64 },

    #[error("initial placement of {species} at {position} is outside the {width}x{height} grid")]
    PlacementOutOfBounds {
        species: Species,
        position: Position,
        width: i32,
        height: i32,
    },

    #[error("order_to_process must name at least one species")]
    EmptyProcessingOrder,
}
