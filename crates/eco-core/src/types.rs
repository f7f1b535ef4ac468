//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named entity variant with its own behavior rule.
///
/// The set of species is closed: configuration files referring to any other
/// name fail at parse time rather than at first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Plant,
    Herbivore,
    Predator,
    Omnivore,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Plant,
        Species::Herbivore,
        Species::Predator,
        Species::Omnivore,
    ];

    /// The species this one treats as food, in the fixed order they are
    /// checked when a cell holds several edible kinds at once.
    pub fn diet(&self) -> &'static [Species] {
        match self {
            Species::Plant => &[],
            Species::Herbivore => &[Species::Plant],
            Species::Predator => &[Species::Herbivore],
            Species::Omnivore => &[Species::Plant, Species::Herbivore, Species::Predator],
        }
    }

    /// Lowercase name used in configuration and event counters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Plant => "plant",
            Species::Herbivore => "herbivore",
            Species::Predator => "predator",
            Species::Omnivore => "omnivore",
        }
    }

    /// Single-letter glyph for ASCII frames.
    pub fn glyph(&self) -> char {
        match self {
            Species::Plant => 'P',
            Species::Herbivore => 'H',
            Species::Predator => 'X',
            Species::Omnivore => 'O',
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier for an entity in the grid's arena.
///
/// Allocated sequentially by the grid so that no randomness is drawn outside
/// the injected seeded generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2D position on the grid. Coordinates are bounded, not toroidal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Squared Euclidean distance. Orders identically to Euclidean distance
    /// and stays in integer arithmetic.
    pub fn distance_sq(&self, other: Position) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Chebyshev distance: number of king moves between two cells.
    pub fn chebyshev_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
