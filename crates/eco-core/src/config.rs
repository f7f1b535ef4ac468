//! Configuration loading and typed config structures.
//!
//! The simulation is driven by a single YAML document. This module defines
//! strongly-typed structs mirroring that document and a loader that reads
//! and validates it. All validation failures are fatal at load time; there
//! are no silent defaults for missing species parameters.

use crate::error::{Error, Result};
use crate::types::{Position, Species};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level simulation configuration, mirroring the YAML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Grid dimensions, step count, processing order, spawn rules.
    pub simulation: SimulationSettings,
    /// Per-species lifespan/sight/cooldown parameters.
    pub parameters: SpeciesParams,
    /// Initial per-species placements.
    #[serde(default)]
    pub initial_state: InitialState,
}

/// World-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// Number of ticks to run.
    pub steps: u64,
    /// Seed for the single process-wide random source.
    #[serde(default)]
    pub seed: u64,
    /// Species update order within one tick. Earlier species move first and
    /// later species observe their post-update positions.
    pub order_to_process: Vec<Species>,
    /// Probabilistic spawn rules applied after all species passes, in the
    /// order listed here.
    #[serde(default)]
    pub random_spawn: Vec<SpawnRule>,
}

/// One Bernoulli spawn rule evaluated once per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRule {
    pub species: Species,
    /// Success probability of the per-tick spawn trial.
    pub probability: f64,
    /// Restrict placement to cells holding no entities.
    #[serde(default = "default_true")]
    pub only_empty_cells: bool,
}

fn default_true() -> bool {
    true
}

/// Static per-species behavior parameters.
///
/// Every block is required: a species missing its parameters is a parse
/// error, not a defaulted one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesParams {
    pub plant: PlantParams,
    pub herbivore: MobileParams,
    pub predator: PredatorParams,
    pub omnivore: MobileParams,
}

/// Parameters for the stationary plant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantParams {
    /// Ticks before dying of age. `None` means immortal.
    pub lifespan: Option<i32>,
}

/// Parameters for a mobile species that can mate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileParams {
    /// Ticks before dying of age unless refueled by eating. `None` means
    /// immortal.
    pub lifespan: Option<i32>,
    /// Retained for configuration compatibility; target search is grid-wide
    /// in the finalized movement rule.
    pub sight_radius: i32,
    /// Ticks after a successful mating before the entity can mate again.
    pub mating_cooldown: i32,
}

/// Parameters for the predator, which hunts but never reproduces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredatorParams {
    /// Ticks before dying of age unless refueled by eating. `None` means
    /// immortal.
    pub lifespan: Option<i32>,
    /// Retained for configuration compatibility; target search is grid-wide
    /// in the finalized movement rule.
    pub sight_radius: i32,
}

/// Initial entity placements, one coordinate list per species.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitialState {
    #[serde(default)]
    pub plant: Vec<Placement>,
    #[serde(default)]
    pub herbivore: Vec<Placement>,
    #[serde(default)]
    pub predator: Vec<Placement>,
    #[serde(default)]
    pub omnivore: Vec<Placement>,
}

impl InitialState {
    /// All placements as (species, position) pairs, in species order.
    pub fn placements(&self) -> impl Iterator<Item = (Species, Position)> + '_ {
        let per_species = [
            (Species::Plant, &self.plant),
            (Species::Herbivore, &self.herbivore),
            (Species::Predator, &self.predator),
            (Species::Omnivore, &self.omnivore),
        ];
        per_species
            .into_iter()
            .flat_map(|(species, list)| list.iter().map(move |p| (species, p.position())))
    }
}

/// A single (x, y) placement in the configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the YAML schema alone cannot express.
    pub fn validate(&self) -> Result<()> {
        let width = self.simulation.width;
        let height = self.simulation.height;
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if self.simulation.order_to_process.is_empty() {
            return Err(Error::EmptyProcessingOrder);
        }
        for rule in &self.simulation.random_spawn {
            if !(0.0..=1.0).contains(&rule.probability) {
                return Err(Error::InvalidProbability {
                    species: rule.species,
                    probability: rule.probability,
                });
            }
        }
        for (species, position) in self.initial_state.placements() {
            if position.x < 0 || position.x >= width || position.y < 0 || position.y >= height {
                return Err(Error::PlacementOutOfBounds {
                    species,
                    position,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }
}
