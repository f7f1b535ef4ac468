//! Simulation run loop over the grid.

use crate::grid::Grid;
use crate::stats::GridStats;
use eco_core::{Result, SimulationConfig};
use serde::Serialize;
use tracing::{debug, info};

/// Drives the grid for a configured number of ticks.
pub struct Simulation {
    grid: Grid,
    steps: u64,
    tick: u64,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let grid = Grid::new(config)?;
        Ok(Self {
            grid,
            steps: config.simulation.steps,
            tick: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Whether the configured number of ticks has been reached.
    pub fn finished(&self) -> bool {
        self.tick >= self.steps
    }

    /// Advance one tick.
    pub fn step(&mut self) {
        self.grid.tick();
        self.tick += 1;
        debug!(
            tick = self.tick,
            population = self.grid.entity_count(),
            "tick complete"
        );
    }

    /// Run until the configured step count, stopping early if the ecosystem
    /// goes extinct.
    pub fn run(&mut self) -> SimulationResult {
        info!(steps = self.steps, "starting simulation");
        while !self.finished() {
            self.step();

            if self.tick % 10 == 0 {
                let stats = self.grid.grid_stats();
                info!(
                    tick = self.tick,
                    total = stats.population.total,
                    "population checkpoint"
                );
            }

            if self.grid.entity_count() == 0 {
                info!(tick = self.tick, "ecosystem extinct, stopping early");
                break;
            }
        }
        self.collect_result()
    }

    fn collect_result(&self) -> SimulationResult {
        SimulationResult {
            ticks_run: self.tick,
            final_stats: self.grid.grid_stats(),
        }
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub ticks_run: u64,
    pub final_stats: GridStats,
}
