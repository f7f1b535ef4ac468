//! Observer layer over [`GridStats`] snapshots.
//!
//! Alerts are pure consumers of the per-tick statistics snapshot; they never
//! touch the grid itself. The manager runs them in registration order and
//! logs whatever they report.

use eco_core::Species;
use eco_world::GridStats;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use tracing::warn;

/// A condition checked against each tick's statistics snapshot.
pub trait Alert {
    /// Inspect the snapshot, returning a message when the condition fires.
    /// `grid_cells` is the total cell count, for density-based conditions.
    fn check(&mut self, stats: &GridStats, grid_cells: usize) -> Option<String>;

    /// Called once after the run, for alerts that persist something.
    fn finish(&mut self) {}
}

/// Runs a list of alerts each tick and logs triggered messages.
#[derive(Default)]
pub struct AlertManager {
    alerts: Vec<Box<dyn Alert>>,
}

impl AlertManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, alert: impl Alert + 'static) {
        self.alerts.push(Box::new(alert));
    }

    /// Check every alert against the snapshot and return the messages that
    /// fired, in registration order.
    pub fn check_all(&mut self, stats: &GridStats, grid_cells: usize) -> Vec<String> {
        self.alerts
            .iter_mut()
            .filter_map(|alert| alert.check(stats, grid_cells))
            .collect()
    }

    /// Check every alert and log triggered messages as warnings.
    pub fn report(&mut self, tick: u64, stats: &GridStats, grid_cells: usize) {
        for message in self.check_all(stats, grid_cells) {
            warn!(tick, alert = %message, "alert triggered");
        }
    }

    pub fn finish_all(&mut self) {
        for alert in &mut self.alerts {
            alert.finish();
        }
    }
}

/// Fires every tick a species' population is zero.
pub struct ExtinctionAlert {
    species: Species,
}

impl ExtinctionAlert {
    pub fn new(species: Species) -> Self {
        Self { species }
    }
}

impl Alert for ExtinctionAlert {
    fn check(&mut self, stats: &GridStats, _grid_cells: usize) -> Option<String> {
        if stats.population.count(self.species) == 0 {
            Some(format!("no {} entities left", self.species))
        } else {
            None
        }
    }
}

/// How a [`PopulationThresholdAlert`] interprets its threshold.
pub enum Threshold {
    /// Entities per cell, in `0.0..=1.0`.
    Density(f64),
    /// Absolute population count.
    Absolute(usize),
}

/// Fires once when a species' population crosses above a threshold, then
/// re-arms when it falls back under.
pub struct PopulationThresholdAlert {
    species: Species,
    threshold: Threshold,
    armed: bool,
}

impl PopulationThresholdAlert {
    pub fn new(species: Species, threshold: Threshold) -> Self {
        Self {
            species,
            threshold,
            armed: true,
        }
    }
}

impl Alert for PopulationThresholdAlert {
    fn check(&mut self, stats: &GridStats, grid_cells: usize) -> Option<String> {
        let count = stats.population.count(self.species);
        let (exceeded, message) = match self.threshold {
            Threshold::Density(threshold) => {
                let density = count as f64 / grid_cells as f64;
                (
                    density > threshold,
                    format!(
                        "{} density exceeded {:.2} (current: {:.2}, count: {}/{} cells)",
                        self.species, threshold, density, count, grid_cells
                    ),
                )
            }
            Threshold::Absolute(threshold) => (
                count > threshold,
                format!(
                    "{} population exceeded {} (current: {})",
                    self.species, threshold, count
                ),
            ),
        };
        if exceeded && self.armed {
            self.armed = false;
            Some(message)
        } else {
            if !exceeded {
                self.armed = true;
            }
            None
        }
    }
}

/// Fires when a named event counter increased since the last check.
pub struct ConsumptionAlert {
    event: String,
    previous: u64,
}

impl ConsumptionAlert {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            previous: 0,
        }
    }
}

impl Alert for ConsumptionAlert {
    fn check(&mut self, stats: &GridStats, _grid_cells: usize) -> Option<String> {
        let current = stats.event(&self.event);
        let delta = current.saturating_sub(self.previous);
        self.previous = current;
        if delta > 0 {
            Some(format!("{} occurred {delta} time(s)", self.event))
        } else {
            None
        }
    }
}

/// Records every counter change with its tick and writes a plain-text
/// timeline file when the run finishes. Never fires a message itself.
pub struct TimelineSummary {
    save_path: PathBuf,
    tick: u64,
    previous: Option<BTreeMap<String, u64>>,
    entries: Vec<(u64, String)>,
}

impl TimelineSummary {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
            tick: 0,
            previous: None,
            entries: Vec::new(),
        }
    }

    fn flatten(stats: &GridStats) -> BTreeMap<String, u64> {
        let mut counters: BTreeMap<String, u64> = stats
            .population
            .counts
            .iter()
            .map(|(species, count)| (species.to_string(), *count as u64))
            .collect();
        counters.insert("total".to_string(), stats.population.total as u64);
        counters.extend(stats.events.iter().map(|(k, v)| (k.clone(), *v)));
        counters
    }
}

impl Alert for TimelineSummary {
    fn check(&mut self, stats: &GridStats, _grid_cells: usize) -> Option<String> {
        self.tick += 1;
        let current = Self::flatten(stats);
        if let Some(previous) = &self.previous {
            for (name, value) in &current {
                let before = previous.get(name).copied().unwrap_or(0);
                if *value != before {
                    self.entries
                        .push((self.tick, format!("{name} changed from {before} to {value}")));
                }
            }
        }
        self.previous = Some(current);
        None
    }

    fn finish(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let result = fs::File::create(&self.save_path).and_then(|mut file| {
            writeln!(file, "Timeline Summary - Simulation Events")?;
            writeln!(file, "{}", "=".repeat(50))?;
            writeln!(file)?;
            for (tick, description) in &self.entries {
                writeln!(file, "Step {tick}: {description}")?;
            }
            Ok(())
        });
        if let Err(error) = result {
            warn!(path = %self.save_path.display(), %error, "failed to write timeline summary");
        }
    }
}
