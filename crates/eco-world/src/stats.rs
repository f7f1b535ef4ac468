//! Statistics snapshot types.

use eco_core::Species;
use serde::Serialize;
use std::collections::BTreeMap;

/// Immutable statistics snapshot taken from the grid.
///
/// Population counts are recomputed from the live grid on every request;
/// event counters are cumulative since construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridStats {
    pub population: PopulationStats,
    pub events: BTreeMap<String, u64>,
}

impl GridStats {
    /// Cumulative count for a named event, zero if never recorded.
    pub fn event(&self, name: &str) -> u64 {
        self.events.get(name).copied().unwrap_or(0)
    }
}

/// Per-species population counts plus the grid-wide total.
///
/// Every species is present, with an explicit zero for extinct ones, so
/// observers can detect extinction without key-existence checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationStats {
    pub counts: BTreeMap<Species, usize>,
    pub total: usize,
}

impl PopulationStats {
    pub fn from_counts(counts: BTreeMap<Species, usize>) -> Self {
        let mut counts = counts;
        for species in Species::ALL {
            counts.entry(species).or_insert(0);
        }
        let total = counts.values().sum();
        Self { counts, total }
    }

    pub fn count(&self, species: Species) -> usize {
        self.counts.get(&species).copied().unwrap_or(0)
    }
}
