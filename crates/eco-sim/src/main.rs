//! Ecosystem simulation runner.

mod alerts;
mod render;

use alerts::{
    AlertManager, ConsumptionAlert, ExtinctionAlert, PopulationThresholdAlert, Threshold,
    TimelineSummary,
};
use anyhow::{Context, Result};
use eco_core::{Species, SimulationConfig};
use eco_world::Simulation;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let config_path = std::env::args()
        .nth(1)
        .context("usage: eco-sim <config.yaml>")?;
    let config = SimulationConfig::from_file(&config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;

    info!(
        width = config.simulation.width,
        height = config.simulation.height,
        steps = config.simulation.steps,
        seed = config.simulation.seed,
        "configuration loaded"
    );

    let mut simulation = Simulation::new(&config)?;
    let grid_cells = (config.simulation.width as usize) * (config.simulation.height as usize);

    let mut alerts = AlertManager::new();
    for species in Species::ALL {
        alerts.add(ExtinctionAlert::new(species));
    }
    alerts.add(PopulationThresholdAlert::new(
        Species::Plant,
        Threshold::Density(0.5),
    ));
    alerts.add(ConsumptionAlert::new("herbivore_eaten_by_predator"));
    alerts.add(TimelineSummary::new("timeline_summary.txt"));

    while !simulation.finished() {
        simulation.step();
        let stats = simulation.grid().grid_stats();

        println!("--- tick {} ---", simulation.current_tick());
        print!("{}", render::frame(simulation.grid()));
        info!(
            tick = simulation.current_tick(),
            total = stats.population.total,
            "population"
        );
        alerts.report(simulation.current_tick(), &stats, grid_cells);

        if stats.population.total == 0 {
            info!(
                tick = simulation.current_tick(),
                "ecosystem extinct, stopping early"
            );
            break;
        }
    }
    alerts.finish_all();

    let final_stats = simulation.grid().grid_stats();
    println!("{}", serde_json::to_string_pretty(&final_stats)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,eco_world=debug".into()),
        )
        .with_target(true)
        .init();
}
