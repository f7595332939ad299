use std::path::{Path, PathBuf};

use anyhow::Context;
use parallax::config::{SimulationConfig, load_simulation, load_sites, load_telescopes};
use parallax::observatory::{ObservingSite, Telescope};
use parallax::sim::{site, telescope};

const DEFAULT_SIMULATION_CONFIG: &str = "configs/simulation.toml";

/// Explicit simulation file, else `configs/simulation.toml` when present,
/// else defaults.
pub fn simulation_config(path: Option<&Path>) -> anyhow::Result<SimulationConfig> {
    match path {
        Some(path) => load_simulation(path)
            .with_context(|| format!("loading simulation config {}", path.display())),
        None if Path::new(DEFAULT_SIMULATION_CONFIG).is_file() => {
            Ok(load_simulation(DEFAULT_SIMULATION_CONFIG)?)
        }
        None => Ok(SimulationConfig::default()),
    }
}

pub fn select_site(path: &Path, name: Option<&str>) -> anyhow::Result<ObservingSite> {
    let configs = load_sites(path).with_context(|| format!("loading sites from {}", path.display()))?;
    Ok(site::select(&configs, name)?)
}

pub fn select_telescope(path: &Path, name: Option<&str>) -> anyhow::Result<Telescope> {
    let configs =
        load_telescopes(path).with_context(|| format!("loading telescopes from {}", path.display()))?;
    Ok(telescope::select(&configs, name)?)
}

/// Apply command-line overrides to the loaded run settings.
pub fn apply_overrides(
    config: &mut SimulationConfig,
    epoch: Option<String>,
    catalog: Option<PathBuf>,
    exposure_s: Option<f64>,
) {
    if epoch.is_some() {
        config.start_epoch = epoch;
    }
    if catalog.is_some() {
        config.catalog_path = catalog;
    }
    if let Some(exposure_s) = exposure_s {
        config.exposure_s = exposure_s;
    }
}
