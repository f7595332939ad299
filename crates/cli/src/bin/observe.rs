//! Print an observing-session report for one target star.

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use parallax::catalog::Star;
use parallax::discovery::{
    DEFAULT_PARALLAX_EPOCHS, DiscoveryType, can_measure_parallax, minimum_detectable_planet_radius,
    parallax_detection_limit_mas,
};
use parallax::export::report;
use parallax::sim::{Simulation, load_catalog_or_builtin};

#[path = "shared/logging.rs"]
mod logging;
#[path = "shared/setup.rs"]
mod setup;

/// Observe a catalog star from a configured site and telescope.
#[derive(Parser, Debug)]
#[command(author, version, about = "Observing-session report for a target star")]
struct Cli {
    /// Site name (case-insensitive); defaults to the first configured site
    #[arg(long)]
    site: Option<String>,

    /// Telescope name (case-insensitive); defaults to the first configured telescope
    #[arg(long)]
    telescope: Option<String>,

    /// Site configuration directory or file
    #[arg(long, default_value = "configs/sites")]
    sites: PathBuf,

    /// Telescope configuration directory or file
    #[arg(long, default_value = "configs/telescopes")]
    telescopes: PathBuf,

    /// Simulation settings file (defaults to configs/simulation.toml when present)
    #[arg(long)]
    simulation: Option<PathBuf>,

    /// Start epoch in UTC, e.g. "2024-11-15 18:00"
    #[arg(long)]
    epoch: Option<String>,

    /// CSV or .plxcat catalog; the built-in bright stars are used otherwise
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Target star name
    #[arg(long, default_value = "Betelgeuse")]
    target: String,

    /// Exposure time in seconds
    #[arg(long)]
    exposure: Option<f64>,

    /// Also write the report as JSON (use '-' for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Run the discovery walkthrough after the report
    #[arg(long, default_value_t = false)]
    discovery: bool,
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let mut config = setup::simulation_config(cli.simulation.as_deref())?;
    setup::apply_overrides(&mut config, cli.epoch.clone(), cli.catalog.clone(), cli.exposure);

    let site = setup::select_site(&cli.sites, cli.site.as_deref())?;
    let telescope = setup::select_telescope(&cli.telescopes, cli.telescope.as_deref())?;
    let catalog = load_catalog_or_builtin(config.catalog_path.as_deref());
    let mut sim = Simulation::from_config(&config, site, telescope, catalog)?;

    let target = sim
        .catalog()
        .find_by_name(&cli.target)
        .cloned()
        .ok_or_else(|| anyhow!("Star '{}' not found in catalog", cli.target))?;

    let status = sim.status(Some(&target));
    println!("{status}");

    if let Some(path) = &cli.json {
        report::write_json(path, &status)?;
    }

    if cli.discovery {
        discovery_walkthrough(&mut sim, &target)?;
    }

    Ok(())
}

fn discovery_walkthrough(sim: &mut Simulation, target: &Star) -> anyhow::Result<()> {
    println!("\n--- Discovery Mechanics ---");
    let scope = sim.session().telescope().clone();

    if let Some(barnard) = sim.catalog().find_by_name("Barnard's Star").cloned() {
        let limit = parallax_detection_limit_mas(&scope, DEFAULT_PARALLAX_EPOCHS);
        let measurable = can_measure_parallax(&barnard, &scope, DEFAULT_PARALLAX_EPOCHS);
        println!("Barnard's Star parallax: {:.1} mas", barnard.parallax_mas);
        println!(
            "Parallax detection limit ({}, {} epochs): {:.3} mas",
            scope.name, DEFAULT_PARALLAX_EPOCHS, limit
        );
        println!("Measurable: {}", if measurable { "Yes" } else { "No" });

        let snr_300 = sim.session().snr(&barnard.position, barnard.v_magnitude, 300.0);
        // M dwarf, ~0.2 solar radii
        let planet_r = minimum_detectable_planet_radius(snr_300, 0.2);
        println!("Min detectable planet radius (300s): {planet_r:.2} Earth radii");
    }

    let index = sim.register_discovery(target.id, DiscoveryType::DirectDetection)?;
    let exposure = sim.exposure_s();
    for _ in 0..3 {
        let obs = sim.observe_star(target.id, exposure)?;
        println!(
            "JD {:.5}: SNR {:.1} ({})",
            obs.julian_date,
            obs.snr,
            if obs.is_detection { "detection" } else { "no detection" }
        );
        sim.session_mut().advance_time(1.0);
    }
    if let Some(disc) = sim.discoveries().discovery(index) {
        println!(
            "{} [{}]: {} confirmations, state {:?}",
            disc.name,
            disc.kind,
            disc.n_confirmations(),
            disc.state()
        );
    }
    Ok(())
}
