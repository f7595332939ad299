//! Run the tick pipeline and dump the render records.

use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use parallax::export::render::{self, Row};
use parallax::export::report;
use parallax::sim::{Simulation, load_catalog_or_builtin};
use serde::Serialize;

#[path = "shared/logging.rs"]
mod logging;
#[path = "shared/setup.rs"]
mod setup;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

/// Advance the simulation clock and write the screen-space star list per tick.
#[derive(Parser, Debug)]
#[command(author, version, about = "Render-record generator for the starfield pipeline")]
struct Cli {
    #[arg(long)]
    site: Option<String>,

    #[arg(long)]
    telescope: Option<String>,

    #[arg(long, default_value = "configs/sites")]
    sites: PathBuf,

    #[arg(long, default_value = "configs/telescopes")]
    telescopes: PathBuf,

    #[arg(long)]
    simulation: Option<PathBuf>,

    /// Start epoch in UTC
    #[arg(long)]
    epoch: Option<String>,

    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Number of frames to produce
    #[arg(long, default_value_t = 12)]
    ticks: usize,

    /// Simulated hours between frames
    #[arg(long, default_value_t = 1.0)]
    step_hours: f64,

    /// Camera altitude in degrees
    #[arg(long, default_value_t = 45.0)]
    alt: f64,

    /// Camera azimuth in degrees
    #[arg(long, default_value_t = 0.0)]
    az: f64,

    /// Camera field of view in degrees (defaults to the simulation setting)
    #[arg(long)]
    fov: Option<f64>,

    /// Track a named star instead of a fixed alt/az
    #[arg(long)]
    track: Option<String>,

    /// Add procedural stars within this many degrees of the tracked star
    #[arg(long)]
    procedural_radius: Option<f64>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Output file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Serialize)]
struct FrameOut {
    tick: usize,
    jd: f64,
    lst_deg: f64,
    stars: Vec<Row>,
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let mut config = setup::simulation_config(cli.simulation.as_deref())?;
    setup::apply_overrides(&mut config, cli.epoch.clone(), cli.catalog.clone(), None);
    if let Some(fov) = cli.fov {
        config.camera_fov_deg = fov;
    }

    let site = setup::select_site(&cli.sites, cli.site.as_deref())?;
    let telescope = setup::select_telescope(&cli.telescopes, cli.telescope.as_deref())?;
    let catalog = load_catalog_or_builtin(config.catalog_path.as_deref());
    let mut sim = Simulation::from_config(&config, site, telescope, catalog)?;
    sim.camera_mut().set_pointing(cli.alt, cli.az);

    let tracked = match &cli.track {
        Some(name) => Some(
            sim.catalog()
                .find_by_name(name)
                .map(|star| star.position)
                .ok_or_else(|| anyhow!("Star '{}' not found in catalog", name))?,
        ),
        None => None,
    };
    if let (Some(position), Some(radius)) = (tracked, cli.procedural_radius) {
        sim.populate_procedural(&position, radius);
    }

    let mut frames = Vec::with_capacity(cli.ticks);
    for tick in 0..cli.ticks {
        if tick > 0 {
            sim.session_mut().advance_time(cli.step_hours);
        }
        if let Some(position) = &tracked {
            sim.point_at(position);
        }
        let frame = sim.frame();
        tracing::info!(tick, jd = frame.jd, stars = frame.len(), "frame");
        frames.push(FrameOut {
            tick,
            jd: frame.jd,
            lst_deg: frame.lst_deg,
            stars: frame.rows(tick).collect(),
        });
    }

    match cli.format {
        Format::Csv => {
            let mut writer = render::writer_for_path(&cli.output)?;
            render::write_csv(
                writer.as_mut(),
                frames.iter().flat_map(|frame| frame.stars.iter().copied()),
            )?;
        }
        Format::Json => report::write_json(&cli.output, &frames)?,
    }

    Ok(())
}
