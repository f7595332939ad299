//! Configuration models and loaders for observing sites, telescopes, and
//! simulation runs.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Observing site parsed from `configs/sites`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SiteConfig {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub elevation_m: f64,
    #[serde(default)]
    pub timezone_offset_h: i32,
    #[serde(default)]
    pub conditions: ConditionsConfig,
}

/// Typical atmospheric conditions at a site. Missing keys take the
/// average-site values.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ConditionsConfig {
    pub seeing_arcsec: f64,
    pub extinction_coeff: f64,
    pub bortle_scale: u8,
    pub humidity_pct: f64,
    pub temperature_c: f64,
    pub pressure_hpa: f64,
    pub wind_m_s: f64,
    pub transparency: f64,
}

impl Default for ConditionsConfig {
    fn default() -> Self {
        Self {
            seeing_arcsec: 2.0,
            extinction_coeff: 0.20,
            bortle_scale: 4,
            humidity_pct: 40.0,
            temperature_c: 15.0,
            pressure_hpa: 1013.25,
            wind_m_s: 3.0,
            transparency: 0.9,
        }
    }
}

/// Telescope parsed from `configs/telescopes`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TelescopeConfig {
    pub name: String,
    pub aperture_mm: f64,
    pub focal_length_mm: f64,
    #[serde(default)]
    pub central_obstruction: f64,
    #[serde(default = "default_reflectivity")]
    pub reflectivity: f64,
    #[serde(default)]
    pub detector: Option<DetectorConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DetectorConfig {
    pub name: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_size_um: f64,
    pub read_noise_e: f64,
    pub dark_current_e_s: f64,
    pub quantum_efficiency: f64,
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u8,
    #[serde(default = "default_gain")]
    pub gain: f64,
    #[serde(default)]
    pub is_cooled: bool,
}

/// Run-level settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub universe_seed: u64,
    pub procedural_mag_limit: f64,
    pub tile_size_deg: f64,
    pub min_altitude_deg: f64,
    pub exposure_s: f64,
    /// CSV or `.plxcat` catalog; the built-in bright stars are used when absent.
    pub catalog_path: Option<PathBuf>,
    /// UTC start time, e.g. `2024-11-15 18:00:00`. Defaults to the system clock.
    pub start_epoch: Option<String>,
    pub camera_fov_deg: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            universe_seed: 42,
            procedural_mag_limit: 12.0,
            tile_size_deg: 4.0,
            min_altitude_deg: 15.0,
            exposure_s: 60.0,
            catalog_path: None,
            start_epoch: None,
            camera_fov_deg: 60.0,
        }
    }
}

fn default_reflectivity() -> f64 {
    1.0
}

fn default_bit_depth() -> u8 {
    16
}

fn default_gain() -> f64 {
    1.0
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load site configurations from a directory of TOML files, a single TOML
/// file, or a YAML list.
pub fn load_sites<P: AsRef<Path>>(path: P) -> Result<Vec<SiteConfig>, ConfigError> {
    load_records(path)
}

/// Load telescope configurations; same file conventions as [`load_sites`].
pub fn load_telescopes<P: AsRef<Path>>(path: P) -> Result<Vec<TelescopeConfig>, ConfigError> {
    load_records(path)
}

/// Load a single simulation configuration from TOML or YAML.
pub fn load_simulation<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    if is_toml(path) {
        Ok(toml::from_str(&contents)?)
    } else {
        Ok(serde_yaml::from_str(&contents)?)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();

    let mut records = Vec::with_capacity(entries.len());
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        records.push(toml::from_str(&contents)?);
    }
    Ok(records)
}
