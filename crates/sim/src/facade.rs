//! Conversion from configuration records to runtime values.

pub mod site {
    use parallax_atmosphere::AtmosphericConditions;
    use parallax_config::{ConditionsConfig, SiteConfig};
    use parallax_observatory::ObservingSite;
    use thiserror::Error;

    /// Errors surfaced when selecting sites.
    #[derive(Debug, Error)]
    pub enum SiteError {
        #[error("site '{0}' not found in catalog")]
        NotFound(String),
        #[error("site catalog is empty")]
        EmptyCatalog,
    }

    fn conditions_from_config(config: &ConditionsConfig) -> AtmosphericConditions {
        AtmosphericConditions {
            seeing_arcsec: config.seeing_arcsec,
            extinction_coeff: config.extinction_coeff,
            bortle_scale: config.bortle_scale,
            humidity_pct: config.humidity_pct,
            temperature_c: config.temperature_c,
            pressure_hpa: config.pressure_hpa,
            wind_m_s: config.wind_m_s,
            transparency: config.transparency,
        }
    }

    /// Convert a `SiteConfig` into a runtime `ObservingSite`.
    pub fn from_config(config: &SiteConfig) -> ObservingSite {
        ObservingSite {
            name: config.name.clone(),
            latitude_deg: config.latitude_deg,
            longitude_deg: config.longitude_deg,
            elevation_m: config.elevation_m,
            timezone_offset_h: config.timezone_offset_h,
            conditions: conditions_from_config(&config.conditions),
        }
    }

    /// Select a site by optional name (case-insensitive), defaulting to the first entry.
    pub fn select(configs: &[SiteConfig], requested: Option<&str>) -> Result<ObservingSite, SiteError> {
        let first = configs.first().ok_or(SiteError::EmptyCatalog)?;
        let chosen = match requested {
            Some(name) => {
                let upper = name.to_uppercase();
                configs
                    .iter()
                    .find(|cfg| cfg.name.to_uppercase() == upper)
                    .ok_or_else(|| SiteError::NotFound(name.to_string()))?
            }
            None => first,
        };
        Ok(from_config(chosen))
    }
}

pub mod telescope {
    use parallax_config::{DetectorConfig, TelescopeConfig};
    use parallax_observatory::{Detector, Telescope, TelescopeError};
    use thiserror::Error;

    /// Errors surfaced when selecting or converting telescopes.
    #[derive(Debug, Error)]
    pub enum TelescopeSelectError {
        #[error("telescope '{0}' not found in catalog")]
        NotFound(String),
        #[error("telescope catalog is empty")]
        EmptyCatalog,
        #[error("telescope '{name}' is invalid: {source}")]
        Invalid {
            name: String,
            #[source]
            source: TelescopeError,
        },
    }

    fn detector_from_config(config: &DetectorConfig) -> Detector {
        Detector {
            name: config.name.clone(),
            pixel_width: config.pixel_width,
            pixel_height: config.pixel_height,
            pixel_size_um: config.pixel_size_um,
            read_noise_e: config.read_noise_e,
            dark_current_e_s: config.dark_current_e_s,
            quantum_efficiency: config.quantum_efficiency,
            bit_depth: config.bit_depth,
            gain: config.gain,
            is_cooled: config.is_cooled,
        }
    }

    /// Convert a `TelescopeConfig` into a validated runtime `Telescope`.
    /// A missing detector section means the generic CCD.
    pub fn from_config(config: &TelescopeConfig) -> Result<Telescope, TelescopeSelectError> {
        let telescope = Telescope {
            name: config.name.clone(),
            aperture_mm: config.aperture_mm,
            focal_length_mm: config.focal_length_mm,
            central_obstruction: config.central_obstruction,
            reflectivity: config.reflectivity,
            detector: config
                .detector
                .as_ref()
                .map(detector_from_config)
                .unwrap_or_default(),
        };
        telescope
            .validate()
            .map_err(|source| TelescopeSelectError::Invalid {
                name: config.name.clone(),
                source,
            })?;
        Ok(telescope)
    }

    /// Select a telescope by optional name (case-insensitive), defaulting to the first entry.
    pub fn select(
        configs: &[TelescopeConfig],
        requested: Option<&str>,
    ) -> Result<Telescope, TelescopeSelectError> {
        let first = configs.first().ok_or(TelescopeSelectError::EmptyCatalog)?;
        let chosen = match requested {
            Some(name) => {
                let upper = name.to_uppercase();
                configs
                    .iter()
                    .find(|cfg| cfg.name.to_uppercase() == upper)
                    .ok_or_else(|| TelescopeSelectError::NotFound(name.to_string()))?
            }
            None => first,
        };
        from_config(chosen)
    }
}

pub mod catalog {
    use std::path::Path;

    use parallax_catalog::SpatialCatalog;

    /// Load a catalog file, falling back to the built-in bright stars when no
    /// path is given or the file cannot be used.
    pub fn load_catalog_or_builtin(path: Option<&Path>) -> SpatialCatalog {
        let Some(path) = path else {
            return SpatialCatalog::builtin();
        };
        match parallax_catalog::load_catalog_file(path) {
            Ok((catalog, skipped)) => {
                if !skipped.is_empty() {
                    tracing::warn!(path = %path.display(), skipped = skipped.len(), "catalog rows skipped");
                }
                catalog
            }
            Err(err) => {
                tracing::error!(
                    path = %path.display(),
                    error = %err,
                    "catalog unavailable, using built-in bright stars"
                );
                SpatialCatalog::builtin()
            }
        }
    }
}
