//! Discovery bookkeeping: observations accumulate against candidate objects
//! until enough strong detections confirm them.

use std::fmt;

use parallax_catalog::Star;
use parallax_core::constants::EARTH_TO_SOLAR_RADIUS;
use parallax_observatory::Telescope;

pub use parallax_observatory::Observation;

/// Minimum SNR for a detection claim.
pub const DETECTION_SNR_THRESHOLD: f64 = 5.0;
/// Minimum SNR for an observation to count toward confirmation.
pub const DISCOVERY_SNR_THRESHOLD: f64 = 7.0;
/// Strong observations needed before a discovery is confirmed.
pub const REQUIRED_CONFIRMATIONS: u32 = 3;
pub const DEFAULT_PARALLAX_EPOCHS: u32 = 6;
/// Returned by [`minimum_detectable_planet_radius`] when nothing is detectable.
pub const UNDETECTABLE_PLANET_RADIUS: f64 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryType {
    DirectDetection,
    TransitMethod,
    ParallaxShift,
    Spectroscopic,
    Astrometric,
    PhotometricVariable,
    Supernova,
    Comet,
}

impl DiscoveryType {
    pub fn name(self) -> &'static str {
        match self {
            DiscoveryType::DirectDetection => "Direct Detection",
            DiscoveryType::TransitMethod => "Transit Method",
            DiscoveryType::ParallaxShift => "Parallax Shift",
            DiscoveryType::Spectroscopic => "Spectroscopic",
            DiscoveryType::Astrometric => "Astrometric",
            DiscoveryType::PhotometricVariable => "Photometric Variable",
            DiscoveryType::Supernova => "Supernova",
            DiscoveryType::Comet => "Comet",
        }
    }
}

impl fmt::Display for DiscoveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a discovery sits in the confirmation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Candidate,
    PartiallyConfirmed,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub object_id: u64,
    pub name: String,
    pub kind: DiscoveryType,
    pub jd_discovery: f64,
    n_confirmations: u32,
    observations: Vec<Observation>,
    confirmed: bool,
}

impl Discovery {
    pub fn new(object_id: u64, name: impl Into<String>, kind: DiscoveryType, jd: f64) -> Self {
        Self {
            object_id,
            name: name.into(),
            kind,
            jd_discovery: jd,
            n_confirmations: 0,
            observations: Vec::new(),
            confirmed: false,
        }
    }

    pub fn n_confirmations(&self) -> u32 {
        self.n_confirmations
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Latched: once true, stays true.
    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn state(&self) -> DiscoveryState {
        if self.confirmed {
            DiscoveryState::Confirmed
        } else if self.n_confirmations == 0 {
            DiscoveryState::Candidate
        } else {
            DiscoveryState::PartiallyConfirmed
        }
    }
}

/// Owns the discovery registry and applies the confirmation rules.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryEngine {
    discoveries: Vec<Discovery>,
}

impl DiscoveryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh candidate and return its index.
    pub fn new_discovery(
        &mut self,
        object_id: u64,
        name: impl Into<String>,
        kind: DiscoveryType,
        jd: f64,
    ) -> usize {
        self.discoveries.push(Discovery::new(object_id, name, kind, jd));
        self.discoveries.len() - 1
    }

    pub fn discovery(&self, index: usize) -> Option<&Discovery> {
        self.discoveries.get(index)
    }

    pub fn discoveries(&self) -> &[Discovery] {
        &self.discoveries
    }

    /// Index of the first discovery registered against `object_id`.
    pub fn find_by_object(&self, object_id: u64) -> Option<usize> {
        self.discoveries.iter().position(|d| d.object_id == object_id)
    }

    /// Append `obs` to `disc`, re-deriving its detection flag from the SNR.
    ///
    /// Returns `true` when the observation was strong enough to add a
    /// confirmation. The count is monotone and `confirmed` never resets.
    pub fn record_observation(&self, disc: &mut Discovery, obs: Observation) -> bool {
        apply_observation(disc, obs)
    }

    /// [`record_observation`](Self::record_observation) against a registered
    /// discovery; `None` when the index is unknown.
    pub fn record(&mut self, index: usize, obs: Observation) -> Option<bool> {
        let disc = self.discoveries.get_mut(index)?;
        Some(apply_observation(disc, obs))
    }

    pub fn is_confirmed(&self, disc: &Discovery) -> bool {
        disc.n_confirmations >= REQUIRED_CONFIRMATIONS
    }
}

fn apply_observation(disc: &mut Discovery, mut obs: Observation) -> bool {
    obs.is_detection = obs.snr >= DETECTION_SNR_THRESHOLD;
    let strong = obs.snr >= DISCOVERY_SNR_THRESHOLD;
    disc.observations.push(obs);

    if !strong {
        return false;
    }
    disc.n_confirmations += 1;
    if !disc.confirmed && disc.n_confirmations >= REQUIRED_CONFIRMATIONS {
        disc.confirmed = true;
        tracing::info!(
            object_id = disc.object_id,
            name = %disc.name,
            kind = %disc.kind,
            "discovery confirmed"
        );
    }
    true
}

/// Smallest parallax, in milliarcseconds, measurable over `n_epochs` epochs.
pub fn parallax_detection_limit_mas(scope: &Telescope, n_epochs: u32) -> f64 {
    scope.diffraction_limit_arcsec() * 100.0 / f64::from(n_epochs.max(1)).sqrt()
}

/// True when the star's catalog parallax exceeds the instrument's limit.
pub fn can_measure_parallax(star: &Star, scope: &Telescope, n_epochs: u32) -> bool {
    star.parallax_mas > 0.0 && star.parallax_mas > parallax_detection_limit_mas(scope, n_epochs)
}

/// Fractional flux drop for a planet of `r_planet_re` Earth radii crossing a
/// star of `r_star_rs` solar radii.
pub fn transit_depth(r_planet_re: f64, r_star_rs: f64) -> f64 {
    let ratio = r_planet_re * EARTH_TO_SOLAR_RADIUS / r_star_rs;
    ratio * ratio
}

/// Smallest planet radius (Earth radii) whose transit depth exceeds the
/// photometric precision `1/snr`.
pub fn minimum_detectable_planet_radius(photometric_snr: f64, star_radius_rs: f64) -> f64 {
    if photometric_snr <= 0.0 {
        return UNDETECTABLE_PLANET_RADIUS;
    }
    (1.0 / photometric_snr).sqrt() * star_radius_rs / EARTH_TO_SOLAR_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_coords::EquatorialCoord;

    fn obs(snr: f64) -> Observation {
        Observation::new(2_460_000.5, EquatorialCoord::new(0.0, 0.0), snr, 10.0, 60.0)
    }

    #[test]
    fn state_follows_confirmation_count() {
        let mut engine = DiscoveryEngine::new();
        let idx = engine.new_discovery(7, "Test", DiscoveryType::Comet, 2_460_000.5);
        assert_eq!(engine.discovery(idx).map(Discovery::state), Some(DiscoveryState::Candidate));
        engine.record(idx, obs(8.0));
        assert_eq!(
            engine.discovery(idx).map(Discovery::state),
            Some(DiscoveryState::PartiallyConfirmed)
        );
        engine.record(idx, obs(8.0));
        engine.record(idx, obs(8.0));
        assert_eq!(engine.discovery(idx).map(Discovery::state), Some(DiscoveryState::Confirmed));
    }

    #[test]
    fn unknown_index_records_nothing() {
        let mut engine = DiscoveryEngine::new();
        assert_eq!(engine.record(3, obs(10.0)), None);
    }
}
