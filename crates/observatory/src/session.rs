//! A running observation: site, instrument, atmosphere, and a simulation clock.

use parallax_atmosphere::AtmosphericModel;
use parallax_coords::{EquatorialCoord, HorizontalCoord, equatorial_to_horizontal, hour_angle};
use parallax_core::time::hours_to_days;
use parallax_time::lmst;

use crate::site::ObservingSite;
use crate::telescope::{LIMITING_SNR, Telescope};

/// Targets lower than this are not worth pointing at.
pub const DEFAULT_MIN_ALTITUDE_DEG: f64 = 15.0;
pub const DEFAULT_EXPOSURE_S: f64 = 60.0;

/// One exposure of one target at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub julian_date: f64,
    pub target: EquatorialCoord,
    pub snr: f64,
    pub apparent_magnitude: f64,
    pub exposure_s: f64,
    pub is_detection: bool,
}

impl Observation {
    /// Build an observation, flagging it as a detection when the SNR clears
    /// the detection threshold.
    pub fn new(
        julian_date: f64,
        target: EquatorialCoord,
        snr: f64,
        apparent_magnitude: f64,
        exposure_s: f64,
    ) -> Self {
        Self {
            julian_date,
            target,
            snr,
            apparent_magnitude,
            exposure_s,
            is_detection: snr >= LIMITING_SNR,
        }
    }
}

/// Site + telescope + atmosphere with a mutable Julian Date. Every query is
/// recomputed from the current clock.
#[derive(Debug, Clone)]
pub struct ObservingSession {
    site: ObservingSite,
    telescope: Telescope,
    atmosphere: AtmosphericModel,
    jd: f64,
    min_altitude_deg: f64,
}

impl ObservingSession {
    pub fn new(site: ObservingSite, telescope: Telescope, jd_start: f64) -> Self {
        let atmosphere = AtmosphericModel::new(site.conditions.clone());
        Self {
            site,
            telescope,
            atmosphere,
            jd: jd_start,
            min_altitude_deg: DEFAULT_MIN_ALTITUDE_DEG,
        }
    }

    pub fn site(&self) -> &ObservingSite {
        &self.site
    }

    pub fn telescope(&self) -> &Telescope {
        &self.telescope
    }

    pub fn atmosphere(&self) -> &AtmosphericModel {
        &self.atmosphere
    }

    pub fn jd(&self) -> f64 {
        self.jd
    }

    pub fn min_altitude_deg(&self) -> f64 {
        self.min_altitude_deg
    }

    pub fn set_min_altitude_deg(&mut self, min_alt_deg: f64) {
        self.min_altitude_deg = min_alt_deg;
    }

    /// Move the clock forward (or back, for negative hours).
    pub fn advance_time(&mut self, hours: f64) {
        self.jd += hours_to_days(hours);
    }

    /// Local mean sidereal time in radians.
    pub fn lst_rad(&self) -> f64 {
        lmst(self.jd, self.site.longitude_deg.to_radians())
    }

    pub fn lst_deg(&self) -> f64 {
        self.lst_rad().to_degrees()
    }

    pub fn hour_angle(&self, eq: &EquatorialCoord) -> f64 {
        hour_angle(self.lst_rad(), eq.ra)
    }

    pub fn to_horizontal(&self, eq: &EquatorialCoord) -> HorizontalCoord {
        equatorial_to_horizontal(eq, &self.site.location(), self.lst_rad())
    }

    pub fn airmass(&self, eq: &EquatorialCoord) -> f64 {
        self.atmosphere.airmass(self.to_horizontal(eq).alt_deg())
    }

    /// True when the target stands at or above the minimum altitude.
    pub fn is_visible(&self, eq: &EquatorialCoord) -> bool {
        self.to_horizontal(eq).alt_deg() >= self.min_altitude_deg
    }

    /// Faintest detectable magnitude toward `eq`, given the sky and seeing
    /// at the target's altitude.
    pub fn limiting_magnitude(&self, eq: &EquatorialCoord, exposure_s: f64) -> f64 {
        let alt = self.to_horizontal(eq).alt_deg();
        self.telescope.limiting_magnitude(
            exposure_s,
            self.atmosphere.sky_background(alt),
            self.atmosphere.effective_seeing_arcsec(alt),
        )
    }

    /// SNR of a source of catalog magnitude `v_magnitude` at `eq`, after
    /// extinction.
    pub fn snr(&self, eq: &EquatorialCoord, v_magnitude: f64, exposure_s: f64) -> f64 {
        let alt = self.to_horizontal(eq).alt_deg();
        self.snr_at_altitude(alt, v_magnitude, exposure_s)
    }

    /// Take an exposure of `eq` at the current instant.
    pub fn observe(&self, eq: &EquatorialCoord, v_magnitude: f64, exposure_s: f64) -> Observation {
        let alt = self.to_horizontal(eq).alt_deg();
        let apparent = self.atmosphere.apparent_magnitude(v_magnitude, alt);
        let snr = self.snr_at_altitude(alt, v_magnitude, exposure_s);
        Observation::new(self.jd, *eq, snr, apparent, exposure_s)
    }

    fn snr_at_altitude(&self, alt_deg: f64, v_magnitude: f64, exposure_s: f64) -> f64 {
        self.telescope.snr(
            self.atmosphere.apparent_magnitude(v_magnitude, alt_deg),
            exposure_s,
            self.atmosphere.sky_background(alt_deg),
            self.atmosphere.effective_seeing_arcsec(alt_deg),
        )
    }
}
