//! Ground-based atmospheric model: airmass, extinction, seeing, refraction,
//! and sky background.
//!
//! Altitudes are in degrees throughout this crate. Every function is total;
//! values outside the documented validity ranges are clamped, not rejected.

/// Airmass ceiling returned at or below the horizon.
pub const MAX_AIRMASS: f64 = 40.0;

/// Below this apparent altitude (degrees) refraction is reported as zero.
pub const REFRACTION_MIN_ALTITUDE_DEG: f64 = 0.5;

/// Sky brightness (mag/arcsec²) at the zenith for Bortle classes 1 through 9.
const BORTLE_SKY_BACKGROUND: [f64; 9] = [22.0, 21.7, 21.4, 21.0, 20.4, 19.3, 18.5, 17.5, 16.5];

/// Zenith sky background in mag/arcsec² for a Bortle class; input is clamped to 1..=9.
pub fn bortle_to_sky_background(bortle: u8) -> f64 {
    let index = bortle.clamp(1, 9) as usize - 1;
    BORTLE_SKY_BACKGROUND[index]
}

/// Relative optical path length (Pickering 2002), 1.0 at the zenith.
///
/// Altitudes at or below zero return [`MAX_AIRMASS`].
pub fn airmass(alt_deg: f64) -> f64 {
    if alt_deg <= 0.0 {
        return MAX_AIRMASS;
    }
    let apparent = alt_deg + 244.0 / (165.0 + 47.0 * alt_deg.powf(1.1));
    (1.0 / apparent.to_radians().sin()).min(MAX_AIRMASS)
}

/// Snapshot of site weather and sky quality.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphericConditions {
    /// Zenith seeing FWHM in arcseconds.
    pub seeing_arcsec: f64,
    /// Zenith V-band extinction in magnitudes per airmass.
    pub extinction_coeff: f64,
    /// Light-pollution class, 1 (pristine) to 9 (inner city).
    pub bortle_scale: u8,
    pub humidity_pct: f64,
    pub temperature_c: f64,
    pub pressure_hpa: f64,
    pub wind_m_s: f64,
    /// Broadband transparency fraction in `[0, 1]`.
    pub transparency: f64,
}

impl Default for AtmosphericConditions {
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

impl AtmosphericConditions {
    /// Fried parameter r₀ at 500 nm in centimetres, from `seeing ≈ 0.98 λ / r₀`.
    pub fn fried_parameter_cm(&self) -> f64 {
        let fwhm_rad = self.seeing_arcsec * 4.848e-6;
        if fwhm_rad > 0.0 {
            0.98 * 5e-7 / fwhm_rad * 100.0
        } else {
            20.0
        }
    }

    /// Zenith sky background for this site's Bortle class.
    pub fn zenith_sky_background(&self) -> f64 {
        bortle_to_sky_background(self.bortle_scale)
    }
}

/// Altitude-dependent atmospheric effects for one set of conditions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtmosphericModel {
    pub conditions: AtmosphericConditions,
}

impl AtmosphericModel {
    pub fn new(conditions: AtmosphericConditions) -> Self {
        Self { conditions }
    }

    pub fn airmass(&self, alt_deg: f64) -> f64 {
        airmass(alt_deg)
    }

    /// Extinction in magnitudes; grows monotonically as altitude drops.
    pub fn extinction_mag(&self, alt_deg: f64) -> f64 {
        self.conditions.extinction_coeff * self.conditions.transparency * airmass(alt_deg)
    }

    /// Magnitude observed after atmospheric extinction.
    pub fn apparent_magnitude(&self, true_mag: f64, alt_deg: f64) -> f64 {
        true_mag + self.extinction_mag(alt_deg)
    }

    /// Seeing FWHM in arcseconds, degraded as `X^0.6` (Kolmogorov turbulence).
    pub fn effective_seeing_arcsec(&self, alt_deg: f64) -> f64 {
        self.conditions.seeing_arcsec * airmass(alt_deg).powf(0.6)
    }

    /// Saemundsson refraction in arcseconds, corrected for temperature and
    /// pressure. Returns 0 below [`REFRACTION_MIN_ALTITUDE_DEG`].
    pub fn refraction_arcsec(&self, apparent_alt_deg: f64) -> f64 {
        if apparent_alt_deg < REFRACTION_MIN_ALTITUDE_DEG {
            return 0.0;
        }
        let factor = (self.conditions.pressure_hpa / 1010.0)
            * (283.0 / (273.0 + self.conditions.temperature_c));
        // arcminutes
        let r = 1.02 / (apparent_alt_deg + 10.3 / (apparent_alt_deg + 5.11)).to_radians().tan();
        (r * factor * 60.0).max(0.0)
    }

    /// Sky background in mag/arcsec², brightened by up to 0.5 mag of airglow
    /// toward the horizon.
    pub fn sky_background(&self, alt_deg: f64) -> f64 {
        let airglow = 0.5 * (1.0 - alt_deg / 90.0);
        self.conditions.zenith_sky_background() - airglow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bortle_lookup_clamps() {
        assert_eq!(bortle_to_sky_background(0), 22.0);
        assert_eq!(bortle_to_sky_background(4), 21.0);
        assert_eq!(bortle_to_sky_background(12), 16.5);
    }

    #[test]
    fn fried_parameter_defaults_when_seeing_is_zero() {
        let mut c = AtmosphericConditions::default();
        c.seeing_arcsec = 0.0;
        assert_eq!(c.fried_parameter_cm(), 20.0);
        c.seeing_arcsec = 1.0;
        approx::assert_relative_eq!(c.fried_parameter_cm(), 10.107, max_relative = 1e-3);
    }
}
