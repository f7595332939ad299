//! Telescope and detector models.

use std::f64::consts::PI;

use parallax_core::units::rad_to_arcsec;
use thiserror::Error;

/// Photons s⁻¹ m⁻² from a V = 0 source in the V band.
pub const V_ZERO_POINT_PHOTONS: f64 = 3.63e10;
/// Reference wavelength for diffraction, in nanometres.
pub const DEFAULT_WAVELENGTH_NM: f64 = 550.0;
/// Sky background assumed when none is supplied (mag/arcsec²).
pub const DEFAULT_SKY_BACKGROUND: f64 = 21.0;
/// Seeing assumed when none is supplied (arcsec).
pub const DEFAULT_SEEING_ARCSEC: f64 = 2.0;
/// SNR defining the limiting magnitude.
pub const LIMITING_SNR: f64 = 5.0;

const LIMIT_SEARCH_MIN_MAG: f64 = 1.0;
const LIMIT_SEARCH_MAX_MAG: f64 = 30.0;
const LIMIT_SEARCH_ITERATIONS: usize = 64;

/// Invalid optical or detector parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TelescopeError {
    #[error("aperture must be positive (got {0} mm)")]
    InvalidAperture(f64),
    #[error("focal length must be positive (got {0} mm)")]
    InvalidFocalLength(f64),
    #[error("central obstruction must lie in [0, 1) (got {0})")]
    InvalidObstruction(f64),
    #[error("{field} must lie in (0, 1] (got {value})")]
    InvalidFraction { field: &'static str, value: f64 },
    #[error("detector geometry must be positive")]
    InvalidDetector,
}

/// Imaging sensor characteristics.
#[derive(Debug, Clone, PartialEq)]
pub struct Detector {
    pub name: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_size_um: f64,
    /// Read noise, electrons RMS.
    pub read_noise_e: f64,
    /// Dark current, electrons per second per pixel.
    pub dark_current_e_s: f64,
    pub quantum_efficiency: f64,
    pub bit_depth: u8,
    /// Electrons per ADU.
    pub gain: f64,
    pub is_cooled: bool,
}

impl Default for Detector {
    fn default() -> Self {
        Self {
            name: "Generic CCD".to_string(),
            pixel_width: 2048,
            pixel_height: 2048,
            pixel_size_um: 9.0,
            read_noise_e: 5.0,
            dark_current_e_s: 0.002,
            quantum_efficiency: 0.85,
            bit_depth: 16,
            gain: 1.0,
            is_cooled: true,
        }
    }
}

/// Optical tube plus detector. All derived quantities are pure functions
/// of these fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Telescope {
    pub name: String,
    pub aperture_mm: f64,
    pub focal_length_mm: f64,
    /// Obstruction diameter as a fraction of the aperture.
    pub central_obstruction: f64,
    /// Combined mirror/lens throughput.
    pub reflectivity: f64,
    pub detector: Detector,
}

impl Default for Telescope {
    fn default() -> Self {
        Self::generic_refractor()
    }
}

impl Telescope {
    /// 100 mm f/10 refractor with a generic CCD.
    pub fn generic_refractor() -> Self {
        Self {
            name: "Generic Refractor".to_string(),
            aperture_mm: 100.0,
            focal_length_mm: 1000.0,
            central_obstruction: 0.0,
            reflectivity: 1.0,
            detector: Detector::default(),
        }
    }

    /// Amateur 8" Schmidt-Cassegrain with a monochrome CMOS camera.
    pub fn sct_8inch() -> Self {
        Self {
            name: "8\" Schmidt-Cassegrain".to_string(),
            aperture_mm: 203.2,
            focal_length_mm: 2032.0,
            central_obstruction: 0.34,
            reflectivity: 0.88,
            detector: Detector {
                name: "Monochrome CMOS".to_string(),
                pixel_width: 3096,
                pixel_height: 2080,
                pixel_size_um: 6.45,
                read_noise_e: 3.5,
                dark_current_e_s: 0.001,
                quantum_efficiency: 0.90,
                bit_depth: 12,
                gain: 0.5,
                is_cooled: true,
            },
        }
    }

    /// Professional 1 m f/8 reflector with a cooled scientific CCD.
    pub fn reflector_1m() -> Self {
        Self {
            name: "1-metre Research Reflector".to_string(),
            aperture_mm: 1000.0,
            focal_length_mm: 8000.0,
            central_obstruction: 0.20,
            reflectivity: 0.85,
            detector: Detector {
                name: "Cooled Scientific CCD".to_string(),
                pixel_width: 4096,
                pixel_height: 4096,
                pixel_size_um: 13.5,
                read_noise_e: 4.0,
                dark_current_e_s: 0.0005,
                quantum_efficiency: 0.95,
                bit_depth: 16,
                gain: 1.1,
                is_cooled: true,
            },
        }
    }

    /// Every built-in instrument.
    pub fn presets() -> Vec<Telescope> {
        vec![Self::generic_refractor(), Self::sct_8inch(), Self::reflector_1m()]
    }

    /// Check that the parameters describe a physical instrument.
    pub fn validate(&self) -> Result<(), TelescopeError> {
        if !(self.aperture_mm > 0.0) {
            return Err(TelescopeError::InvalidAperture(self.aperture_mm));
        }
        if !(self.focal_length_mm > 0.0) {
            return Err(TelescopeError::InvalidFocalLength(self.focal_length_mm));
        }
        if !(0.0..1.0).contains(&self.central_obstruction) {
            return Err(TelescopeError::InvalidObstruction(self.central_obstruction));
        }
        for (field, value) in [
            ("reflectivity", self.reflectivity),
            ("quantum efficiency", self.detector.quantum_efficiency),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(TelescopeError::InvalidFraction { field, value });
            }
        }
        if self.detector.pixel_width == 0
            || self.detector.pixel_height == 0
            || !(self.detector.pixel_size_um > 0.0)
        {
            return Err(TelescopeError::InvalidDetector);
        }
        Ok(())
    }

    pub fn f_ratio(&self) -> f64 {
        self.focal_length_mm / self.aperture_mm
    }

    /// Plate scale in arcseconds per pixel.
    pub fn pixel_scale_arcsec(&self) -> f64 {
        self.detector.pixel_size_um / self.focal_length_mm * 206.265
    }

    /// Sensor field of view `(width, height)` in degrees.
    pub fn field_of_view_deg(&self) -> (f64, f64) {
        let scale = self.pixel_scale_arcsec();
        (
            scale * f64::from(self.detector.pixel_width) / 3600.0,
            scale * f64::from(self.detector.pixel_height) / 3600.0,
        )
    }

    /// Rayleigh limit at 550 nm, in arcseconds.
    pub fn diffraction_limit_arcsec(&self) -> f64 {
        self.diffraction_limit_arcsec_at(DEFAULT_WAVELENGTH_NM)
    }

    /// Rayleigh limit `1.22 λ / D` in arcseconds.
    pub fn diffraction_limit_arcsec_at(&self, wavelength_nm: f64) -> f64 {
        rad_to_arcsec(1.22 * (wavelength_nm * 1e-9) / (self.aperture_mm * 1e-3))
    }

    /// Clear collecting area in cm², net of the central obstruction.
    pub fn collecting_area_cm2(&self) -> f64 {
        let d = self.aperture_mm / 10.0;
        let obstruction = d * self.central_obstruction;
        PI / 4.0 * (d * d - obstruction * obstruction)
    }

    /// Detected photo-electrons from a source of magnitude `v_magnitude`.
    pub fn photon_flux(&self, v_magnitude: f64, exposure_s: f64) -> f64 {
        let area_m2 = self.collecting_area_cm2() * 1e-4;
        V_ZERO_POINT_PHOTONS
            * 10f64.powf(-0.4 * v_magnitude)
            * area_m2
            * self.detector.quantum_efficiency
            * self.reflectivity
            * exposure_s
    }

    /// Point-source SNR with sky, read, and dark noise summed in quadrature
    /// over the PSF footprint.
    ///
    /// The PSF FWHM is the larger of seeing and the diffraction limit; its
    /// footprint is the Gaussian area `π/(4 ln 2)·FWHM²`, at least one pixel.
    pub fn snr(&self, v_magnitude: f64, exposure_s: f64, sky_bg_mag: f64, seeing_arcsec: f64) -> f64 {
        let signal = self.photon_flux(v_magnitude, exposure_s);

        let fwhm = seeing_arcsec.max(self.diffraction_limit_arcsec());
        let psf_area_arcsec2 = PI / (4.0 * std::f64::consts::LN_2) * fwhm * fwhm;
        let scale = self.pixel_scale_arcsec();
        let psf_pixels = (psf_area_arcsec2 / (scale * scale)).max(1.0);

        let sky_noise_sq = self.photon_flux(sky_bg_mag, exposure_s) * psf_area_arcsec2;
        let read_noise = self.detector.read_noise_e * psf_pixels.sqrt();
        let dark_noise_sq = self.detector.dark_current_e_s * exposure_s * psf_pixels;

        let noise = (signal + sky_noise_sq + read_noise * read_noise + dark_noise_sq).sqrt();
        if noise > 0.0 { signal / noise } else { 0.0 }
    }

    /// Faintest magnitude reaching SNR 5, by bisection over [1, 30] mag.
    pub fn limiting_magnitude(&self, exposure_s: f64, sky_bg_mag: f64, seeing_arcsec: f64) -> f64 {
        let (mut lo, mut hi) = (LIMIT_SEARCH_MIN_MAG, LIMIT_SEARCH_MAX_MAG);
        for _ in 0..LIMIT_SEARCH_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.snr(mid, exposure_s, sky_bg_mag, seeing_arcsec) >= LIMITING_SNR {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for scope in Telescope::presets() {
            scope.validate().unwrap_or_else(|e| panic!("{}: {e}", scope.name));
        }
    }

    #[test]
    fn validation_rejects_bad_optics() {
        let mut scope = Telescope::generic_refractor();
        scope.central_obstruction = 1.0;
        assert!(matches!(scope.validate(), Err(TelescopeError::InvalidObstruction(_))));
        scope.central_obstruction = 0.0;
        scope.aperture_mm = 0.0;
        assert!(matches!(scope.validate(), Err(TelescopeError::InvalidAperture(_))));
    }
}
