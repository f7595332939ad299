//! Equatorial, horizontal, and screen-plane coordinate transforms.
//!
//! All angles are radians unless a name says otherwise. Azimuth is measured
//! from north through east (east = +π/2).

use std::f64::consts::FRAC_PI_2;

use parallax_core::angle::normalize_radians;

pub mod projection;
pub mod transform;

pub use projection::{DEFAULT_MARGIN_FACTOR, ScreenPoint, ScreenProjection, horizontal_to_screen};
pub use transform::{
    angular_separation, equatorial_to_horizontal, hour_angle, horizontal_to_equatorial,
};

/// Right ascension / declination pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialCoord {
    /// Right ascension in `[0, 2π)`.
    pub ra: f64,
    /// Declination in `[-π/2, π/2]`.
    pub dec: f64,
}

impl EquatorialCoord {
    /// Build a coordinate, wrapping RA and clamping Dec into range.
    pub fn new(ra: f64, dec: f64) -> Self {
        Self {
            ra: normalize_radians(ra),
            dec: dec.clamp(-FRAC_PI_2, FRAC_PI_2),
        }
    }

    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self::new(ra_deg.to_radians(), dec_deg.to_radians())
    }

    pub fn ra_deg(&self) -> f64 {
        self.ra.to_degrees()
    }

    pub fn dec_deg(&self) -> f64 {
        self.dec.to_degrees()
    }
}

/// Altitude / azimuth pair for one observation instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoord {
    /// Altitude above the horizon; negative below it.
    pub alt: f64,
    /// Azimuth in `[0, 2π)`, north = 0, east = π/2.
    pub az: f64,
}

impl HorizontalCoord {
    pub fn new(alt: f64, az: f64) -> Self {
        Self {
            alt: alt.clamp(-FRAC_PI_2, FRAC_PI_2),
            az: normalize_radians(az),
        }
    }

    pub fn from_degrees(alt_deg: f64, az_deg: f64) -> Self {
        Self::new(alt_deg.to_radians(), az_deg.to_radians())
    }

    pub fn alt_deg(&self) -> f64 {
        self.alt.to_degrees()
    }

    pub fn az_deg(&self) -> f64 {
        self.az.to_degrees()
    }
}

/// Geographic position of an observer (east-positive longitude).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl ObserverLocation {
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude: latitude_deg.to_radians(),
            longitude: longitude_deg.to_radians(),
        }
    }
}
