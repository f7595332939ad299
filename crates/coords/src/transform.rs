//! Spherical-triangle transforms between the equatorial and horizontal frames.

use parallax_core::angle::normalize_radians;
use parallax_core::vector::{separation, unit_from_spherical};

use crate::{EquatorialCoord, HorizontalCoord, ObserverLocation};

/// Hour angle `lst − ra`, wrapped into `[0, 2π)`.
pub fn hour_angle(lst: f64, ra: f64) -> f64 {
    normalize_radians(lst - ra)
}

/// Convert equatorial coordinates to altitude/azimuth for a local sidereal time.
pub fn equatorial_to_horizontal(
    eq: &EquatorialCoord,
    observer: &ObserverLocation,
    lst: f64,
) -> HorizontalCoord {
    let h = lst - eq.ra;
    let (sin_dec, cos_dec) = eq.dec.sin_cos();
    let (sin_lat, cos_lat) = observer.latitude.sin_cos();
    let (sin_h, cos_h) = h.sin_cos();

    let sin_alt = sin_dec * sin_lat + cos_dec * cos_lat * cos_h;
    let alt = sin_alt.clamp(-1.0, 1.0).asin();

    let az_y = -cos_dec * sin_h;
    let az_x = sin_dec * cos_lat - cos_dec * sin_lat * cos_h;
    let az = normalize_radians(az_y.atan2(az_x));

    HorizontalCoord { alt, az }
}

/// Inverse of [`equatorial_to_horizontal`]: the same identities with
/// altitude/azimuth in place of declination/hour angle.
pub fn horizontal_to_equatorial(
    hz: &HorizontalCoord,
    observer: &ObserverLocation,
    lst: f64,
) -> EquatorialCoord {
    let (sin_alt, cos_alt) = hz.alt.sin_cos();
    let (sin_az, cos_az) = hz.az.sin_cos();
    let (sin_lat, cos_lat) = observer.latitude.sin_cos();

    let sin_dec = sin_alt * sin_lat + cos_alt * cos_lat * cos_az;
    let dec = sin_dec.clamp(-1.0, 1.0).asin();

    let h_y = -cos_alt * sin_az;
    let h_x = sin_alt * cos_lat - cos_alt * sin_lat * cos_az;
    let h = h_y.atan2(h_x);

    EquatorialCoord {
        ra: normalize_radians(lst - h),
        dec,
    }
}

/// Great-circle separation between two equatorial positions, in radians.
pub fn angular_separation(a: &EquatorialCoord, b: &EquatorialCoord) -> f64 {
    separation(
        &unit_from_spherical(a.ra, a.dec),
        &unit_from_spherical(b.ra, b.dec),
    )
}
