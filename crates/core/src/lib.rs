//! Core units, constants, and shared primitives for the Parallax workspace.

/// Astronomical constants shared across crates.
pub mod constants {
    /// Julian Date of the J2000.0 epoch (2000-01-01 12:00 UTC).
    pub const J2000_JD: f64 = 2_451_545.0;
    /// Julian Date of the Unix epoch (1970-01-01 00:00 UTC).
    pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
    /// Days per Julian century.
    pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Hours per day.
    pub const HOURS_PER_DAY: f64 = 24.0;
    /// Arcseconds per radian.
    pub const ARCSEC_PER_RADIAN: f64 = 206_264.806_247_096_36;
    /// Earth radius expressed in solar radii.
    pub const EARTH_TO_SOLAR_RADIUS: f64 = 0.00916;
}

/// Angle unit conversion helpers.
pub mod units {
    use super::constants::ARCSEC_PER_RADIAN;

    /// Convert arcseconds to radians.
    #[inline]
    pub fn arcsec_to_rad(v: f64) -> f64 {
        v / ARCSEC_PER_RADIAN
    }

    /// Convert radians to arcseconds.
    #[inline]
    pub fn rad_to_arcsec(v: f64) -> f64 {
        v * ARCSEC_PER_RADIAN
    }

    /// Convert milliarcseconds to arcseconds.
    #[inline]
    pub fn mas_to_arcsec(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert arcseconds to milliarcseconds.
    #[inline]
    pub fn arcsec_to_mas(v: f64) -> f64 {
        v * 1_000.0
    }
}

/// Angle normalization.
pub mod angle {
    use std::f64::consts::TAU;

    /// Wrap an angle into `[0, 2π)`.
    ///
    /// `rem_euclid` can round a tiny negative input up to exactly `2π`;
    /// that case folds back to zero so the upper bound is never returned.
    #[inline]
    pub fn normalize_radians(angle: f64) -> f64 {
        let wrapped = angle.rem_euclid(TAU);
        if wrapped >= TAU { 0.0 } else { wrapped }
    }

    /// Wrap an angle into `[0, 360)`.
    #[inline]
    pub fn normalize_degrees(angle: f64) -> f64 {
        let wrapped = angle.rem_euclid(360.0);
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn tiny_negative_never_maps_to_full_turn() {
            let v = normalize_radians(-1e-18);
            assert!(v >= 0.0 && v < TAU, "got {v}");
            let d = normalize_degrees(-1e-15);
            assert!(d >= 0.0 && d < 360.0, "got {d}");
        }

        #[test]
        fn wraps_multiple_turns() {
            approx::assert_abs_diff_eq!(normalize_degrees(725.0), 5.0, epsilon = 1e-12);
            approx::assert_abs_diff_eq!(normalize_radians(-TAU - 1.0), TAU - 1.0, epsilon = 1e-12);
        }
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{HOURS_PER_DAY, SECONDS_PER_DAY};

    /// Convert hours to days.
    #[inline]
    pub fn hours_to_days(hours: f64) -> f64 {
        hours / HOURS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }
}

/// Minimal vector helpers for unit-sphere work.
pub mod vector {
    /// Alias for a 3D Cartesian vector.
    pub type Vector3 = [f64; 3];

    /// Unit vector for a longitude/latitude pair in radians.
    #[inline]
    pub fn unit_from_spherical(lon: f64, lat: f64) -> Vector3 {
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
    }

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Angle between two unit vectors, robust to rounding past ±1.
    #[inline]
    pub fn separation(a: &Vector3, b: &Vector3) -> f64 {
        dot(a, b).clamp(-1.0, 1.0).acos()
    }
}
