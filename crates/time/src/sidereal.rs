//! Greenwich and local mean sidereal time (IAU 1982 polynomial).

use parallax_core::angle::{normalize_degrees, normalize_radians};
use parallax_core::constants::J2000_JD;

use crate::julian::julian_centuries;

/// Greenwich Mean Sidereal Time in radians, in `[0, 2π)`.
///
/// GMST(deg) = 280.46061837 + 360.98564736629·d + 0.000387933·T² − T³/38710000
/// with `d` days and `T` Julian centuries since J2000.0.
pub fn gmst(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    let d = jd - J2000_JD;
    let degrees =
        280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t - t * t * t / 38_710_000.0;
    normalize_radians(normalize_degrees(degrees).to_radians())
}

/// Local Mean Sidereal Time in radians for an east-positive longitude in radians.
pub fn lmst(jd: f64, longitude: f64) -> f64 {
    normalize_radians(gmst(jd) + longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn gmst_at_j2000() {
        let deg = gmst(J2000_JD).to_degrees();
        assert!((deg - 280.46).abs() < 0.01, "GMST at J2000 = {deg}");
    }

    #[test]
    fn lmst_stays_in_range() {
        for i in 0..200 {
            let jd = 2_400_000.0 + i as f64 * 1_234.567;
            for lon in [-3.0, -1.0, 0.0, 2.5, 6.0] {
                let v = lmst(jd, lon);
                assert!((0.0..TAU).contains(&v), "lmst({jd}, {lon}) = {v}");
            }
        }
    }
}
