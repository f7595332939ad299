//! Meeus Julian Date conversions (Astronomical Algorithms, ch. 7).

use parallax_core::constants::{DAYS_PER_JULIAN_CENTURY, J2000_JD, SECONDS_PER_DAY};

use crate::CivilDateTime;

/// First Julian Day number of the Gregorian calendar (1582-10-15).
const GREGORIAN_START_JDN: i64 = 2_299_161;

/// Julian Date for a civil UTC date/time.
///
/// January and February count as months 13 and 14 of the previous year,
/// and the Gregorian leap correction is always applied.
pub fn to_julian_date(dt: &CivilDateTime) -> f64 {
    let (mut y, mut m) = (dt.year as i64, dt.month as i64);
    if m <= 2 {
        y -= 1;
        m += 12;
    }
    let a = y.div_euclid(100);
    let b = 2 - a + a.div_euclid(4);

    (365.25 * (y + 4716) as f64).floor()
        + (30.6001 * (m + 1) as f64).floor()
        + dt.day as f64
        + dt.day_fraction()
        + b as f64
        - 1524.5
}

/// Civil UTC date/time for a Julian Date; inverse of [`to_julian_date`].
pub fn from_julian_date(jd: f64) -> CivilDateTime {
    let shifted = jd + 0.5;
    let z = shifted.floor() as i64;
    let f = shifted - z as f64;

    let a = if z >= GREGORIAN_START_JDN {
        let alpha = ((z as f64 - 1_867_216.25) / 36_524.25).floor() as i64;
        z + 1 + alpha - alpha.div_euclid(4)
    } else {
        z
    };
    let b = a + 1524;
    let c = ((b as f64 - 122.1) / 365.25).floor() as i64;
    let d = (365.25 * c as f64).floor() as i64;
    let e = ((b - d) as f64 / 30.6001).floor() as i64;

    let day_with_fraction = (b - d) as f64 - (30.6001 * e as f64).floor() + f;
    let day = day_with_fraction.floor();
    let month = if e < 14 { e - 1 } else { e - 13 };
    let year = if month > 2 { c - 4716 } else { c - 4715 };

    // Millisecond rounding keeps x:59.9999 from displaying as x:60.
    let day_seconds = (((day_with_fraction - day) * SECONDS_PER_DAY * 1_000.0).round() / 1_000.0)
        .min(SECONDS_PER_DAY - 0.001);
    let hour = (day_seconds / 3_600.0).floor();
    let minute = ((day_seconds - hour * 3_600.0) / 60.0).floor();
    let second = (day_seconds - hour * 3_600.0 - minute * 60.0).max(0.0);

    CivilDateTime {
        year: year as i32,
        month: month as u32,
        day: day as u32,
        hour: hour as u32,
        minute: minute as u32,
        second,
    }
}

/// Julian centuries elapsed since J2000.0.
#[inline]
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}
