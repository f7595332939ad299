//! Kroupa (2001) initial mass function and mass-to-class mapping.

use parallax_catalog::SpectralClass;

use crate::rng::PcgRng;

const MASS_MIN: f64 = 0.1;
const MASS_BREAK: f64 = 0.5;
const MASS_MAX: f64 = 150.0;
const ALPHA_LOW: f64 = 1.3;
const ALPHA_HIGH: f64 = 2.3;

fn segment_weight(lo: f64, hi: f64, alpha: f64) -> f64 {
    (hi.powf(1.0 - alpha) - lo.powf(1.0 - alpha)) / (1.0 - alpha)
}

fn inverse_cdf(lo: f64, hi: f64, alpha: f64, u: f64) -> f64 {
    let base = lo.powf(1.0 - alpha);
    let top = hi.powf(1.0 - alpha);
    (base + u * (top - base)).powf(1.0 / (1.0 - alpha))
}

/// Stellar mass in solar masses from the two-segment broken power law,
/// consuming exactly two draws.
pub fn sample_kroupa_mass(rng: &mut PcgRng) -> f64 {
    let w_low = segment_weight(MASS_MIN, MASS_BREAK, ALPHA_LOW);
    let w_high = segment_weight(MASS_BREAK, MASS_MAX, ALPHA_HIGH);
    let low_fraction = w_low / (w_low + w_high);

    let u = rng.next_f64();
    let v = rng.next_f64();
    if u < low_fraction {
        inverse_cdf(MASS_MIN, MASS_BREAK, ALPHA_LOW, v)
    } else {
        inverse_cdf(MASS_BREAK, MASS_MAX, ALPHA_HIGH, v)
    }
}

/// Main-sequence spectral class for a mass in solar masses.
pub fn spectral_class_from_mass(mass: f64) -> SpectralClass {
    match mass {
        m if m >= 16.0 => SpectralClass::O,
        m if m >= 2.1 => SpectralClass::B,
        m if m >= 1.4 => SpectralClass::A,
        m if m >= 1.04 => SpectralClass::F,
        m if m >= 0.8 => SpectralClass::G,
        m if m >= 0.45 => SpectralClass::K,
        m if m >= 0.08 => SpectralClass::M,
        _ => SpectralClass::L,
    }
}
