//! Bright-star reference table bundled with the library.

use parallax_coords::EquatorialCoord;

use crate::spatial::SpatialCatalog;
use crate::star::{SpectralClass, Star};

struct Entry {
    hip: u64,
    name: &'static str,
    ra_deg: f64,
    dec_deg: f64,
    distance_pc: f64,
    v_mag: f64,
    class: SpectralClass,
}

const fn entry(
    hip: u64,
    name: &'static str,
    ra_deg: f64,
    dec_deg: f64,
    distance_pc: f64,
    v_mag: f64,
    class: SpectralClass,
) -> Entry {
    Entry {
        hip,
        name,
        ra_deg,
        dec_deg,
        distance_pc,
        v_mag,
        class,
    }
}

use SpectralClass::{A, B, F, G, K, M};

const BRIGHT_STARS: [Entry; 24] = [
    entry(87937, "Barnard's Star", 269.452, 4.693, 1.83, 9.54, M),
    entry(32349, "Sirius", 101.287, -16.716, 2.64, -1.46, A),
    entry(70890, "Proxima Centauri", 217.429, -62.679, 1.30, 11.13, M),
    entry(71683, "Alpha Centauri A", 219.902, -60.834, 1.34, -0.01, G),
    entry(71681, "Alpha Centauri B", 219.902, -60.834, 1.34, 1.33, K),
    entry(24436, "Rigel", 78.634, -8.202, 264.0, 0.18, B),
    entry(27989, "Betelgeuse", 88.793, 7.407, 197.0, 0.42, M),
    entry(49669, "Regulus", 152.093, 11.967, 77.5, 1.35, B),
    entry(65474, "Spica", 201.298, -11.161, 250.0, 0.97, B),
    entry(69673, "Arcturus", 213.915, 19.182, 11.3, -0.05, K),
    entry(91262, "Vega", 279.235, 38.784, 7.68, 0.03, A),
    entry(97649, "Altair", 297.696, 8.868, 5.13, 0.76, A),
    entry(113368, "Fomalhaut", 344.413, -29.622, 7.69, 1.16, A),
    entry(11767, "Polaris", 37.954, 89.264, 133.0, 1.97, F),
    entry(80763, "Antares", 247.352, -26.432, 170.0, 1.06, M),
    entry(37279, "Procyon", 114.827, 5.225, 3.51, 0.34, F),
    entry(30438, "Canopus", 95.988, -52.696, 310.0, -0.72, A),
    entry(9884, "Achernar", 24.429, -57.237, 44.0, 0.46, B),
    entry(68702, "Hadar", 210.956, -60.373, 161.0, 0.61, B),
    entry(60718, "Acrux", 186.650, -63.099, 321.0, 0.76, B),
    entry(25336, "Aldebaran", 68.980, 16.509, 20.0, 0.87, K),
    entry(36850, "Castor", 113.650, 31.889, 15.6, 1.58, A),
    entry(37826, "Pollux", 116.329, 28.026, 10.3, 1.14, K),
    entry(102098, "Deneb", 310.358, 45.280, 802.0, 1.25, A),
];

/// Number of stars in the built-in table.
pub const BUILTIN_STAR_COUNT: usize = BRIGHT_STARS.len();

impl SpatialCatalog {
    /// Catalog of 24 well-known bright and nearby stars, keyed by Hipparcos number.
    pub fn builtin() -> Self {
        let stars = BRIGHT_STARS.iter().map(|e| {
            Star::new(e.hip, EquatorialCoord::from_degrees(e.ra_deg, e.dec_deg), e.v_mag)
                .with_name(e.name)
                .with_spectral_class(e.class)
                .with_distance(e.distance_pc)
        });
        let mut catalog = SpatialCatalog::new();
        catalog.extend(stars);
        catalog
    }
}
