//! HEALPix nested-scheme pixel indexing (Górski et al. 2005).

use std::f64::consts::{FRAC_2_PI, TAU};

/// Number of pixels for a given nside.
pub fn npix(nside: u32) -> u64 {
    12 * u64::from(nside) * u64::from(nside)
}

/// True if `nside` is a positive power of two no larger than 2^29.
pub fn is_valid_nside(nside: u32) -> bool {
    nside.is_power_of_two() && nside <= 1 << 29
}

/// Nested pixel index in `[0, 12·nside²)` for a position in radians.
///
/// `nside` must satisfy [`is_valid_nside`].
pub fn ang2pix_nest(nside: u32, ra: f64, dec: f64) -> u64 {
    let order = nside.trailing_zeros();
    let nside = u64::from(nside);
    let z = dec.sin();
    let mut tt = ra.rem_euclid(TAU) * FRAC_2_PI;
    if tt >= 4.0 {
        tt -= 4.0;
    }
    let (face, ix, iy) = if z.abs() <= 2.0 / 3.0 {
        equatorial_face(tt, z, nside, order)
    } else {
        polar_face(tt, z, nside)
    };
    face * nside * nside + xy2pix_nest(ix, iy, order)
}

fn equatorial_face(tt: f64, z: f64, nside: u64, order: u32) -> (u64, u64, u64) {
    let temp1 = nside as f64 * (0.5 + tt);
    let temp2 = nside as f64 * z * 0.75;
    // Ascending and descending edge-line indices.
    let jp = (temp1 - temp2) as u64;
    let jm = (temp1 + temp2) as u64;
    let ifp = jp >> order;
    let ifm = jm >> order;
    let face = if ifp == ifm {
        ifp | 4
    } else if ifp < ifm {
        ifp
    } else {
        ifm + 8
    };
    let mask = nside - 1;
    (face, jm & mask, nside - (jp & mask) - 1)
}

fn polar_face(tt: f64, z: f64, nside: u64) -> (u64, u64, u64) {
    let ntt = (tt as u64).min(3);
    let tp = tt - ntt as f64;
    let tmp = nside as f64 * (3.0 * (1.0 - z.abs())).sqrt();
    let jp = ((tp * tmp) as u64).min(nside - 1);
    let jm = (((1.0 - tp) * tmp) as u64).min(nside - 1);
    if z >= 0.0 {
        (ntt, nside - jm - 1, nside - jp - 1)
    } else {
        (ntt + 8, jp, jm)
    }
}

/// Interleave face coordinates into a Z-order index.
fn xy2pix_nest(ix: u64, iy: u64, order: u32) -> u64 {
    let mut result = 0u64;
    for i in 0..order {
        result |= ((ix >> i) & 1) << (2 * i) | ((iy >> i) & 1) << (2 * i + 1);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_order_interleaving() {
        assert_eq!(xy2pix_nest(0, 0, 2), 0);
        assert_eq!(xy2pix_nest(1, 0, 2), 1);
        assert_eq!(xy2pix_nest(0, 1, 2), 2);
        assert_eq!(xy2pix_nest(3, 3, 2), 15);
    }

    #[test]
    fn base_faces_at_order_zero() {
        // North cap faces 0..4, equatorial 4..8, south cap 8..12.
        assert!(ang2pix_nest(1, 0.5, 1.4) < 4);
        let eq = ang2pix_nest(1, 0.1, 0.0);
        assert!((4..8).contains(&eq), "equatorial pixel {eq}");
        assert!(ang2pix_nest(1, 0.5, -1.4) >= 8);
    }

    #[test]
    fn matches_reference_pixels() {
        // (nside, ra_deg, dec_deg, nested pixel) from healpix_base loc2pix.
        let cases: [(u32, f64, f64, u64); 12] = [
            (1, 271.7, -40.0, 11),
            (1, 0.0, 0.0, 4),
            (1, 45.0, 60.0, 0),
            (1, 300.0, -80.0, 11),
            (1, 330.0, 0.0, 4),
            (2, 200.0, 30.0, 10),
            (2, 120.0, -50.0, 38),
            (4, 10.0, 5.0, 70),
            (4, 271.7, -40.0, 186),
            (16, 350.0, -20.0, 1062),
            (128, 0.0, 90.0, 16383),
            (128, 200.0, -89.9, 163840),
        ];
        for (nside, ra_deg, dec_deg, expected) in cases {
            let pix = ang2pix_nest(nside, ra_deg.to_radians(), dec_deg.to_radians());
            assert_eq!(pix, expected, "nside {nside} ({ra_deg}, {dec_deg})");
        }
    }

    #[test]
    fn pixels_stay_in_range() {
        for nside in [1u32, 2, 16, 256] {
            for ra_deg in [0.0f64, 45.0, 179.9, 270.0, 359.999] {
                for dec_deg in [-90.0f64, -60.0, -10.0, 0.0, 41.8, 89.0, 90.0] {
                    let pix = ang2pix_nest(nside, ra_deg.to_radians(), dec_deg.to_radians());
                    assert!(pix < npix(nside), "nside {nside} ({ra_deg}, {dec_deg}) -> {pix}");
                }
            }
        }
    }
}
