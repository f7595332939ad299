//! Arena-backed star storage with a 1° (RA, Dec) grid index.

use std::collections::HashMap;

use parallax_coords::{EquatorialCoord, angular_separation};

use crate::star::Star;

/// Grid resolution in degrees per cell.
pub const GRID_RESOLUTION_DEG: f64 = 1.0;
const RA_CELLS: i64 = 360;
const DEC_CELLS: i64 = 180;

/// Magnitude ceiling that admits every star.
pub const NO_MAGNITUDE_LIMIT: f64 = 99.0;

type CellKey = (u16, u16);

/// In-memory star catalog answering cone + magnitude queries.
///
/// Stars live in a contiguous arena; grid buckets hold arena indices. Each
/// star is bucketed once, by its position at insertion time.
#[derive(Debug, Clone, Default)]
pub struct SpatialCatalog {
    stars: Vec<Star>,
    grid: HashMap<CellKey, Vec<usize>>,
}

impl SpatialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stars(stars: Vec<Star>) -> Self {
        let mut catalog = Self {
            stars,
            grid: HashMap::new(),
        };
        catalog.rebuild_grid();
        catalog
    }

    /// Append a star and return its arena index.
    pub fn add_star(&mut self, star: Star) -> usize {
        let index = self.stars.len();
        self.grid
            .entry(cell_for(&star.position))
            .or_default()
            .push(index);
        self.stars.push(star);
        index
    }

    pub fn extend<I: IntoIterator<Item = Star>>(&mut self, stars: I) {
        for star in stars {
            self.add_star(star);
        }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn get(&self, index: usize) -> Option<&Star> {
        self.stars.get(index)
    }

    pub fn find_by_id(&self, id: u64) -> Option<&Star> {
        self.stars.iter().find(|s| s.id == id)
    }

    /// First star whose name matches, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&Star> {
        self.stars.iter().find(|s| {
            s.name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }

    /// Re-bucket every star from its current position.
    pub fn rebuild_grid(&mut self) {
        self.grid.clear();
        for (index, star) in self.stars.iter().enumerate() {
            self.grid
                .entry(cell_for(&star.position))
                .or_default()
                .push(index);
        }
    }

    /// Stars within `radius_deg` of `center` and no fainter than `mag_limit`,
    /// brightest first.
    ///
    /// The grid is only a coarse pre-filter; every result is checked against
    /// the exact great-circle separation.
    pub fn query(&self, center: &EquatorialCoord, radius_deg: f64, mag_limit: f64) -> Vec<&Star> {
        if radius_deg < 0.0 || self.stars.is_empty() {
            return Vec::new();
        }
        let radius_rad = radius_deg.to_radians();
        let mut result: Vec<&Star> = Vec::new();

        for key in cells_in_cone(center, radius_deg) {
            let Some(bucket) = self.grid.get(&key) else {
                continue;
            };
            for &index in bucket {
                let star = &self.stars[index];
                if star.v_magnitude > mag_limit {
                    continue;
                }
                if angular_separation(center, &star.position) <= radius_rad {
                    result.push(star);
                }
            }
        }

        result.sort_by(|a, b| a.v_magnitude.total_cmp(&b.v_magnitude));
        result
    }
}

fn cell_for(position: &EquatorialCoord) -> CellKey {
    let ra = (position.ra_deg() / GRID_RESOLUTION_DEG).floor() as i64;
    let dec = ((position.dec_deg() + 90.0) / GRID_RESOLUTION_DEG).floor() as i64;
    (
        ra.rem_euclid(RA_CELLS) as u16,
        dec.clamp(0, DEC_CELLS - 1) as u16,
    )
}

/// Every grid cell overlapping the cone's bounding box, each exactly once.
///
/// The RA half-width is `radius / cos(max |dec|)` over the box, which bounds
/// the RA extent of a spherical cap; a box touching a pole covers all RA.
fn cells_in_cone(center: &EquatorialCoord, radius_deg: f64) -> Vec<CellKey> {
    let dec_lo = center.dec_deg() - radius_deg;
    let dec_hi = center.dec_deg() + radius_deg;
    let dec_cell_lo = (((dec_lo + 90.0) / GRID_RESOLUTION_DEG).floor() as i64).clamp(0, DEC_CELLS - 1);
    let dec_cell_hi = (((dec_hi + 90.0) / GRID_RESOLUTION_DEG).floor() as i64).clamp(0, DEC_CELLS - 1);

    let ra_cells: Vec<i64> = if dec_lo <= -90.0 || dec_hi >= 90.0 {
        (0..RA_CELLS).collect()
    } else {
        let max_abs_dec = dec_lo.abs().max(dec_hi.abs());
        let half_width = radius_deg / max_abs_dec.to_radians().cos() + 1e-9;
        let ra = center.ra_deg();
        let lo = ((ra - half_width) / GRID_RESOLUTION_DEG).floor() as i64;
        let hi = ((ra + half_width) / GRID_RESOLUTION_DEG).floor() as i64;
        if hi - lo + 1 >= RA_CELLS {
            (0..RA_CELLS).collect()
        } else {
            (lo..=hi).map(|c| c.rem_euclid(RA_CELLS)).collect()
        }
    };

    let mut keys = Vec::with_capacity(ra_cells.len() * (dec_cell_hi - dec_cell_lo + 1) as usize);
    for dec in dec_cell_lo..=dec_cell_hi {
        for &ra in &ra_cells {
            keys.push((ra as u16, dec as u16));
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_unique_near_wrap_and_pole() {
        for (ra, dec, r) in [(359.5, 0.0, 3.0), (0.2, 88.5, 2.0), (180.0, -89.9, 0.5)] {
            let keys = cells_in_cone(&EquatorialCoord::from_degrees(ra, dec), r);
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), keys.len(), "duplicate cells for ({ra}, {dec}, {r})");
        }
    }

    #[test]
    fn north_pole_star_is_bucketed_in_top_row() {
        let (_, dec) = cell_for(&EquatorialCoord::from_degrees(10.0, 90.0));
        assert_eq!(dec as i64, DEC_CELLS - 1);
    }
}
