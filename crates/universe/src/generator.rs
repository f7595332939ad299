//! Tile-based procedural star fields.

use parallax_catalog::{SpectralClass, Star, distance_modulus};
use parallax_coords::EquatorialCoord;

use crate::imf::{sample_kroupa_mass, spectral_class_from_mass};
use crate::rng::PcgRng;

/// Faintest apparent magnitude kept by default.
pub const DEFAULT_MAG_LIMIT: f64 = 12.0;
/// Default tile edge length in degrees.
pub const DEFAULT_TILE_SIZE_DEG: f64 = 4.0;

const RA_MIX: u64 = 6_364_136_223_846_793_005;
const DEC_MIX: u64 = 1_442_695_040_888_963_407;
const TILE_INDEX_OFFSET: i64 = 0xFFFF;
const TILE_ID_OFFSET: i64 = 0x8000;
/// Id stride between tiles, and so the most stars one tile may hold.
pub const IDS_PER_TILE: u64 = 1_000_000;
const MIN_DISTANCE_PC: f64 = 10.0;
const MAX_DISTANCE_PC: f64 = 5_000.0;

/// Integer tile coordinates: `floor(ra_deg / size)`, `floor(dec_deg / size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    pub ra: i32,
    pub dec: i32,
}

/// Expected stars per square degree down to V≈12, peaking on a rough
/// galactic-plane proxy at Dec −28°.
pub fn stellar_density(dec_deg: f64) -> f64 {
    let b = (dec_deg + 28.0).abs();
    500.0 * (-b / 25.0).exp() + 30.0
}

/// Seeded generator for synthetic stars outside the real catalog.
#[derive(Debug, Clone)]
pub struct ProceduralGenerator {
    master_seed: u64,
    mag_limit: f64,
}

impl ProceduralGenerator {
    pub fn new(master_seed: u64, mag_limit: f64) -> Self {
        Self {
            master_seed,
            mag_limit,
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn mag_limit(&self) -> f64 {
        self.mag_limit
    }

    /// Tile containing a position, for a given tile size.
    pub fn tile_index(ra_deg: f64, dec_deg: f64, tile_size_deg: f64) -> TileIndex {
        TileIndex {
            ra: (ra_deg / tile_size_deg).floor() as i32,
            dec: (dec_deg / tile_size_deg).floor() as i32,
        }
    }

    /// Seed for one tile: master seed XOR-mixed with each axis times a
    /// distinct odd constant.
    pub fn tile_seed(&self, tile: TileIndex) -> u64 {
        let ra = (i64::from(tile.ra) + TILE_INDEX_OFFSET) as u64;
        let dec = (i64::from(tile.dec) + TILE_INDEX_OFFSET) as u64;
        self.master_seed ^ ra.wrapping_mul(RA_MIX) ^ dec.wrapping_mul(DEC_MIX)
    }

    /// First star id of a tile. Tiles hold at most [`IDS_PER_TILE`] stars, so
    /// ids of distinct tiles never overlap.
    fn tile_base_id(&self, tile: TileIndex) -> u64 {
        let ra = (i64::from(tile.ra) + TILE_ID_OFFSET) as u64;
        let dec = (i64::from(tile.dec) + TILE_ID_OFFSET) as u64;
        ((ra << 20) | dec)
            .wrapping_mul(IDS_PER_TILE)
            .wrapping_add(self.master_seed)
    }

    /// Generate one star from its own stream (`master_seed ^ id`).
    pub fn generate_star(&self, ra_deg: f64, dec_deg: f64, distance_pc: f64, id: u64) -> Star {
        let mut rng = PcgRng::new(self.master_seed ^ id);

        let mass = sample_kroupa_mass(&mut rng);
        let class = spectral_class_from_mass(mass);
        let abs_magnitude = class.absolute_magnitude_anchor() + rng.next_in_range(-0.5, 0.5);
        let v_magnitude = abs_magnitude + distance_modulus(distance_pc);
        let is_variable = rng.next_below(20) == 0;

        Star {
            id,
            name: None,
            position: EquatorialCoord::from_degrees(ra_deg, dec_deg),
            distance_pc,
            v_magnitude,
            abs_magnitude,
            parallax_mas: if distance_pc > 0.0 { 1_000.0 / distance_pc } else { 0.0 },
            spectral_class: class,
            color_bv: class.typical_bv(),
            proper_motion_ra_mas_yr: 0.0,
            proper_motion_dec_mas_yr: 0.0,
            is_variable,
            is_procedural: true,
        }
    }

    /// Stars of the tile containing `(tile_ra_deg, tile_dec_deg)`, no fainter
    /// than the magnitude limit.
    pub fn generate_tile(&self, tile_ra_deg: f64, tile_dec_deg: f64, tile_size_deg: f64) -> Vec<Star> {
        if !(tile_size_deg > 0.0) {
            return Vec::new();
        }
        let tile = Self::tile_index(tile_ra_deg, tile_dec_deg, tile_size_deg);
        self.generate_tile_at(tile, tile_size_deg)
    }

    /// Stars for an explicit tile index.
    ///
    /// The expected count is `density × area`, jittered ±20% from the tile's
    /// own stream and capped at [`IDS_PER_TILE`]. Faint stars are dropped only
    /// after generation, so the pre-filter count tracks the density model.
    pub fn generate_tile_at(&self, tile: TileIndex, tile_size_deg: f64) -> Vec<Star> {
        if !(tile_size_deg > 0.0) {
            return Vec::new();
        }
        let origin_ra = f64::from(tile.ra) * tile_size_deg;
        let origin_dec = f64::from(tile.dec) * tile_size_deg;
        let mut rng = PcgRng::new(self.tile_seed(tile));

        let expected = (stellar_density(origin_dec) * tile_size_deg * tile_size_deg) as i64;
        let jittered = (expected as f64 * (0.8 + rng.next_f64() * 0.4)) as i64;
        let count = (jittered.max(0) as u64).min(IDS_PER_TILE);
        if (count as i64) < jittered {
            tracing::warn!(
                ra = tile.ra,
                dec = tile.dec,
                tile_size_deg,
                requested = jittered,
                kept = count,
                "tile star count capped"
            );
        }
        let base_id = self.tile_base_id(tile);
        let (log_min, log_max) = (MIN_DISTANCE_PC.log10(), MAX_DISTANCE_PC.log10());

        let mut stars = Vec::with_capacity(count as usize);
        for i in 0..count {
            let ra = (origin_ra + rng.next_f64() * tile_size_deg).rem_euclid(360.0);
            let dec = (origin_dec + rng.next_f64() * tile_size_deg).clamp(-90.0, 90.0);
            let distance_pc = 10f64.powf(rng.next_in_range(log_min, log_max));

            let star = self.generate_star(ra, dec, distance_pc, base_id.wrapping_add(i));
            if star.v_magnitude <= self.mag_limit {
                stars.push(star);
            }
        }

        tracing::debug!(
            tile_ra = tile.ra,
            tile_dec = tile.dec,
            generated = count,
            kept = stars.len(),
            "generated procedural tile"
        );
        stars
    }

    /// Tiles overlapping the bounding box of a cone, each visited once.
    pub fn tiles_for_region(
        center: &EquatorialCoord,
        radius_deg: f64,
        tile_size_deg: f64,
    ) -> Vec<TileIndex> {
        if !(tile_size_deg > 0.0) || radius_deg < 0.0 {
            return Vec::new();
        }
        let dec_lo = (center.dec_deg() - radius_deg).max(-90.0);
        let dec_hi = (center.dec_deg() + radius_deg).min(90.0);
        let ra_tiles = (360.0 / tile_size_deg).ceil() as i64;

        let ra_range: Vec<i64> = if dec_lo <= -90.0 || dec_hi >= 90.0 {
            (0..ra_tiles).collect()
        } else {
            let half_width = radius_deg / dec_lo.abs().max(dec_hi.abs()).to_radians().cos();
            let lo = ((center.ra_deg() - half_width) / tile_size_deg).floor() as i64;
            let hi = ((center.ra_deg() + half_width) / tile_size_deg).floor() as i64;
            if hi - lo + 1 >= ra_tiles {
                (0..ra_tiles).collect()
            } else {
                (lo..=hi).map(|t| t.rem_euclid(ra_tiles)).collect()
            }
        };

        let dec_first = (dec_lo / tile_size_deg).floor() as i64;
        let dec_last = ((dec_hi / tile_size_deg).floor() as i64).min((90.0 / tile_size_deg).ceil() as i64 - 1);
        let mut tiles = Vec::new();
        for dec in dec_first..=dec_last {
            for &ra in &ra_range {
                tiles.push(TileIndex {
                    ra: ra as i32,
                    dec: dec as i32,
                });
            }
        }
        tiles
    }

    /// Every star from the tiles overlapping a cone, in tile order.
    pub fn generate_region(
        &self,
        center: &EquatorialCoord,
        radius_deg: f64,
        tile_size_deg: f64,
    ) -> Vec<Star> {
        Self::tiles_for_region(center, radius_deg, tile_size_deg)
            .into_iter()
            .flat_map(|tile| self.generate_tile_at(tile, tile_size_deg))
            .collect()
    }
}

impl Default for ProceduralGenerator {
    fn default() -> Self {
        Self::new(0, DEFAULT_MAG_LIMIT)
    }
}
