use std::collections::HashSet;

use approx::assert_abs_diff_eq;
use parallax::catalog::SpectralClass;
use parallax::coords::EquatorialCoord;
use parallax::universe::{
    DEFAULT_MAG_LIMIT, IDS_PER_TILE, PcgRng, ProceduralGenerator, TileIndex, sample_kroupa_mass,
    spectral_class_from_mass, stellar_density,
};

const SEED: u64 = 0xDEAD_BEEF_CAFE_BABE;
const TILE: f64 = 4.0;

#[test]
fn tiles_are_reproducible() {
    let generator = ProceduralGenerator::new(SEED, DEFAULT_MAG_LIMIT);
    let first = generator.generate_tile(90.0, 10.0, TILE);
    let second = generator.generate_tile(90.0, 10.0, TILE);
    assert!(!first.is_empty(), "tile should contain visible stars");
    assert_eq!(first, second);

    let rebuilt = ProceduralGenerator::new(SEED, DEFAULT_MAG_LIMIT);
    assert_eq!(rebuilt.generate_tile(91.5, 11.0, TILE), first, "any point in the tile");
}

#[test]
fn tile_order_does_not_matter() {
    let generator = ProceduralGenerator::new(SEED, DEFAULT_MAG_LIMIT);
    let a = TileIndex { ra: 10, dec: -3 };
    let b = TileIndex { ra: 11, dec: -3 };

    let forward = (generator.generate_tile_at(a, TILE), generator.generate_tile_at(b, TILE));
    let backward_b = generator.generate_tile_at(b, TILE);
    let backward_a = generator.generate_tile_at(a, TILE);
    assert_eq!(forward.0, backward_a);
    assert_eq!(forward.1, backward_b);
}

#[test]
fn seeds_change_the_sky() {
    let a = ProceduralGenerator::new(1, DEFAULT_MAG_LIMIT).generate_tile(45.0, 0.0, TILE);
    let b = ProceduralGenerator::new(2, DEFAULT_MAG_LIMIT).generate_tile(45.0, 0.0, TILE);
    assert_ne!(a, b);
}

#[test]
fn generated_stars_respect_tile_and_limit() {
    let limit = 10.0;
    let generator = ProceduralGenerator::new(SEED, limit);
    let tile = ProceduralGenerator::tile_index(200.0, -30.0, TILE);
    assert_eq!(tile, TileIndex { ra: 50, dec: -8 });

    let stars = generator.generate_tile_at(tile, TILE);
    assert!(!stars.is_empty());
    for star in &stars {
        let ra = star.position.ra_deg();
        let dec = star.position.dec_deg();
        assert!((200.0 - 1e-9..204.0 + 1e-9).contains(&ra), "RA {ra} outside tile");
        assert!((-32.0 - 1e-9..-28.0 + 1e-9).contains(&dec), "Dec {dec} outside tile");
        assert!(star.v_magnitude <= limit);
        assert!(star.is_procedural);
        assert!((10.0 - 1e-9..=5_000.0 + 1e-6).contains(&star.distance_pc));
        assert_abs_diff_eq!(star.parallax_mas, 1_000.0 / star.distance_pc, epsilon = 1e-9);
        assert_eq!(star.color_bv, star.spectral_class.typical_bv());
    }
}

#[test]
fn negative_coordinates_floor_into_tiles() {
    assert_eq!(
        ProceduralGenerator::tile_index(-0.5, -0.5, TILE),
        TileIndex { ra: -1, dec: -1 }
    );
    assert_eq!(
        ProceduralGenerator::tile_index(359.9, 89.9, TILE),
        TileIndex { ra: 89, dec: 22 }
    );
}

#[test]
fn neighbouring_tiles_never_share_ids() {
    let generator = ProceduralGenerator::new(SEED, DEFAULT_MAG_LIMIT);
    let mut seen = HashSet::new();
    for ra in 0..3 {
        for dec in -1..2 {
            for star in generator.generate_tile_at(TileIndex { ra, dec }, TILE) {
                assert!(seen.insert(star.id), "duplicate id {}", star.id);
            }
        }
    }
    assert!(!seen.is_empty());
}

#[test]
fn generate_star_is_a_pure_function_of_id() {
    let generator = ProceduralGenerator::new(SEED, DEFAULT_MAG_LIMIT);
    let a = generator.generate_star(10.0, 20.0, 100.0, 77);
    let b = generator.generate_star(10.0, 20.0, 100.0, 77);
    let c = generator.generate_star(10.0, 20.0, 100.0, 78);
    assert_eq!(a, b);
    assert_eq!(a.id, 77);
    assert!(
        a.abs_magnitude != c.abs_magnitude || a.spectral_class != c.spectral_class,
        "different ids should draw from different streams"
    );
}

#[test]
fn region_is_the_union_of_its_tiles() {
    let generator = ProceduralGenerator::new(SEED, 9.0);
    let center = EquatorialCoord::from_degrees(2.0, 5.0);
    let tiles = ProceduralGenerator::tiles_for_region(&center, 6.0, TILE);
    let unique: HashSet<TileIndex> = tiles.iter().copied().collect();
    assert_eq!(unique.len(), tiles.len());

    let expected: Vec<_> = tiles
        .iter()
        .flat_map(|&tile| generator.generate_tile_at(tile, TILE))
        .collect();
    assert_eq!(generator.generate_region(&center, 6.0, TILE), expected);

    let polar = ProceduralGenerator::tiles_for_region(&EquatorialCoord::from_degrees(0.0, 88.0), 3.0, TILE);
    let ra_tiles: HashSet<i32> = polar.iter().map(|tile| tile.ra).collect();
    assert_eq!(ra_tiles.len(), 90, "a cap over the pole spans every RA tile");
    assert!(polar.iter().all(|tile| tile.dec <= 22));
}

#[test]
fn invalid_tile_sizes_produce_nothing() {
    let generator = ProceduralGenerator::new(SEED, DEFAULT_MAG_LIMIT);
    assert!(generator.generate_tile(0.0, 0.0, 0.0).is_empty());
    assert!(generator.generate_tile(0.0, 0.0, f64::NAN).is_empty());
    assert!(
        ProceduralGenerator::tiles_for_region(&EquatorialCoord::from_degrees(0.0, 0.0), -1.0, TILE)
            .is_empty()
    );
}

#[test]
fn density_model_favours_the_plane_proxy() {
    assert!(stellar_density(-28.0) > stellar_density(60.0));
    assert_abs_diff_eq!(stellar_density(-28.0), 530.0, epsilon = 1e-9);
    assert!(stellar_density(90.0) > 30.0);
}

#[test]
fn pcg_streams_are_seeded_and_bounded() {
    let mut a = PcgRng::new(42);
    let mut b = PcgRng::new(42);
    let mut c = PcgRng::new(43);
    let xs: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
    let ys: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
    let zs: Vec<u32> = (0..8).map(|_| c.next_u32()).collect();
    assert_eq!(xs, ys);
    assert_ne!(xs, zs);

    let mut rng = PcgRng::with_stream(42, 7);
    for _ in 0..1_000 {
        let v = rng.next_in_range(-2.0, 3.0);
        assert!((-2.0..3.0).contains(&v));
        assert!(rng.next_below(6) < 6);
    }
}

#[test]
fn kroupa_masses_are_bounded_and_bottom_heavy() {
    let mut rng = PcgRng::new(2024);
    let samples = 10_000;
    let mut m_dwarfs = 0;
    for _ in 0..samples {
        let mass = sample_kroupa_mass(&mut rng);
        assert!((0.1..=150.0).contains(&mass), "mass {mass}");
        if spectral_class_from_mass(mass) == SpectralClass::M {
            m_dwarfs += 1;
        }
    }
    let fraction = f64::from(m_dwarfs) / f64::from(samples);
    assert!(fraction > 0.45, "M dwarf fraction {fraction}");
}

#[test]
fn mass_boundaries_map_to_classes() {
    assert_eq!(spectral_class_from_mass(20.0), SpectralClass::O);
    assert_eq!(spectral_class_from_mass(2.1), SpectralClass::B);
    assert_eq!(spectral_class_from_mass(1.0), SpectralClass::G);
    assert_eq!(spectral_class_from_mass(0.3), SpectralClass::M);
    assert_eq!(spectral_class_from_mass(0.05), SpectralClass::L);
}

#[test]
fn oversized_tiles_keep_ids_disjoint() {
    let generator = ProceduralGenerator::new(7, 99.0);
    let dense = generator.generate_tile_at(TileIndex { ra: 0, dec: 0 }, 80.0);
    let north = generator.generate_tile_at(TileIndex { ra: 0, dec: 1 }, 80.0);
    assert_eq!(dense.len() as u64, IDS_PER_TILE, "dense tile should hit the cap");
    assert!(!north.is_empty());

    let north_ids: HashSet<u64> = north.iter().map(|s| s.id).collect();
    let shared = dense.iter().filter(|s| north_ids.contains(&s.id)).count();
    assert_eq!(shared, 0, "tiles share {shared} ids");
}
