//! Deterministic procedural star generation.
//!
//! Identical `(master_seed, tile)` inputs always produce the same stars,
//! whatever order tiles are requested in.

pub mod generator;
pub mod imf;
pub mod rng;

pub use generator::{
    DEFAULT_MAG_LIMIT, DEFAULT_TILE_SIZE_DEG, IDS_PER_TILE, ProceduralGenerator, TileIndex, stellar_density,
};
pub use imf::{sample_kroupa_mass, spectral_class_from_mass};
pub use rng::PcgRng;
