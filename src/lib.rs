//! Ground-based observatory simulation.
//!
//! The subsystems live in member crates: time and coordinate transforms,
//! the spatial star catalog, the atmosphere, telescope optics, the
//! procedural universe, and discovery bookkeeping. This crate re-exports them
//! so front-ends (CLI, renderers) share one import path.

pub use parallax_atmosphere as atmosphere;
pub use parallax_catalog as catalog;
pub use parallax_config as config;
pub use parallax_coords as coords;
pub use parallax_core as core;
pub use parallax_discovery as discovery;
pub use parallax_export as export;
pub use parallax_observatory as observatory;
pub use parallax_sim as sim;
pub use parallax_time as time;
pub use parallax_universe as universe;
