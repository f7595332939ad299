//! Simulation façade: ties the session, catalog, procedural universe, camera,
//! and discovery registry into one tick-driven pipeline.

use thiserror::Error;

pub mod camera;
pub mod facade;
pub mod report;
pub mod simulation;

pub use camera::Camera;
pub use facade::catalog::load_catalog_or_builtin;
pub use facade::{site, telescope};
pub use report::{StatusReport, TargetReport, TelescopeReport};
pub use simulation::{Frame, FrameStar, Simulation, brightness_for_magnitude};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid start epoch: {0}")]
    Time(#[from] parallax_time::TimeError),
    #[error("star #{0} not found in catalog")]
    StarNotFound(u64),
}
