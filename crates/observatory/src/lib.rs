//! Telescope optics, detector noise, observing sites, and observing sessions.

pub mod session;
pub mod site;
pub mod telescope;

pub use session::{DEFAULT_EXPOSURE_S, DEFAULT_MIN_ALTITUDE_DEG, Observation, ObservingSession};
pub use site::ObservingSite;
pub use telescope::{Detector, Telescope, TelescopeError};
