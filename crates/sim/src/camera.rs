//! Virtual camera: where the view points and how wide it is.

use parallax_coords::{HorizontalCoord, ScreenProjection};
use parallax_core::angle::normalize_degrees;

pub const DEFAULT_ALTITUDE_DEG: f64 = 45.0;
pub const DEFAULT_FOV_DEG: f64 = 60.0;
pub const MIN_FOV_DEG: f64 = 0.5;
pub const MAX_FOV_DEG: f64 = 120.0;
/// Naked-eye limit at the default field of view.
pub const BASE_MAGNITUDE_LIMIT: f64 = 6.5;
pub const MAX_MAGNITUDE_LIMIT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    alt_deg: f64,
    az_deg: f64,
    fov_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            alt_deg: DEFAULT_ALTITUDE_DEG,
            az_deg: 0.0,
            fov_deg: DEFAULT_FOV_DEG,
        }
    }
}

impl Camera {
    pub fn new(alt_deg: f64, az_deg: f64, fov_deg: f64) -> Self {
        let mut camera = Self::default();
        camera.set_pointing(alt_deg, az_deg);
        camera.set_fov(fov_deg);
        camera
    }

    pub fn alt_deg(&self) -> f64 {
        self.alt_deg
    }

    pub fn az_deg(&self) -> f64 {
        self.az_deg
    }

    pub fn fov_deg(&self) -> f64 {
        self.fov_deg
    }

    pub fn pointing(&self) -> HorizontalCoord {
        HorizontalCoord::from_degrees(self.alt_deg, self.az_deg)
    }

    pub fn set_pointing(&mut self, alt_deg: f64, az_deg: f64) {
        self.alt_deg = alt_deg.clamp(-90.0, 90.0);
        self.az_deg = normalize_degrees(az_deg);
    }

    pub fn point_at(&mut self, target: &HorizontalCoord) {
        self.set_pointing(target.alt_deg(), target.az_deg());
    }

    pub fn set_fov(&mut self, fov_deg: f64) {
        self.fov_deg = fov_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    }

    pub fn pan(&mut self, d_alt_deg: f64, d_az_deg: f64) {
        self.set_pointing(self.alt_deg + d_alt_deg, self.az_deg + d_az_deg);
    }

    /// Narrow the view by `factor` (> 1 zooms in). Non-positive factors are ignored.
    pub fn zoom(&mut self, factor: f64) {
        if factor > 0.0 {
            self.set_fov(self.fov_deg / factor);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Faintest magnitude drawn: deeper as the view narrows, capped at 20.
    pub fn magnitude_limit(&self) -> f64 {
        (BASE_MAGNITUDE_LIMIT + 5.0 * (DEFAULT_FOV_DEG / self.fov_deg).log10()).min(MAX_MAGNITUDE_LIMIT)
    }

    pub fn projection(&self) -> ScreenProjection {
        ScreenProjection::new(self.fov_deg.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn limits_follow_field_of_view() {
        let mut camera = Camera::default();
        assert_abs_diff_eq!(camera.magnitude_limit(), 6.5, epsilon = 1e-12);
        camera.set_fov(6.0);
        assert_abs_diff_eq!(camera.magnitude_limit(), 11.5, epsilon = 1e-12);
        camera.set_fov(0.01);
        assert_eq!(camera.fov_deg(), MIN_FOV_DEG);
        assert_abs_diff_eq!(camera.magnitude_limit(), 6.5 + 5.0 * 120f64.log10(), epsilon = 1e-12);
        assert!(camera.magnitude_limit() < MAX_MAGNITUDE_LIMIT);
    }

    #[test]
    fn pan_wraps_azimuth_and_clamps_altitude() {
        let mut camera = Camera::new(80.0, 350.0, 30.0);
        camera.pan(20.0, 20.0);
        assert_eq!(camera.alt_deg(), 90.0);
        assert_abs_diff_eq!(camera.az_deg(), 10.0, epsilon = 1e-9);
        camera.reset();
        assert_eq!(camera, Camera::default());
    }
}
