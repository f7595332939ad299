//! Tangent-plane projection of horizontal coordinates onto a normalized screen.

use parallax_core::vector::{dot, unit_from_spherical};

use crate::HorizontalCoord;

/// Stars farther than `fov × margin` from the pointing centre are culled
/// before projection. Slightly above half the diagonal of a square view.
pub const DEFAULT_MARGIN_FACTOR: f64 = 0.75;

/// Normalized screen position; both axes span `[-1, 1]` across the field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

/// Gnomonic projection for a square field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    pub fov_rad: f64,
    pub margin_factor: f64,
}

impl ScreenProjection {
    pub fn new(fov_rad: f64) -> Self {
        Self {
            fov_rad,
            margin_factor: DEFAULT_MARGIN_FACTOR,
        }
    }

    pub fn with_margin(mut self, margin_factor: f64) -> Self {
        self.margin_factor = margin_factor;
        self
    }

    /// Project `star` relative to the view centre `pointing`.
    ///
    /// Returns `None` when the star lies beyond the culling margin, behind the
    /// tangent plane, or outside `[-1, 1]` after scaling.
    pub fn project(&self, star: &HorizontalCoord, pointing: &HorizontalCoord) -> Option<ScreenPoint> {
        let cos_sep = dot(
            &unit_from_spherical(star.az, star.alt),
            &unit_from_spherical(pointing.az, pointing.alt),
        );
        let separation = cos_sep.clamp(-1.0, 1.0).acos();
        if separation > self.fov_rad * self.margin_factor {
            return None;
        }
        if cos_sep <= 0.0 {
            return None;
        }

        let delta_az = star.az - pointing.az;
        let (sin_daz, cos_daz) = delta_az.sin_cos();
        let (sin_alt_s, cos_alt_s) = star.alt.sin_cos();
        let (sin_alt_p, cos_alt_p) = pointing.alt.sin_cos();

        let dx = cos_alt_s * sin_daz;
        let dy = sin_alt_s * cos_alt_p - cos_alt_s * sin_alt_p * cos_daz;

        let half_fov_tan = (self.fov_rad * 0.5).tan();
        if !half_fov_tan.is_finite() || half_fov_tan <= 0.0 {
            return None;
        }
        let x = (dx / cos_sep / half_fov_tan) as f32;
        let y = (dy / cos_sep / half_fov_tan) as f32;
        if !x.is_finite() || !y.is_finite() || x.abs() > 1.0 || y.abs() > 1.0 {
            return None;
        }
        Some(ScreenPoint { x, y })
    }
}

/// Project with the default culling margin.
pub fn horizontal_to_screen(
    star: &HorizontalCoord,
    pointing: &HorizontalCoord,
    fov_rad: f64,
) -> Option<ScreenPoint> {
    ScreenProjection::new(fov_rad).project(star, pointing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_maps_to_origin() {
        let pointing = HorizontalCoord::from_degrees(45.0, 120.0);
        let p = horizontal_to_screen(&pointing, &pointing, 60f64.to_radians()).expect("on screen");
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
    }

    #[test]
    fn tighter_margin_culls_more() {
        let pointing = HorizontalCoord::from_degrees(30.0, 0.0);
        let star = HorizontalCoord::from_degrees(30.0, 20.0);
        let fov = 60f64.to_radians();
        assert!(ScreenProjection::new(fov).project(&star, &pointing).is_some());
        assert!(
            ScreenProjection::new(fov)
                .with_margin(0.2)
                .project(&star, &pointing)
                .is_none()
        );
    }
}
