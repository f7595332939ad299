//! Read-only snapshot of a session, for consoles and JSON reports.

use std::fmt;

use parallax_catalog::Star;
use parallax_observatory::ObservingSession;
use parallax_time::from_julian_date;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelescopeReport {
    pub name: String,
    pub aperture_mm: f64,
    pub f_ratio: f64,
    pub pixel_scale_arcsec: f64,
    pub fov_width_deg: f64,
    pub fov_height_deg: f64,
    pub diffraction_limit_arcsec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetReport {
    pub id: u64,
    pub name: String,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub alt_deg: f64,
    pub az_deg: f64,
    pub airmass: f64,
    pub visible: bool,
    pub v_magnitude: f64,
    pub apparent_magnitude: f64,
    pub seeing_arcsec: f64,
    pub sky_background: f64,
    pub exposure_s: f64,
    pub snr: f64,
    pub limiting_magnitude: f64,
}

/// Site, clock, instrument, and optional target readout at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub site: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
    pub julian_date: f64,
    pub utc: String,
    pub lst_deg: f64,
    pub telescope: TelescopeReport,
    pub zenith_seeing_arcsec: f64,
    pub extinction_coeff: f64,
    pub zenith_sky_background: f64,
    pub target: Option<TargetReport>,
}

impl StatusReport {
    pub fn new(session: &ObservingSession, target: Option<&Star>, exposure_s: f64) -> Self {
        let site = session.site();
        let scope = session.telescope();
        let atmosphere = session.atmosphere();
        let (fov_width_deg, fov_height_deg) = scope.field_of_view_deg();

        Self {
            site: site.name.clone(),
            latitude_deg: site.latitude_deg,
            longitude_deg: site.longitude_deg,
            elevation_m: site.elevation_m,
            julian_date: session.jd(),
            utc: from_julian_date(session.jd()).to_string(),
            lst_deg: session.lst_deg(),
            telescope: TelescopeReport {
                name: scope.name.clone(),
                aperture_mm: scope.aperture_mm,
                f_ratio: scope.f_ratio(),
                pixel_scale_arcsec: scope.pixel_scale_arcsec(),
                fov_width_deg,
                fov_height_deg,
                diffraction_limit_arcsec: scope.diffraction_limit_arcsec(),
            },
            zenith_seeing_arcsec: atmosphere.effective_seeing_arcsec(90.0),
            extinction_coeff: atmosphere.conditions.extinction_coeff,
            zenith_sky_background: atmosphere.sky_background(90.0),
            target: target.map(|star| target_report(session, star, exposure_s)),
        }
    }
}

fn target_report(session: &ObservingSession, star: &Star, exposure_s: f64) -> TargetReport {
    let horizontal = session.to_horizontal(&star.position);
    let alt = horizontal.alt_deg();
    let atmosphere = session.atmosphere();
    TargetReport {
        id: star.id,
        name: star.display_name(),
        ra_deg: star.position.ra_deg(),
        dec_deg: star.position.dec_deg(),
        alt_deg: alt,
        az_deg: horizontal.az_deg(),
        airmass: atmosphere.airmass(alt),
        visible: session.is_visible(&star.position),
        v_magnitude: star.v_magnitude,
        apparent_magnitude: atmosphere.apparent_magnitude(star.v_magnitude, alt),
        seeing_arcsec: atmosphere.effective_seeing_arcsec(alt),
        sky_background: atmosphere.sky_background(alt),
        exposure_s,
        snr: session.snr(&star.position, star.v_magnitude, exposure_s),
        limiting_magnitude: session.limiting_magnitude(&star.position, exposure_s),
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Observatory: {}", self.site)?;
        writeln!(f, "  Lat: {:.4} deg N", self.latitude_deg)?;
        writeln!(f, "  Lon: {:.4} deg E", self.longitude_deg)?;
        writeln!(f, "  Elevation: {:.0} m", self.elevation_m)?;
        writeln!(f, "Time: {} (JD {:.5})", self.utc, self.julian_date)?;
        writeln!(f, "  LST: {:.4} deg", self.lst_deg)?;

        let scope = &self.telescope;
        writeln!(f, "Telescope: {}", scope.name)?;
        writeln!(f, "  Aperture: {:.1} mm", scope.aperture_mm)?;
        writeln!(f, "  F-ratio: f/{:.1}", scope.f_ratio)?;
        writeln!(f, "  Pixel scale: {:.3} arcsec/pixel", scope.pixel_scale_arcsec)?;
        writeln!(f, "  FOV: {:.3} x {:.3} degrees", scope.fov_width_deg, scope.fov_height_deg)?;
        writeln!(f, "  Diff. limit: {:.3} arcsec", scope.diffraction_limit_arcsec)?;

        writeln!(f, "Atmosphere:")?;
        writeln!(f, "  Seeing (zenith): {:.2} arcsec", self.zenith_seeing_arcsec)?;
        writeln!(f, "  Extinction: {:.3} mag/airmass", self.extinction_coeff)?;
        write!(f, "  Sky background (zenith): {:.2} mag/arcsec^2", self.zenith_sky_background)?;

        if let Some(target) = &self.target {
            writeln!(f)?;
            writeln!(f, "Target: {} (#{})", target.name, target.id)?;
            writeln!(f, "  RA/Dec: {:.3} / {:.3} deg", target.ra_deg, target.dec_deg)?;
            writeln!(f, "  Alt/Az: {:.2} / {:.2} deg", target.alt_deg, target.az_deg)?;
            writeln!(f, "  Airmass: {:.3}", target.airmass)?;
            writeln!(
                f,
                "  Above minimum altitude: {}",
                if target.visible { "Yes" } else { "No" }
            )?;
            writeln!(
                f,
                "  Magnitude: V={:.2} (apparent {:.2})",
                target.v_magnitude, target.apparent_magnitude
            )?;
            writeln!(f, "  Seeing: {:.2} arcsec", target.seeing_arcsec)?;
            writeln!(f, "  Sky background: {:.2} mag/arcsec^2", target.sky_background)?;
            writeln!(f, "  SNR ({:.0}s exposure): {:.1}", target.exposure_s, target.snr)?;
            write!(f, "  Limiting magnitude: {:.2}", target.limiting_magnitude)?;
        }
        Ok(())
    }
}
