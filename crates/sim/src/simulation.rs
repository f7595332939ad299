//! The per-tick observation pipeline.

use parallax_catalog::{SpatialCatalog, Star};
use parallax_config::SimulationConfig;
use parallax_coords::{EquatorialCoord, horizontal_to_equatorial};
use parallax_discovery::{DiscoveryEngine, DiscoveryType};
use parallax_export::render::{RenderRecord, Row};
use parallax_observatory::{
    DEFAULT_EXPOSURE_S, Observation, ObservingSession, ObservingSite, Telescope,
};
use parallax_time::{now_as_jd, parse_utc};
use parallax_universe::{DEFAULT_TILE_SIZE_DEG, ProceduralGenerator};

use crate::SimError;
use crate::camera::Camera;
use crate::report::StatusReport;

/// Flux of a magnitude −1.5 star, which renders at full brightness.
const FULL_BRIGHTNESS_FLUX: f64 = 3.98;
/// Upper bound on the catalog search cone.
const MAX_QUERY_RADIUS_DEG: f64 = 180.0;

/// Render brightness in [0, 1] for an extinction-corrected magnitude.
pub fn brightness_for_magnitude(apparent_mag: f64) -> f32 {
    (10f64.powf(-0.4 * apparent_mag) / FULL_BRIGHTNESS_FLUX).min(1.0) as f32
}

/// A star that survived culling, with its screen record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStar {
    pub star_id: u64,
    pub apparent_magnitude: f64,
    pub record: RenderRecord,
}

/// Everything drawn for one instant, brightest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub jd: f64,
    pub lst_deg: f64,
    pub stars: Vec<FrameStar>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// CSV rows for this frame, tagged with `tick`.
    pub fn rows(&self, tick: usize) -> impl Iterator<Item = Row> + '_ {
        self.stars.iter().map(move |star| Row {
            tick,
            jd: self.jd,
            star_id: star.star_id,
            record: star.record,
        })
    }
}

/// Session, catalog, procedural generator, camera, and discovery registry.
#[derive(Debug, Clone)]
pub struct Simulation {
    session: ObservingSession,
    catalog: SpatialCatalog,
    generator: ProceduralGenerator,
    tile_size_deg: f64,
    camera: Camera,
    discoveries: DiscoveryEngine,
    exposure_s: f64,
}

impl Simulation {
    pub fn new(session: ObservingSession, catalog: SpatialCatalog, generator: ProceduralGenerator) -> Self {
        Self {
            session,
            catalog,
            generator,
            tile_size_deg: DEFAULT_TILE_SIZE_DEG,
            camera: Camera::default(),
            discoveries: DiscoveryEngine::new(),
            exposure_s: DEFAULT_EXPOSURE_S,
        }
    }

    /// Assemble a simulation from run settings. The clock starts at the
    /// configured epoch, or now when none is set.
    pub fn from_config(
        config: &SimulationConfig,
        site: ObservingSite,
        telescope: Telescope,
        catalog: SpatialCatalog,
    ) -> Result<Self, SimError> {
        let jd = match config.start_epoch.as_deref() {
            Some(epoch) => parse_utc(epoch)?.to_julian_date(),
            None => now_as_jd(),
        };
        let mut session = ObservingSession::new(site, telescope, jd);
        session.set_min_altitude_deg(config.min_altitude_deg);

        let generator = ProceduralGenerator::new(config.universe_seed, config.procedural_mag_limit);
        let mut simulation = Self::new(session, catalog, generator);
        simulation.tile_size_deg = config.tile_size_deg;
        simulation.exposure_s = config.exposure_s;
        simulation.camera.set_fov(config.camera_fov_deg);
        Ok(simulation)
    }

    pub fn session(&self) -> &ObservingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ObservingSession {
        &mut self.session
    }

    pub fn catalog(&self) -> &SpatialCatalog {
        &self.catalog
    }

    pub fn generator(&self) -> &ProceduralGenerator {
        &self.generator
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn discoveries(&self) -> &DiscoveryEngine {
        &self.discoveries
    }

    pub fn exposure_s(&self) -> f64 {
        self.exposure_s
    }

    pub fn jd(&self) -> f64 {
        self.session.jd()
    }

    /// Aim the camera at an equatorial position as seen right now.
    pub fn point_at(&mut self, target: &EquatorialCoord) {
        let horizontal = self.session.to_horizontal(target);
        self.camera.point_at(&horizontal);
    }

    /// Advance the clock by `hours` and build the frame for the new instant.
    pub fn tick(&mut self, hours: f64) -> Frame {
        self.session.advance_time(hours);
        self.frame()
    }

    /// Build the frame for the current instant without moving the clock.
    pub fn frame(&self) -> Frame {
        let lst = self.session.lst_rad();
        let pointing = self.camera.pointing();
        let projection = self.camera.projection();
        let mag_limit = self.camera.magnitude_limit();
        let atmosphere = self.session.atmosphere();

        let centre = horizontal_to_equatorial(&pointing, &self.session.site().location(), lst);
        let radius_deg = (self.camera.fov_deg() * projection.margin_factor).min(MAX_QUERY_RADIUS_DEG);

        let mut stars = Vec::new();
        for star in self.catalog.query(&centre, radius_deg, mag_limit) {
            let horizontal = self.session.to_horizontal(&star.position);
            if horizontal.alt < 0.0 {
                continue;
            }
            let Some(point) = projection.project(&horizontal, &pointing) else {
                continue;
            };
            let apparent = atmosphere.apparent_magnitude(star.v_magnitude, horizontal.alt_deg());
            stars.push(FrameStar {
                star_id: star.id,
                apparent_magnitude: apparent,
                record: RenderRecord {
                    x: point.x,
                    y: point.y,
                    brightness: brightness_for_magnitude(apparent),
                    color_bv: star.color_bv as f32,
                },
            });
        }

        tracing::debug!(jd = self.session.jd(), stars = stars.len(), "frame built");
        Frame {
            jd: self.session.jd(),
            lst_deg: lst.to_degrees(),
            stars,
        }
    }

    /// Generate procedural stars covering a cone and add them to the catalog.
    /// Returns how many were added.
    pub fn populate_procedural(&mut self, center: &EquatorialCoord, radius_deg: f64) -> usize {
        let generated = self.generator.generate_region(center, radius_deg, self.tile_size_deg);
        let added = generated.len();
        self.catalog.extend(generated);
        tracing::info!(
            ra_deg = center.ra_deg(),
            dec_deg = center.dec_deg(),
            radius_deg,
            added,
            "procedural stars added"
        );
        added
    }

    /// Register a discovery candidate for a catalog star.
    pub fn register_discovery(&mut self, star_id: u64, kind: DiscoveryType) -> Result<usize, SimError> {
        let star = self.catalog.find_by_id(star_id).ok_or(SimError::StarNotFound(star_id))?;
        let name = star.display_name();
        Ok(self
            .discoveries
            .new_discovery(star_id, name, kind, self.session.jd()))
    }

    /// Expose the camera on a catalog star. The observation is also recorded
    /// against the star's discovery, when one is registered.
    pub fn observe_star(&mut self, star_id: u64, exposure_s: f64) -> Result<Observation, SimError> {
        let star = self.catalog.find_by_id(star_id).ok_or(SimError::StarNotFound(star_id))?;
        let observation = self.session.observe(&star.position, star.v_magnitude, exposure_s);
        if let Some(index) = self.discoveries.find_by_object(star_id) {
            self.discoveries.record(index, observation.clone());
        }
        Ok(observation)
    }

    pub fn status(&self, target: Option<&Star>) -> StatusReport {
        StatusReport::new(&self.session, target, self.exposure_s)
    }
}
