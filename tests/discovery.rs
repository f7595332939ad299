use approx::assert_abs_diff_eq;
use parallax::catalog::SpatialCatalog;
use parallax::coords::EquatorialCoord;
use parallax::discovery::{
    DEFAULT_PARALLAX_EPOCHS, Discovery, DiscoveryEngine, DiscoveryState, DiscoveryType,
    Observation, REQUIRED_CONFIRMATIONS, UNDETECTABLE_PLANET_RADIUS, can_measure_parallax,
    minimum_detectable_planet_radius, parallax_detection_limit_mas, transit_depth,
};
use parallax::observatory::Telescope;

const JD: f64 = 2_460_630.25;

fn observation(snr: f64, hour: f64) -> Observation {
    Observation::new(JD + hour / 24.0, EquatorialCoord::from_degrees(269.452, 4.693), snr, 9.6, 60.0)
}

#[test]
fn three_strong_observations_confirm() {
    let mut engine = DiscoveryEngine::new();
    let idx = engine.new_discovery(87_937, "Barnard's Star b", DiscoveryType::TransitMethod, JD);

    for hour in 0..3 {
        let before = engine.discovery(idx).expect("registered").n_confirmations();
        assert_eq!(engine.record(idx, observation(7.0, f64::from(hour))), Some(true));
        let after = engine.discovery(idx).expect("registered").n_confirmations();
        assert_eq!(after, before + 1);
    }

    let disc = engine.discovery(idx).expect("registered");
    assert_eq!(disc.n_confirmations(), REQUIRED_CONFIRMATIONS);
    assert!(disc.confirmed());
    assert!(engine.is_confirmed(disc));
    assert_eq!(disc.state(), DiscoveryState::Confirmed);
    assert_eq!(disc.observations().len(), 3);
}

#[test]
fn weak_observations_are_kept_but_never_confirm() {
    let mut engine = DiscoveryEngine::new();
    let idx = engine.new_discovery(1, "Faint", DiscoveryType::DirectDetection, JD);
    for hour in 0..10 {
        assert_eq!(engine.record(idx, observation(2.0, f64::from(hour))), Some(false));
    }
    let disc = engine.discovery(idx).expect("registered");
    assert_eq!(disc.n_confirmations(), 0);
    assert!(!disc.confirmed());
    assert_eq!(disc.state(), DiscoveryState::Candidate);
    assert_eq!(disc.observations().len(), 10);
    assert!(disc.observations().iter().all(|o| !o.is_detection));
}

#[test]
fn detections_between_thresholds_do_not_count() {
    let mut engine = DiscoveryEngine::new();
    let idx = engine.new_discovery(2, "Marginal", DiscoveryType::PhotometricVariable, JD);
    assert_eq!(engine.record(idx, observation(6.0, 0.0)), Some(false));
    let disc = engine.discovery(idx).expect("registered");
    assert!(disc.observations()[0].is_detection, "SNR 6 is still a detection");
    assert_eq!(disc.n_confirmations(), 0);
}

#[test]
fn detection_flag_is_rederived_from_snr() {
    let engine = DiscoveryEngine::new();
    let mut disc = Discovery::new(3, "Spoofed", DiscoveryType::Supernova, JD);
    let mut forged = observation(1.0, 0.0);
    forged.is_detection = true;
    assert!(!engine.record_observation(&mut disc, forged));
    assert!(!disc.observations()[0].is_detection);
}

#[test]
fn confirmation_latches_and_count_keeps_growing() {
    let engine = DiscoveryEngine::new();
    let mut disc = Discovery::new(4, "Comet C/2024", DiscoveryType::Comet, JD);
    engine.record_observation(&mut disc, observation(9.0, 0.0));
    assert_eq!(disc.state(), DiscoveryState::PartiallyConfirmed);
    engine.record_observation(&mut disc, observation(9.0, 1.0));
    engine.record_observation(&mut disc, observation(9.0, 2.0));
    assert!(disc.confirmed());

    engine.record_observation(&mut disc, observation(0.5, 3.0));
    engine.record_observation(&mut disc, observation(12.0, 4.0));
    assert!(disc.confirmed(), "confirmation never resets");
    assert_eq!(disc.n_confirmations(), 4);
}

#[test]
fn registry_lookups() {
    let mut engine = DiscoveryEngine::new();
    let a = engine.new_discovery(10, "A", DiscoveryType::Astrometric, JD);
    let b = engine.new_discovery(20, "B", DiscoveryType::Spectroscopic, JD);
    assert_eq!(engine.find_by_object(20), Some(b));
    assert_eq!(engine.find_by_object(10), Some(a));
    assert_eq!(engine.find_by_object(30), None);
    assert_eq!(engine.record(99, observation(10.0, 0.0)), None);
    assert_eq!(engine.discoveries().len(), 2);
    assert_eq!(engine.discovery(a).map(|d| d.kind), Some(DiscoveryType::Astrometric));
}

#[test]
fn discovery_types_have_readable_names() {
    assert_eq!(DiscoveryType::TransitMethod.to_string(), "Transit Method");
    assert_eq!(DiscoveryType::ParallaxShift.name(), "Parallax Shift");
}

#[test]
fn transit_depth_matches_earth_sun() {
    assert_abs_diff_eq!(transit_depth(1.0, 1.0), 8.39e-5, epsilon = 1e-7);
    assert_abs_diff_eq!(transit_depth(2.0, 1.0), 4.0 * transit_depth(1.0, 1.0), epsilon = 1e-15);
    assert!(transit_depth(1.0, 0.2) > transit_depth(1.0, 1.0));
}

#[test]
fn minimum_planet_radius_inverts_transit_depth() {
    assert_eq!(minimum_detectable_planet_radius(0.0, 1.0), UNDETECTABLE_PLANET_RADIUS);
    assert_eq!(minimum_detectable_planet_radius(-3.0, 1.0), UNDETECTABLE_PLANET_RADIUS);

    let snr = 400.0;
    let radius = minimum_detectable_planet_radius(snr, 0.5);
    assert_abs_diff_eq!(transit_depth(radius, 0.5), 1.0 / snr, epsilon = 1e-12);
    assert!(minimum_detectable_planet_radius(1_000.0, 0.5) < radius);
}

#[test]
fn parallax_limit_shrinks_with_epochs_and_aperture() {
    let reflector = Telescope::reflector_1m();
    let refractor = Telescope::generic_refractor();
    let limit = parallax_detection_limit_mas(&reflector, DEFAULT_PARALLAX_EPOCHS);
    assert_abs_diff_eq!(
        limit,
        reflector.diffraction_limit_arcsec() * 100.0 / 6f64.sqrt(),
        epsilon = 1e-12
    );
    assert!(parallax_detection_limit_mas(&reflector, 24) < limit);
    assert!(parallax_detection_limit_mas(&refractor, DEFAULT_PARALLAX_EPOCHS) > limit);
    assert_eq!(
        parallax_detection_limit_mas(&reflector, 0),
        parallax_detection_limit_mas(&reflector, 1),
        "zero epochs is treated as one"
    );
}

#[test]
fn nearby_stars_have_measurable_parallax() {
    let catalog = SpatialCatalog::builtin();
    let reflector = Telescope::reflector_1m();
    let barnard = catalog.find_by_id(87_937).expect("Barnard's Star");
    let betelgeuse = catalog.find_by_id(27_989).expect("Betelgeuse");
    assert!(can_measure_parallax(barnard, &reflector, DEFAULT_PARALLAX_EPOCHS));
    assert!(!can_measure_parallax(betelgeuse, &reflector, DEFAULT_PARALLAX_EPOCHS));

    let unknown = parallax::catalog::Star::new(5, EquatorialCoord::from_degrees(0.0, 0.0), 5.0);
    assert!(!can_measure_parallax(&unknown, &reflector, 1_000));
}
