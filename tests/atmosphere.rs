use approx::assert_abs_diff_eq;
use parallax::atmosphere::{
    AtmosphericConditions, AtmosphericModel, MAX_AIRMASS, airmass, bortle_to_sky_background,
};

fn model() -> AtmosphericModel {
    AtmosphericModel::new(AtmosphericConditions::default())
}

#[test]
fn airmass_boundaries() {
    assert_abs_diff_eq!(airmass(90.0), 1.0, epsilon = 1e-4);
    assert_eq!(airmass(0.0), MAX_AIRMASS);
    assert_eq!(airmass(-12.0), MAX_AIRMASS);
    assert!(airmass(0.01) <= MAX_AIRMASS);
}

#[test]
fn airmass_near_sec_z_at_moderate_altitude() {
    let x = airmass(30.0);
    assert!((x - 2.0).abs() < 0.02, "airmass(30) = {x}");
}

#[test]
fn extinction_strictly_increases_toward_horizon() {
    let atm = model();
    let mut previous = atm.extinction_mag(90.0);
    for step in 1..90 {
        let alt = 90.0 - f64::from(step);
        let current = atm.extinction_mag(alt);
        assert!(current > previous, "extinction({alt}) = {current} not above {previous}");
        previous = current;
    }
}

#[test]
fn extinction_scales_with_coefficient_and_transparency() {
    let atm = model();
    assert_abs_diff_eq!(atm.extinction_mag(90.0), 0.20 * 0.9 * airmass(90.0), epsilon = 1e-12);
    assert_abs_diff_eq!(atm.apparent_magnitude(5.0, 0.0), 5.0 + 0.18 * 40.0, epsilon = 1e-12);
}

#[test]
fn seeing_degrades_with_airmass() {
    let atm = model();
    assert_abs_diff_eq!(atm.effective_seeing_arcsec(90.0), 2.0, epsilon = 1e-3);
    let x = airmass(30.0);
    assert_abs_diff_eq!(atm.effective_seeing_arcsec(30.0), 2.0 * x.powf(0.6), epsilon = 1e-12);
    assert!(atm.effective_seeing_arcsec(10.0) > atm.effective_seeing_arcsec(30.0));
}

#[test]
fn refraction_is_saemundsson_and_zero_near_horizon() {
    let atm = model();
    let r45 = atm.refraction_arcsec(45.0);
    assert!((r45 - 60.0).abs() < 1.5, "refraction at 45 deg = {r45}");
    assert!(atm.refraction_arcsec(5.0) > r45);
    assert_eq!(atm.refraction_arcsec(0.4), 0.0);
    assert_eq!(atm.refraction_arcsec(-3.0), 0.0);
    assert!(atm.refraction_arcsec(89.9) >= 0.0);
}

#[test]
fn colder_denser_air_refracts_more() {
    let warm = model();
    let cold = AtmosphericModel::new(AtmosphericConditions {
        temperature_c: -10.0,
        pressure_hpa: 1030.0,
        ..AtmosphericConditions::default()
    });
    assert!(cold.refraction_arcsec(20.0) > warm.refraction_arcsec(20.0));
}

#[test]
fn sky_background_brightens_toward_horizon() {
    let atm = model();
    assert_abs_diff_eq!(atm.sky_background(90.0), 21.0, epsilon = 1e-12);
    assert_abs_diff_eq!(atm.sky_background(0.0), 20.5, epsilon = 1e-12);
    assert!(atm.sky_background(30.0) < atm.sky_background(60.0));
}

#[test]
fn bortle_table_is_monotone_and_clamped() {
    assert_eq!(bortle_to_sky_background(1), 22.0);
    assert_eq!(bortle_to_sky_background(9), 16.5);
    assert_eq!(bortle_to_sky_background(0), bortle_to_sky_background(1));
    assert_eq!(bortle_to_sky_background(12), bortle_to_sky_background(9));
    for b in 1..9u8 {
        assert!(bortle_to_sky_background(b) > bortle_to_sky_background(b + 1));
    }
}

#[test]
fn fried_parameter_from_seeing() {
    let conditions = AtmosphericConditions::default();
    let r0 = conditions.fried_parameter_cm();
    assert!((r0 - 5.05).abs() < 0.1, "r0 = {r0}");
    let perfect = AtmosphericConditions {
        seeing_arcsec: 0.0,
        ..AtmosphericConditions::default()
    };
    assert_eq!(perfect.fried_parameter_cm(), 20.0);
}
