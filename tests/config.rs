use std::fs;
use std::path::PathBuf;

use parallax::config::{
    ConfigError, ConditionsConfig, SimulationConfig, load_simulation, load_sites, load_telescopes,
};
use parallax::observatory::{Detector, ObservingSite, Telescope, TelescopeError};
use parallax::sim::site::{self, SiteError};
use parallax::sim::telescope::{self, TelescopeSelectError};
use tempfile::tempdir;

#[test]
fn bundled_sites_match_presets() {
    let sites = load_sites("configs/sites").expect("site configs");
    let names: Vec<&str> = sites.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Backyard Observatory", "Mauna Kea Observatory", "McDonald Observatory"],
        "directory entries load in file-name order"
    );

    for preset in ObservingSite::presets() {
        let loaded = site::select(&sites, Some(&preset.name)).expect("preset present");
        assert_eq!(loaded, preset);
    }
}

#[test]
fn bundled_telescopes_match_presets() {
    let telescopes = load_telescopes("configs/telescopes").expect("telescope configs");
    assert_eq!(telescopes.len(), 3);
    for preset in Telescope::presets() {
        let loaded = telescope::select(&telescopes, Some(&preset.name)).expect("preset present");
        assert_eq!(loaded, preset);
    }
    let refractor = telescopes
        .iter()
        .find(|t| t.name == "Generic Refractor")
        .expect("refractor");
    assert!(refractor.detector.is_none());
    assert_eq!(
        telescope::from_config(refractor).expect("valid").detector,
        Detector::default()
    );
}

#[test]
fn selection_is_case_insensitive_and_defaults_to_first() {
    let sites = load_sites("configs/sites").expect("site configs");
    let chosen = site::select(&sites, Some("mcdonald OBSERVATORY")).expect("case-insensitive");
    assert_eq!(chosen.timezone_offset_h, -6);
    assert_eq!(site::select(&sites, None).expect("default").name, "Backyard Observatory");

    assert!(matches!(
        site::select(&sites, Some("Arecibo")),
        Err(SiteError::NotFound(name)) if name == "Arecibo"
    ));
    assert!(matches!(site::select(&[], None), Err(SiteError::EmptyCatalog)));
    assert!(matches!(
        telescope::select(&[], Some("anything")),
        Err(TelescopeSelectError::EmptyCatalog)
    ));
}

#[test]
fn yaml_lists_and_defaults() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("sites.yaml");
    fs::write(
        &path,
        "- name: Atacama\n  latitude_deg: -24.6\n  longitude_deg: -70.4\n  conditions:\n    seeing_arcsec: 0.7\n- name: Sea Level\n  latitude_deg: 0.0\n  longitude_deg: 0.0\n",
    )
    .expect("write yaml");

    let sites = load_sites(&path).expect("yaml sites");
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].conditions.seeing_arcsec, 0.7);
    assert_eq!(sites[0].conditions.bortle_scale, ConditionsConfig::default().bortle_scale);
    assert_eq!(sites[1].elevation_m, 0.0);
    assert_eq!(sites[1].conditions, ConditionsConfig::default());
}

#[test]
fn single_toml_file_is_a_one_element_list() {
    let telescopes = load_telescopes("configs/telescopes/sct_8inch.toml").expect("single file");
    assert_eq!(telescopes.len(), 1);
    let detector = telescopes[0].detector.as_ref().expect("detector section");
    assert_eq!(detector.bit_depth, 12);
}

#[test]
fn detector_defaults_fill_optional_keys() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("scope.toml");
    fs::write(
        &path,
        "name = \"Minimal\"\naperture_mm = 80.0\nfocal_length_mm = 480.0\n\n[detector]\nname = \"Cam\"\npixel_width = 100\npixel_height = 100\npixel_size_um = 3.8\nread_noise_e = 2.0\ndark_current_e_s = 0.01\nquantum_efficiency = 0.8\n",
    )
    .expect("write toml");
    let config = &load_telescopes(&path).expect("toml")[0];
    assert_eq!(config.central_obstruction, 0.0);
    assert_eq!(config.reflectivity, 1.0);
    let detector = config.detector.as_ref().expect("detector");
    assert_eq!(detector.bit_depth, 16);
    assert_eq!(detector.gain, 1.0);
    assert!(!detector.is_cooled);
}

#[test]
fn invalid_telescopes_are_rejected_on_conversion() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "name = \"Broken\"\naperture_mm = 0.0\nfocal_length_mm = 500.0\n")
        .expect("write toml");
    let configs = load_telescopes(&path).expect("parses fine");
    match telescope::select(&configs, None) {
        Err(TelescopeSelectError::Invalid { name, source }) => {
            assert_eq!(name, "Broken");
            assert_eq!(source, TelescopeError::InvalidAperture(0.0));
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn simulation_config_reads_toml_and_yaml() {
    let bundled = load_simulation("configs/simulation.toml").expect("bundled run config");
    assert_eq!(bundled.universe_seed, 0xDEAD_BEEF);
    assert_eq!(bundled.catalog_path, Some(PathBuf::from("data/catalogs/bright_stars.csv")));
    assert_eq!(bundled.start_epoch.as_deref(), Some("2024-11-15 18:00:00"));

    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("run.yaml");
    fs::write(&path, "universe_seed: 7\nexposure_s: 300\n").expect("write yaml");
    let partial = load_simulation(&path).expect("yaml run config");
    assert_eq!(partial.universe_seed, 7);
    assert_eq!(partial.exposure_s, 300.0);
    assert_eq!(partial.camera_fov_deg, SimulationConfig::default().camera_fov_deg);
    assert_eq!(partial.catalog_path, None);
}

#[test]
fn loader_errors_are_typed() {
    assert!(matches!(load_simulation("configs/missing.toml"), Err(ConfigError::Io(_))));

    let dir = tempdir().expect("temp dir");
    let toml_path = dir.path().join("bad.toml");
    fs::write(&toml_path, "name = \n").expect("write");
    assert!(matches!(load_sites(&toml_path), Err(ConfigError::Toml(_))));

    let yaml_path = dir.path().join("bad.yaml");
    fs::write(&yaml_path, "- name: [unterminated\n").expect("write");
    assert!(matches!(load_sites(&yaml_path), Err(ConfigError::Parse(_))));
}
