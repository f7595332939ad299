//! Observing sites: where the telescope stands and what the sky is like there.

use parallax_atmosphere::AtmosphericConditions;
use parallax_coords::ObserverLocation;

/// Geographic site plus its typical atmospheric conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservingSite {
    pub name: String,
    pub latitude_deg: f64,
    /// East-positive longitude.
    pub longitude_deg: f64,
    pub elevation_m: f64,
    /// Offset from UTC in hours.
    pub timezone_offset_h: i32,
    pub conditions: AtmosphericConditions,
}

impl Default for ObservingSite {
    fn default() -> Self {
        Self {
            name: "Default Observatory".to_string(),
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            elevation_m: 0.0,
            timezone_offset_h: 0,
            conditions: AtmosphericConditions::default(),
        }
    }
}

impl ObservingSite {
    /// Site location in radians for the coordinate transforms.
    pub fn location(&self) -> ObserverLocation {
        ObserverLocation::from_degrees(self.latitude_deg, self.longitude_deg)
    }

    /// Dark-sky summit observatory on Hawaii.
    pub fn mauna_kea() -> Self {
        Self {
            name: "Mauna Kea Observatory".to_string(),
            latitude_deg: 19.8207,
            longitude_deg: -155.4681,
            elevation_m: 4205.0,
            timezone_offset_h: -10,
            conditions: AtmosphericConditions {
                seeing_arcsec: 0.5,
                extinction_coeff: 0.10,
                bortle_scale: 1,
                transparency: 0.98,
                ..AtmosphericConditions::default()
            },
        }
    }

    /// Mount Locke, west Texas.
    pub fn mcdonald() -> Self {
        Self {
            name: "McDonald Observatory".to_string(),
            latitude_deg: 30.6714,
            longitude_deg: -104.0225,
            elevation_m: 2070.0,
            timezone_offset_h: -6,
            conditions: AtmosphericConditions {
                seeing_arcsec: 1.2,
                extinction_coeff: 0.15,
                bortle_scale: 2,
                transparency: 0.95,
                ..AtmosphericConditions::default()
            },
        }
    }

    /// Light-polluted suburban garden.
    pub fn backyard() -> Self {
        Self {
            name: "Backyard Observatory".to_string(),
            latitude_deg: 51.5,
            longitude_deg: -0.1,
            elevation_m: 10.0,
            timezone_offset_h: 0,
            conditions: AtmosphericConditions {
                seeing_arcsec: 3.0,
                extinction_coeff: 0.30,
                bortle_scale: 7,
                transparency: 0.75,
                ..AtmosphericConditions::default()
            },
        }
    }

    pub fn presets() -> Vec<ObservingSite> {
        vec![Self::mauna_kea(), Self::mcdonald(), Self::backyard()]
    }
}
