//! Stellar data model.

use parallax_coords::EquatorialCoord;

/// Morgan-Keenan spectral class, plus brown dwarfs and Wolf-Rayet stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpectralClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
    L,
    T,
    Y,
    WR,
    #[default]
    Unknown,
}

impl SpectralClass {
    const ALL: [SpectralClass; 12] = [
        SpectralClass::O,
        SpectralClass::B,
        SpectralClass::A,
        SpectralClass::F,
        SpectralClass::G,
        SpectralClass::K,
        SpectralClass::M,
        SpectralClass::L,
        SpectralClass::T,
        SpectralClass::Y,
        SpectralClass::WR,
        SpectralClass::Unknown,
    ];

    /// Approximate effective temperature in kelvin.
    pub fn effective_temperature_k(self) -> f64 {
        match self {
            SpectralClass::O => 40_000.0,
            SpectralClass::B => 20_000.0,
            SpectralClass::A => 8_500.0,
            SpectralClass::F => 6_500.0,
            SpectralClass::G => 5_500.0,
            SpectralClass::K => 4_000.0,
            SpectralClass::M => 3_000.0,
            SpectralClass::L => 1_700.0,
            SpectralClass::T => 900.0,
            SpectralClass::Y => 400.0,
            SpectralClass::WR => 50_000.0,
            SpectralClass::Unknown => 5_778.0,
        }
    }

    /// Typical main-sequence B−V colour index.
    pub fn typical_bv(self) -> f64 {
        match self {
            SpectralClass::O => -0.30,
            SpectralClass::B => -0.18,
            SpectralClass::A => 0.05,
            SpectralClass::F => 0.45,
            SpectralClass::G => 0.65,
            SpectralClass::K => 1.10,
            SpectralClass::M => 1.55,
            SpectralClass::L | SpectralClass::T | SpectralClass::Y => 2.0,
            SpectralClass::WR => -0.25,
            SpectralClass::Unknown => 0.65,
        }
    }

    /// Main-sequence absolute V magnitude anchor.
    pub fn absolute_magnitude_anchor(self) -> f64 {
        match self {
            SpectralClass::O => -5.0,
            SpectralClass::B => -1.5,
            SpectralClass::A => 2.0,
            SpectralClass::F => 3.5,
            SpectralClass::G => 5.0,
            SpectralClass::K => 6.5,
            SpectralClass::M => 9.0,
            SpectralClass::L => 14.0,
            _ => 5.0,
        }
    }

    /// Rough class estimate from a B−V colour index.
    pub fn from_bv(bv: f64) -> Self {
        if !bv.is_finite() {
            SpectralClass::Unknown
        } else if bv < -0.25 {
            SpectralClass::O
        } else if bv < -0.02 {
            SpectralClass::B
        } else if bv < 0.30 {
            SpectralClass::A
        } else if bv < 0.58 {
            SpectralClass::F
        } else if bv < 0.81 {
            SpectralClass::G
        } else if bv < 1.40 {
            SpectralClass::K
        } else {
            SpectralClass::M
        }
    }

    /// One-byte code used by the binary catalog format.
    pub fn code(self) -> u8 {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(11) as u8
    }

    /// Inverse of [`SpectralClass::code`]; unknown codes map to `Unknown`.
    pub fn from_code(code: u8) -> Self {
        Self::ALL
            .get(code as usize)
            .copied()
            .unwrap_or(SpectralClass::Unknown)
    }

    /// Single-letter label (`WR` for Wolf-Rayet, `?` when unknown).
    pub fn label(self) -> &'static str {
        match self {
            SpectralClass::O => "O",
            SpectralClass::B => "B",
            SpectralClass::A => "A",
            SpectralClass::F => "F",
            SpectralClass::G => "G",
            SpectralClass::K => "K",
            SpectralClass::M => "M",
            SpectralClass::L => "L",
            SpectralClass::T => "T",
            SpectralClass::Y => "Y",
            SpectralClass::WR => "WR",
            SpectralClass::Unknown => "?",
        }
    }
}

/// Linear RGB triple in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Blackbody colour approximation (Tanner Helland fit), temperature clamped
/// to 1000..40000 K.
pub fn blackbody_colour(temperature_k: f64) -> Colour {
    let t = temperature_k.clamp(1_000.0, 40_000.0) / 100.0;
    let r = if t <= 66.0 {
        1.0
    } else {
        329.698_727_446 * (t - 60.0).powf(-0.133_204_759_2) / 255.0
    };
    let g = if t <= 66.0 {
        (99.470_802_586_1 * t.ln() - 161.119_568_166_1) / 255.0
    } else {
        288.122_169_528_3 * (t - 60.0).powf(-0.075_514_849_2) / 255.0
    };
    let b = if t >= 66.0 {
        1.0
    } else if t <= 19.0 {
        0.0
    } else {
        (138.517_731_223_1 * (t - 10.0).ln() - 305.044_792_730_7) / 255.0
    };
    let unit = |v: f64| v.clamp(0.0, 1.0) as f32;
    Colour {
        r: unit(r),
        g: unit(g),
        b: unit(b),
    }
}

/// A single catalog or generated star.
///
/// When `distance_pc > 0`, `parallax_mas == 1000 / distance_pc` and
/// `abs_magnitude` follows from the distance modulus.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub id: u64,
    pub name: Option<String>,
    pub position: EquatorialCoord,
    /// Distance in parsecs; 0 when unknown.
    pub distance_pc: f64,
    pub v_magnitude: f64,
    pub abs_magnitude: f64,
    pub parallax_mas: f64,
    pub spectral_class: SpectralClass,
    /// B−V colour index.
    pub color_bv: f64,
    pub proper_motion_ra_mas_yr: f64,
    pub proper_motion_dec_mas_yr: f64,
    pub is_variable: bool,
    pub is_procedural: bool,
}

impl Star {
    /// A star of unknown distance and class.
    pub fn new(id: u64, position: EquatorialCoord, v_magnitude: f64) -> Self {
        Self {
            id,
            name: None,
            position,
            distance_pc: 0.0,
            v_magnitude,
            abs_magnitude: 0.0,
            parallax_mas: 0.0,
            spectral_class: SpectralClass::Unknown,
            color_bv: SpectralClass::Unknown.typical_bv(),
            proper_motion_ra_mas_yr: 0.0,
            proper_motion_dec_mas_yr: 0.0,
            is_variable: false,
            is_procedural: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the class and adopt its typical colour.
    pub fn with_spectral_class(mut self, class: SpectralClass) -> Self {
        self.spectral_class = class;
        self.color_bv = class.typical_bv();
        self
    }

    pub fn with_color_bv(mut self, bv: f64) -> Self {
        self.color_bv = bv;
        self
    }

    /// Set distance, deriving parallax and absolute magnitude from it.
    /// Non-positive distances leave the star at unknown distance.
    pub fn with_distance(mut self, distance_pc: f64) -> Self {
        if distance_pc > 0.0 {
            self.distance_pc = distance_pc;
            self.parallax_mas = 1_000.0 / distance_pc;
            self.abs_magnitude = self.v_magnitude - distance_modulus(distance_pc);
        } else {
            self.distance_pc = 0.0;
            self.parallax_mas = 0.0;
        }
        self
    }

    /// Display name, falling back to the numeric id.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("#{}", self.id))
    }

    /// Colour from the effective temperature of the spectral class.
    pub fn colour(&self) -> Colour {
        blackbody_colour(self.spectral_class.effective_temperature_k())
    }

    /// Angular diameter in milliarcseconds for a radius in solar radii;
    /// 0 when the distance is unknown.
    pub fn angular_diameter_mas(&self, radius_solar: f64) -> f64 {
        if self.distance_pc <= 0.0 {
            return 0.0;
        }
        let radians = 2.0 * radius_solar * 6.957e8 / (self.distance_pc * 3.086e16);
        radians.to_degrees() * 3.6e6
    }
}

/// Distance modulus `m − M = 5 log10(d / 10)`.
#[inline]
pub fn distance_modulus(distance_pc: f64) -> f64 {
    5.0 * (distance_pc / 10.0).log10()
}
