//! Delimited-text catalog ingestion.
//!
//! Two layouts are accepted, identified by the header row:
//! `Name,RA_deg,Dec_deg,Vmag,BV` and `HIP,RA_deg,Dec_deg,Vmag,BV`.
//! Malformed rows are skipped and reported; they never abort the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use parallax_coords::EquatorialCoord;

use crate::CatalogError;
use crate::spatial::SpatialCatalog;
use crate::star::{SpectralClass, Star};

const FIELD_COUNT: usize = 5;

/// Supported CSV layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvFormat {
    /// `Name,RA_deg,Dec_deg,Vmag,BV`; ids are 1-based ordinals of the
    /// non-blank data rows. Rejected rows keep their ordinal, blank lines
    /// get none.
    BrightStar,
    /// `HIP,RA_deg,Dec_deg,Vmag,BV`; ids are Hipparcos numbers.
    Hipparcos,
}

impl CsvFormat {
    /// Identify the layout from the first header field.
    pub fn detect(header: &StringRecord) -> Option<Self> {
        let first = header.get(0)?.trim().trim_start_matches('\u{feff}');
        if first.eq_ignore_ascii_case("name") {
            Some(CsvFormat::BrightStar)
        } else if first.eq_ignore_ascii_case("hip") {
            Some(CsvFormat::Hipparcos)
        } else {
            None
        }
    }
}

/// A data row rejected during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub reason: String,
}

/// Stars parsed from one file plus the rows that were rejected.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub format: CsvFormat,
    pub stars: Vec<Star>,
    pub skipped: Vec<SkippedRow>,
}

impl CatalogLoad {
    pub fn into_catalog(self) -> SpatialCatalog {
        SpatialCatalog::from_stars(self.stars)
    }
}

/// Load a CSV catalog, detecting the layout from its header.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<CatalogLoad, CatalogError> {
    load_path(path.as_ref(), None)
}

/// Load a `Name,RA_deg,Dec_deg,Vmag,BV` catalog.
pub fn load_bright_star_csv<P: AsRef<Path>>(path: P) -> Result<CatalogLoad, CatalogError> {
    load_path(path.as_ref(), Some(CsvFormat::BrightStar))
}

/// Load a `HIP,RA_deg,Dec_deg,Vmag,BV` catalog.
pub fn load_hipparcos_csv<P: AsRef<Path>>(path: P) -> Result<CatalogLoad, CatalogError> {
    load_path(path.as_ref(), Some(CsvFormat::Hipparcos))
}

fn load_path(path: &Path, format: Option<CsvFormat>) -> Result<CatalogLoad, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let load = read_csv(file, format)?;
    tracing::info!(
        path = %path.display(),
        stars = load.stars.len(),
        skipped = load.skipped.len(),
        "loaded CSV catalog"
    );
    Ok(load)
}

/// Parse catalog rows from any reader. With `format == None` the layout is
/// taken from the header row.
pub fn read_csv<R: Read>(reader: R, format: Option<CsvFormat>) -> Result<CatalogLoad, CatalogError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header = reader.headers()?.clone();
    if header.iter().all(|field| field.is_empty()) {
        return Err(CatalogError::Empty);
    }
    let format = match format {
        Some(format) => format,
        None => CsvFormat::detect(&header)
            .ok_or_else(|| CatalogError::UnknownHeader(header.iter().collect::<Vec<_>>().join(",")))?,
    };

    let mut stars = Vec::new();
    let mut skipped = Vec::new();
    let mut data_rows = 0u64;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                skip(&mut skipped, line, err.to_string());
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        data_rows += 1;
        match parse_row(&record, format, data_rows) {
            Ok(star) => stars.push(star),
            Err(reason) => skip(&mut skipped, line, reason),
        }
    }

    if data_rows == 0 {
        return Err(CatalogError::Empty);
    }
    if stars.is_empty() {
        return Err(CatalogError::NoValidRows {
            skipped: skipped.len(),
        });
    }
    if !skipped.is_empty() {
        tracing::warn!(skipped = skipped.len(), "skipped malformed catalog rows");
    }

    Ok(CatalogLoad {
        format,
        stars,
        skipped,
    })
}

fn skip(skipped: &mut Vec<SkippedRow>, line: u64, reason: String) {
    tracing::warn!(line, %reason, "skipping catalog row");
    skipped.push(SkippedRow { line, reason });
}

fn parse_row(record: &StringRecord, format: CsvFormat, data_row: u64) -> Result<Star, String> {
    if record.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} fields, found {}",
            record.len()
        ));
    }
    let ra_deg = parse_f64(record, 1, "RA_deg")?;
    let dec_deg = parse_f64(record, 2, "Dec_deg")?;
    let v_mag = parse_f64(record, 3, "Vmag")?;
    let bv = parse_f64(record, 4, "BV")?;
    if !(-90.0..=90.0).contains(&dec_deg) {
        return Err(format!("declination {dec_deg} outside [-90, 90]"));
    }

    let label = &record[0];
    let (id, name) = match format {
        CsvFormat::BrightStar => (data_row, label.to_string()),
        CsvFormat::Hipparcos => {
            let hip: u32 = label
                .parse()
                .map_err(|_| format!("invalid HIP number `{label}`"))?;
            (u64::from(hip), format!("HIP {hip}"))
        }
    };

    let position = EquatorialCoord::from_degrees(ra_deg, dec_deg);
    let mut star = Star::new(id, position, v_mag)
        .with_spectral_class(SpectralClass::from_bv(bv))
        .with_color_bv(bv);
    if !name.is_empty() {
        star = star.with_name(name);
    }
    Ok(star)
}

fn parse_f64(record: &StringRecord, index: usize, column: &str) -> Result<f64, String> {
    let raw = &record[index];
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid {column} value `{raw}`"))
}
