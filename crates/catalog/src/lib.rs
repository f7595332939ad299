//! Star records, the spatial catalog, and catalog file formats.

use std::path::PathBuf;

use thiserror::Error;

pub mod builtin;
pub mod ingest;
pub mod plxcat;
pub mod spatial;
pub mod star;

pub use builtin::BUILTIN_STAR_COUNT;
pub use ingest::{
    CatalogLoad, CsvFormat, SkippedRow, load_bright_star_csv, load_csv, load_hipparcos_csv,
    read_csv,
};
pub use plxcat::{PlxCatError, PlxCatHeader, PlxCatReader, read_plxcat, write_plxcat_file};
pub use spatial::{NO_MAGNITUDE_LIMIT, SpatialCatalog};
pub use star::{Colour, SpectralClass, Star, blackbody_colour, distance_modulus};

/// Errors surfaced while ingesting catalog files.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog contains no data rows")]
    Empty,
    #[error("unrecognised catalog header `{0}`")]
    UnknownHeader(String),
    #[error("no valid stars found ({skipped} rows skipped)")]
    NoValidRows { skipped: usize },
    #[error(transparent)]
    Binary(#[from] PlxCatError),
}

/// Load a catalog file, choosing the reader from the extension
/// (`.plxcat` binary, anything else CSV). Rejected CSV rows are returned
/// alongside the catalog.
pub fn load_catalog_file<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<(SpatialCatalog, Vec<SkippedRow>), CatalogError> {
    let path = path.as_ref();
    let is_binary = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("plxcat"))
        .unwrap_or(false);
    if is_binary {
        let stars = read_plxcat(path)?;
        tracing::info!(path = %path.display(), stars = stars.len(), "loaded binary catalog");
        return Ok((SpatialCatalog::from_stars(stars), Vec::new()));
    }
    let CatalogLoad { stars, skipped, .. } = load_csv(path)?;
    Ok((SpatialCatalog::from_stars(stars), skipped))
}
