//! `.plxcat` binary star catalog.
//!
//! Layout (little-endian):
//!
//! 1. **Header** (64 bytes): magic `PLX_CAT\0`, `u32` version, `u64` entry
//!    count, `u32` entry size, `u32` HEALPix nside, `u64` index offset,
//!    `u64` data offset, zero padding.
//! 2. **Index** (`12·nside² × 16` bytes): one `(u64 offset, u32 count,
//!    u32 reserved)` entry per nested pixel, in pixel order. `offset` is the
//!    absolute file offset of the pixel's first record.
//! 3. **Records** (32 bytes each), grouped by pixel.
//!
//! Files are read whole into memory.

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use half::f16;
use parallax_coords::EquatorialCoord;
use thiserror::Error;

use crate::star::{SpectralClass, Star, distance_modulus};

pub mod healpix;

pub const MAGIC: &[u8; 8] = b"PLX_CAT\0";
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 64;
pub const ENTRY_SIZE: u32 = 32;
pub const INDEX_ENTRY_SIZE: usize = 16;
/// Default HEALPix resolution (~0.46° pixels).
pub const DEFAULT_NSIDE: u32 = 128;

/// Star is flagged as photometrically variable.
pub const FLAG_VARIABLE: u8 = 1 << 0;
/// Star was procedurally generated.
pub const FLAG_PROCEDURAL: u8 = 1 << 1;
/// Parallax field carries a measurement.
pub const FLAG_HAS_PARALLAX: u8 = 1 << 2;

const MILLIMAG: f64 = 1_000.0;

/// Errors raised while encoding or decoding `.plxcat` files.
#[derive(Debug, Error)]
pub enum PlxCatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a .plxcat file (bad magic)")]
    BadMagic,
    #[error("unsupported .plxcat version {0}")]
    UnsupportedVersion(u32),
    #[error("unexpected record size {0} (expected {ENTRY_SIZE})")]
    BadEntrySize(u32),
    #[error("invalid HEALPix nside {0}")]
    InvalidNside(u32),
    #[error("file truncated: need {expected} bytes, found {actual}")]
    Truncated { expected: u64, actual: u64 },
    #[error("index section does not fit between header and data")]
    BadLayout,
    #[error("pixel {0} outside the index")]
    PixelOutOfRange(u64),
    #[error("star id {0} does not fit the 32-bit source id field")]
    SourceIdOverflow(u64),
    #[error("magnitude {0} outside the fixed-point range")]
    MagnitudeOutOfRange(f64),
}

/// Decoded file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlxCatHeader {
    pub version: u32,
    pub entry_count: u64,
    pub entry_size: u32,
    pub healpix_nside: u32,
    pub index_offset: u64,
    pub data_offset: u64,
}

impl PlxCatHeader {
    /// Header for `entry_count` records at resolution `nside`.
    pub fn new(entry_count: u64, nside: u32) -> Result<Self, PlxCatError> {
        if !healpix::is_valid_nside(nside) {
            return Err(PlxCatError::InvalidNside(nside));
        }
        let index_offset = HEADER_SIZE as u64;
        let data_offset = index_offset + healpix::npix(nside) * INDEX_ENTRY_SIZE as u64;
        Ok(Self {
            version: VERSION,
            entry_count,
            entry_size: ENTRY_SIZE,
            healpix_nside: nside,
            index_offset,
            data_offset,
        })
    }

    pub fn npix(&self) -> u64 {
        healpix::npix(self.healpix_nside)
    }

    /// Total file length implied by the header, or `None` if it overflows.
    pub fn checked_len(&self) -> Option<u64> {
        self.entry_count
            .checked_mul(u64::from(self.entry_size))?
            .checked_add(self.data_offset)
    }

    /// Total file length implied by the header, saturating at `u64::MAX`.
    pub fn expected_len(&self) -> u64 {
        self.checked_len().unwrap_or(u64::MAX)
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..8].copy_from_slice(MAGIC);
        LittleEndian::write_u32(&mut bytes[8..12], self.version);
        LittleEndian::write_u64(&mut bytes[12..20], self.entry_count);
        LittleEndian::write_u32(&mut bytes[20..24], self.entry_size);
        LittleEndian::write_u32(&mut bytes[24..28], self.healpix_nside);
        LittleEndian::write_u64(&mut bytes[28..36], self.index_offset);
        LittleEndian::write_u64(&mut bytes[36..44], self.data_offset);
        bytes
    }

    /// Decode and validate a header from the start of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, PlxCatError> {
        if bytes.len() < HEADER_SIZE {
            return Err(PlxCatError::Truncated {
                expected: HEADER_SIZE as u64,
                actual: bytes.len() as u64,
            });
        }
        if &bytes[..8] != MAGIC {
            return Err(PlxCatError::BadMagic);
        }
        let mut cursor = Cursor::new(&bytes[8..HEADER_SIZE]);
        let header = Self {
            version: cursor.read_u32::<LittleEndian>()?,
            entry_count: cursor.read_u64::<LittleEndian>()?,
            entry_size: cursor.read_u32::<LittleEndian>()?,
            healpix_nside: cursor.read_u32::<LittleEndian>()?,
            index_offset: cursor.read_u64::<LittleEndian>()?,
            data_offset: cursor.read_u64::<LittleEndian>()?,
        };
        if header.version != VERSION {
            return Err(PlxCatError::UnsupportedVersion(header.version));
        }
        if header.entry_size != ENTRY_SIZE {
            return Err(PlxCatError::BadEntrySize(header.entry_size));
        }
        if !healpix::is_valid_nside(header.healpix_nside) {
            return Err(PlxCatError::InvalidNside(header.healpix_nside));
        }
        let index_end = header
            .index_offset
            .checked_add(header.npix() * INDEX_ENTRY_SIZE as u64)
            .ok_or(PlxCatError::BadLayout)?;
        if header.index_offset < HEADER_SIZE as u64 || index_end > header.data_offset {
            return Err(PlxCatError::BadLayout);
        }
        if header.checked_len().is_none() {
            return Err(PlxCatError::BadLayout);
        }
        Ok(header)
    }
}

/// Write `stars` to `writer`, grouped by nested HEALPix pixel.
pub fn write_plxcat<W: Write>(
    writer: &mut W,
    stars: &[Star],
    nside: u32,
) -> Result<PlxCatHeader, PlxCatError> {
    let header = PlxCatHeader::new(stars.len() as u64, nside)?;

    let mut keyed: Vec<(u64, &Star)> = stars
        .iter()
        .map(|s| (healpix::ang2pix_nest(nside, s.position.ra, s.position.dec), s))
        .collect();
    keyed.sort_by_key(|(pixel, _)| *pixel);

    let mut counts = vec![0u32; header.npix() as usize];
    for (pixel, _) in &keyed {
        counts[*pixel as usize] += 1;
    }

    writer.write_all(&header.encode())?;
    let mut offset = header.data_offset;
    for count in &counts {
        writer.write_u64::<LittleEndian>(offset)?;
        writer.write_u32::<LittleEndian>(*count)?;
        writer.write_u32::<LittleEndian>(0)?;
        offset += u64::from(*count) * u64::from(ENTRY_SIZE);
    }
    for (_, star) in &keyed {
        write_record(writer, star)?;
    }
    writer.flush()?;
    Ok(header)
}

/// Write a `.plxcat` file, creating parent directories as needed.
pub fn write_plxcat_file<P: AsRef<Path>>(
    path: P,
    stars: &[Star],
    nside: u32,
) -> Result<PlxCatHeader, PlxCatError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_plxcat(&mut writer, stars, nside)
}

fn write_record<W: Write>(writer: &mut W, star: &Star) -> Result<(), PlxCatError> {
    let source_id = u32::try_from(star.id).map_err(|_| PlxCatError::SourceIdOverflow(star.id))?;
    let mut flags = 0u8;
    if star.is_variable {
        flags |= FLAG_VARIABLE;
    }
    if star.is_procedural {
        flags |= FLAG_PROCEDURAL;
    }
    if star.parallax_mas > 0.0 {
        flags |= FLAG_HAS_PARALLAX;
    }
    writer.write_f64::<LittleEndian>(star.position.ra)?;
    writer.write_f64::<LittleEndian>(star.position.dec)?;
    writer.write_i16::<LittleEndian>(to_millimag(star.v_magnitude)?)?;
    writer.write_i16::<LittleEndian>(to_millimag(star.color_bv)?)?;
    writer.write_u16::<LittleEndian>(f16::from_f64(star.parallax_mas).to_bits())?;
    writer.write_u8(star.spectral_class.code())?;
    writer.write_u8(flags)?;
    writer.write_u32::<LittleEndian>(source_id)?;
    writer.write_u32::<LittleEndian>(0)?;
    Ok(())
}

fn to_millimag(value: f64) -> Result<i16, PlxCatError> {
    let scaled = (value * MILLIMAG).round();
    if scaled < f64::from(i16::MIN) || scaled > f64::from(i16::MAX) || !scaled.is_finite() {
        return Err(PlxCatError::MagnitudeOutOfRange(value));
    }
    Ok(scaled as i16)
}

/// In-memory `.plxcat` image with a validated header.
#[derive(Debug, Clone)]
pub struct PlxCatReader {
    header: PlxCatHeader,
    bytes: Vec<u8>,
}

impl PlxCatReader {
    /// Read and validate a `.plxcat` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PlxCatError> {
        Self::from_bytes(fs::read(path)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, PlxCatError> {
        let header = PlxCatHeader::decode(&bytes)?;
        let expected = header.expected_len();
        if (bytes.len() as u64) < expected {
            return Err(PlxCatError::Truncated {
                expected,
                actual: bytes.len() as u64,
            });
        }
        Ok(Self { header, bytes })
    }

    pub fn header(&self) -> &PlxCatHeader {
        &self.header
    }

    /// Records stored under one nested pixel.
    pub fn stars_in_pixel(&self, pixel: u64) -> Result<Vec<Star>, PlxCatError> {
        if pixel >= self.header.npix() {
            return Err(PlxCatError::PixelOutOfRange(pixel));
        }
        let entry_at = self.header.index_offset as usize + pixel as usize * INDEX_ENTRY_SIZE;
        let mut cursor = Cursor::new(&self.bytes[entry_at..entry_at + INDEX_ENTRY_SIZE]);
        let offset = cursor.read_u64::<LittleEndian>()?;
        let count = cursor.read_u32::<LittleEndian>()?;
        let end = offset
            .checked_add(u64::from(count) * u64::from(ENTRY_SIZE))
            .unwrap_or(u64::MAX);
        if offset < self.header.data_offset || end > self.bytes.len() as u64 {
            return Err(PlxCatError::Truncated {
                expected: end,
                actual: self.bytes.len() as u64,
            });
        }
        self.bytes[offset as usize..end as usize]
            .chunks_exact(ENTRY_SIZE as usize)
            .map(decode_record)
            .collect()
    }

    /// Every record, walking the pixel index in order.
    pub fn stars(&self) -> Result<Vec<Star>, PlxCatError> {
        let mut stars = Vec::with_capacity(self.header.entry_count as usize);
        for pixel in 0..self.header.npix() {
            stars.extend(self.stars_in_pixel(pixel)?);
        }
        Ok(stars)
    }
}

/// Read every star from a `.plxcat` file.
pub fn read_plxcat<P: AsRef<Path>>(path: P) -> Result<Vec<Star>, PlxCatError> {
    PlxCatReader::open(path)?.stars()
}

fn decode_record(bytes: &[u8]) -> Result<Star, PlxCatError> {
    let mut cursor = Cursor::new(bytes);
    let ra = cursor.read_f64::<LittleEndian>()?;
    let dec = cursor.read_f64::<LittleEndian>()?;
    let v_magnitude = f64::from(cursor.read_i16::<LittleEndian>()?) / MILLIMAG;
    let color_bv = f64::from(cursor.read_i16::<LittleEndian>()?) / MILLIMAG;
    let parallax_mas = f16::from_bits(cursor.read_u16::<LittleEndian>()?).to_f64();
    let class = SpectralClass::from_code(cursor.read_u8()?);
    let flags = cursor.read_u8()?;
    let source_id = cursor.read_u32::<LittleEndian>()?;

    let mut star = Star::new(u64::from(source_id), EquatorialCoord::new(ra, dec), v_magnitude)
        .with_spectral_class(class)
        .with_color_bv(color_bv);
    if flags & FLAG_HAS_PARALLAX != 0 && parallax_mas > 0.0 {
        star.parallax_mas = parallax_mas;
        star.distance_pc = 1_000.0 / parallax_mas;
        star.abs_magnitude = v_magnitude - distance_modulus(star.distance_pc);
    }
    star.is_variable = flags & FLAG_VARIABLE != 0;
    star.is_procedural = flags & FLAG_PROCEDURAL != 0;
    Ok(star)
}
