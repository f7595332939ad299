//! Export helpers for render lists (CSV) and session reports (JSON).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod render {
    use std::io::{self, Write};

    use serde::Serialize;

    pub use crate::writer_for_path;

    const HEADER: &str = "tick,jd,star_id,x,y,brightness,color_bv";

    /// One screen-space star handed to the renderer. `x`/`y` lie in [-1, 1],
    /// `brightness` in [0, 1].
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct RenderRecord {
        pub x: f32,
        pub y: f32,
        pub brightness: f32,
        pub color_bv: f32,
    }

    /// Write the render CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row: a render record tagged with its frame and source star.
    #[derive(Debug, Clone, Copy, Serialize)]
    pub struct Row {
        pub tick: usize,
        pub jd: f64,
        pub star_id: u64,
        #[serde(flatten)]
        pub record: RenderRecord,
    }

    impl Row {
        /// Serialize the row in header order.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{:.6},{},{:.5},{:.5},{:.5},{:.3}",
                self.tick,
                self.jd,
                self.star_id,
                self.record.x,
                self.record.y,
                self.record.brightness,
                self.record.color_bv,
            )
        }
    }

    /// Header followed by every row.
    pub fn write_csv<I>(writer: &mut dyn Write, rows: I) -> io::Result<()>
    where
        I: IntoIterator<Item = Row>,
    {
        write_header(writer)?;
        for row in rows {
            row.write_to(writer)?;
        }
        writer.flush()
    }
}

pub mod report {
    use std::io::{self, Write};
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use crate::writer_for_path;

    /// Pretty-print `value` as JSON to `path` (`-` for stdout).
    pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()
    }
}
