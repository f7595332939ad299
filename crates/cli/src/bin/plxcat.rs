//! Convert CSV catalogs to the `.plxcat` binary format and inspect the result.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use parallax::catalog::plxcat::DEFAULT_NSIDE;
use parallax::catalog::{PlxCatReader, load_csv, write_plxcat_file};

#[path = "shared/logging.rs"]
mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "PLX_CAT binary catalog tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a CSV catalog (bright-star or Hipparcos layout) to .plxcat
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// HEALPix resolution (power of two)
        #[arg(long, default_value_t = DEFAULT_NSIDE)]
        nside: u32,
    },
    /// Print the header and the brightest records of a .plxcat file
    Inspect {
        path: PathBuf,
        /// Number of records to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    match Cli::parse().command {
        Command::Convert {
            input,
            output,
            nside,
        } => {
            let load = load_csv(&input).with_context(|| format!("reading {}", input.display()))?;
            let header = write_plxcat_file(&output, &load.stars, nside)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Wrote {} stars ({} rows skipped) to {} [nside {}, {} pixels]",
                header.entry_count,
                load.skipped.len(),
                output.display(),
                header.healpix_nside,
                header.npix()
            );
        }
        Command::Inspect { path, top } => {
            let reader =
                PlxCatReader::open(&path).with_context(|| format!("opening {}", path.display()))?;
            let header = reader.header();
            println!("File: {}", path.display());
            println!("  Version: {}", header.version);
            println!("  Entries: {}", header.entry_count);
            println!("  Entry size: {} bytes", header.entry_size);
            println!("  HEALPix nside: {} ({} pixels)", header.healpix_nside, header.npix());
            println!("  Index offset: {}", header.index_offset);
            println!("  Data offset: {}", header.data_offset);

            let mut stars = reader.stars()?;
            stars.sort_by(|a, b| a.v_magnitude.total_cmp(&b.v_magnitude));
            for star in stars.iter().take(top) {
                println!(
                    "  {:<20} RA {:>8.3}  Dec {:>+8.3}  V {:>6.2}  {}",
                    star.display_name(),
                    star.position.ra_deg(),
                    star.position.dec_deg(),
                    star.v_magnitude,
                    star.spectral_class.label()
                );
            }
        }
    }
    Ok(())
}
