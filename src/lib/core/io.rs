use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use grep_cli::stdout;
use gzp::{deflate::Gzip, Compression, ZBuilder};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use termcolor::ColorChoice;

use super::fs::{is_gzipped, is_stdio};

/// Build a tab-delimited reader for a file or stdin (`-`).
///
/// Quoting is disabled: pileup base-quality strings contain literal `"` characters.
/// Rows may differ in length, column counts are validated by the record parsers.
pub fn get_reader<P: AsRef<Path>>(
    path: P,
    has_headers: bool,
) -> Result<csv::Reader<Box<dyn Read + Send>>> {
    let path = path.as_ref();
    let gzipped = is_gzipped(path);
    let raw_reader: Box<dyn Read + Send> = if is_stdio(path) {
        if gzipped {
            Box::new(MultiGzDecoder::new(io::stdin()))
        } else {
            Box::new(io::stdin())
        }
    } else {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let reader = BufReader::new(file);
        if gzipped {
            Box::new(MultiGzDecoder::new(reader))
        } else {
            Box::new(reader)
        }
    };

    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_reader(raw_reader))
}

/// Build a tab-delimited writer targeting a file or stdout (`-`).
///
/// Paths with a gzip extension are compressed on `threads` workers.
pub fn get_writer<P: AsRef<Path>>(
    path: P,
    write_headers: bool,
    threads: usize,
    compression_level: u32,
) -> Result<csv::Writer<Box<dyn Write>>> {
    let path = path.as_ref();
    let gzipped = is_gzipped(path);
    let raw_writer: Box<dyn Write> = if is_stdio(path) {
        let writer = stdout(ColorChoice::Never);
        if gzipped {
            Box::new(
                ZBuilder::<Gzip, _>::new()
                    .num_threads(threads)
                    .compression_level(Compression::new(compression_level))
                    .from_writer(writer),
            )
        } else {
            Box::new(writer)
        }
    } else {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let writer = BufWriter::new(file);
        if gzipped {
            Box::new(
                ZBuilder::<Gzip, _>::new()
                    .num_threads(threads)
                    .compression_level(Compression::new(compression_level))
                    .from_writer(writer),
            )
        } else {
            Box::new(writer)
        }
    };

    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(write_headers)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(raw_writer))
}
