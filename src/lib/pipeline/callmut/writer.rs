//! Profile output.

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::core::io::get_writer;
use crate::profile::{profile_header, PositionRecord};

/// Writes [`PositionRecord`]s as profile lines.
///
/// The header is derived from the first record (with or without the size-class
/// columns). A profile with no records still gets a header.
pub struct ProfileWriter<W: Write> {
    inner: csv::Writer<W>,
    rows: u64,
}

impl ProfileWriter<Box<dyn Write>> {
    /// Open a file (or stdout for `-`); gzip paths are compressed.
    pub fn to_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(get_writer(path, true, 1, 6)?))
    }
}

impl<W: Write> ProfileWriter<W> {
    /// Wrap a writer whose `has_headers` is enabled.
    pub fn new(inner: csv::Writer<W>) -> Self {
        Self { inner, rows: 0 }
    }

    pub fn write(&mut self, record: &PositionRecord) -> Result<()> {
        self.inner.serialize(record.as_row())?;
        self.rows += 1;
        Ok(())
    }

    /// Flush, writing a bare header first if nothing was written.
    pub fn finish(mut self, with_size_classes: bool) -> Result<W> {
        if self.rows == 0 {
            self.inner.write_record(profile_header(with_size_classes))?;
        }
        self.inner.flush()?;
        Ok(self.inner.into_inner().map_err(|e| e.into_error())?)
    }
}
