//! samtools mpileup lines.

use crate::core::error::{MprofileError, Result};

/// Minimum number of columns: chromosome, coordinate, reference base, readcount, call-string.
pub const PILEUP_MIN_COLUMNS: usize = 5;

/// The first sample of one mpileup line, borrowed from the parsed record.
///
/// Base qualities and any further samples are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PileupLine<'a> {
    pub chromosome: &'a str,
    pub coordinate: u64,
    pub reference_base: &'a str,
    pub readcount: u32,
    pub call_string: &'a str,
}

impl<'a> PileupLine<'a> {
    /// Parse the fields of one tab-split line; `line` is 1-based for error messages.
    pub fn from_fields(record: &'a csv::StringRecord, line: u64) -> Result<Self> {
        if record.len() < PILEUP_MIN_COLUMNS {
            return Err(MprofileError::parse(
                line,
                format!(
                    "expected at least {} pileup columns, found {}",
                    PILEUP_MIN_COLUMNS,
                    record.len()
                ),
            ));
        }

        let coordinate = record[1].trim().parse::<u64>().map_err(|_| {
            MprofileError::parse(line, format!("invalid coordinate '{}'", &record[1]))
        })?;
        let readcount = record[3].trim().parse::<u32>().map_err(|_| {
            MprofileError::parse(line, format!("invalid readcount '{}'", &record[3]))
        })?;

        Ok(PileupLine {
            chromosome: &record[0],
            coordinate,
            reference_base: &record[2],
            readcount,
            call_string: &record[4],
        })
    }
}
