//! Batch driver for `callmut`.
//!
//! Reads one stream (sample only) or two line-synchronized streams (control and
//! sample) in chunks of `chunksize` positions, profiles each chunk on the
//! global Rayon pool and writes the results in input order before reading the
//! next chunk. Lines are paired strictly by position in their files; pairing
//! stops silently at the end of the shorter stream.

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::writer::ProfileWriter;
use crate::core::fs::make_parent_dirs;
use crate::core::io::get_reader;
use crate::decode::{Decoder, PileupLine};
use crate::diff::difference;
use crate::profile::{IndelCutoff, PositionRecord};

/// Default number of positions profiled per parallel batch.
pub const CHUNKSIZE: usize = 100_000;

lazy_static! {
    /// [`CHUNKSIZE`] as a string.
    pub static ref CHUNKSIZE_STR: String = CHUNKSIZE.to_string();
}

/// What the input streams contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// samtools mpileup lines, decoded here.
    Pileup,
    /// Profiles written by an earlier run, one header line each.
    Profile,
}

/// Counts reported at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Output lines written.
    pub positions: u64,
    /// Positions whose reference base is not A/C/G/T; their transition and
    /// transversion rates are zero.
    pub non_canonical_reference: u64,
}

type RecordReader = csv::Reader<Box<dyn Read + Send>>;

struct Inputs {
    sample: RecordReader,
    control: Option<RecordReader>,
}

/// One position's worth of input lines.
struct LinePair {
    control: Option<csv::StringRecord>,
    sample: csv::StringRecord,
}

/// A configured `callmut` run.
#[derive(Clone, Debug)]
pub struct ProfileJob {
    sample: PathBuf,
    control: Option<PathBuf>,
    input_kind: InputKind,
    decoder: Decoder,
    chunksize: usize,
}

impl ProfileJob {
    /// `decoder.cutoff()` is the cutoff applied to reported indels: to decoded
    /// indels without a control, to the differential indels otherwise.
    ///
    /// Profile input requires a control.
    pub fn new(
        sample: PathBuf,
        control: Option<PathBuf>,
        input_kind: InputKind,
        decoder: Decoder,
        chunksize: Option<usize>,
    ) -> Result<Self> {
        if input_kind == InputKind::Profile && control.is_none() {
            return Err(anyhow!(
                "Pre-decoded profile input needs a control profile to calculate a differential"
            ));
        }
        Ok(Self {
            sample,
            control,
            input_kind,
            decoder,
            chunksize: chunksize.unwrap_or(CHUNKSIZE).max(1),
        })
    }

    /// Profile into `output` (`-` for stdout). Inputs are opened before the
    /// output is created.
    pub fn run_to_path<P: AsRef<Path>>(&self, output: P) -> Result<RunSummary> {
        let inputs = self.open_inputs()?;
        make_parent_dirs(&output)?;
        let mut writer = ProfileWriter::to_path(&output)?;
        let summary = self.process(inputs, &mut writer)?;
        writer.finish(true)?;
        Ok(summary)
    }

    /// Profile into an already opened writer; the caller finishes it.
    pub fn run<W: Write>(&self, writer: &mut ProfileWriter<W>) -> Result<RunSummary> {
        let inputs = self.open_inputs()?;
        self.process(inputs, writer)
    }

    fn open_inputs(&self) -> Result<Inputs> {
        let has_headers = self.input_kind == InputKind::Profile;
        let sample = get_reader(&self.sample, has_headers)?;
        let control = match &self.control {
            Some(path) => Some(get_reader(path, has_headers)?),
            None => None,
        };
        Ok(Inputs { sample, control })
    }

    fn process<W: Write>(
        &self,
        mut inputs: Inputs,
        writer: &mut ProfileWriter<W>,
    ) -> Result<RunSummary> {
        match (&self.control, self.input_kind) {
            (None, _) => info!("Processing {:?} into a profile", self.sample),
            (Some(control), InputKind::Pileup) => info!(
                "Processing {:?} and control {:?} into a differential profile",
                self.sample, control
            ),
            (Some(control), InputKind::Profile) => info!(
                "Calculating differential of profiles {:?} and {:?}",
                self.sample, control
            ),
        }

        let mut summary = RunSummary::default();
        loop {
            let (batch, exhausted) = self.read_batch(&mut inputs)?;
            debug!("Profiling batch of {} positions", batch.len());

            let profiled: Vec<Result<PositionRecord>> =
                batch.par_iter().map(|pair| self.profile(pair)).collect();

            for record in profiled {
                let record = record?;
                if !record.has_canonical_reference() {
                    summary.non_canonical_reference += 1;
                }
                writer.write(&record)?;
                summary.positions += 1;
            }

            if exhausted {
                break;
            }
        }

        info!("Profiled {} positions", summary.positions);
        if summary.non_canonical_reference > 0 {
            warn!(
                "{} positions had a reference base other than A/C/G/T; their transitions and transversions are reported as 0",
                summary.non_canonical_reference
            );
        }
        Ok(summary)
    }

    /// Read up to `chunksize` positions; `true` once either stream is exhausted.
    fn read_batch(&self, inputs: &mut Inputs) -> Result<(Vec<LinePair>, bool)> {
        let mut batch = Vec::with_capacity(self.chunksize.min(CHUNKSIZE));
        while batch.len() < self.chunksize {
            let control = match inputs.control.as_mut() {
                Some(reader) => {
                    let path = self.control.as_deref().unwrap_or(&self.sample);
                    let mut record = csv::StringRecord::new();
                    if !reader
                        .read_record(&mut record)
                        .with_context(|| format!("Failed to read {}", path.display()))?
                    {
                        return Ok((batch, true));
                    }
                    Some(record)
                }
                None => None,
            };

            let mut sample = csv::StringRecord::new();
            if !inputs
                .sample
                .read_record(&mut sample)
                .with_context(|| format!("Failed to read {}", self.sample.display()))?
            {
                return Ok((batch, true));
            }

            batch.push(LinePair { control, sample });
        }
        Ok((batch, false))
    }

    fn profile(&self, pair: &LinePair) -> Result<PositionRecord> {
        let cutoff = self.decoder.cutoff();
        match (&pair.control, self.input_kind) {
            (None, InputKind::Pileup) => decode_line(&self.decoder, &pair.sample, &self.sample),
            (None, InputKind::Profile) => Err(anyhow!("Profile input without a control")),
            (Some(control), InputKind::Pileup) => {
                // Both sides keep every indel; the cutoff applies to the differential.
                let decoder = self.decoder.with_cutoff(IndelCutoff::ReportAll);
                let control_path = self.control.as_deref().unwrap_or(&self.sample);
                let (control, sample) = rayon::join(
                    || decode_line(&decoder, control, control_path),
                    || decode_line(&decoder, &pair.sample, &self.sample),
                );
                Ok(difference(&control?, &sample?, cutoff))
            }
            (Some(control), InputKind::Profile) => {
                let control_path = self.control.as_deref().unwrap_or(&self.sample);
                let control = parse_profile_line(control, control_path)?;
                let sample = parse_profile_line(&pair.sample, &self.sample)?;
                Ok(difference(&control, &sample, cutoff))
            }
        }
    }
}

#[inline]
fn line_number(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, |pos| pos.line())
}

fn decode_line(
    decoder: &Decoder,
    record: &csv::StringRecord,
    path: &Path,
) -> Result<PositionRecord> {
    let line = PileupLine::from_fields(record, line_number(record))
        .with_context(|| format!("Malformed pileup in {}", path.display()))?;
    Ok(decoder.decode(&line))
}

fn parse_profile_line(record: &csv::StringRecord, path: &Path) -> Result<PositionRecord> {
    PositionRecord::from_profile_fields(record, line_number(record))
        .with_context(|| format!("Malformed profile in {}", path.display()))
}
