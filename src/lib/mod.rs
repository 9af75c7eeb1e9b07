//! mprofile: nucleotide-resolution mutation profiles from samtools mpileup.
//!
//! The library turns per-position pileup call-strings into mutation profiles
//! (substitution, insertion, deletion and indel-size rates, plus per-sequence
//! indel rates) and differences two profiles of the same position to isolate
//! treatment-induced signal.
//!
//! # Modules
//!
//! - [`decode`]: pileup parsing and the per-position [`decode::Decoder`]
//! - [`diff`]: treatment − control differencing
//! - [`profile`]: the [`profile::PositionRecord`] data model and profile-line codec
//! - [`pipeline`]: the batch driver streaming files through decoder and differencer
//! - [`core`]: errors, I/O, file-system and thread-pool helpers

pub mod core;
pub mod decode;
pub mod diff;
pub mod pipeline;
pub mod profile;
