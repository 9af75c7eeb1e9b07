//! Pileup decoding.
//!
//! - [`pileup`]: parsing of mpileup lines into [`PileupLine`]s
//! - [`call_string`]: single-pass removal of read-start markers and indel tokens
//! - [`decoder`]: the [`Decoder`] computing per-position rates

pub mod call_string;
pub mod decoder;
pub mod pileup;

pub use call_string::{strip_indels, IndelCall, StrippedCalls};
pub use decoder::Decoder;
pub use pileup::{PileupLine, PILEUP_MIN_COLUMNS};
