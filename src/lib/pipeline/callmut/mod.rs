//! `callmut`: pileups to mutation profiles, optionally normalised to a control.

pub mod job;
pub mod writer;

pub use job::{InputKind, ProfileJob, RunSummary, CHUNKSIZE, CHUNKSIZE_STR};
pub use writer::ProfileWriter;
