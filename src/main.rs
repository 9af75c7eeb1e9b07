//! mprofile - nucleotide-resolution mutation profiling
//!
//! `mprofile` turns `samtools mpileup` output into mutation profiles: per-position rates of
//! substitutions, transitions and transversions, insertions and deletions, indel size classes,
//! and the most common indel sequences. Given a control (e.g. an untreated sample), the profile
//! is reported as a position-wise differential against it.
//!
//! # Usage
//!
//! ```bash
//! # Profile a single sample
//! mprofile callmut -i treated.mpileup -o treated.mprofile
//!
//! # Differential against an untreated control, reporting every indel sequence
//! mprofile callmut -i treated.mpileup -c untreated.mpileup -o diff.mprofile --indelcut NA
//!
//! # Differential of two existing profiles
//! mprofile callmut -i treated.mprofile -c untreated.mprofile -o diff.mprofile --preproc
//! ```

extern crate mprofile_lib;
pub mod commands;
use anyhow::Result;
use env_logger::Env;
use log::*;
use mprofile_lib::core::prelude::is_broken_pipe;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case", author, about)]
/// Mutation profiles from mpileup files
struct Args {
    /// Only log warnings and errors
    #[structopt(long, short = "q", global = true)]
    quiet: bool,

    #[structopt(subcommand)]
    subcommand: Subcommand,
}

#[derive(StructOpt)]
enum Subcommand {
    /// Convert mpileups (or profiles) into a mutation profile, optionally against a control
    Callmut(commands::CallMutArgs),
}

impl Subcommand {
    fn run(self) -> Result<()> {
        match self {
            Subcommand::Callmut(args) => commands::run_callmut(args)?,
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::from_args();
    let level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(err) = args.subcommand.run() {
        if is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
