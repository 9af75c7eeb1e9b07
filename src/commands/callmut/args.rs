use anyhow::Result;
use log::info;
use mprofile_lib::core::error::MprofileError;
use mprofile_lib::core::fs::{is_profile_path, is_stdio};
use mprofile_lib::pipeline::callmut::{InputKind, CHUNKSIZE_STR};
use mprofile_lib::profile::{IndelCutoff, SizeClasses};
use std::path::PathBuf;
use structopt::StructOpt;

/// CLI arguments for the `callmut` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(author, name = "callmut")]
pub struct CallMutArgs {
    /// Input mpileup, or profile with `--preproc` (`-` for stdin, `.gz` is decompressed).
    #[structopt(long, short = "i")]
    pub input: PathBuf,

    /// Output profile (`-` for stdout, `.gz` is compressed).
    #[structopt(long, short = "o")]
    pub output: PathBuf,

    /// mpileup or profile to normalise to (e.g. untreated).
    #[structopt(long, short = "c")]
    pub control: Option<PathBuf>,

    /// Minimum rate for an indel sequence to be reported; `NA` applies no cutoff.
    #[structopt(long = "indelcut", default_value = "1")]
    pub indel_cutoff: IndelCutoff,

    /// Inputs are profiles, not mpileups (requires `--control`).
    #[structopt(long, short = "p")]
    pub preproc: bool,

    /// Length classification for small indels (length <= value).
    #[structopt(long, default_value = "1")]
    pub small: String,

    /// Length classification for mid indels as `lower,upper` (lower <= length <= upper).
    #[structopt(long, default_value = "2,4")]
    pub mid: String,

    /// Length classification for large indels (length >= value).
    #[structopt(long, default_value = "5")]
    pub large: String,

    /// Number of worker threads (defaults to all cores).
    #[structopt(long, short = "t")]
    pub threads: Option<usize>,

    /// Positions profiled per parallel batch.
    #[structopt(long, default_value = CHUNKSIZE_STR.as_str())]
    pub chunksize: usize,
}

/// Normalised configuration derived from [`CallMutArgs`].
#[derive(Debug, Clone)]
pub struct CallMutConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub control: Option<PathBuf>,
    pub input_kind: InputKind,
    pub indel_cutoff: IndelCutoff,
    pub size_classes: SizeClasses,
    pub threads: usize,
    pub chunksize: usize,
}

impl From<CallMutArgs> for CallMutConfig {
    fn from(args: CallMutArgs) -> CallMutConfig {
        let detected_profile =
            !args.preproc && args.control.is_some() && is_profile_path(&args.input);
        if detected_profile {
            info!("Detected profile input instead of mpileup, activating --preproc");
        }

        CallMutConfig {
            input_kind: if args.preproc || detected_profile {
                InputKind::Profile
            } else {
                InputKind::Pileup
            },
            size_classes: SizeClasses::from_raw(&args.small, &args.mid, &args.large),
            input: args.input,
            output: args.output,
            control: args.control,
            indel_cutoff: args.indel_cutoff,
            threads: args.threads.unwrap_or_else(num_cpus::get),
            chunksize: args.chunksize,
        }
    }
}

impl CallMutConfig {
    /// Reject configurations that cannot run, before any output is created.
    pub fn validate(&self) -> Result<()> {
        if self.input_kind == InputKind::Profile && self.control.is_none() {
            return Err(MprofileError::Config(
                "--preproc also needs --control to calculate a differential to the --input sample"
                    .to_string(),
            )
            .into());
        }

        if self.chunksize == 0 {
            return Err(
                MprofileError::Config("--chunksize must be greater than 0".to_string()).into(),
            );
        }

        for path in std::iter::once(&self.input).chain(self.control.iter()) {
            if !is_stdio(path) && !path.is_file() {
                return Err(MprofileError::FileNotFound(path.display().to_string()).into());
            }
        }

        if let Some(control) = &self.control {
            if is_stdio(control) && is_stdio(&self.input) {
                return Err(MprofileError::Config(
                    "--input and --control cannot both read from stdin".to_string(),
                )
                .into());
            }
        }

        if !is_stdio(&self.output)
            && std::iter::once(&self.input)
                .chain(self.control.iter())
                .any(|input| input == &self.output)
        {
            return Err(MprofileError::Config(format!(
                "output {} would overwrite an input",
                self.output.display()
            ))
            .into());
        }

        Ok(())
    }
}
