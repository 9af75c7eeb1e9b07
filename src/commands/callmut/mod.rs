mod args;

use anyhow::Result;
use log::info;
use mprofile_lib::core::prelude::configure_global_thread_pool;
use mprofile_lib::decode::Decoder;
use mprofile_lib::pipeline::callmut::ProfileJob;

pub use args::{CallMutArgs, CallMutConfig};

/// Execute the `callmut` command end-to-end.
pub fn run_callmut(args: CallMutArgs) -> Result<()> {
    let config: CallMutConfig = args.into();
    config.validate()?;

    info!("Running mprofile callmut on {:?}", config.input);
    info!(
        "Indel cutoff: {}; size classes: {}",
        config.indel_cutoff, config.size_classes
    );

    let threads = configure_global_thread_pool(config.threads)?;
    info!("Using {} worker threads", threads);

    let decoder = Decoder::new(config.indel_cutoff, config.size_classes);
    let job = ProfileJob::new(
        config.input.clone(),
        config.control.clone(),
        config.input_kind,
        decoder,
        Some(config.chunksize),
    )?;

    let summary = job.run_to_path(&config.output)?;
    info!(
        "callmut complete: {} positions -> {:?}",
        summary.positions, config.output
    );
    Ok(())
}
