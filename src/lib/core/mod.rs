pub mod concurrency;
pub mod error;
pub mod fs;
pub mod io;

pub mod prelude {
    pub use super::concurrency::{configure_global_thread_pool, determine_allowed_cpus};
    pub use super::error::{is_broken_pipe, MprofileError, Result};
    pub use super::fs::{is_gzipped, is_profile_path, is_stdio, make_parent_dirs};
    pub use super::io::{get_reader, get_writer};
}
