pub mod callmut;

pub use callmut::{run_callmut, CallMutArgs};
