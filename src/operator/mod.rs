//! The operator command: locate the workload, resolve its command, run it
//!
//! Control flows strictly forward through the three stages; an error in any
//! stage is returned unchanged and nothing is retried.

mod pipeline;
mod resolver;

pub use pipeline::{run_operator, Outcome};
pub use resolver::{resolve, NoMatch, Resolution};
