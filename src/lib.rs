//! qase-bulk - bulk creation of Qase test cases from plain-text steps
//!
//! The core is [`steps::classify`], which turns lines of step text into
//! action / expected-result pairs. The rest of the crate feeds those steps
//! into the Qase API: definition files, suite selection and batch upload.

pub mod api;
pub mod bulk;
pub mod config;
pub mod logging;
pub mod steps;
pub mod types;
pub mod ui;

pub use config::Config;
pub use steps::{classify, Step, StepSequence};
