//! Command implementations.
//!
//! - [`build`] - the build orchestrator
//! - [`hooks`] - pre/post hook scripts

pub mod build;
pub mod hooks;
pub(crate) mod utils;

pub use build::{BuildContext, BuildReport, execute as build_execute, run as build_run};
