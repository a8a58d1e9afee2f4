//! kiln CLI - build orchestrator for ESM/CommonJS monorepo packages.
//!
//! The binary builds exactly one package per invocation: the one whose
//! `package.json` lives in the working directory (or `--cwd`).
//!
//! # Architecture
//!
//! - [`cli`] - flag definitions
//! - [`commands`] - the build orchestrator and hook runner
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal status messages and spinner
//!
//! # Example
//!
//! ```rust,no_run
//! use kiln_cli::commands::{BuildContext, build_execute};
//!
//! # async fn run() -> kiln_cli::Result<()> {
//! let ctx = BuildContext::new("packages/widgets").optimized(true);
//! build_execute(ctx).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
