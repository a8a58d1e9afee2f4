//! # kiln-bundler
//!
//! Build planning for one package and the drivers for the external bundling
//! engine.
//!
//! The crate turns a [`PackageManifest`](kiln_config::PackageManifest) into a
//! [`BuildPlan`], expands the plan into one [`CompileTask`] per output format,
//! and runs those tasks (plus development declaration mapping files)
//! concurrently through an [`Engine`].
//!
//! ```no_run
//! use kiln_bundler::{BuildFlags, BuildPlan, EsbuildEngine, executor};
//! use kiln_config::ManifestLoader;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = ManifestLoader::new(".").load()?;
//! let plan = BuildPlan::resolve(".", &manifest, BuildFlags::default())?;
//!
//! executor::execute(Arc::new(EsbuildEngine::new()), plan.jobs()).await?;
//! # Ok(()) }
//! ```

pub mod bin;
pub mod builtins;
pub mod dts_mapper;
pub mod engine;
pub mod executor;
pub mod externals;
pub mod plan;
pub mod platform;
pub mod task;

use kiln_config::Format;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub use dts_mapper::DeclarationMapping;
pub use engine::{CompileOutput, Engine, EsbuildEngine};
pub use executor::{Job, JobOutput};
pub use externals::NoExternal;
pub use plan::{BuildFlags, BuildPlan, Declarations, Entry};
pub use platform::{BrowserPlatform, NodePlatform, PlatformStrategy, strategy_for};
pub use task::{CompileTask, DtsOptions, EnginePlatform, Minify};

/// Error type for planning and compilation.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// Invalid `bundler` configuration.
    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(kiln::bundler::invalid_config))]
    InvalidConfig(String),

    /// An entry listed in the manifest does not exist.
    #[error("Entry point not found: {}", .0.display())]
    #[diagnostic(
        code(kiln::bundler::entry_not_found),
        help("Check the 'bundler.entries' field of package.json")
    )]
    EntryNotFound(PathBuf),

    /// The manifest lists no entries at all.
    #[error("No entries configured")]
    #[diagnostic(
        code(kiln::bundler::no_entries),
        help("Add at least one file to 'bundler.entries'")
    )]
    NoEntries,

    /// Output directory resolves outside the package.
    #[error("Invalid output path: {0}")]
    #[diagnostic(code(kiln::bundler::invalid_output_path))]
    InvalidOutputPath(String),

    /// The engine executable could not be started.
    #[error("Could not run '{tool}': {reason}")]
    #[diagnostic(
        code(kiln::bundler::engine_not_found),
        help("Install it as a dev dependency of the package or put it on PATH")
    )]
    EngineNotFound { tool: String, reason: String },

    /// The engine reported a failure for one format pass.
    #[error("{format} compilation failed:\n{detail}")]
    #[diagnostic(code(kiln::bundler::compile_failed))]
    Compile { format: Format, detail: String },

    /// A spawned build task panicked or was cancelled.
    #[error("Build task failed: {0}")]
    #[diagnostic(code(kiln::bundler::task_failed))]
    TaskFailed(String),

    /// I/O error with context message.
    #[error("{message}")]
    #[diagnostic(code(kiln::bundler::io))]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
