//! Error handling for the kiln CLI.
//!
//! Every failure of a run ends up as a [`CliError`]. The three fatal classes
//! of the build map onto its variants:
//!
//! - configuration errors: [`CliError::Config`] (manifest) and
//!   [`CliError::Build`] with a planning error (entries, output path)
//! - hook failures: [`CliError::Hook`]
//! - compilation failures: [`CliError::Build`] with `kiln_bundler::Error::Compile`

mod miette;

pub use self::miette::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Manifest could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] kiln_config::ConfigError),

    /// Planning or compilation failed
    #[error("Build error: {0}")]
    Build(#[from] kiln_bundler::Error),

    /// A pre/post hook script failed or could not be started
    #[error("{stage} hook failed: {}\n{detail}", .path.display())]
    Hook {
        stage: String,
        path: PathBuf,
        detail: String,
    },

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
