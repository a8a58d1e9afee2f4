//! Error types for manifest loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("package manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },

    #[error("{} has no 'bundler' section", .0.display())]
    MissingBundlerSection(PathBuf),

    #[error("invalid value for '{field}': {hint}")]
    InvalidValue { field: String, hint: String },
}
