//! Miette diagnostic conversion for CLI errors.
//!
//! Reports carry plain messages only. Nothing here decodes source maps or
//! reads files, so rendering an error cannot fail itself.

use crate::error::CliError;
use kiln_config::ConfigError;
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        // Bundler errors already implement Diagnostic (codes and help text).
        CliError::Build(e) => Report::new(e),
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Hook { stage, path, detail } => miette::miette!(
            help = "The hook runs from the package directory; run it by hand to see its full output",
            "{} hook failed: {}\n{}",
            stage,
            path.display(),
            detail
        ),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NotFound(path) => miette::miette!(
            help = "Run kiln from a package directory or pass --cwd <DIR>",
            "Package manifest not found: {}",
            path.display()
        ),
        ConfigError::MissingBundlerSection(path) => miette::miette!(
            help = "Add a \"bundler\": { \"entries\": [...] } block to package.json",
            "{} has no 'bundler' section",
            path.display()
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}
