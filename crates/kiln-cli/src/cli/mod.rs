//! Command-line interface definition for kiln.
//!
//! There are no subcommands; every invocation builds the package in the
//! working directory. Long flags may be abbreviated to any unambiguous prefix
//! (`--opt` is `--optimized`).

mod tests;

use clap::Parser;
use std::path::PathBuf;

/// kiln - build one monorepo package into ESM and CommonJS bundles
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Build one monorepo package into ESM and CommonJS bundles",
    long_about = "kiln reads the 'bundler' section of package.json, runs the pre/post hooks,\n\
                  and compiles every configured entry once per output format.\n\
                  In development builds it writes declaration mapping files that point\n\
                  type resolution back at the sources.",
    infer_long_args = true
)]
pub struct Cli {
    /// Empty the output directory before building
    #[arg(long)]
    pub reset: bool,

    /// Keep the compiler running and rebuild on change
    #[arg(long)]
    pub watch: bool,

    /// Production build
    ///
    /// Minifies output and generates type declarations with the first
    /// requested format instead of writing declaration mapping files.
    #[arg(long)]
    pub optimized: bool,

    /// Package directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    ///
    /// Shows the resolved build plan and the exact engine invocations.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
