//! kiln - build orchestrator for one monorepo package.
//!
//! Parses flags, initializes logging and hands a [`BuildContext`] to the build
//! command. Any error is rendered as a miette report and exits with status 1.
//!
//! [`BuildContext`]: kiln_cli::commands::BuildContext

use clap::Parser;
use kiln_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match commands::BuildContext::from_args(&args) {
        Ok(ctx) => commands::build_execute(ctx).await,
        Err(err) => Err(err),
    };

    result.map_err(error::cli_error_to_miette)
}
