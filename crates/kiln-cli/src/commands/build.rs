//! Build orchestrator.
//!
//! One invocation builds the package rooted at [`BuildContext::cwd`]:
//!
//! 1. load `package.json` (with `KILN_*` overrides)
//! 2. run the `pre` hook
//! 3. resolve the [`BuildPlan`]
//! 4. reset the output directory when asked
//! 5. run every compile pass and declaration mapping write concurrently
//! 6. run the `post` hook
//! 7. report completion unless running in CI
//!
//! Any failure aborts the run. Output already written by a finished pass is
//! left in place.

use crate::cli::Cli;
use crate::commands::hooks::{self, HookStage};
use crate::commands::utils;
use crate::error::Result;
use crate::ui;
use kiln_bundler::{
    BuildFlags, BuildPlan, CompileOutput, Engine, EsbuildEngine, JobOutput, executor,
};
use kiln_config::{Format, ManifestLoader, bundler_section};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything one invocation needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Package directory; holds `package.json`.
    pub cwd: PathBuf,
    pub reset: bool,
    pub watch: bool,
    pub optimized: bool,
    /// Running under continuous integration; suppresses the completion message.
    pub ci: bool,
}

impl BuildContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            reset: false,
            watch: false,
            optimized: false,
            ci: false,
        }
    }

    /// Context for parsed command-line flags and the process environment.
    pub fn from_args(args: &Cli) -> Result<Self> {
        let cwd = utils::get_cwd()?;
        let cwd = match &args.cwd {
            Some(dir) => utils::resolve_path(dir, &cwd),
            None => cwd,
        };

        Ok(Self::new(cwd)
            .reset(args.reset)
            .watch(args.watch)
            .optimized(args.optimized)
            .ci(ui::is_ci()))
    }

    pub fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn optimized(mut self, optimized: bool) -> Self {
        self.optimized = optimized;
        self
    }

    pub fn ci(mut self, ci: bool) -> Self {
        self.ci = ci;
        self
    }

    fn flags(&self) -> BuildFlags {
        BuildFlags {
            optimized: self.optimized,
            watch: self.watch,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub package: String,
    pub passes: Vec<CompileOutput>,
    /// Declaration mapping files written.
    pub mappings: Vec<PathBuf>,
    /// Requested formats that had no entries.
    pub skipped: Vec<Format>,
    pub duration: Duration,
}

impl BuildReport {
    pub fn completion_message(&self) -> String {
        let formats: Vec<&str> = self.passes.iter().map(|p| p.format.as_str()).collect();
        let formats = if formats.is_empty() {
            "no bundles".to_string()
        } else {
            formats.join(", ")
        };

        let mut message = format!(
            "Built {} ({}) in {}",
            self.package,
            formats,
            ui::format_duration(self.duration)
        );
        if !self.mappings.is_empty() {
            message.push_str(&format!(
                ", {} declaration mapping file{}",
                self.mappings.len(),
                if self.mappings.len() == 1 { "" } else { "s" }
            ));
        }
        message
    }
}

/// Build the package with the esbuild engine and print the outcome.
///
/// # Errors
///
/// Configuration, hook and compilation errors; see [`run`].
pub async fn execute(ctx: BuildContext) -> Result<()> {
    let engine: Arc<dyn Engine> = Arc::new(EsbuildEngine::new());
    let report = run(&ctx, engine).await?;

    if !ctx.ci {
        ui::success(&report.completion_message());
    }

    Ok(())
}

/// Build the package with `engine`.
///
/// # Errors
///
/// - `CliError::Config` when `package.json` is missing or malformed
/// - `CliError::Hook` when the pre or post hook fails
/// - `CliError::Build` for invalid entries or output paths and for any
///   failed compile pass
pub async fn run(ctx: &BuildContext, engine: Arc<dyn Engine>) -> Result<BuildReport> {
    let started = Instant::now();

    let manifest = ManifestLoader::new(&ctx.cwd).load()?;
    let bundler = bundler_section(&manifest)?;

    if let Some(pre) = &bundler.pre {
        hooks::run_hook(HookStage::Pre, &ctx.cwd, pre).await?;
    }

    let plan = BuildPlan::resolve(&ctx.cwd, &manifest, ctx.flags())?;

    if ctx.reset {
        utils::clean_output_dir(&plan.out_dir).await?;
    } else {
        utils::ensure_output_dir(&plan.out_dir).await?;
    }

    let skipped = plan.skipped_formats();
    for format in &skipped {
        ui::warning(&format!(
            "Skipping {format} pass: no entries left after excluding presets"
        ));
    }

    let jobs = plan.jobs();
    tracing::info!(
        package = %plan.package_name,
        jobs = jobs.len(),
        engine = engine.name(),
        "starting compilation"
    );

    let spinner = (!ctx.watch && !ctx.ci && !jobs.is_empty())
        .then(|| ui::Spinner::new(&format!("Building {}", plan.package_name)));

    let outputs = executor::execute(engine, jobs).await;
    if let Some(spinner) = &spinner {
        spinner.clear();
    }
    let outputs = outputs?;

    let mut passes = Vec::new();
    let mut mappings = Vec::new();
    for output in outputs {
        match output {
            JobOutput::Compiled(pass) => {
                tracing::info!(
                    format = %pass.format,
                    duration = %ui::format_duration(pass.duration),
                    declarations = pass.declarations,
                    "pass finished"
                );
                passes.push(pass);
            }
            JobOutput::Mapped(path) => mappings.push(path),
        }
    }

    if let Some(post) = &bundler.post {
        hooks::run_hook(HookStage::Post, &ctx.cwd, post).await?;
    }

    Ok(BuildReport {
        package: plan.package_name.clone(),
        passes,
        mappings,
        skipped,
        duration: started.elapsed(),
    })
}
