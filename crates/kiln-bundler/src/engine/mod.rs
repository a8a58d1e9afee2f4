//! Bundling engines.
//!
//! The orchestrator never bundles code itself. It hands each [`CompileTask`]
//! to an [`Engine`]; the default is [`EsbuildEngine`], which drives the
//! `esbuild` and `tsc` executables.

mod esbuild;

pub use esbuild::{EsbuildEngine, esbuild_args, tsc_args};

use crate::Result;
use crate::task::CompileTask;
use async_trait::async_trait;
use kiln_config::Format;
use std::time::Duration;

/// Result of one successful format pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub format: Format,
    pub duration: Duration,
    pub declarations: bool,
}

/// A compiler able to run one format pass.
#[async_trait]
pub trait Engine: Send + Sync + std::fmt::Debug {
    /// Identifier used in logs.
    fn name(&self) -> &'static str;

    /// Compile `task`, writing its output under `task.out_dir`.
    ///
    /// In watch mode this returns only when the engine process exits.
    async fn compile(&self, task: &CompileTask) -> Result<CompileOutput>;
}
