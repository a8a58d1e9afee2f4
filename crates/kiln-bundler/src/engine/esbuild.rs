use super::{CompileOutput, Engine};
use crate::bin::resolve_bin;
use crate::task::{CompileTask, DtsOptions};
use crate::{Error, Result};
use async_trait::async_trait;
use kiln_config::Format;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Engine backed by the `esbuild` CLI, with `tsc` for declarations.
///
/// Executables are looked up in `node_modules/.bin` from the package root
/// upwards, then on `PATH`, unless an explicit path is configured.
#[derive(Debug, Clone, Default)]
pub struct EsbuildEngine {
    esbuild: Option<PathBuf>,
    tsc: Option<PathBuf>,
}

impl EsbuildEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_esbuild(mut self, path: impl Into<PathBuf>) -> Self {
        self.esbuild = Some(path.into());
        self
    }

    pub fn with_tsc(mut self, path: impl Into<PathBuf>) -> Self {
        self.tsc = Some(path.into());
        self
    }

    fn program(&self, cwd: &Path, name: &str) -> PathBuf {
        let configured = match name {
            "esbuild" => self.esbuild.as_ref(),
            _ => self.tsc.as_ref(),
        };
        configured
            .cloned()
            .unwrap_or_else(|| resolve_bin(cwd, name))
    }
}

#[async_trait]
impl Engine for EsbuildEngine {
    fn name(&self) -> &'static str {
        "esbuild"
    }

    async fn compile(&self, task: &CompileTask) -> Result<CompileOutput> {
        let started = Instant::now();

        // tsc runs first: an esbuild pass in watch mode never returns.
        if let Some(dts) = &task.dts {
            let tsc = self.program(&task.cwd, "tsc");
            let args = tsc_args(task, dts);
            tracing::debug!(program = %tsc.display(), ?args, "generating declarations");
            run("tsc", &tsc, &args, &task.cwd, task.format, false).await?;
        }

        let esbuild = self.program(&task.cwd, "esbuild");
        let args = esbuild_args(task);
        tracing::info!(
            format = %task.format,
            entries = task.entries.len(),
            watch = task.watch,
            "compiling"
        );
        tracing::debug!(program = %esbuild.display(), ?args, "esbuild invocation");
        run("esbuild", &esbuild, &args, &task.cwd, task.format, task.watch).await?;

        Ok(CompileOutput {
            format: task.format,
            duration: started.elapsed(),
            declarations: task.emits_declarations(),
        })
    }
}

async fn run(
    tool: &str,
    program: &Path,
    args: &[String],
    cwd: &Path,
    format: Format,
    watch: bool,
) -> Result<()> {
    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let spawn_err = |e: std::io::Error| Error::EngineNotFound {
        tool: tool.to_string(),
        reason: e.to_string(),
    };

    if watch {
        // Rebuild diagnostics go straight to the terminal.
        let status = command
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(spawn_err)?;

        if !status.success() {
            return Err(Error::Compile {
                format,
                detail: format!("{tool} exited with {status}"),
            });
        }
        return Ok(());
    }

    let output = command.output().await.map_err(spawn_err)?;
    if !output.stdout.is_empty() {
        tracing::debug!(tool, stdout = %String::from_utf8_lossy(&output.stdout).trim_end());
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        // tsc reports diagnostics on stdout
        let detail = match (stderr.is_empty(), stdout.is_empty()) {
            (false, _) => stderr,
            (true, false) => stdout,
            (true, true) => format!("{tool} exited with {}", output.status),
        };
        return Err(Error::Compile { format, detail });
    }

    Ok(())
}

/// esbuild command-line arguments for `task`.
pub fn esbuild_args(task: &CompileTask) -> Vec<String> {
    let mut args: Vec<String> = task
        .entries
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    args.push("--bundle".to_string());
    args.push(format!("--format={}", task.format));
    args.push(format!("--platform={}", task.platform.as_str()));
    if !task.targets.is_empty() {
        args.push(format!("--target={}", task.targets.join(",")));
    }
    args.push(format!("--outdir={}", task.out_dir.display()));
    args.push(format!("--outbase={}", task.outbase.display()));
    args.push(format!("--out-extension:.js={}", task.out_extension));
    args.push("--log-level=error".to_string());
    args.push("--legal-comments=none".to_string());

    if !task.conditions.is_empty() {
        args.push(format!("--conditions={}", task.conditions.join(",")));
    }
    if task.tree_shaking {
        args.push("--tree-shaking=true".to_string());
    }

    args.extend(task.external.iter().map(|name| format!("--external:{name}")));
    args.extend(
        task.aliases
            .iter()
            .map(|(from, to)| format!("--alias:{from}={to}")),
    );

    if let Some(banner) = &task.banner {
        args.push(format!("--banner:js={banner}"));
    }
    if task.minify.syntax {
        args.push("--minify-syntax".to_string());
    }
    if task.minify.whitespace {
        args.push("--minify-whitespace".to_string());
    }
    if task.watch {
        args.push("--watch=forever".to_string());
    }

    args
}

/// tsc command-line arguments emitting declarations for `task`.
pub fn tsc_args(task: &CompileTask, dts: &DtsOptions) -> Vec<String> {
    vec![
        "--project".to_string(),
        dts.tsconfig.to_string_lossy().into_owned(),
        "--declaration".to_string(),
        "--emitDeclarationOnly".to_string(),
        "--noEmit".to_string(),
        "false".to_string(),
        "--outDir".to_string(),
        task.out_dir.to_string_lossy().into_owned(),
        "--rootDir".to_string(),
        dts.root_dir.to_string_lossy().into_owned(),
    ]
}
