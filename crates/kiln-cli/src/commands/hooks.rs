//! Pre/post build hook execution.
//!
//! A hook is a script path relative to the package directory. The interpreter
//! is picked from the file extension:
//!
//! | extension             | program |
//! |-----------------------|---------|
//! | `.js`, `.mjs`, `.cjs` | `node`  |
//! | `.ts`, `.mts`, `.cts` | `tsx`   |
//! | `.sh`                 | `sh`    |
//! | anything else         | the script itself |

use crate::error::{CliError, Result};
use kiln_bundler::bin::resolve_bin;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Pre,
    Post,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookStage::Pre => "pre",
            HookStage::Post => "post",
        })
    }
}

/// How a hook script is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCommand {
    pub program: PathBuf,
    pub args: Vec<PathBuf>,
}

impl HookCommand {
    /// Resolve the command for `script`, looking up local interpreters from
    /// `package_dir`.
    pub fn for_script(package_dir: &Path, script: &Path) -> Self {
        let interpreter = match script.extension().and_then(|e| e.to_str()) {
            Some("js" | "mjs" | "cjs") => Some(PathBuf::from("node")),
            Some("ts" | "mts" | "cts") => Some(resolve_bin(package_dir, "tsx")),
            Some("sh") => Some(PathBuf::from("sh")),
            _ => None,
        };

        match interpreter {
            Some(program) => Self {
                program,
                args: vec![script.to_path_buf()],
            },
            None => Self {
                program: script.to_path_buf(),
                args: Vec::new(),
            },
        }
    }
}

/// Run a hook script to completion in `package_dir` with inherited stdio.
///
/// # Errors
///
/// `CliError::Hook` when the script is missing, cannot be started, or exits
/// with a non-zero status.
pub async fn run_hook(stage: HookStage, package_dir: &Path, script: &Path) -> Result<()> {
    let hook_error = |detail: String| CliError::Hook {
        stage: stage.to_string(),
        path: script.to_path_buf(),
        detail,
    };

    let absolute = package_dir.join(script);
    if !absolute.is_file() {
        return Err(hook_error(format!(
            "script not found: {}",
            absolute.display()
        )));
    }

    let command = HookCommand::for_script(package_dir, &absolute);
    tracing::debug!(
        %stage,
        program = %command.program.display(),
        script = %absolute.display(),
        "running hook"
    );

    let status = Command::new(&command.program)
        .args(&command.args)
        .current_dir(package_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| {
            hook_error(format!(
                "could not start '{}': {e}",
                command.program.display()
            ))
        })?;

    if !status.success() {
        return Err(hook_error(format!("exited with {status}")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_interpreter_by_extension() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path();

        let cmd = HookCommand::for_script(pkg, Path::new("scripts/pre.mjs"));
        assert_eq!(cmd.program, PathBuf::from("node"));
        assert_eq!(cmd.args, vec![PathBuf::from("scripts/pre.mjs")]);

        let cmd = HookCommand::for_script(pkg, Path::new("scripts/pre.sh"));
        assert_eq!(cmd.program, PathBuf::from("sh"));

        let cmd = HookCommand::for_script(pkg, Path::new("scripts/post.ts"));
        assert_eq!(cmd.program.file_name().unwrap(), "tsx");

        let cmd = HookCommand::for_script(pkg, Path::new("scripts/post"));
        assert_eq!(cmd.program, PathBuf::from("scripts/post"));
        assert!(cmd.args.is_empty());
    }

    #[tokio::test]
    async fn test_missing_script() {
        let dir = TempDir::new().unwrap();
        let err = run_hook(HookStage::Pre, dir.path(), Path::new("nope.sh"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Hook { ref stage, .. } if stage == "pre"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_hook_runs_in_package_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pre.sh"), "touch ran-here\n").unwrap();

        run_hook(HookStage::Pre, dir.path(), Path::new("pre.sh"))
            .await
            .unwrap();
        assert!(dir.path().join("ran-here").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_hook() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("post.sh"), "exit 3\n").unwrap();

        let err = run_hook(HookStage::Post, dir.path(), Path::new("post.sh"))
            .await
            .unwrap_err();
        match err {
            CliError::Hook { stage, detail, .. } => {
                assert_eq!(stage, "post");
                assert!(detail.contains('3'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
