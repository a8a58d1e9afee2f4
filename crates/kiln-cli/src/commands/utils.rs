//! Shared filesystem helpers for the build command.

use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Resolve `path` against `cwd` unless it is already absolute.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Empty `out_dir`, keeping (or creating) the directory itself.
///
/// Idempotent: a missing or already empty directory is fine.
///
/// # Errors
///
/// `CliError::InvalidArgument` when `out_dir` exists but is not a directory;
/// I/O errors from removing entries.
pub async fn clean_output_dir(out_dir: &Path) -> Result<()> {
    match fs::metadata(out_dir).await {
        Ok(meta) if !meta.is_dir() => {
            return Err(CliError::InvalidArgument(format!(
                "Output path exists but is not a directory: {}",
                out_dir.display()
            )));
        }
        Ok(_) => {
            let mut entries = fs::read_dir(out_dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    fs::remove_dir_all(&path).await?;
                } else {
                    fs::remove_file(&path).await?;
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(out_dir).await?;
        }
        Err(e) => return Err(e.into()),
    }

    tracing::debug!(dir = %out_dir.display(), "output directory reset");
    Ok(())
}

/// Create `out_dir` if missing.
pub async fn ensure_output_dir(out_dir: &Path) -> Result<()> {
    match fs::metadata(out_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(CliError::InvalidArgument(format!(
            "Output path exists but is not a directory: {}",
            out_dir.display()
        ))),
        Err(_) => Ok(fs::create_dir_all(out_dir).await?),
    }
}

/// Get the current working directory.
pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to get current directory: {e}"),
        ))
    })
}
