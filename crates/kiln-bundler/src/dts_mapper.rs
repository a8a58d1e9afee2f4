//! Development declaration mapping files.
//!
//! In development builds no declarations are generated. Instead each entry
//! gets a one-line `.d.ts` stub in the output directory that re-exports the
//! source entry, so consumers type-check against live sources.

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// A mapping file to write for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationMapping {
    /// Absolute path of the source entry.
    pub source: PathBuf,

    /// Absolute path of the `.d.ts` stub.
    pub target: PathBuf,
}

impl DeclarationMapping {
    /// Mapping for `source`, placed under `out_dir` at the entry's path
    /// relative to `outbase`.
    pub fn for_entry(source: &Path, outbase: &Path, out_dir: &Path) -> Self {
        let relative = source.strip_prefix(outbase).unwrap_or(source);
        let target = out_dir.join(relative).with_extension("d.ts");

        Self {
            source: source.to_path_buf(),
            target,
        }
    }

    /// Module reference from the stub back to the source entry, without the
    /// file extension.
    pub fn specifier(&self) -> String {
        let from = self.target.parent().unwrap_or(Path::new(""));
        let to_dir = self.source.parent().unwrap_or(Path::new(""));
        let stem = self
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let dir = relative_path(from, to_dir);
        let specifier = if dir.is_empty() {
            stem
        } else {
            format!("{dir}/{stem}")
        };

        if specifier.starts_with("..") {
            specifier
        } else {
            format!("./{specifier}")
        }
    }

    pub fn contents(&self) -> String {
        format!("// dev-mode\nexport * from '{}';\n", self.specifier())
    }

    /// Write the stub, creating parent directories and replacing any
    /// existing file.
    pub async fn write(&self) -> Result<PathBuf> {
        if let Some(parent) = self.target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::IoError {
                    message: format!("Failed to create {}", parent.display()),
                    source,
                })?;
        }

        tokio::fs::write(&self.target, self.contents())
            .await
            .map_err(|source| Error::IoError {
                message: format!("Failed to write {}", self.target.display()),
                source,
            })?;

        tracing::debug!(path = %self.target.display(), "wrote declaration mapping");
        Ok(self.target.clone())
    }
}

/// POSIX-style relative path from directory `from` to directory `to`.
///
/// Both paths are expected to be absolute and normalized.
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat_n("..".to_string(), from.len() - common));
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    parts.join("/")
}
