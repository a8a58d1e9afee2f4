//! Lookup of package-local executables.

use std::path::{Path, PathBuf};

/// Find `name` in the nearest `node_modules/.bin`, walking up from `start`.
///
/// Returns `None` when no ancestor provides it; callers then fall back to
/// `PATH` lookup by spawning the bare name.
pub fn find_local_bin(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let bin_dir = dir.join("node_modules").join(".bin");
        for candidate in candidates(name) {
            let path = bin_dir.join(&candidate);
            if path.is_file() {
                return Some(path);
            }
        }
        current = dir.parent();
    }

    None
}

/// Program to spawn for `name`: the local binary when present, else the bare
/// name.
pub fn resolve_bin(start: &Path, name: &str) -> PathBuf {
    find_local_bin(start, name).unwrap_or_else(|| PathBuf::from(name))
}

#[cfg(windows)]
fn candidates(name: &str) -> Vec<String> {
    vec![format!("{name}.cmd"), format!("{name}.exe"), name.to_string()]
}

#[cfg(not(windows))]
fn candidates(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_bin_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let bin_dir = root.join("node_modules/.bin");
        fs::create_dir_all(&bin_dir).unwrap();
        let name = candidates("esbuild").remove(0);
        fs::write(bin_dir.join(&name), "").unwrap();

        let package = root.join("packages/widgets");
        fs::create_dir_all(&package).unwrap();

        assert_eq!(find_local_bin(&package, "esbuild"), Some(bin_dir.join(name)));
    }

    #[test]
    fn falls_back_to_bare_name() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            resolve_bin(dir.path(), "kiln-test-missing-tool"),
            PathBuf::from("kiln-test-missing-tool")
        );
    }
}
