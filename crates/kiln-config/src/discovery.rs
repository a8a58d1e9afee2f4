//! Manifest discovery and layered loading.
//!
//! Values are merged in this order (later wins):
//! serialized defaults, `package.json`, `KILN_` environment variables.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};

use crate::error::{ConfigError, Result};
use crate::manifest::{BundlerSection, PackageManifest};

/// Loads the package manifest of one package directory.
///
/// # Example
///
/// ```no_run
/// use kiln_config::ManifestLoader;
///
/// let manifest = ManifestLoader::new(".").load().unwrap();
/// println!("building {}", manifest.name);
/// ```
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    root: PathBuf,
    env_prefix: Option<String>,
}

impl ManifestLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            env_prefix: Some(crate::ENV_PREFIX.to_string()),
        }
    }

    /// Ignore environment overrides.
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(crate::MANIFEST_FILE)
    }

    /// Load the manifest and require a `bundler` section.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotFound` when `package.json` is missing
    /// - `ConfigError::InvalidManifest` when it cannot be parsed
    /// - `ConfigError::MissingBundlerSection` when `bundler` is absent
    pub fn load(&self) -> Result<PackageManifest> {
        let path = self.manifest_path();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }

        let figment = self.layer(Figment::new().merge(Json::file(&path)));
        extract(figment, &path)
    }

    fn layer(&self, figment: Figment) -> Figment {
        let figment = Figment::new()
            .merge(Serialized::defaults(PackageManifest::default()))
            .merge(figment);

        match &self.env_prefix {
            Some(prefix) => figment.merge(env_overrides(prefix)),
            None => figment,
        }
    }
}

/// Manifest keys spelled in camelCase in `package.json`.
const CAMEL_CASE_KEYS: &[&str] = &[
    "peerDependencies",
    "noExternal",
    "outDir",
    "minifyWhitespace",
];

/// `KILN_BUNDLER__OUT_DIR`-style variables, keyed like the manifest.
///
/// Segments are matched case-insensitively against [`CAMEL_CASE_KEYS`] and
/// lowercased otherwise. Underscores inside a segment are ignored for the
/// match, so `OUTDIR` and `OUT_DIR` both name `outDir`.
fn env_overrides(prefix: &str) -> Env {
    Env::prefixed(prefix)
        .split("__")
        .lowercase(false)
        .map(|key| {
            key.as_str()
                .split('.')
                .map(manifest_key)
                .collect::<Vec<_>>()
                .join(".")
                .into()
        })
}

fn manifest_key(segment: &str) -> String {
    let folded: String = segment
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    CAMEL_CASE_KEYS
        .iter()
        .find(|key| key.eq_ignore_ascii_case(&folded))
        .map_or_else(|| segment.to_ascii_lowercase(), |key| (*key).to_string())
}

fn extract(figment: Figment, path: &Path) -> Result<PackageManifest> {
    let manifest: PackageManifest =
        figment
            .extract()
            .map_err(|e| ConfigError::InvalidManifest {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

    if manifest.bundler.is_none() {
        return Err(ConfigError::MissingBundlerSection(path.to_path_buf()));
    }

    tracing::debug!(
        package = %manifest.name,
        path = %path.display(),
        "loaded package manifest"
    );

    Ok(manifest)
}

/// Convenience accessor for the `bundler` section of a loaded manifest.
pub fn bundler_section(manifest: &PackageManifest) -> Result<&BundlerSection> {
    manifest
        .bundler
        .as_ref()
        .ok_or_else(|| ConfigError::InvalidValue {
            field: "bundler".to_string(),
            hint: "Add a 'bundler' object to package.json".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_returns_not_found_when_no_manifest() {
        let dir = TempDir::new().unwrap();
        let result = ManifestLoader::new(dir.path()).without_env().load();
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{ \"name\": ").unwrap();

        let result = ManifestLoader::new(dir.path()).without_env().load();
        assert!(matches!(result, Err(ConfigError::InvalidManifest { .. })));
    }

    #[test]
    fn load_requires_bundler_section() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "name": "pkg" }"#).unwrap();

        let result = ManifestLoader::new(dir.path()).without_env().load();
        assert!(matches!(result, Err(ConfigError::MissingBundlerSection(_))));
    }

    #[test]
    fn bundler_section_accessor() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "pkg", "bundler": { "entries": ["./src/index.ts"] } }"#,
        )
        .unwrap();
        let manifest = ManifestLoader::new(dir.path()).without_env().load().unwrap();

        let section = bundler_section(&manifest).unwrap();
        assert_eq!(section.entries, vec!["./src/index.ts".to_string()]);
    }

    #[test]
    fn env_keys_map_to_manifest_keys() {
        assert_eq!(manifest_key("BUNDLER"), "bundler");
        assert_eq!(manifest_key("OUTDIR"), "outDir");
        assert_eq!(manifest_key("OUT_DIR"), "outDir");
        assert_eq!(manifest_key("NOEXTERNAL"), "noExternal");
        assert_eq!(manifest_key("PEER_DEPENDENCIES"), "peerDependencies");
        assert_eq!(manifest_key("minifyWhitespace"), "minifyWhitespace");
        assert_eq!(manifest_key("PLATFORM"), "platform");
    }
}
