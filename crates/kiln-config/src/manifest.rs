//! Package manifest model.
//!
//! Only the fields the build consumes are modeled; everything else in
//! `package.json` is ignored during deserialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Output module format of one compile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Esm,
    Cjs,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Esm => "esm",
            Format::Cjs => "cjs",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target platform declared by the package.
///
/// Any value other than `node` is treated as a browser-like platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    #[default]
    Browser,
    Node,
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        if value == "node" {
            Platform::Node
        } else {
            Platform::Browser
        }
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        match value {
            Platform::Browser => "browser".to_string(),
            Platform::Node => "node".to_string(),
        }
    }
}

/// The `bundler` block of `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundlerSection {
    /// Source entry files, relative to the package root.
    pub entries: Vec<String>,

    /// Module names that are never bundled, on top of the declared dependencies.
    pub externals: Vec<String>,

    /// Module names (or `/regex/` patterns) that are always bundled.
    pub no_external: Vec<String>,

    pub platform: Platform,

    /// Script run before any compilation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre: Option<PathBuf>,

    /// Script run after every compile pass finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PathBuf>,

    pub formats: Vec<Format>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Also strip whitespace when building optimized output.
    pub minify_whitespace: bool,
}

impl BundlerSection {
    /// Requested formats in declaration order.
    ///
    /// An empty list means both formats; duplicates collapse to their first
    /// occurrence.
    pub fn formats(&self) -> Vec<Format> {
        if self.formats.is_empty() {
            return vec![Format::Esm, Format::Cjs];
        }

        let mut formats = Vec::with_capacity(2);
        for format in &self.formats {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
        formats
    }

    pub fn out_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::DEFAULT_OUT_DIR))
    }
}

/// The subset of `package.json` read by the build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageManifest {
    pub name: String,
    pub dependencies: IndexMap<String, String>,
    pub peer_dependencies: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler: Option<BundlerSection>,
}

impl PackageManifest {
    /// Runtime and peer dependency names, runtime first.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .keys()
            .chain(self.peer_dependencies.keys())
            .map(String::as_str)
    }
}
