//! Compile task model.
//!
//! A [`CompileTask`] is everything an engine needs for one format pass. It is
//! engine-agnostic; [`EsbuildEngine`](crate::EsbuildEngine) translates it into
//! command-line arguments.

use kiln_config::Format;
use std::path::{Path, PathBuf};

/// Browser engines targeted by ESM output.
pub const ESM_TARGETS: &[&str] = &["chrome100", "safari15", "firefox91"];

/// Node.js release targeted by CommonJS output.
pub const CJS_TARGETS: &[&str] = &["node16"];

/// Runtime platform handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePlatform {
    Browser,
    Node,
}

impl EnginePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnginePlatform::Browser => "browser",
            EnginePlatform::Node => "node",
        }
    }
}

/// Minification switches.
///
/// Identifiers are never mangled so stack traces and re-exports keep their
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Minify {
    pub syntax: bool,
    pub whitespace: bool,
}

impl Minify {
    pub const NONE: Minify = Minify {
        syntax: false,
        whitespace: false,
    };

    /// Settings for a build profile.
    pub fn for_profile(optimized: bool, whitespace: bool) -> Self {
        Self {
            syntax: optimized,
            whitespace: optimized && whitespace,
        }
    }
}

/// TypeScript declaration output attached to a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtsOptions {
    /// `tsconfig.json` of the package.
    pub tsconfig: PathBuf,

    /// Directory the declaration tree is rooted at (the plan's output base).
    pub root_dir: PathBuf,
}

/// One format pass of the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileTask {
    pub format: Format,

    /// Absolute entry paths.
    pub entries: Vec<PathBuf>,

    /// Package root; the engine runs here.
    pub cwd: PathBuf,

    pub out_dir: PathBuf,

    /// Common directory of all entries; output mirrors paths below it.
    pub outbase: PathBuf,

    pub platform: EnginePlatform,
    pub targets: Vec<String>,

    /// Package export conditions used during resolution.
    pub conditions: Vec<String>,

    pub external: Vec<String>,
    pub aliases: Vec<(String, String)>,
    pub banner: Option<String>,

    /// Extension of emitted JavaScript files (`.mjs`, `.js`).
    pub out_extension: String,

    pub tree_shaking: bool,
    pub minify: Minify,
    pub watch: bool,
    pub dts: Option<DtsOptions>,
}

impl CompileTask {
    /// Create a task with the defaults of `format`.
    ///
    /// ESM defaults to the browser platform and modern browser targets with
    /// `.mjs` output; CommonJS targets Node.js 16 with `.js` output.
    pub fn new<P, I>(format: Format, entries: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        let entries = entries
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();

        let (platform, targets, conditions, out_extension, tree_shaking) = match format {
            Format::Esm => (
                EnginePlatform::Browser,
                ESM_TARGETS,
                vec!["module".to_string()],
                ".mjs",
                true,
            ),
            Format::Cjs => (EnginePlatform::Node, CJS_TARGETS, Vec::new(), ".js", false),
        };

        Self {
            format,
            entries,
            cwd: PathBuf::from("."),
            out_dir: PathBuf::from(kiln_config::DEFAULT_OUT_DIR),
            outbase: PathBuf::from("."),
            platform,
            targets: targets.iter().map(|t| (*t).to_string()).collect(),
            conditions,
            external: Vec::new(),
            aliases: Vec::new(),
            banner: None,
            out_extension: out_extension.to_string(),
            tree_shaking,
            minify: Minify::NONE,
            watch: false,
            dts: None,
        }
    }

    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = cwd.as_ref().to_path_buf();
        self
    }

    pub fn out_dir(mut self, out_dir: impl AsRef<Path>) -> Self {
        self.out_dir = out_dir.as_ref().to_path_buf();
        self
    }

    pub fn outbase(mut self, outbase: impl AsRef<Path>) -> Self {
        self.outbase = outbase.as_ref().to_path_buf();
        self
    }

    pub fn platform(mut self, platform: EnginePlatform) -> Self {
        self.platform = platform;
        self
    }

    pub fn external<S, I>(mut self, names: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        self.external.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn aliases(mut self, aliases: Vec<(String, String)>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn banner(mut self, banner: Option<impl Into<String>>) -> Self {
        self.banner = banner.map(Into::into);
        self
    }

    pub fn minify(mut self, minify: Minify) -> Self {
        self.minify = minify;
        self
    }

    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn dts(mut self, dts: Option<DtsOptions>) -> Self {
        self.dts = dts;
        self
    }

    pub fn emits_declarations(&self) -> bool {
        self.dts.is_some()
    }
}
