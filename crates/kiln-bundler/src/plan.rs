//! Resolved build plan.
//!
//! A [`BuildPlan`] is computed once per invocation from the package manifest
//! and the command-line flags. It owns every decision of the build:
//!
//! - which entries go into which format pass (preset entries are CommonJS only),
//! - the external set of each pass,
//! - where declarations come from ([`Declarations`]).

use crate::dts_mapper::DeclarationMapping;
use crate::executor::Job;
use crate::externals::{NoExternal, apply_no_external, package_externals};
use crate::platform::{PlatformStrategy, strategy_for};
use crate::task::{CompileTask, DtsOptions, Minify};
use crate::{Error, Result};
use kiln_config::{Format, PackageManifest, TSCONFIG_FILE};
use path_clean::PathClean;
use std::path::{Component, Path, PathBuf};

/// Command-line switches that influence the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildFlags {
    pub optimized: bool,
    pub watch: bool,
}

/// Source of type declarations for the build.
///
/// Declaration generation is attached to exactly one format pass: the first
/// requested format whose pass has entries. A requested ESM pass made only
/// of presets is skipped, so the next format carries the declarations. It
/// only happens for optimized builds of packages with a `tsconfig.json`.
/// Development builds of such packages get mapping stubs instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declarations {
    /// No `tsconfig.json`; nothing is emitted.
    None,
    /// Generated by the compile pass of this format.
    Generated(Format),
    /// One re-export stub per entry.
    DevMapping,
}

impl Declarations {
    /// `formats` are the passes that will run, in requested order.
    pub fn decide(formats: &[Format], optimized: bool, has_tsconfig: bool) -> Self {
        if !has_tsconfig {
            return Declarations::None;
        }
        if !optimized {
            return Declarations::DevMapping;
        }
        formats
            .first()
            .map_or(Declarations::None, |first| Declarations::Generated(*first))
    }
}

/// One configured entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the package root, normalized (`./src/a.ts` → `src/a.ts`).
    pub relative: PathBuf,

    /// Absolute path.
    pub path: PathBuf,
}

impl Entry {
    /// Preset modules rely on CommonJS globals and are never emitted as ESM.
    pub fn is_preset(&self) -> bool {
        self.relative
            .file_name()
            .is_some_and(|name| name.to_string_lossy().contains("preset"))
    }
}

#[derive(Debug)]
pub struct BuildPlan {
    pub root: PathBuf,
    pub package_name: String,
    pub out_dir: PathBuf,
    pub entries: Vec<Entry>,

    /// Lowest common directory of all entries.
    pub outbase: PathBuf,

    pub formats: Vec<Format>,

    /// Externals shared by every pass, after `noExternal` filtering.
    pub externals: Vec<String>,

    pub declarations: Declarations,
    pub flags: BuildFlags,
    pub minify: Minify,

    strategy: Box<dyn PlatformStrategy>,
    no_external: NoExternal,
}

impl BuildPlan {
    /// Resolve the plan of the package rooted at `root`.
    ///
    /// # Errors
    ///
    /// - `Error::NoEntries` when the manifest lists no entries
    /// - `Error::EntryNotFound` when an entry is missing on disk
    /// - `Error::InvalidConfig` for entries outside the package, a missing
    ///   `bundler` section or malformed `noExternal` patterns
    /// - `Error::InvalidOutputPath` when the output directory leaves the package
    pub fn resolve(
        root: impl AsRef<Path>,
        manifest: &PackageManifest,
        flags: BuildFlags,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let bundler = manifest.bundler.as_ref().ok_or_else(|| {
            Error::InvalidConfig("package.json has no 'bundler' section".to_string())
        })?;

        if bundler.entries.is_empty() {
            return Err(Error::NoEntries);
        }

        let entries = bundler
            .entries
            .iter()
            .map(|entry| resolve_entry(&root, entry))
            .collect::<Result<Vec<_>>>()?;

        let out_dir = resolve_out_dir(&root, &bundler.out_dir())?;
        let outbase = common_dir(entries.iter().map(|e| e.relative.as_path()));
        let formats = bundler.formats();
        let no_external = NoExternal::parse(&bundler.no_external)?;
        let externals = apply_no_external(
            package_externals(manifest, &bundler.externals),
            &no_external,
        );
        let has_tsconfig = root.join(TSCONFIG_FILE).is_file();
        let runnable: Vec<Format> = formats
            .iter()
            .copied()
            .filter(|f| pass_entries(&entries, *f).next().is_some())
            .collect();
        let declarations = Declarations::decide(&runnable, flags.optimized, has_tsconfig);

        let plan = Self {
            outbase: root.join(outbase),
            package_name: manifest.name.clone(),
            out_dir,
            entries,
            formats,
            externals,
            declarations,
            flags,
            minify: Minify::for_profile(flags.optimized, bundler.minify_whitespace),
            strategy: strategy_for(bundler.platform),
            no_external,
            root,
        };

        tracing::debug!(
            package = %plan.package_name,
            entries = plan.entries.len(),
            formats = ?plan.formats,
            platform = plan.strategy.name(),
            declarations = ?plan.declarations,
            "resolved build plan"
        );

        Ok(plan)
    }

    pub fn strategy(&self) -> &dyn PlatformStrategy {
        self.strategy.as_ref()
    }

    /// Entries of the ESM pass (every non-preset entry).
    pub fn esm_entries(&self) -> impl Iterator<Item = &Entry> {
        pass_entries(&self.entries, Format::Esm)
    }

    /// Entries of the CommonJS pass (all entries).
    pub fn cjs_entries(&self) -> impl Iterator<Item = &Entry> {
        pass_entries(&self.entries, Format::Cjs)
    }

    /// Compile task of one format pass, or `None` when the pass has no entries.
    pub fn task(&self, format: Format) -> Option<CompileTask> {
        let entries: Vec<&Path> = pass_entries(&self.entries, format)
            .map(|e| e.path.as_path())
            .collect();
        if entries.is_empty() {
            return None;
        }

        let dts = match self.declarations {
            Declarations::Generated(f) if f == format => Some(DtsOptions {
                tsconfig: self.root.join(TSCONFIG_FILE),
                root_dir: self.outbase.clone(),
            }),
            _ => None,
        };

        let task = CompileTask::new(format, entries)
            .cwd(&self.root)
            .out_dir(&self.out_dir)
            .outbase(&self.outbase)
            .external(self.externals.iter().cloned())
            .minify(self.minify)
            .watch(self.flags.watch)
            .dts(dts);

        let task = match format {
            Format::Esm => {
                let extra =
                    apply_no_external(self.strategy.esm_externals(), &self.no_external);
                task.platform(self.strategy.engine_platform())
                    .external(extra)
                    .aliases(self.strategy.aliases())
                    .banner(self.strategy.esm_banner())
            }
            Format::Cjs => task,
        };

        Some(task)
    }

    /// Compile tasks in requested-format order; passes without entries are skipped.
    pub fn tasks(&self) -> Vec<CompileTask> {
        self.formats.iter().filter_map(|f| self.task(*f)).collect()
    }

    /// Formats requested but skipped because they have no entries.
    pub fn skipped_formats(&self) -> Vec<Format> {
        self.formats
            .iter()
            .copied()
            .filter(|f| self.task(*f).is_none())
            .collect()
    }

    /// Mapping stubs to write, one per entry, for development builds.
    pub fn declaration_mappings(&self) -> Vec<DeclarationMapping> {
        if self.declarations != Declarations::DevMapping {
            return Vec::new();
        }
        self.entries
            .iter()
            .map(|e| DeclarationMapping::for_entry(&e.path, &self.outbase, &self.out_dir))
            .collect()
    }

    /// Every job of the compilation phase.
    pub fn jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.tasks().into_iter().map(Job::Compile).collect();
        jobs.extend(self.declaration_mappings().into_iter().map(Job::Mapping));
        jobs
    }
}

fn pass_entries(entries: &[Entry], format: Format) -> impl Iterator<Item = &Entry> {
    entries
        .iter()
        .filter(move |e| format == Format::Cjs || !e.is_preset())
}

fn resolve_entry(root: &Path, entry: &str) -> Result<Entry> {
    let relative = Path::new(entry).clean();
    if relative.is_absolute() || relative.starts_with("..") {
        return Err(Error::InvalidConfig(format!(
            "entry '{entry}' must be relative to the package root"
        )));
    }

    let path = root.join(&relative);
    if !path.is_file() {
        return Err(Error::EntryNotFound(path));
    }

    Ok(Entry { relative, path })
}

fn resolve_out_dir(root: &Path, out_dir: &Path) -> Result<PathBuf> {
    let relative = out_dir.clean();
    if relative.is_absolute()
        || relative.starts_with("..")
        || relative.as_os_str().is_empty()
        || relative == Path::new(".")
    {
        return Err(Error::InvalidOutputPath(format!(
            "'{}' must be a directory inside the package",
            out_dir.display()
        )));
    }
    Ok(root.join(relative))
}

/// Lowest common parent directory of relative file paths.
fn common_dir<'a>(files: impl Iterator<Item = &'a Path>) -> PathBuf {
    let mut common: Option<Vec<Component<'a>>> = None;

    for file in files {
        let dir: Vec<Component<'a>> = file
            .parent()
            .map(|p| p.components().collect())
            .unwrap_or_default();

        common = Some(match common {
            None => dir,
            Some(prev) => prev
                .into_iter()
                .zip(dir)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }

    common
        .unwrap_or_default()
        .iter()
        .map(|c| c.as_os_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_policy() {
        let both = [Format::Esm, Format::Cjs];
        let cjs_first = [Format::Cjs, Format::Esm];

        assert_eq!(Declarations::decide(&both, true, false), Declarations::None);
        assert_eq!(Declarations::decide(&both, false, false), Declarations::None);
        assert_eq!(Declarations::decide(&both, false, true), Declarations::DevMapping);
        assert_eq!(
            Declarations::decide(&both, true, true),
            Declarations::Generated(Format::Esm)
        );
        assert_eq!(
            Declarations::decide(&cjs_first, true, true),
            Declarations::Generated(Format::Cjs)
        );
    }

    #[test]
    fn preset_detection_uses_file_name() {
        let entry = |p: &str| Entry {
            relative: PathBuf::from(p),
            path: PathBuf::from("/pkg").join(p),
        };
        assert!(entry("src/presets/foo-preset.ts").is_preset());
        assert!(entry("src/preset.ts").is_preset());
        assert!(!entry("src/presets/index.ts").is_preset());
        assert!(!entry("src/index.ts").is_preset());
    }

    #[test]
    fn common_dir_of_entries() {
        let files = [
            Path::new("src/index.ts"),
            Path::new("src/presets/foo-preset.ts"),
        ];
        assert_eq!(common_dir(files.into_iter()), PathBuf::from("src"));

        let files = [Path::new("src/a/x.ts"), Path::new("src/a/y.ts")];
        assert_eq!(common_dir(files.into_iter()), PathBuf::from("src/a"));

        let files = [Path::new("index.ts"), Path::new("src/y.ts")];
        assert_eq!(common_dir(files.into_iter()), PathBuf::new());
    }

    #[test]
    fn out_dir_must_stay_inside_package() {
        let root = Path::new("/pkg");
        assert_eq!(
            resolve_out_dir(root, Path::new("./dist")).unwrap(),
            PathBuf::from("/pkg/dist")
        );
        assert!(resolve_out_dir(root, Path::new("../dist")).is_err());
        assert!(resolve_out_dir(root, Path::new("/tmp/dist")).is_err());
        assert!(resolve_out_dir(root, Path::new(".")).is_err());
        assert!(resolve_out_dir(root, Path::new("dist/../..")).is_err());
    }
}
