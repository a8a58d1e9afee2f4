//! External module set computation.
//!
//! The external set of a package is its own name, the extra externals from
//! the manifest, and every runtime and peer dependency, in that order.
//! `noExternal` patterns are applied last and always win: a module matching
//! a `noExternal` pattern is bundled even when it is also a dependency.

use crate::{Error, Result};
use indexmap::IndexSet;
use kiln_config::PackageManifest;
use regex::Regex;

/// Module name patterns that are forced into the bundle.
///
/// A pattern written as `/…/` is a regular expression matched against the
/// module name. Anything else matches the exact name and its subpaths
/// (`lodash` matches `lodash` and `lodash/merge`, not `lodash-es`).
#[derive(Debug, Clone, Default)]
pub struct NoExternal {
    names: Vec<String>,
    patterns: Vec<Regex>,
}

impl NoExternal {
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut no_external = Self::default();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            match regex_body(pattern) {
                Some(body) => {
                    let regex = Regex::new(body).map_err(|e| {
                        Error::InvalidConfig(format!(
                            "invalid 'noExternal' pattern {pattern}: {e}"
                        ))
                    })?;
                    no_external.patterns.push(regex);
                }
                None => no_external.names.push(pattern.to_string()),
            }
        }

        Ok(no_external)
    }

    pub fn matches(&self, module: &str) -> bool {
        self.names.iter().any(|name| {
            module == name
                || module
                    .strip_prefix(name.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        }) || self.patterns.iter().any(|re| re.is_match(module))
    }
}

fn regex_body(pattern: &str) -> Option<&str> {
    if pattern.len() > 2 && pattern.starts_with('/') && pattern.ends_with('/') {
        Some(&pattern[1..pattern.len() - 1])
    } else {
        None
    }
}

/// Base external set shared by every format pass.
pub fn package_externals(manifest: &PackageManifest, extra: &[String]) -> IndexSet<String> {
    let mut externals = IndexSet::new();
    externals.insert(manifest.name.clone());
    externals.extend(extra.iter().cloned());
    externals.extend(manifest.dependency_names().map(str::to_string));
    externals
}

/// Remove every module `no_external` forces into the bundle.
pub fn apply_no_external<I>(externals: I, no_external: &NoExternal) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    externals
        .into_iter()
        .filter(|name| !name.is_empty())
        .filter(|name| !no_external.matches(name))
        .collect()
}
