//! Platform strategies for the ESM pass.
//!
//! The `platform` field of the manifest selects one strategy. Each strategy
//! decides the engine platform, the extra externals, the module aliases and
//! the banner of ESM output. The CommonJS pass always targets Node.js and
//! does not consult the strategy.

use crate::builtins::node_builtin_externals;
use crate::task::EnginePlatform;
use kiln_config::Platform;

/// Prepended to Node.js ESM output so bundled CommonJS code can keep using
/// `require`, `__filename` and `__dirname`.
pub const ESM_REQUIRE_SHIM: &str = "\
import ESM_COMPAT_Module from \"node:module\";
import { fileURLToPath as ESM_COMPAT_fileURLToPath } from \"node:url\";
import { dirname as ESM_COMPAT_dirname } from \"node:path\";
const __filename = ESM_COMPAT_fileURLToPath(import.meta.url);
const __dirname = ESM_COMPAT_dirname(__filename);
const require = ESM_COMPAT_Module.createRequire(import.meta.url);";

/// Per-platform wiring of the ESM pass.
pub trait PlatformStrategy: Send + Sync + std::fmt::Debug {
    /// Identifier used in logs.
    fn name(&self) -> &'static str;

    fn engine_platform(&self) -> EnginePlatform;

    /// Modules external to the ESM pass on top of the package externals.
    fn esm_externals(&self) -> Vec<String> {
        Vec::new()
    }

    /// Module substitutions applied while bundling (`from → to`).
    fn aliases(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Source prepended to each ESM output file.
    fn esm_banner(&self) -> Option<&'static str> {
        None
    }
}

/// Server-side packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodePlatform;

impl PlatformStrategy for NodePlatform {
    fn name(&self) -> &'static str {
        "node"
    }

    fn engine_platform(&self) -> EnginePlatform {
        EnginePlatform::Node
    }

    fn esm_externals(&self) -> Vec<String> {
        node_builtin_externals().collect()
    }

    fn esm_banner(&self) -> Option<&'static str> {
        Some(ESM_REQUIRE_SHIM)
    }
}

/// Browser-like packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPlatform;

impl PlatformStrategy for BrowserPlatform {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn engine_platform(&self) -> EnginePlatform {
        EnginePlatform::Browser
    }

    fn aliases(&self) -> Vec<(String, String)> {
        [
            ("process", "process/browser.js"),
            ("util", "util/util.js"),
            ("assert", "browser-assert"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
    }
}

/// Strategy for a manifest platform.
pub fn strategy_for(platform: Platform) -> Box<dyn PlatformStrategy> {
    match platform {
        Platform::Node => Box::new(NodePlatform),
        Platform::Browser => Box::new(BrowserPlatform),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_strategy_externalizes_builtins_and_shims_require() {
        let strategy = strategy_for(Platform::Node);
        assert_eq!(strategy.name(), "node");
        assert_eq!(strategy.engine_platform(), EnginePlatform::Node);
        assert!(strategy.esm_externals().contains(&"node:fs".to_string()));
        assert!(strategy.aliases().is_empty());

        let banner = strategy.esm_banner().unwrap();
        assert!(banner.contains("createRequire(import.meta.url)"));
        assert!(banner.contains("const __dirname"));
    }

    #[test]
    fn browser_strategy_aliases_node_polyfills() {
        let strategy = strategy_for(Platform::Browser);
        assert_eq!(strategy.engine_platform(), EnginePlatform::Browser);
        assert!(strategy.esm_externals().is_empty());
        assert!(strategy.esm_banner().is_none());

        let aliases = strategy.aliases();
        assert!(aliases.contains(&("process".to_string(), "process/browser.js".to_string())));
        assert!(aliases.contains(&("util".to_string(), "util/util.js".to_string())));
        assert!(aliases.contains(&("assert".to_string(), "browser-assert".to_string())));
    }
}
