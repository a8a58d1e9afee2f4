//! # kiln-config
//!
//! Package manifest model for the kiln build orchestrator.
//!
//! The build is driven by the `bundler` block of a package's `package.json`:
//!
//! ```json
//! {
//!   "name": "@acme/widgets",
//!   "dependencies": { "lodash": "^4.17.0" },
//!   "bundler": {
//!     "entries": ["./src/index.ts", "./src/presets/widget-preset.ts"],
//!     "platform": "node",
//!     "formats": ["esm", "cjs"]
//!   }
//! }
//! ```

pub mod discovery;
pub mod error;
pub mod manifest;

pub use discovery::{ManifestLoader, bundler_section};
pub use error::{ConfigError, Result};
pub use manifest::{BundlerSection, Format, PackageManifest, Platform};

/// Manifest file name looked up in the package root.
pub const MANIFEST_FILE: &str = "package.json";

/// TypeScript project file whose presence enables declaration output.
pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// Output directory used when the manifest does not name one.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Prefix of environment variables that override manifest values.
pub const ENV_PREFIX: &str = "KILN_";
