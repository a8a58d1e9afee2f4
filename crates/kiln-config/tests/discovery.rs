//! Tests for manifest loading from disk and environment overrides.

use kiln_config::{ConfigError, Format, ManifestLoader, Platform};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
  "name": "@acme/widgets",
  "version": "1.0.0",
  "scripts": { "build": "kiln" },
  "dependencies": { "lodash": "^4.17.0" },
  "peerDependencies": { "react": "^18.0.0" },
  "bundler": {
    "entries": ["./src/index.ts", "./src/presets/widget-preset.ts"],
    "externals": ["virtual:theme"],
    "platform": "node",
    "pre": "./scripts/pre.js",
    "formats": ["cjs"]
  }
}"#;

fn package(json: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), json).unwrap();
    dir
}

#[test]
fn loads_bundler_section_and_dependencies() {
    let dir = package(MANIFEST);
    let manifest = ManifestLoader::new(dir.path()).without_env().load().unwrap();

    assert_eq!(manifest.name, "@acme/widgets");
    assert!(manifest.dependencies.contains_key("lodash"));
    assert!(manifest.peer_dependencies.contains_key("react"));

    let bundler = manifest.bundler.unwrap();
    assert_eq!(bundler.entries.len(), 2);
    assert_eq!(bundler.externals, vec!["virtual:theme".to_string()]);
    assert_eq!(bundler.platform, Platform::Node);
    assert_eq!(bundler.pre, Some(PathBuf::from("./scripts/pre.js")));
    assert_eq!(bundler.post, None);
    assert_eq!(bundler.formats(), vec![Format::Cjs]);
}

#[test]
fn unknown_format_is_rejected() {
    let dir = package(r#"{ "name": "pkg", "bundler": { "formats": ["iife"] } }"#);
    let err = ManifestLoader::new(dir.path()).without_env().load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidManifest { .. }));
    assert!(err.to_string().contains("package.json"));
}

#[test]
#[serial]
fn environment_overrides_manifest() {
    let dir = package(MANIFEST);

    unsafe {
        std::env::set_var("KILN_BUNDLER__PLATFORM", "browser");
    }
    let manifest = ManifestLoader::new(dir.path()).load();
    unsafe {
        std::env::remove_var("KILN_BUNDLER__PLATFORM");
    }

    let bundler = manifest.unwrap().bundler.unwrap();
    assert_eq!(bundler.platform, Platform::Browser);
    // Untouched keys survive the merge
    assert_eq!(bundler.entries.len(), 2);
}

#[test]
#[serial]
fn without_env_ignores_overrides() {
    let dir = package(MANIFEST);

    unsafe {
        std::env::set_var("KILN_BUNDLER__PLATFORM", "browser");
    }
    let manifest = ManifestLoader::new(dir.path()).without_env().load();
    unsafe {
        std::env::remove_var("KILN_BUNDLER__PLATFORM");
    }

    assert_eq!(manifest.unwrap().bundler.unwrap().platform, Platform::Node);
}

#[test]
#[serial]
fn environment_overrides_camel_case_fields() {
    let dir = package(MANIFEST);

    unsafe {
        std::env::set_var("KILN_BUNDLER__OUTDIR", "build");
        std::env::set_var("KILN_BUNDLER__NO_EXTERNAL", "[lodash]");
        std::env::set_var("KILN_BUNDLER__MINIFYWHITESPACE", "true");
    }
    let manifest = ManifestLoader::new(dir.path()).load();
    unsafe {
        std::env::remove_var("KILN_BUNDLER__OUTDIR");
        std::env::remove_var("KILN_BUNDLER__NO_EXTERNAL");
        std::env::remove_var("KILN_BUNDLER__MINIFYWHITESPACE");
    }

    let manifest = manifest.unwrap();
    let bundler = manifest.bundler.unwrap();
    assert_eq!(bundler.out_dir(), PathBuf::from("build"));
    assert_eq!(bundler.no_external, vec!["lodash".to_string()]);
    assert!(bundler.minify_whitespace);
    assert_eq!(bundler.platform, Platform::Node);
}

#[test]
fn dependency_names_are_alphabetical() {
    let dir = package(
        r#"{
          "name": "pkg",
          "dependencies": { "zeta": "1", "alpha": "1", "lodash.merge": "1" },
          "peerDependencies": { "react": "18", "preact": "10" },
          "bundler": { "entries": ["./src/index.ts"] }
        }"#,
    );
    let manifest = ManifestLoader::new(dir.path()).without_env().load().unwrap();

    assert_eq!(
        manifest.dependency_names().collect::<Vec<_>>(),
        vec!["alpha", "lodash.merge", "zeta", "preact", "react"]
    );
}
