//! npm package manifest access.
//!
//! Only the parts of package.json the pipeline acts on are modeled; the
//! build phases care whether a package exists and whether it declares a
//! build script.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

use crate::config::store::is_truthy;

/// Subset of an npm package manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    /// The scripts table, kept raw; absent or malformed tables simply
    /// mean no build script
    #[serde(default)]
    pub scripts: Value,
}

impl PackageManifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse manifest")
    }

    /// Whether the package declares a build script.
    pub fn has_build_script(&self) -> bool {
        self.scripts.get("build").is_some_and(is_truthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_script_detected() {
        let manifest =
            PackageManifest::from_json(r#"{"scripts": {"build": "tsc"}}"#).unwrap();
        assert!(manifest.has_build_script());
    }

    #[test]
    fn test_no_scripts_table() {
        let manifest = PackageManifest::from_json(r#"{"name": "weather"}"#).unwrap();
        assert!(!manifest.has_build_script());
    }

    #[test]
    fn test_empty_build_script_counts_as_absent() {
        let manifest = PackageManifest::from_json(r#"{"scripts": {"build": ""}}"#).unwrap();
        assert!(!manifest.has_build_script());
    }

    #[test]
    fn test_scripts_not_an_object() {
        let manifest = PackageManifest::from_json(r#"{"scripts": "oops"}"#).unwrap();
        assert!(!manifest.has_build_script());
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        assert!(PackageManifest::from_json("not json").is_err());
    }
}
