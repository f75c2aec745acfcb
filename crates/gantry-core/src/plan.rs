//! Build plan handed from the analyzer to the Dockerfile and the
//! in-image build phase.
//!
//! The plan is plain JSON with camelCase keys so the Dockerfile can
//! slice instruction lists out of it with standard tooling.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server whose sources live in the build context and are compiled
/// into the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalServer {
    /// Server name from the configuration
    pub name: String,

    /// Server directory relative to the context root, e.g. "mcps/weather"
    pub path: String,

    /// Same directory with an explicit leading "./"
    #[serde(default)]
    pub local_path: String,

    /// Entry-point file relative to the context root
    #[serde(default)]
    pub file_path: String,

    /// Full server entry as found in the configuration
    #[serde(default)]
    pub config: Value,
}

/// Commands a server wants to run while the image is built.
///
/// The payload is forwarded untouched; the build tooling that consumes
/// it decides what to do with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerBuildCommands {
    /// Server name from the configuration
    pub server: String,

    /// Opaque command payload
    pub commands: Value,
}

/// Everything the image build needs to know about local servers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    /// Servers detected as locally built
    pub local_servers: Vec<LocalServer>,

    /// Docker COPY lines bringing server sources into the image
    #[serde(default)]
    pub copy_instructions: Vec<String>,

    /// Docker RUN/WORKDIR lines compiling each server
    #[serde(default)]
    pub build_instructions: Vec<String>,

    /// Per-server build-time command payloads
    #[serde(default)]
    pub build_commands: Vec<ServerBuildCommands>,
}

impl BuildPlan {
    /// Load a plan from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read build plan: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse build plan: {}", path.display()))
    }

    /// Write the plan with two-space indentation.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec_pretty(self).context("Failed to serialize build plan")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write build plan: {}", path.display()))?;
        Ok(())
    }
}
