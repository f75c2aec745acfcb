//! In-image build of local servers from a previously written plan.
//!
//! Runs at image build time, inside the image. The plan being absent is
//! not an error: images without local servers simply skip this phase.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::paths::{APP_ROOT, BUILD_PLAN_RUNTIME};
use crate::exec;
use crate::manifest::PackageManifest;
use crate::plan::BuildPlan;

/// What happened to a single server during the build pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerBuildOutcome {
    /// No package.json in the server directory; nothing to do.
    NoManifest,
    /// Dependencies installed; the package declares no build script.
    Installed,
    /// Dependencies installed and the build script ran.
    Built {
        /// Whether a build/ directory exists afterwards
        output_found: bool,
    },
}

/// Per-server result of the build pass.
#[derive(Debug, Clone)]
pub struct ServerBuildResult {
    /// Server name from the plan
    pub name: String,
    /// Server directory inside the image
    pub server_dir: PathBuf,
    /// What the pass did for this server
    pub outcome: ServerBuildOutcome,
}

/// Report from a build pass.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// False when no plan file was present and the pass was skipped
    pub plan_found: bool,
    /// Per-server results, in plan order
    pub servers: Vec<ServerBuildResult>,
}

/// Build command orchestrator.
#[derive(Debug)]
pub struct BuildCommand {
    /// Plan written by the analyze phase
    plan_path: PathBuf,
    /// Root the plan's server paths resolve against
    app_root: PathBuf,
    /// npm executable
    npm_program: String,
}

impl BuildCommand {
    /// Create a new build command.
    pub fn new(plan_path: PathBuf, app_root: PathBuf) -> Self {
        Self {
            plan_path,
            app_root,
            npm_program: "npm".to_string(),
        }
    }

    /// Create a build command with the standard in-image paths.
    pub fn with_defaults() -> Self {
        Self::new(PathBuf::from(BUILD_PLAN_RUNTIME), PathBuf::from(APP_ROOT))
    }

    /// Override the npm executable.
    pub fn with_npm_program(mut self, npm_program: impl Into<String>) -> Self {
        self.npm_program = npm_program.into();
        self
    }

    /// Execute the build command.
    pub fn execute(&self) -> anyhow::Result<BuildReport> {
        if !self.plan_path.exists() {
            tracing::info!(
                plan = %self.plan_path.display(),
                "no build plan found, skipping local server builds"
            );
            return Ok(BuildReport {
                plan_found: false,
                servers: Vec::new(),
            });
        }

        let plan = BuildPlan::load(&self.plan_path)?;
        tracing::info!(count = plan.local_servers.len(), "processing local servers");

        let mut servers = Vec::new();
        for server in &plan.local_servers {
            let server_dir = self.app_root.join(&server.path);
            tracing::info!(server = %server.name, dir = %server_dir.display(), "processing server");
            let outcome = self
                .build_server(&server.name, &server_dir)
                .with_context(|| format!("Failed to process server '{}'", server.name))?;
            servers.push(ServerBuildResult {
                name: server.name.clone(),
                server_dir,
                outcome,
            });
        }

        Ok(BuildReport {
            plan_found: true,
            servers,
        })
    }

    fn build_server(&self, name: &str, server_dir: &Path) -> anyhow::Result<ServerBuildOutcome> {
        let manifest_path = server_dir.join("package.json");
        if !manifest_path.exists() {
            return Ok(ServerBuildOutcome::NoManifest);
        }

        tracing::info!(server = name, "installing dependencies");
        exec::run(&self.npm_program, &["ci"], Some(server_dir))?;

        let manifest = PackageManifest::load(&manifest_path)?;
        if !manifest.has_build_script() {
            return Ok(ServerBuildOutcome::Installed);
        }

        tracing::info!(server = name, "running build script");
        exec::run(&self.npm_program, &["run", "build"], Some(server_dir))?;

        let build_dir = server_dir.join("build");
        let output_found = build_dir.exists();
        if output_found {
            let entries = build_output_entries(&build_dir)?;
            tracing::debug!(server = name, entries = ?entries, "build output");
        }
        Ok(ServerBuildOutcome::Built { output_found })
    }
}

/// Names of the build output entries, sorted.
fn build_output_entries(build_dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = std::fs::read_dir(build_dir)
        .with_context(|| format!("Failed to read build directory: {}", build_dir.display()))?;
    for entry in entries {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
