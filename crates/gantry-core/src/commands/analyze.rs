//! Build-plan analysis of the multi-server configuration.
//!
//! Scans server entries for arguments pointing into the local servers
//! tree, derives each server's context directory, and emits the Docker
//! COPY and RUN instruction lists the image build consumes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

use crate::config::ServersConfig;
use crate::config::paths::{
    APP_PREFIX, APP_ROOT, BUILD_PLAN_OUTPUT, LOCAL_SERVER_MARKER, LOCAL_SERVERS_DIR, SERVERS_CONFIG,
};
use crate::manifest::PackageManifest;
use crate::plan::{BuildPlan, LocalServer, ServerBuildCommands};

/// Manifest files copied ahead of the rest of a server directory so the
/// dependency-install layer caches well.
const MANIFEST_FILES: [&str; 3] = ["package.json", "package-lock.json", "tsconfig.json"];

/// Report from an analyze run.
#[derive(Debug, Clone)]
pub struct AnalyzeReport {
    /// The emitted plan, as written to disk
    pub plan: BuildPlan,
    /// Non-fatal problems found while scanning
    pub warnings: Vec<String>,
}

/// Analyze command orchestrator.
#[derive(Debug)]
pub struct AnalyzeCommand {
    /// Multi-server configuration file
    config_path: PathBuf,
    /// Where the plan is written
    output_path: PathBuf,
    /// Directory the context-relative server paths resolve against
    context_root: PathBuf,
}

impl AnalyzeCommand {
    /// Create a new analyze command.
    pub fn new(config_path: PathBuf, output_path: PathBuf, context_root: PathBuf) -> Self {
        Self {
            config_path,
            output_path,
            context_root,
        }
    }

    /// Create an analyze command with the standard build-context paths.
    pub fn with_defaults() -> Self {
        Self::new(
            PathBuf::from(SERVERS_CONFIG),
            PathBuf::from(BUILD_PLAN_OUTPUT),
            PathBuf::from("."),
        )
    }

    /// Where the plan is written.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Execute the analyze command.
    pub fn execute(&self) -> anyhow::Result<AnalyzeReport> {
        let config = ServersConfig::load(&self.config_path)?;

        let mut local_servers = Vec::new();
        let mut build_commands = Vec::new();

        for entry in config.servers()? {
            if let Some(args) = entry.args()?
                && let Some(entry_point) = find_entry_point(args)
            {
                let file_path = relative_file_path(entry_point);
                let dir = server_directory(&file_path);
                tracing::info!(
                    server = entry.name,
                    dir = %dir,
                    file = %file_path,
                    "found local server"
                );
                local_servers.push(LocalServer {
                    name: entry.name.to_string(),
                    path: dir.clone(),
                    local_path: format!("./{}", dir),
                    file_path,
                    config: entry.raw().clone(),
                });
            }

            // Build-time commands are collected for every server, local or not.
            if let Some(commands) = entry.pre_build() {
                build_commands.push(ServerBuildCommands {
                    server: entry.name.to_string(),
                    commands: commands.clone(),
                });
            }
        }

        let mut copy_instructions = Vec::new();
        let mut build_instructions = Vec::new();
        let mut warnings = Vec::new();

        for server in &local_servers {
            let server_root = self.context_root.join(&server.path);
            if !server_root.exists() {
                tracing::warn!(server = %server.name, dir = %server.local_path, "server directory missing");
                warnings.push(format!(
                    "Local server directory {} does not exist",
                    server.local_path
                ));
                continue;
            }
            tracing::debug!(server = %server.name, "generating copy instructions");
            emit_copy_instructions(server, &server_root, &mut copy_instructions)?;
            emit_build_instructions(server, &server_root, &mut build_instructions)?;
        }

        let plan = BuildPlan {
            local_servers,
            copy_instructions,
            build_instructions,
            build_commands,
        };
        plan.save(&self.output_path)?;

        Ok(AnalyzeReport { plan, warnings })
    }
}

/// First argument that references the local servers tree.
fn find_entry_point(args: &[Value]) -> Option<&str> {
    args.iter()
        .filter_map(Value::as_str)
        .find(|arg| arg.contains(LOCAL_SERVER_MARKER))
}

/// Strip the first container-prefix occurrence, keeping the rest of the
/// argument intact.
fn relative_file_path(entry_point: &str) -> String {
    entry_point.replacen(APP_PREFIX, "", 1)
}

/// Directory of a server inside the build context.
///
/// Entry points under the local servers tree map to their first two
/// path segments, e.g. "mcps/weather/build/index.js" -> "mcps/weather".
/// Anything else falls back to the parent directory.
fn server_directory(relative_path: &str) -> String {
    let parts: Vec<&str> = relative_path.split('/').collect();
    if parts.len() >= 3 && parts[0] == LOCAL_SERVERS_DIR {
        parts[..2].join("/")
    } else {
        match Path::new(relative_path).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                parent.to_string_lossy().into_owned()
            }
            _ => ".".to_string(),
        }
    }
}

/// Emit COPY lines for one server: known manifests first, then src/,
/// then the remaining plain files.
fn emit_copy_instructions(
    server: &LocalServer,
    server_root: &Path,
    out: &mut Vec<String>,
) -> anyhow::Result<()> {
    for manifest in MANIFEST_FILES {
        if server_root.join(manifest).exists() {
            out.push(format!(
                "COPY {}/{} {}/{}/{}",
                server.local_path, manifest, APP_ROOT, server.path, manifest
            ));
        }
    }

    if server_root.join("src").exists() {
        out.push(format!(
            "COPY {}/src/ {}/{}/src/",
            server.local_path, APP_ROOT, server.path
        ));
    }

    for file in other_plain_files(server_root)? {
        out.push(format!(
            "COPY {}/{} {}/{}/{}",
            server.local_path, file, APP_ROOT, server.path, file
        ));
    }

    Ok(())
}

/// Emit the build block for one server, when it has a package manifest.
fn emit_build_instructions(
    server: &LocalServer,
    server_root: &Path,
    out: &mut Vec<String>,
) -> anyhow::Result<()> {
    let manifest_path = server_root.join("package.json");
    if !manifest_path.exists() {
        return Ok(());
    }

    out.push(format!("# Build {}", server.name));
    out.push(format!("WORKDIR {}/{}", APP_ROOT, server.path));
    out.push("RUN npm ci".to_string());

    let manifest = PackageManifest::load(&manifest_path)?;
    if manifest.has_build_script() {
        out.push("RUN npm run build".to_string());
        out.push(format!(
            "RUN ls -la {}/{}/build/ || echo \"No build directory found\"",
            APP_ROOT, server.path
        ));
    }
    out.push(String::new());

    Ok(())
}

/// Plain files in a server directory that are not one of the known
/// manifests and not hidden, sorted by name.
fn other_plain_files(server_root: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = std::fs::read_dir(server_root)
        .with_context(|| format!("Failed to read directory: {}", server_root.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || MANIFEST_FILES.contains(&name.as_str()) {
            continue;
        }
        let metadata = std::fs::metadata(entry.path())
            .with_context(|| format!("Failed to stat: {}", entry.path().display()))?;
        if metadata.is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
