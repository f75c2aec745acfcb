//! Runtime preparation of the multi-server configuration.
//!
//! Runs once at container start: verifies declared requirements, runs
//! each server's pre-run commands, then writes a clean configuration
//! for the proxy with the pipeline-only fields removed and environment
//! placeholders substituted.

use std::path::PathBuf;

use anyhow::Context;

use crate::config::paths::{APP_ROOT, CLEAN_CONFIG, RUNTIME_CONFIG};
use crate::config::{PreRunCommand, Requirement, ServersConfig};
use crate::envsub;
use crate::exec;
use crate::requirements::{CheckOutcome, RequirementChecker};

/// Result of checking one requirement of one server.
#[derive(Debug, Clone)]
pub struct RequirementReport {
    /// Server the requirement belongs to
    pub server: String,
    /// The requirement as declared
    pub requirement: Requirement,
    /// What the probe found
    pub outcome: CheckOutcome,
}

/// Report from a prepare run.
#[derive(Debug, Clone)]
pub struct PrepareReport {
    /// Every requirement check performed, in configuration order
    pub requirements: Vec<RequirementReport>,
    /// Pre-run command lines that were executed, in order
    pub commands_run: Vec<String>,
    /// Where the clean configuration was written
    pub output_path: PathBuf,
}

/// Prepare command orchestrator.
#[derive(Debug)]
pub struct PrepareCommand {
    /// Configuration consumed at runtime
    config_path: PathBuf,
    /// Where the clean configuration is written
    output_path: PathBuf,
    /// Probes for declared requirements
    checker: RequirementChecker,
}

impl PrepareCommand {
    /// Create a new prepare command.
    pub fn new(config_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            config_path,
            output_path,
            checker: RequirementChecker::new(),
        }
    }

    /// Create a prepare command with the standard in-image paths.
    pub fn with_defaults() -> Self {
        Self::new(PathBuf::from(RUNTIME_CONFIG), PathBuf::from(CLEAN_CONFIG))
    }

    /// Override the node executable used for requirement probes.
    pub fn with_node_program(mut self, node_program: impl Into<String>) -> Self {
        self.checker = RequirementChecker::with_node_program(node_program);
        self
    }

    /// Execute the prepare command.
    pub fn execute(&self) -> anyhow::Result<PrepareReport> {
        let mut config = ServersConfig::load(&self.config_path)?;
        tracing::info!(config = %self.config_path.display(), "configuration loaded");

        let mut requirements = Vec::new();
        let mut commands_run = Vec::new();

        for entry in config.servers()? {
            tracing::info!(server = entry.name, "processing server");

            if let Some(reqs) = entry.requirements()? {
                for requirement in reqs {
                    tracing::info!(
                        server = entry.name,
                        requirement = %requirement.name,
                        version = requirement.version.as_deref().unwrap_or(""),
                        "checking requirement"
                    );
                    let outcome = self.checker.check(&requirement)?;
                    if let CheckOutcome::Verified { detail } = &outcome {
                        tracing::info!(
                            requirement = %requirement.name,
                            version = %detail,
                            "requirement verified"
                        );
                    }
                    requirements.push(RequirementReport {
                        server: entry.name.to_string(),
                        requirement,
                        outcome,
                    });
                }
            }

            if let Some(pre_run) = entry.pre_run()? {
                for command in &pre_run {
                    commands_run.push(run_pre_run_command(command)?);
                }
            }
        }

        config.strip_runtime_fields();
        let text = config.to_json_pretty()?;
        let substituted = envsub::substitute(&text);
        std::fs::write(&self.output_path, substituted).with_context(|| {
            format!(
                "Failed to write clean configuration: {}",
                self.output_path.display()
            )
        })?;
        tracing::info!(output = %self.output_path.display(), "clean configuration written");

        Ok(PrepareReport {
            requirements,
            commands_run,
            output_path: self.output_path.clone(),
        })
    }
}

/// Run one pre-run command through the shell in its configured working
/// directory. Returns the command line that was executed.
fn run_pre_run_command(command: &PreRunCommand) -> anyhow::Result<String> {
    let line = command.command_line();
    let cwd = command
        .cwd
        .clone()
        .unwrap_or_else(|| PathBuf::from(APP_ROOT));
    tracing::info!(command = %line, cwd = %cwd.display(), "running pre-run command");
    exec::run_shell(&line, Some(&cwd))
        .with_context(|| format!("Pre-run command failed: {}", line))?;
    Ok(line)
}
