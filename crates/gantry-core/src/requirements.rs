//! Requirement probes run before the proxy starts.
//!
//! A probe asks the tool itself for its version. Names without a
//! registered probe pass through unverified rather than failing, so
//! configurations can declare requirements the pipeline does not know
//! how to check yet.

use anyhow::Context;

use crate::config::Requirement;
use crate::exec;

/// Result of probing a single requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// The tool responded; `detail` carries its reported version.
    Verified { detail: String },
    /// No probe is registered for this requirement name.
    Unverified,
}

/// Probes declared requirements against the running system.
#[derive(Debug)]
pub struct RequirementChecker {
    node_program: String,
}

impl RequirementChecker {
    /// Create a checker using the system `node` executable.
    pub fn new() -> Self {
        Self {
            node_program: "node".to_string(),
        }
    }

    /// Create a checker with a custom node executable.
    pub fn with_node_program(node_program: impl Into<String>) -> Self {
        Self {
            node_program: node_program.into(),
        }
    }

    /// Probe one requirement.
    ///
    /// A registered probe that fails to answer is an error; the caller
    /// is expected to abort processing.
    pub fn check(&self, requirement: &Requirement) -> anyhow::Result<CheckOutcome> {
        match requirement.name.as_str() {
            "node" => {
                let version = exec::capture(&self.node_program, &["--version"])
                    .with_context(|| {
                        format!("Failed to check requirement '{}'", requirement.name)
                    })?;
                Ok(CheckOutcome::Verified { detail: version })
            }
            _ => Ok(CheckOutcome::Unverified),
        }
    }
}

impl Default for RequirementChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(name: &str) -> Requirement {
        Requirement {
            name: name.to_string(),
            version: None,
        }
    }

    #[test]
    fn test_unknown_requirement_passes_unverified() {
        let checker = RequirementChecker::new();
        let outcome = checker.check(&requirement("python")).unwrap();
        assert_eq!(outcome, CheckOutcome::Unverified);
    }

    #[test]
    #[cfg(unix)]
    fn test_node_probe_captures_version() {
        // echo stands in for node and reports whatever it is asked.
        let checker = RequirementChecker::with_node_program("echo");
        let outcome = checker.check(&requirement("node")).unwrap();
        assert_eq!(
            outcome,
            CheckOutcome::Verified {
                detail: "--version".to_string()
            }
        );
    }

    #[test]
    fn test_failed_probe_is_an_error() {
        let checker = RequirementChecker::with_node_program("definitely-not-a-real-node-xyz");
        let err = checker.check(&requirement("node")).unwrap_err();
        assert!(err.to_string().contains("Failed to check requirement 'node'"));
    }
}
