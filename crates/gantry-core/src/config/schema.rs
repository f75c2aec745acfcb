//! Schema for the pipeline-specific fields of a server entry.
//!
//! Server entries are otherwise opaque JSON; only the fields the
//! pipeline itself consumes get typed views here. Both fields are
//! removed from the clean configuration before the proxy sees it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A runtime requirement declared by a server entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    /// Tool name, e.g. "node"
    pub name: String,

    /// Version hint, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A command executed through the shell before the proxy starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreRunCommand {
    /// Program or shell snippet to run
    pub command: String,

    /// Arguments appended to the command line
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the child process (defaults to the app root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl PreRunCommand {
    /// Full command line as handed to the shell.
    pub fn command_line(&self) -> String {
        let mut line = self.command.clone();
        if !self.args.is_empty() {
            line.push(' ');
            line.push_str(&self.args.join(" "));
        }
        line
    }
}
