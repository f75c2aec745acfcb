//! Synchronous subprocess helpers.
//!
//! Children always receive their working directory explicitly; the
//! parent process never changes its own.

use std::path::Path;
use std::process::Command;

use anyhow::Context;

/// Run a program with inherited standard streams.
///
/// Fails if the program cannot be spawned or exits non-zero.
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> anyhow::Result<()> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let status = cmd
        .status()
        .with_context(|| format!("Failed to run {} {:?}", program, args))?;
    if !status.success() {
        anyhow::bail!("{} {:?} failed with {}", program, args, status);
    }
    Ok(())
}

/// Run a full command line through `sh -c` with inherited streams.
pub fn run_shell(command_line: &str, cwd: Option<&Path>) -> anyhow::Result<()> {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command_line]);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let status = cmd
        .status()
        .with_context(|| format!("Failed to run shell command '{}'", command_line))?;
    if !status.success() {
        anyhow::bail!("Command '{}' failed with {}", command_line, status);
    }
    Ok(())
}

/// Run a program and capture its trimmed stdout.
pub fn capture(program: &str, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {} {:?}", program, args))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{} {:?} failed: {}", program, args, stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
