//! Integration tests for the prepare command

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

use gantry_core::commands::PrepareCommand;
use gantry_core::requirements::CheckOutcome;

fn write_config(root: &Path, config: &Value) -> PathBuf {
    let path = root.join("servers.json");
    std::fs::write(&path, serde_json::to_vec_pretty(config).unwrap()).unwrap();
    path
}

#[test]
fn prepare_strips_runtime_fields_and_keeps_the_rest() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(
        temp.path(),
        &json!({
            "mcpServers": {
                "weather": {
                    "command": "node",
                    "args": ["/app/mcps/weather/build/index.js"],
                    "requirements": [{"name": "python"}],
                    "env": {"UNIT": "metric"}
                },
                "exa": {
                    "command": "npx",
                    "args": ["-y", "exa-mcp-server"]
                }
            },
            "proxyOptions": {"logLevel": "info"}
        }),
    );
    let output_path = temp.path().join("servers-clean.json");

    let report = PrepareCommand::new(config_path, output_path.clone())
        .execute()
        .unwrap();

    assert_eq!(report.output_path, output_path);
    let text = std::fs::read_to_string(&output_path).unwrap();
    assert!(!text.contains("requirements"));
    assert!(!text.contains("pre:run"));

    let clean: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        clean["mcpServers"]["weather"]["env"]["UNIT"],
        json!("metric")
    );
    assert_eq!(clean["proxyOptions"]["logLevel"], json!("info"));
}

#[test]
fn prepare_writes_four_space_indent_in_config_order() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(
        temp.path(),
        &json!({
            "mcpServers": {
                "zeta": {"command": "node"},
                "alpha": {"command": "npx"}
            }
        }),
    );
    let output_path = temp.path().join("servers-clean.json");

    PrepareCommand::new(config_path, output_path.clone())
        .execute()
        .unwrap();

    let text = std::fs::read_to_string(&output_path).unwrap();
    assert!(text.starts_with("{\n    \"mcpServers\""));
    assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
}

#[test]
#[cfg(unix)]
fn prepare_runs_pre_run_commands_in_their_cwd() {
    let temp = TempDir::new().unwrap();
    let workdir = temp.path().join("work");
    std::fs::create_dir_all(&workdir).unwrap();
    let config_path = write_config(
        temp.path(),
        &json!({
            "mcpServers": {
                "weather": {
                    "command": "node",
                    "pre:run": [{
                        "command": "touch",
                        "args": ["ran.txt"],
                        "cwd": workdir
                    }]
                }
            }
        }),
    );
    let output_path = temp.path().join("servers-clean.json");

    let report = PrepareCommand::new(config_path, output_path)
        .execute()
        .unwrap();

    assert!(workdir.join("ran.txt").exists());
    assert_eq!(report.commands_run, vec!["touch ran.txt"]);
}

#[test]
#[cfg(unix)]
fn prepare_aborts_when_a_pre_run_command_fails() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(
        temp.path(),
        &json!({
            "mcpServers": {
                "weather": {
                    "pre:run": [{"command": "exit", "args": ["7"], "cwd": temp.path()}]
                }
            }
        }),
    );
    let output_path = temp.path().join("servers-clean.json");

    let err = PrepareCommand::new(config_path, output_path.clone())
        .execute()
        .unwrap_err();

    assert!(err.to_string().contains("Pre-run command failed: exit 7"));
    // Nothing gets written when preparation aborts.
    assert!(!output_path.exists());
}

#[test]
#[cfg(unix)]
fn prepare_records_requirement_outcomes() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(
        temp.path(),
        &json!({
            "mcpServers": {
                "weather": {
                    "requirements": [
                        {"name": "node", "version": ">=18"},
                        {"name": "python"}
                    ]
                }
            }
        }),
    );
    let output_path = temp.path().join("servers-clean.json");

    // echo stands in for node; the probe captures its output.
    let report = PrepareCommand::new(config_path, output_path)
        .with_node_program("echo")
        .execute()
        .unwrap();

    assert_eq!(report.requirements.len(), 2);
    assert_eq!(report.requirements[0].server, "weather");
    assert_eq!(report.requirements[0].requirement.name, "node");
    assert!(matches!(
        report.requirements[0].outcome,
        CheckOutcome::Verified { .. }
    ));
    assert_eq!(report.requirements[1].outcome, CheckOutcome::Unverified);
}

#[test]
fn prepare_aborts_when_a_requirement_probe_fails() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(
        temp.path(),
        &json!({
            "mcpServers": {
                "weather": {"requirements": [{"name": "node"}]}
            }
        }),
    );
    let output_path = temp.path().join("servers-clean.json");

    let err = PrepareCommand::new(config_path, output_path)
        .with_node_program("definitely-not-a-real-node-xyz")
        .execute()
        .unwrap_err();

    assert!(err.to_string().contains("Failed to check requirement 'node'"));
}

#[test]
fn prepare_substitutes_environment_placeholders() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(
        temp.path(),
        &json!({
            "mcpServers": {
                "exa": {
                    "env": {
                        "API_KEY": "${GANTRY_PREPARE_TEST_KEY}",
                        "OTHER": "${GANTRY_PREPARE_UNSET_KEY}"
                    }
                }
            }
        }),
    );
    let output_path = temp.path().join("servers-clean.json");

    // SAFETY: test-only, no concurrent threads depend on this env var.
    unsafe { std::env::set_var("GANTRY_PREPARE_TEST_KEY", "k-123") };
    PrepareCommand::new(config_path, output_path.clone())
        .execute()
        .unwrap();
    // SAFETY: test-only cleanup.
    unsafe { std::env::remove_var("GANTRY_PREPARE_TEST_KEY") };

    let text = std::fs::read_to_string(&output_path).unwrap();
    assert!(text.contains("\"API_KEY\": \"k-123\""));
    assert!(text.contains("\"OTHER\": \"${GANTRY_PREPARE_UNSET_KEY}\""));
}

#[test]
fn prepare_fails_without_configuration() {
    let temp = TempDir::new().unwrap();
    let result = PrepareCommand::new(
        temp.path().join("missing.json"),
        temp.path().join("servers-clean.json"),
    )
    .execute();

    assert!(result.is_err());
}
