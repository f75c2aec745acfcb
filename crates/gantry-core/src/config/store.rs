//! Multi-server configuration access.
//!
//! The configuration is held as a raw JSON object rather than a typed
//! document so that key order and unknown fields survive a
//! load/strip/serialize round trip untouched. Typed views exist only
//! for the fields the pipeline itself consumes.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use super::schema::{PreRunCommand, Requirement};

/// Field holding the server entries.
const SERVERS_FIELD: &str = "mcpServers";

/// Pipeline-only field: declared runtime requirements.
const REQUIREMENTS_FIELD: &str = "requirements";

/// Pipeline-only field: commands run before the proxy starts.
const PRE_RUN_FIELD: &str = "pre:run";

/// Field with commands forwarded into the image build.
const PRE_BUILD_FIELD: &str = "pre:build";

/// A loaded multi-server configuration.
#[derive(Debug, Clone)]
pub struct ServersConfig {
    root: Map<String, Value>,
}

impl ServersConfig {
    /// Load a configuration from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let value: Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?;
        Self::from_value(value)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(text).context("Failed to parse JSON config")?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> anyhow::Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => anyhow::bail!("Expected JSON object at configuration root"),
        }
    }

    /// Server entries in configuration order.
    pub fn servers(&self) -> anyhow::Result<Vec<ServerEntry<'_>>> {
        let servers = self.root.get(SERVERS_FIELD).ok_or_else(|| {
            anyhow::anyhow!("Missing '{}' object in configuration", SERVERS_FIELD)
        })?;
        let map = servers
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Expected '{}' to be a JSON object", SERVERS_FIELD))?;
        Ok(map
            .iter()
            .map(|(name, value)| ServerEntry { name, value })
            .collect())
    }

    /// Remove the pipeline-only fields from every server entry.
    pub fn strip_runtime_fields(&mut self) {
        if let Some(Value::Object(servers)) = self.root.get_mut(SERVERS_FIELD) {
            for value in servers.values_mut() {
                if let Value::Object(entry) = value {
                    entry.remove(REQUIREMENTS_FIELD);
                    entry.remove(PRE_RUN_FIELD);
                }
            }
        }
    }

    /// Serialize the configuration with four-space indentation.
    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        self.root
            .serialize(&mut serializer)
            .context("Failed to serialize configuration")?;
        String::from_utf8(buf).context("Serialized configuration was not valid UTF-8")
    }
}

/// Borrowed view over a single server entry.
#[derive(Debug, Clone, Copy)]
pub struct ServerEntry<'a> {
    /// Server name, the entry's key in the configuration
    pub name: &'a str,
    value: &'a Value,
}

impl<'a> ServerEntry<'a> {
    /// The entry exactly as it appears in the configuration.
    pub fn raw(&self) -> &'a Value {
        self.value
    }

    /// The entry's argument list, if declared.
    pub fn args(&self) -> anyhow::Result<Option<&'a [Value]>> {
        match self.value.get("args") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => anyhow::bail!("Expected 'args' to be an array for server '{}'", self.name),
        }
    }

    /// Declared requirements, if any.
    pub fn requirements(&self) -> anyhow::Result<Option<Vec<Requirement>>> {
        self.typed_field(REQUIREMENTS_FIELD)
    }

    /// Declared pre-run commands, if any.
    pub fn pre_run(&self) -> anyhow::Result<Option<Vec<PreRunCommand>>> {
        self.typed_field(PRE_RUN_FIELD)
    }

    /// Opaque pre-build command payload, if declared.
    pub fn pre_build(&self) -> Option<&'a Value> {
        self.value
            .get(PRE_BUILD_FIELD)
            .filter(|value| is_truthy(value))
    }

    fn typed_field<T>(&self, field: &str) -> anyhow::Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.value.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .with_context(|| format!("Invalid '{}' for server '{}'", field, self.name)),
        }
    }
}

/// JSON counterpart of a loose truthiness test: null, false, zero and
/// the empty string all count as absent.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
