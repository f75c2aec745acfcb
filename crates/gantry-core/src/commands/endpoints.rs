//! SSE endpoint listing for the proxy.
//!
//! Listing must always produce something a person can click, even when
//! the configuration is missing or broken, so failures fall back to a
//! built-in server list instead of erroring.

use std::path::PathBuf;

use crate::config::ServersConfig;
use crate::config::paths::{SERVERS_CONFIG, SSE_PORT};

/// Fallback server names shown when the configuration cannot be read.
const FALLBACK_SERVERS: [&str; 4] = ["sequential-thinking", "exa", "weather", "cashfree"];

/// A single server endpoint behind the proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Raw server name from the configuration
    pub name: String,
    /// Human-readable name derived from the raw name
    pub display_name: String,
    /// SSE URL on the local proxy
    pub url: String,
}

/// Report from an endpoints run.
#[derive(Debug, Clone)]
pub struct EndpointsReport {
    /// Listed endpoints, from the configuration or the fallback list
    pub endpoints: Vec<Endpoint>,
    /// Why the fallback list was used, when it was
    pub fallback_reason: Option<String>,
}

/// Endpoints command orchestrator.
#[derive(Debug)]
pub struct EndpointsCommand {
    /// Multi-server configuration file
    config_path: PathBuf,
    /// Proxy port the URLs point at
    port: u16,
}

impl EndpointsCommand {
    /// Create a new endpoints command.
    pub fn new(config_path: PathBuf, port: u16) -> Self {
        Self { config_path, port }
    }

    /// Create an endpoints command with the standard paths.
    pub fn with_defaults() -> Self {
        Self::new(PathBuf::from(SERVERS_CONFIG), SSE_PORT)
    }

    /// Execute the endpoints command. Never fails: configuration
    /// problems produce the fallback list instead.
    pub fn execute(&self) -> EndpointsReport {
        match self.list_from_config() {
            Ok(endpoints) => EndpointsReport {
                endpoints,
                fallback_reason: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "falling back to built-in server list");
                EndpointsReport {
                    endpoints: FALLBACK_SERVERS
                        .iter()
                        .map(|name| self.endpoint(name))
                        .collect(),
                    fallback_reason: Some(err.to_string()),
                }
            }
        }
    }

    fn list_from_config(&self) -> anyhow::Result<Vec<Endpoint>> {
        let config = ServersConfig::load(&self.config_path)?;
        Ok(config
            .servers()?
            .iter()
            .map(|entry| self.endpoint(entry.name))
            .collect())
    }

    fn endpoint(&self, name: &str) -> Endpoint {
        Endpoint {
            name: name.to_string(),
            display_name: display_name(name),
            url: format!("http://localhost:{}/servers/{}/sse", self.port, name),
        }
    }
}

/// Convert a kebab-case server name into a spaced title,
/// e.g. "sequential-thinking" -> "Sequential Thinking".
pub fn display_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_titles_each_word() {
        assert_eq!(display_name("sequential-thinking"), "Sequential Thinking");
        assert_eq!(display_name("exa"), "Exa");
        assert_eq!(display_name("cashfree-mcp-server"), "Cashfree Mcp Server");
    }

    #[test]
    fn test_display_name_keeps_inner_casing() {
        assert_eq!(display_name("myAPI"), "MyAPI");
    }

    #[test]
    fn test_display_name_empty_segments() {
        assert_eq!(display_name("a--b"), "A  B");
    }

    #[test]
    fn test_fallback_list_when_config_missing() {
        let command = EndpointsCommand::new(PathBuf::from("/nonexistent/servers.json"), SSE_PORT);
        let report = command.execute();
        assert!(report.fallback_reason.is_some());
        assert_eq!(report.endpoints.len(), 4);
        assert_eq!(report.endpoints[0].display_name, "Sequential Thinking");
        assert_eq!(
            report.endpoints[0].url,
            "http://localhost:5700/servers/sequential-thinking/sse"
        );
        assert_eq!(report.endpoints[3].display_name, "Cashfree");
    }
}
