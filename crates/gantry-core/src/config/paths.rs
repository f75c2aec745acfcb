//! Well-known paths and markers for the image build pipeline.
//!
//! The pipeline phases hand work to each other through fixed file
//! locations shared with the Dockerfile, so these live in one place.

/// Multi-server configuration file, relative to the build context root.
pub const SERVERS_CONFIG: &str = "./servers.json";

/// Build plan written by the analyzer into the build context.
pub const BUILD_PLAN_OUTPUT: &str = "./docker-build-info.json";

/// Build plan location inside the image where the Dockerfile copies it
/// for the in-image build phase.
pub const BUILD_PLAN_RUNTIME: &str = "/tmp/docker-build-info.json";

/// Application root inside the image.
pub const APP_ROOT: &str = "/app";

/// Prefix stripped from entry-point arguments to obtain context-relative paths.
pub const APP_PREFIX: &str = "/app/";

/// Marker identifying arguments that point at locally built servers.
pub const LOCAL_SERVER_MARKER: &str = "/app/mcps/";

/// First path segment of the local servers tree inside the build context.
pub const LOCAL_SERVERS_DIR: &str = "mcps";

/// Runtime configuration consumed by the prepare phase.
pub const RUNTIME_CONFIG: &str = "/app/servers.json";

/// Clean configuration handed to the proxy.
pub const CLEAN_CONFIG: &str = "/app/servers-clean.json";

/// Port the proxy serves SSE endpoints on.
pub const SSE_PORT: u16 = 5700;
