//! Gantry Core Library
//!
//! Provides the domain logic for building multi-server MCP Docker
//! images: build-plan analysis, in-image server builds, endpoint
//! listing, and runtime configuration preparation.

pub mod commands;
pub mod config;
pub mod envsub;
pub mod exec;
pub mod manifest;
pub mod plan;
pub mod requirements;

/// Re-exports of commonly used types
pub mod prelude {
    // Commands
    pub use crate::commands::{
        AnalyzeCommand, AnalyzeReport, BuildCommand, BuildReport, Endpoint, EndpointsCommand,
        EndpointsReport, PrepareCommand, PrepareReport, ServerBuildOutcome,
    };

    // Configuration
    pub use crate::config::{PreRunCommand, Requirement, ServerEntry, ServersConfig};

    // Plan
    pub use crate::plan::{BuildPlan, LocalServer, ServerBuildCommands};

    // Requirements
    pub use crate::requirements::{CheckOutcome, RequirementChecker};
}
