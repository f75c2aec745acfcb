//! One-shot commands for each phase of the image pipeline.
//!
//! This module provides the public API for the pipeline phases: analyze
//! at image build time in the context, build inside the image, prepare
//! and endpoints at container runtime. Each command is constructed with
//! its paths, executed once, and returns a report for the frontend to
//! present.

pub mod analyze;
pub mod build;
pub mod endpoints;
pub mod prepare;

pub use analyze::{AnalyzeCommand, AnalyzeReport};
pub use build::{BuildCommand, BuildReport, ServerBuildOutcome, ServerBuildResult};
pub use endpoints::{Endpoint, EndpointsCommand, EndpointsReport};
pub use prepare::{PrepareCommand, PrepareReport, RequirementReport};
