//! Multi-server configuration handling.
//!
//! The same servers.json file feeds every pipeline phase: the analyzer
//! reads it from the build context, the prepare phase reads it from the
//! image. Entries stay raw JSON; see [`store`] for the typed views.

pub mod paths;
pub mod schema;
pub mod store;

pub use schema::{PreRunCommand, Requirement};
pub use store::{ServerEntry, ServersConfig};
