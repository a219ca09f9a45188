//! High-level commands for mcp-switch operations.
//!
//! This module provides the public API for orchestrating apply, edit and
//! status operations. These commands are designed to be called by the CLI
//! frontend.

pub mod apply;
pub mod edit;
pub mod status;

pub use apply::{ApplyCommand, ApplyError, ApplyReport};
pub use edit::EditCommand;
pub use status::{EnabledServer, StatusCommand, StatusReport};
