//! mcp-switch Core Library
//!
//! Provides the domain logic for toggling MCP server entries in a
//! project's `.mcp.json`: registry loading with user overrides, profile
//! resolution, and the project config store.

pub mod commands;
pub mod config;
pub mod registry;
pub mod resolve;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, McpConfigFile};

    // Registry
    pub use crate::registry::{LaunchConfig, Profile, RegistryLoader, ServerEntry};

    // Resolution
    pub use crate::resolve::{Resolution, ResolveError, resolve_tokens};

    // Commands
    pub use crate::commands::{
        ApplyCommand, ApplyError, ApplyReport, EditCommand, EnabledServer, StatusCommand,
        StatusReport,
    };
}
