//! Registry file schemas.
//!
//! Defines the shapes of the packaged registry files and the user override
//! files under `~/.claude-mcp`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Launch configuration for an MCP server.
///
/// Copied verbatim into the project's `.mcp.json` when the server is
/// enabled. Fields this tool does not model (e.g. `url` for HTTP
/// transports) survive through the flatten map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Transport type tag ("stdio", "http", ...)
    pub r#type: String,
    /// Command to run the server
    pub command: String,
    /// Arguments for the command
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    /// Passthrough for unmodeled fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A server definition from the registry.
///
/// Definitions are read-only to this tool: it only decides which servers
/// are enabled, never edits a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Unique identifier for the server
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Free-text tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tool names the server exposes
    #[serde(default)]
    pub tools: Vec<String>,
    /// Launch configuration
    pub config: LaunchConfig,
}

/// A named shortcut expanding to a list of server names.
///
/// Member names are not validated against the server registry; unresolved
/// members are tolerated and dropped at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier for the profile
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Server names this profile enables
    #[serde(default)]
    pub servers: Vec<String>,
}

/// On-disk wrapper for server registry files: `{"servers": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerRegistryFile {
    #[serde(default)]
    pub servers: BTreeMap<String, ServerEntry>,
}

/// On-disk wrapper for profile registry files: `{"profiles": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRegistryFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}
