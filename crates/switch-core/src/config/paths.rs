//! Project config path resolution helpers.

use std::path::{Path, PathBuf};

/// Project configuration file, relative to the project root.
pub const MCP_JSON: &str = ".mcp.json";

/// Settings sidecar file, relative to the project root.
pub const SETTINGS_FILE: &str = ".claude/settings.local.json";

pub fn mcp_json_path(project_root: &Path) -> PathBuf {
    project_root.join(MCP_JSON)
}

pub fn settings_path(project_root: &Path) -> PathBuf {
    project_root.join(SETTINGS_FILE)
}
