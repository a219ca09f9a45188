//! Project configuration: the enabled-server list in `.mcp.json` and the
//! settings sidecar in `.claude/settings.local.json`.

pub mod paths;
pub mod store;

pub use paths::{MCP_JSON, SETTINGS_FILE, mcp_json_path, settings_path};
pub use store::{ConfigStore, ENABLE_ALL_KEY, LEGACY_DISABLED_KEY, McpConfigFile};
