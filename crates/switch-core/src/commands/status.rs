//! Status command implementation.
//!
//! Collects the current configuration state against the merged registry
//! for frontends to render. Pure read path; nothing is written.

use crate::config::ConfigStore;
use crate::registry::{RegistryLoader, ServerEntry};

/// An enabled entry, annotated with its registry definition when found.
///
/// `server` is `None` for entries in `.mcp.json` that no registry source
/// knows about; those are displayed as unknown rather than rejected.
#[derive(Debug, Clone)]
pub struct EnabledServer {
    pub name: String,
    pub server: Option<ServerEntry>,
}

/// Report from a status collection.
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// Servers currently enabled in the project config.
    pub enabled: Vec<EnabledServer>,
    /// Registered servers that are not enabled.
    pub available: Vec<ServerEntry>,
}

/// Status command orchestrator.
#[derive(Debug, Clone)]
pub struct StatusCommand {
    loader: RegistryLoader,
    store: ConfigStore,
}

impl StatusCommand {
    /// Create a status command with explicit collaborators.
    pub fn new(loader: RegistryLoader, store: ConfigStore) -> Self {
        Self { loader, store }
    }

    /// Create a status command with default paths.
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(
            RegistryLoader::with_defaults()?,
            ConfigStore::with_defaults()?,
        ))
    }

    /// Collect the current status.
    pub fn execute(&self) -> StatusReport {
        let mut servers = self.loader.load_servers();
        let enabled_names = self.store.read_enabled();

        let enabled: Vec<EnabledServer> = enabled_names
            .iter()
            .map(|name| EnabledServer {
                name: name.clone(),
                server: servers.get(name).cloned(),
            })
            .collect();

        for name in &enabled_names {
            servers.remove(name);
        }
        let available = servers.into_values().collect();

        StatusReport { enabled, available }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn command(temp: &TempDir) -> StatusCommand {
        let pkg = temp.path().join("pkg");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(
            pkg.join("mcp-registry.json"),
            r#"{"servers": {
                "a": {"name": "a", "description": "alpha",
                      "config": {"type": "stdio", "command": "npx", "args": []}},
                "b": {"name": "b", "description": "beta",
                      "config": {"type": "stdio", "command": "npx", "args": []}}
            }}"#,
        )
        .unwrap();

        let project = temp.path().join("project");
        std::fs::create_dir_all(&project).unwrap();

        StatusCommand::new(
            RegistryLoader::new(pkg, temp.path().join("user")),
            ConfigStore::new(project),
        )
    }

    #[test]
    fn empty_project_lists_everything_as_available() {
        let temp = TempDir::new().unwrap();
        let cmd = command(&temp);

        let report = cmd.execute();

        assert!(report.enabled.is_empty());
        assert_eq!(report.available.len(), 2);
    }

    #[test]
    fn enabled_entries_are_annotated_and_removed_from_available() {
        let temp = TempDir::new().unwrap();
        let cmd = command(&temp);

        std::fs::write(
            temp.path().join("project").join(".mcp.json"),
            r#"{"mcpServers": {
                "a": {"type": "stdio", "command": "npx", "args": []},
                "orphan": {"type": "stdio", "command": "old", "args": []}
            }}"#,
        )
        .unwrap();

        let report = cmd.execute();

        assert_eq!(report.enabled.len(), 2);
        let a = report.enabled.iter().find(|e| e.name == "a").unwrap();
        assert!(a.server.is_some());
        // Unknown entries are tolerated and flagged, not rejected.
        let orphan = report.enabled.iter().find(|e| e.name == "orphan").unwrap();
        assert!(orphan.server.is_none());

        assert_eq!(report.available.len(), 1);
        assert_eq!(report.available[0].name, "b");
    }
}
