//! Store for the project's `.mcp.json` and settings sidecar.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::{LaunchConfig, ServerEntry};

use super::paths::{mcp_json_path, settings_path};

/// Settings key this tool guarantees to be `true`.
pub const ENABLE_ALL_KEY: &str = "enableAllProjectMcpServers";

/// Legacy settings key removed on sight (left over from the old
/// disable-list approach).
pub const LEGACY_DISABLED_KEY: &str = "disabledMcpjsonServers";

/// Shape of the project `.mcp.json` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpConfigFile {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, LaunchConfig>,
}

/// Reads and writes the enabled-server list and the settings sidecar for
/// one project directory.
///
/// All writes are whole-file overwrites. Concurrent invocations against
/// the same project race last-writer-wins; acceptable for a single-user
/// interactive tool.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    project_root: PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at an explicit project directory.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Create a store rooted at the process working directory.
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn mcp_json_path(&self) -> PathBuf {
        mcp_json_path(&self.project_root)
    }

    pub fn settings_path(&self) -> PathBuf {
        settings_path(&self.project_root)
    }

    /// Read the currently enabled server names.
    ///
    /// A missing file yields an empty list; a file that does not parse
    /// warns and also yields an empty list. Neither aborts the process.
    pub fn read_enabled(&self) -> Vec<String> {
        let path = self.mcp_json_path();
        if !path.exists() {
            return Vec::new();
        }

        let config: McpConfigFile = match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from))
        {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Warning: Failed to parse {}: {}", super::paths::MCP_JSON, err);
                return Vec::new();
            }
        };

        config.mcp_servers.into_keys().collect()
    }

    /// Write the requested server set into `.mcp.json`.
    ///
    /// Compares the request against the current state as unordered sets
    /// and skips the write entirely when nothing changes. Names absent
    /// from the merged registry are warned and dropped. Returns whether a
    /// write happened.
    pub fn write_enabled(
        &self,
        names: &[String],
        registry: &BTreeMap<String, ServerEntry>,
    ) -> anyhow::Result<bool> {
        let current: HashSet<String> = self.read_enabled().into_iter().collect();
        let requested: HashSet<String> = names.iter().cloned().collect();

        if current == requested {
            return Ok(false);
        }

        let mut mcp_servers = BTreeMap::new();
        for name in names {
            match registry.get(name) {
                Some(server) => {
                    mcp_servers.insert(name.clone(), server.config.clone());
                }
                None => {
                    eprintln!("Warning: Server \"{name}\" not found in registry");
                }
            }
        }

        let config = McpConfigFile { mcp_servers };
        let path = self.mcp_json_path();
        let mut content =
            serde_json::to_string_pretty(&config).context("Failed to serialize .mcp.json")?;
        content.push('\n');
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), servers = names.len(), "wrote project config");
        Ok(true)
    }

    /// Read the settings sidecar as a raw JSON object.
    ///
    /// Fields this tool does not understand are carried through untouched
    /// by [`ensure_settings`](Self::ensure_settings); missing or
    /// unparsable files degrade to an empty object.
    pub fn read_settings(&self) -> Map<String, Value> {
        let path = self.settings_path();
        if !path.exists() {
            return Map::new();
        }

        let value: Value = match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from))
        {
            Ok(value) => value,
            Err(err) => {
                eprintln!("Warning: Failed to parse settings: {err}");
                return Map::new();
            }
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Idempotently guarantee the settings sidecar state.
    ///
    /// Ensures `enableAllProjectMcpServers: true`, removes the legacy
    /// disabled-servers key, preserves everything else, and writes only
    /// when something actually changed. Returns whether a write happened.
    pub fn ensure_settings(&self) -> anyhow::Result<bool> {
        let path = self.settings_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let mut settings = self.read_settings();
        let mut needs_write = false;

        if settings.get(ENABLE_ALL_KEY).and_then(Value::as_bool) != Some(true) {
            settings.insert(ENABLE_ALL_KEY.to_string(), Value::Bool(true));
            needs_write = true;
        }

        if settings.remove(LEGACY_DISABLED_KEY).is_some() {
            needs_write = true;
        }

        if needs_write {
            let mut content = serde_json::to_string_pretty(&Value::Object(settings))
                .context("Failed to serialize settings")?;
            content.push('\n');
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write settings file: {}", path.display()))?;
        }

        Ok(needs_write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry_with(names: &[&str]) -> BTreeMap<String, ServerEntry> {
        names
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    ServerEntry {
                        name: name.to_string(),
                        description: format!("{name} server"),
                        tags: vec![],
                        tools: vec![],
                        config: LaunchConfig {
                            r#type: "stdio".to_string(),
                            command: "npx".to_string(),
                            args: vec!["-y".to_string(), format!("@acme/{name}")],
                            env: None,
                            extra: Map::new(),
                        },
                    },
                )
            })
            .collect()
    }

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn read_enabled_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());
        assert!(store.read_enabled().is_empty());
    }

    #[test]
    fn read_enabled_malformed_file_is_empty() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".mcp.json"), "{nope").unwrap();

        let store = ConfigStore::new(temp.path().to_path_buf());
        assert!(store.read_enabled().is_empty());
    }

    #[test]
    fn write_enabled_persists_launch_configs() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());
        let registry = registry_with(&["a", "b"]);

        let changed = store.write_enabled(&owned(&["a", "b"]), &registry).unwrap();
        assert!(changed);

        let content = std::fs::read_to_string(store.mcp_json_path()).unwrap();
        assert!(content.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["mcpServers"]["a"]["command"], "npx");
        assert_eq!(parsed["mcpServers"]["b"]["args"][1], "@acme/b");
    }

    #[test]
    fn write_enabled_is_idempotent_regardless_of_order() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());
        let registry = registry_with(&["a", "b"]);

        assert!(store.write_enabled(&owned(&["a", "b"]), &registry).unwrap());
        // Same set, different order: no write.
        assert!(!store.write_enabled(&owned(&["b", "a"]), &registry).unwrap());
    }

    #[test]
    fn write_enabled_drops_unknown_names() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());
        let registry = registry_with(&["a"]);

        let changed = store
            .write_enabled(&owned(&["a", "ghost"]), &registry)
            .unwrap();
        assert!(changed);

        // "ghost" was requested but not persisted.
        let enabled = store.read_enabled();
        assert_eq!(enabled, vec!["a"]);
    }

    #[test]
    fn write_enabled_empty_set_clears_file() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());
        let registry = registry_with(&["a"]);

        store.write_enabled(&owned(&["a"]), &registry).unwrap();
        let changed = store.write_enabled(&[], &registry).unwrap();
        assert!(changed);
        assert!(store.read_enabled().is_empty());
    }

    #[test]
    fn ensure_settings_creates_sidecar_with_flag() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());

        let wrote = store.ensure_settings().unwrap();
        assert!(wrote);

        let settings = store.read_settings();
        assert_eq!(settings.get(ENABLE_ALL_KEY), Some(&Value::Bool(true)));

        let content = std::fs::read_to_string(store.settings_path()).unwrap();
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn ensure_settings_second_call_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());

        assert!(store.ensure_settings().unwrap());
        assert!(!store.ensure_settings().unwrap());
    }

    #[test]
    fn ensure_settings_removes_legacy_key_and_keeps_the_rest() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());

        std::fs::create_dir_all(temp.path().join(".claude")).unwrap();
        std::fs::write(
            store.settings_path(),
            r#"{
                "enableAllProjectMcpServers": true,
                "disabledMcpjsonServers": ["old"],
                "permissions": {"allow": ["Bash(ls:*)"]}
            }"#,
        )
        .unwrap();

        let wrote = store.ensure_settings().unwrap();
        assert!(wrote);

        let settings = store.read_settings();
        assert!(!settings.contains_key(LEGACY_DISABLED_KEY));
        assert_eq!(
            settings["permissions"]["allow"][0],
            Value::String("Bash(ls:*)".to_string())
        );
    }

    #[test]
    fn ensure_settings_repairs_false_flag() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().to_path_buf());

        std::fs::create_dir_all(temp.path().join(".claude")).unwrap();
        std::fs::write(
            store.settings_path(),
            r#"{"enableAllProjectMcpServers": false}"#,
        )
        .unwrap();

        assert!(store.ensure_settings().unwrap());
        let settings = store.read_settings();
        assert_eq!(settings.get(ENABLE_ALL_KEY), Some(&Value::Bool(true)));
    }
}
