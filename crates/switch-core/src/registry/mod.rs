//! Registry loading and merging.
//!
//! Two sources exist per entity type: the packaged registry shipped next
//! to the executable and the user's override files under `~/.claude-mcp`.
//! The merged view is recomputed on every call; the process is short-lived
//! so there is no caching layer.

pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

pub use schema::{LaunchConfig, Profile, ProfileRegistryFile, ServerEntry, ServerRegistryFile};

/// Packaged registry file names, resolved relative to the packaged dir.
pub const PACKAGED_SERVERS_FILE: &str = "mcp-registry.json";
pub const PACKAGED_PROFILES_FILE: &str = "mcp-profiles.json";

/// User override file names, resolved relative to the user config dir.
pub const USER_SERVERS_FILE: &str = "custom-servers.json";
pub const USER_PROFILES_FILE: &str = "custom-profiles.json";

/// Per-user configuration directory name under the home directory.
pub const USER_CONFIG_DIR: &str = ".claude-mcp";

/// Loads and merges server and profile registries.
#[derive(Debug, Clone)]
pub struct RegistryLoader {
    packaged_dir: PathBuf,
    user_dir: PathBuf,
}

impl RegistryLoader {
    /// Create a loader with explicit source directories.
    pub fn new(packaged_dir: PathBuf, user_dir: PathBuf) -> Self {
        Self {
            packaged_dir,
            user_dir,
        }
    }

    /// Create a loader with the default directories: `registry/` next to
    /// the current executable and `~/.claude-mcp` for user overrides.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let exe = std::env::current_exe()?;
        let packaged_dir = exe
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Could not determine executable directory"))?
            .join("registry");
        let user_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(USER_CONFIG_DIR);

        Ok(Self::new(packaged_dir, user_dir))
    }

    pub fn packaged_dir(&self) -> &Path {
        &self.packaged_dir
    }

    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    /// Load the merged server registry.
    ///
    /// User entries replace packaged entries wholesale on name collision;
    /// there is no field-level merge.
    pub fn load_servers(&self) -> BTreeMap<String, ServerEntry> {
        let packaged: ServerRegistryFile =
            load_json_file(&self.packaged_dir.join(PACKAGED_SERVERS_FILE));
        let user: ServerRegistryFile = load_json_file(&self.user_dir.join(USER_SERVERS_FILE));

        tracing::debug!(
            packaged = packaged.servers.len(),
            user = user.servers.len(),
            "loaded server registries"
        );

        let mut merged = packaged.servers;
        merged.extend(user.servers);
        merged
    }

    /// Load the merged profile registry. Same override rule as servers.
    pub fn load_profiles(&self) -> BTreeMap<String, Profile> {
        let packaged: ProfileRegistryFile =
            load_json_file(&self.packaged_dir.join(PACKAGED_PROFILES_FILE));
        let user: ProfileRegistryFile = load_json_file(&self.user_dir.join(USER_PROFILES_FILE));

        tracing::debug!(
            packaged = packaged.profiles.len(),
            user = user.profiles.len(),
            "loaded profile registries"
        );

        let mut merged = packaged.profiles;
        merged.extend(user.profiles);
        merged
    }

    /// Look up a single server in the merged registry.
    pub fn server(&self, name: &str) -> Option<ServerEntry> {
        self.load_servers().remove(name)
    }

    /// Look up a single profile in the merged registry.
    pub fn profile(&self, name: &str) -> Option<Profile> {
        self.load_profiles().remove(name)
    }
}

/// Read a JSON source file, falling back to the default value.
///
/// A missing file is expected and silent. A file that exists but does not
/// parse warns and is treated as absent; the other source still applies.
fn load_json_file<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Warning: Failed to load {}: {}", path.display(), err);
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Warning: Failed to load {}: {}", path.display(), err);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn server_json(name: &str, description: &str) -> String {
        format!(
            r#"{{"name": "{name}", "description": "{description}",
                 "tags": [], "tools": [],
                 "config": {{"type": "stdio", "command": "npx", "args": []}}}}"#
        )
    }

    #[test]
    fn missing_sources_yield_empty_registry() {
        let temp = TempDir::new().unwrap();
        let loader = RegistryLoader::new(temp.path().join("pkg"), temp.path().join("user"));

        assert!(loader.load_servers().is_empty());
        assert!(loader.load_profiles().is_empty());
    }

    #[test]
    fn malformed_source_is_treated_as_empty() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("pkg");
        write_file(&pkg, PACKAGED_SERVERS_FILE, "not json at all {");

        let loader = RegistryLoader::new(pkg, temp.path().join("user"));
        assert!(loader.load_servers().is_empty());
    }

    #[test]
    fn malformed_packaged_source_does_not_block_user_source() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("pkg");
        let user = temp.path().join("user");
        write_file(&pkg, PACKAGED_SERVERS_FILE, "{broken");
        write_file(
            &user,
            USER_SERVERS_FILE,
            &format!(r#"{{"servers": {{"mine": {}}}}}"#, server_json("mine", "user server")),
        );

        let loader = RegistryLoader::new(pkg, user);
        let servers = loader.load_servers();
        assert_eq!(servers.len(), 1);
        assert!(servers.contains_key("mine"));
    }

    #[test]
    fn user_entry_replaces_packaged_entry_entirely() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("pkg");
        let user = temp.path().join("user");
        write_file(
            &pkg,
            PACKAGED_SERVERS_FILE,
            r#"{"servers": {"github": {
                "name": "github",
                "description": "packaged description",
                "tags": ["packaged-only-tag"],
                "tools": ["issues"],
                "config": {"type": "stdio", "command": "npx", "args": ["-y", "pkg"]}
            }}}"#,
        );
        write_file(
            &user,
            USER_SERVERS_FILE,
            r#"{"servers": {"github": {
                "name": "github",
                "description": "user description",
                "config": {"type": "stdio", "command": "bunx", "args": []}
            }}}"#,
        );

        let loader = RegistryLoader::new(pkg, user);
        let servers = loader.load_servers();
        let github = servers.get("github").unwrap();

        // Whole-entry override: packaged-only fields do not leak through.
        assert_eq!(github.description, "user description");
        assert!(github.tags.is_empty());
        assert!(github.tools.is_empty());
        assert_eq!(github.config.command, "bunx");
    }

    #[test]
    fn user_profiles_override_packaged_profiles() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("pkg");
        let user = temp.path().join("user");
        write_file(
            &pkg,
            PACKAGED_PROFILES_FILE,
            r#"{"profiles": {
                "work": {"name": "work", "description": "packaged", "servers": ["a"]},
                "web": {"name": "web", "description": "packaged", "servers": ["b"]}
            }}"#,
        );
        write_file(
            &user,
            USER_PROFILES_FILE,
            r#"{"profiles": {
                "work": {"name": "work", "description": "user", "servers": ["a", "c"]}
            }}"#,
        );

        let loader = RegistryLoader::new(pkg, user);
        let profiles = loader.load_profiles();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles.get("work").unwrap().servers, vec!["a", "c"]);
        assert_eq!(profiles.get("web").unwrap().description, "packaged");
    }

    #[test]
    fn single_lookups_use_merged_view() {
        let temp = TempDir::new().unwrap();
        let user = temp.path().join("user");
        write_file(
            &user,
            USER_SERVERS_FILE,
            &format!(r#"{{"servers": {{"mine": {}}}}}"#, server_json("mine", "d")),
        );

        let loader = RegistryLoader::new(temp.path().join("pkg"), user);
        assert!(loader.server("mine").is_some());
        assert!(loader.server("absent").is_none());
        assert!(loader.profile("absent").is_none());
    }
}
