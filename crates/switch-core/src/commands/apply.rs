//! Apply command implementation.
//!
//! Turns profile/server selections into a written `.mcp.json` plus the
//! settings-flag guarantee. Frontends render the report; no printing
//! happens here beyond the store's own warnings.

use thiserror::Error;

use crate::config::ConfigStore;
use crate::registry::RegistryLoader;
use crate::resolve::{self, ResolveError};

/// Errors from an apply operation.
///
/// Resolution failures stay typed so frontends can print the known-name
/// lists; everything else (I/O, serialization) flows through anyhow.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Report from an apply operation.
#[derive(Debug, Clone)]
pub struct ApplyReport {
    /// Final server list handed to the store, in resolution order.
    pub servers: Vec<String>,
    /// Profile tokens that were applied.
    pub profiles: Vec<String>,
    /// Bare server tokens that were applied.
    pub singles: Vec<String>,
    /// Whether `.mcp.json` was actually rewritten.
    pub changed: bool,
}

/// Apply command orchestrator.
#[derive(Debug, Clone)]
pub struct ApplyCommand {
    loader: RegistryLoader,
    store: ConfigStore,
}

impl ApplyCommand {
    /// Create an apply command with explicit collaborators.
    pub fn new(loader: RegistryLoader, store: ConfigStore) -> Self {
        Self { loader, store }
    }

    /// Create an apply command with default paths (executable-adjacent
    /// packaged registry, `~/.claude-mcp` overrides, current directory as
    /// project root).
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(
            RegistryLoader::with_defaults()?,
            ConfigStore::with_defaults()?,
        ))
    }

    pub fn loader(&self) -> &RegistryLoader {
        &self.loader
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Apply a batch of profile/server tokens.
    ///
    /// Resolution failures abort before anything touches the filesystem.
    pub fn apply_tokens(&self, tokens: &[String]) -> Result<ApplyReport, ApplyError> {
        let profiles = self.loader.load_profiles();
        let servers = self.loader.load_servers();

        let resolution = resolve::resolve_tokens(tokens, &profiles, &servers)?;

        let changed = self.store.write_enabled(&resolution.servers, &servers)?;
        self.store.ensure_settings()?;

        Ok(ApplyReport {
            servers: resolution.servers,
            profiles: resolution.profiles,
            singles: resolution.singles,
            changed,
        })
    }

    /// Apply exactly one profile, optionally extended with explicit extra
    /// server names (the legacy single-profile path).
    ///
    /// Extra names are not validated here; the store drops anything the
    /// registry does not know.
    pub fn apply_profile(
        &self,
        name: &str,
        extra_servers: &[String],
    ) -> Result<ApplyReport, ApplyError> {
        let profiles = self.loader.load_profiles();

        let Some(profile) = profiles.get(name) else {
            return Err(ResolveError::UnknownProfile {
                name: name.to_string(),
                known_profiles: profiles.keys().cloned().collect(),
            }
            .into());
        };

        let mut names: Vec<String> = Vec::new();
        for member in profile.servers.iter().chain(extra_servers) {
            if !names.contains(member) {
                names.push(member.clone());
            }
        }

        let servers = self.loader.load_servers();
        let changed = self.store.write_enabled(&names, &servers)?;
        self.store.ensure_settings()?;

        Ok(ApplyReport {
            servers: names,
            profiles: vec![name.to_string()],
            singles: extra_servers.to_vec(),
            changed,
        })
    }

    /// Write the operator's final interactive selection.
    ///
    /// An empty selection is valid and means "disable everything".
    pub fn apply_selection(&self, names: &[String]) -> anyhow::Result<bool> {
        let servers = self.loader.load_servers();
        let changed = self.store.write_enabled(names, &servers)?;
        self.store.ensure_settings()?;
        Ok(changed)
    }
}
