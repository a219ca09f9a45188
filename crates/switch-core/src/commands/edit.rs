//! Edit command implementation: add, remove and clear over the enabled set.
//!
//! Each operation ends with the settings-flag guarantee regardless of
//! whether the enabled set itself changed.

use crate::config::ConfigStore;
use crate::registry::RegistryLoader;

/// Edit command orchestrator.
#[derive(Debug, Clone)]
pub struct EditCommand {
    loader: RegistryLoader,
    store: ConfigStore,
}

impl EditCommand {
    /// Create an edit command with explicit collaborators.
    pub fn new(loader: RegistryLoader, store: ConfigStore) -> Self {
        Self { loader, store }
    }

    /// Create an edit command with default paths.
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(
            RegistryLoader::with_defaults()?,
            ConfigStore::with_defaults()?,
        ))
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Number of currently enabled servers.
    pub fn enabled_count(&self) -> usize {
        self.store.read_enabled().len()
    }

    /// Union the given names into the enabled set.
    pub fn add(&self, names: &[String]) -> anyhow::Result<bool> {
        let mut combined = self.store.read_enabled();
        for name in names {
            if !combined.contains(name) {
                combined.push(name.clone());
            }
        }

        let changed = self
            .store
            .write_enabled(&combined, &self.loader.load_servers())?;
        self.store.ensure_settings()?;
        Ok(changed)
    }

    /// Remove the given names from the enabled set. Names that are not
    /// currently enabled are ignored.
    pub fn remove(&self, names: &[String]) -> anyhow::Result<bool> {
        let remaining: Vec<String> = self
            .store
            .read_enabled()
            .into_iter()
            .filter(|name| !names.contains(name))
            .collect();

        let changed = self
            .store
            .write_enabled(&remaining, &self.loader.load_servers())?;
        self.store.ensure_settings()?;
        Ok(changed)
    }

    /// Disable every server.
    pub fn clear(&self) -> anyhow::Result<bool> {
        let changed = self.store.write_enabled(&[], &self.loader.load_servers())?;
        self.store.ensure_settings()?;
        Ok(changed)
    }
}
