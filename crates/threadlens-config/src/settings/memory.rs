//! In-memory settings store.

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;

use threadlens_protocols::error::SettingsError;
use threadlens_protocols::settings::{SettingsChange, SettingsMap, SettingsStore};

use super::{merge, project, CHANGE_CHANNEL_CAPACITY};

/// Settings kept in process memory; lost on exit.
pub struct MemorySettingsStore {
    values: RwLock<SettingsMap>,
    changes: broadcast::Sender<SettingsChange>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::with_values(SettingsMap::new())
    }

    pub fn with_values(values: SettingsMap) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            values: RwLock::new(values),
            changes,
        }
    }

    /// Full snapshot, for diagnostics and tests.
    pub fn snapshot(&self) -> SettingsMap {
        self.values.read().clone()
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, keys: &[&str]) -> Result<SettingsMap, SettingsError> {
        Ok(project(&self.values.read(), keys))
    }

    async fn set(&self, values: SettingsMap) -> Result<(), SettingsError> {
        let changes = merge(&mut self.values.write(), values);
        for change in changes {
            // No subscribers is fine.
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}
