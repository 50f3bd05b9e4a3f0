//! JSON-file settings store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use threadlens_protocols::error::SettingsError;
use threadlens_protocols::settings::{SettingsChange, SettingsMap, SettingsStore};

use super::{merge, project, CHANGE_CHANNEL_CAPACITY};

/// Settings persisted as one JSON object on disk.
///
/// Every write rewrites the whole file; writers are serialized so the file
/// always reflects the last completed `set`.
pub struct JsonFileSettingsStore {
    path: PathBuf,
    values: Mutex<SettingsMap>,
    changes: broadcast::Sender<SettingsChange>,
}

impl JsonFileSettingsStore {
    /// Open the store at `path`, reading existing values if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = if path.exists() {
            let json = tokio::fs::read_to_string(&path).await?;
            if json.trim().is_empty() {
                SettingsMap::new()
            } else {
                serde_json::from_str(&json)?
            }
        } else {
            SettingsMap::new()
        };
        debug!("Opened settings store at {:?} ({} keys)", path, values.len());

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            values: Mutex::new(values),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &SettingsMap) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(values)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn get(&self, keys: &[&str]) -> Result<SettingsMap, SettingsError> {
        Ok(project(&*self.values.lock().await, keys))
    }

    async fn set(&self, values: SettingsMap) -> Result<(), SettingsError> {
        let mut current = self.values.lock().await;
        let mut next = current.clone();
        let changes = merge(&mut next, values);
        if changes.is_empty() {
            return Ok(());
        }

        self.persist(&next).await?;
        *current = next;
        drop(current);

        debug!("Persisted {} settings change(s) to {:?}", changes.len(), self.path);
        for change in changes {
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}
