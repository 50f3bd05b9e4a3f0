//! Persistent settings store implementations and typed access.

mod access;
mod file;
mod memory;

pub use access::*;
pub use file::JsonFileSettingsStore;
pub use memory::MemorySettingsStore;

use serde_json::Value;
use threadlens_protocols::settings::{SettingsChange, SettingsMap};

/// Capacity of each store's change broadcast.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Apply `values` to `current`, returning one change per key whose value
/// actually changed.
pub(crate) fn merge(current: &mut SettingsMap, values: SettingsMap) -> Vec<SettingsChange> {
    let mut changes = Vec::new();
    for (key, new_value) in values {
        let old_value = current.insert(key.clone(), new_value.clone());
        if old_value.as_ref() != Some(&new_value) {
            changes.push(SettingsChange {
                key,
                old_value,
                new_value: Some(new_value),
            });
        }
    }
    changes
}

/// Project `keys` out of `current`.
pub(crate) fn project(current: &SettingsMap, keys: &[&str]) -> SettingsMap {
    keys.iter()
        .filter_map(|k| current.get(*k).map(|v| (k.to_string(), v.clone())))
        .collect()
}

/// Build a settings map from key/value pairs.
pub fn settings_map<I, K>(entries: I) -> SettingsMap
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
