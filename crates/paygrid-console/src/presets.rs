//! Saved filter presets.
//!
//! Presets are stored as one JSON array under a single storage key. The
//! array has no version field, so a value that no longer parses is dropped
//! rather than migrated.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::env::Clock;
use crate::error::{ConsoleError, Result};
use crate::storage::Storage;

/// Storage key for the transactions page presets.
pub const PRESETS_KEY: &str = "transactions.savedFilters";

/// A named snapshot of page filters. The filter fields sit next to `id`
/// and `name` in the stored object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedPreset<F> {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub filters: F,
}

pub struct PresetStore<F, S: Storage, C: Clock> {
    key: String,
    storage: Arc<S>,
    clock: Arc<C>,
    _filters: PhantomData<fn() -> F>,
}

impl<F, S, C> PresetStore<F, S, C>
where
    F: Serialize + DeserializeOwned,
    S: Storage,
    C: Clock,
{
    pub fn new(storage: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_key(PRESETS_KEY, storage, clock)
    }

    pub fn with_key(key: impl Into<String>, storage: Arc<S>, clock: Arc<C>) -> Self {
        PresetStore {
            key: key.into(),
            storage,
            clock,
            _filters: PhantomData,
        }
    }

    /// All presets in insertion order.
    pub fn list(&self) -> Result<Vec<SavedPreset<F>>> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(presets) => Ok(presets),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "ignoring unreadable presets");
                Ok(Vec::new())
            }
        }
    }

    pub fn find(&self, id: &str) -> Result<Option<SavedPreset<F>>> {
        Ok(self.list()?.into_iter().find(|p| p.id == id))
    }

    /// Saves the filters under a trimmed, non-empty name.
    pub fn add(&self, name: &str, filters: F) -> Result<SavedPreset<F>>
    where
        F: Clone,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConsoleError::validation("name", "preset name is required"));
        }
        let preset = SavedPreset {
            id: self.clock.now_millis().to_string(),
            name: name.to_string(),
            filters,
        };
        let mut presets = self.list()?;
        presets.push(preset.clone());
        self.save(&presets)?;
        tracing::debug!(id = %preset.id, name = %preset.name, "preset saved");
        Ok(preset)
    }

    /// Deletes a preset. Returns whether one was removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut presets = self.list()?;
        let before = presets.len();
        presets.retain(|p| p.id != id);
        if presets.len() == before {
            return Ok(false);
        }
        self.save(&presets)?;
        Ok(true)
    }

    fn save(&self, presets: &[SavedPreset<F>]) -> Result<()> {
        let raw = serde_json::to_string(presets)?;
        self.storage
            .set(&self.key, &raw)
            .inspect_err(|err| {
                tracing::warn!(key = %self.key, error = %err, "failed to save presets")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ManualClock;
    use crate::storage::MemoryStorage;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct TxFilters {
        status: Option<String>,
        min_amount: Option<i64>,
    }

    fn store(storage: Arc<MemoryStorage>) -> PresetStore<TxFilters, MemoryStorage, ManualClock> {
        PresetStore::new(storage, Arc::new(ManualClock::at(1_700_000_000_000)))
    }

    #[test]
    fn add_trims_name_and_uses_clock_id() {
        let storage = Arc::new(MemoryStorage::new());
        let presets = store(storage.clone());
        let filters = TxFilters {
            status: Some("failed".into()),
            min_amount: None,
        };
        let saved = presets.add("  Failed today ", filters.clone()).unwrap();
        assert_eq!(saved.id, "1700000000000");
        assert_eq!(saved.name, "Failed today");

        let raw = storage.get(PRESETS_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["status"], "failed");
        assert_eq!(json[0]["name"], "Failed today");

        assert_eq!(presets.find("1700000000000").unwrap().unwrap().filters, filters);
    }

    #[test]
    fn blank_name_is_rejected() {
        let presets = store(Arc::new(MemoryStorage::new()));
        assert!(matches!(
            presets.add("   ", TxFilters::default()),
            Err(ConsoleError::Validation { .. })
        ));
        assert!(presets.list().unwrap().is_empty());
    }

    #[test]
    fn unreadable_value_is_empty() {
        let storage = Arc::new(MemoryStorage::new().with_entry(PRESETS_KEY, "{\"v\":2}"));
        let presets = store(storage);
        assert!(presets.list().unwrap().is_empty());
        presets.add("Recovered", TxFilters::default()).unwrap();
        assert_eq!(presets.list().unwrap().len(), 1);
    }

    #[test]
    fn remove_by_id() {
        let presets = store(Arc::new(MemoryStorage::new()));
        let saved = presets.add("All", TxFilters::default()).unwrap();
        assert!(presets.remove(&saved.id).unwrap());
        assert!(!presets.remove(&saved.id).unwrap());
        assert!(presets.list().unwrap().is_empty());
    }
}
