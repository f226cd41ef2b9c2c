use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use super::slot_storage::{SlotError, SlotStorage};

/// A value bound to a named slot. The value is read once on [PersistentState::open] and written
/// back on every change.
///
/// Two instances opened on the same key don't see each other's changes until reopened. Features
/// that need to share a value under one key have to share the instance.
pub struct PersistentState<T, S> {
    key: String,
    value: T,
    storage: S,
}

impl<T, S> PersistentState<T, S>
where
    T: Serialize + DeserializeOwned,
    S: SlotStorage,
{
    /// Loads the value stored under `key`. An empty, unreadable or malformed slot results in
    /// `default`, and the slot stays untouched until the first change.
    pub fn open(storage: S, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = match storage.read(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Slot {key} contains malformed data, using default: {e}");
                    default
                }
            },
            Ok(None) => {
                debug!("Slot {key} is empty, using default");
                default
            }
            Err(e) => {
                warn!("Failed to read slot {key}, using default: {e}");
                default
            }
        };

        Self {
            key,
            value,
            storage,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Sets a new value and persists it.
    pub fn replace(&mut self, value: T) -> &T {
        self.value = value;
        self.persist();
        &self.value
    }

    /// Derives the new value from the current one and persists it. Use this whenever the next
    /// value depends on the previous one.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) -> &T {
        let next = f(&self.value);
        self.replace(next)
    }

    /// A failed write is only logged. The in-memory value is already updated, so the session
    /// keeps working without persistence.
    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            error!("Failed to persist slot {}: {e}", self.key);
        }
    }

    fn try_persist(&self) -> Result<(), SlotError> {
        let raw = serde_json::to_string_pretty(&self.value).map_err(|source| {
            SlotError::Serialize {
                key: self.key.clone(),
                source,
            }
        })?;
        self.storage.write(&self.key, &raw)
    }
}
