use std::{
    collections::HashMap,
    fs::File,
    io::{ErrorKind, Read, Write},
    ops::Deref,
    path::{Path, PathBuf},
    sync::Mutex,
};

use fs4::fs_std::FileExt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("Invalid slot key {0:?}. Only ascii letters, digits, '-' and '_' are allowed")]
    InvalidKey(String),
    #[error("Slot storage is unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to serialize slot {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Interface for abstracting the key-value storage behind [PersistentState](super::PersistentState).
/// A slot holds one serialized value under a name.
pub trait SlotStorage {
    /// Returns the raw content of a slot, or `None` if the slot was never written.
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Overwrites the slot with `value`.
    fn write(&self, key: &str, value: &str) -> Result<(), SlotError>;
}

impl<T: Deref> SlotStorage for T
where
    T::Target: SlotStorage,
{
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        self.deref().read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.deref().write(key, value)
    }
}

pub fn validate_key(key: &str) -> Result<(), SlotError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SlotError::InvalidKey(key.to_string()))
    }
}

/// The main realization of [SlotStorage]. Every slot is a separate `<key>.json` file in
/// `slot_dir`.
pub struct FileSlotStorage {
    slot_dir: PathBuf,
}

impl FileSlotStorage {
    pub fn new(slot_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&slot_dir)?;

        Ok(Self { slot_dir })
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, SlotError> {
        validate_key(key)?;
        Ok(self.slot_dir.join(format!("{key}.json")))
    }
}

impl SlotStorage for FileSlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        let path = self.slot_path(key)?;
        debug!("Reading slot {path:?}");

        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        FileExt::lock_shared(&file)?;
        let mut content = String::new();
        let result = file.read_to_string(&mut content);
        FileExt::unlock(&file)?;
        result?;

        Ok(Some(content))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let path = self.slot_path(key)?;
        debug!("Writing slot {path:?}");

        // Writers of one slot share the temporary file, so they are serialized on `<key>.lock`.
        let lock = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.with_extension("lock"))?;
        FileExt::lock_exclusive(&lock)?;
        let result = replace_file(&path, |file| file.write_all(value.as_bytes()));
        FileExt::unlock(&lock)?;
        result?;

        Ok(())
    }
}

/// Fills `<target>.tmp` and renames it over `target`. Until the rename `target` keeps its
/// previous content, so a failed write never leaves a truncated slot behind.
fn replace_file(
    target: &Path,
    fill: impl FnOnce(&mut File) -> std::io::Result<()>,
) -> std::io::Result<()> {
    let tmp = target.with_extension("tmp");
    let result = File::create(&tmp)
        .and_then(|mut file| {
            fill(&mut file)?;
            file.flush()?;
            file.sync_all()
        })
        .and_then(|_| std::fs::rename(&tmp, target));

    if result.is_err() && tmp.is_file() {
        if let Err(e) = std::fs::remove_file(&tmp) {
            warn!("Failed to remove {tmp:?}: {e}");
        }
    }
    result
}

/// Slots kept in memory only. Useful for sessions that shouldn't leave anything on disk.
#[derive(Default)]
pub struct MemorySlotStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(self, key: &str, value: &str) -> Self {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        validate_key(key)?;
        let slots = self
            .slots
            .lock()
            .map_err(|e| SlotError::Unavailable(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        validate_key(key)?;
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| SlotError::Unavailable(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
