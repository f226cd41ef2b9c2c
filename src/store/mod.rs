//!  State that survives between runs is organized through [PersistentState].
//!  The basic idea is:
//!   - There is a [SlotStorage] holding named slots, by default a directory with one file per slot.
//!   - Every feature opens its own [PersistentState] on a distinct key.
//!   - A slot holds the whole value serialized as JSON and is rewritten on every change.

pub mod entities;
pub mod persistent;
pub mod slot_storage;

pub use persistent::PersistentState;
pub use slot_storage::{FileSlotStorage, MemorySlotStorage, SlotError, SlotStorage};

/// Slot holding `Vec<MoodLog>`, sorted by day.
pub const MOOD_LOGS_KEY: &str = "moodLogs";
/// Slot holding `Vec<JournalEntry>`, newest first.
pub const JOURNAL_ENTRIES_KEY: &str = "journalEntries";
