use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    companion::{until_view_closed, Companion, Generated},
    store::{entities::JournalEntry, PersistentState, SlotStorage, JOURNAL_ENTRIES_KEY},
    utils::clock::Clock,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalSave {
    /// Nothing but whitespace was written.
    Empty,
    Saved {
        entry: JournalEntry,
        reflection: Generated,
    },
    /// The view was left before the reflection arrived. Nothing was stored.
    Discarded,
}

pub struct Journal<S> {
    entries: PersistentState<Vec<JournalEntry>, S>,
    companion: Arc<Companion>,
    clock: Arc<dyn Clock>,
}

impl<S: SlotStorage> Journal<S> {
    pub fn open(storage: S, companion: Arc<Companion>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: PersistentState::open(storage, JOURNAL_ENTRIES_KEY, Vec::new()),
            companion,
            clock,
        }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[JournalEntry] {
        self.entries.value()
    }

    /// Asks the companion for a reflection and stores the entry together with it.
    ///
    /// Returns [JournalSave::Discarded] as soon as `view` is cancelled, without waiting for the
    /// request. The request itself keeps running and its response is dropped.
    pub async fn save_and_reflect(&mut self, text: &str, view: &CancellationToken) -> JournalSave {
        if text.trim().is_empty() {
            return JournalSave::Empty;
        }

        let companion = self.companion.clone();
        let journal_text = text.to_string();
        let request = async move { companion.reflect(&journal_text).await };
        let Some(reflection) = until_view_closed(request, view).await else {
            warn!("Journal view was closed before the reflection arrived, discarding entry");
            return JournalSave::Discarded;
        };

        let entry = JournalEntry {
            date: self.clock.time(),
            content: text.to_string(),
            summary: Some(reflection.as_str().to_string()),
        };

        self.entries.update(|entries| {
            let mut next = Vec::with_capacity(entries.len() + 1);
            next.push(entry.clone());
            next.extend(entries.iter().cloned());
            next
        });
        info!(
            "Saved journal entry from {}, {} entries in total",
            entry.date,
            self.entries().len()
        );

        JournalSave::Saved { entry, reflection }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tokio_util::sync::CancellationToken;

    use crate::{
        companion::{Companion, Generated, MockTextGenerator, TextGenerator, REFLECTION_FALLBACK},
        store::{
            entities::JournalEntry, MemorySlotStorage, PersistentState, SlotStorage,
            JOURNAL_ENTRIES_KEY,
        },
        utils::{clock::FixedClock, logging::TEST_LOGGING},
    };

    use super::{Journal, JournalSave};

    /// A generator whose request never completes, like a hung connection.
    struct Unresponsive;

    #[async_trait]
    impl TextGenerator for Unresponsive {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            std::future::pending().await
        }
    }

    fn companion(reply: &'static str) -> Arc<Companion> {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().returning(move |_| Ok(reply.into()));
        Arc::new(Companion::new(Box::new(mock)))
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 2, 1, 18, 0, 0).unwrap()))
    }

    #[tokio::test]
    async fn test_entries_are_prepended() {
        let storage = MemorySlotStorage::new();
        let mut journal = Journal::open(&storage, companion("You did well."), clock());
        let view = CancellationToken::new();

        journal.save_and_reflect("Entry A", &view).await;
        let first_summary = journal.entries()[0].summary.clone();
        journal.save_and_reflect("Entry B", &view).await;

        let contents = journal
            .entries()
            .iter()
            .map(|v| v.content.as_str())
            .collect::<Vec<_>>();
        assert_eq!(contents, vec!["Entry B", "Entry A"]);
        assert_eq!(journal.entries()[1].summary, first_summary);

        let stored = PersistentState::open(&storage, JOURNAL_ENTRIES_KEY, Vec::<JournalEntry>::new());
        assert_eq!(stored.value(), &journal.entries().to_vec());
    }

    #[tokio::test]
    async fn test_blank_text_is_ignored() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().never();
        let storage = MemorySlotStorage::new();
        let mut journal = Journal::open(&storage, Arc::new(Companion::new(Box::new(mock))), clock());

        let result = journal.save_and_reflect("  \n\t", &CancellationToken::new()).await;

        assert_eq!(result, JournalSave::Empty);
        assert!(journal.entries().is_empty());
        assert!(storage.read(JOURNAL_ENTRIES_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fallback_becomes_summary() {
        *TEST_LOGGING;
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .returning(|_| Err(anyhow!("network unreachable")));
        let storage = MemorySlotStorage::new();
        let mut journal = Journal::open(&storage, Arc::new(Companion::new(Box::new(mock))), clock());

        let result = journal
            .save_and_reflect("I felt tired", &CancellationToken::new())
            .await;

        let JournalSave::Saved { entry, reflection } = result else {
            panic!("Entry should be saved");
        };
        assert_eq!(reflection, Generated::Fallback(REFLECTION_FALLBACK));
        assert_eq!(entry.summary.as_deref(), Some(REFLECTION_FALLBACK));
        assert_eq!(entry.date, Utc.with_ymd_and_hms(2024, 2, 1, 18, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_closed_view_discards_reflection() {
        *TEST_LOGGING;
        let storage = MemorySlotStorage::new();
        let mut journal = Journal::open(&storage, companion("Late answer"), clock());
        let view = CancellationToken::new();
        view.cancel();

        let result = journal.save_and_reflect("Something", &view).await;

        assert_eq!(result, JournalSave::Discarded);
        assert!(journal.entries().is_empty());
        assert!(storage.read(JOURNAL_ENTRIES_KEY).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_view_does_not_wait_for_hung_reflection() {
        *TEST_LOGGING;
        let storage = MemorySlotStorage::new();
        let mut journal = Journal::open(&storage, Arc::new(Companion::new(Box::new(Unresponsive))), clock());
        let view = CancellationToken::new();
        let leave = view.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            leave.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(3600),
            journal.save_and_reflect("Waiting for an answer", &view),
        )
        .await;

        assert_eq!(result.ok(), Some(JournalSave::Discarded));
        assert!(journal.entries().is_empty());
        assert!(storage.read(JOURNAL_ENTRIES_KEY).unwrap().is_none());
    }
}
