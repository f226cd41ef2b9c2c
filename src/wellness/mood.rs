use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::{
    store::{
        entities::{Mood, MoodLog},
        PersistentState, SlotStorage, MOOD_LOGS_KEY,
    },
    utils::{clock::Clock, time::calendar_day},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodSelection {
    /// First mood of the day, appended to the history.
    Logged,
    /// The day already had a mood, which got replaced.
    Updated,
}

impl MoodSelection {
    pub fn message(self) -> &'static str {
        match self {
            MoodSelection::Logged => "Your mood has been logged. Thank you for sharing.",
            MoodSelection::Updated => "Today's mood has been updated.",
        }
    }
}

/// Applies a mood selection for `day`. An existing log for the day is replaced in place,
/// otherwise a new log is added and the history is sorted by day again.
pub fn apply_mood(logs: &[MoodLog], day: NaiveDate, mood: Mood) -> (Vec<MoodLog>, MoodSelection) {
    let log = MoodLog::new(day, mood);
    let mut logs = logs.to_vec();
    match logs.iter().position(|v| v.date == day) {
        Some(index) => {
            logs[index] = log;
            (logs, MoodSelection::Updated)
        }
        None => {
            logs.push(log);
            logs.sort_by_key(|v| v.date);
            (logs, MoodSelection::Logged)
        }
    }
}

pub struct MoodTracker<S> {
    logs: PersistentState<Vec<MoodLog>, S>,
    clock: Arc<dyn Clock>,
}

impl<S: SlotStorage> MoodTracker<S> {
    pub fn open(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            logs: PersistentState::open(storage, MOOD_LOGS_KEY, Vec::new()),
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        calendar_day(self.clock.time())
    }

    /// Records the mood for today.
    pub fn select(&mut self, mood: Mood) -> MoodSelection {
        let today = self.today();
        self.select_on(today, mood)
    }

    pub fn select_on(&mut self, day: NaiveDate, mood: Mood) -> MoodSelection {
        let mut selection = MoodSelection::Logged;
        self.logs.update(|logs| {
            let (logs, result) = apply_mood(logs, day, mood);
            selection = result;
            logs
        });
        info!("Mood {mood} for {day}: {selection:?}");
        selection
    }

    pub fn logs(&self) -> &[MoodLog] {
        self.logs.value()
    }

    pub fn today_log(&self) -> Option<&MoodLog> {
        let today = self.today();
        self.logs().iter().find(|v| v.date == today)
    }

    /// Most recent day with a mood.
    pub fn latest(&self) -> Option<&MoodLog> {
        self.logs().last()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::{
        store::{entities::Mood, MemorySlotStorage, PersistentState, MOOD_LOGS_KEY},
        utils::clock::FixedClock,
    };

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn clock_on(d: u32) -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, d, 9, 15, 0).unwrap()))
    }

    #[test]
    fn test_single_entry_per_day() {
        let storage = MemorySlotStorage::new();
        let mut tracker = MoodTracker::open(&storage, clock_on(7));
        tracker.select_on(day(6), Mood::Sad);

        assert_eq!(tracker.select(Mood::Joyful), MoodSelection::Logged);
        assert_eq!(tracker.logs().len(), 2);

        assert_eq!(tracker.select(Mood::Anxious), MoodSelection::Updated);
        assert_eq!(tracker.logs().len(), 2);
        let today = tracker.today_log().cloned().unwrap();
        assert_eq!(today, MoodLog::new(day(7), Mood::Anxious));
        assert_eq!(*today.rating, 1);
    }

    #[test]
    fn test_new_days_are_sorted() {
        let storage = MemorySlotStorage::new();
        let mut tracker = MoodTracker::open(&storage, clock_on(10));

        tracker.select_on(day(5), Mood::Calm);
        tracker.select_on(day(1), Mood::Neutral);
        tracker.select_on(day(3), Mood::Joyful);

        let days = tracker.logs().iter().map(|v| v.date).collect::<Vec<_>>();
        assert_eq!(days, vec![day(1), day(3), day(5)]);
        assert_eq!(tracker.latest().map(|v| v.date), Some(day(5)));
    }

    #[test]
    fn test_update_keeps_position_without_sorting() {
        // Out of order history written by someone else stays as is on in-place updates.
        let logs = vec![MoodLog::new(day(4), Mood::Sad), MoodLog::new(day(2), Mood::Calm)];
        let (updated, selection) = apply_mood(&logs, day(2), Mood::Joyful);

        assert_eq!(selection, MoodSelection::Updated);
        assert_eq!(updated[0], logs[0]);
        assert_eq!(updated[1], MoodLog::new(day(2), Mood::Joyful));
    }

    #[test]
    fn test_selection_is_persisted() {
        let storage = MemorySlotStorage::new();
        {
            let mut tracker = MoodTracker::open(&storage, clock_on(3));
            tracker.select(Mood::Calm);
        }
        let reopened = PersistentState::open(&storage, MOOD_LOGS_KEY, Vec::<MoodLog>::new());
        assert_eq!(reopened.value(), &vec![MoodLog::new(day(3), Mood::Calm)]);
        assert_eq!(
            MoodSelection::Logged.message(),
            "Your mood has been logged. Thank you for sharing."
        );
    }
}
