//! The application shell. [App] keeps the currently selected page and an [AppContext] that
//! every view is built from.

pub mod page;

use std::sync::Arc;

use tracing::debug;

use crate::{
    companion::Companion,
    store::SlotStorage,
    utils::clock::Clock,
    wellness::{journal::Journal, mood::MoodTracker},
};

pub use page::Page;

/// Storage shared by all views. Each view uses its own slot key.
pub type SharedStorage = Arc<dyn SlotStorage + Send + Sync>;

/// Everything a view needs. Both persisted values have exactly one owner here, so every page sees
/// the same state.
pub struct AppContext {
    pub moods: MoodTracker<SharedStorage>,
    pub journal: Journal<SharedStorage>,
    pub companion: Arc<Companion>,
    pub clock: Arc<dyn Clock>,
}

impl AppContext {
    pub fn new(storage: SharedStorage, companion: Companion, clock: Arc<dyn Clock>) -> Self {
        let companion = Arc::new(companion);
        Self {
            moods: MoodTracker::open(storage.clone(), clock.clone()),
            journal: Journal::open(storage, companion.clone(), clock.clone()),
            companion,
            clock,
        }
    }
}

pub struct App {
    current_page: Page,
    context: AppContext,
}

impl App {
    pub fn new(context: AppContext) -> Self {
        Self {
            current_page: Page::default(),
            context,
        }
    }

    pub fn current_page(&self) -> Page {
        self.current_page
    }

    pub fn navigate(&mut self, page: Page) {
        debug!("Navigating from {} to {page}", self.current_page);
        self.current_page = page;
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.context
    }
}
