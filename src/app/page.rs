use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use clap::ValueEnum;

/// Pages the user can navigate between. Selecting a page is an in-memory switch only, nothing
/// about it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Page {
    #[default]
    Dashboard,
    Mood,
    Journal,
    Breathe,
    #[value(alias = "affirm")]
    Affirmations,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Mood,
        Page::Journal,
        Page::Breathe,
        Page::Affirmations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Mood => "Track Your Mood",
            Page::Journal => "Write in Your Journal",
            Page::Breathe => "Breathing Exercise",
            Page::Affirmations => "Daily Affirmations",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Page::Dashboard => "Your overview for today.",
            Page::Mood => "Log your emotions to understand your patterns.",
            Page::Journal => "Clear your mind and get a supportive reflection.",
            Page::Breathe => "Find your center with a calming breathing guide.",
            Page::Affirmations => "Start your day with a positive mindset.",
        }
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Dashboard => write!(f, "dashboard"),
            Page::Mood => write!(f, "mood"),
            Page::Journal => write!(f, "journal"),
            Page::Breathe => write!(f, "breathe"),
            Page::Affirmations => write!(f, "affirmations"),
        }
    }
}

impl FromStr for Page {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Page as ValueEnum>::from_str(s.trim(), true).map_err(|_| anyhow!("Unknown page {s}"))
    }
}
