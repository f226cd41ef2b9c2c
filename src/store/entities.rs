use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Moods offered by the tracker. Stored by their name, e.g. `"Joyful"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Joyful,
    Calm,
    Neutral,
    Sad,
    Anxious,
}

impl Mood {
    /// Ordered the way the tracker presents them, happiest first.
    pub const ALL: [Mood; 5] = [
        Mood::Joyful,
        Mood::Calm,
        Mood::Neutral,
        Mood::Sad,
        Mood::Anxious,
    ];

    pub fn rating(self) -> Rating {
        let value = match self {
            Mood::Joyful => 5,
            Mood::Calm => 4,
            Mood::Neutral => 3,
            Mood::Sad => 2,
            Mood::Anxious => 1,
        };
        Rating(value)
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Joyful => "😄",
            Mood::Calm => "😌",
            Mood::Neutral => "😐",
            Mood::Sad => "😢",
            Mood::Anxious => "😟",
        }
    }

    pub fn from_rating(rating: Rating) -> Mood {
        match *rating {
            5 => Mood::Joyful,
            4 => Mood::Calm,
            3 => Mood::Neutral,
            2 => Mood::Sad,
            _ => Mood::Anxious,
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mood::Joyful => "Joyful",
            Mood::Calm => "Calm",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Mood {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown mood {s}. Expected one of joyful, calm, neutral, sad, anxious"))
    }
}

/// Mood rating from 1 (anxious) to 5 (joyful). A stored value outside of that range makes the
/// whole slot unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new_opt(value: u8) -> Option<Rating> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Rating(value))
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new_opt(value).ok_or_else(|| format!("rating {value} is outside of 1..=5"))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl Deref for Rating {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// One mood per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodLog {
    pub date: NaiveDate,
    pub mood: Mood,
    pub rating: Rating,
}

impl MoodLog {
    pub fn new(date: NaiveDate, mood: Mood) -> Self {
        Self {
            date,
            mood,
            rating: mood.rating(),
        }
    }
}

/// A saved journal entry. `summary` is the reflection obtained when the entry was written and is
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
