//! Terminal rendering of the pages. Formatting lives in small pure functions so it can be
//! tested without a terminal.

use std::{io::Write, sync::Arc};

use ansi_term::{Colour, Style};
use anyhow::{bail, Result};
use chrono::{DateTime, Local, TimeZone};
use tokio_util::sync::CancellationToken;

use crate::{
    app::{AppContext, Page},
    companion::{until_view_closed, Companion, Generated},
    store::entities::{JournalEntry, Mood},
    utils::time::{format_calendar_day, hour_in},
    wellness::{
        breathing::{run_breathing, BREATHING_CYCLE},
        chart::{chart_points, render_chart},
        dashboard::{greeting, latest_mood},
        journal::JournalSave,
    },
};

/// Maximum characters of an entry shown in the list of past entries.
const PREVIEW_LENGTH: usize = 48;

#[derive(Debug, Clone, Copy)]
pub struct Styling {
    pub colored: bool,
}

impl Styling {
    fn paint(&self, style: Style, text: &str) -> String {
        if self.colored {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint(Colour::Blue.bold(), text)
    }
}

pub fn mood_colour(mood: Mood) -> Colour {
    match mood {
        Mood::Joyful => Colour::Yellow,
        Mood::Calm => Colour::Green,
        Mood::Neutral => Colour::Blue,
        Mood::Sad => Colour::Fixed(8),
        Mood::Anxious => Colour::Purple,
    }
}

/// Fetches an affirmation unless the view is left first.
async fn fetch_affirmation(companion: &Arc<Companion>, view: &CancellationToken) -> Option<Generated> {
    let companion = companion.clone();
    until_view_closed(async move { companion.affirmation().await }, view).await
}

pub async fn show_dashboard(context: &AppContext, view: &CancellationToken, styling: Styling) {
    let hour = hour_in(context.clock.time(), &Local);
    println!("{}", styling.heading(&format!("{}!", greeting(hour))));
    println!("Welcome to your safe space. How can we help you today?\n");

    if let Some(log) = latest_mood(context.moods.logs()) {
        println!(
            "Your last logged mood was {} {} on {}.\n",
            log.mood.emoji(),
            styling.paint(mood_colour(log.mood).normal(), &log.mood.to_string()),
            format_calendar_day(log.date)
        );
    }

    println!("Loading your daily inspiration...");
    match fetch_affirmation(&context.companion, view).await {
        Some(affirmation) => {
            println!("{}\n", styling.paint(Style::new().italic(), &format!("\"{affirmation}\"")))
        }
        None => println!("Skipped.\n"),
    }

    for page in Page::ALL.into_iter().skip(1) {
        println!("  {:<14}{} {}", page.to_string(), styling.heading(page.title()), page.description());
    }
}

pub fn show_mood(context: &mut AppContext, selected: Option<Mood>, styling: Styling) {
    if let Some(mood) = selected {
        let selection = context.moods.select(mood);
        println!("{}\n", styling.paint(Colour::Green.normal(), selection.message()));
    }

    println!("{}", styling.heading("How are you feeling right now?"));
    let today = context.moods.today_log().map(|v| v.mood);
    println!("{}\n", render_mood_options(today, styling));

    println!("{}", styling.heading("Your Mood History"));
    print!("{}", render_chart(&chart_points(context.moods.logs()), styling.colored));
}

pub fn render_mood_options(today: Option<Mood>, styling: Styling) -> String {
    Mood::ALL
        .into_iter()
        .map(|mood| {
            let name = mood.to_string().to_lowercase();
            let option = format!("{} {name}", mood.emoji());
            if Some(mood) == today {
                format!("[{}]", styling.paint(mood_colour(mood).bold(), &option))
            } else {
                format!(" {} ", styling.paint(mood_colour(mood).normal(), &option))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn show_journal_list(context: &AppContext, styling: Styling) {
    println!("{}", styling.heading("Your Private Journal"));
    println!(
        "Write down your thoughts and feelings. When you're ready, Haven will offer a gentle reflection.\n"
    );
    println!("{}", styling.heading("Past Entries"));
    let entries = context.journal.entries();
    if entries.is_empty() {
        println!("No Entries Yet\nYour past entries will appear here.");
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        println!("{}", render_entry_line(index + 1, entry, &Local));
    }
}

pub fn render_entry_line<Tz: TimeZone>(number: usize, entry: &JournalEntry, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let date = entry.date.with_timezone(tz).format("%a, %B %-d");
    let first_line = entry.content.lines().next().unwrap_or_default();
    let mut preview = first_line.chars().take(PREVIEW_LENGTH).collect::<String>();
    if first_line.chars().count() > PREVIEW_LENGTH || entry.content.lines().count() > 1 {
        preview.push_str("...");
    }
    format!("{number:>3}. {date}  {preview}")
}

pub fn show_journal_entry(context: &AppContext, number: usize, styling: Styling) -> Result<()> {
    let entries = context.journal.entries();
    let Some(entry) = number.checked_sub(1).and_then(|i| entries.get(i)) else {
        bail!("There is no entry {number}, the journal has {} entries", entries.len());
    };
    print!("{}", render_entry(entry, &entry.date.with_timezone(&Local), styling));
    Ok(())
}

pub fn render_entry<Tz: TimeZone>(entry: &JournalEntry, date: &DateTime<Tz>, styling: Styling) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = format!(
        "{}\n{}\n\n{}\n",
        styling.heading("Journal Entry"),
        date.format("%A, %B %-d, %Y, %-I:%M %p"),
        entry.content
    );
    if let Some(summary) = &entry.summary {
        out.push_str(&render_reflection(summary, styling));
    }
    out
}

fn render_reflection(reflection: &str, styling: Styling) -> String {
    format!(
        "\n{}\n{}\n",
        styling.heading("A Gentle Reflection from Haven:"),
        styling.paint(Style::new().italic(), &format!("\"{reflection}\""))
    )
}

pub async fn write_journal(
    context: &mut AppContext,
    text: &str,
    view: &CancellationToken,
    styling: Styling,
) {
    if !text.trim().is_empty() {
        println!("Haven is reflecting...");
    }
    match context.journal.save_and_reflect(text, view).await {
        JournalSave::Empty => println!("Write something first, your entry is empty."),
        JournalSave::Saved { reflection, .. } => {
            print!("{}", render_reflection(reflection.as_str(), styling));
        }
        JournalSave::Discarded => println!("Left the journal, the entry wasn't saved."),
    }
}

pub async fn show_breathe(
    context: &AppContext,
    cycles: usize,
    view: &CancellationToken,
    styling: Styling,
) {
    println!("{}", styling.heading("Breathing Exercise"));
    println!("Follow the guide. Press Ctrl-C to stop.\n");
    let phases = breathing_phases(cycles);
    let completed = run_breathing(context.clock.as_ref(), phases, view, |phase| {
        print!("\r{:<16}", styling.paint(Colour::Cyan.bold(), phase.text));
        let _ = std::io::stdout().flush();
    })
    .await;
    println!("\n\nWell done. {completed} phases completed.");
}

/// Phases in `cycles` full breathing cycles. Absurdly large counts just mean "until stopped".
fn breathing_phases(cycles: usize) -> usize {
    cycles.saturating_mul(BREATHING_CYCLE.len())
}

pub async fn show_affirmation(context: &AppContext, view: &CancellationToken, styling: Styling) {
    println!("{}", styling.heading("Daily Affirmations"));
    match fetch_affirmation(&context.companion, view).await {
        Some(affirmation) => {
            println!("{}", styling.paint(Style::new().italic(), &format!("\"{affirmation}\"")))
        }
        None => println!("Left before the affirmation arrived."),
    }
}
