use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

use crate::{
    app::{App, Page},
    store::entities::Mood,
};

use super::{
    interrupt::run_interruptible,
    views::{self, Styling},
};

/// Number of breathing cycles run when the breathe page is opened interactively.
const SESSION_BREATHING_CYCLES: usize = 3;

/// What a line typed into the interactive session means on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Quit,
    Help,
    Navigate(Page),
    SelectMood(Mood),
    WriteJournal(String),
    ShowEntry(usize),
    /// Run the current page again, e.g. a new affirmation.
    Repeat,
    Unknown(String),
}

/// Page names, `quit` and `help` work everywhere. On the journal page every other line is an
/// entry, and `write ...` saves the rest of the line even if it reads like a command.
pub fn parse_input(page: Page, line: &str) -> Input {
    if matches!(page, Page::Journal) {
        if let Some(text) = line.trim_start().strip_prefix("write ") {
            return Input::WriteJournal(text.trim_end().to_string());
        }
    }

    let trimmed = line.trim();
    let lowered = trimmed.to_lowercase();
    match lowered.as_str() {
        "" => return Input::Empty,
        "quit" | "exit" | "q" => return Input::Quit,
        "help" | "?" => return Input::Help,
        _ => {}
    }
    if let Ok(page) = trimmed.parse::<Page>() {
        return Input::Navigate(page);
    }

    match page {
        Page::Mood => trimmed
            .parse::<Mood>()
            .map(Input::SelectMood)
            .unwrap_or_else(|_| Input::Unknown(trimmed.to_string())),
        Page::Journal => match trimmed
            .strip_prefix("show ")
            .map(|v| v.trim().parse::<usize>())
        {
            Some(Ok(number)) => Input::ShowEntry(number),
            _ => Input::WriteJournal(line.trim_end().to_string()),
        },
        Page::Dashboard | Page::Breathe | Page::Affirmations
            if matches!(lowered.as_str(), "again" | "new" | "start") =>
        {
            Input::Repeat
        }
        Page::Dashboard | Page::Breathe | Page::Affirmations => {
            Input::Unknown(trimmed.to_string())
        }
    }
}

fn print_help() {
    println!("Pages: dashboard, mood, journal, breathe, affirmations (or affirm).");
    println!("  mood:          type a mood to log it (joyful, calm, neutral, sad, anxious)");
    println!("  journal:       type your entry and press enter, `show N` opens entry N");
    println!("                 a line that is only a page name or `quit` is taken as that command,");
    println!("                 start it with `write ` to save it as an entry instead");
    println!("  breathe:       `again` starts another session, Ctrl-C stops it");
    println!("  affirmations:  `new` for another affirmation");
    println!("Type `quit` to leave.");
}

/// Interactive mode. Starts on the dashboard and lets the user move between pages.
pub async fn run_session(app: &mut App, styling: Styling) -> Result<()> {
    print_help();
    println!();
    render_page(app, styling).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{}> ", app.current_page());
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let input = parse_input(app.current_page(), &line);
        debug!("Session input {input:?}");
        match input {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => print_help(),
            Input::Navigate(page) => {
                app.navigate(page);
                render_page(app, styling).await;
            }
            Input::Repeat => render_page(app, styling).await,
            Input::SelectMood(mood) => views::show_mood(app.context_mut(), Some(mood), styling),
            Input::WriteJournal(text) => {
                let context = app.context_mut();
                run_interruptible(|view| async move {
                    views::write_journal(context, &text, &view, styling).await
                })
                .await
            }
            Input::ShowEntry(number) => {
                if let Err(e) = views::show_journal_entry(app.context(), number, styling) {
                    error!("Failed to show entry {e:?}");
                    println!("{e}");
                }
            }
            Input::Unknown(text) => {
                println!(
                    "Don't know what to do with {text:?} on the {} page. Type `help` for options.",
                    app.current_page()
                )
            }
        }
    }
    Ok(())
}

async fn render_page(app: &mut App, styling: Styling) {
    let page = app.current_page();
    let context = app.context_mut();
    match page {
        Page::Dashboard => {
            run_interruptible(|view| async move {
                views::show_dashboard(context, &view, styling).await
            })
            .await
        }
        Page::Mood => views::show_mood(context, None, styling),
        Page::Journal => views::show_journal_list(context, styling),
        Page::Breathe => {
            run_interruptible(|view| async move {
                views::show_breathe(context, SESSION_BREATHING_CYCLES, &view, styling).await
            })
            .await
        }
        Page::Affirmations => {
            run_interruptible(|view| async move {
                views::show_affirmation(context, &view, styling).await
            })
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{app::Page, store::entities::Mood};

    use super::{parse_input, Input};

    #[test]
    fn test_global_commands() {
        for page in Page::ALL {
            assert_eq!(parse_input(page, "  "), Input::Empty);
            assert_eq!(parse_input(page, "QUIT"), Input::Quit);
            assert_eq!(parse_input(page, "help"), Input::Help);
            assert_eq!(parse_input(page, "breathe"), Input::Navigate(Page::Breathe));
            assert_eq!(parse_input(page, "affirm"), Input::Navigate(Page::Affirmations));
        }
    }

    #[test]
    fn test_page_specific_input() {
        assert_eq!(parse_input(Page::Mood, "Calm"), Input::SelectMood(Mood::Calm));
        assert_eq!(
            parse_input(Page::Mood, "sleepy"),
            Input::Unknown("sleepy".into())
        );
        assert_eq!(parse_input(Page::Journal, "show 2"), Input::ShowEntry(2));
        assert_eq!(
            parse_input(Page::Journal, "  Today was calm  "),
            Input::WriteJournal("  Today was calm".into())
        );
        assert_eq!(
            parse_input(Page::Journal, "show them who I am"),
            Input::WriteJournal("show them who I am".into())
        );
        assert_eq!(parse_input(Page::Affirmations, "new"), Input::Repeat);
        assert_eq!(parse_input(Page::Affirmations, " New "), Input::Repeat);
        assert_eq!(parse_input(Page::Breathe, "AGAIN"), Input::Repeat);
        assert_eq!(parse_input(Page::Dashboard, "Start"), Input::Repeat);
        assert_eq!(parse_input(Page::Dashboard, "calm"), Input::Unknown("calm".into()));
    }

    #[test]
    fn test_journal_lines_that_look_like_commands() {
        assert_eq!(parse_input(Page::Journal, "mood"), Input::Navigate(Page::Mood));
        assert_eq!(parse_input(Page::Journal, "quit"), Input::Quit);
        assert_eq!(
            parse_input(Page::Journal, "write mood"),
            Input::WriteJournal("mood".into())
        );
        assert_eq!(
            parse_input(Page::Journal, "  write quit  "),
            Input::WriteJournal("quit".into())
        );
        assert_eq!(
            parse_input(Page::Mood, "write calm"),
            Input::Unknown("write calm".into())
        );
    }
}
