pub mod interrupt;
pub mod session;
pub mod views;

use std::{env, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use interrupt::run_interruptible;
use session::run_session;
use tracing::{info, level_filters::LevelFilter};
use views::Styling;

use crate::{
    app::{App, AppContext, Page, SharedStorage},
    companion::{
        gemini::{GeminiClient, GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL},
        Companion,
    },
    store::{entities::Mood, FileSlotStorage},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "MindHaven", version, long_about = None)]
#[command(about = "Your safe space for mental clarity: mood tracking, journaling, breathing and affirmations")]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(
        long,
        global = true,
        env = "MINDHAVEN_DIR",
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs to the console")]
    log: bool,
    #[arg(long = "log-filter", global = true, help = "Log level, e.g. debug or trace")]
    log_filter: Option<LevelFilter>,
    #[arg(
        long,
        global = true,
        env = "GEMINI_API_KEY",
        hide_env_values = true,
        help = "Gemini API key. Falls back to $API_KEY"
    )]
    api_key: Option<String>,
    #[arg(long, global = true, env = "MINDHAVEN_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long = "api-url", global = true, env = "MINDHAVEN_API_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    api_url: String,
    #[arg(long = "no-color", global = true, help = "Disable colored output")]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Greeting, your latest mood and an affirmation")]
    Dashboard,
    #[command(about = "Log today's mood or look at your mood history")]
    Mood {
        #[arg(help = "One of joyful, calm, neutral, sad, anxious. Without it the history is shown")]
        mood: Option<Mood>,
    },
    #[command(about = "Write a journal entry and receive a reflection, or browse past entries")]
    Journal {
        #[arg(long, conflicts_with = "text", help = "Show entry N in full, 1 is the newest")]
        show: Option<usize>,
        #[arg(trailing_var_arg = true, help = "Text of the new entry")]
        text: Vec<String>,
    },
    #[command(about = "Guided breathing exercise")]
    Breathe {
        #[arg(long, default_value_t = 3, help = "Number of breathing cycles, 16 seconds each")]
        cycles: usize,
    },
    #[command(alias = "affirm", about = "Get a new affirmation")]
    Affirmations,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => ensure_dir(dir)?,
        None => create_application_default_path()?,
    };

    let logging_level = args.log_filter.or(args.log.then_some(LevelFilter::TRACE));
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;

    let storage: SharedStorage = Arc::new(FileSlotStorage::new(app_dir.join("slots"))?);
    let gemini = GeminiClient::new(GeminiConfig {
        base_url: args.api_url,
        model: args.model,
        api_key: args.api_key.or_else(|| env::var("API_KEY").ok()),
    })?;
    let context = AppContext::new(storage, Companion::new(Box::new(gemini)), Arc::new(DefaultClock));
    let mut app = App::new(context);
    let styling = Styling {
        colored: !args.no_color,
    };

    info!("Running with application directory {app_dir:?}");

    let Some(command) = args.commands else {
        return run_session(&mut app, styling).await;
    };

    match command {
        Commands::Dashboard => {
            app.navigate(Page::Dashboard);
            let context = app.context();
            run_interruptible(|view| async move {
                views::show_dashboard(context, &view, styling).await
            })
            .await;
        }
        Commands::Mood { mood } => {
            app.navigate(Page::Mood);
            views::show_mood(app.context_mut(), mood, styling);
        }
        Commands::Journal { show, text } => {
            app.navigate(Page::Journal);
            let context = app.context_mut();
            if let Some(number) = show {
                views::show_journal_entry(context, number, styling)?;
            } else if text.is_empty() {
                views::show_journal_list(context, styling);
            } else {
                let text = text.join(" ");
                run_interruptible(|view| async move {
                    views::write_journal(context, &text, &view, styling).await
                })
                .await;
            }
        }
        Commands::Breathe { cycles } => {
            app.navigate(Page::Breathe);
            let context = app.context();
            run_interruptible(|view| async move {
                views::show_breathe(context, cycles, &view, styling).await
            })
            .await;
        }
        Commands::Affirmations => {
            app.navigate(Page::Affirmations);
            let context = app.context();
            run_interruptible(|view| async move {
                views::show_affirmation(context, &view, styling).await
            })
            .await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use crate::store::entities::Mood;

    use super::{Args, Commands};

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_commands() {
        let args = Args::try_parse_from(["mindhaven", "mood", "calm"]).unwrap();
        assert!(matches!(args.commands, Some(Commands::Mood { mood: Some(Mood::Calm) })));

        let args =
            Args::try_parse_from(["mindhaven", "journal", "I", "slept", "well"]).unwrap();
        let Some(Commands::Journal { show, text }) = args.commands else {
            panic!("Expected journal command");
        };
        assert_eq!(show, None);
        assert_eq!(text.join(" "), "I slept well");

        let args = Args::try_parse_from(["mindhaven", "affirm", "--no-color"]).unwrap();
        assert!(matches!(args.commands, Some(Commands::Affirmations)));
        assert!(args.no_color);

        assert!(Args::try_parse_from(["mindhaven", "mood", "hungry"]).is_err());
        assert!(Args::try_parse_from(["mindhaven", "journal", "--show", "1", "text"]).is_err());
    }
}
