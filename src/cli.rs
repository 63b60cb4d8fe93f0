use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use crate::config::EngineConfig;
use crate::models::Module;
use crate::overlay::{HudCommand, OverlayChannel};
use crate::store::commands::{self, Amendment, NewSession};
use crate::store::{JsonStateStore, StateStore};

#[derive(Parser, Debug)]
#[command(name = "engress", version, about = "Study-discipline tracker")]
pub struct Cli {
    /// State document to use instead of the default data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the engagement daemon until Ctrl-C
    Run,

    /// Record a finished study session
    Log {
        /// Reading, Writing, Listening or Speaking
        #[arg(long)]
        module: Module,
        /// Minutes spent
        #[arg(long)]
        duration: u32,
        #[arg(long, default_value_t = 0.0)]
        score: f64,
        #[arg(long, default_value = "")]
        reflection: String,
        #[arg(long, default_value = "")]
        homework: String,
        #[arg(long, default_value = "")]
        learnings: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value = "")]
        source_url: String,
        #[arg(long, default_value = "")]
        screenshot: String,
    },

    /// Update the most recent session
    Amend {
        #[arg(long, default_value = "")]
        reflection: String,
        #[arg(long, default_value_t = 0.0)]
        score: f64,
        #[arg(long, default_value = "")]
        homework: String,
        #[arg(long, default_value = "")]
        learnings: String,
    },

    /// Delete a session by id
    DeleteLog { id: String },

    /// Vocabulary bank
    Vocab {
        #[command(subcommand)]
        action: VocabAction,
    },

    /// Profile and reminder settings
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Print the current consistency phase
    Phase,

    /// Print today's briefing
    Briefing,

    /// Print the whole state document
    State,

    /// Write the state document to a file
    Export { path: PathBuf },

    /// Delete the state document
    Reset,

    /// Send a command to a running daemon (toggle-pause, stop, open, hide-scratchpad)
    Send { command: HudCommand },
}

#[derive(Subcommand, Debug)]
pub enum VocabAction {
    Add {
        word: String,
        #[arg(long, default_value = "")]
        def: String,
        /// Example sentences, newline separated
        #[arg(long, default_value = "")]
        sentences: String,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    Name { name: String },
    /// Test date as YYYY-MM-DD
    TestDate { date: String },
    /// Replace the reminder slots (HH:MM)
    Reminders {
        /// Keep the slots but stop reminding
        #[arg(long)]
        disable: bool,
        times: Vec<String>,
    },
    /// Finish first-run setup
    Setup { name: String, test_date: String },
    TutorialDone,
}

/// Run a one-shot subcommand. `Run` is handled by the caller.
pub async fn execute(command: Commands, config: &EngineConfig, store: &JsonStateStore) -> Result<()> {
    let now = Local::now().naive_local();
    let today = now.date();

    match command {
        Commands::Run => bail!("the daemon is started by the caller"),
        Commands::Log {
            module,
            duration,
            score,
            reflection,
            homework,
            learnings,
            content,
            source_url,
            screenshot,
        } => {
            let session = NewSession {
                module: module.as_str().to_string(),
                duration,
                score,
                reflection,
                homework,
                learnings,
                content,
                source_url,
                screenshot,
            };
            let log = commands::log_session(store, session, now)?;
            println!("{}", log.id);
        }
        Commands::Amend {
            reflection,
            score,
            homework,
            learnings,
        } => {
            let amendment = Amendment {
                reflection,
                score,
                homework,
                learnings,
            };
            if !commands::amend_last_session(store, amendment)? {
                bail!("no sessions logged yet");
            }
        }
        Commands::DeleteLog { id } => {
            if !commands::delete_log(store, &id)? {
                bail!("no session with id {id}");
            }
        }
        Commands::Vocab { action } => match action {
            VocabAction::Add { word, def, sentences } => {
                let item = commands::add_vocabulary(store, &word, &def, &sentences, now)?;
                println!("{}", item.id);
            }
            VocabAction::Delete { id } => {
                if !commands::delete_vocabulary(store, &id)? {
                    bail!("no vocabulary item with id {id}");
                }
            }
        },
        Commands::Profile { action } => match action {
            ProfileAction::Name { name } => commands::update_profile_name(store, &name)?,
            ProfileAction::TestDate { date } => commands::update_test_date(store, &date)?,
            ProfileAction::Reminders { disable, times } => {
                commands::update_reminders(store, !disable, &times)?
            }
            ProfileAction::Setup { name, test_date } => {
                commands::complete_setup(store, &name, &test_date)?
            }
            ProfileAction::TutorialDone => commands::complete_tutorial(store)?,
        },
        Commands::Phase => {
            println!("{}", commands::consistency_phase(store, today, &config.analysis)?);
        }
        Commands::Briefing => {
            println!("{}", commands::briefing(store, today, &config.analysis)?);
        }
        Commands::State => {
            let state = store.load()?;
            let json = serde_json::to_string_pretty(&state).context("Could not format state")?;
            println!("{json}");
        }
        Commands::Export { path } => {
            commands::export_state(store, &path)?;
            println!("Exported to {}", path.display());
        }
        Commands::Reset => store.reset()?,
        Commands::Send { command } => {
            OverlayChannel::new(config.overlay.clone())
                .post_command(command)
                .await?;
        }
    }

    Ok(())
}
