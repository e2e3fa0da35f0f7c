mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mastery_lib::flashcards::{MemoryTier, RecallDifficulty};

#[derive(Parser)]
#[command(name = "mastery-cli", about = "Course progress and flashcard memory CLI", version)]
struct Cli {
    /// Data directory (default: platform local data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Course document to load
    #[arg(long, global = true)]
    course: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum TierArg {
    Short,
    Long,
}

impl From<TierArg> for MemoryTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Short => MemoryTier::ShortTerm,
            TierArg::Long => MemoryTier::LongTerm,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum DifficultyArg {
    Easy,
    Hard,
    DontRemember,
}

impl From<DifficultyArg> for RecallDifficulty {
    fn from(difficulty: DifficultyArg) -> Self {
        match difficulty {
            DifficultyArg::Easy => RecallDifficulty::Easy,
            DifficultyArg::Hard => RecallDifficulty::Hard,
            DifficultyArg::DontRemember => RecallDifficulty::DontRemember,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show the course tree with lock and completion markers
    Course,

    /// Show completion percentages and points
    Progress,

    /// Complete a module and award its points
    Complete {
        topic: String,
        lesson: String,
        module: String,
        /// Quiz score (0-100); quiz modules need this or --answer
        #[arg(long, conflicts_with = "answers")]
        score: Option<u8>,
        /// Quiz answer as QUESTION=OPTION[,OPTION], graded against the course
        #[arg(long = "answer", value_name = "QUESTION=OPTIONS")]
        answers: Vec<String>,
    },

    /// Delete all progress for the course
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Saved flashcards and the recall queue
    #[command(subcommand)]
    Flashcards(FlashcardsCommand),
}

#[derive(Subcommand)]
enum FlashcardsCommand {
    /// Save cards from a flashcards module
    Save {
        topic: String,
        lesson: String,
        module: String,
        /// Save only this card
        #[arg(long)]
        card: Option<String>,
    },

    /// List saved cards
    List {
        /// Only cards in this tier
        #[arg(long)]
        tier: Option<TierArg>,
    },

    /// Show cards due for recall
    Due,

    /// Record how well a card was recalled
    Recall {
        id: String,
        difficulty: DifficultyArg,
    },

    /// Move a card back to short-term memory
    Demote { id: String },

    /// Delete a saved card
    Remove { id: String },

    /// Show memory statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.data_dir, cli.config, cli.course)?;

    match cli.command {
        Command::Course => {
            commands::course::run(&app, &cli.format, use_color)?;
        }
        Command::Progress => {
            commands::progress::run_status(&app, &cli.format, use_color)?;
        }
        Command::Complete { topic, lesson, module, score, answers } => {
            commands::complete::run(&app, &topic, &lesson, &module, score, &answers, &cli.format, use_color)?;
        }
        Command::Reset { yes } => {
            commands::progress::run_reset(&app, yes)?;
        }
        Command::Flashcards(subcmd) => match subcmd {
            FlashcardsCommand::Save { topic, lesson, module, card } => {
                commands::flashcards::run_save(&app, &topic, &lesson, &module, card.as_deref(), &cli.format)?;
            }
            FlashcardsCommand::List { tier } => {
                commands::flashcards::run_list(&app, tier.map(MemoryTier::from), &cli.format, use_color)?;
            }
            FlashcardsCommand::Due => {
                commands::flashcards::run_due(&app, &cli.format, use_color)?;
            }
            FlashcardsCommand::Recall { id, difficulty } => {
                commands::flashcards::run_recall(&app, &id, difficulty.into(), &cli.format, use_color)?;
            }
            FlashcardsCommand::Demote { id } => {
                commands::flashcards::run_demote(&app, &id, &cli.format)?;
            }
            FlashcardsCommand::Remove { id } => {
                commands::flashcards::run_remove(&app, &id)?;
            }
            FlashcardsCommand::Stats => {
                commands::flashcards::run_stats(&app, &cli.format, use_color)?;
            }
        },
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
