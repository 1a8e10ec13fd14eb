//! Command-line interface for ox_survival.

use clap::{Args, Parser, Subcommand};
use ox_quiz::EliminationMode;
use ox_survival::ConfigOverrides;
use std::path::PathBuf;

/// OX Survival - host an O/X elimination quiz in the terminal
#[derive(Parser, Debug)]
#[command(name = "ox_survival")]
#[command(about = "Terminal host for O/X elimination quizzes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (optional)
    #[arg(short, long, global = true, default_value = "ox_survival.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Game settings shared by `play` and `simulate`.
#[derive(Args, Debug, Clone, Default)]
pub struct GameArgs {
    /// Question file (.csv, .tsv, .txt, .xlsx, .xls or .ods)
    #[arg(long)]
    pub questions: Option<PathBuf>,

    /// Participants at game start
    #[arg(short, long)]
    pub participants: Option<u32>,

    /// Survivors that end the game
    #[arg(short, long = "final")]
    pub final_participants: Option<u32>,

    /// Who leaves after each round: correct or incorrect
    #[arg(short, long)]
    pub mode: Option<EliminationMode>,
}

impl GameArgs {
    /// Converts the flags into config overrides.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides::new(
            self.participants,
            self.final_participants,
            self.mode,
            self.questions.clone(),
        )
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Host a game in the terminal UI
    Play {
        #[command(flatten)]
        game: GameArgs,

        /// Start with the built-in sample questions
        #[arg(long, conflicts_with = "questions")]
        sample: bool,
    },

    /// Play a game headless with random contestants
    Simulate {
        #[command(flatten)]
        game: GameArgs,

        /// Seed for question order and contestant behaviour
        #[arg(long)]
        seed: Option<u64>,

        /// Chance that an answer is correct
        #[arg(long, default_value = "0.6")]
        accuracy: f64,

        /// Chance that a participant lets the clock run out
        #[arg(long, default_value = "0.1")]
        timeout_rate: f64,

        /// Round decisions before the host stops the game
        #[arg(long, default_value = "50")]
        max_rounds: u32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a question file and list its questions
    Questions {
        /// Question file (.csv, .tsv, .txt, .xlsx, .xls or .ods)
        path: PathBuf,
    },
}
