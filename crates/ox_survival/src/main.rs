//! OX Survival - Unified CLI
//!
//! Hosts games in the terminal, simulates them headless, and checks question
//! files.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, GameArgs};
use ox_quiz::QuizEngine;
use ox_survival::{
    QuestionSource, QuizConfig, RandomContestant, SimulationLimits, load_questions,
    run_simulation, sample_questions, tui,
};
use std::path::Path;
use tracing::{info, instrument, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { game, sample } => run_play(&cli.config, game, sample).await,
        Command::Simulate {
            game,
            seed,
            accuracy,
            timeout_rate,
            max_rounds,
            json,
        } => {
            initialize_stderr_tracing();
            run_simulate(
                &cli.config,
                game,
                seed,
                accuracy,
                timeout_rate,
                max_rounds,
                json,
            )
        }
        Command::Questions { path } => {
            initialize_stderr_tracing();
            list_questions(&path)
        }
    }
}

/// Run the terminal UI host
async fn run_play(config_path: &Path, game: GameArgs, sample: bool) -> Result<()> {
    let config = load_config(config_path, &game)?;
    let source = if sample {
        Some(QuestionSource::Sample)
    } else {
        config.questions().clone().map(QuestionSource::File)
    };
    tui::run_tui(config, source).await
}

/// Run a headless game and print its report
#[instrument(skip(config_path, game))]
fn run_simulate(
    config_path: &Path,
    game: GameArgs,
    seed: Option<u64>,
    accuracy: f64,
    timeout_rate: f64,
    max_rounds: u32,
    json: bool,
) -> Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&accuracy) && (0.0..=1.0).contains(&timeout_rate),
        "--accuracy and --timeout-rate must be between 0 and 1"
    );

    let config = load_config(config_path, &game)?;
    let settings = config.settings().context("Invalid game settings")?;
    let questions = match config.questions() {
        Some(path) => load_questions(path)?,
        None => sample_questions()?,
    };

    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, "Starting simulation");

    let mut engine = QuizEngine::seeded(seed);
    let mut contestant = RandomContestant::new(seed.wrapping_add(1), accuracy, timeout_rate);
    let report = run_simulation(
        &mut engine,
        settings,
        questions,
        &mut contestant,
        SimulationLimits::new(max_rounds),
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Seed:          {}", seed);
    println!(
        "Ending:        {}",
        report
            .ending
            .map(|e| e.to_string())
            .unwrap_or_else(|| "incomplete".to_string())
    );
    println!("Rounds played: {}", report.rounds_played);
    println!("Retries:       {}", report.retries);
    println!("Turns:         {}", report.turns);
    println!(
        "Winners:       {}",
        report
            .winners
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

/// Load a question file and print it
#[instrument(skip(path), fields(path = %path.display()))]
fn list_questions(path: &Path) -> Result<()> {
    let questions = load_questions(path)?;
    for (i, question) in questions.iter().enumerate() {
        println!(
            "{:>3}. [{}] {}",
            i + 1,
            if question.answer() { "O" } else { "X" },
            question.text()
        );
    }
    println!("{} questions", questions.len());
    Ok(())
}

#[instrument(skip(game), fields(config_path = %config_path.display()))]
fn load_config(config_path: &Path, game: &GameArgs) -> Result<QuizConfig> {
    let config = QuizConfig::load_or_default(config_path)?.with_overrides(game.overrides());
    if config.settings().is_err() {
        warn!("Configured game settings are invalid; fix them on the setup screen");
    }
    Ok(config)
}

#[instrument]
fn initialize_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(ox_survival::default_env_filter())
        .with_writer(std::io::stderr)
        .try_init();

    info!("Tracing initialized");
}
