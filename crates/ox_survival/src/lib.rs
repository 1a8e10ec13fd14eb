//! OX Survival - terminal host for the O/X elimination quiz.
//!
//! The game rules live in [`ox_quiz`]; this crate adds everything around
//! them: question files, countdown timers, configuration, a ratatui front
//! end and a headless simulator.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod simulate;
pub mod source;
pub mod timer;
pub mod tui;

pub use config::{ConfigError, ConfigOverrides, QuizConfig};
pub use simulate::{
    Contestant, RandomContestant, SimulationLimits, SimulationReport, run_simulation,
};
pub use source::{
    QuestionFormat, QuestionSource, SourceError, load_questions, parse_questions, sample_questions,
};
pub use timer::{TimerEvent, TimerKind, TurnTimer};

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,ox_quiz=debug,ox_survival=debug";

/// `RUST_LOG` if set, otherwise [`DEFAULT_LOG_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
