//! Terminal UI for hosting a game.

pub mod app;
pub mod input;
pub mod ui;

use crate::config::QuizConfig;
use crate::source::QuestionSource;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ox_quiz::QuizEngine;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use app::App;

/// Runs the TUI until the host quits.
///
/// Logs go to the configured log file so they do not tear the screen.
pub async fn run_tui(config: QuizConfig, source: Option<QuestionSource>) -> Result<()> {
    let log_file = std::fs::File::create(config.log_file())
        .with_context(|| format!("Failed to create log file {}", config.log_file().display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(crate::default_env_filter())
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!("Starting OX Survival TUI");

    let mut app = App::new(config, QuizEngine::new());
    if let Some(source) = source {
        app.load_questions_or_report(source);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("TUI closed");
    res
}

/// Draw, apply timer events, then wait briefly for a key.
#[instrument(skip_all)]
fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.pump_timers();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind == KeyEventKind::Release {
                continue;
            }
            let command = if app.is_editing_path() {
                input::path_command_for(key.code)
            } else {
                input::command_for(app.phase(), key.code)
            };
            if let Some(command) = command {
                debug!(%command, key = ?key.code, "Key mapped");
                app.handle_command(command);
            }
        }

        if app.should_quit() {
            info!("User quit");
            return Ok(());
        }
    }
}
