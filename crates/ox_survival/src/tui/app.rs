//! Application state and logic.

use crate::config::QuizConfig;
use crate::source::{QuestionSource, SourceError};
use crate::timer::{TimerEvent, TimerKind, TurnTimer};
use ox_quiz::{EliminationMode, GameSettings, GameState, Phase, Question, QuizEngine, QuizError};
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::input::Command;

/// Field selected on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
pub enum SetupField {
    /// Participants at game start.
    #[strum(serialize = "Total participants")]
    Total,
    /// Survivors that end the game.
    #[strum(serialize = "Final participants")]
    Final,
    /// Elimination mode.
    #[strum(serialize = "Elimination mode")]
    Mode,
}

/// Values being edited on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupForm {
    total: u32,
    target: u32,
    mode: EliminationMode,
    selected: SetupField,
}

impl SetupForm {
    /// Form prefilled from configuration, pulled into the range the form edits.
    pub fn from_config(config: &QuizConfig) -> Self {
        let total = (*config.total_participants()).clamp(2, GameSettings::MAX_PARTICIPANTS);
        Self {
            total,
            target: (*config.final_participants()).clamp(1, total - 1),
            mode: *config.elimination_mode(),
            selected: SetupField::Total,
        }
    }

    /// Participants at game start.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Survivors that end the game.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Elimination mode.
    pub fn mode(&self) -> EliminationMode {
        self.mode
    }

    /// Field under the cursor.
    pub fn selected(&self) -> SetupField {
        self.selected
    }

    /// Validated settings for the values as entered.
    pub fn settings(&self) -> Result<GameSettings, QuizError> {
        Ok(GameSettings::new(self.total, self.target, self.mode)?)
    }

    fn step_field(&mut self, forward: bool) {
        let fields: Vec<SetupField> = SetupField::iter().collect();
        let current = fields
            .iter()
            .position(|f| *f == self.selected)
            .unwrap_or_default();
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.selected = fields[next];
    }

    fn adjust(&mut self, up: bool) {
        match self.selected {
            SetupField::Total => {
                self.total = if up {
                    self.total.saturating_add(1).min(GameSettings::MAX_PARTICIPANTS)
                } else {
                    self.total.saturating_sub(1).max(2)
                };
                self.target = self.target.min(self.total - 1);
            }
            SetupField::Final => {
                self.target = if up {
                    self.target.saturating_add(1).min(self.total.saturating_sub(1).max(1))
                } else {
                    self.target.saturating_sub(1).max(1)
                };
            }
            SetupField::Mode => self.mode = self.mode.toggle(),
        }
    }
}

/// Main application state.
pub struct App {
    engine: QuizEngine,
    timer: TurnTimer,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
    config: QuizConfig,
    form: SetupForm,
    questions: Vec<Question>,
    source: Option<QuestionSource>,
    path_input: Option<String>,
    remaining: Option<u64>,
    status_message: String,
    should_quit: bool,
}

impl App {
    /// Creates an application in setup.
    pub fn new(config: QuizConfig, engine: QuizEngine) -> Self {
        let (timer, timer_rx) = TurnTimer::channel();
        Self {
            engine,
            timer,
            timer_rx,
            form: SetupForm::from_config(&config),
            config,
            questions: Vec::new(),
            source: None,
            path_input: None,
            remaining: None,
            status_message: "Load questions, then press Enter to start.".to_string(),
            should_quit: false,
        }
    }

    /// Current game state.
    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Setup form values.
    pub fn form(&self) -> &SetupForm {
        &self.form
    }

    /// Number of loaded questions.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Where the loaded questions came from.
    pub fn source(&self) -> Option<&QuestionSource> {
        self.source.as_ref()
    }

    /// Text typed into the file path prompt, `None` when it is closed.
    pub fn path_input(&self) -> Option<&str> {
        self.path_input.as_deref()
    }

    /// Whether keys go to the file path prompt.
    pub fn is_editing_path(&self) -> bool {
        self.path_input.is_some()
    }

    /// Seconds left on the running countdown.
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Full length of the running countdown in seconds.
    pub fn timer_length(&self) -> Option<u64> {
        match self.timer.active()? {
            TimerKind::Countdown => Some(*self.config.countdown_secs()),
            TimerKind::Answer => Some(*self.config.answer_secs()),
        }
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Replaces the question pool. Only takes effect for the next game.
    #[instrument(skip(self, source), fields(source = %source))]
    pub fn load_questions(&mut self, source: QuestionSource) -> Result<usize, SourceError> {
        let questions = source.load()?;
        let count = questions.len();
        info!(count, "Question pool replaced");
        self.status_message = format!("Loaded {} questions from {}.", count, source);
        self.questions = questions;
        self.source = Some(source);
        Ok(count)
    }

    /// Like [`App::load_questions`], but a failure only lands in the status
    /// line and keeps the current pool.
    pub fn load_questions_or_report(&mut self, source: QuestionSource) {
        if let Err(e) = self.load_questions(source) {
            warn!(error = %e, "Questions failed to load");
            self.status_message = format!("Could not load questions: {}", e);
        }
    }

    /// Handles a key command.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn handle_command(&mut self, command: Command) {
        debug!("Handling command");
        match command {
            Command::Quit => {
                self.timer.cancel();
                self.should_quit = true;
            }
            Command::PreviousField => self.form.step_field(false),
            Command::NextField => self.form.step_field(true),
            Command::Increase => self.form.adjust(true),
            Command::Decrease => self.form.adjust(false),
            Command::ToggleMode => self.form.mode = self.form.mode.toggle(),
            Command::LoadSample => self.load_questions_or_report(QuestionSource::Sample),
            Command::OpenFile => {
                let current = match &self.source {
                    Some(QuestionSource::File(path)) => path.display().to_string(),
                    _ => String::new(),
                };
                self.path_input = Some(current);
                self.status_message = "Type a question file path, Enter to load.".to_string();
            }
            Command::PathInput(c) => {
                if let Some(input) = self.path_input.as_mut() {
                    input.push(c);
                }
            }
            Command::PathBackspace => {
                if let Some(input) = self.path_input.as_mut() {
                    input.pop();
                }
            }
            Command::PathSubmit => self.submit_path(),
            Command::PathCancel => {
                self.path_input = None;
                self.status_message = status_for(self.engine.state());
            }
            Command::Confirm => match self.phase() {
                Phase::Setup => self.start_game(),
                Phase::Answer => self.apply(|e| e.advance_participant()),
                Phase::Result => self.apply(|e| e.continue_game()),
                _ => {}
            },
            Command::AnswerO => self.apply(|e| e.answer_question(true)),
            Command::AnswerX => self.apply(|e| e.answer_question(false)),
            Command::Stop => {
                if self.state().offers_stop() {
                    self.apply(|e| e.show_confirmation());
                } else {
                    self.status_message = format!(
                        "Stopping is only offered while more than {} would survive.",
                        self.state()
                            .settings()
                            .map(|s| s.final_participants())
                            .unwrap_or_default()
                    );
                }
            }
            Command::Yes => self.apply(|e| e.end_game()),
            Command::No => self.apply(|e| e.continue_game()),
            Command::Reset => {
                self.engine.reset_game();
                self.sync_timer();
                self.status_message = "Game reset. Press Enter to start again.".to_string();
            }
        }
    }

    /// Handles an event from the turn timer, ignoring stale ones.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn handle_timer(&mut self, event: TimerEvent) {
        if !self.timer.is_current(&event) {
            debug!(?event, current = self.timer.generation(), "Dropping stale timer event");
            return;
        }

        match event {
            TimerEvent::Tick { remaining, .. } => self.remaining = Some(remaining),
            TimerEvent::Elapsed { kind, .. } => {
                self.remaining = Some(0);
                match kind {
                    TimerKind::Countdown => self.apply(|e| e.start_question()),
                    TimerKind::Answer => self.apply(|e| e.handle_time_up()),
                }
            }
        }
    }

    /// Applies every timer event that has already arrived.
    pub fn pump_timers(&mut self) {
        while let Ok(event) = self.timer_rx.try_recv() {
            self.handle_timer(event);
        }
    }

    /// Waits for the next timer event without applying it.
    pub async fn next_timer_event(&mut self) -> Option<TimerEvent> {
        self.timer_rx.recv().await
    }

    fn submit_path(&mut self) {
        let Some(input) = self.path_input.take() else {
            return;
        };
        let path = input.trim();
        if path.is_empty() {
            self.status_message = "No file path entered.".to_string();
            return;
        }
        self.load_questions_or_report(QuestionSource::File(PathBuf::from(path)));
    }

    fn start_game(&mut self) {
        let settings = match self.form.settings() {
            Ok(settings) => settings,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };
        let questions = self.questions.clone();
        self.apply(move |e| e.start_game(settings, questions));
    }

    /// Runs one engine operation and reports the outcome.
    fn apply(&mut self, op: impl FnOnce(&mut QuizEngine) -> Result<Phase, QuizError>) {
        match op(&mut self.engine) {
            Ok(phase) => {
                self.status_message = status_for(self.engine.state());
                debug!(%phase, "Screen changed");
                self.sync_timer();
            }
            Err(e) => {
                warn!(error = %e, "Operation rejected");
                self.status_message = e.to_string();
            }
        }
    }

    /// Starts the countdown the new phase needs, or stops the old one.
    fn sync_timer(&mut self) {
        match self.phase() {
            Phase::Countdown => {
                self.timer.schedule(TimerKind::Countdown, self.config.countdown());
                self.remaining = Some(*self.config.countdown_secs());
            }
            Phase::Question => {
                self.timer.schedule(TimerKind::Answer, self.config.answer_time());
                self.remaining = Some(*self.config.answer_secs());
            }
            _ => {
                self.timer.cancel();
                self.remaining = None;
            }
        }
    }
}

fn status_for(state: &GameState) -> String {
    match state {
        GameState::Setup => "Press Enter to start.".to_string(),
        GameState::Countdown { .. } => match state.current_participant() {
            Some(id) => format!("Get ready, participant {}!", id),
            None => String::new(),
        },
        GameState::Question { .. } => "O (1 / ←) or X (2 / →)?".to_string(),
        GameState::Answer { .. } => "Press Enter for the next participant.".to_string(),
        GameState::Result { .. } if state.offers_stop() => {
            "Enter: apply result   s: stop with the current field".to_string()
        }
        GameState::Result { .. } => "Enter: apply result".to_string(),
        GameState::Confirmation { .. } => "End the game now? (y/n)".to_string(),
        GameState::Finished { .. } => "Press r to play again or q to quit.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_keeps_target_below_total() {
        let mut form = SetupForm::from_config(&QuizConfig::default());
        form.selected = SetupField::Final;
        for _ in 0..20 {
            form.adjust(true);
        }
        assert_eq!(form.target(), form.total() - 1);

        form.selected = SetupField::Total;
        for _ in 0..20 {
            form.adjust(false);
        }
        assert_eq!(form.total(), 2);
        assert_eq!(form.target(), 1);
        assert!(form.settings().is_ok());
    }

    #[test]
    fn test_oversized_config_is_pulled_into_range() {
        let config = QuizConfig::from_toml(
            "total_participants = 4294967295\nfinal_participants = 4294967295\n",
        )
        .expect("valid toml");
        let mut form = SetupForm::from_config(&config);
        assert_eq!(form.total(), GameSettings::MAX_PARTICIPANTS);
        assert_eq!(form.target(), GameSettings::MAX_PARTICIPANTS - 1);

        form.adjust(true);
        assert_eq!(form.total(), GameSettings::MAX_PARTICIPANTS);
        form.selected = SetupField::Final;
        form.adjust(true);
        assert_eq!(form.target(), GameSettings::MAX_PARTICIPANTS - 1);
        assert!(form.settings().is_ok());
    }

    #[test]
    fn test_undersized_config_is_pulled_into_range() {
        let config = QuizConfig::from_toml("total_participants = 0\nfinal_participants = 0\n")
            .expect("valid toml");
        let form = SetupForm::from_config(&config);
        assert_eq!((form.total(), form.target()), (2, 1));
        assert!(form.settings().is_ok());
    }

    #[test]
    fn test_field_cycle_wraps() {
        let mut form = SetupForm::from_config(&QuizConfig::default());
        form.step_field(false);
        assert_eq!(form.selected(), SetupField::Mode);
        form.step_field(true);
        assert_eq!(form.selected(), SetupField::Total);
    }
}
