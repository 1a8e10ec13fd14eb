//! Key bindings per screen.

use crossterm::event::KeyCode;
use ox_quiz::Phase;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Command {
    /// Leave the program.
    Quit,
    /// Setup: select the previous field.
    PreviousField,
    /// Setup: select the next field.
    NextField,
    /// Setup: increase the selected value.
    Increase,
    /// Setup: decrease the selected value.
    Decrease,
    /// Setup: switch the elimination mode.
    ToggleMode,
    /// Setup: load the built-in questions.
    LoadSample,
    /// Setup: start typing a question file path.
    OpenFile,
    /// Path prompt: append a character.
    PathInput(char),
    /// Path prompt: delete the last character.
    PathBackspace,
    /// Path prompt: load the typed file.
    PathSubmit,
    /// Path prompt: close without loading.
    PathCancel,
    /// Start the game, move past a shown answer, or apply a round result.
    Confirm,
    /// Question: answer O.
    AnswerO,
    /// Question: answer X.
    AnswerX,
    /// Result: ask to stop with the current field.
    Stop,
    /// Confirmation: end the game.
    Yes,
    /// Confirmation: keep playing.
    No,
    /// Finished: back to setup.
    Reset,
}

/// Maps a key on the given screen to a command.
pub fn command_for(phase: Phase, key: KeyCode) -> Option<Command> {
    if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
        return Some(Command::Quit);
    }

    match (phase, key) {
        (Phase::Setup, KeyCode::Up) => Some(Command::PreviousField),
        (Phase::Setup, KeyCode::Down | KeyCode::Tab) => Some(Command::NextField),
        (Phase::Setup, KeyCode::Right | KeyCode::Char('+')) => Some(Command::Increase),
        (Phase::Setup, KeyCode::Left | KeyCode::Char('-')) => Some(Command::Decrease),
        (Phase::Setup, KeyCode::Char('m')) => Some(Command::ToggleMode),
        (Phase::Setup, KeyCode::Char('s')) => Some(Command::LoadSample),
        (Phase::Setup, KeyCode::Char('f')) => Some(Command::OpenFile),
        (Phase::Setup, KeyCode::Enter) => Some(Command::Confirm),

        (Phase::Question, KeyCode::Char('o' | 'O' | '1') | KeyCode::Left) => {
            Some(Command::AnswerO)
        }
        (Phase::Question, KeyCode::Char('x' | 'X' | '2') | KeyCode::Right) => {
            Some(Command::AnswerX)
        }

        (Phase::Answer, KeyCode::Enter | KeyCode::Char(' ')) => Some(Command::Confirm),

        (Phase::Result, KeyCode::Enter) => Some(Command::Confirm),
        (Phase::Result, KeyCode::Char('s')) => Some(Command::Stop),

        (Phase::Confirmation, KeyCode::Char('y' | 'Y')) => Some(Command::Yes),
        (Phase::Confirmation, KeyCode::Char('n' | 'N')) => Some(Command::No),

        (Phase::Finished, KeyCode::Char('r') | KeyCode::Enter) => Some(Command::Reset),

        _ => None,
    }
}

/// Maps a key while the file path prompt is open.
///
/// Every printable key is text here, so `q` does not quit.
pub fn path_command_for(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Char(c) => Some(Command::PathInput(c)),
        KeyCode::Backspace => Some(Command::PathBackspace),
        KeyCode::Enter => Some(Command::PathSubmit),
        KeyCode::Esc => Some(Command::PathCancel),
        _ => None,
    }
}
