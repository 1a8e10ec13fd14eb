//! Stateless UI rendering, one screen per phase.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use ox_quiz::{GameState, ParticipantId, RoundOutcome};
use strum::IntoEnumIterator;

use super::app::{App, SetupField};

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(8),    // Screen
            Constraint::Length(3), // Status
        ])
        .split(area);

    let title = Paragraph::new(title_for(app.state()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    match app.state() {
        GameState::Setup => draw_setup(frame, chunks[1], app),
        GameState::Countdown { .. } => draw_countdown(frame, chunks[1], app),
        GameState::Question { .. } => draw_question(frame, chunks[1], app),
        GameState::Answer { .. } => draw_answer(frame, chunks[1], app.state()),
        GameState::Result { .. } => draw_result(frame, chunks[1], app.state()),
        GameState::Confirmation { .. } => draw_confirmation(frame, chunks[1], app.state()),
        GameState::Finished { .. } => draw_finished(frame, chunks[1], app.state()),
    }

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);
}

fn title_for(state: &GameState) -> String {
    match state {
        GameState::Setup => "OX Survival - Setup".to_string(),
        GameState::Finished { .. } => "OX Survival - Game Over".to_string(),
        _ => format!("OX Survival - Round {}", state.round_number()),
    }
}

fn draw_setup(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.form();
    let mut lines: Vec<Line> = SetupField::iter()
        .map(|field| {
            let value = match field {
                SetupField::Total => form.total().to_string(),
                SetupField::Final => form.target().to_string(),
                SetupField::Mode => form.mode().label().to_string(),
            };
            let style = if field == form.selected() {
                Style::default().bg(Color::White).fg(Color::Black)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(format!("{:<20}", field.to_string())),
                Span::styled(format!(" ◀ {} ▶ ", value), style),
            ])
        })
        .collect();

    lines.push(Line::raw(""));
    lines.push(match app.source() {
        Some(source) => Line::raw(format!(
            "{} questions loaded from {}",
            app.question_count(),
            source
        )),
        None => Line::styled(
            "No questions loaded (press s for the sample set or f for a file)",
            Style::default().fg(Color::Red),
        ),
    });
    lines.push(Line::raw(""));
    lines.push(match app.path_input() {
        Some(input) => Line::from(vec![
            Span::raw("Question file: "),
            Span::styled(
                format!("{}_", input),
                Style::default().add_modifier(Modifier::UNDERLINED),
            ),
            Span::styled("   Enter load   Esc cancel", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::styled(
            "↑/↓ select   ←/→ change   m mode   s samples   f file   Enter start   q quit",
            Style::default().fg(Color::DarkGray),
        ),
    });

    let form_widget = Paragraph::new(lines).block(
        Block::default()
            .title("Game settings")
            .borders(Borders::ALL),
    );
    frame.render_widget(form_widget, area);
}

fn turn_label(state: &GameState) -> String {
    let lineup = state.lineup().len();
    match state.current_participant() {
        Some(id) => format!("Participant {} ({}/{})", id, state.turn() + 1, lineup),
        None => String::new(),
    }
}

fn draw_countdown(frame: &mut Frame, area: Rect, app: &App) {
    let remaining = app
        .remaining()
        .map(|r| r.to_string())
        .unwrap_or_default();
    let text = vec![
        Line::raw(turn_label(app.state())),
        Line::raw(""),
        Line::styled(
            remaining,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().title("Get ready").borders(Borders::ALL));
    frame.render_widget(widget, center_rect(area, 40, 7));
}

fn draw_question(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.state();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Participant
            Constraint::Length(3), // Timer
            Constraint::Min(3),    // Question
            Constraint::Length(1), // Keys
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(turn_label(state)).alignment(Alignment::Center),
        rows[0],
    );

    let remaining = app.remaining().unwrap_or_default();
    let length = app.timer_length().unwrap_or(1).max(1);
    let ratio = (remaining as f64 / length as f64).clamp(0.0, 1.0);
    let gauge_color = if remaining <= 2 { Color::Red } else { Color::Green };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(ratio)
        .label(format!("{}s", remaining));
    frame.render_widget(gauge, rows[1]);

    let text = state.current_question().map(|q| q.text()).unwrap_or_default();
    let question = Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Question").borders(Borders::ALL));
    frame.render_widget(question, rows[2]);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" O ", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
            Span::raw("(o / 1 / ←)      "),
            Span::styled(" X ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw("(x / 2 / →)"),
        ]))
        .alignment(Alignment::Center),
        rows[3],
    );
}

fn ox(answer: bool) -> &'static str {
    if answer { "O" } else { "X" }
}

fn draw_answer(frame: &mut Frame, area: Rect, state: &GameState) {
    let Some(question) = state.current_question() else {
        return;
    };
    let selected = state.selected_answer();
    let (verdict, color) = match selected {
        None => ("Time up!", Color::Yellow),
        Some(a) if a == question.answer() => ("Correct!", Color::Green),
        Some(_) => ("Wrong!", Color::Red),
    };

    let text = vec![
        Line::raw(turn_label(state)),
        Line::raw(""),
        Line::styled(verdict, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::raw(question.text().to_string()),
        Line::raw(format!("Correct answer: {}", ox(question.answer()))),
        Line::raw(format!(
            "Chosen answer: {}",
            selected.map(ox).unwrap_or("none")
        )),
    ];
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Answer").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn id_list(ids: &[ParticipantId]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn draw_result(frame: &mut Frame, area: Rect, state: &GameState) {
    let tally = state.tally();
    let verdict = state.verdict().unwrap_or_default();
    let mode = state
        .settings()
        .map(|s| s.elimination_mode().label())
        .unwrap_or_default();
    let target = state
        .settings()
        .map(|s| s.final_participants())
        .unwrap_or_default();

    let text = vec![
        Line::raw(format!("Round {} results", state.round_number())),
        Line::raw(""),
        Line::styled(
            format!("Correct: {}", tally.correct),
            Style::default().fg(Color::Green),
        ),
        Line::styled(
            format!("Incorrect: {} ({} timed out)", tally.incorrect, tally.timed_out),
            Style::default().fg(Color::Red),
        ),
        Line::raw(mode),
        Line::raw(""),
        Line::raw(format!("Would leave: {}", id_list(verdict.eliminated()))),
        Line::raw(format!(
            "Survivors ({} / target {}): {}",
            verdict.survivors().len(),
            target,
            id_list(verdict.survivors())
        )),
    ];
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Round result").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn draw_confirmation(frame: &mut Frame, area: Rect, state: &GameState) {
    let remaining = state.active_participants().len();
    let text = vec![
        Line::raw(format!(
            "{} participants are still in the game.",
            remaining
        )),
        Line::raw("Stop now and declare all of them winners?"),
        Line::raw(""),
        Line::styled(
            "y: end the game   n: keep playing",
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().title("Stop the game?").borders(Borders::ALL));
    frame.render_widget(widget, center_rect(area, 56, 8));
}

fn draw_finished(frame: &mut Frame, area: Rect, state: &GameState) {
    let ending = state
        .ending()
        .map(|e| e.to_string())
        .unwrap_or_default();
    let mut text = vec![
        Line::styled(
            format!("Game over: {}", ending),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!("Winners: {}", id_list(state.winners()))),
        Line::raw(""),
        Line::raw("History:"),
    ];
    text.extend(state.history().iter().map(|record| {
        let what = match &record.outcome {
            RoundOutcome::Advanced { eliminated } => {
                format!("eliminated {}", id_list(eliminated))
            }
            RoundOutcome::Retried { would_eliminate } => {
                format!("replayed (would have cut {})", id_list(would_eliminate))
            }
            RoundOutcome::GoalReached { eliminated } => {
                format!("target reached, out: {}", id_list(eliminated))
            }
            RoundOutcome::Stopped => "stopped by host".to_string(),
        };
        Line::raw(format!("  Round {}: {}", record.round, what))
    }));

    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Final standings").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
