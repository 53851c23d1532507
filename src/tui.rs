//! Full-screen terminal interface built on Ratatui.
//!
//! # Architecture
//! - `TuiInterface` owns the terminal, keeps a snapshot of the last board it
//!   was shown and a scrolling message log, and implements [`GameInterface`].
//! - Reading a clue or a guess runs a small input loop; Esc or Ctrl-C at
//!   any prompt ends the game.
//!
//! # State Machine
//! - `Idle` → `EnteringClue` / `EnteringGuess` → `Idle`
//! - `Thinking` while the computer spymaster plans
//! - `GameOver` waits for one key before the game loop returns

use crate::board::{Board, BoardCell, Owner, Team, ViewerRole, render_cell};
use crate::cli::format_guess_result;
use crate::error::Error;
use crate::game_state::{Clue, GameInterface, GameOutcome, GuessReport};
use crate::planner::Plan;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const MAX_INPUT_LEN: usize = 40;
const MAX_LOG_LINES: usize = 200;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const HIDDEN_OWNER_STYLE: Style = Style::new().fg(Color::White);

#[derive(Debug, Clone, PartialEq, Eq)]
enum TuiState {
    Idle,
    EnteringClue(Team),
    EnteringGuess { team: Team, clue: String, number: usize },
    Thinking(Team),
    GameOver,
}

/// Result of one key press at a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputAction {
    Submit(String),
    Quit,
}

fn owner_color(owner: Owner) -> Color {
    match owner {
        Owner::Lethal => Color::Magenta,
        Owner::TeamA => Color::Red,
        Owner::TeamB => Color::Blue,
        Owner::Neutral => Color::Gray,
    }
}

/// Owner colors follow the same visibility rule as the owner glyphs.
fn cell_style(cell: &BoardCell, role: ViewerRole) -> Style {
    if !cell.visible {
        return Style::new().fg(Color::Black).bg(owner_color(cell.owner));
    }
    match role {
        ViewerRole::Spymaster => Style::new()
            .fg(owner_color(cell.owner))
            .add_modifier(Modifier::BOLD),
        ViewerRole::TeamPlayer => HIDDEN_OWNER_STYLE,
    }
}

fn team_style(team: Team) -> Style {
    Style::new()
        .fg(owner_color(team.owner()))
        .add_modifier(Modifier::BOLD)
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Apply one key press to the input buffer.
fn edit_input(input: &mut String, key: &KeyEvent) -> Option<InputAction> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputAction::Quit)
        }
        KeyCode::Esc => Some(InputAction::Quit),
        KeyCode::Enter => Some(InputAction::Submit(std::mem::take(input))),
        KeyCode::Backspace => {
            input.pop();
            None
        }
        KeyCode::Char(c)
            if !has_modifier_keys(key)
                && c != '\u{FFFD}'
                && (c as u32) >= ASCII_CONTROL_CHAR_THRESHOLD
                && input.len() < MAX_INPUT_LEN =>
        {
            input.push(c);
            None
        }
        _ => None,
    }
}

/// Context for rendering the UI, grouped to keep argument lists short.
struct RenderContext<'a> {
    board: Option<&'a Board>,
    role: ViewerRole,
    state: &'a TuiState,
    input: &'a str,
    log: &'a [(String, Style)],
    status: &'a str,
}

pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    active: bool,
    board: Option<Board>,
    role: ViewerRole,
    state: TuiState,
    input: String,
    log: Vec<(String, Style)>,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete");

        Ok(Self {
            terminal,
            active: true,
            board: None,
            role: ViewerRole::TeamPlayer,
            state: TuiState::Idle,
            input: String::new(),
            log: Vec::new(),
            status: "Ready".to_string(),
        })
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn push_log(&mut self, text: String, style: Style) {
        self.log.push((text, style));
        if self.log.len() > MAX_LOG_LINES {
            let excess = self.log.len() - MAX_LOG_LINES;
            self.log.drain(..excess);
        }
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            board: self.board.as_ref(),
            role: self.role,
            state: &self.state,
            input: &self.input,
            log: &self.log,
            status: &self.status,
        };
        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let board_rows = ctx.board.map_or(0, Board::size) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),              // Title
                Constraint::Length(board_rows + 2), // Board
                Constraint::Min(6),                 // Message log
                Constraint::Length(3),              // Input
                Constraint::Length(3),              // Status
                Constraint::Length(3),              // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx.board, ctx.role);
        Self::render_log(f, chunks[2], ctx.log);
        Self::render_input(f, chunks[3], ctx.state, ctx.input);
        Self::render_status(f, chunks[4], ctx.status);
        Self::render_instructions(f, chunks[5], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("CODENAMES")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, board: Option<&Board>, role: ViewerRole) {
        let title = match role {
            ViewerRole::Spymaster => "Board (spymaster view)",
            ViewerRole::TeamPlayer => "Board",
        };
        let lines: Vec<Line> = board
            .map(|board| {
                board
                    .rows()
                    .map(|row| {
                        let mut spans = Vec::with_capacity(row.len() * 2);
                        for cell in row {
                            spans.push(Span::styled(
                                render_cell(cell, role),
                                cell_style(cell, role),
                            ));
                            spans.push(Span::raw(" "));
                        }
                        Line::from(spans)
                    })
                    .collect()
            })
            .unwrap_or_default();
        let paragraph =
            Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_log(f: &mut Frame, area: Rect, log: &[(String, Style)]) {
        let capacity = area.height.saturating_sub(2) as usize;
        let skip = log.len().saturating_sub(capacity);
        let lines: Vec<Line> = log
            .iter()
            .skip(skip)
            .map(|(text, style)| Line::from(Span::styled(text.as_str(), *style)))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Messages").borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_input(f: &mut Frame, area: Rect, state: &TuiState, input: &str) {
        let (label, style) = match state {
            TuiState::EnteringClue(team) => {
                (format!("{} Clue: ", team.label()), team_style(*team))
            }
            TuiState::EnteringGuess { team, clue, number } => (
                format!("{} [{clue}] Guess #{number}: ", team.label()),
                team_style(*team),
            ),
            TuiState::Thinking(team) => (format!("{} Thinking...", team.label()), INFO_STYLE),
            TuiState::Idle | TuiState::GameOver => (String::new(), Style::default()),
        };
        let accepting = matches!(
            state,
            TuiState::EnteringClue(_) | TuiState::EnteringGuess { .. }
        );
        let mut spans = vec![Span::styled(label, style)];
        if accepting {
            spans.push(Span::raw(input));
            spans.push(Span::styled("_", Style::new().add_modifier(Modifier::SLOW_BLINK)));
        }
        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title("Input").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: &TuiState) {
        let text = match state {
            TuiState::EnteringClue(_) => "Type WORD COUNT | ENTER: Submit | ESC: Quit",
            TuiState::EnteringGuess { .. } => {
                "Type a board word | ENTER: Submit (empty to stop guessing) | ESC: Quit"
            }
            TuiState::Thinking(_) => "The computer spymaster is choosing a clue...",
            TuiState::GameOver => "Press any key to exit",
            TuiState::Idle => "ESC: Quit",
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    /// Wait for the next key press. `Ok(None)` when the poll timed out or
    /// the event was not a usable key.
    fn next_key(&mut self) -> Result<Option<KeyEvent>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            other => {
                debug_log!("next_key() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }

    fn read_line(&mut self, state: TuiState) -> Option<String> {
        self.state = state;
        self.input.clear();
        let result = loop {
            if self.draw().is_err() {
                break None;
            }
            match self.next_key() {
                Ok(Some(key)) => match edit_input(&mut self.input, &key) {
                    Some(InputAction::Submit(text)) => break Some(text.trim().to_string()),
                    Some(InputAction::Quit) => {
                        info_log!("read_line() - Quit requested");
                        break None;
                    }
                    None => {}
                },
                Ok(None) => {}
                Err(e) => {
                    debug_log!("read_line() - Input error: {}", e);
                    break None;
                }
            }
        };
        self.state = TuiState::Idle;
        result
    }
}

impl GameInterface for TuiInterface {
    fn show_board(&mut self, board: &Board, role: ViewerRole) {
        self.board = Some(board.clone());
        self.role = role;
        self.draw_or_log();
    }

    fn read_clue(&mut self, team: Team) -> Option<String> {
        self.status = format!("{team} spymaster: give a clue");
        let clue = self.read_line(TuiState::EnteringClue(team));
        if let Some(text) = &clue {
            self.push_log(format!("{} > {text}", team.label()), team_style(team));
        }
        clue
    }

    fn read_guess(&mut self, team: Team, clue: &Clue, guess_number: usize) -> Option<String> {
        self.status = format!("{team}: guess for \"{clue}\"");
        let guess = self.read_line(TuiState::EnteringGuess {
            team,
            clue: clue.to_string(),
            number: guess_number,
        });
        if let Some(text) = &guess {
            let shown = if text.is_empty() { "(stop)" } else { text.as_str() };
            self.push_log(format!("{} ? {shown}", team.label()), team_style(team));
        }
        guess
    }

    fn show_thinking(&mut self, team: Team) {
        self.state = TuiState::Thinking(team);
        self.push_log(
            format!("{} {team} spymaster is thinking...", team.label()),
            MESSAGE_STYLE,
        );
        self.status = format!("{team} spymaster is thinking...");
        self.draw_or_log();
    }

    fn show_plan(&mut self, team: Team, plan: &Plan) {
        self.push_log(
            format!(
                "{} Top candidates out of {} target groups:",
                team.label(),
                plan.subsets_evaluated
            ),
            INFO_STYLE,
        );
        for candidate in &plan.ranked {
            self.push_log(format!("    {candidate}"), Style::default());
        }
        self.draw_or_log();
    }

    fn show_clue(&mut self, team: Team, clue: &Clue) {
        self.state = TuiState::Idle;
        self.push_log(format!("{} The clue is: {clue}", team.label()), team_style(team));
        self.status = format!("{team} clue: {clue}");
        self.draw_or_log();
    }

    fn show_guess_result(&mut self, report: &GuessReport) {
        let style = if report.owner == report.team.owner() {
            SUCCESS_STYLE
        } else {
            ERROR_STYLE
        };
        self.push_log(
            format!("{} {}", report.team.label(), format_guess_result(report)),
            style,
        );
        self.draw_or_log();
    }

    fn show_error(&mut self, error: &Error) {
        self.push_log(error.to_string(), ERROR_STYLE);
        self.draw_or_log();
    }

    fn show_outcome(&mut self, outcome: GameOutcome) {
        self.state = TuiState::GameOver;
        self.push_log(outcome.to_string(), team_style(outcome.winner()));
        self.status = format!("Game over - {outcome}");
        loop {
            if self.draw().is_err() {
                break;
            }
            match self.next_key() {
                Ok(Some(_)) | Err(_) => break,
                Ok(None) => {}
            }
        }
    }

    fn show_farewell(&mut self) {
        if let Err(e) = self.cleanup() {
            debug_log!("Cleanup error: {}", e);
        }
        println!("Bye.");
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
