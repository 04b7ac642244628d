//! TUI (Terminal User Interface) front end
//!
//! Full-screen alternative to the line-oriented CLI, built on Ratatui.
//!
//! # State Machine
//! - `ChoosingCategory` → `Generating` → `Guessing` → `GameOver` → back to `ChoosingCategory`
//! - A failed start returns from `Generating` to the game that was left for the
//!   category list, or to `ChoosingCategory` when there was none.
//!
//! Logging must go to a file while this UI owns the terminal.

use crate::game_state::{GameState, GuessOutcome};
use crate::session::{GameInterface, UserAction};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const SELECTED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

#[derive(Debug, Clone, PartialEq, Eq)]
enum TuiState {
    ChoosingCategory { selected: usize },
    Generating,
    Guessing,
    /// Won or lost - message stored in interface.message
    GameOver,
}

/// What the board panel shows; a copy of the last `GameState` reported.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct BoardView {
    hint: String,
    masked_word: String,
    missed: String,
    missed_count: usize,
    max_tries: usize,
}

impl BoardView {
    fn status_line(&self, state: &TuiState) -> String {
        match state {
            TuiState::GameOver => "Game Over".to_string(),
            _ => format!(
                "{} tries left",
                self.max_tries.saturating_sub(self.missed_count)
            ),
        }
    }
}

/// A game left for the category list. The session keeps playing it until a
/// new start succeeds.
type Suspended = (TuiState, BoardView);

/// Screen shown after a start fails.
fn resume_after_failed_start(suspended: Option<Suspended>) -> Suspended {
    suspended.unwrap_or((TuiState::ChoosingCategory { selected: 0 }, BoardView::default()))
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    state: &'a TuiState,
    categories: &'a [String],
    board: &'a BoardView,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    state: TuiState,
    categories: Vec<String>,
    board: BoardView,
    suspended: Option<Suspended>,
    message: String,
    error_message: String,
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
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            state: TuiState::ChoosingCategory { selected: 0 },
            categories: Vec::new(),
            board: BoardView::default(),
            suspended: None,
            message: String::new(),
            error_message: String::new(),
            status: "Choose a category".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            state: &self.state,
            categories: &self.categories,
            board: &self.board,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(8),    // Hint + board / category list
                Constraint::Length(5), // Messages
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        match ctx.state {
            TuiState::ChoosingCategory { selected } => {
                Self::render_categories(f, chunks[1], ctx.categories, *selected);
            }
            TuiState::Generating | TuiState::Guessing | TuiState::GameOver => {
                Self::render_game(f, chunks[1], ctx.board);
            }
        }
        Self::render_messages(f, chunks[2], ctx.message, ctx.error_message);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("LLM HANGMAN")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_categories(f: &mut Frame, area: Rect, categories: &[String], selected: usize) {
        let lines: Vec<Line> = categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                if i == selected {
                    Line::from(Span::styled(format!("> {}. {category}", i + 1), SELECTED_STYLE))
                } else {
                    Line::from(format!("  {}. {category}", i + 1))
                }
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Choose a category").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_game(f: &mut Frame, area: Rect, board: &BoardView) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(5)])
            .split(area);

        let hint = Paragraph::new(board.hint.trim().to_string())
            .block(Block::default().title("Hint").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, chunks[0]);

        let spaced: String = board
            .masked_word
            .chars()
            .map(|c| if c == ' ' { "  ".to_string() } else { format!("{c} ") })
            .collect();
        let lines = vec![
            Line::from(Span::styled(spaced.trim_end().to_string(), SUCCESS_STYLE)),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("Missed ({}/{}): ", board.missed_count, board.max_tries),
                    INFO_STYLE,
                ),
                Span::raw(board.missed.clone()),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Hangman").borders(Borders::ALL));
        f.render_widget(paragraph, chunks[1]);
    }

    fn render_messages(f: &mut Frame, area: Rect, message: &str, error_message: &str) {
        let mut lines = Vec::new();
        if !message.is_empty() {
            lines.push(Line::from(vec![Span::styled(message, MESSAGE_STYLE)]));
        }
        if !error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: &TuiState) {
        let text = match state {
            TuiState::ChoosingCategory { .. } => "UP/DOWN or 1-9: Select | ENTER: Start game | ESC: Quit",
            TuiState::Generating => "Asking the model...",
            TuiState::Guessing => "Type a letter to guess | CTRL-R: Reset | TAB: New game | ESC: Quit",
            TuiState::GameOver => "N/ENTER: New game | R: Reset | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let Event::Key(key) = event::read()? else {
            debug_log!("handle_input() - Ignoring non-key event");
            return Ok(None);
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        // Garbage from escape sequences when alt-tabbing
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
            return Ok(None);
        }

        debug_log!(
            "handle_input() - Key event: code={:?}, modifiers={:?}, state={:?}",
            key.code,
            key.modifiers,
            self.state
        );
        Ok(match self.state.clone() {
            TuiState::ChoosingCategory { selected } => self.handle_category_input(key, selected),
            TuiState::Guessing => self.handle_guess_input(key),
            TuiState::GameOver => self.handle_game_over_input(key),
            TuiState::Generating => None,
        })
    }

    fn handle_category_input(&mut self, key: KeyEvent, selected: usize) -> Option<UserAction> {
        self.error_message.clear();
        let count = self.categories.len();
        match key.code {
            KeyCode::Esc => return Some(UserAction::Exit),
            KeyCode::Up if count > 0 => {
                self.state = TuiState::ChoosingCategory {
                    selected: (selected + count - 1) % count,
                };
            }
            KeyCode::Down if count > 0 => {
                self.state = TuiState::ChoosingCategory {
                    selected: (selected + 1) % count,
                };
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let index = (c as usize).wrapping_sub('1' as usize);
                if index < count {
                    self.state = TuiState::ChoosingCategory { selected: index };
                }
            }
            KeyCode::Enter => {
                if let Some(category) = self.categories.get(selected) {
                    info_log!("handle_category_input() - Starting '{}'", category);
                    return Some(UserAction::Start(category.clone()));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        match key.code {
            KeyCode::Esc => Some(UserAction::Exit),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UserAction::Reset)
            }
            KeyCode::Tab => {
                self.transition_to_choosing();
                None
            }
            KeyCode::Char(_) if Self::has_modifier_keys(&key) => None,
            KeyCode::Char(c) => {
                let letter: String = c.to_lowercase().collect();
                info_log!("handle_guess_input() - Guess '{}'", letter);
                Some(UserAction::Guess(letter))
            }
            _ => None,
        }
    }

    fn handle_game_over_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Esc => Some(UserAction::Exit),
            KeyCode::Char('r' | 'R') => Some(UserAction::Reset),
            KeyCode::Char('n' | 'N') | KeyCode::Enter => {
                self.transition_to_choosing();
                None
            }
            _ => None,
        }
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn transition_to_choosing(&mut self) {
        let selected = match self.state {
            TuiState::ChoosingCategory { selected } => selected,
            TuiState::Guessing | TuiState::GameOver => {
                self.suspended = Some((self.state.clone(), self.board.clone()));
                0
            }
            TuiState::Generating => 0,
        };
        self.state = TuiState::ChoosingCategory { selected };
        self.message.clear();
        self.status = "Choose a category".to_string();
    }
}

impl GameInterface for TuiInterface {
    fn choose_action(&mut self, categories: &[String]) -> Option<UserAction> {
        if self.categories != categories {
            self.categories = categories.to_vec();
        }
        loop {
            if self.draw().is_err() {
                info_log!("choose_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            match self.handle_input() {
                Ok(Some(action)) => {
                    info_log!("choose_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(_e) => {
                    info_log!("choose_action() - Error handling input, returning Exit");
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_generating(&mut self, category: &str) {
        self.state = TuiState::Generating;
        self.board = BoardView::default();
        self.message = format!("Asking the model for a {category}...");
        self.status = "Generating word and hint".to_string();
        self.draw_or_log();
    }

    fn display_board(&mut self, state: &GameState, max_tries: usize) {
        self.board = BoardView {
            hint: state.hint.clone(),
            masked_word: state.masked_word.clone(),
            missed: state.missed_display(),
            missed_count: state.missed_letters.len(),
            max_tries,
        };
        if state.is_active() {
            if !matches!(self.state, TuiState::GameOver) {
                self.state = TuiState::Guessing;
            }
            self.status = format!("{} tries left", state.tries_left(max_tries));
        } else {
            self.transition_to_choosing();
            self.message = "Game reset.".to_string();
        }
        // The session now holds this board, so nothing is left to resume.
        self.suspended = None;
        self.draw_or_log();
    }

    fn display_outcome(&mut self, letter: &str, outcome: GuessOutcome) {
        self.message = match outcome {
            GuessOutcome::Correct => format!("'{letter}' is in the word."),
            GuessOutcome::Missed => format!("'{letter}' is not in the word."),
            GuessOutcome::Repeated => format!("You already guessed '{letter}'."),
            GuessOutcome::Ignored => "Guess ignored.".to_string(),
        };
    }

    fn display_won(&mut self, word: &str) {
        self.state = TuiState::GameOver;
        self.message = format!("You won! The word was '{word}'.");
        self.status = "Game Over - You won!".to_string();
        self.draw_or_log();
    }

    fn display_lost(&mut self, word: &str) {
        self.state = TuiState::GameOver;
        self.message = format!("You lost, the correct word was '{word}'");
        self.status = "Game Over - You lost".to_string();
        self.draw_or_log();
    }

    fn display_error(&mut self, message: &str) {
        if matches!(self.state, TuiState::Generating) {
            let (state, board) = resume_after_failed_start(self.suspended.take());
            self.status = match state {
                TuiState::ChoosingCategory { .. } => "Choose a category".to_string(),
                _ => board.status_line(&state),
            };
            self.state = state;
            self.board = board;
            self.message.clear();
        }
        self.error_message = message.to_string();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
