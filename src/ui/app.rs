//! Main TUI application state and logic

use crate::interpreter::config::RunConfig;
use crate::interpreter::engine::RunStats;
use crate::interpreter::errors::{ErrorClass, ExecutionError};
use crate::output::{Decoding, OutputBuffer};
use crate::parser::ast::{Op, SourceLocation};
use crate::parser::program::diagnose;
use crate::ui::worker::{RunHandle, WorkerEvent};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Output kept for display; older lines are dropped past this many bytes
const OUTPUT_RETAIN_BYTES: usize = 1024 * 1024;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Input,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> input)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Input,
            FocusedPane::Input => FocusedPane::Source,
        }
    }
}

/// Lifecycle of the most recent run
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Running { started: Instant },
    Finished(RunStats),
    Failed(ExecutionError),
}

/// The main application state
pub struct App {
    /// The program being run
    pub source_code: String,

    /// Configuration applied to every run
    pub config: RunConfig,

    /// Bytes emitted by the current or last run
    pub output: OutputBuffer,

    /// Text fed to `,`, as UTF-8 bytes
    pub input_text: String,

    /// How output bytes are shown
    pub decoding: Decoding,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub output_scroll: usize,

    /// Whether keystrokes go to the input line
    pub editing_input: bool,

    /// Run in progress, if any
    pub run_handle: Option<RunHandle>,

    pub state: RunState,

    /// Status message to display
    pub status_message: String,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new app for the given source code
    pub fn new(source_code: String, config: RunConfig) -> Self {
        App {
            source_code,
            config,
            output: OutputBuffer::with_limit(OUTPUT_RETAIN_BYTES),
            input_text: String::new(),
            decoding: Decoding::default(),
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            output_scroll: 0,
            editing_input: false,
            run_handle: None,
            state: RunState::Idle,
            status_message: String::from("Ready! Press r to run."),
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.poll_worker();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Poll with a timeout so worker output keeps flowing while idle
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        // Dropping the handle cancels and joins any run still going
        self.run_handle = None;
        Ok(())
    }

    /// Location to mark in the source pane
    pub fn error_location(&self) -> Option<SourceLocation> {
        match &self.state {
            RunState::Failed(err) => err.location(),
            _ => None,
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Source (left) | Output over Input (right)
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(pane_area);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(columns[1]);

        super::panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            self.error_location(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_terminal_pane(
            frame,
            right_rows[0],
            &self.output,
            self.decoding,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_input_pane(
            frame,
            right_rows[1],
            &self.input_text,
            self.focused_pane == FocusedPane::Input,
            self.editing_input,
        );

        super::panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            &self.state,
            self.editing_input,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.editing_input {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => {
                    self.editing_input = false;
                    self.status_message = format!("Input set ({} bytes)", self.input_text.len());
                }
                KeyCode::Backspace => {
                    self.input_text.pop();
                }
                KeyCode::Char(c) => self.input_text.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.start_run(),
            KeyCode::Esc => self.cancel_run(),
            KeyCode::Char('i') => {
                self.editing_input = true;
                self.focused_pane = FocusedPane::Input;
                self.status_message = "Editing input".to_string();
            }
            KeyCode::Char('u') => {
                self.decoding = self.decoding.toggle();
                self.status_message = format!("Showing output as {}", self.decoding.label());
            }
            KeyCode::Char('c') => {
                if self.run_handle.is_none() {
                    self.output.clear();
                    self.output_scroll = 0;
                    self.status_message = "Output cleared".to_string();
                }
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => self.source_scroll = self.source_scroll.saturating_sub(1),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
                FocusedPane::Input => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => self.source_scroll = self.source_scroll.saturating_add(1),
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_add(1),
                FocusedPane::Input => {}
            },
            _ => {}
        }
    }

    /// Start a run on a worker thread, replacing any run in progress.
    pub fn start_run(&mut self) {
        if has_no_instructions(&self.source_code) {
            self.status_message = "Nothing to run".to_string();
            return;
        }

        // Dropping the previous handle cancels it
        self.run_handle = None;
        self.output.clear();
        self.output_scroll = 0;

        self.run_handle = Some(RunHandle::spawn(
            self.source_code.clone(),
            self.input_text.clone().into_bytes(),
            self.config.clone(),
        ));
        self.state = RunState::Running {
            started: Instant::now(),
        };
        self.status_message = "Running...".to_string();
    }

    /// Request cancellation of the run in progress.
    pub fn cancel_run(&mut self) {
        if let Some(handle) = &self.run_handle {
            handle.cancel();
            self.status_message = "Stopping...".to_string();
        }
    }

    /// Apply a bounded batch of worker events; the rest wait for later ticks.
    pub fn poll_worker(&mut self) {
        let Some(handle) = &self.run_handle else {
            return;
        };

        let mut finished = None;
        for event in handle.drain() {
            match event {
                WorkerEvent::Output(chunk) => {
                    self.output.extend(&chunk);
                    // Auto-scroll output to bottom
                    self.output_scroll = usize::MAX;
                }
                WorkerEvent::Finished(result) => finished = Some(result),
            }
        }

        if let Some(result) = finished {
            self.run_handle = None;
            self.finish_run(result);
        }
    }

    fn finish_run(&mut self, result: Result<RunStats, ExecutionError>) {
        match result {
            Ok(stats) => {
                self.status_message = format!(
                    "Execution completed: {} bytes output, {} cells used",
                    self.output.total_len(),
                    stats.cells_touched
                );
                self.state = RunState::Finished(stats);
            }
            Err(err) => {
                self.status_message = match err.class() {
                    ErrorClass::Structural => {
                        let count = diagnose(&self.source_code).len();
                        format!("{} ({} bracket error(s))", err, count)
                    }
                    _ => err.to_string(),
                };
                if let Some(location) = err.location() {
                    self.source_scroll = location.line.saturating_sub(3);
                }
                self.state = RunState::Failed(err);
            }
        }
    }
}

/// True when `source` has no instructions at all
fn has_no_instructions(source: &str) -> bool {
    !source.chars().any(|c| Op::from_char(c).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn run_to_completion(app: &mut App) {
        for _ in 0..500 {
            app.poll_worker();
            if app.run_handle.is_none() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("run did not finish");
    }

    #[test]
    fn test_run_collects_output() {
        let mut app = App::new("++++++++[>++++++++<-]>+.".to_string(), RunConfig::default());
        app.handle_key_event(key(KeyCode::Char('r')));
        run_to_completion(&mut app);
        assert_eq!(app.output.bytes(), b"A");
        assert!(matches!(app.state, RunState::Finished(_)));
    }

    #[test]
    fn test_flooding_program_keeps_ticks_short() {
        let mut app = App::new("+[.]".to_string(), RunConfig::default());
        app.start_run();
        std::thread::sleep(Duration::from_millis(100));
        for _ in 0..10 {
            let started = Instant::now();
            app.poll_worker();
            assert!(started.elapsed() < Duration::from_millis(500));
        }
        assert!(app.output.bytes().len() <= 2 * OUTPUT_RETAIN_BYTES);
        assert!(app.output.total_len() > 0);
        app.handle_key_event(key(KeyCode::Esc));
        run_to_completion(&mut app);
        assert!(matches!(
            app.state,
            RunState::Failed(ExecutionError::Cancelled { .. })
        ));
    }

    #[test]
    fn test_comment_only_source_does_not_run() {
        let mut app = App::new("just words".to_string(), RunConfig::default());
        app.start_run();
        assert!(app.run_handle.is_none());
        assert_eq!(app.state, RunState::Idle);
    }

    #[test]
    fn test_bracket_error_marks_location() {
        let mut app = App::new("+\n+]".to_string(), RunConfig::default());
        app.start_run();
        run_to_completion(&mut app);
        assert_eq!(app.error_location(), Some(SourceLocation::new(2, 2)));
        assert!(app.output.is_empty());
    }

    #[test]
    fn test_input_editing_feeds_program() {
        let mut app = App::new(",.".to_string(), RunConfig::default());
        app.handle_key_event(key(KeyCode::Char('i')));
        app.handle_key_event(key(KeyCode::Char('z')));
        app.handle_key_event(key(KeyCode::Enter));
        assert!(!app.editing_input);
        assert_eq!(app.input_text, "z");

        app.handle_key_event(key(KeyCode::Char('r')));
        run_to_completion(&mut app);
        assert_eq!(app.output.bytes(), b"z");
    }

    #[test]
    fn test_escape_cancels_infinite_loop() {
        let config = RunConfig::default().with_max_steps(None);
        let mut app = App::new("+[]".to_string(), config);
        app.start_run();
        app.handle_key_event(key(KeyCode::Esc));
        run_to_completion(&mut app);
        assert!(matches!(
            app.state,
            RunState::Failed(ExecutionError::Cancelled { .. })
        ));
    }
}
