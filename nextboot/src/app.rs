//! The main application logic of the enhanced picker.
//!
//! This owns the terminal for the duration of the menu: raw mode and the
//! alternate screen are entered on the way in and always left on the way
//! out, even when the inner loop fails. The loop itself only moves the
//! selection and decides between "chosen" and "aborted"; everything that
//! touches the stores stays in `main`.

use std::io::{self, Stdout};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use nextboot_core::store::BootEntry;
use ratatui::{Terminal, backend::CrosstermBackend, widgets::ListState};
use thiserror::Error;

use crate::ui;

/// An `Error` that may result from running or initializing the [`App`].
#[derive(Error, Debug)]
pub enum AppError {
    /// There are no boot entries in the loaded catalog.
    #[error("No boot entries found")]
    NoEntries,
}

/// The current status of the [`App`].
#[derive(PartialEq, Eq)]
enum AppState {
    /// The app is currently running in its main loop.
    Running,

    /// The user picked the highlighted entry.
    Chosen,

    /// The user aborted the menu.
    Aborted,
}

/// The arrow-key picker.
pub struct App {
    /// The display names of the entries, in display order.
    pub items: Vec<String>,

    /// The internal selection state of the list.
    pub state: ListState,

    /// The display name of the currently active entry, if one resolved.
    pub current: Option<String>,

    /// The current state of the [`App`].
    outcome: AppState,
}

impl App {
    /// Creates a new [`App`] over a display-ordered entry list, starting
    /// with the currently active entry highlighted.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(entries: &[BootEntry], preselect: Option<usize>, current: Option<&str>) -> Self {
        let mut state = ListState::default();
        state.select(Some(preselect.unwrap_or(0)));

        Self {
            items: entries
                .iter()
                .map(|entry| entry.display_name.clone())
                .collect(),
            state,
            current: current.map(str::to_owned),
            outcome: AppState::Running,
        }
    }

    /// Provides the main loop for the [`App`].
    ///
    /// Returns the picked index into the display list, or [`None`] on
    /// abort.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the terminal could not be set up or a frame
    /// could not be drawn.
    pub fn run(&mut self) -> io::Result<Option<usize>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal);

        // restore the terminal no matter how the loop ended
        let _ = disable_raw_mode();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        res
    }

    /// Draws frames and handles keys until the user picks or aborts.
    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> io::Result<Option<usize>> {
        loop {
            terminal.draw(|frame| ui::render(frame, self))?;

            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }

            match self.outcome {
                AppState::Chosen => return Ok(self.state.selected()),
                AppState::Aborted => return Ok(None),
                AppState::Running => (),
            }
        }
    }

    /// Handle a key press.
    ///
    /// This includes the arrow keys for selection, the enter key for
    /// choosing, and the escape key for aborting.
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.state.select_previous(),
            KeyCode::Down => self.state.select_next(),
            KeyCode::Enter => self.outcome = AppState::Chosen,
            KeyCode::Esc => self.outcome = AppState::Aborted,
            KeyCode::Char(c) => self.handle_char(c, key.modifiers),
            _ => (),
        }
    }

    /// Handle a printable key.
    ///
    /// This includes w/s for alternate selection, q and Ctrl-C for
    /// aborting.
    fn handle_char(&mut self, key: char, modifiers: KeyModifiers) {
        match key.to_ascii_lowercase() {
            'c' if modifiers.contains(KeyModifiers::CONTROL) => {
                self.outcome = AppState::Aborted;
            }
            'w' => self.state.select_previous(),
            's' => self.state.select_next(),
            'q' => self.outcome = AppState::Aborted,
            _ => (),
        }
    }
}
