//! Dashboard entry point: terminal setup, the event loop, and the editor hand-off.

use std::io::{self, Stdout};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::error::DashError;
use crate::gateway::TaskEngine;
use crate::tui::{app::App, enums::Outcome};

type DashTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Load tasks and run the dashboard until the operator quits.
///
/// Tasks are loaded before the terminal is taken over, so a fatal load error
/// is reported on a normal screen.
pub fn run_tui<E: TaskEngine>(engine: E, filter: &str) -> Result<(), DashError> {
    let mut app = App::new(engine, filter)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut app, &mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

fn event_loop<E: TaskEngine>(app: &mut App<E>, terminal: &mut DashTerminal) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Outcome::Continue => {}
            Outcome::Quit => return Ok(()),
            Outcome::Edit => {
                suspend(terminal)?;
                app.edit_selected();
                resume(terminal)?;
            }
        }
    }
}

/// Give the terminal back to the shell so the engine's editor can use it.
fn suspend(terminal: &mut DashTerminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn resume(terminal: &mut DashTerminal) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()
}
