//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct, the single owner of the mode, focus and
//! visible task list. Key events arrive one at a time from the event loop in
//! `tui::run`; every engine call they trigger completes before the next key is read.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::command_log::CommandLog;
use crate::error::DashError;
use crate::gateway::TaskEngine;
use crate::tui::{
    colors::DARK_RED,
    enums::{ConfirmChoice, Focus, Mode, Outcome},
    input::{InputField, MAX_INPUT_LEN},
    list::TaskList,
    rows::{NUMBER_OF_COLUMNS, TASK_HEADERS},
    utils::{centered_fixed, centered_rect},
};

/// Height of the command log pane, borders included.
const LOG_PANE_HEIGHT: u16 = 7;
const DETAIL_PAGE: u16 = 10;

/// Dashboard state: one task list, one mode, one focused pane.
pub struct App<E: TaskEngine> {
    mode: Mode,
    focus: Focus,
    list: TaskList,
    engine: E,
    command_log: CommandLog,
    detail: String,
    detail_scroll: u16,
    input: InputField,
    table_state: TableState,
}

impl<E: TaskEngine> App<E> {
    /// Load the tasks matching `filter` and show the first one's detail.
    ///
    /// Fails only when the initial export cannot be obtained or parsed.
    pub fn new(mut engine: E, filter: &str) -> Result<Self, DashError> {
        let mut command_log = CommandLog::new();
        let list = TaskList::load(&mut engine, &mut command_log, filter, Utc::now())?;

        let mut app = App {
            mode: Mode::Normal,
            focus: Focus::Tasks,
            list,
            engine,
            command_log,
            detail: String::new(),
            detail_scroll: 0,
            input: InputField::new(MAX_INPUT_LEN),
            table_state: TableState::default(),
        };
        app.refresh_detail();
        Ok(app)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn command_log(&self) -> &CommandLog {
        &self.command_log
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Re-fetch the detail pane for the current selection; no selection clears it.
    fn refresh_detail(&mut self) {
        self.detail = self.list.detail(&mut self.engine, &mut self.command_log);
        self.detail_scroll = 0;
    }

    /// Run the engine editor for the selected task. The caller owns the terminal hand-off.
    pub fn edit_selected(&mut self) {
        self.list.edit_selected(&mut self.engine, &mut self.command_log);
    }

    /// Dispatch one key press according to the current mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Outcome::Quit;
        }

        match self.mode {
            Mode::Normal => self.handle_normal_input(key.code),
            Mode::CreateEntry => self.handle_entry_input(key.code),
            Mode::ConfirmDelete { .. } => self.handle_confirm_input(key.code),
        }
    }

    fn handle_normal_input(&mut self, key: KeyCode) -> Outcome {
        match key {
            KeyCode::Char('1') => {
                self.focus = Focus::Tasks;
                return Outcome::Continue;
            }
            KeyCode::Char('2') => {
                self.focus = Focus::Detail;
                return Outcome::Continue;
            }
            _ => {}
        }

        match self.focus {
            Focus::Tasks => self.handle_task_list_input(key),
            Focus::Detail => self.handle_detail_input(key),
        }
    }

    fn handle_task_list_input(&mut self, key: KeyCode) -> Outcome {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Outcome::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.select_next();
                self.refresh_detail();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_previous();
                self.refresh_detail();
            }
            KeyCode::Char('a') => {
                self.input.clear();
                self.mode = Mode::CreateEntry;
            }
            KeyCode::Char('e') => {
                if self.list.selected_row().is_some() {
                    return Outcome::Edit;
                }
            }
            KeyCode::Char('d') => {
                if self.list.selected_row().is_some() {
                    self.list
                        .complete_selected(&mut self.engine, &mut self.command_log);
                    self.refresh_detail();
                }
            }
            KeyCode::Char('x') => {
                if let Some(row) = self.list.selected_row() {
                    self.mode = Mode::ConfirmDelete {
                        id: row.id,
                        description: row.description().to_string(),
                        choice: ConfirmChoice::Cancel,
                    };
                }
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_detail_input(&mut self, key: KeyCode) -> Outcome {
        match key {
            KeyCode::Char('q') => return Outcome::Quit,
            KeyCode::Esc => self.focus = Focus::Tasks,
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(DETAIL_PAGE);
            }
            KeyCode::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(DETAIL_PAGE);
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_entry_input(&mut self, key: KeyCode) -> Outcome {
        match key {
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Enter => {
                let text = self.input.take();
                let had_selection = self.list.selected().is_some();
                self.list
                    .create(&mut self.engine, &mut self.command_log, &text, Utc::now());
                self.mode = Mode::Normal;
                if !had_selection && self.list.selected().is_some() {
                    self.refresh_detail();
                }
            }
            KeyCode::Char(c) => self.input.handle_char(c),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_cursor_home(),
            KeyCode::End => self.input.move_cursor_end(),
            _ => {}
        }
        Outcome::Continue
    }

    fn handle_confirm_input(&mut self, key: KeyCode) -> Outcome {
        let Mode::ConfirmDelete { id, choice, .. } = &mut self.mode else {
            return Outcome::Continue;
        };
        let id = *id;

        let confirmed = match key {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                *choice = choice.toggle();
                return Outcome::Continue;
            }
            KeyCode::Enter => *choice == ConfirmChoice::Delete,
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return Outcome::Continue,
        };

        self.mode = Mode::Normal;
        if confirmed {
            self.list.delete(&mut self.engine, &mut self.command_log, id);
            self.refresh_detail();
        }
        Outcome::Continue
    }

    fn pane_block(&self, title: &str, focused: bool) -> Block<'static> {
        let border = if focused && self.mode == Mode::Normal {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title.to_string())
    }

    /// Render the task table: header and separator on top, one row per visible task.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let separator = self.list.separator();

        let mut widths = [0u16; NUMBER_OF_COLUMNS];
        for col in 0..NUMBER_OF_COLUMNS {
            let mut width = TASK_HEADERS[col].chars().count().max(separator[col].chars().count());
            for row in self.list.rows() {
                width = width.max(row.text(col).chars().count());
            }
            widths[col] = u16::try_from(width).unwrap_or(u16::MAX);
        }

        let header = Row::new((0..NUMBER_OF_COLUMNS).map(|col| {
            Cell::from(Text::from(vec![
                Line::from(TASK_HEADERS[col]),
                Line::from(separator[col].clone()),
            ]))
        }))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(2);

        let rows: Vec<Row> = self
            .list
            .rows()
            .iter()
            .map(|row| {
                let cells = (0..NUMBER_OF_COLUMNS).map(|col| Cell::from(row.text(col).to_string()));
                let style = match row.color {
                    Some(color) => Style::default().fg(color),
                    None => Style::default(),
                };
                Row::new(cells).style(style)
            })
            .collect();

        let table = Table::new(rows, widths.map(Constraint::Length))
            .header(header)
            .block(self.pane_block("Tasks", self.focus == Focus::Tasks))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        self.table_state.select(self.list.selected());
        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_command_log(&self, f: &mut Frame, area: Rect) {
        let visible = usize::from(area.height.saturating_sub(2));
        let lines: Vec<Line> = self
            .command_log
            .tail(visible)
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        let log = Paragraph::new(lines).block(self.pane_block("Command Log", false));
        f.render_widget(log, area);
    }

    fn render_detail(&self, f: &mut Frame, area: Rect) {
        let detail = Paragraph::new(self.detail.as_str())
            .block(self.pane_block("Description", self.focus == Focus::Detail))
            .scroll((self.detail_scroll, 0));
        f.render_widget(detail, area);
    }

    fn render_new_task(&self, f: &mut Frame, area: Rect) {
        let width = u16::try_from(MAX_INPUT_LEN + 2).unwrap_or(u16::MAX);
        let area = centered_fixed(width, 3, area);
        f.render_widget(Clear, area);

        let inner_width = usize::from(area.width.saturating_sub(2));
        let skip = (self.input.cursor + 1).saturating_sub(inner_width);
        let shown: String = self.input.value.chars().skip(skip).collect();
        let input = Paragraph::new(shown).block(
            Block::default()
                .borders(Borders::ALL)
                .title("New Task")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(input, area);

        let offset = u16::try_from(self.input.cursor.saturating_sub(skip)).unwrap_or(0);
        f.set_cursor_position((area.x + 1 + offset, area.y + 1));
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let Mode::ConfirmDelete {
            id,
            description,
            choice,
        } = &self.mode
        else {
            return;
        };

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let button = |label: &'static str, active: bool| {
            let style = if active {
                Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Span::styled(format!("[ {label} ]"), style)
        };

        let text = vec![
            Line::from(""),
            Line::from(format!("Delete task {id} '{description}'?")),
            Line::from(""),
            Line::from(vec![
                button("Cancel", *choice == ConfirmChoice::Cancel),
                Span::raw("   "),
                button("Delete", *choice == ConfirmChoice::Delete),
            ]),
            Line::from(""),
            Line::from("←/→ choose, Enter confirm, Esc cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title("Confirm Delete")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(DARK_RED)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let hint = match self.mode {
            Mode::Normal => "a add | e edit | d done | x delete | 1 tasks | 2 detail | q quit",
            Mode::CreateEntry => "Enter add | Esc cancel",
            Mode::ConfirmDelete { .. } => "Enter confirm | Esc cancel",
        };
        let status = Paragraph::new(format!("Tasks: {} | {hint}", self.list.len()))
            .style(Style::default().bg(Color::Blue).fg(Color::White));
        f.render_widget(status, area);
    }

    /// Draw the whole dashboard plus whichever overlay the mode calls for.
    pub fn render(&mut self, f: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer[0]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(LOG_PANE_HEIGHT)])
            .split(columns[0]);

        self.render_task_list(f, left[0]);
        self.render_command_log(f, left[1]);
        self.render_detail(f, columns[1]);
        self.render_status_bar(f, outer[1]);

        match self.mode {
            Mode::Normal => {}
            Mode::CreateEntry => self.render_new_task(f, outer[0]),
            Mode::ConfirmDelete { .. } => self.render_confirm(f, outer[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::tui::list::tests::{export_json, ScriptedEngine};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App<ScriptedEngine>, code: KeyCode) -> Outcome {
        app.handle_key(key(code))
    }

    fn type_text(app: &mut App<ScriptedEngine>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// App over three tasks; the startup detail fetch for task 1 is already consumed.
    fn app_with_tasks() -> App<ScriptedEngine> {
        let engine = ScriptedEngine::default()
            .reply(&export_json(&[(1, "alpha", 9.0), (2, "beta", 5.0), (3, "gamma", 1.0)]))
            .reply("detail of 1");
        App::new(engine, "+PENDING").expect("startup")
    }

    fn row_ids(app: &App<ScriptedEngine>) -> Vec<u64> {
        app.list().rows().iter().map(|r| r.id).collect()
    }

    #[test]
    fn startup_loads_rows_and_fetches_first_detail() {
        let app = app_with_tasks();
        assert_eq!(app.mode(), &Mode::Normal);
        assert_eq!(app.focus(), Focus::Tasks);
        assert_eq!(row_ids(&app), vec![1, 2, 3]);
        assert_eq!(app.detail(), "detail of 1");
        assert_eq!(app.engine.calls, vec![vec!["+PENDING", "export"], vec!["1"]]);
    }

    #[test]
    fn startup_with_malformed_export_is_fatal() {
        let engine = ScriptedEngine::default().reply("{ not an array");
        assert!(matches!(
            App::new(engine, "+PENDING"),
            Err(DashError::Export(_))
        ));
    }

    #[test]
    fn moving_selection_fetches_detail() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default().reply("detail of 2");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.engine.calls, vec![vec!["2"]]);
        assert_eq!(app.detail(), "detail of 2");
    }

    #[test]
    fn create_entry_accepts_text_and_appends_row() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default()
            .reply("Created task 4.\n")
            .reply(&export_json(&[(4, "buy milk", 0.0)]));

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode(), &Mode::CreateEntry);
        type_text(&mut app, "'buy milk' +home");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode(), &Mode::Normal);
        assert_eq!(
            app.engine.calls,
            vec![vec!["add", "'buy milk'", "+home"], vec!["4", "export"]]
        );
        assert_eq!(row_ids(&app), vec![1, 2, 3, 4]);
    }

    #[test]
    fn create_entry_cancel_has_no_side_effect() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default();

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "dx");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.mode(), &Mode::Normal);
        assert!(app.engine.calls.is_empty());
        assert_eq!(row_ids(&app), vec![1, 2, 3]);
    }

    #[test]
    fn shortcut_letters_are_text_inside_entry() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default();
        press(&mut app, KeyCode::Char('a'));
        for c in ['d', 'x', 'e', 'q', '2'] {
            assert_eq!(press(&mut app, KeyCode::Char(c)), Outcome::Continue);
        }
        assert_eq!(app.input.value, "dxeq2");
        assert_eq!(app.focus(), Focus::Tasks);
        assert!(app.engine.calls.is_empty());
    }

    #[test]
    fn complete_removes_selected_row() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default()
            .reply("Completed task 1 'alpha'.")
            .reply("detail of 2");

        press(&mut app, KeyCode::Char('d'));

        assert_eq!(app.engine.calls, vec![vec!["1", "done"], vec!["2"]]);
        assert_eq!(row_ids(&app), vec![2, 3]);
        assert_eq!(app.command_log().lines(), &["Completed task 1 'alpha'."]);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default();
        press(&mut app, KeyCode::Down);
        app.engine = ScriptedEngine::default();

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(
            app.mode(),
            &Mode::ConfirmDelete {
                id: 2,
                description: "beta".to_string(),
                choice: ConfirmChoice::Cancel,
            }
        );
        assert!(app.engine.calls.is_empty());

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode(), &Mode::Normal);
        assert_eq!(
            app.engine.calls[0],
            vec!["rc.confirmation=off", "2", "delete"]
        );
        assert_eq!(row_ids(&app), vec![1, 3]);
    }

    #[test]
    fn cancelling_delete_never_invokes_engine() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default();

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode(), &Mode::Normal);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode(), &Mode::Normal);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('n'));

        assert!(app.engine.calls.is_empty());
        assert_eq!(row_ids(&app), vec![1, 2, 3]);
    }

    #[test]
    fn edit_is_handed_to_event_loop_and_stays_normal() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default();

        assert_eq!(press(&mut app, KeyCode::Char('e')), Outcome::Edit);
        assert_eq!(app.mode(), &Mode::Normal);
        app.edit_selected();
        assert_eq!(app.engine.interactive_calls, vec![vec!["1", "edit"]]);
        assert_eq!(row_ids(&app), vec![1, 2, 3]);
    }

    #[test]
    fn focus_shortcuts_switch_panes_without_changing_mode() {
        let mut app = app_with_tasks();
        app.engine = ScriptedEngine::default();

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.focus(), Focus::Detail);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.detail_scroll, 1);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(row_ids(&app), vec![1, 2, 3]);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.focus(), Focus::Tasks);
        assert_eq!(app.mode(), &Mode::Normal);
        assert!(app.engine.calls.is_empty());
    }

    #[test]
    fn quit_keys() {
        let mut app = app_with_tasks();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Outcome::Quit);
        press(&mut app, KeyCode::Char('a'));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), Outcome::Quit);
    }

    #[test]
    fn shortcuts_on_empty_list_do_nothing() {
        let engine = ScriptedEngine::default().reply("[]");
        let mut app = App::new(engine, "+PENDING").expect("startup");
        app.engine = ScriptedEngine::default();

        assert_eq!(press(&mut app, KeyCode::Char('e')), Outcome::Continue);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode(), &Mode::Normal);
        assert!(app.engine.calls.is_empty());
        assert_eq!(app.detail(), "");
    }

    fn screen(app: &mut App<ScriptedEngine>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).expect("test terminal");
        terminal.draw(|f| app.render(f)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_panes_and_overlays() {
        let mut app = app_with_tasks();
        let text = screen(&mut app);
        assert!(text.contains("Tasks"));
        assert!(text.contains("Command Log"));
        assert!(text.contains("Description"));
        assert!(text.contains("alpha"));
        assert!(text.contains("detail of 1"));

        press(&mut app, KeyCode::Char('a'));
        assert!(screen(&mut app).contains("New Task"));
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('x'));
        let text = screen(&mut app);
        assert!(text.contains("Delete task 1 'alpha'?"));
        assert!(text.contains("[ Cancel ]"));
    }
}
