//! `ratatui` front-end: holds the terminal while the launcher runs, feeds key
//! events to [`AppState`], and repaints after every event.

use crate::executor::PreparedCommand;
use crate::input::{action_for_key, NORMAL_HINTS, OVERLAY_HINTS};
use crate::launcher::{AppState, Field, FieldBuffers, Mode, Outcome};
use crate::log_debug;
use crate::store::EntryStore;
use crate::terminal_restore::TerminalRestoreGuard;
use crate::utf8_safe::{display_width, fit_columns, tail_by_columns};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Clear, Paragraph,
    },
    Frame, Terminal,
};
use std::io;

/// Smallest terminal that gets the full layout.
pub const MIN_WIDTH: u16 = 50;
pub const MIN_HEIGHT: u16 = 7;

const ACTIVE_COLOR: Color = Color::Green;
const FOOTER_COLOR: Color = Color::LightBlue;
const DANGER_COLOR: Color = Color::Red;
const SELECTED_BG: Color = Color::Rgb(0x42, 0x42, 0x42);

/// How the interactive session ended.
#[derive(Debug)]
pub enum SessionEnd {
    Quit,
    /// The terminal has already been released; run this next.
    Execute(PreparedCommand),
}

/// Acquire the terminal, run the event loop, and release the terminal again.
pub fn run_app(state: &mut AppState, store: &mut EntryStore) -> Result<SessionEnd> {
    let mut stdout = io::stdout();
    let guard = TerminalRestoreGuard::acquire(&mut stdout)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = app_loop(&mut terminal, state, store);

    drop(terminal);
    guard.release();
    result
}

/// One event at a time: draw, block on the next event, handle it to completion.
fn app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    store: &mut EntryStore,
) -> Result<SessionEnd> {
    loop {
        terminal.draw(|frame| draw(frame, state, store))?;
        if let Some(end) = process_event(state, store, event::read()?) {
            return Ok(end);
        }
    }
}

fn process_event(state: &mut AppState, store: &mut EntryStore, event: Event) -> Option<SessionEnd> {
    // Resizes need nothing beyond the redraw at the top of the loop.
    let Event::Key(key) = event else {
        return None;
    };
    let action = action_for_key(key)?;
    match state.handle(action, store) {
        Outcome::Continue => None,
        Outcome::Quit => {
            log_debug("quit requested");
            Some(SessionEnd::Quit)
        }
        Outcome::Execute(line) => match PreparedCommand::parse(&line) {
            Ok(command) => Some(SessionEnd::Execute(command)),
            Err(err) => {
                log_debug(&format!("execute rejected: {err}"));
                state.set_status(format!("cannot run command: {err}"));
                None
            }
        },
    }
}

/// Paint the whole screen for the current state.
pub fn draw(frame: &mut Frame<'_>, state: &AppState, store: &EntryStore) {
    let area = frame.size();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        draw_not_enough_space(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_search(frame, chunks[0], state);
    draw_list(frame, chunks[1], state, store);
    draw_footer(frame, chunks[2], state);

    match state.mode() {
        Mode::Add(fields) | Mode::Edit { fields, .. } => draw_input_dialog(frame, area, fields),
        Mode::Delete { name, .. } => draw_delete_dialog(frame, area, name),
        Mode::Normal => {}
    }
}

fn active_style() -> Style {
    Style::default().fg(ACTIVE_COLOR)
}

fn draw_not_enough_space(frame: &mut Frame<'_>, area: Rect) {
    let placeholder = Paragraph::new("not enough space").style(active_style());
    frame.render_widget(placeholder, area);
}

fn draw_search(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let style = if state.mode().is_overlay() {
        Style::default()
    } else {
        active_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(Span::styled("Filter", style))
        .title(
            Title::from(Span::styled("<Alt-Back to clear>", style))
                .position(Position::Bottom)
                .alignment(Alignment::Right),
        );
    let inner = block.inner(area);

    // Keep one column free for the caret once the text outgrows the box.
    let text = state.search_text();
    let visible = tail_by_columns(text, usize::from(inner.width.saturating_sub(1)));
    let hidden_cols = display_width(text) - display_width(visible);
    frame.render_widget(Paragraph::new(visible).block(block), area);

    if !state.mode().is_overlay() {
        let caret = state.cursor_position().saturating_sub(hidden_cols);
        frame.set_cursor(inner.x.saturating_add(caret as u16), inner.y);
    }
}

fn draw_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, store: &EntryStore) {
    let total = state.filtered().len();
    let shown = if total == 0 { 0 } else { state.list_index() + 1 };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Name")
        .title(Title::from(format!(" {shown} of {total} ")).alignment(Alignment::Right));
    let inner = block.inner(area);

    // The column separator sits a third of the way across the box.
    let name_cols = usize::from((area.width / 3).saturating_sub(1));
    let command_cols = usize::from(inner.width).saturating_sub(name_cols + 1);
    let rows = usize::from(inner.height);

    let mut lines = Vec::with_capacity(rows);
    for idx in state.viewport(rows) {
        let Some(stored) = state.filtered().get(idx).and_then(|id| store.get(*id)) else {
            continue;
        };
        let style = if idx == state.list_index() {
            Style::default().bg(SELECTED_BG)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(fit_columns(stored.name(), name_cols), style),
            Span::styled("│", style),
            Span::styled(fit_columns(stored.command(), command_cols), style),
        ]));
    }
    while lines.len() < rows {
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(name_cols)),
            Span::raw("│"),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);

    let header = "Command";
    let header_x = area.x + area.width / 3 + 2;
    let header_width = header.len() as u16;
    if header_x + header_width < area.right() {
        frame.render_widget(
            Paragraph::new(header),
            Rect::new(header_x, area.y, header_width, 1),
        );
    }
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let version = format!("quick-command v{}", env!("CARGO_PKG_VERSION"));
    let version_width = display_width(&version) as u16;

    let (text, style) = match state.status() {
        Some(message) => (message, Style::default().fg(DANGER_COLOR)),
        None if state.mode().is_overlay() => (OVERLAY_HINTS, Style::default().fg(FOOTER_COLOR)),
        None => (NORMAL_HINTS, Style::default().fg(FOOTER_COLOR)),
    };
    let hint_area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(version_width + 2),
        1,
    );
    frame.render_widget(Paragraph::new(Span::styled(text, style)), hint_area);
    frame.render_widget(
        Paragraph::new(version)
            .style(active_style())
            .alignment(Alignment::Right),
        area,
    );
}

/// Geometry shared by the dialogs: a box spanning the middle half of the screen.
fn dialog_rect(area: Rect, row_offset: u16) -> Rect {
    let x1 = area.width / 4;
    let x2 = area.width - x1;
    let y = area.height / 2 - 1;
    Rect::new(
        area.x + x1 - 1,
        area.y + y - 1 + row_offset,
        x2 - x1 + 2,
        3,
    )
}

fn draw_input_dialog(frame: &mut Frame<'_>, area: Rect, fields: &FieldBuffers) {
    let boxes = [
        (Field::Name, dialog_rect(area, 0), "Name", fields.name.as_str()),
        (Field::Command, dialog_rect(area, 3), "Command", fields.command.as_str()),
    ];
    for (field, rect, title, text) in boxes {
        let focused = fields.focus == field;
        let style = if focused { active_style() } else { Style::default() };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(Span::styled(title, style));
        if field == Field::Command {
            block = block.title(
                Title::from(Span::styled("press <tab> to switch", active_style()))
                    .position(Position::Bottom)
                    .alignment(Alignment::Right),
            );
        }
        let inner = block.inner(rect);
        let visible = tail_by_columns(text, usize::from(inner.width.saturating_sub(1)));

        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(visible).block(block), rect);
        if focused {
            let caret = display_width(visible) as u16;
            frame.set_cursor(inner.x + caret, inner.y);
        }
    }
}

fn draw_delete_dialog(frame: &mut Frame<'_>, area: Rect, name: &str) {
    let rect = dialog_rect(area, 0);
    let style = Style::default().fg(DANGER_COLOR);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(Span::styled("Confirm delete", style));
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(name).block(block), rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;
    use crate::store::Entry;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn store_with(entries: &[(&str, &str)]) -> (TempDir, EntryStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = EntryStore::load(dir.path().join("config.json")).expect("load store");
        for (name, command) in entries {
            store.add(Entry::new(*name, *command)).expect("add entry");
        }
        (dir, store)
    }

    fn render(state: &AppState, store: &EntryStore, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal
            .draw(|frame| draw(frame, state, store))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn small_terminal_gets_placeholder_only() {
        let (_dir, store) = store_with(&[("Terminal", "konsole")]);
        let state = AppState::new(&store);
        let screen = render(&state, &store, 40, 20);
        assert!(screen.contains("not enough space"));
        assert!(!screen.contains("Filter"));

        let screen = render(&state, &store, 80, 6);
        assert!(screen.contains("not enough space"));
    }

    #[test]
    fn normal_mode_shows_filter_list_and_footer() {
        let (_dir, store) = store_with(&[("Terminal", "konsole"), ("Files", "mc")]);
        let state = AppState::new(&store);
        let screen = render(&state, &store, 100, 12);
        assert!(screen.contains("Filter"));
        assert!(screen.contains("<Alt-Back to clear>"));
        assert!(screen.contains("Command"));
        assert!(screen.contains("Terminal"));
        assert!(screen.contains("konsole"));
        assert!(screen.contains(" 1 of 2 "));
        assert!(screen.contains("<Ctrl-q>: quit"));
        assert!(screen.contains(&format!("quick-command v{}", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn empty_list_counts_zero() {
        let (_dir, store) = store_with(&[]);
        let state = AppState::new(&store);
        let screen = render(&state, &store, 80, 10);
        assert!(screen.contains(" 0 of 0 "));
    }

    #[test]
    fn selection_scrolls_into_view() {
        let entries: Vec<(String, String)> = (0..30)
            .map(|i| (format!("entry {i:02}"), format!("cmd {i}")))
            .collect();
        let refs: Vec<(&str, &str)> = entries
            .iter()
            .map(|(name, command)| (name.as_str(), command.as_str()))
            .collect();
        let (_dir, mut store) = store_with(&refs);
        let mut state = AppState::new(&store);
        for _ in 0..10 {
            state.handle(Action::Down, &mut store);
        }
        // 12 rows leave 6 list rows: entries 05..=10 are visible.
        let screen = render(&state, &store, 80, 12);
        assert!(screen.contains("entry 10"));
        assert!(screen.contains("entry 05"));
        assert!(!screen.contains("entry 04"));
        assert!(!screen.contains("entry 11"));
        assert!(screen.contains(" 11 of 30 "));
    }

    #[test]
    fn add_dialog_shows_buffers_and_overlay_hints() {
        let (_dir, mut store) = store_with(&[]);
        let mut state = AppState::new(&store);
        state.handle(Action::New, &mut store);
        state.handle(Action::Insert('X'), &mut store);
        let screen = render(&state, &store, 80, 16);
        assert!(screen.contains("press <tab> to switch"));
        assert!(screen.contains("X"));
        assert!(screen.contains(OVERLAY_HINTS));
    }

    #[test]
    fn delete_dialog_names_its_target() {
        let (_dir, mut store) = store_with(&[("Neofetch", "neofetch")]);
        let mut state = AppState::new(&store);
        state.handle(Action::Delete, &mut store);
        let screen = render(&state, &store, 80, 16);
        assert!(screen.contains("Confirm delete"));
        assert!(screen.contains("Neofetch"));
    }

    #[test]
    fn unparsable_command_becomes_status_banner() {
        let (_dir, mut store) = store_with(&[("broken", "echo \"oops")]);
        let mut state = AppState::new(&store);
        let end = process_event(
            &mut state,
            &mut store,
            key(KeyCode::Enter, KeyModifiers::NONE),
        );
        assert!(end.is_none());
        let status = state.status().expect("status banner");
        assert!(status.contains("cannot run command"));

        let screen = render(&state, &store, 100, 12);
        assert!(screen.contains("cannot run command"));
    }

    #[test]
    fn enter_on_valid_command_ends_session_with_it() {
        let (_dir, mut store) = store_with(&[("Terminal", "konsole --new-tab")]);
        let mut state = AppState::new(&store);
        let end = process_event(
            &mut state,
            &mut store,
            key(KeyCode::Enter, KeyModifiers::NONE),
        );
        match end {
            Some(SessionEnd::Execute(command)) => {
                assert_eq!(command.program(), "konsole");
                assert_eq!(command.args(), ["--new-tab"]);
            }
            other => panic!("unexpected session end: {other:?}"),
        }
    }

    #[test]
    fn quit_and_resize_events() {
        let (_dir, mut store) = store_with(&[]);
        let mut state = AppState::new(&store);
        assert!(process_event(&mut state, &mut store, Event::Resize(120, 40)).is_none());
        assert!(matches!(
            process_event(
                &mut state,
                &mut store,
                key(KeyCode::Char('q'), KeyModifiers::CONTROL)
            ),
            Some(SessionEnd::Quit)
        ));
    }
}
