use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use gridkit_core::Point;
use ratatui::prelude::*;
use std::io;

use super::app::App;
use super::ui;

/// Grid-relative view point under the mouse, or `None` outside the cells.
///
/// Drags keep reporting points past the body so a gesture can extend to
/// cells scrolled out of view; those points may be negative.
pub(crate) fn view_point(terminal_area: Rect, column: u16, row: u16, clamp: bool) -> Option<Point> {
    let [_title, grid_area, _status] = ui::split_main_chunks(terminal_area);
    let body = ui::grid_body(grid_area);
    let inside = column >= body.x
        && column < body.x.saturating_add(body.width)
        && row >= body.y
        && row < body.y.saturating_add(body.height);
    if !inside && !clamp {
        return None;
    }
    Some(Point::new(
        column as i32 - body.x as i32,
        row as i32 - body.y as i32,
    ))
}

pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.keymap.translate(key) {
        Some(action) => {
            tracing::trace!(action = %action.name(), "key");
            app.apply(action);
        }
        None => tracing::trace!(code = ?key.code, "unbound key"),
    }
}

/// Mouse bindings are fixed: left press starts a drag gesture (with Shift,
/// extends a line from the primary cell), dragging updates it and release
/// ends it. The wheel scrolls the view.
pub(crate) fn handle_mouse_event(app: &mut App, terminal_area: Rect, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(point) = view_point(terminal_area, mouse.column, mouse.row, false) else {
                return;
            };
            if mouse.modifiers.contains(KeyModifiers::SHIFT) {
                app.pointer("selectLine", Some(point));
            } else {
                app.pointer("beginSelectGesture", Some(point));
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if !app.selection.is_selecting() {
                return;
            }
            if let Some(point) = view_point(terminal_area, mouse.column, mouse.row, true) {
                app.pointer("updateSelectGesture", Some(point));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.selection.is_selecting() {
                app.pointer("endSelectGesture", None);
            }
        }
        MouseEventKind::ScrollDown => app.scroll_by(0, 3),
        MouseEventKind::ScrollUp => app.scroll_by(0, -3),
        MouseEventKind::ScrollRight => app.scroll_by(1, 0),
        MouseEventKind::ScrollLeft => app.scroll_by(-1, 0),
        _ => {}
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Key(key) => {
                // Only process key press events (Windows reports Press + Release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key_event(app, key);
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                handle_mouse_event(app, Rect::new(0, 0, size.width, size.height), mouse);
            }
            // The next draw picks up the new size.
            Event::Resize(_, _) => {}
            _ => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::keymap::builtin_keymap;
    use crossterm::event::KeyCode;
    use gridkit_core::{CellRef, WidgetOptions};

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 20,
    };

    fn app() -> App {
        let mut app = App::new(10, 40, builtin_keymap("vim").unwrap(), WidgetOptions::default())
            .unwrap();
        let body = ui::grid_body(ui::split_main_chunks(SCREEN)[1]);
        app.resize_viewport(body.width as i32, body.height as i32);
        app
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }
    }

    fn body() -> Rect {
        ui::grid_body(ui::split_main_chunks(SCREEN)[1])
    }

    #[test]
    fn clicks_outside_the_body_are_ignored() {
        assert_eq!(view_point(SCREEN, 0, 0, false), None);
        let b = body();
        assert_eq!(view_point(SCREEN, b.x, b.y, false), Some(Point::new(0, 0)));
        assert_eq!(view_point(SCREEN, 0, b.y, true), Some(Point::new(-(b.x as i32), 0)));
    }

    #[test]
    fn drag_builds_a_range_and_release_ends_it() {
        let mut app = app();
        let b = body();
        handle_mouse_event(&mut app, SCREEN, mouse(MouseEventKind::Down(MouseButton::Left), b.x + 11, b.y + 1, KeyModifiers::NONE));
        assert_eq!(app.selection.primary(), Some(CellRef::from("B2")));
        assert!(app.selection.is_selecting());

        handle_mouse_event(&mut app, SCREEN, mouse(MouseEventKind::Drag(MouseButton::Left), b.x + 25, b.y + 3, KeyModifiers::NONE));
        assert_eq!(app.selection.selection().len(), 6);

        handle_mouse_event(&mut app, SCREEN, mouse(MouseEventKind::Up(MouseButton::Left), b.x + 25, b.y + 3, KeyModifiers::NONE));
        assert!(!app.selection.is_selecting());
        assert_eq!(app.selection.selection().len(), 6);
    }

    #[test]
    fn shift_click_selects_a_line_from_the_primary() {
        let mut app = app();
        let b = body();
        handle_mouse_event(&mut app, SCREEN, mouse(MouseEventKind::Down(MouseButton::Left), b.x + 21, b.y + 2, KeyModifiers::SHIFT));
        let selection = app.selection.selection();
        assert_eq!(selection.primary(), Some(&CellRef::from("A1")));
        assert_eq!(selection.len(), 9);
        assert!(!app.selection.is_selecting());
    }

    #[test]
    fn keys_translate_to_commands() {
        let mut app = app();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE));
        assert_eq!(app.selection.primary(), Some(CellRef::from("B1")));
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT));
        assert_eq!(app.selection.primary(), Some(CellRef::from("J40")));
        handle_key_event(&mut app, KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE));
        assert!(!app.should_quit);
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.should_quit);
    }

    #[test]
    fn wheel_scrolls_the_view() {
        let mut app = app();
        handle_mouse_event(&mut app, SCREEN, mouse(MouseEventKind::ScrollDown, 5, 5, KeyModifiers::NONE));
        assert_eq!(app.sheet.scroll().y, 3);
        handle_mouse_event(&mut app, SCREEN, mouse(MouseEventKind::ScrollUp, 5, 5, KeyModifiers::NONE));
        assert_eq!(app.sheet.scroll().y, 0);
    }
}
