//! UI rendering

use super::app::App;
use super::host::BufferCanvas;
use gridkit_core::{Address, GridGeometry, Rect as ViewRect};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub(crate) const TITLE_BAR_HEIGHT: u16 = 1;
pub(crate) const GRID_MIN_HEIGHT: u16 = 4;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 6;
pub(crate) const COLUMN_HEADER_HEIGHT: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// The part of the grid block where cells are drawn. View coordinates are
/// measured from its top-left corner.
pub(crate) fn grid_body(grid_area: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(grid_area);
    Rect::new(
        inner.x.saturating_add(ROW_HEADER_WIDTH),
        inner.y.saturating_add(COLUMN_HEADER_HEIGHT),
        inner.width.saturating_sub(ROW_HEADER_WIDTH),
        inner.height.saturating_sub(COLUMN_HEADER_HEIGHT),
    )
}

/// Clip a view rectangle to `body` and convert it to terminal cells.
pub(crate) fn view_to_area(body: Rect, rect: ViewRect) -> Option<Rect> {
    let left = rect.x.max(0);
    let top = rect.y.max(0);
    let right = rect.right().min(body.width as i32);
    let bottom = rect.bottom().min(body.height as i32);
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        body.x + left as u16,
        body.y + top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let [title_area, grid_area, status_area] = split_main_chunks(f.area());
    let body = grid_body(grid_area);
    app.resize_viewport(body.width as i32, body.height as i32);

    draw_title_bar(f, app, title_area);
    draw_grid(f, app, grid_area, body);
    draw_status_bar(f, app, status_area);
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let selecting = app
        .kernel
        .variables()
        .is_truthy("isSelecting")
        .unwrap_or(false);
    let mut spans = vec![
        Span::styled(" gridkit ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" keymap: {}", app.keymap.name())),
    ];
    if selecting {
        spans.push(Span::styled(
            "  SELECTING",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_grid(f: &mut Frame, app: &App, grid_area: Rect, body: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(grid_area);
    f.render_widget(block, grid_area);

    let sheet = &app.sheet;
    let (cols, rows) = sheet.visible_range();
    let header_style = Style::default().fg(Color::DarkGray);
    let buf = f.buffer_mut();

    for col in cols.clone() {
        let Some(rect) = sheet.locate_cell(col, 0).and_then(|c| sheet.cell_rect(&c.cell_ref))
        else {
            continue;
        };
        let label = Address::col_to_letters(col);
        let header = ViewRect::new(rect.x, 0, rect.width, 1);
        if let Some(area) = view_to_area(Rect { y: inner.y, height: 1, ..body }, header) {
            let pad = (area.width as usize).saturating_sub(label.len()) / 2;
            buf.set_stringn(area.x + pad as u16, area.y, &label, area.width as usize, header_style);
        }
    }

    for row in rows.clone() {
        let Some(rect) = sheet.locate_cell(0, row).and_then(|c| sheet.cell_rect(&c.cell_ref))
        else {
            continue;
        };
        if rect.y < 0 || rect.y >= body.height as i32 {
            continue;
        }
        let label = format!("{:>width$}", row + 1, width = ROW_HEADER_WIDTH as usize - 1);
        buf.set_stringn(inner.x, body.y + rect.y as u16, label, ROW_HEADER_WIDTH as usize, header_style);
    }

    for row in rows {
        for col in cols.clone() {
            draw_cell(buf, app, body, Address::new(col, row));
        }
    }

    draw_selectors(buf, app, body);
}

fn draw_cell(buf: &mut Buffer, app: &App, body: Rect, addr: Address) {
    let Some(rect) = app.sheet.cell_rect(&addr.into()) else {
        return;
    };
    // Renderers draw from the cell's left edge; skip cells cut on the left.
    if rect.x < 0 {
        return;
    }
    let Some(area) = view_to_area(body, rect) else {
        return;
    };
    let fields = app.sheet.fields(addr);
    let class = app.sheet.class_of(addr);
    let mut canvas = BufferCanvas::new(buf, area, Style::default());
    match app.kernel.renderers().render(
        class,
        &mut canvas,
        &fields,
        rect.width.max(0) as u32,
        rect.height.max(0) as u32,
    ) {
        Ok(true) => {}
        Ok(false) => tracing::trace!(class, "no renderer"),
        Err(err) => tracing::warn!(class, error = %err, "render failed"),
    }
}

fn draw_selectors(buf: &mut Buffer, app: &App, body: Rect) {
    for placement in app.host.placements() {
        let Some(area) = placement.rect.and_then(|rect| view_to_area(body, rect)) else {
            continue;
        };
        let mut style = if placement.style.primary {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::Blue)
        };
        if placement.style.edges.bottom {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        buf.set_style(area, style);
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let selection = app.selection.selection();
    let primary = selection
        .primary()
        .map(|cell| cell.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut spans = vec![
        Span::styled(
            format!(" {} ", primary),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(format!(" {} selected ", selection.len())),
    ];
    if app.status_message.is_empty() {
        spans.push(Span::styled(
            app.keymap.status_hint(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            app.status_message.clone(),
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::keymap::builtin_keymap;
    use gridkit_core::WidgetOptions;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn view_rects_clip_to_body() {
        let body = Rect::new(7, 2, 30, 5);
        assert_eq!(view_to_area(body, ViewRect::new(0, 0, 10, 1)), Some(Rect::new(7, 2, 10, 1)));
        assert_eq!(view_to_area(body, ViewRect::new(25, 4, 10, 1)), Some(Rect::new(32, 6, 5, 1)));
        assert_eq!(view_to_area(body, ViewRect::new(0, -1, 10, 1)), None);
        assert_eq!(view_to_area(body, ViewRect::new(30, 0, 10, 1)), None);
    }

    #[test]
    fn draws_cells_and_primary_selector() {
        let mut app = App::new(6, 10, builtin_keymap("standard").unwrap(), WidgetOptions::default())
            .unwrap();
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let buf = terminal.backend().buffer();
        let body = grid_body(split_main_chunks(Rect::new(0, 0, 60, 12))[1]);
        let first: String = (body.x..body.x + 4)
            .map(|x| buf[(x, body.y)].symbol().to_string())
            .collect();
        assert_eq!(first, "item");
        assert_eq!(buf[(body.x, body.y)].bg, Color::Cyan);
        assert_eq!(app.sheet.viewport(), (body.width as i32, body.height as i32));
    }
}
