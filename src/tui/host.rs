//! Terminal side of the widget: selector placements and a cell canvas.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use gridkit_core::{CellRef, NodeId, Rect, SelectorHost, SelectorStyle};
use gridkit_kernel::{Canvas, Emphasis};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as Area;
use ratatui::style::{Modifier, Style};

/// Where a selector node was last placed, in view coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub cell: CellRef,
    pub rect: Option<Rect>,
    pub style: SelectorStyle,
}

/// Keeps the attached selector nodes so `ui` can paint them over the grid.
#[derive(Default)]
pub struct TuiHost {
    nodes: RefCell<HashMap<NodeId, Placement>>,
    next: Cell<u64>,
}

impl TuiHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Placed nodes; primary last so it paints on top.
    pub fn placements(&self) -> Vec<Placement> {
        let mut placed: Vec<Placement> = self
            .nodes
            .borrow()
            .values()
            .filter(|p| p.rect.is_some())
            .cloned()
            .collect();
        placed.sort_by_key(|p| p.style.primary);
        placed
    }
}

impl SelectorHost for TuiHost {
    fn attach(&self, cell: &CellRef, primary: bool) -> NodeId {
        let id = NodeId(self.next.get());
        self.next.set(id.0 + 1);
        self.nodes.borrow_mut().insert(
            id,
            Placement {
                cell: cell.clone(),
                rect: None,
                style: SelectorStyle {
                    primary,
                    ..SelectorStyle::default()
                },
            },
        );
        id
    }

    fn detach(&self, node: NodeId) {
        if self.nodes.borrow_mut().remove(&node).is_none() {
            tracing::warn!(node = node.0, "detach of unknown selector node");
        }
    }

    // Terminal cells cannot animate; `animate` is ignored.
    fn place(&self, node: NodeId, rect: Option<Rect>, style: SelectorStyle, _animate: bool) {
        if let Some(placement) = self.nodes.borrow_mut().get_mut(&node) {
            placement.rect = rect;
            placement.style = style;
        }
    }
}

/// [`Canvas`] over one cell of a ratatui buffer. Text outside `area` is
/// clipped.
pub struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
    area: Area,
    base: Style,
}

impl<'a> BufferCanvas<'a> {
    pub fn new(buf: &'a mut Buffer, area: Area, base: Style) -> Self {
        BufferCanvas { buf, area, base }
    }
}

impl Canvas for BufferCanvas<'_> {
    fn draw_text(&mut self, x: i32, y: i32, text: &str, emphasis: Emphasis) {
        if x < 0 || y < 0 || x >= self.area.width as i32 || y >= self.area.height as i32 {
            return;
        }
        let style = match emphasis {
            Emphasis::Normal => self.base,
            Emphasis::Strong => self.base.add_modifier(Modifier::BOLD),
        };
        let room = self.area.width as usize - x as usize;
        let clipped: String = text.chars().take(room).collect();
        self.buf.set_string(
            self.area.x + x as u16,
            self.area.y + y as u16,
            clipped,
            style,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_place_detach() {
        let host = TuiHost::new();
        let a = host.attach(&CellRef::from("A1"), true);
        let b = host.attach(&CellRef::from("B1"), false);
        assert_ne!(a, b);
        assert!(host.placements().is_empty());

        host.place(a, Some(Rect::new(0, 0, 10, 1)), SelectorStyle { primary: true, ..Default::default() }, false);
        host.place(b, Some(Rect::new(10, 0, 10, 1)), SelectorStyle::default(), false);
        let placed = host.placements();
        assert_eq!(placed.len(), 2);
        assert!(placed[1].style.primary);

        host.detach(a);
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn canvas_clips_to_cell() {
        let mut buf = Buffer::empty(Area::new(0, 0, 20, 2));
        {
            let mut canvas = BufferCanvas::new(&mut buf, Area::new(5, 1, 4, 1), Style::default());
            canvas.draw_text(1, 0, "abcdef", Emphasis::Normal);
            canvas.draw_text(0, 1, "hidden", Emphasis::Normal);
        }
        let row: String = (0..20u16).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(row.trim_end(), "      abc");
    }
}
