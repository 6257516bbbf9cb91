//! Built-in cell classes and their renderers.

use gridkit_kernel::{Canvas, CellClass, Emphasis, Kernel, Result, Visual};

pub const TEXT_CLASS: &str = "text";
pub const NUMBER_CLASS: &str = "number";

pub const TEXT: CellClass = CellClass {
    name: TEXT_CLASS,
    base: None,
    visualize: &["value"],
};

pub const NUMBER: CellClass = CellClass {
    name: NUMBER_CLASS,
    base: Some(TEXT_CLASS),
    visualize: &[],
};

/// Register the built-in classes and renderers with a kernel.
pub fn register_cell_classes(kernel: &Kernel) -> Result<()> {
    let renderers = kernel.renderers();
    renderers.register_class(TEXT)?;
    renderers.register_class(NUMBER)?;
    renderers.define_renderer(TEXT_CLASS, render_text)?;
    renderers.define_renderer(NUMBER_CLASS, render_number)?;
    Ok(())
}

/// Clip `text` to `width` characters.
fn fit(text: &str, width: u32) -> String {
    text.chars().take(width as usize).collect()
}

fn render_text(canvas: &mut dyn Canvas, visual: &Visual) {
    let text = fit(visual.text("value").unwrap_or(""), visual.width);
    if !text.is_empty() {
        canvas.draw_text(0, 0, &text, Emphasis::Normal);
    }
}

fn render_number(canvas: &mut dyn Canvas, visual: &Visual) {
    // Leave one column of padding on the right.
    let room = visual.width.saturating_sub(1).max(1);
    let text = fit(visual.text("value").unwrap_or(""), room);
    let x = room as i32 - text.chars().count() as i32;
    canvas.draw_text(x.max(0), 0, &text, Emphasis::Normal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(i32, String)>,
    }

    impl Canvas for Recorder {
        fn draw_text(&mut self, x: i32, _y: i32, text: &str, _emphasis: Emphasis) {
            self.calls.push((x, text.to_string()));
        }
    }

    #[test]
    fn numbers_render_right_aligned() {
        let kernel = Kernel::new();
        register_cell_classes(&kernel).unwrap();
        let fields = json!({"value": "42", "ref": "A1"}).as_object().cloned().unwrap();

        let mut canvas = Recorder::default();
        kernel
            .renderers()
            .render(NUMBER_CLASS, &mut canvas, &fields, 10, 1)
            .unwrap();
        assert_eq!(canvas.calls, vec![(7, "42".to_string())]);
    }

    #[test]
    fn number_class_inherits_value_field() {
        let kernel = Kernel::new();
        register_cell_classes(&kernel).unwrap();
        let fields = json!({"value": "7", "ref": "B2"}).as_object().cloned().unwrap();
        let visual = kernel.renderers().visual(NUMBER_CLASS, &fields, 4, 1).unwrap();
        assert_eq!(visual.text("value"), Some("7"));
        assert!(visual.get("ref").is_none());
    }

    #[test]
    fn text_is_clipped_to_cell_width() {
        let kernel = Kernel::new();
        register_cell_classes(&kernel).unwrap();
        let fields = json!({"value": "overflowing"}).as_object().cloned().unwrap();

        let mut canvas = Recorder::default();
        kernel
            .renderers()
            .render(TEXT_CLASS, &mut canvas, &fields, 4, 1)
            .unwrap();
        assert_eq!(canvas.calls, vec![(0, "over".to_string())]);
    }
}
