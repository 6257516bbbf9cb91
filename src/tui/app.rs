//! Application state.
//!
//! [`App`] wires one kernel, one [`Sheet`] and the selection module together.
//! Every user action goes through [`Kernel::exec`] by command name, exactly
//! as another extension would drive the widget.

use std::rc::Rc;

use gridkit_core::{Point, SelectionModule, Sheet, WidgetOptions, register_cell_classes};
use gridkit_kernel::{GridEvent, Kernel};
use serde_json::{Value, json};

use super::host::TuiHost;
use super::keymap::{Action, Keymap};
use crate::error::{AppError, Result};

pub const MAX_COLS: usize = 702; // A..ZZ
pub const MAX_ROWS: usize = 100_000;

pub struct App {
    pub kernel: Rc<Kernel>,
    pub sheet: Rc<Sheet>,
    pub host: Rc<TuiHost>,
    pub selection: Rc<SelectionModule>,
    pub keymap: Keymap,
    /// Last command error, shown in the status bar until the next action.
    pub status_message: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(cols: usize, rows: usize, keymap: Keymap, options: WidgetOptions) -> Result<Self> {
        if cols == 0 || rows == 0 || cols > MAX_COLS || rows > MAX_ROWS {
            return Err(AppError::InvalidSize { cols, rows });
        }
        let kernel = Kernel::new();
        register_cell_classes(&kernel)?;

        let sheet = Rc::new(Sheet::new(cols, rows));
        fill_demo_data(&sheet)?;

        let host = Rc::new(TuiHost::new());
        let selection = SelectionModule::mount(&kernel, sheet.clone(), host.clone(), options)?;
        tracing::info!(cols, rows, keymap = keymap.name(), "widget mounted");

        let app = App {
            kernel,
            sheet,
            host,
            selection,
            keymap,
            status_message: String::new(),
            should_quit: false,
        };
        app.exec("select", json!({ "cells": ["A1"] }));
        Ok(app)
    }

    /// Run a kernel command; failures land in the status bar.
    pub fn exec(&self, name: &str, args: Value) -> bool {
        match self.kernel.exec(name, args) {
            Ok(()) => {
                self.notify_scroll();
                true
            }
            Err(err) => {
                tracing::warn!(command = name, error = %err, "command failed");
                false
            }
        }
    }

    pub fn apply(&mut self, action: Action) {
        self.status_message.clear();
        let Some((name, args)) = action.command() else {
            self.should_quit = true;
            return;
        };
        if let Err(err) = self.kernel.exec(name, args) {
            self.status_message = err.to_string();
            return;
        }
        self.notify_scroll();
    }

    /// Pointer actions use view coordinates relative to the grid's origin.
    pub fn pointer(&mut self, command: &str, point: Option<Point>) {
        let args = point.map_or(Value::Null, |p| json!(p));
        self.status_message.clear();
        if let Err(err) = self.kernel.exec(command, args) {
            self.status_message = err.to_string();
        }
        self.notify_scroll();
    }

    /// Scroll the view by whole cells and tell listeners about it.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        let current = self.sheet.scroll();
        let (cols, rows) = (self.sheet.cols(), self.sheet.rows());
        let total_width: i32 = (0..cols).map(|c| self.sheet.column_width(c)).sum();
        let (width, height) = self.sheet.viewport();
        let max_x = (total_width - width).max(0);
        let max_y = (rows as i32 - height).max(0);
        let step_x = self.sheet.column_width(0);
        let next = Point::new(
            (current.x + dx * step_x).clamp(0, max_x),
            (current.y + dy).clamp(0, max_y),
        );
        if next != current {
            self.sheet.scroll_to(next);
        }
        self.notify_scroll();
    }

    /// The grid area changed size.
    pub fn resize_viewport(&self, width: i32, height: i32) {
        if self.sheet.viewport() == (width, height) {
            return;
        }
        self.sheet.set_viewport(width, height);
        self.kernel.emit(&GridEvent::Bash);
    }

    fn notify_scroll(&self) {
        if self.sheet.take_scrolled() {
            self.kernel.emit(&GridEvent::Scroll);
        }
    }
}

/// A small table with a data run per row so edge jumps have something to stop on.
fn fill_demo_data(sheet: &Sheet) -> gridkit_core::Result<()> {
    const HEADERS: [&str; 4] = ["item", "qty", "price", "total"];
    const ROWS: [(&str, u32, f64); 5] = [
        ("apples", 12, 0.5),
        ("pears", 4, 0.75),
        ("plums", 30, 0.2),
        ("figs", 8, 1.1),
        ("limes", 15, 0.3),
    ];
    for (col, header) in HEADERS.iter().enumerate().take(sheet.cols()) {
        sheet.set_at(gridkit_core::Address::new(col, 0), *header)?;
    }
    for (i, (item, qty, price)) in ROWS.iter().enumerate() {
        let row = i + 1;
        if row >= sheet.rows() {
            break;
        }
        let values = [
            item.to_string(),
            qty.to_string(),
            price.to_string(),
            format!("{:.2}", *qty as f64 * price),
        ];
        for (col, value) in values.into_iter().enumerate().take(sheet.cols()) {
            sheet.set_at(gridkit_core::Address::new(col, row), value)?;
        }
    }
    Ok(())
}
