//! Cell classes and their renderers.
//!
//! Every cell class names an optional base class. A class may carry at most
//! one renderer; classes without one inherit the nearest base's renderer.
//! Renderers never see the raw cell, only a [`Visual`] snapshot holding the
//! fields marked for visualization along the class chain plus the layout
//! size supplied by the caller.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{KernelError, Result};

/// Emphasis hint passed to a [`Canvas`]; hosts map it to their own styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Emphasis {
    #[default]
    Normal,
    Strong,
}

/// Drawing surface handed to renderers, with coordinates relative to the
/// cell's top-left corner.
pub trait Canvas {
    fn draw_text(&mut self, x: i32, y: i32, text: &str, emphasis: Emphasis);
}

/// Snapshot of the visualized fields of a cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Visual {
    pub fields: Map<String, Value>,
    pub width: u32,
    pub height: u32,
}

impl Visual {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

pub type RenderFn = fn(&mut dyn Canvas, &Visual);

/// Class-level declaration of a cell type.
#[derive(Clone, Copy, Debug)]
pub struct CellClass {
    pub name: &'static str,
    pub base: Option<&'static str>,
    /// Fields copied into the [`Visual`] snapshot.
    pub visualize: &'static [&'static str],
}

struct ClassEntry {
    class: CellClass,
    renderer: Option<RenderFn>,
}

/// Kernel-owned registry of cell classes.
#[derive(Default)]
pub struct RendererRegistry {
    classes: RefCell<HashMap<&'static str, ClassEntry>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. Its base, if any, must already be registered.
    pub fn register_class(&self, class: CellClass) -> Result<()> {
        let mut classes = self.classes.borrow_mut();
        if classes.contains_key(class.name) {
            return Err(KernelError::DuplicateCellClass(class.name.to_string()));
        }
        if let Some(base) = class.base
            && !classes.contains_key(base)
        {
            return Err(KernelError::UnknownCellClass(base.to_string()));
        }
        classes.insert(
            class.name,
            ClassEntry {
                class,
                renderer: None,
            },
        );
        Ok(())
    }

    /// Attach the renderer for `class`. A class holds a single renderer.
    pub fn define_renderer(&self, class: &str, renderer: RenderFn) -> Result<()> {
        let mut classes = self.classes.borrow_mut();
        let entry = classes
            .get_mut(class)
            .ok_or_else(|| KernelError::UnknownCellClass(class.to_string()))?;
        if entry.renderer.is_some() {
            return Err(KernelError::DuplicateRenderer(class.to_string()));
        }
        entry.renderer = Some(renderer);
        Ok(())
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.borrow().contains_key(class)
    }

    /// Find the renderer for `class`, walking toward its base classes.
    pub fn resolve(&self, class: &str) -> Option<RenderFn> {
        let classes = self.classes.borrow();
        let mut current = classes.get(class);
        while let Some(entry) = current {
            if let Some(renderer) = entry.renderer {
                return Some(renderer);
            }
            current = entry.class.base.and_then(|base| classes.get(base));
        }
        None
    }

    /// Build the visual snapshot of a cell of `class` from its raw fields.
    pub fn visual(
        &self,
        class: &str,
        fields: &Map<String, Value>,
        width: u32,
        height: u32,
    ) -> Result<Visual> {
        let classes = self.classes.borrow();
        let mut current = Some(
            classes
                .get(class)
                .ok_or_else(|| KernelError::UnknownCellClass(class.to_string()))?,
        );
        let mut visual = Visual {
            fields: Map::new(),
            width,
            height,
        };
        while let Some(entry) = current {
            for field in entry.class.visualize {
                if visual.fields.contains_key(*field) {
                    continue;
                }
                if let Some(value) = fields.get(*field) {
                    visual.fields.insert(field.to_string(), value.clone());
                }
            }
            current = entry.class.base.and_then(|base| classes.get(base));
        }
        Ok(visual)
    }

    /// Render a cell. Returns `false` when no renderer is resolvable.
    pub fn render(
        &self,
        class: &str,
        canvas: &mut dyn Canvas,
        fields: &Map<String, Value>,
        width: u32,
        height: u32,
    ) -> Result<bool> {
        let visual = self.visual(class, fields, width, height)?;
        match self.resolve(class) {
            Some(renderer) => {
                renderer(canvas, &visual);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
