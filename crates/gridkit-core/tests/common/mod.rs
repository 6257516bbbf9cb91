//! Shared fixtures for the selection integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gridkit_core::{
    CellRef, NodeId, Rect, SelectionModule, SelectorHost, SelectorStyle, Sheet, WidgetOptions,
};
use gridkit_kernel::Kernel;

/// Selector host that records what it was asked to draw.
#[derive(Default)]
pub struct RecordingHost {
    next: Cell<u64>,
    pub live: RefCell<HashMap<NodeId, CellRef>>,
    pub styles: RefCell<HashMap<NodeId, SelectorStyle>>,
    pub attached: Cell<usize>,
    pub detached: Cell<usize>,
}

impl RecordingHost {
    pub fn churn(&self) -> (usize, usize) {
        (self.attached.get(), self.detached.get())
    }

    pub fn live_cells(&self) -> Vec<String> {
        let mut cells: Vec<String> = self
            .live
            .borrow()
            .values()
            .map(|cell| cell.to_string())
            .collect();
        cells.sort();
        cells
    }
}

impl SelectorHost for RecordingHost {
    fn attach(&self, cell: &CellRef, _primary: bool) -> NodeId {
        let id = NodeId(self.next.get());
        self.next.set(id.0 + 1);
        self.attached.set(self.attached.get() + 1);
        self.live.borrow_mut().insert(id, cell.clone());
        id
    }

    fn detach(&self, node: NodeId) {
        self.detached.set(self.detached.get() + 1);
        self.live.borrow_mut().remove(&node);
        self.styles.borrow_mut().remove(&node);
    }

    fn place(&self, node: NodeId, _rect: Option<Rect>, style: SelectorStyle, _animate: bool) {
        self.styles.borrow_mut().insert(node, style);
    }
}

pub struct Fixture {
    pub kernel: Rc<Kernel>,
    pub sheet: Rc<Sheet>,
    pub host: Rc<RecordingHost>,
    pub module: Rc<SelectionModule>,
}

pub fn mount(sheet: Sheet) -> Fixture {
    mount_with(sheet, WidgetOptions::default())
}

pub fn mount_with(sheet: Sheet, options: WidgetOptions) -> Fixture {
    let kernel = Kernel::new();
    let sheet = Rc::new(sheet);
    let host = Rc::new(RecordingHost::default());
    let module = SelectionModule::mount(&kernel, sheet.clone(), host.clone(), options).unwrap();
    Fixture {
        kernel,
        sheet,
        host,
        module,
    }
}

pub fn cells(names: &[&str]) -> Vec<CellRef> {
    names.iter().map(|name| CellRef::from(*name)).collect()
}

pub fn selected(module: &SelectionModule) -> Vec<String> {
    module
        .selection()
        .iter()
        .map(|cell| cell.to_string())
        .collect()
}
