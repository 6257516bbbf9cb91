//! The selection extension module.
//!
//! Owns the current [`Selection`], the live drag gesture and the selector
//! pool. Every path that changes the selection ends in [`DO_SELECT`], a
//! routine other modules can intercept to filter or veto selections.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use gridkit_kernel::{
    EventKind, Extension, GridEvent, Kernel, KernelError, Metadata, Result, Routine, parse_args,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::cell_ref::CellRef;
use crate::geometry::{Point, Vector};
use crate::grid::GridGeometry;
use crate::options::WidgetOptions;
use crate::selection::gesture::{Gesture, GestureState};
use crate::selection::navigation;
use crate::selection::reconcile::{ReconcileReport, SelectorHost, SelectorPool};
use crate::selection::Selection;

/// Arguments of the `select` command and the `doSelect` routine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SelectArgs {
    #[serde(default)]
    pub cells: Vec<CellRef>,
    #[serde(default = "default_auto_scroll")]
    pub auto_scroll: bool,
}

fn default_auto_scroll() -> bool {
    true
}

impl SelectArgs {
    pub fn new(cells: Vec<CellRef>, auto_scroll: bool) -> Self {
        SelectArgs { cells, auto_scroll }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ReselectArgs {
    #[serde(default)]
    auto_scroll: bool,
}

/// Replace the selection. Interceptors see the requested cells and may
/// rewrite them or skip the base to veto the change.
pub static DO_SELECT: Routine<SelectionModule, SelectArgs, ()> =
    Routine::new("do_select", "doSelect", SelectionModule::do_select_base);

pub struct SelectionModule {
    kernel: Rc<Kernel>,
    grid: Rc<dyn GridGeometry>,
    options: WidgetOptions,
    selection: RefCell<Arc<Selection>>,
    gesture: RefCell<GestureState>,
    enabled: Cell<bool>,
    pool: RefCell<SelectorPool>,
    reconciliations: Cell<usize>,
}

impl SelectionModule {
    pub fn new(
        kernel: &Rc<Kernel>,
        grid: Rc<dyn GridGeometry>,
        host: Rc<dyn SelectorHost>,
        options: WidgetOptions,
    ) -> Rc<Self> {
        Rc::new(SelectionModule {
            kernel: Rc::clone(kernel),
            grid,
            options,
            selection: RefCell::new(Selection::empty()),
            gesture: RefCell::new(GestureState::Idle),
            enabled: Cell::new(true),
            pool: RefCell::new(SelectorPool::new(host)),
            reconciliations: Cell::new(0),
        })
    }

    /// Construct the module and mount it into `kernel`.
    pub fn mount(
        kernel: &Rc<Kernel>,
        grid: Rc<dyn GridGeometry>,
        host: Rc<dyn SelectorHost>,
        options: WidgetOptions,
    ) -> Result<Rc<Self>> {
        let module = SelectionModule::new(kernel, grid, host, options);
        kernel.mount(&module)?;
        Ok(module)
    }

    /// Remove the module from its kernel and detach every selector.
    pub fn unmount(&self) {
        self.kernel.unmount::<SelectionModule>();
        self.gesture.borrow_mut().end();
        let detached = self.pool.borrow_mut().clear();
        tracing::debug!(detached, "selection module unmounted");
    }

    pub fn selection(&self) -> Arc<Selection> {
        Arc::clone(&self.selection.borrow())
    }

    pub fn primary(&self) -> Option<CellRef> {
        self.selection.borrow().primary().cloned()
    }

    pub fn gesture(&self) -> Option<Gesture> {
        self.gesture.borrow().gesture().cloned()
    }

    pub fn is_selecting(&self) -> bool {
        self.gesture.borrow().is_active()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Enable or disable selection changes. The current selection stays.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    pub fn options(&self) -> WidgetOptions {
        self.options
    }

    /// Number of reconciliations run so far.
    pub fn reconciliations(&self) -> usize {
        self.reconciliations.get()
    }

    pub fn selector_count(&self) -> usize {
        self.pool.borrow().len()
    }

    /// Replace the selection through the `doSelect` routine.
    pub fn do_select(&self, cells: Vec<CellRef>, auto_scroll: bool) {
        DO_SELECT.invoke(self, &self.kernel, SelectArgs::new(cells, auto_scroll));
    }

    fn do_select_base(&self, args: SelectArgs) {
        if !self.enabled.get() {
            tracing::debug!("selection disabled, ignoring select");
            return;
        }
        // Store the grid's own spelling of each reference; unknown cells drop.
        let resolved: Vec<CellRef> = args
            .cells
            .iter()
            .filter_map(|cell| self.grid.find_cell(cell).map(|info| info.cell_ref))
            .collect();
        if resolved.len() != args.cells.len() {
            tracing::debug!(
                dropped = args.cells.len() - resolved.len(),
                "ignoring cells the grid does not have"
            );
        }
        let next = if resolved.is_empty() {
            self.gesture.borrow_mut().end();
            Selection::empty()
        } else {
            Selection::from_refs(resolved)
        };
        if args.auto_scroll
            && self.options.auto_scroll
            && let Some(primary) = next.primary()
        {
            self.grid.scroll_to_cell(primary);
        }
        *self.selection.borrow_mut() = next;
    }

    /// Select `cells` and bring the selectors up to date.
    pub fn select(&self, cells: Vec<CellRef>, auto_scroll: bool) {
        let before = self.selection();
        self.do_select(cells, auto_scroll);
        self.update_selectors();

        let after = self.selection();
        if !Arc::ptr_eq(&before, &after) {
            tracing::debug!(
                primary = ?after.primary().map(CellRef::as_str),
                count = after.len(),
                "selection changed"
            );
            self.kernel.emit(&GridEvent::SelectionChanged {
                primary: after.primary().map(|cell| cell.to_string()),
                count: after.len(),
            });
        }
    }

    /// Reconcile the selector pool with the current selection.
    pub fn update_selectors(&self) -> ReconcileReport {
        let selection = self.selection();
        let report = self.pool.borrow_mut().reconcile(&selection);
        self.reconciliations.set(self.reconciliations.get() + 1);

        let violation = self.pool.borrow().check_consistency(&selection);
        if let Some(message) = violation {
            self.kernel.diagnostics().report(Self::NAMESPACE, message);
        }
        self.reposition_selectors();
        tracing::trace!(
            created = report.created,
            destroyed = report.destroyed,
            kept = report.kept,
            "selectors reconciled"
        );
        report
    }

    /// Move selectors over their cells after a scroll or relayout.
    pub fn reposition_selectors(&self) {
        let selection = self.selection();
        self.pool.borrow().reposition(
            self.grid.as_ref(),
            &selection,
            self.options.animate_selectors,
        );
    }

    pub fn select_all(&self) {
        let cells = self.grid.cells();
        self.select(cells, true);
    }

    pub fn select_neighbor(&self, direction: Vector) {
        let Some(primary) = self.primary() else {
            return;
        };
        if let Some(cell) = navigation::neighbor(self.grid.as_ref(), &primary, direction) {
            self.select(vec![cell], true);
        }
    }

    pub fn select_edge(&self, direction: Vector) {
        let Some(primary) = self.primary() else {
            return;
        };
        if let Some(cell) = navigation::edge(self.grid.as_ref(), &primary, direction) {
            self.select(vec![cell], true);
        }
    }

    pub fn select_border(&self, direction: Vector) {
        let Some(primary) = self.primary() else {
            return;
        };
        if let Some(cell) = navigation::border(self.grid.as_ref(), &primary, direction) {
            self.select(vec![cell], true);
        }
    }

    /// Extend from the primary cell to `point`, keeping the primary.
    pub fn select_line(&self, point: Point) {
        let Some(primary) = self.primary() else {
            return;
        };
        let cells = navigation::line(self.grid.as_ref(), &primary, point);
        if !cells.is_empty() {
            self.select(cells, true);
        }
    }

    pub fn begin_gesture(&self, point: Point) {
        let Some(info) = self.grid.cell_at(point) else {
            return;
        };
        self.gesture.borrow_mut().begin(info.cell_ref.clone());
        self.select(vec![info.cell_ref], true);
    }

    pub fn update_gesture(&self, point: Point) {
        let Some(info) = self.grid.cell_at(point) else {
            return;
        };
        let Some((start, end)) = self
            .gesture
            .borrow_mut()
            .update(info.cell_ref)
            .map(|gesture| (gesture.start.clone(), gesture.end.clone()))
        else {
            return;
        };
        let cells = navigation::range(self.grid.as_ref(), &start, &end);
        let auto_scroll = cells.len() == 1;
        self.select(cells, auto_scroll);
    }

    /// Finish the drag. The selection it produced stays.
    pub fn end_gesture(&self) {
        self.gesture.borrow_mut().end();
    }

    /// Abort the drag without touching the selection.
    pub fn cancel_gesture(&self) {
        if self.gesture.borrow_mut().end().is_some() {
            tracing::debug!("selection gesture cancelled");
        }
    }

    /// Drop selected cells the grid no longer has.
    pub fn reselect(&self, auto_scroll: bool) {
        let selection = self.selection();
        let survivors: Vec<CellRef> = selection
            .iter()
            .filter(|cell| self.grid.find_cell(cell).is_some())
            .cloned()
            .collect();
        if survivors.len() != selection.len() {
            tracing::debug!(
                dropped = selection.len() - survivors.len(),
                "reselecting after invalidation"
            );
            self.select(survivors, auto_scroll);
        } else {
            self.reposition_selectors();
        }
    }

    fn select_command(&self, args: Value) -> Result<()> {
        let args: SelectArgs = parse_args("select", args)?;
        self.select(args.cells, args.auto_scroll);
        Ok(())
    }

    fn select_all_command(&self, _args: Value) -> Result<()> {
        self.select_all();
        Ok(())
    }

    fn select_neighbor_command(&self, args: Value) -> Result<()> {
        self.select_neighbor(parse_args("selectNeighbor", args)?);
        Ok(())
    }

    fn select_edge_command(&self, args: Value) -> Result<()> {
        self.select_edge(parse_args("selectEdge", args)?);
        Ok(())
    }

    fn select_border_command(&self, args: Value) -> Result<()> {
        self.select_border(parse_args("selectBorder", args)?);
        Ok(())
    }

    fn select_line_command(&self, args: Value) -> Result<()> {
        self.select_line(parse_args("selectLine", args)?);
        Ok(())
    }

    fn begin_gesture_command(&self, args: Value) -> Result<()> {
        self.begin_gesture(parse_args("beginSelectGesture", args)?);
        Ok(())
    }

    fn update_gesture_command(&self, args: Value) -> Result<()> {
        self.update_gesture(parse_args("updateSelectGesture", args)?);
        Ok(())
    }

    fn end_gesture_command(&self, _args: Value) -> Result<()> {
        self.end_gesture();
        Ok(())
    }

    fn cancel_gesture_command(&self, _args: Value) -> Result<()> {
        self.cancel_gesture();
        Ok(())
    }

    fn reselect_command(&self, args: Value) -> Result<()> {
        let args: ReselectArgs = if args.is_null() {
            ReselectArgs::default()
        } else {
            parse_args("reselect", args)?
        };
        self.reselect(args.auto_scroll);
        Ok(())
    }

    fn is_selecting_value(&self) -> Value {
        json!(self.is_selecting())
    }

    fn selection_value(&self) -> Value {
        let selection = self.selection();
        if selection.is_empty() {
            Value::Null
        } else {
            json!(selection.items())
        }
    }

    fn enabled_value(&self) -> Value {
        json!(self.is_enabled())
    }

    fn set_enabled_value(&self, value: Value) -> Result<()> {
        let enabled = value
            .as_bool()
            .ok_or_else(|| KernelError::InvalidVariableValue {
                name: "selectionEnabled".to_string(),
                message: format!("expected a boolean, got {value}"),
            })?;
        self.set_enabled(enabled);
        Ok(())
    }

    fn on_invalidate(&self, _event: &GridEvent) {
        self.reselect(false);
    }

    fn on_layout(&self, _event: &GridEvent) {
        self.reposition_selectors();
    }
}

impl Extension for SelectionModule {
    const NAMESPACE: &'static str = "selection";

    fn metadata() -> &'static Metadata<Self> {
        static METADATA: OnceLock<Metadata<SelectionModule>> = OnceLock::new();
        METADATA.get_or_init(|| {
            Metadata::new()
                .routine(&DO_SELECT)
                .command("select", SelectionModule::select_command)
                .command("selectAll", SelectionModule::select_all_command)
                .command("selectNeighbor", SelectionModule::select_neighbor_command)
                .command("selectEdge", SelectionModule::select_edge_command)
                .command("selectBorder", SelectionModule::select_border_command)
                .command("selectLine", SelectionModule::select_line_command)
                .command("beginSelectGesture", SelectionModule::begin_gesture_command)
                .command("updateSelectGesture", SelectionModule::update_gesture_command)
                .command("endSelectGesture", SelectionModule::end_gesture_command)
                .command("cancelSelectGesture", SelectionModule::cancel_gesture_command)
                .command("reselect", SelectionModule::reselect_command)
                .variable("isSelecting", SelectionModule::is_selecting_value)
                .variable("selection", SelectionModule::selection_value)
                .variable_mut(
                    "selectionEnabled",
                    SelectionModule::enabled_value,
                    SelectionModule::set_enabled_value,
                )
                .hook("reselect", EventKind::Invalidate, SelectionModule::on_invalidate)
                .hook("reposition", EventKind::Scroll, SelectionModule::on_layout)
                .hook("reposition", EventKind::Bash, SelectionModule::on_layout)
        })
    }
}
