//! Property tests: selection invariants hold after any sequence of operations.

mod common;

use std::collections::HashSet;

use common::mount;
use gridkit_core::{Address, CellRef, Point, Sheet, Vector};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Select(Vec<(usize, usize)>),
    SelectAll,
    Neighbor(i32, i32),
    Edge(i32, i32),
    Border(i32, i32),
    Line(i32, i32),
    Begin(i32, i32),
    Update(i32, i32),
    End,
    Shrink(usize, usize),
}

fn direction() -> impl Strategy<Value = (i32, i32)> {
    (-3..=3i32, -3..=3i32)
}

fn point() -> impl Strategy<Value = (i32, i32)> {
    (-5..70i32, -2..9i32)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec((0..7usize, 0..7usize), 0..8).prop_map(Op::Select),
        Just(Op::SelectAll),
        direction().prop_map(|(x, y)| Op::Neighbor(x, y)),
        direction().prop_map(|(x, y)| Op::Edge(x, y)),
        direction().prop_map(|(x, y)| Op::Border(x, y)),
        point().prop_map(|(x, y)| Op::Line(x, y)),
        point().prop_map(|(x, y)| Op::Begin(x, y)),
        point().prop_map(|(x, y)| Op::Update(x, y)),
        Just(Op::End),
        (1..6usize, 1..6usize).prop_map(|(c, r)| Op::Shrink(c, r)),
    ]
}

fn values() -> impl Strategy<Value = Vec<Vec<String>>> {
    let cell = prop_oneof![Just(""), Just("0"), Just("1"), Just("x")].prop_map(String::from);
    prop::collection::vec(prop::collection::vec(cell, 6), 6)
}

proptest! {
    #[test]
    fn selection_invariants_hold(rows in values(), ops in prop::collection::vec(op(), 1..25)) {
        let fx = mount(Sheet::from_rows(&rows));

        for op in ops {
            match op {
                Op::Select(addrs) => {
                    let cells = addrs
                        .into_iter()
                        .map(|(col, row)| CellRef::from(Address::new(col, row)))
                        .collect();
                    fx.module.select(cells, true);
                }
                Op::SelectAll => fx.module.select_all(),
                Op::Neighbor(x, y) => fx.module.select_neighbor(Vector::new(x, y)),
                Op::Edge(x, y) => fx.module.select_edge(Vector::new(x, y)),
                Op::Border(x, y) => fx.module.select_border(Vector::new(x, y)),
                Op::Line(x, y) => fx.module.select_line(Point::new(x, y)),
                Op::Begin(x, y) => fx.module.begin_gesture(Point::new(x, y)),
                Op::Update(x, y) => fx.module.update_gesture(Point::new(x, y)),
                Op::End => fx.module.end_gesture(),
                Op::Shrink(cols, rows) => {
                    fx.sheet.resize(cols, rows);
                    fx.module.reselect(false);
                }
            }

            let selection = fx.module.selection();
            let unique: HashSet<&CellRef> = selection.iter().collect();
            prop_assert_eq!(unique.len(), selection.len());
            prop_assert_eq!(selection.primary(), selection.items().first());
            prop_assert_eq!(fx.module.selector_count(), selection.len());
            prop_assert_eq!(fx.host.live.borrow().len(), selection.len());
            prop_assert!(fx.kernel.diagnostics().is_empty());
            if selection.is_empty() {
                prop_assert!(!fx.module.is_selecting());
            }
        }
    }

    #[test]
    fn line_anchor_is_always_primary(
        col in 0..5usize,
        row in 0..5usize,
        (x, y) in point(),
    ) {
        let fx = mount(Sheet::new(5, 5));
        let anchor = CellRef::from(Address::new(col, row));
        fx.module.select(vec![anchor.clone()], false);
        fx.module.select_line(Point::new(x, y));
        prop_assert_eq!(fx.module.primary(), Some(anchor));
    }
}
