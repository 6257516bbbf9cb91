//! View-space geometry: direction vectors, points and rectangles.

use serde::{Deserialize, Serialize};

/// A direction on the grid. Components are clamped to -1, 0 or 1 by
/// [`Vector::normalize`]; +x is east, +y is south.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const NORTH: Vector = Vector::new(0, -1);
    pub const SOUTH: Vector = Vector::new(0, 1);
    pub const EAST: Vector = Vector::new(1, 0);
    pub const WEST: Vector = Vector::new(-1, 0);
    pub const NORTH_EAST: Vector = Vector::new(1, -1);
    pub const NORTH_WEST: Vector = Vector::new(-1, -1);
    pub const SOUTH_EAST: Vector = Vector::new(1, 1);
    pub const SOUTH_WEST: Vector = Vector::new(-1, 1);

    pub const fn new(x: i32, y: i32) -> Self {
        Vector { x, y }
    }

    /// Snap to one of the eight unit directions (or zero).
    pub fn normalize(self) -> Vector {
        Vector::new(self.x.signum(), self.y.signum())
    }

    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Half-open rectangle: covers `x..x + width` and `y..y + height`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing both points (inclusive of each).
    pub fn spanning(a: Point, b: Point) -> Rect {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Rect::new(x, y, a.x.max(b.x) - x + 1, a.y.max(b.y) - y + 1)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}
