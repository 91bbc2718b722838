//! Table box geometry and connector routing.
//!
//! A table's box is derived from its position and column count only:
//! fixed width, a header band and one row per column. Routing picks the
//! pair of facing box edges from the relative position of the two box
//! centers and is recomputed from scratch on every render.

use derive_more::Display;

use super::schema::Table;

/// Width of every table box
pub const TABLE_WIDTH: f64 = 288.0;
/// Height of the header band
pub const HEADER_HEIGHT: f64 = 60.0;
/// Height of one column row
pub const ROW_HEIGHT: f64 = 36.0;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Angle of the direction from `self` towards `other`, in radians
    pub fn angle_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Axis-aligned bounding box of a table on the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TableBox {
    pub fn new(x: f64, y: f64, column_count: usize) -> Self {
        Self {
            x,
            y,
            width: TABLE_WIDTH,
            height: box_height(column_count),
        }
    }

    pub fn for_table(table: &Table) -> Self {
        Self::new(table.x, table.y, table.columns.len())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Height of a table box holding `column_count` columns
pub fn box_height(column_count: usize) -> f64 {
    HEADER_HEIGHT + ROW_HEIGHT * column_count as f64
}

/// Edge of a box a connector leaves or enters through
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Side {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    #[display("top")]
    Top,
    #[display("bottom")]
    Bottom,
}

impl Side {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Result of routing one connector between two boxes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub from: Point,
    pub to: Point,
    pub from_side: Side,
    pub to_side: Side,
}

impl Connection {
    pub fn is_horizontal(&self) -> bool {
        self.from_side.is_horizontal()
    }
}

/// Choose connection points between a source and a target box.
///
/// Boxes mostly side by side (`|dx| > |dy|`) connect at their vertical
/// centers through the facing left/right edges; otherwise they connect at
/// their horizontal centers through the facing top/bottom edges. An exact
/// tie `|dx| == |dy|` takes the stacked branch.
pub fn route(from: &TableBox, to: &TableBox) -> Connection {
    let from_center = from.center();
    let to_center = to.center();
    let dx = to_center.x - from_center.x;
    let dy = to_center.y - from_center.y;

    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Connection {
                from: Point::new(from.right(), from_center.y),
                to: Point::new(to.x, to_center.y),
                from_side: Side::Right,
                to_side: Side::Left,
            }
        } else {
            Connection {
                from: Point::new(from.x, from_center.y),
                to: Point::new(to.right(), to_center.y),
                from_side: Side::Left,
                to_side: Side::Right,
            }
        }
    } else if dy > 0.0 {
        Connection {
            from: Point::new(from_center.x, from.bottom()),
            to: Point::new(to_center.x, to.y),
            from_side: Side::Bottom,
            to_side: Side::Top,
        }
    } else {
        Connection {
            from: Point::new(from_center.x, from.y),
            to: Point::new(to_center.x, to.bottom()),
            from_side: Side::Top,
            to_side: Side::Bottom,
        }
    }
}
