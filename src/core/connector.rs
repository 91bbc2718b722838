//! Connector path and crow's-foot glyph geometry.
//!
//! The interactive canvas and the SVG export both draw foreign-key
//! connectors from [`ConnectorGeometry`], so an exported diagram matches
//! the live view exactly.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

use super::geometry::{Connection, Point};
use super::schema::Table;

/// Length of each crow's-foot prong
pub const CROW_LENGTH: f64 = 12.0;
/// Angular offset of the outer prongs
pub const CROW_SPREAD: f64 = FRAC_PI_6;
/// Half length of the "one" tick
pub const TICK_HALF_LENGTH: f64 = 6.0;
pub const LABEL_WIDTH: f64 = 120.0;
pub const LABEL_HEIGHT: f64 = 20.0;
/// Vertical offset of the badge rectangle above the midpoint
pub const LABEL_RISE: f64 = 12.0;

/// Offsets of an explicit relationship's endpoints from the table origin
const RELATIONSHIP_FROM_DX: f64 = 150.0;
const RELATIONSHIP_ANCHOR_DY: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }
}

/// Label badge drawn at the middle of a connector
#[derive(Clone, Debug, PartialEq)]
pub struct LabelBadge {
    /// Top-left corner of the badge rectangle
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    /// Anchor for centered text
    pub anchor: Point,
    pub text: String,
}

/// Everything needed to draw one foreign-key connector
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorGeometry {
    pub connection: Connection,
    /// SVG path data of the cubic Bezier curve
    pub path: String,
    /// "Many" glyph at the source endpoint
    pub crow_foot: [Segment; 3],
    /// "One" tick at the target endpoint
    pub one_tick: Segment,
    pub label: LabelBadge,
}

impl ConnectorGeometry {
    pub fn new(connection: Connection, from_column: &str, to_column: &str) -> Self {
        Self {
            path: bezier_path(&connection),
            crow_foot: crow_foot(connection.from, connection.to),
            one_tick: one_tick(connection.from, connection.to),
            label: label_badge(connection.from, connection.to, from_column, to_column),
            connection,
        }
    }
}

/// S-curve leaving and entering perpendicular to the box edges.
///
/// Horizontal connections put both control points on the horizontal
/// midpoint; vertical ones put them on the vertical midpoint.
pub fn bezier_path(connection: &Connection) -> String {
    let Connection { from, to, .. } = *connection;
    if connection.is_horizontal() {
        let mid_x = (from.x + to.x) / 2.0;
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            num(from.x),
            num(from.y),
            num(mid_x),
            num(from.y),
            num(mid_x),
            num(to.y),
            num(to.x),
            num(to.y)
        )
    } else {
        let mid_y = (from.y + to.y) / 2.0;
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            num(from.x),
            num(from.y),
            num(from.x),
            num(mid_y),
            num(to.x),
            num(mid_y),
            num(to.x),
            num(to.y)
        )
    }
}

/// Three prongs fanned around the approach angle, pointing away from the target.
///
/// Order: `angle - spread`, `angle + spread`, `angle`.
pub fn crow_foot(from: Point, to: Point) -> [Segment; 3] {
    let angle = from.angle_to(to);
    let prong = |theta: f64| {
        Segment::new(
            from,
            Point::new(
                from.x - theta.cos() * CROW_LENGTH,
                from.y - theta.sin() * CROW_LENGTH,
            ),
        )
    };
    [
        prong(angle - CROW_SPREAD),
        prong(angle + CROW_SPREAD),
        prong(angle),
    ]
}

/// Short tick across the target endpoint, perpendicular to the source-to-target direction.
pub fn one_tick(from: Point, to: Point) -> Segment {
    let perp = from.angle_to(to) + FRAC_PI_2;
    let (dx, dy) = (perp.cos() * TICK_HALF_LENGTH, perp.sin() * TICK_HALF_LENGTH);
    Segment::new(Point::new(to.x + dx, to.y + dy), Point::new(to.x - dx, to.y - dy))
}

pub fn label_badge(from: Point, to: Point, from_column: &str, to_column: &str) -> LabelBadge {
    let mid = from.midpoint(to);
    LabelBadge {
        origin: Point::new(mid.x - LABEL_WIDTH / 2.0, mid.y - LABEL_RISE),
        width: LABEL_WIDTH,
        height: LABEL_HEIGHT,
        anchor: mid,
        text: format!("{} → {}", from_column, to_column),
    }
}

/// Straight line for an explicit relationship; the arrowhead sits at `to`.
pub fn relationship_line(from: &Table, to: &Table) -> Segment {
    Segment::new(
        Point::new(from.x + RELATIONSHIP_FROM_DX, from.y + RELATIONSHIP_ANCHOR_DY),
        Point::new(to.x, to.y + RELATIONSHIP_ANCHOR_DY),
    )
}

/// Format a coordinate for path data and SVG attributes.
///
/// Integral values print without a fractional part and negative zero
/// prints as `0`, so output is stable across equivalent inputs.
pub fn num(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Side, TableBox, route};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_horizontal_bezier_uses_midpoint_x() {
        let conn = route(&TableBox::new(0.0, 0.0, 2), &TableBox::new(500.0, 40.0, 2));
        assert_eq!(bezier_path(&conn), "M 288 66 C 394 66, 394 106, 500 106");
    }

    #[test]
    fn test_vertical_bezier_uses_midpoint_y() {
        let conn = route(&TableBox::new(0.0, 0.0, 3), &TableBox::new(100.0, 100.0, 3));
        assert_eq!(conn.from_side, Side::Bottom);
        assert_eq!(bezier_path(&conn), "M 144 168 C 144 134, 244 134, 244 100");
    }

    #[test]
    fn test_crow_foot_points_away_from_target() {
        let from = Point::new(100.0, 50.0);
        let to = Point::new(300.0, 50.0);
        let [lower, upper, straight] = crow_foot(from, to);

        for prong in [lower, upper, straight] {
            assert_eq!(prong.from, from);
            assert_close(prong.length(), CROW_LENGTH);
            assert!(prong.to.x < from.x);
        }
        assert_close(straight.to.x, 88.0);
        assert_close(straight.to.y, 50.0);
        // angle - 30deg: cos = sqrt(3)/2, sin = -1/2, negated
        assert_close(lower.to.x, 100.0 - 12.0 * (3f64).sqrt() / 2.0);
        assert_close(lower.to.y, 56.0);
        assert_close(upper.to.y, 44.0);
    }

    #[test]
    fn test_crow_foot_vertical_connection() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(0.0, 100.0);
        let [_, _, straight] = crow_foot(from, to);
        assert_close(straight.to.x, 0.0);
        assert_close(straight.to.y, -12.0);
    }

    #[test]
    fn test_one_tick_is_perpendicular_and_centered() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(200.0, 0.0);
        let tick = one_tick(from, to);

        assert_close(tick.length(), 2.0 * TICK_HALF_LENGTH);
        assert_close(tick.from.x, 200.0);
        assert_close(tick.to.x, 200.0);
        assert_close(tick.from.y, 6.0);
        assert_close(tick.to.y, -6.0);

        let diagonal = one_tick(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        let (dx, dy) = (diagonal.to.x - diagonal.from.x, diagonal.to.y - diagonal.from.y);
        assert_close(dx * 30.0 + dy * 40.0, 0.0);
        assert_close(diagonal.from.midpoint(diagonal.to).x, 30.0);
    }

    #[test]
    fn test_label_badge() {
        let badge = label_badge(Point::new(0.0, 0.0), Point::new(200.0, 100.0), "user_id", "id");
        assert_eq!(badge.anchor, Point::new(100.0, 50.0));
        assert_eq!(badge.origin, Point::new(40.0, 38.0));
        assert_eq!(badge.width, 120.0);
        assert_eq!(badge.height, 20.0);
        assert_eq!(badge.text, "user_id → id");
    }

    #[test]
    fn test_connector_geometry_combines_parts() {
        let conn = route(&TableBox::new(0.0, 0.0, 2), &TableBox::new(500.0, 40.0, 2));
        let geometry = ConnectorGeometry::new(conn, "user_id", "id");
        assert_eq!(geometry.path, bezier_path(&conn));
        assert_eq!(geometry.crow_foot, crow_foot(conn.from, conn.to));
        assert_eq!(geometry.one_tick, one_tick(conn.from, conn.to));
        assert_eq!(geometry.label.text, "user_id → id");
    }

    #[test]
    fn test_relationship_line_anchors() {
        let a = Table::new("a").with_position(10.0, 20.0);
        let b = Table::new("b").with_position(400.0, -5.0);
        let line = relationship_line(&a, &b);
        assert_eq!(line.from, Point::new(160.0, 50.0));
        assert_eq!(line.to, Point::new(400.0, 25.0));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(100.0), "100");
        assert_eq!(num(-50.0), "-50");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.0), "0");
    }
}
