//! Static SVG export.
//!
//! Everything is drawn from a [`Scene`], the same render model the canvas
//! uses, and output is byte-for-byte reproducible for a given schema.

use std::fmt::Write;

use super::connector::{ConnectorGeometry, Segment, num};
use super::error::{ModelerError, Result};
use super::geometry::{HEADER_HEIGHT, ROW_HEIGHT};
use super::scene::{Scene, TableShape};
use super::schema::Schema;

/// Padding around the tables' bounding box
pub const VIEWBOX_PADDING: f64 = 50.0;

const TITLE_BAR_HEIGHT: f64 = 40.0;
const TEXT_INSET: f64 = 12.0;
const TYPE_COLUMN_DX: f64 = 150.0;
const BADGE_DX: f64 = 260.0;

const STYLE: &str = r##"  <defs>
    <style>
      .table-bg { fill: #1e293b; stroke: #334155; stroke-width: 1; }
      .table-header { fill: #0f172a; }
      .table-text { fill: #f1f5f9; font-family: monospace; font-size: 14px; }
      .table-title { fill: #60a5fa; font-weight: 600; }
      .column-text { fill: #cbd5e1; font-size: 12px; }
      .type-text { fill: #94a3b8; font-size: 11px; }
      .pk-badge { fill: #fbbf24; }
      .fk-badge { fill: #3b82f6; }
      .connection-line { stroke: #3b82f6; stroke-width: 2; fill: none; }
      .label-bg { fill: #1e293b; stroke: #3b82f6; stroke-width: 1; opacity: 0.95; }
      .label-text { fill: #60a5fa; font-size: 11px; font-family: monospace; font-weight: 600; }
    </style>
    <marker id="arrowhead" markerWidth="10" markerHeight="10" refX="9" refY="3" orient="auto">
      <polygon points="0 0, 10 3, 0 6" fill="#3b82f6"/>
    </marker>
  </defs>
"##;

/// Render the schema as a standalone SVG document.
///
/// Fails with [`ModelerError::NothingToExport`] when there are no tables.
pub fn render_svg(schema: &Schema) -> Result<String> {
    let scene = Scene::build(schema);
    let bounds = scene
        .bounds()
        .ok_or(ModelerError::NothingToExport)?
        .padded(VIEWBOX_PADDING);

    let (min_x, min_y) = (num(bounds.min_x), num(bounds.min_y));
    let (width, height) = (num(bounds.width()), num(bounds.height()));

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{min_x} {min_y} {width} {height}">"#
    );
    svg.push_str(STYLE);
    let _ = writeln!(
        svg,
        r##"  <rect width="{width}" height="{height}" x="{min_x}" y="{min_y}" fill="#020617"/>"##
    );

    for shape in &scene.tables {
        render_table(&mut svg, shape);
    }
    for connector in &scene.connectors {
        render_connector(&mut svg, &connector.geometry);
    }
    for arrow in &scene.arrows {
        let Segment { from, to } = arrow.line;
        let _ = writeln!(
            svg,
            r#"  <line class="connection-line" x1="{}" y1="{}" x2="{}" y2="{}" marker-end="url(#arrowhead)"/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y)
        );
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn render_table(svg: &mut String, shape: &TableShape<'_>) {
    let b = shape.bounds;
    let _ = writeln!(svg, "  <g>");
    let _ = writeln!(
        svg,
        r#"    <rect class="table-bg" x="{}" y="{}" width="{}" height="{}" rx="8"/>"#,
        num(b.x),
        num(b.y),
        num(b.width),
        num(b.height)
    );
    let _ = writeln!(
        svg,
        r#"    <rect class="table-header" x="{}" y="{}" width="{}" height="{}" rx="8"/>"#,
        num(b.x),
        num(b.y),
        num(b.width),
        num(TITLE_BAR_HEIGHT)
    );
    let _ = writeln!(
        svg,
        r#"    <text class="table-text table-title" x="{}" y="{}">{}</text>"#,
        num(b.x + TEXT_INSET),
        num(b.y + 25.0),
        escape_xml(&shape.table.name)
    );

    for (idx, column) in shape.table.columns.iter().enumerate() {
        let row_y = b.y + HEADER_HEIGHT + idx as f64 * ROW_HEIGHT;
        let _ = writeln!(
            svg,
            r#"    <text class="column-text" x="{}" y="{}">{}</text>"#,
            num(b.x + TEXT_INSET),
            num(row_y),
            escape_xml(&column.name)
        );
        let _ = writeln!(
            svg,
            r#"    <text class="type-text" x="{}" y="{}">{}</text>"#,
            num(b.x + TYPE_COLUMN_DX),
            num(row_y),
            escape_xml(&column.sql_type())
        );
        if column.is_primary {
            render_badge(svg, b.x, row_y, "pk-badge", "#0f172a", "PK");
        }
        if column.is_foreign {
            render_badge(svg, b.x, row_y, "fk-badge", "#fff", "FK");
        }
    }
    let _ = writeln!(svg, "  </g>");
}

fn render_badge(svg: &mut String, table_x: f64, row_y: f64, class: &str, ink: &str, text: &str) {
    let _ = writeln!(
        svg,
        r#"    <rect class="{class}" x="{}" y="{}" width="20" height="16" rx="3"/>"#,
        num(table_x + BADGE_DX),
        num(row_y - 12.0)
    );
    let _ = writeln!(
        svg,
        r#"    <text style="fill: {ink}; font-size: 10px; font-weight: 600;" x="{}" y="{}" text-anchor="middle">{text}</text>"#,
        num(table_x + BADGE_DX + 10.0),
        num(row_y)
    );
}

fn render_connector(svg: &mut String, geometry: &ConnectorGeometry) {
    let _ = writeln!(svg, "  <g>");
    let _ = writeln!(
        svg,
        r#"    <path class="connection-line" d="{}"/>"#,
        geometry.path
    );
    for segment in std::iter::once(&geometry.one_tick).chain(geometry.crow_foot.iter()) {
        let _ = writeln!(
            svg,
            r#"    <line class="connection-line" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            num(segment.from.x),
            num(segment.from.y),
            num(segment.to.x),
            num(segment.to.y)
        );
    }
    let label = &geometry.label;
    let _ = writeln!(
        svg,
        r#"    <rect class="label-bg" x="{}" y="{}" width="{}" height="{}" rx="4"/>"#,
        num(label.origin.x),
        num(label.origin.y),
        num(label.width),
        num(label.height)
    );
    let _ = writeln!(
        svg,
        r#"    <text class="label-text" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
        num(label.anchor.x),
        num(label.anchor.y),
        escape_xml(&label.text)
    );
    let _ = writeln!(svg, "  </g>");
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
