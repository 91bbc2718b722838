//! Render model shared by the canvas and the static SVG export.
//!
//! A [`Scene`] is rebuilt from the schema on every render. Nothing is
//! cached between builds, so the set of connectors is always exactly the
//! set of foreign keys that resolve right now.

use super::connector::{ConnectorGeometry, Segment, relationship_line};
use super::geometry::{TableBox, route};
use super::schema::{Column, Relationship, Schema, Table};

/// A table together with its derived box
#[derive(Clone, Debug)]
pub struct TableShape<'a> {
    pub table: &'a Table,
    pub bounds: TableBox,
}

/// Connector derived from a resolvable foreign key
#[derive(Clone, Debug)]
pub struct FkConnector<'a> {
    pub from_table: &'a Table,
    pub from_column: &'a Column,
    pub to_table: &'a Table,
    pub to_column: &'a Column,
    pub geometry: ConnectorGeometry,
}

/// Straight arrow for an explicit relationship
#[derive(Clone, Debug)]
pub struct RelationshipArrow<'a> {
    pub relationship: &'a Relationship,
    pub line: Segment,
}

/// Bounding box of all tables in canvas space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn padded(self, pad: f64) -> Self {
        Self {
            min_x: self.min_x - pad,
            min_y: self.min_y - pad,
            max_x: self.max_x + pad,
            max_y: self.max_y + pad,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene<'a> {
    pub tables: Vec<TableShape<'a>>,
    pub connectors: Vec<FkConnector<'a>>,
    pub arrows: Vec<RelationshipArrow<'a>>,
}

impl<'a> Scene<'a> {
    pub fn build(schema: &'a Schema) -> Self {
        let tables = schema
            .tables
            .iter()
            .map(|table| TableShape {
                table,
                bounds: TableBox::for_table(table),
            })
            .collect();

        let connectors = schema
            .foreign_keys()
            .map(|link| {
                let connection = route(
                    &TableBox::for_table(link.from_table),
                    &TableBox::for_table(link.to_table),
                );
                FkConnector {
                    from_table: link.from_table,
                    from_column: link.from_column,
                    to_table: link.to_table,
                    to_column: link.to_column,
                    geometry: ConnectorGeometry::new(
                        connection,
                        &link.from_column.name,
                        &link.to_column.name,
                    ),
                }
            })
            .collect();

        let arrows = schema
            .relationships
            .iter()
            .filter_map(|relationship| {
                let from = schema.table(&relationship.from)?;
                let to = schema.table(&relationship.to)?;
                Some(RelationshipArrow {
                    relationship,
                    line: relationship_line(from, to),
                })
            })
            .collect();

        Self {
            tables,
            connectors,
            arrows,
        }
    }

    /// Bounding box of the table boxes, `None` for an empty canvas.
    pub fn bounds(&self) -> Option<Bounds> {
        self.tables.iter().map(|shape| shape.bounds).fold(None, |acc, b| {
            let next = Bounds {
                min_x: b.x,
                min_y: b.y,
                max_x: b.right(),
                max_y: b.bottom(),
            };
            Some(match acc {
                None => next,
                Some(acc) => Bounds {
                    min_x: acc.min_x.min(next.min_x),
                    min_y: acc.min_y.min(next.min_y),
                    max_x: acc.max_x.max(next.max_x),
                    max_y: acc.max_y.max(next.max_y),
                },
            })
        })
    }
}
