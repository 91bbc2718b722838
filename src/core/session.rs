//! Application session: the owned editing state.
//!
//! The session owns the current [`Schema`] behind an `Arc` and replaces it
//! copy-on-write on every mutation, so a snapshot taken by a renderer never
//! changes underneath it. Every mutation that changes the schema is written
//! through to the [`SchemaStore`] before the call returns.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::codec;
use super::ddl;
use super::error::{ModelerError, Result};
use super::files::{self, ExportBlob, ExportFormat};
use super::geometry::Point;
use super::ops::{ColumnOps, ColumnUpdate, RelationshipOps, TableOps, TableUpdate};
use super::scene::Scene;
use super::schema::{Column, Relationship, RelationshipKind, Schema, Table};
use super::store::SchemaStore;

/// First table lands here; later ones are staggered diagonally.
const NEW_TABLE_ORIGIN: f64 = 100.0;
const NEW_TABLE_STAGGER: f64 = 50.0;

/// A table being dragged: pointer start and the table's position at start.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    table_id: String,
    start: Point,
    origin: (f64, f64),
}

impl DragSession {
    pub fn start(table_id: impl Into<String>, pointer: Point, origin: (f64, f64)) -> Self {
        Self {
            table_id: table_id.into(),
            start: pointer,
            origin,
        }
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    /// Table position for the current pointer location
    pub fn update(&self, pointer: Point) -> (f64, f64) {
        (
            self.origin.0 + (pointer.x - self.start.x),
            self.origin.1 + (pointer.y - self.start.y),
        )
    }
}

pub struct Session<S: SchemaStore> {
    schema: Arc<Schema>,
    selected_table: Option<String>,
    selected_column: Option<String>,
    show_code: bool,
    drag: Option<DragSession>,
    store: S,
}

impl<S: SchemaStore> Session<S> {
    /// Load the persisted schema. A missing or unreadable blob starts an
    /// empty session; opening never fails.
    pub fn open(store: S) -> Self {
        let schema = match store.load() {
            Ok(Some(schema)) => {
                tracing::info!(tables = schema.tables.len(), "Loaded saved schema");
                schema
            }
            Ok(None) => Schema::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load saved data");
                Schema::new()
            }
        };

        Self {
            schema: Arc::new(schema),
            selected_table: None,
            selected_column: None,
            show_code: false,
            drag: None,
            store,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Cheap handle to the current state; unaffected by later mutations.
    pub fn snapshot(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Tables
    // ========================================================================

    /// Append a default table and return its id.
    pub fn add_table(&mut self) -> String {
        let count = self.schema.tables.len();
        let offset = NEW_TABLE_ORIGIN + NEW_TABLE_STAGGER * count as f64;
        let table = Table::new(format!("Table{}", count + 1)).with_position(offset, offset);
        let id = table.id.clone();
        self.mutate(|schema| schema.add_table(table));
        id
    }

    pub fn update_table(&mut self, table_id: &str, update: TableUpdate) -> bool {
        self.mutate(|schema| schema.update_table(table_id, update))
    }

    pub fn delete_table(&mut self, table_id: &str) -> Option<Table> {
        let mut removed = None;
        self.mutate(|schema| {
            removed = schema.delete_table(table_id);
            removed.is_some()
        });
        if removed.is_some() && self.selected_table.as_deref() == Some(table_id) {
            self.selected_table = None;
            self.selected_column = None;
        }
        if self.drag.as_ref().is_some_and(|d| d.table_id == table_id) {
            self.drag = None;
        }
        removed
    }

    pub fn move_table(&mut self, table_id: &str, x: f64, y: f64) -> bool {
        self.mutate(|schema| schema.move_table(table_id, x, y))
    }

    // ========================================================================
    // Columns
    // ========================================================================

    /// Append a default column and return its id.
    pub fn add_column(&mut self, table_id: &str) -> Result<String> {
        let column = Column::placeholder();
        let id = column.id.clone();
        if self.mutate(|schema| schema.add_column(table_id, column)) {
            Ok(id)
        } else {
            Err(ModelerError::table_not_found(table_id))
        }
    }

    pub fn update_column(&mut self, table_id: &str, column_id: &str, update: ColumnUpdate) -> bool {
        self.mutate(|schema| schema.update_column(table_id, column_id, update))
    }

    pub fn delete_column(&mut self, table_id: &str, column_id: &str) -> Option<Column> {
        let mut removed = None;
        self.mutate(|schema| {
            removed = schema.delete_column(table_id, column_id);
            removed.is_some()
        });
        if removed.is_some()
            && self.selected_table.as_deref() == Some(table_id)
            && self.selected_column.as_deref() == Some(column_id)
        {
            self.selected_column = None;
        }
        removed
    }

    pub fn choose_fk_table(&mut self, table_id: &str, column_id: &str, target_table_id: &str) -> bool {
        self.mutate(|schema| schema.choose_fk_table(table_id, column_id, target_table_id))
    }

    pub fn choose_fk_column(&mut self, table_id: &str, column_id: &str, target_column_id: &str) -> bool {
        self.mutate(|schema| schema.choose_fk_column(table_id, column_id, target_column_id))
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Draw an explicit relationship between two existing tables.
    pub fn add_relationship(
        &mut self,
        from: &str,
        to: &str,
        from_column: &str,
        to_column: &str,
        kind: RelationshipKind,
    ) -> Result<String> {
        for table_id in [from, to] {
            if self.schema.table(table_id).is_none() {
                return Err(ModelerError::table_not_found(table_id));
            }
        }
        let relationship = Relationship::new(from, to, from_column, to_column, kind);
        let id = relationship.id.clone();
        self.mutate(|schema| schema.add_relationship(relationship));
        Ok(id)
    }

    // ========================================================================
    // Selection and panels
    // ========================================================================

    pub fn selected_table(&self) -> Option<&Table> {
        self.schema.table(self.selected_table.as_deref()?)
    }

    pub fn selected_column(&self) -> Option<&Column> {
        let table = self.selected_table()?;
        table.column(self.selected_column.as_deref()?)
    }

    /// Select a table, or clear the selection with `None`.
    pub fn select_table(&mut self, table_id: Option<&str>) -> Result<()> {
        match table_id {
            Some(id) if self.schema.table(id).is_none() => Err(ModelerError::table_not_found(id)),
            _ => {
                if self.selected_table.as_deref() != table_id {
                    self.selected_column = None;
                }
                self.selected_table = table_id.map(str::to_string);
                Ok(())
            }
        }
    }

    /// Select a column of the currently selected table.
    pub fn select_column(&mut self, column_id: Option<&str>) -> Result<()> {
        if let Some(id) = column_id {
            if self.selected_table().and_then(|t| t.column(id)).is_none() {
                return Err(ModelerError::column_not_found(id));
            }
        }
        self.selected_column = column_id.map(str::to_string);
        Ok(())
    }

    pub fn show_code(&self) -> bool {
        self.show_code
    }

    pub fn toggle_code(&mut self) -> bool {
        self.show_code = !self.show_code;
        self.show_code
    }

    // ========================================================================
    // Dragging
    // ========================================================================

    /// Start dragging a table; also selects it.
    pub fn begin_drag(&mut self, table_id: &str, pointer: Point) -> Result<()> {
        let origin = self
            .schema
            .table(table_id)
            .map(Table::position)
            .ok_or_else(|| ModelerError::table_not_found(table_id))?;
        self.select_table(Some(table_id))?;
        self.drag = Some(DragSession::start(table_id, pointer, origin));
        Ok(())
    }

    /// Commit the position for the current pointer location.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag.clone() else {
            return false;
        };
        let (x, y) = drag.update(pointer);
        self.move_table(drag.table_id(), x, y)
    }

    pub fn end_drag(&mut self) -> Option<DragSession> {
        self.drag.take()
    }

    pub fn dragging(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    pub fn ddl(&self) -> String {
        ddl::generate_ddl(&self.schema)
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene::build(&self.schema)
    }

    pub fn export(&self, format: ExportFormat, now: DateTime<Utc>) -> Result<ExportBlob> {
        files::export_blob(&self.schema, format, now)
    }

    // ========================================================================
    // Import
    // ========================================================================

    /// Replace the whole schema with a decoded JSON document.
    ///
    /// On failure the current schema is left untouched.
    pub fn import_json(&mut self, text: &str) -> Result<()> {
        match codec::decode(text) {
            Ok(schema) => {
                self.replace_schema(schema);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Import failed");
                Err(e)
            }
        }
    }

    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = files::read_text_file(path)?;
        self.import_json(&text)
    }

    /// Swap in a whole schema (import, shared link, demo) and clear selection.
    pub fn replace_schema(&mut self, schema: Schema) {
        tracing::info!(tables = schema.tables.len(), "Schema replaced");
        self.schema = Arc::new(schema);
        self.selected_table = None;
        self.selected_column = None;
        self.drag = None;
        self.persist();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    fn mutate(&mut self, op: impl FnOnce(&mut Schema) -> bool) -> bool {
        let changed = op(Arc::make_mut(&mut self.schema));
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.schema) {
            tracing::error!(error = %e, "Failed to save schema");
        }
    }
}
