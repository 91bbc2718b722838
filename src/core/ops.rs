//! Mutation set of the schema model.
//!
//! Every operation touches exactly one entity except `delete_table`, which
//! also prunes explicit relationships that mention the removed table.
//! Operations on an id that does not resolve are no-ops: they report
//! `false`/`None` instead of failing, so stale UI state can never corrupt
//! the model.

use std::collections::HashSet;

use super::schema::{Column, ForeignKeyRef, Relationship, Schema, Table};

/// Partial update for a table. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the comment
    pub comment: Option<Option<String>>,
    pub columns: Option<Vec<Column>>,
    pub position: Option<(f64, f64)>,
}

impl TableUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn comment(comment: Option<String>) -> Self {
        Self {
            comment: Some(comment),
            ..Default::default()
        }
    }

    /// Positions must be finite and replacement column ids unique.
    fn is_valid(&self) -> bool {
        if let Some((x, y)) = self.position {
            if !x.is_finite() || !y.is_finite() {
                return false;
            }
        }
        if let Some(columns) = &self.columns {
            let mut seen = HashSet::with_capacity(columns.len());
            if !columns.iter().all(|c| seen.insert(c.id.as_str())) {
                return false;
            }
        }
        true
    }

    fn apply(self, table: &mut Table) {
        if let Some(name) = self.name {
            table.name = name;
        }
        if let Some(comment) = self.comment {
            table.comment = comment;
        }
        if let Some(columns) = self.columns {
            table.columns = columns;
        }
        if let Some((x, y)) = self.position {
            table.x = x;
            table.y = y;
        }
    }
}

/// Partial update for a column. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnUpdate {
    pub name: Option<String>,
    pub data_type: Option<String>,
    pub size: Option<Option<String>>,
    pub is_primary: Option<bool>,
    pub is_foreign: Option<bool>,
    pub is_unique: Option<bool>,
    pub is_nullable: Option<bool>,
    pub comment: Option<Option<String>>,
    pub foreign_key: Option<Option<ForeignKeyRef>>,
}

impl ColumnUpdate {
    fn apply(self, column: &mut Column) {
        if let Some(name) = self.name {
            column.name = name;
        }
        if let Some(data_type) = self.data_type {
            column.data_type = data_type;
        }
        if let Some(size) = self.size {
            column.size = size;
        }
        if let Some(is_primary) = self.is_primary {
            column.is_primary = is_primary;
        }
        // Clearing `is_foreign` keeps `foreign_key` as is; the resolver
        // ignores it while the flag is off.
        if let Some(is_foreign) = self.is_foreign {
            column.is_foreign = is_foreign;
        }
        if let Some(is_unique) = self.is_unique {
            column.is_unique = is_unique;
        }
        if let Some(is_nullable) = self.is_nullable {
            column.is_nullable = is_nullable;
        }
        if let Some(comment) = self.comment {
            column.comment = comment;
        }
        if let Some(foreign_key) = self.foreign_key {
            column.foreign_key = foreign_key;
        }
    }
}

/// Table-level operations
pub trait TableOps {
    /// Append a table. Refused (returns `false`) if the id is already taken.
    fn add_table(&mut self, table: Table) -> bool;

    /// Apply a partial update. Refused as a whole if the position is not
    /// finite or the replacement columns repeat an id.
    fn update_table(&mut self, table_id: &str, update: TableUpdate) -> bool;

    /// Remove a table together with every explicit relationship touching it.
    ///
    /// Foreign keys in other tables that point at the removed table are left
    /// in place; they stop resolving and drop out of rendering and DDL.
    fn delete_table(&mut self, table_id: &str) -> Option<Table>;

    /// Set a table's canvas position. Non-finite coordinates are ignored.
    fn move_table(&mut self, table_id: &str, x: f64, y: f64) -> bool;
}

/// Column-level operations, addressed by owning table id and column id
pub trait ColumnOps {
    /// Append a column. Refused if the table is missing or the id is taken.
    fn add_column(&mut self, table_id: &str, column: Column) -> bool;

    fn update_column(&mut self, table_id: &str, column_id: &str, update: ColumnUpdate) -> bool;

    fn delete_column(&mut self, table_id: &str, column_id: &str) -> Option<Column>;

    /// Point a foreign-key column at a new table, resetting the target column.
    fn choose_fk_table(&mut self, table_id: &str, column_id: &str, target_table_id: &str) -> bool;

    /// Complete a foreign key whose target table has already been chosen.
    fn choose_fk_column(&mut self, table_id: &str, column_id: &str, target_column_id: &str)
    -> bool;
}

/// Explicit relationship operations
pub trait RelationshipOps {
    fn add_relationship(&mut self, relationship: Relationship) -> bool;

    fn relationships_of(&self, table_id: &str) -> Vec<&Relationship>;
}

impl Schema {
    fn table_mut(&mut self, table_id: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == table_id)
    }

    fn column_mut(&mut self, table_id: &str, column_id: &str) -> Option<&mut Column> {
        self.table_mut(table_id)?
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
    }
}

impl TableOps for Schema {
    fn add_table(&mut self, table: Table) -> bool {
        if self.table(&table.id).is_some() {
            return false;
        }
        self.tables.push(table);
        true
    }

    fn update_table(&mut self, table_id: &str, update: TableUpdate) -> bool {
        if !update.is_valid() {
            return false;
        }
        match self.table_mut(table_id) {
            Some(table) => {
                update.apply(table);
                true
            }
            None => false,
        }
    }

    fn delete_table(&mut self, table_id: &str) -> Option<Table> {
        let index = self.table_index(table_id)?;
        let removed = self.tables.remove(index);
        self.relationships.retain(|r| !r.touches(table_id));
        Some(removed)
    }

    fn move_table(&mut self, table_id: &str, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        match self.table_mut(table_id) {
            Some(table) => {
                table.x = x;
                table.y = y;
                true
            }
            None => false,
        }
    }
}

impl ColumnOps for Schema {
    fn add_column(&mut self, table_id: &str, column: Column) -> bool {
        let Some(table) = self.table_mut(table_id) else {
            return false;
        };
        if table.column(&column.id).is_some() {
            return false;
        }
        table.columns.push(column);
        true
    }

    fn update_column(&mut self, table_id: &str, column_id: &str, update: ColumnUpdate) -> bool {
        match self.column_mut(table_id, column_id) {
            Some(column) => {
                update.apply(column);
                true
            }
            None => false,
        }
    }

    fn delete_column(&mut self, table_id: &str, column_id: &str) -> Option<Column> {
        let table = self.table_mut(table_id)?;
        let index = table.column_index(column_id)?;
        Some(table.columns.remove(index))
    }

    fn choose_fk_table(&mut self, table_id: &str, column_id: &str, target_table_id: &str) -> bool {
        if table_id == target_table_id {
            return false;
        }
        self.update_column(
            table_id,
            column_id,
            ColumnUpdate {
                foreign_key: Some(Some(ForeignKeyRef::new(target_table_id, ""))),
                ..Default::default()
            },
        )
    }

    fn choose_fk_column(
        &mut self,
        table_id: &str,
        column_id: &str,
        target_column_id: &str,
    ) -> bool {
        let Some(column) = self.column_mut(table_id, column_id) else {
            return false;
        };
        match column.foreign_key.as_mut() {
            Some(fk) if !fk.table_id.is_empty() => {
                fk.column_id = target_column_id.to_string();
                true
            }
            _ => false,
        }
    }
}

impl RelationshipOps for Schema {
    fn add_relationship(&mut self, relationship: Relationship) -> bool {
        if self.relationships.iter().any(|r| r.id == relationship.id) {
            return false;
        }
        self.relationships.push(relationship);
        true
    }

    fn relationships_of(&self, table_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.touches(table_id))
            .collect()
    }
}
