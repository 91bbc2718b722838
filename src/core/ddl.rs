//! `CREATE TABLE` generation.
//!
//! Output is a pure function of the schema: tables and columns are emitted
//! in sequence order and foreign-key clauses follow the column list. Names
//! and comments are written verbatim, without quoting or escaping.

use super::schema::{Column, Schema, Table};

/// Text shown instead of DDL when the schema has no tables
pub const EMPTY_SCHEMA_PLACEHOLDER: &str = "-- No tables created yet";

const INDENT: &str = "  ";

/// Generate DDL for every table, separated by a blank line.
pub fn generate_ddl(schema: &Schema) -> String {
    if schema.tables.is_empty() {
        return EMPTY_SCHEMA_PLACEHOLDER.to_string();
    }

    schema
        .tables
        .iter()
        .map(|table| table_ddl(schema, table))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// DDL for a single table.
///
/// Foreign keys that do not resolve are left out rather than emitted with
/// missing names.
pub fn table_ddl(schema: &Schema, table: &Table) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| format!("{INDENT}{}", column_definition(column)))
        .collect();

    lines.extend(schema.foreign_keys_of(table).map(|link| {
        format!(
            "{INDENT}FOREIGN KEY ({}) REFERENCES {}({})",
            link.from_column.name, link.to_table.name, link.to_column.name
        )
    }));

    let closing = match table.comment_text() {
        Some(comment) => format!(" COMMENT='{}';", comment),
        None => ";".to_string(),
    };

    format!(
        "CREATE TABLE {} (\n{}\n){}",
        table.name,
        lines.join(",\n"),
        closing
    )
}

/// `<name> <type>` followed by the column's inline constraints.
pub fn column_definition(column: &Column) -> String {
    let mut parts = vec![column.name.clone(), column.sql_type()];
    if column.is_primary {
        parts.push("PRIMARY KEY".to_string());
    }
    if !column.is_nullable {
        parts.push("NOT NULL".to_string());
    }
    if let Some(comment) = column.comment_text() {
        parts.push(format!("COMMENT '{}'", comment));
    }
    parts.join(" ")
}
