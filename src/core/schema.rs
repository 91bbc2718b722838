use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Column types offered by the column editor.
///
/// `Column::data_type` stays a free string so that payloads carrying other
/// types still load; this enum is the vocabulary new columns pick from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum ColumnType {
    #[display("INT")]
    Int,
    #[display("BIGINT")]
    BigInt,
    #[display("VARCHAR(255)")]
    Varchar,
    #[display("TEXT")]
    Text,
    #[display("BOOLEAN")]
    Boolean,
    #[display("DATE")]
    Date,
    #[display("TIMESTAMP")]
    Timestamp,
    #[display("DECIMAL")]
    Decimal,
}

impl ColumnType {
    pub const ALL: [ColumnType; 8] = [
        ColumnType::Int,
        ColumnType::BigInt,
        ColumnType::Varchar,
        ColumnType::Text,
        ColumnType::Boolean,
        ColumnType::Date,
        ColumnType::Timestamp,
        ColumnType::Decimal,
    ];

    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Int => "INT",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Varchar => "VARCHAR(255)",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Decimal => "DECIMAL",
        }
    }
}

impl From<ColumnType> for String {
    fn from(value: ColumnType) -> Self {
        value.as_sql().to_string()
    }
}

/// Target of a foreign-key column.
///
/// `column_id` is empty while the user has picked a table but not yet a
/// column; that state is valid and simply never resolves.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyRef {
    #[serde(default)]
    pub table_id: String,
    #[serde(default)]
    pub column_id: String,
}

impl ForeignKeyRef {
    pub fn new(table_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            column_id: column_id.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.table_id.is_empty() && !self.column_id.is_empty()
    }
}

/// Table column
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: String,
    /// Size qualifier appended as `TYPE(size)` when the type carries none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_foreign: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyRef>,
}

fn default_nullable() -> bool {
    true
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id: new_id("col"),
            name: name.into(),
            data_type: data_type.into(),
            size: None,
            is_primary: false,
            is_foreign: false,
            is_unique: false,
            is_nullable: true,
            comment: None,
            foreign_key: None,
        }
    }

    /// The column the editor appends when "Add" is pressed
    pub fn placeholder() -> Self {
        Self::new("new_column", ColumnType::Varchar)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary = true;
        self.is_nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn references(mut self, table_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        self.is_foreign = true;
        self.foreign_key = Some(ForeignKeyRef::new(table_id, column_id));
        self
    }

    /// Type as written in DDL, including the size qualifier if one applies.
    pub fn sql_type(&self) -> String {
        match self.size.as_deref().map(str::trim) {
            Some(size) if !size.is_empty() && !self.data_type.contains('(') => {
                format!("{}({})", self.data_type, size)
            }
            _ => self.data_type.clone(),
        }
    }

    /// Comment text, with an empty string treated as absent
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

/// Table placed on the canvas
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Table {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id("table"),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            columns: Vec::new(),
            comment: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }
}

/// User-drawn relationship between two tables.
///
/// Purely a visual annotation: it never contributes to generated DDL.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub from_column: String,
    #[serde(default)]
    pub to_column: String,
    #[serde(rename = "type", default)]
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        from_column: impl Into<String>,
        to_column: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            id: new_id("rel"),
            from: from.into(),
            to: to.into(),
            from_column: from_column.into(),
            to_column: to_column.into(),
            kind,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn touches(&self, table_id: &str) -> bool {
        self.from == table_id || self.to == table_id
    }
}

/// Cardinality of an explicit relationship
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    #[display("1:1")]
    OneToOne,
    #[default]
    #[display("1:N")]
    OneToMany,
    #[display("N:M")]
    ManyToMany,
}

/// The unit of persistence and export: ordered tables plus explicit relationships.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Schema {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tables: Vec<Table>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub relationships: Vec<Relationship>,
}

/// A foreign key whose target table and column both resolve.
#[derive(Clone, Copy, Debug)]
pub struct ForeignKeyLink<'a> {
    pub from_table: &'a Table,
    pub from_column: &'a Column,
    pub to_table: &'a Table,
    pub to_column: &'a Column,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.relationships.is_empty()
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn table_index(&self, id: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.id == id)
    }

    pub fn column(&self, table_id: &str, column_id: &str) -> Option<&Column> {
        self.table(table_id)?.column(column_id)
    }

    /// Resolve a column's foreign key.
    ///
    /// This is the only place deciding whether a foreign key is live: the
    /// column must be flagged foreign and both the referenced table and the
    /// referenced column must currently exist. Everything that draws or emits
    /// foreign keys goes through here.
    pub fn resolve_foreign_key<'a>(&'a self, column: &Column) -> Option<(&'a Table, &'a Column)> {
        if !column.is_foreign {
            return None;
        }
        let target = column.foreign_key.as_ref().filter(|fk| fk.is_complete())?;
        let table = self.table(&target.table_id)?;
        let column = table.column(&target.column_id)?;
        Some((table, column))
    }

    /// Every resolvable foreign key, in table order then column order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = ForeignKeyLink<'_>> {
        self.tables.iter().flat_map(move |table| self.foreign_keys_of(table))
    }

    pub fn foreign_keys_of<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = ForeignKeyLink<'a>> {
        table.columns.iter().filter_map(move |column| {
            let (to_table, to_column) = self.resolve_foreign_key(column)?;
            Some(ForeignKeyLink {
                from_table: table,
                from_column: column,
                to_table,
                to_column,
            })
        })
    }

    /// Tables a column of `table_id` may reference (every other table).
    pub fn fk_target_tables(&self, table_id: &str) -> impl Iterator<Item = &Table> {
        let owner = table_id.to_string();
        self.tables.iter().filter(move |t| t.id != owner)
    }

    /// Columns selectable once `target_table_id` has been chosen.
    pub fn fk_target_columns(&self, target_table_id: &str) -> &[Column] {
        self.table(target_table_id)
            .map(|t| t.columns.as_slice())
            .unwrap_or(&[])
    }
}

/// Treat an explicit `null` the same as a missing key.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Build a small demo schema (users, posts, comments).
pub fn create_demo_schema() -> Schema {
    let users = Table::new("users")
        .with_id("users")
        .with_position(100.0, 100.0)
        .with_comment("Registered accounts")
        .add_column(Column::new("id", ColumnType::Int).with_id("users-id").primary_key())
        .add_column(
            Column::new("username", ColumnType::Varchar)
                .with_id("users-username")
                .not_null()
                .unique(),
        )
        .add_column(
            Column::new("email", ColumnType::Varchar)
                .with_id("users-email")
                .not_null()
                .unique(),
        )
        .add_column(Column::new("created_at", ColumnType::Timestamp).with_id("users-created-at"));

    let posts = Table::new("posts")
        .with_id("posts")
        .with_position(500.0, 100.0)
        .add_column(Column::new("id", ColumnType::Int).with_id("posts-id").primary_key())
        .add_column(
            Column::new("user_id", ColumnType::Int)
                .with_id("posts-user-id")
                .not_null()
                .references("users", "users-id"),
        )
        .add_column(Column::new("title", ColumnType::Varchar).with_id("posts-title").not_null())
        .add_column(Column::new("content", ColumnType::Text).with_id("posts-content"));

    let comments = Table::new("comments")
        .with_id("comments")
        .with_position(500.0, 450.0)
        .add_column(Column::new("id", ColumnType::Int).with_id("comments-id").primary_key())
        .add_column(
            Column::new("post_id", ColumnType::Int)
                .with_id("comments-post-id")
                .not_null()
                .references("posts", "posts-id"),
        )
        .add_column(
            Column::new("user_id", ColumnType::Int)
                .with_id("comments-user-id")
                .not_null()
                .references("users", "users-id"),
        )
        .add_column(
            Column::new("body", ColumnType::Text)
                .with_id("comments-body")
                .with_comment("Markdown source"),
        );

    Schema {
        tables: vec![users, posts, comments],
        relationships: vec![
            Relationship::new(
                "users",
                "posts",
                "users-id",
                "posts-user-id",
                RelationshipKind::OneToMany,
            )
            .with_id("rel-user-posts"),
        ],
    }
}
