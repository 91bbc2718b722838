//! Core domain models and business logic for database schema modelling

pub mod codec;
pub mod config;
pub mod connector;
pub mod ddl;
pub mod error;
pub mod files;
pub mod geometry;
pub mod ops;
pub mod scene;
mod schema;
pub mod session;
pub mod sharing;
pub mod store;
pub mod svg;

pub use error::{EntityKind, ModelerError, Result};
pub use ops::{ColumnOps, ColumnUpdate, RelationshipOps, TableOps, TableUpdate};
pub use schema::*;
pub use session::{DragSession, Session};
pub use store::{FileStore, MemoryStore, STORAGE_KEY, SchemaStore};
