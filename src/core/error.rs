//! Error taxonomy shared by import, persistence, export and sharing.

use derive_more::Display;

/// Kind of entity an id failed to resolve to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum EntityKind {
    #[display("Table")]
    Table,
    #[display("Column")]
    Column,
    #[display("Relationship")]
    Relationship,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Failed to encode schema: {0}")]
    Encode(String),

    #[error("Share capacity exceeded")]
    CapacityExceeded,

    #[error("Shared schema {id} not found or expired")]
    Expired { id: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No tables to export")]
    NothingToExport,
}

pub type Result<T> = std::result::Result<T, ModelerError>;

impl ModelerError {
    pub fn table_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Table,
            id: id.into(),
        }
    }

    pub fn column_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Column,
            id: id.into(),
        }
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            ModelerError::NotFound { kind, .. } => {
                format!("{kind} no longer exists.")
            }
            ModelerError::MalformedPayload(_) => {
                "Failed to import file. Please check the file format.".to_string()
            }
            ModelerError::Encode(_) => "Failed to export the schema.".to_string(),
            ModelerError::CapacityExceeded => {
                "Share storage is full. Please try again later.".to_string()
            }
            ModelerError::Expired { .. } => {
                "Diagram not found. The link has expired or is invalid.".to_string()
            }
            ModelerError::Transport(_) => {
                "Could not reach the share service. Please try again.".to_string()
            }
            ModelerError::Io(_) => "Could not read or write the file.".to_string(),
            ModelerError::NothingToExport => "No tables to export".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ModelerError::table_not_found("t1").to_string(),
            "Table not found: t1"
        );
        assert_eq!(
            ModelerError::MalformedPayload("eof".into()).to_string(),
            "Malformed payload: eof"
        );
        assert_eq!(ModelerError::NothingToExport.to_string(), "No tables to export");
    }

    #[test]
    fn test_expired_and_transport_messages_differ() {
        let expired = ModelerError::Expired { id: "abc".into() }.user_message();
        let transport = ModelerError::Transport("reset".into()).user_message();
        assert_ne!(expired, transport);
        assert!(expired.contains("expired"));
    }

    #[test]
    fn test_io_conversion() {
        let err: ModelerError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ModelerError::Io(_)));
    }
}
