//! JSON encoding of the schema.
//!
//! The same document format is used for local persistence, file
//! export/import and the share service. Decoding accepts payloads missing
//! `tables` or `relationships` but does not check referential integrity:
//! dangling foreign keys load fine and simply never resolve.

use serde_json::Value;

use super::error::{ModelerError, Result};
use super::schema::Schema;

/// Pretty-printed JSON (two-space indent), as written to export files.
pub fn encode(schema: &Schema) -> Result<String> {
    serde_json::to_string_pretty(schema).map_err(|e| ModelerError::Encode(e.to_string()))
}

/// Compact JSON for storage and network transfer.
pub fn encode_compact(schema: &Schema) -> Result<String> {
    serde_json::to_string(schema).map_err(|e| ModelerError::Encode(e.to_string()))
}

pub fn decode(text: &str) -> Result<Schema> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ModelerError::MalformedPayload(e.to_string()))?;
    decode_value(value)
}

/// Decode an already-parsed JSON document. The top level must be an object.
pub fn decode_value(value: Value) -> Result<Schema> {
    if !value.is_object() {
        return Err(ModelerError::MalformedPayload(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value).map_err(|e| ModelerError::MalformedPayload(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{
        Column, ColumnType, ForeignKeyRef, Relationship, RelationshipKind, Table, create_demo_schema,
    };

    #[test]
    fn test_round_trip_demo_schema() {
        let schema = create_demo_schema();
        let decoded = decode(&encode(&schema).unwrap()).unwrap();
        assert_eq!(decoded, schema);

        let compact = decode(&encode_compact(&schema).unwrap()).unwrap();
        assert_eq!(compact, schema);
    }

    #[test]
    fn test_round_trip_preserves_transient_and_odd_values() {
        let mut schema = Schema::new();
        schema.tables.push(
            Table::new("weird")
                .with_id("w")
                .with_position(-12.375, 0.1 + 0.2)
                .with_comment("")
                .add_column(
                    Column::new("ref", "CUSTOM(7)")
                        .with_id("w-ref")
                        .references("gone", "")
                        .with_size("3"),
                )
                .add_column(Column::new("flag", ColumnType::Boolean).with_id("w-flag").unique()),
        );
        schema.relationships.push(
            Relationship::new("w", "missing", "w-ref", "", RelationshipKind::ManyToMany).with_id("r"),
        );

        let decoded = decode(&encode(&schema).unwrap()).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn test_wire_field_names() {
        let schema = create_demo_schema();
        let value: Value = serde_json::from_str(&encode(&schema).unwrap()).unwrap();

        let posts = &value["tables"][1];
        assert_eq!(posts["x"], 500.0);
        let user_id = &posts["columns"][1];
        assert_eq!(user_id["type"], "INT");
        assert_eq!(user_id["isForeign"], true);
        assert_eq!(user_id["isNullable"], false);
        assert_eq!(user_id["foreignKey"]["tableId"], "users");
        assert_eq!(user_id["foreignKey"]["columnId"], "users-id");
        assert_eq!(value["relationships"][0]["type"], "one-to-many");
        assert_eq!(value["relationships"][0]["fromColumn"], "users-id");
    }

    #[test]
    fn test_encode_is_indented() {
        let text = encode(&create_demo_schema()).unwrap();
        assert!(text.starts_with("{\n  \"tables\": ["));
    }

    #[test]
    fn test_decode_empty_document() {
        let schema = decode(r#"{"tables":[],"relationships":[]}"#).unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn test_decode_missing_keys_defaults_to_empty() {
        assert_eq!(decode("{}").unwrap(), Schema::new());

        let only_tables = decode(r#"{"tables":[{"id":"t","name":"t","x":1,"y":2,"columns":[]}]}"#)
            .unwrap();
        assert_eq!(only_tables.tables.len(), 1);
        assert!(only_tables.relationships.is_empty());

        let nulls = decode(r#"{"tables":null,"relationships":null}"#).unwrap();
        assert!(nulls.is_empty());
    }

    #[test]
    fn test_decode_applies_column_defaults() {
        let text = r#"{"tables":[{"id":"t","name":"t","x":0,"y":0,
            "columns":[{"id":"c","name":"c","type":"INT"}]}]}"#;
        let column = decode(text).unwrap().tables[0].columns[0].clone();
        assert!(!column.is_primary);
        assert!(!column.is_foreign);
        assert!(!column.is_unique);
        assert!(column.is_nullable);
        assert!(column.foreign_key.is_none());
    }

    #[test]
    fn test_decode_accepts_dangling_foreign_key() {
        let text = r#"{"tables":[{"id":"t","name":"t","x":0,"y":0,"columns":[
            {"id":"c","name":"c","type":"INT","isForeign":true,
             "foreignKey":{"tableId":"nowhere","columnId":"nothing"}}]}]}"#;
        let schema = decode(text).unwrap();
        let column = &schema.tables[0].columns[0];
        assert_eq!(
            column.foreign_key,
            Some(ForeignKeyRef::new("nowhere", "nothing"))
        );
        assert!(schema.resolve_foreign_key(column).is_none());
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode("{not json").unwrap_err();
        assert!(matches!(err, ModelerError::MalformedPayload(_)));
    }

    #[test]
    fn test_decode_rejects_non_object_top_level() {
        for text in ["[]", "[[], []]", "42", "\"tables\"", "null"] {
            let err = decode(text).unwrap_err();
            assert!(matches!(err, ModelerError::MalformedPayload(_)), "{text}");
        }
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let err = decode(r#"{"tables":"users"}"#).unwrap_err();
        assert!(matches!(err, ModelerError::MalformedPayload(_)));

        let err = decode(r#"{"tables":[{"name":"no id"}]}"#).unwrap_err();
        assert!(matches!(err, ModelerError::MalformedPayload(_)));
    }
}
