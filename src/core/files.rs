//! File import and export.
//!
//! Both export formats are produced entirely from the schema: JSON via
//! [`codec::encode`] and SVG via [`svg::render_svg`]. This module only
//! names and writes the resulting blobs.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use derive_more::Display;

use super::codec;
use super::error::Result;
use super::schema::Schema;
use super::svg;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ExportFormat {
    #[display("json")]
    Json,
    #[display("svg")]
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Svg => "image/svg+xml",
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            ExportFormat::Json => "db-schema",
            ExportFormat::Svg => "db-diagram",
        }
    }

    /// `db-schema-<millis>.json` or `db-diagram-<millis>.svg`
    pub fn file_name(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}-{}.{}",
            self.file_stem(),
            now.timestamp_millis(),
            self.extension()
        )
    }
}

/// A downloadable export
#[derive(Clone, Debug, PartialEq)]
pub struct ExportBlob {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

pub fn export_blob(schema: &Schema, format: ExportFormat, now: DateTime<Utc>) -> Result<ExportBlob> {
    let contents = match format {
        ExportFormat::Json => codec::encode(schema)?,
        ExportFormat::Svg => svg::render_svg(schema)?,
    };
    Ok(ExportBlob {
        file_name: format.file_name(now),
        mime_type: format.mime_type(),
        contents,
    })
}

pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Write the blob into `dir` and return the full path.
pub fn write_export(dir: impl AsRef<Path>, blob: &ExportBlob) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(&blob.file_name);
    fs::write(&path, &blob.contents)?;
    tracing::info!(path = %path.display(), bytes = blob.contents.len(), "Export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ModelerError;
    use crate::core::schema::create_demo_schema;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
    }

    #[test]
    fn test_export_file_names() {
        assert_eq!(
            ExportFormat::Json.file_name(fixed_now()),
            "db-schema-1700000000123.json"
        );
        assert_eq!(
            ExportFormat::Svg.file_name(fixed_now()),
            "db-diagram-1700000000123.svg"
        );
    }

    #[test]
    fn test_json_export_round_trips() {
        let schema = create_demo_schema();
        let blob = export_blob(&schema, ExportFormat::Json, fixed_now()).unwrap();
        assert_eq!(blob.mime_type, "application/json");
        assert_eq!(codec::decode(&blob.contents).unwrap(), schema);
    }

    #[test]
    fn test_svg_export_of_empty_schema_fails() {
        let err = export_blob(&Schema::new(), ExportFormat::Svg, fixed_now()).unwrap_err();
        assert!(matches!(err, ModelerError::NothingToExport));

        // JSON export of an empty schema is fine
        assert!(export_blob(&Schema::new(), ExportFormat::Json, fixed_now()).is_ok());
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = std::env::temp_dir().join(format!("dbmodeler-files-{}", Uuid::new_v4()));
        let blob = export_blob(&create_demo_schema(), ExportFormat::Svg, fixed_now()).unwrap();

        let path = write_export(&dir, &blob).unwrap();
        assert!(path.ends_with("db-diagram-1700000000123.svg"));
        assert_eq!(read_text_file(&path).unwrap(), blob.contents);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_text_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ModelerError::Io(_)));
    }
}
