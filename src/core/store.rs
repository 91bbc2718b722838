//! Local persistence of the working schema.
//!
//! A store maps one string key to the JSON-encoded schema. The session
//! loads it once at startup and writes it back after every mutation.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::codec;
use super::error::{ModelerError, Result};
use super::schema::Schema;

/// Key the working schema is stored under
pub const STORAGE_KEY: &str = "db-modeler-data";

pub trait SchemaStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<Schema>>;

    fn save(&self, schema: &Schema) -> Result<()>;
}

impl<S: SchemaStore + ?Sized> SchemaStore for &S {
    fn load(&self) -> Result<Option<Schema>> {
        (**self).load()
    }

    fn save(&self, schema: &Schema) -> Result<()> {
        (**self).save(schema)
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_key(dir, STORAGE_KEY)
    }

    pub fn with_key(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SchemaStore for FileStore {
    fn load(&self) -> Result<Option<Schema>> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(text) => codec::decode(&text).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ModelerError::Io(e)),
        }
    }

    fn save(&self, schema: &Schema) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let text = codec::encode_compact(schema)?;
        // Write then rename so a crash never leaves a half-written blob
        let tmp = self.dir.join(format!("{}.json.tmp", self.key));
        fs::write(&tmp, text)?;
        fs::rename(&tmp, self.path())?;
        tracing::debug!(path = %self.path().display(), "Schema saved");
        Ok(())
    }
}

/// In-memory key/blob store
#[derive(Debug)]
pub struct MemoryStore {
    key: String,
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            key: STORAGE_KEY.to_string(),
            blobs: RwLock::default(),
        }
    }

    /// Seed the store with a raw blob, as if a previous session had written it.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let store = Self::new();
        store.put_raw(blob);
        store
    }

    pub fn put_raw(&self, blob: impl Into<String>) {
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.insert(self.key.clone(), blob.into());
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.blobs.read().ok()?.get(&self.key).cloned()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStore for MemoryStore {
    fn load(&self) -> Result<Option<Schema>> {
        self.raw().map(|text| codec::decode(&text)).transpose()
    }

    fn save(&self, schema: &Schema) -> Result<()> {
        self.put_raw(codec::encode_compact(schema)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::create_demo_schema;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("dbmodeler-store-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_file_store_missing_file_loads_none() {
        let store = FileStore::new(temp_dir());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir();
        let store = FileStore::new(&dir);
        let schema = create_demo_schema();

        store.save(&schema).unwrap();
        assert!(store.path().ends_with("db-modeler-data.json"));
        assert_eq!(store.load().unwrap(), Some(schema));

        store.save(&Schema::new()).unwrap();
        assert_eq!(store.load().unwrap(), Some(Schema::new()));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_store_corrupt_blob() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        let store = FileStore::with_key(&dir, "broken");
        fs::write(store.path(), "{oops").unwrap();

        assert!(matches!(
            store.load().unwrap_err(),
            ModelerError::MalformedPayload(_)
        ));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let schema = create_demo_schema();
        store.save(&schema).unwrap();
        assert_eq!(store.load().unwrap(), Some(schema));

        let seeded = MemoryStore::with_blob("[1,2]");
        assert!(seeded.load().is_err());
    }

    #[test]
    fn test_store_by_reference() {
        let store = MemoryStore::new();
        let by_ref: &MemoryStore = &store;
        by_ref.save(&Schema::new()).unwrap();
        assert!(store.raw().is_some());
    }
}
