//! Metadata store collaborator: identifier -> hash or signature record.
//!
//! Two implementations are provided: an in-memory map for tests and embedding
//! in other services, and a TOML file store for the CLI.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when reading or writing records.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Hash of a secret image hidden with the structured codec.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub identifier: String,
    /// Hex digest of the grayscale pixel bytes.
    pub secret_hash: String,
    /// `"<height>x<width>"`
    pub secret_size: String,
}

/// Encrypted signature hidden with the text codec.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub identifier: String,
    /// Base64 ciphertext, exactly as embedded in the carrier.
    pub encrypted_signature: String,
    /// Base64 key that opens `encrypted_signature`.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original_filename: Option<String>,
}

/// A stored record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Image(ImageRecord),
    Document(DocumentRecord),
}

impl Record {
    pub fn identifier(&self) -> &str {
        match self {
            Record::Image(r) => &r.identifier,
            Record::Document(r) => &r.identifier,
        }
    }
}

/// `find(identifier) -> record?` and `insert(record)`.
pub trait MetadataStore {
    fn find(&self, identifier: &str) -> Result<Option<Record>, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if the identifier is taken.
    fn insert(&mut self, record: Record) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MetadataStore for MemoryStore {
    fn find(&self, identifier: &str) -> Result<Option<Record>, StoreError> {
        Ok(self.records.get(identifier).cloned())
    }

    fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        let id = record.identifier().to_string();
        if self.records.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        self.records.insert(id, record);
        Ok(())
    }
}

/// On-disk layout of [`FileStore`].
#[derive(Serialize, Deserialize, Debug, Default)]
struct StoreFile {
    #[serde(default)]
    records: Vec<Record>,
}

/// TOML-backed store. The whole file is rewritten on every insert.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: StoreFile,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            StoreFile::default()
        };
        debug!(path = %path.display(), records = file.records.len(), "opened metadata store");
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(&self.file)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl MetadataStore for FileStore {
    fn find(&self, identifier: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .file
            .records
            .iter()
            .find(|r| r.identifier() == identifier)
            .cloned())
    }

    fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        if self.find(record.identifier())?.is_some() {
            return Err(StoreError::AlreadyExists(record.identifier().to_string()));
        }
        self.file.records.push(record);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn image_record(id: &str) -> Record {
        Record::Image(ImageRecord {
            identifier: id.to_string(),
            secret_hash: "00ff".to_string(),
            secret_size: "2x2".to_string(),
        })
    }

    fn document_record(id: &str) -> Record {
        Record::Document(DocumentRecord {
            identifier: id.to_string(),
            encrypted_signature: "c2ln".to_string(),
            key: "a2V5".to_string(),
            original_filename: Some("scan.png".to_string()),
        })
    }

    #[test]
    fn test_memory_store_find_and_insert() {
        let mut store = MemoryStore::new();
        assert!(store.find("a").unwrap().is_none());
        store.insert(image_record("a")).unwrap();
        assert_eq!(store.find("a").unwrap(), Some(image_record("a")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut store = MemoryStore::new();
        store.insert(image_record("a")).unwrap();
        assert!(matches!(
            store.insert(document_record("a")),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("records.toml");

        let mut store = FileStore::open(&path).unwrap();
        store.insert(image_record("img")).unwrap();
        store.insert(document_record("doc")).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.find("img").unwrap(), Some(image_record("img")));
        assert_eq!(reopened.find("doc").unwrap(), Some(document_record("doc")));
        assert!(reopened.find("nope").unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.toml");
        fs::write(&path, "records = 12").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::TomlParseError(_))
        ));
    }
}
