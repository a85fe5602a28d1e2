//! In-memory service directory.
//!
//! The directory is read once at startup and shared read-only for the life of
//! the process.

use crate::types::{IndexEntry, ServiceRecord};
use localaid_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Immutable list of service records plus the size of the placeholder index.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    records: Vec<ServiceRecord>,
    index_len: usize,
}

impl Directory {
    /// Build a directory from records already in memory.
    pub fn from_records(records: Vec<ServiceRecord>) -> Self {
        let index_len = records.len();
        Self { records, index_len }
    }

    /// Load the directory and index files written by ingestion.
    ///
    /// A missing file is not an error: the directory (or index) is simply
    /// empty and a warning is logged. Malformed JSON is an error.
    pub fn load(data_path: &Path, index_path: &Path) -> AppResult<Self> {
        let records: Vec<ServiceRecord> = match read_json_array(data_path)? {
            Some(records) => records,
            None => {
                tracing::warn!(
                    "Directory file {:?} not found; run the ingestion step",
                    data_path
                );
                Vec::new()
            }
        };

        let index_len = match read_json_array::<IndexEntry>(index_path)? {
            Some(entries) => entries.len(),
            None => {
                tracing::warn!("Index file {:?} not found", index_path);
                0
            }
        };

        tracing::info!(
            "Loaded {} directory records and {} index entries",
            records.len(),
            index_len
        );

        Ok(Self { records, index_len })
    }

    /// All records, in file order.
    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of entries in the placeholder index.
    pub fn index_len(&self) -> usize {
        self.index_len
    }
}

fn read_json_array<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<Option<Vec<T>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;

    let items = serde_json::from_str(&contents)
        .map_err(|e| AppError::Directory(format!("Failed to parse {:?}: {}", path, e)))?;

    Ok(Some(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_files_gives_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let directory = Directory::load(
            &temp_dir.path().join("services.json"),
            &temp_dir.path().join("index.json"),
        )
        .unwrap();

        assert!(directory.is_empty());
        assert_eq!(directory.index_len(), 0);
    }

    #[test]
    fn test_load_reads_records_and_index() {
        let temp_dir = TempDir::new().unwrap();
        let data_path = temp_dir.path().join("services.json");
        let index_path = temp_dir.path().join("index.json");

        fs::write(
            &data_path,
            r#"[{"town":"Linden","category":"Meals","name":"Senior Meals Co","url":"http://x","area":["Linden"]}]"#,
        )
        .unwrap();
        fs::write(
            &index_path,
            r#"[{"item":{"town":"Linden","category":"Meals","url":"http://x"},"vector":null}]"#,
        )
        .unwrap();

        let directory = Directory::load(&data_path, &index_path).unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.index_len(), 1);
        assert_eq!(directory.records()[0].name, "Senior Meals Co");
    }

    #[test]
    fn test_load_malformed_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let data_path = temp_dir.path().join("services.json");
        fs::write(&data_path, "{not json").unwrap();

        let result = Directory::load(&data_path, &temp_dir.path().join("index.json"));
        assert!(matches!(result, Err(AppError::Directory(_))));
    }

    #[test]
    fn test_load_unreadable_file_is_an_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let data_path = temp_dir.path().join("services.json");
        fs::create_dir(&data_path).unwrap();

        let result = Directory::load(&data_path, &temp_dir.path().join("index.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_from_records_counts_index() {
        let directory = Directory::from_records(vec![ServiceRecord::default(); 3]);
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.index_len(), 3);
    }
}
