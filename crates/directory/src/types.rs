//! Directory type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One directory entry describing a local service.
///
/// Records in an ingested directory always carry a town, a category and a
/// link; every other field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceRecord {
    /// Town the service is listed under
    pub town: String,

    /// Service category (e.g., "Meals", "Transport")
    pub category: String,

    /// Provider name
    pub name: String,

    /// Street address
    pub address: String,

    /// Contact phone number
    pub phone: String,

    /// Opening hours, free text
    pub hours: String,

    /// Areas served, in listing order
    pub area: Vec<String>,

    /// Public link where the listing can be verified
    pub url: String,

    /// Free-text notes
    pub notes: String,
}

impl ServiceRecord {
    /// Lowercased text the keyword retriever matches against.
    pub fn haystack(&self) -> String {
        [
            self.town.as_str(),
            self.category.as_str(),
            self.name.as_str(),
            self.address.as_str(),
            self.notes.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

/// A record paired with its keyword score for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredRecord {
    pub record: ServiceRecord,
    pub score: u32,
}

/// Placeholder search-index entry; `vector` is reserved for embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub item: ServiceRecord,
    pub vector: Option<Vec<f32>>,
}

impl IndexEntry {
    /// Create an entry without a vector.
    pub fn unembedded(item: ServiceRecord) -> Self {
        Self { item, vector: None }
    }
}

/// Statistics from an ingestion run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Data rows read from the CSV (header excluded)
    pub rows_read: usize,

    /// Records written to the directory file
    pub records_written: usize,

    /// Rows dropped for a blank town
    pub dropped_missing_town: usize,

    /// Rows dropped for a blank category
    pub dropped_missing_category: usize,

    /// Rows dropped for a blank link
    pub dropped_missing_url: usize,

    /// Where the directory file was written
    pub data_path: PathBuf,

    /// Where the index file was written
    pub index_path: PathBuf,
}

impl IngestStats {
    /// Total rows rejected by the filter.
    pub fn dropped(&self) -> usize {
        self.dropped_missing_town + self.dropped_missing_category + self.dropped_missing_url
    }
}
