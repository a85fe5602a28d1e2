//! Local service directory.
//!
//! Covers the data side of localaid:
//! - CSV ingestion into `services.json` / `index.json`
//! - Loading the directory into memory
//! - Keyword retrieval with a first-listings fallback
//! - A deterministic answer composed from the best match

pub mod fallback;
pub mod ingest;
pub mod retrieve;
pub mod store;
pub mod types;


// Re-export commonly used types
pub use fallback::compose_fallback;
pub use ingest::{ingest_csv, parse_records, ParsedRows};
pub use retrieve::{retrieve, MAX_SOURCES};
pub use store::Directory;
pub use types::{IndexEntry, IngestStats, ScoredRecord, ServiceRecord};
