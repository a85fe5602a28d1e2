//! CSV ingestion.
//!
//! Turns a hand-maintained CSV of local services into the JSON directory the
//! server loads, plus a parallel index file with empty vectors.
//!
//! Expected header: `town,category,name,address,phone,hours,area,url,notes`.
//! Header names are matched case-insensitively; extra columns are ignored and
//! missing optional columns read as empty.

use crate::types::{IndexEntry, IngestStats, ServiceRecord};
use localaid_core::config::{DATA_FILE_NAME, INDEX_FILE_NAME};
use localaid_core::{AppError, AppResult};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Records that passed the filter, with per-reason drop counts.
#[derive(Debug, Clone, Default)]
pub struct ParsedRows {
    pub records: Vec<ServiceRecord>,
    pub rows_read: usize,
    pub dropped_missing_town: usize,
    pub dropped_missing_category: usize,
    pub dropped_missing_url: usize,
}

/// Column positions resolved from the header row.
struct Columns {
    positions: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().trim_start_matches('\u{feff}').to_lowercase(), i))
            .collect();
        Self { positions }
    }

    fn has(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    fn get(&self, row: &csv::StringRecord, name: &str) -> String {
        self.positions
            .get(name)
            .and_then(|&i| row.get(i))
            .map(clean_field)
            .unwrap_or_default()
    }
}

/// Trim a field and collapse internal whitespace runs to single spaces.
fn clean_field(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split the `area` column on commas, dropping empty entries.
fn split_area(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(clean_field)
        .filter(|a| !a.is_empty())
        .collect()
}

/// Parse and filter CSV rows from any reader.
///
/// Rows without a town, a category or a link are dropped; the first missing
/// field in that order is the one counted.
pub fn parse_records<R: Read>(reader: R) -> AppResult<ParsedRows> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let columns = Columns::from_headers(csv_reader.headers()?);
    for required in ["town", "category", "url"] {
        if !columns.has(required) {
            return Err(AppError::Ingest(format!(
                "CSV header is missing required column '{}'",
                required
            )));
        }
    }

    let mut parsed = ParsedRows::default();

    for (line, row) in csv_reader.records().enumerate() {
        let row = row?;
        parsed.rows_read += 1;

        let record = ServiceRecord {
            town: columns.get(&row, "town"),
            category: columns.get(&row, "category"),
            name: columns.get(&row, "name"),
            address: columns.get(&row, "address"),
            phone: columns.get(&row, "phone"),
            hours: columns.get(&row, "hours"),
            area: split_area(&columns.get(&row, "area")),
            url: columns.get(&row, "url"),
            notes: columns.get(&row, "notes"),
        };

        if record.town.is_empty() {
            tracing::debug!("Dropping row {}: missing town", line + 2);
            parsed.dropped_missing_town += 1;
        } else if record.category.is_empty() {
            tracing::debug!("Dropping row {}: missing category", line + 2);
            parsed.dropped_missing_category += 1;
        } else if record.url.is_empty() {
            tracing::debug!("Dropping row {} ({}): missing url", line + 2, record.name);
            parsed.dropped_missing_url += 1;
        } else {
            parsed.records.push(record);
        }
    }

    Ok(parsed)
}

/// Ingest a CSV file into `output_dir/services.json` and `output_dir/index.json`.
///
/// # Errors
/// Returns `AppError::Ingest` if the CSV file does not exist or the output
/// cannot be written, and `AppError::Csv` for malformed CSV.
pub fn ingest_csv(csv_path: &Path, output_dir: &Path) -> AppResult<IngestStats> {
    tracing::info!("Ingesting {:?}", csv_path);

    if !csv_path.is_file() {
        return Err(AppError::Ingest(format!(
            "CSV file not found: {:?}",
            csv_path
        )));
    }

    let file = fs::File::open(csv_path).map_err(|e| {
        AppError::Ingest(format!("Failed to open CSV {:?}: {}", csv_path, e))
    })?;
    let parsed = parse_records(file)?;

    fs::create_dir_all(output_dir).map_err(|e| {
        AppError::Ingest(format!(
            "Failed to create output directory {:?}: {}",
            output_dir, e
        ))
    })?;

    let data_path = output_dir.join(DATA_FILE_NAME);
    let index_path = output_dir.join(INDEX_FILE_NAME);

    let index: Vec<IndexEntry> = parsed
        .records
        .iter()
        .cloned()
        .map(IndexEntry::unembedded)
        .collect();

    write_json(&data_path, &parsed.records)?;
    write_json(&index_path, &index)?;

    let stats = IngestStats {
        rows_read: parsed.rows_read,
        records_written: parsed.records.len(),
        dropped_missing_town: parsed.dropped_missing_town,
        dropped_missing_category: parsed.dropped_missing_category,
        dropped_missing_url: parsed.dropped_missing_url,
        data_path,
        index_path,
    };

    tracing::info!(
        "Ingestion complete: {} rows read, {} records written, {} dropped",
        stats.rows_read,
        stats.records_written,
        stats.dropped()
    );

    Ok(stats)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .map_err(|e| AppError::Ingest(format!("Failed to write {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_CSV: &str = "\
town,category,name,address,phone,hours,area,url,notes
Linden,Meals,Senior Meals Co,12 Oak St,555-1111,Mon-Fri 9-5,\"Linden, Oak Park ,,\",http://meals.example,Hot lunches delivered
 Linden ,Transport,Ride Share,,555-2222,,,http://rides.example,
,Meals,No Town Pantry,,,,,http://pantry.example,
Cedar,,No Category,,,,,http://nocat.example,
Cedar,Health,No Link Clinic,,,,,,
";

    #[test]
    fn test_parse_keeps_valid_rows_and_counts_drops() {
        let parsed = parse_records(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(parsed.rows_read, 5);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.dropped_missing_town, 1);
        assert_eq!(parsed.dropped_missing_category, 1);
        assert_eq!(parsed.dropped_missing_url, 1);
    }

    #[test]
    fn test_every_surviving_record_has_town_category_and_url() {
        let parsed = parse_records(SAMPLE_CSV.as_bytes()).unwrap();
        for record in &parsed.records {
            assert!(!record.town.is_empty());
            assert!(!record.category.is_empty());
            assert!(!record.url.is_empty());
        }
    }

    #[test]
    fn test_fields_are_trimmed_and_area_split() {
        let parsed = parse_records(SAMPLE_CSV.as_bytes()).unwrap();

        let meals = &parsed.records[0];
        assert_eq!(meals.area, vec!["Linden".to_string(), "Oak Park".to_string()]);
        assert_eq!(meals.notes, "Hot lunches delivered");

        let rides = &parsed.records[1];
        assert_eq!(rides.town, "Linden");
        assert!(rides.area.is_empty());
        assert!(rides.address.is_empty());
    }

    #[test]
    fn test_headers_are_case_insensitive_and_optional_columns_may_be_missing() {
        let csv = "URL,Town,Category,Name\nhttp://x,Linden,Meals,Senior Meals Co\n";
        let parsed = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].name, "Senior Meals Co");
        assert!(parsed.records[0].phone.is_empty());
    }

    #[test]
    fn test_missing_required_column_is_rejected() {
        let csv = "town,category,name\nLinden,Meals,Senior Meals Co\n";
        let result = parse_records(csv.as_bytes());
        assert!(matches!(result, Err(AppError::Ingest(_))));
    }

    #[test]
    fn test_embedded_newlines_collapse() {
        let csv = "town,category,url,notes\nLinden,Meals,http://x,\"Call ahead\n  to book\"\n";
        let parsed = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(parsed.records[0].notes, "Call ahead to book");
    }

    #[test]
    fn test_ingest_writes_data_and_index_files() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("services.csv");
        fs::write(&csv_path, SAMPLE_CSV).unwrap();
        let out_dir = temp_dir.path().join("out");

        let stats = ingest_csv(&csv_path, &out_dir).unwrap();
        assert_eq!(stats.records_written, 2);
        assert_eq!(stats.dropped(), 3);

        let data: Vec<ServiceRecord> =
            serde_json::from_str(&fs::read_to_string(&stats.data_path).unwrap()).unwrap();
        assert_eq!(data.len(), 2);

        let index: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&stats.index_path).unwrap()).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.iter().all(|e| e["vector"].is_null()));
        assert_eq!(index[0]["item"]["name"], "Senior Meals Co");
    }

    #[test]
    fn test_ingest_missing_csv_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = ingest_csv(&temp_dir.path().join("missing.csv"), temp_dir.path());
        assert!(matches!(result, Err(AppError::Ingest(_))));
    }
}
