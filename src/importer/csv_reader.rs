// ==========================================
// Panel Load Engineering - CSV row ingestion
// ==========================================
// Responsibility: read a spreadsheet export into headers plus
// column-name -> string-value row maps for the upload stage
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Parsed upload payload: ordered headers and one map per data row.
#[derive(Debug, Clone)]
pub struct ParsedRows {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

/// Read a CSV file into row maps. Header row is required.
pub fn read_csv_file<P: AsRef<Path>>(path: P) -> ImportResult<ParsedRows> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileReadError(format!(
            "file not found: {}",
            path.display()
        )));
    }
    let file = File::open(path)?;
    read_csv(file)
}

/// Read CSV content from any reader; used directly by tests.
pub fn read_csv<R: Read>(reader: R) -> ImportResult<ParsedRows> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            let value = record.get(i).unwrap_or("").to_string();
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    debug!(rows = rows.len(), columns = headers.len(), "CSV parsed");
    Ok(ParsedRows { headers, rows })
}
