//! Product catalog loading
//!
//! Each CSV row becomes one record: a mapping of header field to value. A
//! fixed subset of fields is rendered as embeddable text; the full mapping
//! rides along as metadata on every chunk derived from the record.

use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::document::DocumentChunk;

use super::splitter::LineSplitter;

/// Fields rendered into the embeddable text, in this order
pub const EMBED_FIELDS: &[&str] = &[
    "Sub Category",
    "Price",
    "Discount",
    "Rating",
    "Title",
    "Feature",
    "Product Description",
];

/// One catalog row as a field mapping
#[derive(Debug, Clone)]
pub struct ProductRecord {
    /// Header field -> value
    pub fields: HashMap<String, String>,
}

impl ProductRecord {
    /// Render the embed-field subset as `Field: value` lines
    pub fn embeddable_text(&self) -> String {
        EMBED_FIELDS
            .iter()
            .map(|field| {
                format!(
                    "{}: {}",
                    field,
                    self.fields.get(*field).map(String::as_str).unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Split the record into chunks, each carrying the full field map
    pub fn to_chunks(&self, splitter: &LineSplitter) -> Vec<DocumentChunk> {
        splitter
            .split(&self.embeddable_text())
            .into_iter()
            .map(|content| DocumentChunk::new(content, self.fields.clone()))
            .collect()
    }
}

/// Load every `.csv` file under a directory into records
pub fn load_catalog(dir: &Path) -> Result<Vec<ProductRecord>> {
    let mut records = Vec::new();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }

        tracing::info!(file = %path.display(), "Reading catalog file");
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::internal(format!("Failed to open {}: {}", path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| Error::internal(format!("Failed to read headers: {}", e)))?
            .clone();

        for row in reader.records() {
            let row =
                row.map_err(|e| Error::internal(format!("Failed to read row: {}", e)))?;

            let fields: HashMap<String, String> = headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header.trim().to_string(), value.trim().to_string()))
                .collect();

            records.push(ProductRecord { fields });
        }
    }

    tracing::info!(records = records.len(), "Catalog loaded");
    Ok(records)
}
