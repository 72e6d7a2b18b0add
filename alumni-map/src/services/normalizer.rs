//! Tabular ingestion normalizer
//!
//! Parses CSV bytes (uploaded file or sheet export) into [`RawImportRow`]s
//! keyed by canonical column names. Both import paths share this module so
//! they validate identically.

use std::collections::HashMap;

use super::ImportError;

/// Columns every import must provide
pub const REQUIRED_COLUMNS: [&str; 2] = ["name", "location"];

/// One data row: canonical column name → raw cell text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawImportRow {
    values: HashMap<String, String>,
}

impl RawImportRow {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Cell value for `column`, `None` if the row has no such cell
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lowercase, trim, and replace each space with `_`
///
/// `" Job Title "` becomes `"job_title"`.
pub fn canonicalize_column(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Parse CSV bytes with a header row into rows
///
/// Fails with [`ImportError::Format`] on invalid UTF-8, malformed CSV or two
/// headers that canonicalize to the same name, and with
/// [`ImportError::Schema`] when a `required` column is missing.
pub fn normalize(raw: &[u8], required: &[&str]) -> Result<Vec<RawImportRow>, ImportError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| ImportError::Format(format!("data is not valid UTF-8: {}", e)))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::Format(e.to_string()))?
        .iter()
        .map(canonicalize_column)
        .collect();

    for (i, header) in headers.iter().enumerate() {
        if headers[..i].contains(header) {
            return Err(ImportError::Format(format!(
                "duplicate column '{}' after header normalization",
                header
            )));
        }
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|column| !headers.iter().any(|h| h.as_str() == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::Schema { missing });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::Format(e.to_string()))?;

        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(ImportError::Format(format!(
                "line {}: expected at most {} fields, found {}",
                line,
                headers.len(),
                record.len()
            )));
        }

        rows.push(RawImportRow::from_pairs(
            headers.iter().map(String::as_str).zip(record.iter()),
        ));
    }

    Ok(rows)
}
