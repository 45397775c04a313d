//! Delimited-text ingestion with uniform numeric coercion.
//!
//! Every cell goes through [`Value::coerce`]; there are no per-column types.
//! Problems in individual rows or cells never abort the load: the row is
//! repaired (padded or truncated) and a [`ParseWarning`] is recorded instead.

use std::io::Read;
use std::path::Path;

use ahash::AHashSet;
use csv::{ReaderBuilder, Trim};
use thiserror::Error;

use dv_core::{Dataset, Value};
use crate::DataError;

/// Row-level warnings kept before the rest are only counted
const MAX_ROW_WARNINGS: usize = 20;

/// Reader settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    /// Tab for `.tsv`/`.tab` files, comma otherwise
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("tsv") | Some("tab") => Self { delimiter: b'\t' },
            _ => Self::default(),
        }
    }
}

/// A non-fatal problem found while reading a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow { line: u64, expected: usize, found: usize },

    #[error("line {line}: invalid UTF-8 replaced")]
    InvalidUtf8 { line: u64 },

    #[error("column '{dimension}': {count} empty cells (first on line {first_line})")]
    MissingCells { dimension: String, count: usize, first_line: u64 },

    #[error("column '{dimension}': {text_cells} non-numeric cells kept as text (first on line {first_line})")]
    MixedColumn { dimension: String, text_cells: usize, first_line: u64 },

    #[error("duplicate or empty header '{original}' renamed to '{renamed}'")]
    RenamedHeader { original: String, renamed: String },

    #[error("{0} more row warnings not shown")]
    Truncated(usize),

    #[error("the file has a header but no data rows")]
    NoRows,
}

/// Result of a load: the dataset plus everything that had to be repaired
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub source_name: String,
    pub dataset: Dataset,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Default)]
struct ColumnStats {
    numbers: usize,
    text: usize,
    missing: usize,
    first_text: Option<u64>,
    first_missing: Option<u64>,
}

/// Parse an in-memory table
pub fn parse_str(source_name: &str, text: &str, options: CsvOptions) -> Result<LoadedTable, DataError> {
    parse_reader(source_name, text.as_bytes(), options)
}

/// Parse a table with a header row from any reader
pub fn parse_reader<R: Read>(source_name: &str, reader: R, options: CsvOptions) -> Result<LoadedTable, DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut warnings = Vec::new();
    let raw_headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.is_empty()) {
        return Err(DataError::EmptyInput(source_name.to_string()));
    }
    let headers = unique_headers(raw_headers, &mut warnings);
    let width = headers.len();

    let mut stats: Vec<ColumnStats> = (0..width).map(|_| ColumnStats::default()).collect();
    let mut rows = Vec::new();
    let mut row_warnings = 0usize;
    let mut push_row_warning = |warnings: &mut Vec<ParseWarning>, warning: ParseWarning| {
        row_warnings += 1;
        if row_warnings <= MAX_ROW_WARNINGS {
            warnings.push(warning);
        }
    };

    for result in csv_reader.byte_records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != width {
            push_row_warning(
                &mut warnings,
                ParseWarning::RaggedRow {
                    line,
                    expected: width,
                    found: record.len(),
                },
            );
        }

        let mut values = Vec::with_capacity(width);
        let mut lossy = false;
        for column in 0..width {
            let raw = record.get(column).unwrap_or_default();
            let cell = match std::str::from_utf8(raw) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    lossy = true;
                    String::from_utf8_lossy(raw).into_owned()
                }
            };
            let value = Value::coerce(&cell);

            let column_stats = &mut stats[column];
            if value.is_number() {
                column_stats.numbers += 1;
            } else if value.is_missing() {
                column_stats.missing += 1;
                column_stats.first_missing.get_or_insert(line);
            } else {
                column_stats.text += 1;
                column_stats.first_text.get_or_insert(line);
            }
            values.push(value);
        }
        if lossy {
            push_row_warning(&mut warnings, ParseWarning::InvalidUtf8 { line });
        }
        rows.push(values);
    }

    if row_warnings > MAX_ROW_WARNINGS {
        warnings.push(ParseWarning::Truncated(row_warnings - MAX_ROW_WARNINGS));
    }

    // Cells only matter for columns that are otherwise numeric
    for (dimension, s) in headers.iter().zip(&stats) {
        if s.numbers == 0 {
            continue;
        }
        if let (true, Some(first_line)) = (s.text > 0, s.first_text) {
            warnings.push(ParseWarning::MixedColumn {
                dimension: dimension.clone(),
                text_cells: s.text,
                first_line,
            });
        }
        if let (true, Some(first_line)) = (s.missing > 0, s.first_missing) {
            warnings.push(ParseWarning::MissingCells {
                dimension: dimension.clone(),
                count: s.missing,
                first_line,
            });
        }
    }

    if rows.is_empty() {
        warnings.push(ParseWarning::NoRows);
    }

    let dataset = Dataset::new(headers, rows)?;
    tracing::debug!(
        "Parsed '{}': {} rows, {} columns, {} warnings",
        source_name,
        dataset.len(),
        width,
        warnings.len()
    );

    Ok(LoadedTable {
        source_name: source_name.to_string(),
        dataset,
        warnings,
    })
}

/// Make header names unique and non-empty
fn unique_headers(raw: Vec<String>, warnings: &mut Vec<ParseWarning>) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (i, original) in raw.into_iter().enumerate() {
        let base = if original.is_empty() {
            format!("Column {}", i + 1)
        } else {
            original.clone()
        };
        let mut name = base.clone();
        let mut n = 2;
        while seen.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        if name != original {
            warnings.push(ParseWarning::RenamedHeader {
                original,
                renamed: name.clone(),
            });
        }
        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}
