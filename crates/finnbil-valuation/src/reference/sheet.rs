//! Loader for the historical list-price sheet.
//!
//! The sheet is a CSV export holding several yearly price lists back to back:
//!
//! ```text
//! 01.11.2019
//! Modellnavn,Type,Dører,Seter,Motor,Effekt,Drift,Gir,Lengde,Vekt,Forbruk,CO2,NOx,Pris
//! RAV4 Hybrid AWD-i Executive,SUV,5,5,2.5,222/163,AWD,aut,4600,1750,"4,8",109,3,"527 100"
//! ```
//!
//! A `DD.MM.YYYY` line starts the list for that year, `Modellnavn` lines are
//! column headers, and data rows carry the model name in column 0 and the
//! list price in column 13.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{ReferencePrices, ReferenceRecord};
use crate::error::ReferenceLoadError;

const MODEL_COLUMN: usize = 0;
const PRICE_COLUMN: usize = 13;

static YEAR_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.(\d{4})").expect("valid year header regex"));

/// Result of parsing a price sheet.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub prices: ReferencePrices,
    /// Data-looking rows that were dropped (too few columns, missing model
    /// name, non-numeric price, or no year header seen yet).
    pub skipped_rows: usize,
}

/// Parses a price sheet from any reader.
///
/// # Errors
///
/// Returns [`ReferenceLoadError::Csv`] if the input is not readable CSV
/// (for example invalid UTF-8). Malformed rows are skipped, not fatal.
pub fn parse_reference_sheet<R: Read>(reader: R) -> Result<ParsedSheet, ReferenceLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped_rows = 0usize;
    let mut current_year: Option<i32> = None;

    for row in csv_reader.records() {
        let row = row?;
        let first = row.get(MODEL_COLUMN).map_or("", str::trim);

        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        if let Some(year) = parse_year_header(first) {
            current_year = Some(year);
            continue;
        }

        if first.starts_with("Modellnavn") {
            continue;
        }

        let Some(year) = current_year else {
            skipped_rows += 1;
            continue;
        };

        match parse_data_row(&row, year) {
            Some(record) => records.push(record),
            None => {
                tracing::debug!(row = ?row, "skipping malformed reference row");
                skipped_rows += 1;
            }
        }
    }

    Ok(ParsedSheet {
        prices: ReferencePrices::new(records),
        skipped_rows,
    })
}

/// Loads and parses the price sheet at `path`.
///
/// # Errors
///
/// Returns [`ReferenceLoadError::Io`] if the file cannot be opened, or
/// [`ReferenceLoadError::Csv`] if it is not readable CSV.
pub fn load_reference_sheet(path: &Path) -> Result<ParsedSheet, ReferenceLoadError> {
    let file = std::fs::File::open(path).map_err(|source| ReferenceLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_reference_sheet(std::io::BufReader::new(file))
}

fn parse_year_header(field: &str) -> Option<i32> {
    YEAR_HEADER_RE
        .captures(field)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn parse_data_row(row: &csv::StringRecord, year: i32) -> Option<ReferenceRecord> {
    if row.len() <= PRICE_COLUMN {
        return None;
    }

    let model_name = row.get(MODEL_COLUMN)?.trim();
    if model_name.is_empty() {
        return None;
    }

    let list_price = parse_price(row.get(PRICE_COLUMN)?)?;

    Some(ReferenceRecord {
        year,
        model_name: model_name.to_string(),
        list_price,
    })
}

/// Parses `"527 100"` style prices: digits with optional whitespace and quotes.
fn parse_price(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '"')
        .collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}
