//! CSV ingest for the Tesouro Direto "Preços e Taxas" table.
//!
//! The published schema uses `;` as the field delimiter, `%d/%m/%Y` dates,
//! and a decimal comma. Only three columns matter to the classifier:
//!
//! - `Tipo Titulo`      (instrument type)
//! - `Data Base`        (as-of date)
//! - `Taxa Compra Manha` (morning purchase rate)
//!
//! Design goals:
//! - malformed dates/rates abort immediately with the offending CSV line;
//!   downstream stages never see half-parsed data
//! - an *empty* rate field is not malformed: it becomes a missing
//!   observation, eligible for forward-fill during preparation
//! - no hidden behavior: the decimal separator is explicit configuration

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::ByteRecord;

use crate::domain::{DecimalSep, RateRecord};
use crate::error::{AppError, ErrorKind};

const COL_INSTRUMENT: &str = "tipo titulo";
const COL_DATE: &str = "data base";
const COL_RATE: &str = "taxa compra manha";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Ingest output: raw records plus bookkeeping for the run summary.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub records: Vec<RateRecord>,
    pub rows_read: usize,
}

/// Load rate records from a CSV file on disk.
pub fn load_rate_records(path: &Path, decimal_sep: DecimalSep) -> Result<IngestedTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to open CSV '{}': {e}", path.display()),
        )
    })?;
    read_rate_records(file, decimal_sep)
}

/// Parse rate records from any reader (file or in-memory download).
///
/// Tesouro Transparente serves latin-1 encoded CSVs, so fields are decoded
/// byte-wise with lossy UTF-8 conversion instead of trusting the encoding.
pub fn read_rate_records(
    reader: impl Read,
    decimal_sep: DecimalSep,
) -> Result<IngestedTable, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .byte_headers()
        .map_err(|e| AppError::new(ErrorKind::Parse, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let col_instrument = find_column(&headers, COL_INSTRUMENT)?;
    let col_date = find_column(&headers, COL_DATE)?;
    let col_rate = find_column(&headers, COL_RATE)?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.byte_records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record =
            result.map_err(|e| AppError::new(ErrorKind::Parse, format!("CSV line {line}: {e}")))?;

        let instrument = field(&record, col_instrument);
        let date_raw = field(&record, col_date);
        let rate_raw = field(&record, col_rate);

        let date = NaiveDate::parse_from_str(&date_raw, DATE_FORMAT).map_err(|e| {
            AppError::new(
                ErrorKind::Parse,
                format!("CSV line {line}: invalid date '{date_raw}' (expected dd/mm/yyyy): {e}"),
            )
        })?;

        let rate = parse_rate(&rate_raw, decimal_sep).map_err(|msg| {
            AppError::new(ErrorKind::Parse, format!("CSV line {line}: {msg}"))
        })?;

        records.push(RateRecord {
            instrument: instrument.into_owned(),
            date,
            rate,
        });
    }

    Ok(IngestedTable { records, rows_read })
}

fn find_column(headers: &ByteRecord, wanted: &str) -> Result<usize, AppError> {
    headers
        .iter()
        .position(|h| normalize_header_name(h) == wanted)
        .ok_or_else(|| {
            AppError::new(
                ErrorKind::Parse,
                format!("CSV is missing required column '{wanted}'."),
            )
        })
}

fn normalize_header_name(raw: &[u8]) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header. If we don't strip it, schema validation will
    // incorrectly report missing columns.
    let name = String::from_utf8_lossy(raw);
    name.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
}

fn field<'a>(record: &'a ByteRecord, idx: usize) -> std::borrow::Cow<'a, str> {
    String::from_utf8_lossy(record.get(idx).unwrap_or(b""))
}

/// Parse a rate cell. Empty cells are missing observations, not errors.
fn parse_rate(raw: &str, decimal_sep: DecimalSep) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = match decimal_sep {
        DecimalSep::Comma => trimmed.replace(',', "."),
        DecimalSep::Dot => trimmed.to_string(),
    };

    let value: f64 = normalized
        .parse()
        .map_err(|_| format!("invalid rate '{trimmed}'"))?;
    if !value.is_finite() {
        return Err(format!("non-finite rate '{trimmed}'"));
    }
    Ok(Some(value))
}
