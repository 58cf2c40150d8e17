use std::fs;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::errors::{HandicapError, HandicapResult};

pub type Row = Vec<String>;

const BOM: &[u8] = b"\xef\xbb\xbf";

/// Reads a delimited export file into rows of raw cells.
pub fn read_rows(path: &Path, delimiter: u8) -> HandicapResult<Vec<Row>> {
    let bytes = fs::read(path).map_err(|e| HandicapError::source_io(path, e))?;
    parse_rows(&bytes, delimiter).map_err(|e| HandicapError::source_io(path, e.into()))
}

/// Splits raw file content into rows. Quotes carry no meaning, blank lines
/// are skipped and every cell is trimmed.
pub fn parse_rows(bytes: &[u8], delimiter: u8) -> csv::Result<Vec<Row>> {
    let content = bytes.strip_prefix(BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(content);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let row = decode_record(&record?);
        if !is_blank(&row) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn decode_record(record: &ByteRecord) -> Row {
    record
        .iter()
        .map(|field| decode_permissive(field).trim().to_string())
        .collect()
}

fn is_blank(row: &Row) -> bool {
    row.iter().all(|cell| cell.is_empty()) && row.len() <= 1
}

/// Keeps every valid UTF-8 run and drops the invalid bytes between them.
pub fn decode_permissive(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

pub fn parse_integer(cell: &str) -> Option<i64> {
    cell.trim().parse().ok()
}

/// Accepts both `3.5` and the decimal comma form `3,5`.
pub fn parse_real(cell: &str) -> Option<f64> {
    cell.trim().replace(',', ".").parse().ok()
}
