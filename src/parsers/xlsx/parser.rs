use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use tracing::{debug, warn};

use crate::parsers::row::RawRow;
use crate::parsers::traits::{Parser, has_extension};
use crate::types::Transaction;

/// ZIP local file header, the first bytes of every XLSX workbook
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// First worksheet of an XLSX workbook, first row as header.
pub struct XlsxParser;

/// Excel serial date (days since 1899-12-30) as `YYYY-MM-DD HH:MM:SS`.
pub fn excel_serial_to_text(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * SECONDS_PER_DAY).round();
    if !seconds.is_finite() {
        return None;
    }
    let datetime = epoch.checked_add_signed(Duration::try_seconds(seconds as i64)?)?;
    Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// JSON value for one cell; empty and error cells become `null`.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::String(i.to_string()),
        Data::Float(f) => Value::String(f.to_string()),
        Data::Bool(b) => Value::String(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_text(dt.as_f64())
            .map(Value::String)
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => {
            warn!(error = ?e, "Excel cell holds an error value");
            Value::Null
        }
    }
}

impl Parser for XlsxParser {
    fn is_supported(filename: Option<&str>, content: &[u8]) -> bool {
        match filename {
            Some(_) => has_extension(filename, &["xlsx", "xlsm"]),
            None => content.starts_with(ZIP_MAGIC),
        }
    }

    fn parse(content: &[u8]) -> Result<Vec<Transaction>, String> {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(content)).map_err(|e| format!("Failed to open workbook: {}", e))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or("Workbook has no worksheets")?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| format!("Failed to read worksheet {}: {}", sheet_name, e))?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let headers: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();

        let mut transactions = Vec::new();
        for cells in rows {
            let row: RawRow = headers
                .iter()
                .zip(cells.iter())
                .map(|(header, cell)| (header, cell_value(cell)))
                .collect();
            if row.is_empty() {
                continue;
            }
            transactions.push(row.into_transaction()?);
        }

        debug!(sheet = %sheet_name, count = transactions.len(), "XLSX transactions loaded");
        Ok(transactions)
    }
}
